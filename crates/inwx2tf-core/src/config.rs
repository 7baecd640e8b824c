//! Configuration types for inwx2tf
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::model::DEFAULT_SENTINEL_NAMESERVER;

/// INWX production JSON-RPC endpoint
pub const LIVE_ENDPOINT: &str = "https://api.domrobot.com/jsonrpc/";

/// INWX test environment (OTE) JSON-RPC endpoint
pub const OTE_ENDPOINT: &str = "https://api.ote.domrobot.com/jsonrpc/";

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inwx2TfConfig {
    /// Registrar API configuration
    pub provider: ProviderConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,
}

impl Inwx2TfConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;
        self.export.validate()?;
        Ok(())
    }
}

/// Registrar API configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// INWX domrobot JSON-RPC API
    Inwx {
        /// Account user name
        username: String,
        /// Account password
        password: String,
        /// Base32 TOTP secret, for accounts with two-factor authentication
        #[serde(default)]
        totp_secret: Option<String>,
        /// API endpoint
        #[serde(default)]
        endpoint: ApiEndpoint,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Inwx {
                username,
                password,
                totp_secret,
                endpoint,
            } => {
                if username.is_empty() || password.is_empty() {
                    return Err(crate::Error::config(
                        "Missing INWX credentials. Please specify INWX_USER and INWX_PASSWORD.",
                    ));
                }
                if totp_secret.as_ref().is_some_and(|s| s.trim().is_empty()) {
                    return Err(crate::Error::config("INWX 2FA secret cannot be empty"));
                }
                endpoint.validate()
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Inwx { .. } => "inwx",
        }
    }
}

// Credentials never appear in Debug output
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderConfig::Inwx {
                username,
                totp_secret,
                endpoint,
                ..
            } => f
                .debug_struct("Inwx")
                .field("username", username)
                .field("password", &"<REDACTED>")
                .field("totp_secret", &totp_secret.as_ref().map(|_| "<REDACTED>"))
                .field("endpoint", endpoint)
                .finish(),
        }
    }
}

/// Which domrobot API to talk to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiEndpoint {
    /// Production API
    #[default]
    Live,
    /// Operational test environment
    Ote,
    /// Any other JSON-RPC URL
    Custom(String),
}

impl ApiEndpoint {
    /// Parse `live`, `ote` or a URL
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "" | "live" => ApiEndpoint::Live,
            "ote" | "test" => ApiEndpoint::Ote,
            _ => ApiEndpoint::Custom(value.trim().to_string()),
        }
    }

    /// The JSON-RPC URL
    pub fn url(&self) -> &str {
        match self {
            ApiEndpoint::Live => LIVE_ENDPOINT,
            ApiEndpoint::Ote => OTE_ENDPOINT,
            ApiEndpoint::Custom(url) => url,
        }
    }

    fn validate(&self) -> Result<(), crate::Error> {
        if let ApiEndpoint::Custom(url) = self
            && !url.starts_with("https://")
            && !url.starts_with("http://")
        {
            return Err(crate::Error::config(format!(
                "API endpoint must be 'live', 'ote' or an HTTP(S) URL. Got: {}",
                url
            )));
        }
        Ok(())
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory the `.tf` files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Only domains delegated to this nameserver are exported
    #[serde(default = "default_sentinel_nameserver")]
    pub sentinel_nameserver: String,
}

impl ExportConfig {
    /// Validate the export configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(crate::Error::config("Output directory cannot be empty"));
        }
        if is_unsafe_output_dir(&self.output_dir, std::env::var_os("HOME").as_deref()) {
            return Err(crate::Error::config(format!(
                "Output directory {} is the working, root or home directory. \
                Please use a dedicated directory.",
                self.output_dir.display()
            )));
        }
        if self.sentinel_nameserver.trim().is_empty() {
            return Err(crate::Error::config("Sentinel nameserver cannot be empty"));
        }
        Ok(())
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Set the sentinel nameserver
    pub fn with_sentinel_nameserver(mut self, nameserver: impl Into<String>) -> Self {
        self.sentinel_nameserver = nameserver.into();
        self
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            sentinel_nameserver: default_sentinel_nameserver(),
        }
    }
}

/// Whether `path` is `.`, the filesystem root or `home`
fn is_unsafe_output_dir(path: &Path, home: Option<&std::ffi::OsStr>) -> bool {
    let significant: Vec<Component<'_>> = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    let is_cwd = significant.is_empty();
    let is_root = !significant.is_empty()
        && significant
            .iter()
            .all(|c| matches!(c, Component::RootDir | Component::Prefix(_)));
    let is_home = home
        .filter(|home| !home.is_empty())
        .is_some_and(|home| Path::new(home).components().eq(path.components()));

    is_cwd || is_root || is_home
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

fn default_sentinel_nameserver() -> String {
    DEFAULT_SENTINEL_NAMESERVER.to_string()
}
