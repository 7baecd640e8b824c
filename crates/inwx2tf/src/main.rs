// # inwx2tf - INWX to Terraform exporter
//
// This binary is a THIN integration layer:
// 1. Reading configuration from environment variables (and `.env`)
// 2. Initializing logging and the runtime
// 3. Building the INWX source and the exporter
// 4. Running one export and reporting the outcome
//
// All rendering and export logic lives in inwx2tf-core.
//
// ## Configuration
//
// All configuration is done via environment variables. A `.env` file in the
// working directory is loaded first; variables already set take precedence.
//
// ### Credentials
// - `INWX_USER`: Account user name (required)
// - `INWX_PASSWORD`: Account password (required)
// - `INWX_2FA_SECRET`: Base32 TOTP secret (only for accounts with 2FA)
//
// ### Export
// - `INWX2TF_ENDPOINT`: `live`, `ote` or a JSON-RPC URL (default: live)
// - `INWX2TF_OUTPUT_DIR`: Output directory (default: ./output)
// - `INWX2TF_SENTINEL_NS`: Only domains using this nameserver are exported (default: ns.inwx.de)
// - `INWX2TF_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export INWX_USER=jane
// export INWX_PASSWORD=secret
// export INWX2TF_OUTPUT_DIR=./terraform/inwx
//
// inwx2tf
// ```

use anyhow::{Context, Result};
use inwx2tf_core::config::{ApiEndpoint, ExportConfig, Inwx2TfConfig, ProviderConfig};
use inwx2tf_core::model::DEFAULT_SENTINEL_NAMESERVER;
use inwx2tf_core::{ExportReport, Exporter};
use inwx2tf_provider_inwx::InwxSource;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Export finished (skipped domains are reported, not fatal)
/// - 1: Configuration or startup error
/// - 2: Runtime error (login, listing or output failure)
#[derive(Debug, Clone, Copy)]
enum Inwx2TfExitCode {
    /// Export finished
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<Inwx2TfExitCode> for ExitCode {
    fn from(code: Inwx2TfExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    username: String,
    password: String,
    totp_secret: Option<String>,
    endpoint: String,
    output_dir: String,
    sentinel_nameserver: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            username: lookup("INWX_USER").unwrap_or_default(),
            password: lookup("INWX_PASSWORD").unwrap_or_default(),
            totp_secret: lookup("INWX_2FA_SECRET").filter(|s| !s.trim().is_empty()),
            endpoint: lookup("INWX2TF_ENDPOINT").unwrap_or_else(|| "live".to_string()),
            output_dir: lookup("INWX2TF_OUTPUT_DIR").unwrap_or_else(|| "./output".to_string()),
            sentinel_nameserver: lookup("INWX2TF_SENTINEL_NS")
                .unwrap_or_else(|| DEFAULT_SENTINEL_NAMESERVER.to_string()),
            log_level: lookup("INWX2TF_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "INWX2TF_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        self.to_core().validate()?;
        Ok(())
    }

    fn to_core(&self) -> Inwx2TfConfig {
        Inwx2TfConfig {
            provider: ProviderConfig::Inwx {
                username: self.username.clone(),
                password: self.password.clone(),
                totp_secret: self.totp_secret.clone(),
                endpoint: ApiEndpoint::parse(&self.endpoint),
            },
            export: ExportConfig::default()
                .with_output_dir(&self.output_dir)
                .with_sentinel_nameserver(self.sentinel_nameserver.trim()),
        }
    }

    fn log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Warning for a `.env` file that exists but could not be loaded
fn dotenv_warning(result: &dotenvy::Result<PathBuf>) -> Option<String> {
    match result {
        Err(e) if !e.not_found() => Some(format!("Failed to load .env file: {}", e)),
        _ => None,
    }
}

fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();

    let config = Config::from_env();

    if let Err(e) = config.validate() {
        if let Some(warning) = dotenv_warning(&dotenv) {
            eprintln!("{}", warning);
        }
        eprintln!("Configuration validation error: {}", e);
        return Inwx2TfExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return Inwx2TfExitCode::ConfigError.into();
    }

    if let Some(warning) = dotenv_warning(&dotenv) {
        warn!("{}", warning);
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return Inwx2TfExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        match run_export(config.to_core()).await {
            Ok(report) => {
                log_summary(&report);
                Inwx2TfExitCode::Success
            }
            Err(e) => {
                error!("Export failed: {:#}", e);
                Inwx2TfExitCode::RuntimeError
            }
        }
    });

    result.into()
}

/// Run one export, aborting on SIGINT/SIGTERM
async fn run_export(config: Inwx2TfConfig) -> Result<ExportReport> {
    let source = InwxSource::from_config(&config.provider)
        .context("Failed to create INWX source")?;
    let exporter = Exporter::new(Box::new(source), config.export)?;

    tokio::select! {
        report = exporter.run() => Ok(report?),
        signal = wait_for_shutdown() => {
            let signal = signal?;
            anyhow::bail!("Interrupted by {}; output may be incomplete", signal)
        }
    }
}

fn log_summary(report: &ExportReport) {
    info!(
        "Done: {} contact(s), {} of {} domain(s) exported ({} listed)",
        report.contacts.len(),
        report.exported.len(),
        report.selected_domains,
        report.listed_domains
    );

    for skipped in &report.skipped {
        warn!(
            "Skipped {}/{} {}: {}",
            skipped.position, report.selected_domains, skipped.name, skipped.reason
        );
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(signal)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("INWX_USER", "jane"), ("INWX_PASSWORD", "secret")]);
        assert!(config.validate().is_ok());

        let core = config.to_core();
        assert_eq!(core.export.output_dir, std::path::PathBuf::from("./output"));
        assert_eq!(core.export.sentinel_nameserver, "ns.inwx.de");
        assert_eq!(config.log_level(), Level::INFO);
        match core.provider {
            ProviderConfig::Inwx {
                endpoint,
                totp_secret,
                ..
            } => {
                assert_eq!(endpoint, ApiEndpoint::Live);
                assert!(totp_secret.is_none());
            }
        }
    }

    #[test]
    fn test_missing_credentials_rejected() {
        assert!(config(&[]).validate().is_err());
        assert!(config(&[("INWX_USER", "jane")]).validate().is_err());
    }

    #[test]
    fn test_blank_2fa_secret_is_ignored() {
        let config = config(&[
            ("INWX_USER", "jane"),
            ("INWX_PASSWORD", "secret"),
            ("INWX_2FA_SECRET", "  "),
        ]);
        assert!(config.totp_secret.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("INWX_USER", "jane"),
            ("INWX_PASSWORD", "secret"),
            ("INWX2TF_ENDPOINT", "ote"),
            ("INWX2TF_OUTPUT_DIR", "/tmp/inwx"),
            ("INWX2TF_SENTINEL_NS", "ns2.inwx.de"),
            ("INWX2TF_LOG_LEVEL", "DEBUG"),
        ]);
        assert!(config.validate().is_ok());
        assert_eq!(config.log_level(), Level::DEBUG);

        let core = config.to_core();
        assert_eq!(core.export.sentinel_nameserver, "ns2.inwx.de");
        assert_eq!(core.export.output_dir, std::path::PathBuf::from("/tmp/inwx"));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let config = config(&[
            ("INWX_USER", "jane"),
            ("INWX_PASSWORD", "secret"),
            ("INWX2TF_LOG_LEVEL", "verbose"),
        ]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_dotenv_is_silent() {
        let missing: dotenvy::Result<PathBuf> = Err(dotenvy::Error::Io(
            std::io::Error::from(std::io::ErrorKind::NotFound),
        ));
        assert!(dotenv_warning(&missing).is_none());
        assert!(dotenv_warning(&Ok(PathBuf::from(".env"))).is_none());
    }

    #[test]
    fn test_malformed_dotenv_is_reported() {
        let malformed: dotenvy::Result<PathBuf> =
            Err(dotenvy::Error::LineParse("INWX_USER jane".to_string(), 9));
        let warning = dotenv_warning(&malformed).unwrap();
        assert!(warning.starts_with("Failed to load .env file"));

        let unreadable: dotenvy::Result<PathBuf> = Err(dotenvy::Error::Io(
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        ));
        assert!(dotenv_warning(&unreadable).is_some());
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let config = config(&[
            ("INWX_USER", "jane"),
            ("INWX_PASSWORD", "secret"),
            ("INWX2TF_ENDPOINT", "ftp://example.com"),
        ]);
        assert!(config.validate().is_err());
    }
}
