// # INWX Registrar Source
//
// This crate provides the INWX implementation of `RegistrarSource` over the
// domrobot JSON-RPC API.
//
// ## Behavior
//
// - One HTTP request per API call, no retries and no backoff
// - Session kept in a cookie store between `account.login` and `account.logout`
// - Accounts with two-factor authentication are unlocked with a TOTP computed
//   from the configured base32 secret
// - `domain.list` and `contact.list` are paged until every item is collected
// - HTTP timeout of 30 seconds
//
// ## Security Requirements
//
// - Password and 2FA secret NEVER appear in logs or Debug output
// - Credentials come from configuration only
//
// ## API Reference
//
// - Domrobot API: https://www.inwx.com/en/help/apidoc
// - `account.login`, `account.unlock`, `account.logout`
// - `contact.list`, `domain.list`, `nameserver.info`

mod client;
mod totp;
mod types;

use async_trait::async_trait;
use inwx2tf_core::config::{ApiEndpoint, ProviderConfig};
use inwx2tf_core::model::{Contact, DnsRecord, Domain};
use inwx2tf_core::traits::RegistrarSource;
use inwx2tf_core::{Error, Result};
use serde_json::json;

use client::RpcClient;
use types::{ContactData, DomainData, LoginData, NameserverInfo, RecordData};

/// Interface language requested at login
const LANGUAGE: &str = "en";

/// INWX registrar source
///
/// # Security
///
/// The Debug implementation does NOT expose the password or the 2FA secret.
pub struct InwxSource {
    /// Account user name
    username: String,

    /// Account password
    /// ⚠️ NEVER log this value
    password: String,

    /// Base32 TOTP secret
    /// ⚠️ NEVER log this value
    totp_secret: Option<String>,

    /// JSON-RPC client holding the session cookie
    client: RpcClient,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for InwxSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InwxSource")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("totp_secret", &self.totp_secret.as_ref().map(|_| "<REDACTED>"))
            .field("endpoint", &self.client.endpoint())
            .finish()
    }
}

impl InwxSource {
    /// Create a new INWX source
    ///
    /// # Parameters
    ///
    /// - `username`, `password`: Account credentials
    /// - `totp_secret`: Base32 secret for accounts with two-factor authentication
    /// - `endpoint`: Live, OTE or a custom JSON-RPC URL
    ///
    /// # Errors
    ///
    /// - `Error::Config`: Username or password is empty
    /// - `Error::Http`: The HTTP client could not be built
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        totp_secret: Option<String>,
        endpoint: &ApiEndpoint,
    ) -> Result<Self> {
        let username = username.into();
        let password = password.into();

        if username.is_empty() || password.is_empty() {
            return Err(Error::config(
                "Missing INWX credentials. Please specify INWX_USER and INWX_PASSWORD.",
            ));
        }

        Ok(Self {
            username,
            password,
            totp_secret: totp_secret.filter(|s| !s.trim().is_empty()),
            client: RpcClient::new(endpoint.url())?,
        })
    }

    /// Create a source from provider configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        match config {
            ProviderConfig::Inwx {
                username,
                password,
                totp_secret,
                endpoint,
            } => Self::new(username.clone(), password.clone(), totp_secret.clone(), endpoint),
        }
    }

    /// Unlock a session that requires a second factor
    async fn unlock(&self) -> Result<()> {
        let secret = self.totp_secret.as_deref().ok_or_else(|| {
            Error::auth(
                "Account requires two-factor authentication. Please specify INWX_2FA_SECRET.",
            )
        })?;
        let tan = totp::current_code(secret)?;

        self.client
            .call("account.unlock", json!({ "tan": tan }))
            .await
            .map_err(|e| Error::auth(format!("Two-factor unlock failed: {}", e)))?;

        tracing::debug!("Session unlocked with TOTP");
        Ok(())
    }
}

#[async_trait]
impl RegistrarSource for InwxSource {
    async fn login(&self) -> Result<()> {
        tracing::info!(
            "Logging in to INWX as {} at {}",
            self.username,
            self.client.endpoint()
        );

        let res_data = self
            .client
            .call(
                "account.login",
                json!({
                    "user": self.username,
                    "pass": self.password,
                    "lang": LANGUAGE,
                }),
            )
            .await
            .map_err(|e| match e {
                Error::Source { message, .. } => {
                    Error::auth(format!("Failed to login to INWX API. {}", message))
                }
                other => other,
            })?;

        let login = LoginData::from_res_data(res_data);
        if login.requires_tfa() {
            self.unlock().await?;
        }

        Ok(())
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        let entries: Vec<ContactData> = self.client.list_all("contact.list", "contact").await?;
        let total = entries.len();

        let contacts: Vec<Contact> = entries
            .into_iter()
            .filter_map(ContactData::into_contact)
            .collect();
        if contacts.len() != total {
            tracing::warn!(
                "Ignored {} contact(s) without an id",
                total - contacts.len()
            );
        }

        tracing::debug!("Fetched {} contact(s)", contacts.len());
        Ok(contacts)
    }

    async fn list_domains(&self) -> Result<Vec<Domain>> {
        let entries: Vec<DomainData> = self.client.list_all("domain.list", "domain").await?;
        tracing::debug!("Fetched {} domain(s)", entries.len());
        Ok(entries.into_iter().map(DomainData::into_domain).collect())
    }

    async fn list_records(&self, domain: &str) -> Result<Vec<DnsRecord>> {
        let res_data = self
            .client
            .call("nameserver.info", json!({ "domain": domain }))
            .await?;

        let info: NameserverInfo = serde_json::from_value(res_data).map_err(|e| {
            Error::source(
                "inwx",
                format!("nameserver.info: unexpected record for {}: {}", domain, e),
            )
        })?;

        Ok(info.record.into_iter().map(RecordData::into_record).collect())
    }

    async fn logout(&self) -> Result<()> {
        self.client.call("account.logout", json!({})).await?;
        tracing::debug!("Logged out from INWX");
        Ok(())
    }

    fn source_name(&self) -> &'static str {
        "inwx"
    }
}
