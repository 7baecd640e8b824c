// # Registrar Source Trait
//
// Defines the interface the exporter uses to read registrar data.
//
// ## Implementations
//
// - INWX JSON-RPC: `inwx2tf-provider-inwx` crate
// - Tests: in-memory mock in `tests/common`
//
// ## Usage
//
// ```rust,ignore
// use inwx2tf_core::RegistrarSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* RegistrarSource implementation */;
//
//     source.login().await?;
//     let domains = source.list_domains().await?;
//     let records = source.list_records(&domains[0].name).await?;
//     source.logout().await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::model::{Contact, DnsRecord, Domain};

/// Trait for registrar API implementations
///
/// Calls are made one at a time by the exporter, in this order: `login`,
/// `list_contacts`, `list_domains`, `list_records` once per exported domain,
/// `logout`.
///
/// # Single Pass
///
/// Implementations must not retry or back off. A failed call returns an
/// error; the exporter decides whether that is fatal (login, listings) or
/// only skips one domain (`list_records`). Recovering from transient failures
/// is done by running the tool again.
///
/// # Ordering
///
/// Listings must be returned in registrar order. Identifier collisions are
/// resolved by position, so reordering makes generated names unstable
/// between runs.
#[async_trait]
pub trait RegistrarSource: Send + Sync {
    /// Authenticate the session
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The session is ready for listing calls
    /// - `Err(Error::Authentication)`: Credentials missing or rejected
    async fn login(&self) -> Result<(), crate::Error>;

    /// List all contact handles of the account
    async fn list_contacts(&self) -> Result<Vec<Contact>, crate::Error>;

    /// List all domains of the account
    async fn list_domains(&self) -> Result<Vec<Domain>, crate::Error>;

    /// List the nameserver records of one domain
    ///
    /// # Parameters
    ///
    /// - `domain`: The domain name (e.g., "example.com")
    async fn list_records(&self, domain: &str) -> Result<Vec<DnsRecord>, crate::Error>;

    /// End the session
    async fn logout(&self) -> Result<(), crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
