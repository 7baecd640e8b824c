//! Export orchestration
//!
//! The Exporter is responsible for:
//! - Logging in to the registrar and out again
//! - Rendering contacts and building the contact identifier map
//! - Selecting domains delegated to the sentinel nameserver
//! - Rendering each domain with its records, one domain at a time
//! - Writing the `.tf` files
//!
//! ## Flow
//!
//! ```text
//! login ─▶ contacts ─▶ domains ─┬─▶ domain 1/N ─▶ records ─▶ example.com.tf
//!            │                  ├─▶ domain 2/N ─▶ records ─▶ example.org.tf
//!            ▼                  └─▶ ...
//!       contacts.tf                                  │
//!                                                    ▼
//!                                        import.tf ◀─ report ─▶ logout
//! ```
//!
//! ## Failure Handling
//!
//! - Login, contact listing and domain listing failures abort the run
//! - Anything that fails for a single domain (unknown contact reference,
//!   record listing, writing the file) skips that domain only; the reason is
//!   logged and kept in [`ExportReport::skipped`]

use crate::collision::{render_batch, resolve_identifiers};
use crate::config::ExportConfig;
use crate::error::Result;
use crate::model::{DnsRecord, Domain};
use crate::output::{CONTACTS_FILE, IMPORT_FILE, OutputDir, domain_file_name};
use crate::render::{
    ContactMap, RecordResource, RenderedContact, RenderedResource, contact_map,
    domain_identifier, render_contacts, render_domain,
};
use crate::traits::RegistrarSource;
use tracing::{debug, error, info, warn};

/// A domain that was rendered and written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDomain {
    /// Domain name
    pub name: String,
    /// 1-based position among the selected domains
    pub position: usize,
    /// The `inwx_domain` resource
    pub domain: RenderedResource,
    /// The `inwx_nameserver_record` resources, in listing order
    pub records: Vec<RenderedResource>,
}

impl ExportedDomain {
    /// Contents of the domain's `.tf` file
    pub fn file_contents(&self) -> String {
        let mut blocks = vec![self.domain.resource.as_str()];
        blocks.extend(self.records.iter().map(|r| r.resource.as_str()));
        join_blocks(blocks)
    }
}

/// A domain that could not be exported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDomain {
    /// Domain name
    pub name: String,
    /// 1-based position among the selected domains
    pub position: usize,
    /// Why the domain was skipped
    pub reason: String,
}

/// Outcome of one domain, before partitioning
#[derive(Debug)]
enum DomainOutcome {
    Exported(ExportedDomain),
    Skipped(SkippedDomain),
}

/// Result of an export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Rendered contacts, in listing order
    pub contacts: Vec<RenderedContact>,
    /// Number of domains the registrar listed
    pub listed_domains: usize,
    /// Number of domains delegated to the sentinel nameserver
    pub selected_domains: usize,
    /// Domains written successfully
    pub exported: Vec<ExportedDomain>,
    /// Domains that failed
    pub skipped: Vec<SkippedDomain>,
}

impl ExportReport {
    /// Contents of `contacts.tf`
    pub fn contacts_file(&self) -> String {
        join_blocks(self.contacts.iter().map(|c| c.rendered.resource.as_str()))
    }

    /// Contents of `import.tf`
    ///
    /// Contact imports come first, then each exported domain's import
    /// preceded by a `#Domain i/N` marker and followed by its record imports.
    pub fn import_file(&self) -> String {
        let mut fragments: Vec<String> = self
            .contacts
            .iter()
            .map(|c| c.rendered.import.clone())
            .collect();

        for domain in &self.exported {
            fragments.push(format!(
                "#Domain {}/{}\n{}",
                domain.position, self.selected_domains, domain.domain.import
            ));
            fragments.extend(domain.records.iter().map(|r| r.import.clone()));
        }

        join_blocks(fragments.iter().map(String::as_str))
    }
}

/// Blocks separated by one blank line, with a final newline
fn join_blocks<'a>(blocks: impl IntoIterator<Item = &'a str>) -> String {
    let mut joined = blocks.into_iter().collect::<Vec<_>>().join("\n\n");
    joined.push('\n');
    joined
}

/// Export orchestrator
///
/// Drives a [`RegistrarSource`] through one sequential pass and writes the
/// result to an [`OutputDir`].
///
/// ## Lifecycle
///
/// 1. Create with [`Exporter::new()`]
/// 2. Call [`Exporter::run()`] once
/// 3. Inspect the returned [`ExportReport`]
pub struct Exporter {
    /// Registrar to read from
    source: Box<dyn RegistrarSource>,

    /// Where the files go
    output: OutputDir,

    /// Nameserver that selects domains for export
    sentinel_nameserver: String,
}

impl Exporter {
    /// Create a new exporter
    ///
    /// # Parameters
    ///
    /// - `source`: Registrar source implementation
    /// - `config`: Export settings
    pub fn new(source: Box<dyn RegistrarSource>, config: ExportConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            source,
            output: OutputDir::new(config.output_dir),
            sentinel_nameserver: config.sentinel_nameserver,
        })
    }

    /// Run the export
    ///
    /// # Returns
    ///
    /// - `Ok(ExportReport)`: The run completed, possibly with skipped domains
    /// - `Err(Error)`: Login, a listing or the output directory failed
    pub async fn run(&self) -> Result<ExportReport> {
        info!("Authenticating with {} ...", self.source.source_name());
        self.source.login().await?;

        let result = self.export().await;

        if let Err(e) = self.source.logout().await {
            warn!("Logout from {} failed: {}", self.source.source_name(), e);
        }

        result
    }

    async fn export(&self) -> Result<ExportReport> {
        self.output.reset().await?;

        info!("Processing contacts information ...");
        let contacts = render_contacts(&self.source.list_contacts().await?);
        let contact_ids = contact_map(&contacts);
        let mut report = ExportReport {
            contacts,
            ..ExportReport::default()
        };
        self.output
            .write(CONTACTS_FILE, &report.contacts_file())
            .await?;
        debug!("Rendered {} contact(s)", report.contacts.len());

        info!("Processing domains information ...");
        let listed = self.source.list_domains().await?;
        report.listed_domains = listed.len();

        let domains: Vec<Domain> = listed
            .into_iter()
            .filter(|domain| {
                let managed = domain.is_managed_by(&self.sentinel_nameserver);
                if !managed {
                    debug!(
                        "Skipping {}: not delegated to {}",
                        domain.name, self.sentinel_nameserver
                    );
                }
                managed
            })
            .collect();
        report.selected_domains = domains.len();

        let proposed: Vec<String> = domains.iter().map(domain_identifier).collect();
        let identifiers = resolve_identifiers(&proposed);

        let total = domains.len();
        let mut outcomes = Vec::with_capacity(total);
        for (index, (domain, identifier)) in domains.iter().zip(&identifiers).enumerate() {
            let position = index + 1;
            info!("{}/{} - Processing domain {} ...", position, total, domain.name);

            let outcome = match self
                .export_domain(domain, identifier, position, &contact_ids)
                .await
            {
                Ok(exported) => DomainOutcome::Exported(exported),
                Err(e) => {
                    error!(
                        "{}/{} - Error processing domain {}: {}",
                        position, total, domain.name, e
                    );
                    DomainOutcome::Skipped(SkippedDomain {
                        name: domain.name.clone(),
                        position,
                        reason: e.to_string(),
                    })
                }
            };
            outcomes.push(outcome);
        }

        for outcome in outcomes {
            match outcome {
                DomainOutcome::Exported(exported) => report.exported.push(exported),
                DomainOutcome::Skipped(skipped) => report.skipped.push(skipped),
            }
        }

        self.output.write(IMPORT_FILE, &report.import_file()).await?;

        info!(
            "Exported {} of {} domain(s) to {} ({} skipped)",
            report.exported.len(),
            total,
            self.output.path().display(),
            report.skipped.len()
        );

        Ok(report)
    }

    /// Render and write one domain
    async fn export_domain(
        &self,
        domain: &Domain,
        identifier: &str,
        position: usize,
        contacts: &ContactMap,
    ) -> Result<ExportedDomain> {
        let rendered = render_domain(domain, identifier, contacts)?;

        // SOA records are generated by the registry
        let records: Vec<DnsRecord> = self
            .source
            .list_records(&domain.name)
            .await?
            .into_iter()
            .filter(|record| !record.record_type.is_registry_managed())
            .collect();

        let pending: Vec<RecordResource<'_>> = records
            .iter()
            .map(|record| RecordResource::new(&domain.name, identifier, record))
            .collect();

        let exported = ExportedDomain {
            name: domain.name.clone(),
            position,
            domain: rendered,
            records: render_batch(&pending),
        };

        self.output
            .write(&domain_file_name(&domain.name), &exported.file_contents())
            .await?;
        debug!(
            "Wrote {} with {} record(s)",
            domain.name,
            exported.records.len()
        );

        Ok(exported)
    }
}
