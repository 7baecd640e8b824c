// # inwx2tf-core
//
// Core library for exporting an INWX registrar account as Terraform.
//
// ## Architecture Overview
//
// This library turns registrar data into HCL for the INWX Terraform provider:
// - **RegistrarSource**: Trait for reading contacts, domains and records from a registrar API
// - **Exporter**: Orchestrates login → contacts → domains → records → files → logout
// - **render**: Pure renderers producing `import` and `resource` blocks
// - **identifier** / **collision**: Deterministic, batch-unique Terraform identifiers
// - **OutputDir**: Owns the output directory and writes files atomically
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Rendering never talks to the network
// 2. **Plugin-Based**: The registrar API lives behind a trait, in its own crate
// 3. **Library-First**: All core functionality can be used as a library
// 4. **Determinism**: The same registrar data always yields byte-identical files

pub mod collision;
pub mod config;
pub mod error;
pub mod exporter;
pub mod hcl;
pub mod identifier;
pub mod model;
pub mod output;
pub mod render;
pub mod traits;

// Re-export core types for convenience
pub use config::{ApiEndpoint, ExportConfig, Inwx2TfConfig, ProviderConfig};
pub use error::{Error, Result};
pub use exporter::{ExportReport, ExportedDomain, Exporter, SkippedDomain};
pub use model::{Contact, DnsRecord, Domain, DomainContacts, RecordType};
pub use output::OutputDir;
pub use traits::RegistrarSource;
