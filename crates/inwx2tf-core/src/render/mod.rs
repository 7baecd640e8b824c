//! Terraform renderers
//!
//! Each renderer turns one registrar entity into an `import` block and a
//! `resource` block for the INWX Terraform provider:
//!
//! - [`render_domain`]: `inwx_domain`
//! - [`render_contacts`]: `inwx_domain_contact`
//! - [`RecordResource`]: `inwx_nameserver_record`
//!
//! Renderers are pure. Rendering the same value twice yields the same text.

mod contact;
mod domain;
mod record;

pub use contact::{ContactMap, ContactResource, RenderedContact, contact_map, render_contacts};
pub use domain::{domain_identifier, render_domain};
pub use record::RecordResource;

/// Terraform resource type for domains
pub const DOMAIN_RESOURCE: &str = "inwx_domain";

/// Terraform resource type for contact handles
pub const CONTACT_RESOURCE: &str = "inwx_domain_contact";

/// Terraform resource type for nameserver records
pub const RECORD_RESOURCE: &str = "inwx_nameserver_record";

/// An entity waiting for its final identifier
///
/// Implementations propose an identifier and know how to render themselves
/// once [`crate::collision`] has picked the final one.
pub trait PendingResource {
    /// Identifier derived from the entity, possibly shared with others
    fn proposed_identifier(&self) -> &str;

    /// Render the `import` block for the given final identifier
    fn build_import(&self, identifier: &str) -> String;

    /// Render the `resource` block for the given final identifier
    fn build_resource(&self, identifier: &str) -> String;
}

/// Rendered text for one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResource {
    /// Final, batch-unique identifier
    pub identifier: String,
    /// `import { ... }` block
    pub import: String,
    /// `resource "..." "..." { ... }` block
    pub resource: String,
}

/// Drop `Some("")` so empty optional strings are omitted like `None`
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
