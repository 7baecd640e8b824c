use super::{CONTACT_RESOURCE, ContactMap, DOMAIN_RESOURCE, RenderedResource};
use crate::error::{Error, Result};
use crate::hcl::{Block, Body, Value};
use crate::identifier::derive_identifier;
use crate::model::Domain;

/// Proposed identifier of a domain resource
pub fn domain_identifier(domain: &Domain) -> String {
    derive_identifier(&domain.name)
}

/// Render a domain with its final identifier
///
/// Contact references are resolved through `contacts`. A reference to a
/// contact that is not in the map is an error: the domain cannot be
/// rendered without it and no placeholder is substituted.
pub fn render_domain(
    domain: &Domain,
    identifier: &str,
    contacts: &ContactMap,
) -> Result<RenderedResource> {
    let mut contacts_body = Body::new();
    for (role, contact_id) in domain.contacts.roles() {
        let contact_identifier = contacts
            .get(&contact_id)
            .ok_or_else(|| Error::unknown_contact(&domain.name, role, contact_id))?;
        contacts_body = contacts_body.attr(
            role,
            Value::reference(format!("{CONTACT_RESOURCE}.{contact_identifier}.id")),
        );
    }

    let extra_data = (!domain.extra_data.is_empty()).then(|| {
        Value::StrMap(
            domain
                .extra_data
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    });

    let body = Body::new()
        .attr("name", domain.name.as_str())
        .attr("nameservers", Value::StrList(domain.nameservers.clone()))
        .attr("period", domain.period.as_str())
        .attr("renewal_mode", domain.renewal_mode.as_str())
        .attr("transfer_lock", domain.transfer_lock)
        .block("contacts", contacts_body)
        .opt_attr("extra_data", extra_data);

    Ok(RenderedResource {
        identifier: identifier.to_string(),
        import: Block::import(domain.name.as_str(), format!("{DOMAIN_RESOURCE}.{identifier}"))
            .to_string(),
        resource: Block::resource(DOMAIN_RESOURCE, identifier, body).to_string(),
    })
}
