use std::collections::HashMap;

use super::{CONTACT_RESOURCE, PendingResource, RenderedResource, non_empty};
use crate::collision::render_batch;
use crate::hcl::{Block, Body};
use crate::identifier::derive_identifier;
use crate::model::{Contact, ContactId};

/// Registry contact id to final Terraform identifier
pub type ContactMap = HashMap<ContactId, String>;

/// A contact handle waiting for its final identifier
#[derive(Debug, Clone)]
pub struct ContactResource<'a> {
    contact: &'a Contact,
    proposed: String,
}

impl<'a> ContactResource<'a> {
    pub fn new(contact: &'a Contact) -> Self {
        Self {
            contact,
            proposed: derive_identifier(&contact.name),
        }
    }

    fn body(&self) -> Body {
        let c = self.contact;
        Body::new()
            .attr("type", c.kind.as_str())
            .attr("name", c.name.as_str())
            .opt_attr("organization", non_empty(&c.organization))
            .attr("street_address", c.street.as_str())
            .attr("city", c.city.as_str())
            .attr("postal_code", c.postal_code.as_str())
            .opt_attr("state_province", non_empty(&c.state_province))
            .attr("country_code", c.country_code.as_str())
            .attr("phone_number", c.phone.as_str())
            .opt_attr("fax", non_empty(&c.fax))
            .attr("email", c.email.as_str())
            .opt_attr("remarks", non_empty(&c.remarks))
            .opt_attr("whois_protection", c.whois_protection.then_some(true))
    }
}

impl PendingResource for ContactResource<'_> {
    fn proposed_identifier(&self) -> &str {
        &self.proposed
    }

    fn build_import(&self, identifier: &str) -> String {
        Block::import(
            self.contact.id.to_string(),
            format!("{CONTACT_RESOURCE}.{identifier}"),
        )
        .to_string()
    }

    fn build_resource(&self, identifier: &str) -> String {
        Block::resource(CONTACT_RESOURCE, identifier, self.body()).to_string()
    }
}

/// A rendered contact and the registry id it was rendered from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContact {
    pub contact_id: ContactId,
    pub rendered: RenderedResource,
}

/// Render contacts in listing order, resolving identifier collisions
pub fn render_contacts(contacts: &[Contact]) -> Vec<RenderedContact> {
    let pending: Vec<ContactResource<'_>> = contacts.iter().map(ContactResource::new).collect();

    contacts
        .iter()
        .zip(render_batch(&pending))
        .map(|(contact, rendered)| RenderedContact {
            contact_id: contact.id,
            rendered,
        })
        .collect()
}

/// Build the lookup used to resolve domain contact references
pub fn contact_map(contacts: &[RenderedContact]) -> ContactMap {
    contacts
        .iter()
        .map(|c| (c.contact_id, c.rendered.identifier.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: ContactId, name: &str) -> Contact {
        Contact {
            id,
            kind: "PERSON".to_string(),
            name: name.to_string(),
            organization: None,
            street: "Musterstr. 1".to_string(),
            city: "Karlsruhe".to_string(),
            postal_code: "76133".to_string(),
            state_province: None,
            country_code: "DE".to_string(),
            phone: "+49.7211234567".to_string(),
            fax: None,
            email: "jane@example.com".to_string(),
            remarks: None,
            whois_protection: false,
        }
    }

    #[test]
    fn test_required_fields_only() {
        let contacts = [contact(1001, "Jane Doe")];
        let rendered = render_contacts(&contacts);

        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].contact_id, 1001);
        assert_eq!(rendered[0].rendered.identifier, "jane_doe");
        assert_eq!(
            rendered[0].rendered.import,
            "import {\n    id = \"1001\"\n    to = inwx_domain_contact.jane_doe\n}"
        );

        let expected = r#"resource "inwx_domain_contact" "jane_doe" {
    type = "PERSON"
    name = "Jane Doe"
    street_address = "Musterstr. 1"
    city = "Karlsruhe"
    postal_code = "76133"
    country_code = "DE"
    phone_number = "+49.7211234567"
    email = "jane@example.com"
}"#;
        assert_eq!(rendered[0].rendered.resource, expected);
    }

    #[test]
    fn test_optional_fields_in_canonical_order() {
        let mut full = contact(7, "ACME Hostmaster");
        full.kind = "ROLE".to_string();
        full.organization = Some("ACME GmbH".to_string());
        full.state_province = Some("BW".to_string());
        full.fax = Some("+49.7217654321".to_string());
        full.remarks = Some("billing only".to_string());
        full.whois_protection = true;

        let pending = ContactResource::new(&full);
        assert_eq!(
            pending.body().keys(),
            vec![
                "type",
                "name",
                "organization",
                "street_address",
                "city",
                "postal_code",
                "state_province",
                "country_code",
                "phone_number",
                "fax",
                "email",
                "remarks",
                "whois_protection",
            ]
        );
        assert!(pending.build_resource("acme").contains("    whois_protection = true\n"));
    }

    #[test]
    fn test_empty_optional_strings_are_omitted() {
        let mut c = contact(1, "Jane Doe");
        c.organization = Some(String::new());
        c.fax = Some(String::new());

        let resource = ContactResource::new(&c).build_resource("jane_doe");
        assert!(!resource.contains("organization"));
        assert!(!resource.contains("fax"));
        assert!(!resource.contains("whois_protection"));
    }

    #[test]
    fn test_duplicate_names_get_unique_identifiers() {
        let contacts = [
            contact(1, "Jane Doe"),
            contact(2, "John Roe"),
            contact(3, "Jane Doe"),
        ];
        let rendered = render_contacts(&contacts);
        let map = contact_map(&rendered);

        assert_eq!(map.get(&1).map(String::as_str), Some("jane_doe"));
        assert_eq!(map.get(&2).map(String::as_str), Some("john_roe"));
        assert_eq!(map.get(&3).map(String::as_str), Some("jane_doe2"));
        assert!(rendered[2].rendered.import.contains("id = \"3\""));
    }

    #[test]
    fn test_numbered_duplicate_does_not_take_existing_name() {
        let contacts = [
            contact(1, "Jane Doe"),
            contact(2, "Jane Doe"),
            contact(3, "Jane Doe2"),
        ];
        let map = contact_map(&render_contacts(&contacts));

        assert_eq!(map.get(&1).map(String::as_str), Some("jane_doe"));
        assert_eq!(map.get(&2).map(String::as_str), Some("jane_doe3"));
        assert_eq!(map.get(&3).map(String::as_str), Some("jane_doe2"));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let contacts = [contact(1, "Jane Doe"), contact(2, "Jane Doe")];
        assert_eq!(render_contacts(&contacts), render_contacts(&contacts));
    }
}
