use super::{PendingResource, RECORD_RESOURCE, non_empty};
use crate::hcl::{Block, Body};
use crate::identifier::record_identifier;
use crate::model::{DEFAULT_PRIO, DEFAULT_TTL, DnsRecord};

/// A nameserver record waiting for its final identifier
///
/// Records are resolved per domain: pass all records of one domain, in
/// listing order, to [`crate::collision::render_batch`].
#[derive(Debug, Clone)]
pub struct RecordResource<'a> {
    domain_name: &'a str,
    record: &'a DnsRecord,
    proposed: String,
}

impl<'a> RecordResource<'a> {
    /// `domain_identifier` is the final identifier of the owning domain
    pub fn new(domain_name: &'a str, domain_identifier: &str, record: &'a DnsRecord) -> Self {
        Self {
            domain_name,
            record,
            proposed: record_identifier(domain_name, domain_identifier, record),
        }
    }

    fn body(&self) -> Body {
        let r = self.record;
        Body::new()
            .attr("domain", self.domain_name)
            .attr("type", r.record_type.as_str())
            .opt_attr("name", (r.name != self.domain_name).then_some(r.name.as_str()))
            .attr("content", r.content.as_str())
            .opt_attr("ttl", (r.ttl != DEFAULT_TTL).then_some(r.ttl))
            .opt_attr("prio", (r.prio != DEFAULT_PRIO).then_some(r.prio))
            .opt_attr("url_redirect_type", non_empty(&r.url_redirect_type))
            .opt_attr("url_redirect_title", non_empty(&r.url_redirect_title))
            .opt_attr("url_redirect_description", non_empty(&r.url_redirect_description))
            .opt_attr("url_redirect_keywords", non_empty(&r.url_redirect_keywords))
            .opt_attr("url_redirect_fav_icon", non_empty(&r.url_redirect_fav_icon))
            .opt_attr("url_append", r.url_append.then_some(true))
    }
}

impl PendingResource for RecordResource<'_> {
    fn proposed_identifier(&self) -> &str {
        &self.proposed
    }

    fn build_import(&self, identifier: &str) -> String {
        Block::import(
            format!("{}:{}", self.domain_name, self.record.id),
            format!("{RECORD_RESOURCE}.{identifier}"),
        )
        .to_string()
    }

    fn build_resource(&self, identifier: &str) -> String {
        Block::resource(RECORD_RESOURCE, identifier, self.body()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::render_batch;
    use crate::model::RecordType;

    fn pending<'a>(record: &'a DnsRecord) -> RecordResource<'a> {
        RecordResource::new("example.com", "example_com", record)
    }

    #[test]
    fn test_apex_record_with_defaults() {
        let record = DnsRecord::new(4711, "example.com", RecordType::A, "192.0.2.10");
        let resource = pending(&record);

        assert_eq!(resource.proposed_identifier(), "example_com_a");
        assert_eq!(
            resource.build_import("example_com_a"),
            "import {\n    id = \"example.com:4711\"\n    to = inwx_nameserver_record.example_com_a\n}"
        );
        let expected = r#"resource "inwx_nameserver_record" "example_com_a" {
    domain = "example.com"
    type = "A"
    content = "192.0.2.10"
}"#;
        assert_eq!(resource.build_resource("example_com_a"), expected);
    }

    #[test]
    fn test_non_default_fields() {
        let record = DnsRecord::new(1, "mail.example.com", RecordType::Mx, "mx.example.net")
            .with_ttl(7200)
            .with_prio(10);
        let expected = r#"resource "inwx_nameserver_record" "example_com_mx_mail" {
    domain = "example.com"
    type = "MX"
    name = "mail.example.com"
    content = "mx.example.net"
    ttl = 7200
    prio = 10
}"#;
        assert_eq!(pending(&record).build_resource("example_com_mx_mail"), expected);
    }

    #[test]
    fn test_default_ttl_is_omitted() {
        let default_ttl =
            DnsRecord::new(1, "example.com", RecordType::A, "192.0.2.1").with_ttl(3600);
        let custom_ttl =
            DnsRecord::new(2, "example.com", RecordType::A, "192.0.2.1").with_ttl(7200);

        assert!(!pending(&default_ttl).build_resource("x").contains("ttl"));
        assert!(pending(&custom_ttl).build_resource("x").contains("    ttl = 7200\n"));
    }

    #[test]
    fn test_redirect_fields_in_canonical_order() {
        let mut record = DnsRecord::new(
            9,
            "go.example.com",
            RecordType::Url,
            "https://example.org",
        );
        record.url_redirect_type = Some("FRAME".to_string());
        record.url_redirect_title = Some("Example".to_string());
        record.url_redirect_description = Some("An example".to_string());
        record.url_redirect_keywords = Some("example, test".to_string());
        record.url_redirect_fav_icon = Some("https://example.org/favicon.ico".to_string());
        record.url_append = true;

        assert_eq!(
            pending(&record).body().keys(),
            vec![
                "domain",
                "type",
                "name",
                "content",
                "url_redirect_type",
                "url_redirect_title",
                "url_redirect_description",
                "url_redirect_keywords",
                "url_redirect_fav_icon",
                "url_append",
            ]
        );
        assert!(pending(&record).build_resource("r").contains("    url_append = true\n"));
    }

    #[test]
    fn test_unset_redirect_fields_are_omitted() {
        let mut record = DnsRecord::new(
            9,
            "go.example.com",
            RecordType::Url,
            "https://example.org",
        );
        record.url_redirect_type = Some("HEADER301".to_string());
        record.url_redirect_title = Some(String::new());

        let keys = pending(&record).body().keys().join(",");
        assert_eq!(keys, "domain,type,name,content,url_redirect_type");
    }

    #[test]
    fn test_txt_content_is_escaped() {
        let record = DnsRecord::new(
            1,
            "example.com",
            RecordType::Txt,
            r#"v=spf1 include:%{d}.spf.example.net "quoted" -all"#,
        );
        let resource = pending(&record).build_resource("example_com_txt_spf");
        assert!(resource.contains(
            r#"content = "v=spf1 include:%%{d}.spf.example.net \"quoted\" -all""#
        ));
    }

    #[test]
    fn test_same_name_records_are_numbered() {
        let records = [
            DnsRecord::new(1, "example.com", RecordType::Txt, "google-site-verification=a"),
            DnsRecord::new(2, "example.com", RecordType::Txt, "v=spf1 mx -all"),
            DnsRecord::new(3, "example.com", RecordType::Txt, "ms=ms12345"),
            DnsRecord::new(4, "example.com", RecordType::A, "192.0.2.1"),
        ];
        let batch: Vec<_> = records.iter().map(|r| pending(r)).collect();
        let rendered = render_batch(&batch);

        let identifiers: Vec<&str> = rendered.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(
            identifiers,
            vec![
                "example_com_txt",
                "example_com_txt_spf",
                "example_com_txt2",
                "example_com_a",
            ]
        );
        assert!(rendered[2].import.contains("id = \"example.com:3\""));
        assert!(rendered[2].import.contains("to = inwx_nameserver_record.example_com_txt2"));
    }
}
