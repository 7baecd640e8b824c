//! Contract Test: Deterministic Output
//!
//! This test verifies that running the export twice against the same
//! account produces byte-identical files.
//!
//! Constraints verified:
//! - Identifiers depend only on names and listing order
//! - Collision suffixes are stable between runs
//! - A rerun replaces the previous output completely
//!
//! If this test fails, `terraform plan` shows spurious renames after a rerun.

mod common;

use common::*;
use inwx2tf_core::model::{DnsRecord, RecordType};
use inwx2tf_core::{ExportConfig, Exporter};
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::tempdir;

fn account() -> MockRegistrarSource {
    let txt_records = vec![
        DnsRecord::new(1, "example.com", RecordType::Txt, "google-site-verification=abc"),
        DnsRecord::new(2, "example.com", RecordType::Txt, "v=spf1 mx -all"),
        DnsRecord::new(3, "example.com", RecordType::Txt, "ms=ms12345"),
        DnsRecord::new(4, "_dmarc.example.com", RecordType::Txt, "v=DMARC1; p=none"),
        DnsRecord::new(5, "example.com", RecordType::Mx, "mx1.example.net").with_prio(10),
        DnsRecord::new(6, "example.com", RecordType::Mx, "mx2.example.net").with_prio(20),
        DnsRecord::new(7, "*.example.com", RecordType::A, "192.0.2.1"),
        DnsRecord::new(8, "example.com", RecordType::A, "192.0.2.2"),
    ];

    MockRegistrarSource::new()
        .with_contact(contact(100, "Jane Doe"))
        .with_contact(contact(101, "Jane Doe"))
        .with_domain(domain("example.com", MANAGED, 101), txt_records)
        .with_domain(domain("example.org", MANAGED, 100), basic_records("example.org"))
}

async fn export_into(dir: &Path) -> BTreeMap<String, String> {
    Exporter::new(
        Box::new(account()),
        ExportConfig::default().with_output_dir(dir),
    )
    .expect("exporter construction succeeds")
    .run()
    .await
    .expect("export succeeds");

    file_names(dir)
        .into_iter()
        .map(|name| {
            let contents = read(dir, &name);
            (name, contents)
        })
        .collect()
}

#[tokio::test]
async fn rerun_produces_identical_files() {
    let dir = tempdir().unwrap();

    let first = export_into(dir.path()).await;
    let second = export_into(dir.path()).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn separate_directories_produce_identical_files() {
    let first_dir = tempdir().unwrap();
    let second_dir = tempdir().unwrap();

    let first = export_into(first_dir.path()).await;
    let second = export_into(second_dir.path()).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn collision_suffixes_follow_listing_order() {
    let dir = tempdir().unwrap();

    let report = Exporter::new(
        Box::new(account()),
        ExportConfig::default().with_output_dir(dir.path()),
    )
    .unwrap()
    .run()
    .await
    .unwrap();

    let contacts: Vec<&str> = report
        .contacts
        .iter()
        .map(|c| c.rendered.identifier.as_str())
        .collect();
    assert_eq!(contacts, vec!["jane_doe", "jane_doe2"]);

    let records: Vec<&str> = report.exported[0]
        .records
        .iter()
        .map(|r| r.identifier.as_str())
        .collect();
    assert_eq!(
        records,
        vec![
            "example_com_txt",
            "example_com_txt_spf",
            "example_com_txt2",
            "example_com_txt__dmarc",
            "example_com_mx",
            "example_com_mx2",
            "example_com_a",
            "example_com_a2",
        ]
    );

    // Domain contacts point at the second handle with the same name
    let domain_file = read(dir.path(), "example.com.tf");
    assert!(domain_file.contains("        admin = inwx_domain_contact.jane_doe2.id\n"));
}
