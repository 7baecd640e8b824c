//! Test doubles and common utilities for export contract tests
//!
//! This module provides an in-memory registrar that serves fixed data and
//! can be told to fail specific calls.

#![allow(dead_code)]

use inwx2tf_core::error::{Error, Result};
use inwx2tf_core::model::{Contact, DnsRecord, Domain, DomainContacts, RecordType};
use inwx2tf_core::traits::RegistrarSource;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared call counters, so a test can keep a handle after boxing the source
#[derive(Default)]
struct Calls {
    login: AtomicUsize,
    logout: AtomicUsize,
    list_contacts: AtomicUsize,
    list_domains: AtomicUsize,
    records_requested: Mutex<Vec<String>>,
}

/// A registrar that serves fixed data
pub struct MockRegistrarSource {
    contacts: Vec<Contact>,
    domains: Vec<Domain>,
    records: HashMap<String, Vec<DnsRecord>>,
    fail_login: bool,
    fail_contacts: bool,
    fail_domains: bool,
    fail_logout: bool,
    fail_records_for: HashSet<String>,
    calls: Arc<Calls>,
}

impl MockRegistrarSource {
    pub fn new() -> Self {
        Self {
            contacts: Vec::new(),
            domains: Vec::new(),
            records: HashMap::new(),
            fail_login: false,
            fail_contacts: false,
            fail_domains: false,
            fail_logout: false,
            fail_records_for: HashSet::new(),
            calls: Arc::new(Calls::default()),
        }
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contacts.push(contact);
        self
    }

    pub fn with_domain(mut self, domain: Domain, records: Vec<DnsRecord>) -> Self {
        self.records.insert(domain.name.clone(), records);
        self.domains.push(domain);
        self
    }

    pub fn failing_login(mut self) -> Self {
        self.fail_login = true;
        self
    }

    pub fn failing_contacts(mut self) -> Self {
        self.fail_contacts = true;
        self
    }

    pub fn failing_domains(mut self) -> Self {
        self.fail_domains = true;
        self
    }

    pub fn failing_logout(mut self) -> Self {
        self.fail_logout = true;
        self
    }

    pub fn failing_records_for(mut self, domain: &str) -> Self {
        self.fail_records_for.insert(domain.to_string());
        self
    }

    /// Create a MockRegistrarSource with the same data, sharing counters with `other`
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            contacts: other.contacts.clone(),
            domains: other.domains.clone(),
            records: other.records.clone(),
            fail_login: other.fail_login,
            fail_contacts: other.fail_contacts,
            fail_domains: other.fail_domains,
            fail_logout: other.fail_logout,
            fail_records_for: other.fail_records_for.clone(),
            calls: Arc::clone(&other.calls),
        }
    }

    /// Get the number of times login() was called
    pub fn login_call_count(&self) -> usize {
        self.calls.login.load(Ordering::SeqCst)
    }

    /// Get the number of times logout() was called
    pub fn logout_call_count(&self) -> usize {
        self.calls.logout.load(Ordering::SeqCst)
    }

    /// Get the number of times list_domains() was called
    pub fn list_domains_call_count(&self) -> usize {
        self.calls.list_domains.load(Ordering::SeqCst)
    }

    /// Get the domains list_records() was called for, in call order
    pub fn records_requested(&self) -> Vec<String> {
        self.calls.records_requested.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RegistrarSource for MockRegistrarSource {
    async fn login(&self) -> Result<()> {
        self.calls.login.fetch_add(1, Ordering::SeqCst);
        if self.fail_login {
            return Err(Error::auth("invalid credentials"));
        }
        Ok(())
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        self.calls.list_contacts.fetch_add(1, Ordering::SeqCst);
        if self.fail_contacts {
            return Err(Error::source("mock", "contact.list failed"));
        }
        Ok(self.contacts.clone())
    }

    async fn list_domains(&self) -> Result<Vec<Domain>> {
        self.calls.list_domains.fetch_add(1, Ordering::SeqCst);
        if self.fail_domains {
            return Err(Error::source("mock", "domain.list failed"));
        }
        Ok(self.domains.clone())
    }

    async fn list_records(&self, domain: &str) -> Result<Vec<DnsRecord>> {
        self.calls
            .records_requested
            .lock()
            .unwrap()
            .push(domain.to_string());
        if self.fail_records_for.contains(domain) {
            return Err(Error::source("mock", format!("nameserver.info failed for {domain}")));
        }
        Ok(self.records.get(domain).cloned().unwrap_or_default())
    }

    async fn logout(&self) -> Result<()> {
        self.calls.logout.fetch_add(1, Ordering::SeqCst);
        if self.fail_logout {
            return Err(Error::http("connection reset"));
        }
        Ok(())
    }

    fn source_name(&self) -> &'static str {
        "mock"
    }
}

/// A contact handle with plausible defaults
pub fn contact(id: u64, name: &str) -> Contact {
    Contact {
        id,
        kind: "PERSON".to_string(),
        name: name.to_string(),
        organization: None,
        street: "Musterstrasse 1".to_string(),
        city: "Karlsruhe".to_string(),
        postal_code: "76133".to_string(),
        state_province: None,
        country_code: "DE".to_string(),
        phone: "+49.7211234567".to_string(),
        fax: None,
        email: "hostmaster@example.com".to_string(),
        remarks: None,
        whois_protection: false,
    }
}

/// A domain whose four roles all point at `contact_id`
pub fn domain(name: &str, nameservers: &[&str], contact_id: u64) -> Domain {
    Domain {
        name: name.to_string(),
        nameservers: nameservers.iter().map(|ns| ns.to_string()).collect(),
        period: "1Y".to_string(),
        renewal_mode: "AUTORENEW".to_string(),
        transfer_mode: None,
        transfer_lock: true,
        contacts: DomainContacts {
            admin: contact_id,
            billing: contact_id,
            registrant: contact_id,
            tech: contact_id,
        },
        extra_data: BTreeMap::new(),
    }
}

/// Nameservers that select a domain for export
pub const MANAGED: &[&str] = &["ns.inwx.de", "ns2.inwx.de", "ns3.inwx.eu"];

/// Nameservers of a domain hosted elsewhere
pub const EXTERNAL: &[&str] = &["ns1.example.net", "ns2.example.net"];

/// SOA plus an apex A and a www CNAME
pub fn basic_records(domain: &str) -> Vec<DnsRecord> {
    vec![
        DnsRecord::new(
            1,
            domain,
            RecordType::Soa,
            "ns.inwx.de hostmaster.inwx.de 2024010101 10800 3600 604800 3600",
        )
        .with_ttl(86400),
        DnsRecord::new(2, domain, RecordType::A, "192.0.2.10"),
        DnsRecord::new(3, format!("www.{domain}"), RecordType::Cname, domain),
    ]
}

/// Read one output file
pub fn read(dir: &Path, file_name: &str) -> String {
    std::fs::read_to_string(dir.join(file_name))
        .unwrap_or_else(|e| panic!("{file_name} should exist: {e}"))
}

/// Sorted names of the files in a directory
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect();
    names.sort();
    names
}
