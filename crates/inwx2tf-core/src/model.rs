//! Registrar data model
//!
//! Value objects produced by a [`RegistrarSource`](crate::traits::RegistrarSource)
//! and consumed by the renderers. They are built once per run and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// TTL the registrar applies when a record does not set one
pub const DEFAULT_TTL: u32 = 3600;

/// Priority the registrar applies when a record does not set one
pub const DEFAULT_PRIO: u32 = 0;

/// Nameserver that marks a domain as delegated to the registrar's DNS
pub const DEFAULT_SENTINEL_NAMESERVER: &str = "ns.inwx.de";

/// Registry id of a contact handle
pub type ContactId = u64;

/// A registered domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Domain name (e.g. "example.com")
    pub name: String,

    /// Nameservers in registry order
    pub nameservers: Vec<String>,

    /// Registration period (e.g. "1Y")
    pub period: String,

    /// Renewal mode (AUTORENEW, AUTODELETE, AUTOEXPIRE)
    pub renewal_mode: String,

    /// Transfer mode (DEFAULT, AUTOAPPROVE, AUTODENY)
    #[serde(default)]
    pub transfer_mode: Option<String>,

    /// Whether the registrar transfer lock is set
    pub transfer_lock: bool,

    /// Contact handles by role
    pub contacts: DomainContacts,

    /// Additional registry data (e.g. `WHOIS-PROTECTION`)
    #[serde(default)]
    pub extra_data: BTreeMap<String, String>,
}

impl Domain {
    /// Whether the domain's nameservers include the sentinel nameserver
    ///
    /// Only such domains are exported.
    pub fn is_managed_by(&self, sentinel_nameserver: &str) -> bool {
        self.nameservers.iter().any(|ns| ns == sentinel_nameserver)
    }
}

/// Contact handles attached to a domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainContacts {
    pub admin: ContactId,
    pub billing: ContactId,
    pub registrant: ContactId,
    pub tech: ContactId,
}

impl DomainContacts {
    /// Contact ids paired with their role names, in rendering order
    pub fn roles(&self) -> [(&'static str, ContactId); 4] {
        [
            ("admin", self.admin),
            ("billing", self.billing),
            ("registrant", self.registrant),
            ("tech", self.tech),
        ]
    }
}

/// A contact handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Registry id
    pub id: ContactId,

    /// Contact type (PERSON, ORG, ROLE)
    pub kind: String,

    pub name: String,

    #[serde(default)]
    pub organization: Option<String>,

    pub street: String,

    pub city: String,

    pub postal_code: String,

    #[serde(default)]
    pub state_province: Option<String>,

    /// ISO 3166 country code
    pub country_code: String,

    pub phone: String,

    #[serde(default)]
    pub fax: Option<String>,

    pub email: String,

    #[serde(default)]
    pub remarks: Option<String>,

    /// Whether WHOIS protection is enabled for this handle
    #[serde(default)]
    pub whois_protection: bool,
}

/// A nameserver record of a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Registry id
    pub id: u64,

    /// Record name; equals the domain name for apex records
    pub name: String,

    pub record_type: RecordType,

    pub content: String,

    #[serde(default = "default_ttl")]
    pub ttl: u32,

    #[serde(default)]
    pub prio: u32,

    #[serde(default)]
    pub url_redirect_type: Option<String>,

    #[serde(default)]
    pub url_redirect_title: Option<String>,

    #[serde(default)]
    pub url_redirect_description: Option<String>,

    #[serde(default)]
    pub url_redirect_keywords: Option<String>,

    #[serde(default)]
    pub url_redirect_fav_icon: Option<String>,

    #[serde(default)]
    pub url_append: bool,
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

impl DnsRecord {
    /// Create a record with default TTL/priority and no redirect fields
    pub fn new(
        id: u64,
        name: impl Into<String>,
        record_type: RecordType,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            record_type,
            content: content.into(),
            ttl: DEFAULT_TTL,
            prio: DEFAULT_PRIO,
            url_redirect_type: None,
            url_redirect_title: None,
            url_redirect_description: None,
            url_redirect_keywords: None,
            url_redirect_fav_icon: None,
            url_append: false,
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the priority
    pub fn with_prio(mut self, prio: u32) -> Self {
        self.prio = prio;
        self
    }

    /// Whether this is a TXT record carrying an SPF policy
    pub fn is_spf(&self) -> bool {
        self.record_type == RecordType::Txt && self.content.contains("v=spf1")
    }
}

/// DNS record types known to the registrar
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    A,
    Aaaa,
    Afsdb,
    Alias,
    Caa,
    Cert,
    Cname,
    Hinfo,
    Https,
    Ipseckey,
    Key,
    Loc,
    Mx,
    Naptr,
    Ns,
    Openpgpkey,
    Ptr,
    Rp,
    Smimea,
    Soa,
    Srv,
    Sshfp,
    Svcb,
    Tlsa,
    Txt,
    Uri,
    /// URL redirect (registrar specific)
    Url,
    /// Anything the registrar adds later
    Other(String),
}

impl RecordType {
    /// Wire name, upper case
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Afsdb => "AFSDB",
            RecordType::Alias => "ALIAS",
            RecordType::Caa => "CAA",
            RecordType::Cert => "CERT",
            RecordType::Cname => "CNAME",
            RecordType::Hinfo => "HINFO",
            RecordType::Https => "HTTPS",
            RecordType::Ipseckey => "IPSECKEY",
            RecordType::Key => "KEY",
            RecordType::Loc => "LOC",
            RecordType::Mx => "MX",
            RecordType::Naptr => "NAPTR",
            RecordType::Ns => "NS",
            RecordType::Openpgpkey => "OPENPGPKEY",
            RecordType::Ptr => "PTR",
            RecordType::Rp => "RP",
            RecordType::Smimea => "SMIMEA",
            RecordType::Soa => "SOA",
            RecordType::Srv => "SRV",
            RecordType::Sshfp => "SSHFP",
            RecordType::Svcb => "SVCB",
            RecordType::Tlsa => "TLSA",
            RecordType::Txt => "TXT",
            RecordType::Uri => "URI",
            RecordType::Url => "URL",
            RecordType::Other(other) => other,
        }
    }

    /// SOA records are generated by the registry and never exported
    pub fn is_registry_managed(&self) -> bool {
        *self == RecordType::Soa
    }
}

impl From<&str> for RecordType {
    fn from(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "AFSDB" => RecordType::Afsdb,
            "ALIAS" => RecordType::Alias,
            "CAA" => RecordType::Caa,
            "CERT" => RecordType::Cert,
            "CNAME" => RecordType::Cname,
            "HINFO" => RecordType::Hinfo,
            "HTTPS" => RecordType::Https,
            "IPSECKEY" => RecordType::Ipseckey,
            "KEY" => RecordType::Key,
            "LOC" => RecordType::Loc,
            "MX" => RecordType::Mx,
            "NAPTR" => RecordType::Naptr,
            "NS" => RecordType::Ns,
            "OPENPGPKEY" => RecordType::Openpgpkey,
            "PTR" => RecordType::Ptr,
            "RP" => RecordType::Rp,
            "SMIMEA" => RecordType::Smimea,
            "SOA" => RecordType::Soa,
            "SRV" => RecordType::Srv,
            "SSHFP" => RecordType::Sshfp,
            "SVCB" => RecordType::Svcb,
            "TLSA" => RecordType::Tlsa,
            "TXT" => RecordType::Txt,
            "URI" => RecordType::Uri,
            "URL" => RecordType::Url,
            other => RecordType::Other(other.to_string()),
        }
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        RecordType::from(value.as_str())
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
