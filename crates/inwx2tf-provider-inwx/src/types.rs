//! Wire types for the domrobot JSON-RPC API
//!
//! The API is loose about scalar types: ids and flags arrive as numbers,
//! numeric strings or booleans depending on the method and account. Every
//! scalar is decoded through a lenient helper and converted into the core
//! model afterwards.

use inwx2tf_core::model::{
    Contact, DEFAULT_PRIO, DEFAULT_TTL, DnsRecord, Domain, DomainContacts, RecordType,
};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// `extra_data` key set for domains with WHOIS privacy
pub const WHOIS_PROTECTION_KEY: &str = "WHOIS-PROTECTION";

/// JSON-RPC request body
#[derive(Debug, Serialize)]
pub struct Request<'a> {
    pub method: &'a str,
    pub params: Value,
}

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(deserialize_with = "lenient_i64")]
    pub code: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub msg: String,
    #[serde(default, deserialize_with = "opt_lenient_string")]
    pub reason: Option<String>,
    #[serde(rename = "resData", default)]
    pub res_data: Value,
}

/// One page of a paged listing
#[derive(Debug)]
pub struct Page<T> {
    /// Total number of items across all pages
    pub count: usize,
    pub items: Vec<T>,
}

impl<T: DeserializeOwned> Page<T> {
    /// Parse `resData` of a paged listing; `key` names the item array
    ///
    /// The API omits the array when there are no items.
    pub fn from_res_data(res_data: Value, key: &str) -> serde_json::Result<Self> {
        let items = match res_data.get(key) {
            Some(Value::Null) | None => Vec::new(),
            Some(items) => serde_json::from_value(items.clone())?,
        };
        let count = res_data
            .get("count")
            .and_then(value_to_u64)
            .map(|c| c as usize)
            .unwrap_or(items.len());

        Ok(Self { count, items })
    }
}

/// Whether another page needs to be requested
pub fn has_more_pages(collected: usize, count: usize, last_page_len: usize) -> bool {
    last_page_len > 0 && collected < count
}

/// `account.login` result
#[derive(Debug, Default, Deserialize)]
pub struct LoginData {
    /// `"0"` when no second factor is required, otherwise the method name
    #[serde(default, deserialize_with = "lenient_string")]
    pub tfa: String,
}

impl LoginData {
    /// Parse `resData` of `account.login`
    ///
    /// A payload that does not decode is logged and treated as a login
    /// without a second factor; a locked session then fails on its first call.
    pub fn from_res_data(res_data: Value) -> Self {
        match serde_json::from_value(res_data) {
            Ok(login) => login,
            Err(e) => {
                tracing::warn!("Unexpected account.login result, assuming no 2FA: {}", e);
                Self::default()
            }
        }
    }

    pub fn requires_tfa(&self) -> bool {
        !self.tfa.is_empty() && self.tfa != "0"
    }
}

/// Entry of `contact.list`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactData {
    #[serde(default, deserialize_with = "opt_lenient_u64")]
    pub ro_id: Option<u64>,
    #[serde(default, deserialize_with = "opt_lenient_u64")]
    pub id: Option<u64>,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "opt_lenient_string")]
    pub org: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub street: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub city: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pc: String,
    #[serde(default, deserialize_with = "opt_lenient_string")]
    pub sp: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cc: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub voice: String,
    #[serde(default, deserialize_with = "opt_lenient_string")]
    pub fax: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "opt_lenient_string")]
    pub remarks: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub protection: bool,
}

impl ContactData {
    /// Convert into the model; `None` when the entry carries no id
    pub fn into_contact(self) -> Option<Contact> {
        let id = self.ro_id.or(self.id)?;
        Some(Contact {
            id,
            kind: self.kind,
            name: self.name,
            organization: self.org,
            street: self.street,
            city: self.city,
            postal_code: self.pc,
            state_province: self.sp,
            country_code: self.cc,
            phone: self.voice,
            fax: self.fax,
            email: self.email,
            remarks: self.remarks,
            whois_protection: self.protection,
        })
    }
}

/// Entry of `domain.list`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainData {
    #[serde(deserialize_with = "lenient_string")]
    pub domain: String,
    #[serde(default)]
    pub ns: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub period: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub renewal_mode: String,
    #[serde(default, deserialize_with = "opt_lenient_string")]
    pub transfer_mode: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub transfer_lock: bool,
    #[serde(default, deserialize_with = "opt_lenient_u64")]
    pub registrant: Option<u64>,
    #[serde(default, deserialize_with = "opt_lenient_u64")]
    pub admin: Option<u64>,
    #[serde(default, deserialize_with = "opt_lenient_u64")]
    pub tech: Option<u64>,
    #[serde(default, deserialize_with = "opt_lenient_u64")]
    pub billing: Option<u64>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub with_privacy: bool,
}

impl DomainData {
    /// Convert into the model
    ///
    /// A missing contact role becomes id `0`, which no contact handle has;
    /// rendering then reports it as an unknown contact for this domain only.
    pub fn into_domain(self) -> Domain {
        let mut extra_data = BTreeMap::new();
        if self.with_privacy {
            extra_data.insert(WHOIS_PROTECTION_KEY.to_string(), "1".to_string());
        }

        Domain {
            name: self.domain,
            nameservers: self.ns,
            period: self.period,
            renewal_mode: self.renewal_mode,
            transfer_mode: self.transfer_mode,
            transfer_lock: self.transfer_lock,
            contacts: DomainContacts {
                admin: self.admin.unwrap_or_default(),
                billing: self.billing.unwrap_or_default(),
                registrant: self.registrant.unwrap_or_default(),
                tech: self.tech.unwrap_or_default(),
            },
            extra_data,
        }
    }
}

/// `nameserver.info` result
#[derive(Debug, Deserialize)]
pub struct NameserverInfo {
    #[serde(default)]
    pub record: Vec<RecordData>,
}

/// Entry of `nameserver.info`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordData {
    #[serde(deserialize_with = "lenient_u64")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub record_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,
    #[serde(default, deserialize_with = "opt_lenient_u64")]
    pub ttl: Option<u64>,
    #[serde(default, deserialize_with = "opt_lenient_u64")]
    pub prio: Option<u64>,
    #[serde(default, deserialize_with = "opt_lenient_string")]
    pub url_redirect_type: Option<String>,
    #[serde(default, deserialize_with = "opt_lenient_string")]
    pub url_redirect_title: Option<String>,
    #[serde(default, deserialize_with = "opt_lenient_string")]
    pub url_redirect_description: Option<String>,
    #[serde(default, deserialize_with = "opt_lenient_string")]
    pub url_redirect_keywords: Option<String>,
    #[serde(default, deserialize_with = "opt_lenient_string")]
    pub url_redirect_fav_icon: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub url_append: bool,
}

impl RecordData {
    pub fn into_record(self) -> DnsRecord {
        DnsRecord {
            id: self.id,
            name: self.name,
            record_type: RecordType::from(self.record_type.as_str()),
            content: self.content,
            ttl: self.ttl.map(saturate_u32).unwrap_or(DEFAULT_TTL),
            prio: self.prio.map(saturate_u32).unwrap_or(DEFAULT_PRIO),
            url_redirect_type: self.url_redirect_type,
            url_redirect_title: self.url_redirect_title,
            url_redirect_description: self.url_redirect_description,
            url_redirect_keywords: self.url_redirect_keywords,
            url_redirect_fav_icon: self.url_redirect_fav_icon,
            url_append: self.url_append,
        }
    }
}

fn saturate_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn value_to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    value_to_u64(&value)
        .ok_or_else(|| de::Error::custom(format!("expected a non-negative integer, got {value}")))
}

fn opt_lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        _ => value_to_u64(&value).map(Some).ok_or_else(|| {
            de::Error::custom(format!("expected a non-negative integer, got {value}"))
        }),
    }
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| de::Error::custom(format!("expected an integer, got {value}")))
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        _ => false,
    })
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_to_string(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn opt_lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(scalar_to_string(Value::deserialize(deserializer)?))
}
