//! Resource identifier derivation
//!
//! Terraform resource names are derived from domain, contact and record
//! names. Derived identifiers are proposals only: two sources may propose the
//! same identifier, and [`crate::collision`] turns proposals into unique names.

use crate::model::DnsRecord;

/// Derive an identifier from a name
///
/// Lower-cases the input, replaces every character that is not a letter,
/// ASCII digit, `_` or `-` with `_`, then collapses `__` into `_` in a single,
/// non-iterated pass (so `___` becomes `__`).
///
/// ```
/// use inwx2tf_core::identifier::derive_identifier;
///
/// assert_eq!(derive_identifier("Example.COM"), "example_com");
/// assert_eq!(derive_identifier("mail.müller.de"), "mail_müller_de");
/// ```
pub fn derive_identifier(name: &str) -> String {
    let replaced: String = name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphabetic() || c.is_ascii_digit() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    replaced.replace("__", "_")
}

/// Derive the proposed identifier of a record
///
/// The result is `<domain_identifier>_<type>[_<residual>][_spf]` where the
/// residual is the record name's identifier with the derived identifier of
/// `domain_name` removed. Apex records therefore have no residual.
/// `domain_identifier` is the final identifier of the owning domain
/// resource; it only differs from the derived one when two domains collide.
/// TXT records carrying an SPF policy get a trailing `_spf`.
pub fn record_identifier(domain_name: &str, domain_identifier: &str, record: &DnsRecord) -> String {
    let name_identifier = derive_identifier(&record.name);
    let stripped = name_identifier.replacen(&derive_identifier(domain_name), "", 1);
    let residual = stripped.strip_suffix('_').unwrap_or(&stripped);

    let record_type = record.record_type.as_str().to_lowercase();
    let mut segments = vec![domain_identifier, record_type.as_str()];
    if !residual.is_empty() {
        segments.push(residual);
    }
    if record.is_spf() {
        segments.push("spf");
    }
    segments.join("_")
}
