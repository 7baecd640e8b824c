//! Time-based one-time passwords (RFC 6238) for `account.unlock`
//!
//! INWX uses the common authenticator-app parameters: HMAC-SHA1, a 30 second
//! step and 6 digits.

use data_encoding::BASE32_NOPAD;
use hmac::{Hmac, Mac};
use inwx2tf_core::{Error, Result};
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};

const STEP_SECS: u64 = 30;
const DIGITS: u32 = 6;

/// Code for the current time
pub fn current_code(secret: &str) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::auth(format!("System clock is before the Unix epoch: {}", e)))?;
    code_at(secret, now.as_secs())
}

/// Code for a given Unix time
///
/// `secret` is base32; spaces, padding and lower case are accepted.
pub fn code_at(secret: &str, unix_time: u64) -> Result<String> {
    let key = decode_secret(secret)?;
    let counter = unix_time / STEP_SECS;

    let mut mac = Hmac::<Sha1>::new_from_slice(&key)
        .map_err(|e| Error::auth(format!("Invalid 2FA secret: {}", e)))?;
    mac.update(&counter.to_be_bytes());
    let hash = mac.finalize().into_bytes();

    // Dynamic truncation
    let offset = (hash[hash.len() - 1] & 0x0f) as usize;
    let binary = u32::from_be_bytes([
        hash[offset] & 0x7f,
        hash[offset + 1],
        hash[offset + 2],
        hash[offset + 3],
    ]);

    Ok(format!(
        "{:0width$}",
        binary % 10u32.pow(DIGITS),
        width = DIGITS as usize
    ))
}

fn decode_secret(secret: &str) -> Result<Vec<u8>> {
    let normalized: String = secret
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if normalized.is_empty() {
        return Err(Error::auth("2FA secret is empty"));
    }

    BASE32_NOPAD
        .decode(normalized.as_bytes())
        .map_err(|_| Error::auth("2FA secret is not valid base32"))
}
