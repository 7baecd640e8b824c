//! Minimal domrobot JSON-RPC client
//!
//! One `POST` per call. The session lives in the client's cookie store, so
//! the same client must be used from `account.login` to `account.logout`.

use crate::types::{Envelope, Page, Request, has_more_pages};
use inwx2tf_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Result code of a successful call
pub const CODE_SUCCESS: i64 = 1000;

/// Items requested per page from listing methods
pub const PAGE_LIMIT: usize = 100;

/// Source name used in errors
const SOURCE: &str = "inwx";

pub struct RpcClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RpcClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .cookie_store(true)
            .user_agent(concat!("inwx2tf/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Call `method` and return `resData`
    ///
    /// # Errors
    ///
    /// - `Error::Http`: Transport failure or non-2xx status
    /// - `Error::Source`: The API answered with a code other than 1000
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        tracing::debug!("Calling {}", method);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&Request { method, params })
            .send()
            .await
            .map_err(|e| Error::http(format!("{} request failed: {}", method, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(match status.as_u16() {
                429 => Error::http(format!(
                    "{}: rate limit exceeded. Status: {}",
                    method, status
                )),
                500..=599 => Error::http(format!(
                    "{}: INWX server error: {}",
                    method, status
                )),
                _ => Error::http(format!("{} failed with status {}", method, status)),
            });
        }

        let envelope: Envelope = response.json().await.map_err(|e| {
            Error::source(SOURCE, format!("{}: failed to parse response: {}", method, e))
        })?;

        check_envelope(method, envelope)
    }

    /// Call a paged listing method until `count` items are collected
    ///
    /// `key` names the item array inside `resData` (e.g. `domain`).
    pub async fn list_all<T: DeserializeOwned>(&self, method: &str, key: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page_number = 1;

        loop {
            let res_data = self
                .call(method, json!({ "page": page_number, "pagelimit": PAGE_LIMIT }))
                .await?;
            let page: Page<T> = Page::from_res_data(res_data, key).map_err(|e| {
                Error::source(SOURCE, format!("{}: unexpected {} entry: {}", method, key, e))
            })?;

            let page_len = page.items.len();
            items.extend(page.items);
            tracing::debug!(
                "{} page {}: {} of {} item(s)",
                method,
                page_number,
                items.len(),
                page.count
            );

            if !has_more_pages(items.len(), page.count, page_len) {
                return Ok(items);
            }
            page_number += 1;
        }
    }
}

fn check_envelope(method: &str, envelope: Envelope) -> Result<Value> {
    if envelope.code != CODE_SUCCESS {
        let detail = match envelope.reason {
            Some(reason) if !reason.is_empty() => format!("{} ({})", envelope.msg, reason),
            _ => envelope.msg,
        };
        return Err(Error::source(
            SOURCE,
            format!("{} failed. Code: {} Message: {}", method, envelope.code, detail),
        ));
    }
    Ok(envelope.res_data)
}
