//! Error types for inwx2tf
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for inwx2tf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for inwx2tf
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or rejected credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Registrar API errors (non-success result codes, malformed payloads)
    #[error("Registrar error ({source_name}): {message}")]
    Source {
        /// Registrar source name
        source_name: String,
        /// Error message
        message: String,
    },

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// A domain references a contact that is not in the contact map
    #[error("Domain {domain} references unknown {role} contact {contact_id}")]
    UnknownContact {
        /// Domain name
        domain: String,
        /// Contact role on the domain (admin, billing, registrant, tech)
        role: &'static str,
        /// Registry id of the missing contact
        contact_id: u64,
    },

    /// Output directory or file errors
    #[error("Output error: {0}")]
    Output(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a registrar source error
    pub fn source(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Source {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an unknown contact error
    pub fn unknown_contact(domain: impl Into<String>, role: &'static str, contact_id: u64) -> Self {
        Self::UnknownContact {
            domain: domain.into(),
            role,
            contact_id,
        }
    }

    /// Create an output error
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }
}
