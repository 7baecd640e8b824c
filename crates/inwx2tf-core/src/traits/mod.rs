//! Core traits for inwx2tf
//!
//! - [`RegistrarSource`]: Fetch domains, contacts and records from a registrar API

pub mod registrar_source;

pub use registrar_source::RegistrarSource;
