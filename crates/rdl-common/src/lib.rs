//! RDL Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging for the RDL workspace.
//!
//! # Overview
//!
//! This crate provides the functionality used by every RDL workspace member:
//!
//! - **Error Handling**: the [`EtlError`] taxonomy and [`Result`] alias
//! - **Logging**: per-run log file setup backed by `tracing`
//!
//! # Example
//!
//! ```no_run
//! use rdl_common::{EtlError, Result};
//!
//! fn table_or_err(name: &str) -> Result<String> {
//!     if name.is_empty() {
//!         return Err(EtlError::Config("empty table name".to_string()));
//!     }
//!     Ok(name.to_string())
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{EtlError, Result};
