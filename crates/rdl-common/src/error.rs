//! Error types for the RDL pipeline
//!
//! The variants mirror how each failure is handled at runtime: `Config` and
//! session acquisition abort the run, everything else is logged at the
//! narrowest scope (per table, per file, per scratch entry) and the run
//! continues.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for RDL operations
pub type Result<T> = std::result::Result<T, EtlError>;

/// Main error type for the RDL pipeline
#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Fatal: schema source or connection settings missing/malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Declared type or engine type outside the closed mapping set.
    /// Reached only through a catalog defect.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Table creation failed against the target store.
    #[error("Failed to provision table {table}: {message}")]
    Provisioning { table: String, message: String },

    /// File read or bulk write failed for one routed file.
    #[error("Failed to load {path} into {table}: {message}")]
    Load {
        table: String,
        path: PathBuf,
        message: String,
    },

    /// A scratch entry could not be removed.
    #[error("Failed to remove scratch entry {path}: {message}")]
    Cleanup { path: PathBuf, message: String },

    #[error("Database error: {0}")]
    Database(String),
}

impl EtlError {
    /// Provisioning failure with table context
    pub fn provisioning(table: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Provisioning {
            table: table.into(),
            message: message.to_string(),
        }
    }

    /// Load failure with file and table context
    pub fn load(
        table: impl Into<String>,
        path: impl Into<PathBuf>,
        message: impl std::fmt::Display,
    ) -> Self {
        Self::Load {
            table: table.into(),
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Whether this error aborts the run (everything else is logged and
    /// the run moves on to the next table, file, or scratch entry).
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
