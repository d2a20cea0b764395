//! Execution-engine column types and cell coercion
//!
//! [`EngineType`] is the closed set of column types the load path
//! understands. Declared type names from the schema catalog resolve into it,
//! and each variant maps exhaustively onto a target-store column type, so an
//! engine type added without a store mapping fails to compile rather than
//! erroring at runtime.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rdl_common::{EtlError, Result};
use std::str::FromStr;
use thiserror::Error;

/// Column types understood by the load engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineType {
    Text,
    Integer,
    Timestamp,
    Float,
}

impl EngineType {
    /// Resolve a declared type name from the schema catalog.
    ///
    /// Exact lookup over the recognized spellings; an empty marker defaults
    /// to text. Anything else is a catalog defect and a hard stop.
    pub fn from_declared(declared: &str) -> Result<Self> {
        match declared {
            "string" | "" => Ok(Self::Text),
            "integer" => Ok(Self::Integer),
            "timestamp" => Ok(Self::Timestamp),
            "float" => Ok(Self::Float),
            other => Err(EtlError::UnsupportedType(other.to_string())),
        }
    }

    /// Target-store column type for this engine type.
    ///
    /// DECIMAL(12,2) is a policy choice for currency-like float data, not a
    /// general float representation.
    pub fn store_type(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Timestamp => "TIMESTAMP",
            Self::Float => "DECIMAL(12,2)",
        }
    }

    /// Coerce one raw delimited field into a typed cell.
    ///
    /// Every column is nullable; an empty field reads as NULL. A value that
    /// cannot be coerced is reported to the caller, which fails the whole
    /// file rather than the single row.
    pub fn parse_cell(self, raw: &str) -> std::result::Result<Cell, CellError> {
        if raw.is_empty() {
            return Ok(Cell::Null);
        }
        match self {
            Self::Text => Ok(Cell::Text(raw.to_string())),
            Self::Integer => raw
                .parse::<i32>()
                .map(Cell::Integer)
                .map_err(|_| CellError::new(raw, self)),
            Self::Timestamp => parse_timestamp(raw)
                .map(Cell::Timestamp)
                .ok_or_else(|| CellError::new(raw, self)),
            Self::Float => BigDecimal::from_str(raw)
                .map(Cell::Float)
                .map_err(|_| CellError::new(raw, self)),
        }
    }
}

impl std::fmt::Display for EngineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineType::Text => write!(f, "text"),
            EngineType::Integer => write!(f, "integer"),
            EngineType::Timestamp => write!(f, "timestamp"),
            EngineType::Float => write!(f, "float"),
        }
    }
}

/// One typed value read from a delimited file
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Text(String),
    Integer(i32),
    Timestamp(NaiveDateTime),
    Float(BigDecimal),
}

/// A raw field that cannot be coerced to its declared engine type
#[derive(Error, Debug)]
#[error("cannot read {value:?} as {engine_type}")]
pub struct CellError {
    pub value: String,
    pub engine_type: EngineType,
}

impl CellError {
    fn new(value: &str, engine_type: EngineType) -> Self {
        Self {
            value: value.to_string(),
            engine_type,
        }
    }
}

/// Timestamps arrive as `YYYY-MM-DD HH:MM:SS` with optional fractional
/// seconds, or as a bare date (read as midnight).
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(ts);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}
