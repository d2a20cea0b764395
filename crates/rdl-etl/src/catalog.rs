//! Schema catalog loading and table descriptors
//!
//! The catalog is a JSON document mapping table names to column definitions:
//!
//! ```json
//! {
//!     "orders": [
//!         { "column_name": "order_id", "data_type": "integer", "column_position": 1 },
//!         { "column_name": "order_date", "data_type": "timestamp", "column_position": 2 }
//!     ]
//! }
//! ```
//!
//! It is loaded once at startup and stays immutable for the run. Column
//! order everywhere downstream (engine schema, CREATE statement, delimited
//! file) is `column_position` order, never declaration order.

use crate::engine::EngineType;
use rdl_common::{EtlError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// One column as declared in the schema source
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDef {
    pub column_name: String,
    /// Declared abstract type; empty or absent defaults to string
    #[serde(default)]
    pub data_type: String,
    pub column_position: u32,
}

/// One column resolved to its engine type
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub engine_type: EngineType,
}

/// A table name plus its ordered, type-resolved columns
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub table: String,
    pub fields: Vec<Field>,
}

/// All per-table column definitions, keyed by table name
#[derive(Debug, Default)]
pub struct SchemaCatalog {
    tables: HashMap<String, Vec<ColumnDef>>,
}

impl SchemaCatalog {
    /// Load the catalog from a JSON schema source.
    ///
    /// An unreadable or malformed document is a fatal configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            EtlError::Config(format!("cannot read schema source {}: {}", path.display(), e))
        })?;
        let tables: HashMap<String, Vec<ColumnDef>> =
            serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| {
                EtlError::Config(format!(
                    "malformed schema source {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Ok(Self { tables })
    }

    /// Whether a schema exists for the given table
    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Number of tables in the catalog
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Table names, in no particular order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Build the ordered, type-resolved descriptor for a table.
    ///
    /// Columns are sorted by `column_position`; declared types resolve
    /// through the engine's closed mapping, so a bad type name in the
    /// catalog surfaces here.
    pub fn table_schema(&self, table: &str) -> Result<TableSchema> {
        let columns = self
            .tables
            .get(table)
            .ok_or_else(|| EtlError::Config(format!("no schema for table {table}")))?;

        let mut columns: Vec<&ColumnDef> = columns.iter().collect();
        columns.sort_by_key(|c| c.column_position);

        let fields = columns
            .into_iter()
            .map(|c| {
                Ok(Field {
                    name: c.column_name.clone(),
                    engine_type: EngineType::from_declared(&c.data_type)?,
                })
            })
            .collect::<Result<Vec<Field>>>()?;

        Ok(TableSchema {
            table: table.to_string(),
            fields,
        })
    }
}
