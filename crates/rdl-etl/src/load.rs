//! Load executor
//!
//! One routed file at a time: resolve its schema, make sure its table
//! exists, read the file as headerless delimited text strictly under the
//! schema, and append the rows to the raw namespace through the session
//! pool. Failures are isolated per file; the run always moves on.

use crate::catalog::{SchemaCatalog, TableSchema};
use crate::config::Config;
use crate::discover::RoutedFile;
use crate::engine::{Cell, EngineType};
use crate::provision;
use crate::session::Session;
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use rdl_common::{EtlError, Result};
use sqlx::{Postgres, QueryBuilder};
use std::path::Path;
use tracing::{error, info};

/// Postgres caps bind parameters at u16::MAX per statement
const BIND_LIMIT: usize = 65_535;

/// Upper bound on rows per INSERT batch even for narrow tables
const MAX_ROWS_PER_BATCH: usize = 1_000;

/// What happened to one routed file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Rows were appended to the target table
    Loaded { rows: u64 },
    /// The file's table is not in the catalog; nothing was done
    SkippedNoSchema,
}

/// Process one routed file end to end.
///
/// Returns `SkippedNoSchema` without touching the store when the catalog has
/// no entry for the file's table. Any error returned here is a per-file
/// failure for the caller to log before continuing with the next file.
pub async fn process(
    session: &Session,
    config: &Config,
    catalog: &SchemaCatalog,
    routed: &RoutedFile,
) -> Result<LoadOutcome> {
    if !catalog.contains(&routed.table) {
        info!(
            table = %routed.table,
            file = %routed.path.display(),
            "no schema found for table, skipping file"
        );
        return Ok(LoadOutcome::SkippedNoSchema);
    }

    info!(table = %routed.table, file = %routed.path.display(), "loading file");

    let schema = catalog.table_schema(&routed.table)?;

    // A provisioning failure is logged here and does not stop the load
    // attempt; the append below will surface its own error if the table is
    // genuinely missing.
    if let Err(err) = provision::ensure_table(
        &config.database,
        &config.pipeline.raw_namespace,
        &schema,
    )
    .await
    {
        error!(table = %schema.table, error = %err, "table provisioning failed");
    }

    let rows = read_rows(&schema, routed)?;
    let count = append_rows(
        session,
        &config.pipeline.raw_namespace,
        &schema,
        &routed.path,
        &rows,
    )
    .await?;

    info!(
        table = %schema.table,
        file = %routed.path.display(),
        rows = count,
        "data inserted"
    );
    Ok(LoadOutcome::Loaded { rows: count })
}

/// Read the whole file as headerless, comma-delimited rows under the schema.
///
/// No type inference from content: every field is coerced to its declared
/// engine type, and the first row that does not fit (wrong width or
/// uncoercible value) fails the file.
pub fn read_rows(schema: &TableSchema, routed: &RoutedFile) -> Result<Vec<Vec<Cell>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&routed.path)
        .map_err(|e| EtlError::load(&schema.table, &routed.path, e))?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| EtlError::load(&schema.table, &routed.path, e))?;

        if record.len() != schema.fields.len() {
            return Err(EtlError::load(
                &schema.table,
                &routed.path,
                format!(
                    "row {}: expected {} fields, found {}",
                    index + 1,
                    schema.fields.len(),
                    record.len()
                ),
            ));
        }

        let mut cells = Vec::with_capacity(schema.fields.len());
        for (field, raw) in schema.fields.iter().zip(record.iter()) {
            let cell = field.engine_type.parse_cell(raw).map_err(|e| {
                EtlError::load(
                    &schema.table,
                    &routed.path,
                    format!("row {}, column {}: {}", index + 1, field.name, e),
                )
            })?;
            cells.push(cell);
        }
        rows.push(cells);
    }

    Ok(rows)
}

/// Statement head shared by every batch: plain INSERT, no conflict clause,
/// so repeated loads append repeated rows.
fn insert_sql_prefix(namespace: &str, schema: &TableSchema) -> String {
    let columns = schema
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!("INSERT INTO \"{}\".{} ({}) ", namespace, schema.table, columns)
}

/// Append all rows inside one transaction, batched under the bind limit.
async fn append_rows(
    session: &Session,
    namespace: &str,
    schema: &TableSchema,
    path: &Path,
    rows: &[Vec<Cell>],
) -> Result<u64> {
    if rows.is_empty() {
        return Ok(0);
    }

    let batch_size = (BIND_LIMIT / schema.fields.len().max(1)).clamp(1, MAX_ROWS_PER_BATCH);

    let mut tx = session
        .pool()
        .begin()
        .await
        .map_err(|e| EtlError::load(&schema.table, path, e))?;

    for chunk in rows.chunks(batch_size) {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(insert_sql_prefix(namespace, schema));

        builder.push_values(chunk.iter(), |mut b, row| {
            for (field, cell) in schema.fields.iter().zip(row.iter()) {
                match cell {
                    Cell::Text(v) => {
                        b.push_bind(v.clone());
                    }
                    Cell::Integer(v) => {
                        b.push_bind(*v);
                    }
                    Cell::Timestamp(v) => {
                        b.push_bind(*v);
                    }
                    Cell::Float(v) => {
                        b.push_bind(v.clone());
                    }
                    // NULL binds carry the column's type so the store can
                    // resolve the parameter
                    Cell::Null => match field.engine_type {
                        EngineType::Text => {
                            b.push_bind(None::<String>);
                        }
                        EngineType::Integer => {
                            b.push_bind(None::<i32>);
                        }
                        EngineType::Timestamp => {
                            b.push_bind(None::<NaiveDateTime>);
                        }
                        EngineType::Float => {
                            b.push_bind(None::<BigDecimal>);
                        }
                    },
                }
            }
        });

        builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| EtlError::load(&schema.table, path, e))?;
    }

    tx.commit()
        .await
        .map_err(|e| EtlError::load(&schema.table, path, e))?;

    Ok(rows.len() as u64)
}
