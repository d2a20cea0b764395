//! Table provisioning against the target store
//!
//! Each call opens a connection dedicated to that call: connect, execute,
//! close, on every exit path. The generated statement is `CREATE TABLE IF
//! NOT EXISTS`, so re-provisioning an existing table is a no-op rather than
//! an error.

use crate::catalog::TableSchema;
use crate::config::DatabaseConfig;
use rdl_common::{EtlError, Result};
use sqlx::{Connection, PgConnection};
use tracing::info;

/// Render the idempotent create statement for a table under the namespace.
///
/// Columns appear in field order, which the caller has already sorted by
/// catalog position. The namespace is quoted; `1.raw` is not a valid bare
/// identifier.
pub fn create_table_sql(namespace: &str, schema: &TableSchema) -> String {
    let columns = schema
        .fields
        .iter()
        .map(|f| format!("{} {}", f.name, f.engine_type.store_type()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "CREATE TABLE IF NOT EXISTS \"{}\".{} ({});",
        namespace, schema.table, columns
    )
}

/// Create the table if it is absent, over a connection scoped to this call.
///
/// The caller decides what a failure means; a provisioning error never
/// aborts the run, though the table's subsequent load will likely fail too.
pub async fn ensure_table(
    db: &DatabaseConfig,
    namespace: &str,
    schema: &TableSchema,
) -> Result<()> {
    let sql = create_table_sql(namespace, schema);
    info!(table = %schema.table, query = %sql, "ensuring raw table exists");

    let mut conn = PgConnection::connect(&db.connection_url())
        .await
        .map_err(|e| EtlError::provisioning(&schema.table, e))?;

    // Capture the outcome so the connection is closed on every exit path
    let outcome = sqlx::query(&sql).execute(&mut conn).await;
    let _ = conn.close().await;
    outcome.map_err(|e| EtlError::provisioning(&schema.table, e))?;

    info!(table = %schema.table, "table ready");
    Ok(())
}
