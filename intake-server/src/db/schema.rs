//! Schema bootstrap for the request table
//!
//! Check-then-create: the table is looked up in `information_schema` and
//! only created when absent. The create statement still carries
//! `IF NOT EXISTS` so two processes bootstrapping at once both succeed.
//! Table and index are created in one transaction.

use sqlx::{Connection, PgConnection, PgPool};

use crate::error::{StoreError, StoreResult};
use crate::models::TableName;

/// What `ensure_schema` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaOutcome {
    Created,
    AlreadyPresent,
}

impl std::fmt::Display for SchemaOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::AlreadyPresent => f.write_str("already present"),
        }
    }
}

pub(crate) fn create_table_sql(table: &TableName) -> String {
    let table = table.quoted();
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            phone VARCHAR(20) NOT NULL,
            message VARCHAR(500) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            status VARCHAR(20) NOT NULL DEFAULT 'new'
        )
        "#
    )
}

pub(crate) fn create_index_sql(table: &TableName) -> String {
    format!(
        "CREATE INDEX IF NOT EXISTS {} ON {} (created_at DESC)",
        table.created_at_index(),
        table.quoted()
    )
}

/// Whether `table` exists in the connection's current schema.
pub async fn table_exists(conn: &mut PgConnection, table: &TableName) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM information_schema.tables
            WHERE table_schema = current_schema() AND table_name = $1
        )
        "#,
    )
    .bind(table.as_str())
    .fetch_one(conn)
    .await
}

/// Ensure the request table exists, creating it if absent.
///
/// # Errors
///
/// `Connectivity` if no connection can be obtained, `Persistence` if the
/// lookup or create statement is rejected. Callers at startup should treat
/// both as fatal.
pub async fn ensure_schema(pool: &PgPool, table: &TableName) -> StoreResult<SchemaOutcome> {
    let mut conn = pool.acquire().await.map_err(StoreError::Connectivity)?;

    if table_exists(&mut conn, table)
        .await
        .map_err(StoreError::Persistence)?
    {
        tracing::debug!(%table, "request table already present");
        return Ok(SchemaOutcome::AlreadyPresent);
    }

    tracing::info!(%table, "creating request table");
    let mut tx = conn.begin().await.map_err(StoreError::Persistence)?;
    // dropping `tx` on an early return rolls both statements back
    sqlx::query(&create_table_sql(table))
        .execute(&mut *tx)
        .await
        .map_err(StoreError::Persistence)?;
    sqlx::query(&create_index_sql(table))
        .execute(&mut *tx)
        .await
        .map_err(StoreError::Persistence)?;
    tx.commit().await.map_err(StoreError::Persistence)?;

    Ok(SchemaOutcome::Created)
}
