//! Request store
//!
//! Each operation:
//! - acquires a pooled connection (timeout-bounded) and holds it only for
//!   the duration of the call
//! - runs a single statement (plus the optional table pre-check on reads)
//! - addresses the table by its quoted name
//! - maps failures onto the store error taxonomy, keeping the driver message

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::pool::PoolConnection;
use sqlx::{Connection, FromRow, PgConnection, PgPool, Postgres};

use super::schema::{self, SchemaOutcome};
use crate::config::{DatabaseConfig, StoreOptions};
use crate::error::{StoreError, StoreResult};
use crate::models::{ListFilter, NewRequest, Request, SearchQuery, Status, StatusCounts};

/// Row shape as stored
#[derive(Debug, Clone, FromRow)]
struct RequestRow {
    id: i64,
    name: String,
    phone: String,
    message: String,
    created_at: DateTime<Utc>,
    status: String,
}

impl From<RequestRow> for Request {
    fn from(r: RequestRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            phone: r.phone,
            message: r.message,
            created_at: r.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            status: r.status,
        }
    }
}

/// Request store over a Postgres pool.
///
/// Cloning is cheap; clones share the pool.
#[derive(Debug, Clone)]
pub struct RequestStore {
    pool: PgPool,
    options: StoreOptions,
}

impl RequestStore {
    pub fn new(pool: PgPool, options: StoreOptions) -> Self {
        Self { pool, options }
    }

    /// Build a store on a lazily-connected pool.
    ///
    /// A malformed URL is reported as `Connectivity`.
    pub fn connect(database: &DatabaseConfig, options: StoreOptions) -> StoreResult<Self> {
        let pool = super::pool::connect_lazy(database).map_err(StoreError::Connectivity)?;
        Ok(Self::new(pool, options))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    async fn acquire(&self) -> StoreResult<PoolConnection<Postgres>> {
        self.pool.acquire().await.map_err(|e| {
            tracing::warn!(error = %e, "failed to acquire database connection");
            StoreError::Connectivity(e)
        })
    }

    /// With `check_table_on_list` enabled, a missing table is `NotFound`.
    async fn check_table(&self, conn: &mut PgConnection) -> StoreResult<()> {
        let table = &self.options.table;
        if self.options.check_table_on_list
            && !schema::table_exists(conn, table)
                .await
                .map_err(StoreError::Persistence)?
        {
            tracing::error!(%table, "request table does not exist");
            return Err(StoreError::NotFound {
                resource: "table",
                id: table.to_string(),
            });
        }
        Ok(())
    }

    /// Create the request table if it does not exist yet.
    pub async fn ensure_schema(&self) -> StoreResult<SchemaOutcome> {
        schema::ensure_schema(&self.pool, &self.options.table).await
    }

    /// Whether the request table has been bootstrapped.
    pub async fn table_exists(&self) -> StoreResult<bool> {
        let mut conn = self.acquire().await?;
        schema::table_exists(&mut conn, &self.options.table)
            .await
            .map_err(StoreError::Persistence)
    }

    /// Trivial round-trip independent of the request table.
    ///
    /// Returns the probe value (always 1).
    pub async fn health_check(&self) -> StoreResult<i32> {
        let mut conn = self.acquire().await?;
        sqlx::query_scalar("SELECT 1 AS test_result")
            .fetch_one(&mut *conn)
            .await
            .map_err(StoreError::Connectivity)
    }

    /// Validate and insert a new request with status `new`.
    ///
    /// The new id is deliberately not returned.
    pub async fn create(&self, name: &str, phone: &str, message: &str) -> StoreResult<()> {
        let new = NewRequest::new(name, phone, message)?;
        self.insert(&new).await
    }

    /// Insert an already-validated request; `created_at` is the time of the call.
    pub async fn insert(&self, new: &NewRequest) -> StoreResult<()> {
        let created_at = Utc::now();
        let mut conn = self.acquire().await?;

        let sql = format!(
            "INSERT INTO {} (name, phone, message, created_at) VALUES ($1, $2, $3, $4)",
            self.options.table.quoted()
        );
        sqlx::query(&sql)
            .bind(new.name())
            .bind(new.phone())
            .bind(new.message())
            .bind(created_at)
            .execute(&mut *conn)
            .await
            .map_err(StoreError::Persistence)?;

        tracing::debug!(table = %self.options.table, "request created");
        Ok(())
    }

    /// All requests, newest first.
    pub async fn list_all(&self) -> StoreResult<Vec<Request>> {
        self.list(&ListFilter::default()).await
    }

    /// Requests matching `filter`, newest first (ties by id, newest first).
    ///
    /// With `check_table_on_list` enabled a missing table is `NotFound`
    /// rather than a persistence error; an empty table is an empty list.
    pub async fn list(&self, filter: &ListFilter) -> StoreResult<Vec<Request>> {
        let mut conn = self.acquire().await?;
        self.check_table(&mut conn).await?;

        let table = &self.options.table;
        let sql = format!(
            r#"
            SELECT id, name, phone, message, created_at, status
            FROM {}
            WHERE ($1::text IS NULL OR status = $1::text)
              AND ($2::text IS NULL
                   OR name ILIKE $2::text
                   OR phone ILIKE $2::text
                   OR message ILIKE $2::text)
            ORDER BY created_at DESC, id DESC
            "#,
            table.quoted()
        );
        let rows: Vec<RequestRow> = sqlx::query_as(&sql)
            .bind(filter.status.as_ref().map(Status::as_str))
            .bind(filter.query.as_ref().map(SearchQuery::like_pattern))
            .fetch_all(&mut *conn)
            .await
            .map_err(StoreError::Persistence)?;

        tracing::debug!(%table, count = rows.len(), "listed requests");
        Ok(rows.into_iter().map(Request::from).collect())
    }

    /// Case-insensitive substring search over name, phone and message.
    pub async fn search(&self, query: &str) -> StoreResult<Vec<Request>> {
        let filter = ListFilter {
            status: None,
            query: Some(SearchQuery::new(query)?),
        };
        self.list(&filter).await
    }

    /// Row count per status, with the well-known statuses always present.
    ///
    /// Subject to the same missing-table check as `list`.
    pub async fn stats(&self) -> StoreResult<StatusCounts> {
        let mut conn = self.acquire().await?;
        self.check_table(&mut conn).await?;

        let sql = format!(
            "SELECT status, COUNT(*) AS count FROM {} GROUP BY status",
            self.options.table.quoted()
        );
        let rows: Vec<(String, i64)> = sqlx::query_as(&sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(StoreError::Persistence)?;

        Ok(StatusCounts::from_rows(rows))
    }

    /// Overwrite the status of request `id`.
    ///
    /// By default a missing id is not an error and the call reports success
    /// with zero rows affected; with `strict_updates` it is `NotFound`.
    /// On statement failure the transaction is rolled back before the
    /// connection goes back to the pool. Returns the number of rows updated.
    pub async fn update_status(&self, id: i64, status: &str) -> StoreResult<u64> {
        let status = Status::new(status)?;
        let mut conn = self.acquire().await?;
        let mut tx = conn.begin().await.map_err(StoreError::Persistence)?;

        let sql = format!(
            "UPDATE {} SET status = $1 WHERE id = $2",
            self.options.table.quoted()
        );
        let result = sqlx::query(&sql)
            .bind(status.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await;

        let affected = match result {
            Ok(done) => done.rows_affected(),
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, id, "rollback after failed update also failed");
                }
                return Err(StoreError::Persistence(e));
            }
        };

        tx.commit().await.map_err(StoreError::Persistence)?;
        tracing::debug!(id, status = status.as_str(), affected, "status updated");

        if affected == 0 && self.options.strict_updates {
            return Err(StoreError::NotFound {
                resource: "request",
                id: id.to_string(),
            });
        }
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationError;

    /// Store whose pool points at a port nothing listens on.
    fn unreachable_store() -> RequestStore {
        let database = DatabaseConfig {
            url: "postgres://intake@127.0.0.1:1/intake".to_string(),
            max_connections: 1,
            acquire_timeout_secs: 1,
        };
        RequestStore::connect(&database, StoreOptions::default()).expect("lazy pool")
    }

    #[test]
    fn row_timestamp_is_rfc3339() {
        let created_at = DateTime::parse_from_rfc3339("2026-10-19T08:30:00.5+03:00")
            .unwrap()
            .with_timezone(&Utc);
        let request = Request::from(RequestRow {
            id: 7,
            name: "Ivan".into(),
            phone: "+1000000000".into(),
            message: "Call me back".into(),
            created_at,
            status: "new".into(),
        });
        assert_eq!(request.created_at, "2026-10-19T05:30:00.500000Z");
        assert_eq!(request.id, 7);
    }

    #[tokio::test]
    async fn create_validates_before_touching_database() {
        let store = unreachable_store();
        let err = store.create("", "+1000000000", "Call me back").await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::Empty { field: "name" })
        ));
    }

    #[tokio::test]
    async fn update_rejects_blank_status_locally() {
        let store = unreachable_store();
        let err = store.update_status(1, "  ").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn search_rejects_blank_query_locally() {
        let store = unreachable_store();
        assert!(matches!(
            store.search("").await.unwrap_err(),
            StoreError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn unreachable_database_is_connectivity_error() {
        let store = unreachable_store();

        assert!(matches!(
            store.health_check().await.unwrap_err(),
            StoreError::Connectivity(_)
        ));
        assert!(matches!(
            store.list_all().await.unwrap_err(),
            StoreError::Connectivity(_)
        ));
        assert!(matches!(
            store.ensure_schema().await.unwrap_err(),
            StoreError::Connectivity(_)
        ));
        assert!(matches!(
            store.create("Ivan", "+1", "hi").await.unwrap_err(),
            StoreError::Connectivity(_)
        ));
    }
}
