//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits and a bounded
//! acquire timeout so no operation waits forever for a connection.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(config.acquire_timeout())
}

/// Create a PostgreSQL connection pool, opening one connection up front.
///
/// # Errors
///
/// Returns an error if the URL is malformed or the first connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DatabaseConfig::default()).await?;
/// ```
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    pool_options(config).connect(&config.url).await
}

/// Create a pool that connects on first use.
///
/// Only the URL is checked here; connectivity problems surface from the
/// first operation that acquires a connection.
pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    pool_options(config).connect_lazy(&config.url)
}
