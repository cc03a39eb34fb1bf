//! Database layer - connection pool, schema bootstrap, request store
//!
//! # Design Principles
//!
//! - Every operation acquires its own pooled connection and drops it on
//!   every exit path; the store keeps no state between calls
//! - One statement per operation; atomicity comes from the database
//! - Bootstrap is check-then-create and safe to run repeatedly

pub mod pool;
pub mod requests;
pub mod schema;

pub use pool::{connect_lazy, create_pool};
pub use requests::RequestStore;
pub use schema::{ensure_schema, table_exists, SchemaOutcome};
