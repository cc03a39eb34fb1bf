//! intake-server: request intake store and HTTP adapter
//!
//! Persists customer-submitted requests (name, phone, message) in Postgres,
//! lists them newest first and lets operators overwrite their status.
//!
//! - [`db::RequestStore`] is the data access layer; every operation uses
//!   its own pooled connection
//! - [`db::ensure_schema`] bootstraps the table at startup
//! - [`http`] maps the store onto JSON endpoints

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;

pub use config::{DatabaseConfig, IntakeConfig, ServerConfig, StoreOptions};
pub use db::{RequestStore, SchemaOutcome};
pub use error::{StoreError, StoreResult};
