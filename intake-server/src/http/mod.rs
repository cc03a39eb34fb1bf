//! HTTP adapter over the request store
//!
//! Axum server with:
//! - CORS (configured origins by default, permissive on request)
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerError};
