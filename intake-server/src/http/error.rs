//! API error types with IntoResponse
//!
//! Store errors are converted to JSON responses with the underlying
//! message: validation 400, not found 404, database failures 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::StoreError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Body or path could not be parsed (400)
    BadRequest { message: String },

    /// Table missing or, with strict updates, unknown id (404)
    NotFound { resource: &'static str, id: String },

    /// Connection or statement failure (500, logged)
    Store(StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::BadRequest { message } => message.clone(),
            Self::NotFound { resource, id } => format!("{} '{}' not found", resource, id),
            Self::Store(e) => e.to_string(),
        }
    }

    fn log(&self) {
        if let Self::Store(e) = self {
            tracing::error!(kind = e.kind(), "{}", e);
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let body = json!({ "error": self.message() });
        (self.status(), Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(v) => Self::Validation(v),
            StoreError::NotFound { resource, id } => Self::NotFound { resource, id },
            _ => Self::Store(e),
        }
    }
}

/// Error in the `{success: false, error}` envelope used by the create endpoint
#[derive(Debug)]
pub struct EnvelopeError(pub ApiError);

impl From<ApiError> for EnvelopeError {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl From<ValidationError> for EnvelopeError {
    fn from(e: ValidationError) -> Self {
        Self(e.into())
    }
}

impl From<StoreError> for EnvelopeError {
    fn from(e: StoreError) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for EnvelopeError {
    fn into_response(self) -> Response {
        self.0.log();
        let body = json!({ "success": false, "error": self.0.message() });
        (self.0.status(), Json(body)).into_response()
    }
}
