//! Request endpoints
//!
//! Each handler maps one HTTP call onto one store operation.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::http::error::{ApiError, EnvelopeError};
use crate::http::extractors::{JsonBody, QueryParams, RequestId};
use crate::http::server::AppState;
use crate::models::{ListFilter, Request, StatusCounts};

/// Create request body; missing fields are validation errors, not parse errors
#[derive(Debug, Deserialize)]
pub struct CreateRequestBody {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

/// Status update body
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: Option<String>,
}

/// List query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub query: Option<String>,
}

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Serialize)]
pub struct ProbeResponse {
    pub success: bool,
    pub result: i32,
}

/// GET /api/test_db - database round-trip probe
async fn test_db(State(state): State<Arc<AppState>>) -> Result<Json<ProbeResponse>, ApiError> {
    let result = state.store.health_check().await?;
    Ok(Json(ProbeResponse {
        success: true,
        result,
    }))
}

/// GET /api/requests - list requests, newest first
async fn list_requests(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<Request>>, ApiError> {
    let filter = ListFilter::from_params(params.status.as_deref(), params.query.as_deref())?;
    let requests = state.store.list(&filter).await?;
    Ok(Json(requests))
}

/// POST /api/requests - create a request
async fn create_request(
    State(state): State<Arc<AppState>>,
    body: Result<JsonBody<CreateRequestBody>, ApiError>,
) -> Result<(StatusCode, Json<CreatedResponse>), EnvelopeError> {
    let JsonBody(req) = body?;
    state
        .store
        .create(
            req.name.as_deref().unwrap_or_default(),
            req.phone.as_deref().unwrap_or_default(),
            req.message.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            success: true,
            message: "request created",
        }),
    ))
}

/// PUT /api/requests/{id} - overwrite the status
async fn update_status(
    State(state): State<Arc<AppState>>,
    RequestId(id): RequestId,
    JsonBody(req): JsonBody<UpdateStatusBody>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .store
        .update_status(id, req.status.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/requests/search?query=...
async fn search_requests(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<Vec<Request>>, ApiError> {
    let requests = state
        .store
        .search(params.query.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(requests))
}

/// GET /api/requests/stats - counts per status
async fn request_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusCounts>, ApiError> {
    Ok(Json(state.store.stats().await?))
}

/// Request routes (mounted under /api)
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/test_db", get(test_db))
        .route("/requests", get(list_requests).post(create_request))
        .route("/requests/search", get(search_requests))
        .route("/requests/stats", get(request_stats))
        .route("/requests/{id}", put(update_status))
        .route("/requests/{id}/status", put(update_status))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::http::routes::test_support::{offline_router, send};

    #[tokio::test]
    async fn create_with_blank_name_is_400_envelope() {
        let body = r#"{"name": "  ", "phone": "+1000000000", "message": "Call me back"}"#;
        let (status, json) = send(offline_router(), "POST", "/api/requests", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "name cannot be empty");
    }

    #[tokio::test]
    async fn create_with_missing_field_is_400() {
        let body = r#"{"name": "Ivan", "message": "Call me back"}"#;
        let (status, json) = send(offline_router(), "POST", "/api/requests", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "phone cannot be empty");
    }

    #[tokio::test]
    async fn create_with_malformed_json_is_400_envelope() {
        let (status, json) = send(offline_router(), "POST", "/api/requests", Some("{nope")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn create_against_unreachable_database_is_500_envelope() {
        let body = r#"{"name": "Ivan", "phone": "+1000000000", "message": "Call me back"}"#;
        let (status, json) = send(offline_router(), "POST", "/api/requests", Some(body)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().starts_with("connection error"));
    }

    #[tokio::test]
    async fn probe_against_unreachable_database_is_500() {
        let (status, json) = send(offline_router(), "GET", "/api/test_db", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn list_against_unreachable_database_is_500() {
        let (status, json) = send(offline_router(), "GET", "/api/requests", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn update_with_non_numeric_id_is_400() {
        let body = r#"{"status": "done"}"#;
        let (status, json) = send(offline_router(), "PUT", "/api/requests/abc", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid request id: 'abc'");
    }

    #[tokio::test]
    async fn update_without_status_is_400() {
        let (status, json) = send(offline_router(), "PUT", "/api/requests/1", Some("{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "status cannot be empty");

        let (status, _) =
            send(offline_router(), "PUT", "/api/requests/1/status", Some("{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_query_string_is_json_400() {
        let (status, json) =
            send(offline_router(), "GET", "/api/requests?status=new&status=done", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("duplicate field"));

        let (status, json) = send(
            offline_router(),
            "GET",
            "/api/requests/search?query=a&query=b",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn create_with_nul_byte_is_400_envelope() {
        let body = r#"{"name": "Ivan", "phone": "+1000000000", "message": "call\u0000me"}"#;
        let (status, json) = send(offline_router(), "POST", "/api/requests", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "message: must not contain NUL characters");
    }

    #[tokio::test]
    async fn search_without_query_is_400() {
        let (status, json) = send(offline_router(), "GET", "/api/requests/search", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "query cannot be empty");
    }
}
