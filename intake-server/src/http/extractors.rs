//! Custom Axum extractors
//!
//! Rejections are turned into `ApiError` so malformed input gets the same
//! JSON error shape as validation failures.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Extract a numeric request id from the path
pub struct RequestId(pub i64);

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::BadRequest {
                message: "missing request id".to_string(),
            })?;

        let id = raw.parse::<i64>().map_err(|_| ApiError::BadRequest {
            message: format!("invalid request id: '{}'", raw),
        })?;

        Ok(Self(id))
    }
}

/// JSON body whose parse failures become 400 `ApiError`s
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| ApiError::BadRequest {
                message: e.body_text(),
            })?;
        Ok(Self(value))
    }
}

/// Query string whose parse failures become 400 `ApiError`s
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| ApiError::BadRequest {
                message: e.body_text(),
            })?;
        Ok(Self(value))
    }
}
