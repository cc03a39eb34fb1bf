//! HTTP routes

pub mod health;
pub mod requests;

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use crate::config::{DatabaseConfig, ServerConfig, StoreOptions};
    use crate::db::RequestStore;
    use crate::http::build_router;

    /// Router over a store whose database is unreachable.
    ///
    /// Anything that reaches the database fails fast with a connectivity
    /// error, so only validation and error-mapping paths are exercised.
    pub fn offline_router() -> Router {
        let database = DatabaseConfig {
            url: "postgres://intake@127.0.0.1:1/intake".to_string(),
            max_connections: 1,
            acquire_timeout_secs: 1,
        };
        let store = RequestStore::connect(&database, StoreOptions::default()).expect("lazy pool");
        build_router(store, &ServerConfig::default())
    }

    pub async fn send(
        router: Router,
        method: &str,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_owned())
            }
            None => Body::empty(),
        };
        let response = router
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}
