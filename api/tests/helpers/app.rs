use api::routes::routes;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use util::{rate_limit::RateLimiter, state::AppState};

/// Builds a full application router over a fresh in-memory database.
///
/// The limiter budget is large enough that ordinary tests never trip it;
/// rate-limit tests construct their own limiter via
/// [`make_test_app_with_limiter`].
pub async fn make_test_app() -> Router {
    let limiter = Arc::new(RateLimiter::new(10_000, Duration::from_secs(60)));
    make_test_app_with_limiter(limiter).await
}

/// Builds the application router with an externally configured limiter.
pub async fn make_test_app_with_limiter(limiter: Arc<RateLimiter>) -> Router {
    let db = db::test_utils::setup_test_db().await;
    let state = AppState::with_limiter(db, limiter);
    Router::new().nest("/api", routes(state))
}

/// Sends one request and returns `(status, parsed body)`.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response: Response<Body> = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Registers a node through the HTTP surface and returns `(node_id, api_key)`.
pub async fn register_test_node(app: &Router, hostname: &str) -> (i64, String) {
    let (status, json) = send_json(
        app,
        "POST",
        "/api/register",
        None,
        Some(serde_json::json!({ "hostname": hostname })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {json}");

    let node_id = json["data"]["node_id"].as_i64().unwrap();
    let api_key = json["data"]["api_key"].as_str().unwrap().to_owned();
    (node_id, api_key)
}

/// Bearer token for a registered node.
pub fn bearer(node_id: i64, api_key: &str) -> String {
    format!("{node_id}:{api_key}")
}
