mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use helpers::app::make_test_app;
use serde_json::Value;
use tower::ServiceExt;

#[tokio::test]
async fn health_check_returns_ok_json() {
    let app = make_test_app().await;

    let req = Request::builder()
        .method("GET")
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"], "OK");
    assert_eq!(json["message"], "Health check passed");
}

#[tokio::test]
async fn health_check_requires_no_auth_or_body() {
    let app = make_test_app().await;
    let (status, json) = helpers::app::send_json(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
}
