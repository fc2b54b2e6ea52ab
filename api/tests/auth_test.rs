mod helpers;

use axum::http::StatusCode;
use helpers::app::{bearer, make_test_app, register_test_node, send_json};
use serde_json::json;

/// Every authentication failure mode returns the same 401 and the same
/// message; callers cannot distinguish unknown nodes from bad secrets.
#[tokio::test]
async fn auth_failures_are_indistinguishable() {
    let app = make_test_app().await;
    let (node_id, api_key) = register_test_node(&app, "auth-01").await;

    let cases = [
        None,                                        // missing header
        Some("not-a-token".to_owned()),              // no separator
        Some(format!("{node_id}:wrong-secret")),     // bad secret
        Some(format!("99999:{api_key}")),            // unknown node
    ];

    let mut messages = Vec::new();
    for token in cases {
        let (status, json) =
            send_json(&app, "POST", "/api/ping", token.as_deref(), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        messages.push(json["message"].as_str().unwrap().to_owned());
    }
    assert!(messages.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn valid_token_authenticates() {
    let app = make_test_app().await;
    let (node_id, api_key) = register_test_node(&app, "auth-02").await;

    let token = bearer(node_id, &api_key);
    let (status, json) = send_json(&app, "POST", "/api/ping", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
}

#[tokio::test]
async fn deactivated_node_cannot_authenticate() {
    let app = make_test_app().await;
    let (node_id, api_key) = register_test_node(&app, "auth-03").await;
    let token = bearer(node_id, &api_key);

    let (status, _) = send_json(
        &app,
        "PATCH",
        &format!("/api/nodes/{node_id}"),
        None,
        Some(json!({ "is_active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, "POST", "/api/ping", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// A node may not read another node's config queue.
#[tokio::test]
async fn config_endpoints_are_node_scoped() {
    let app = make_test_app().await;
    let (first_id, first_key) = register_test_node(&app, "scope-01").await;
    let (second_id, _) = register_test_node(&app, "scope-02").await;

    let token = bearer(first_id, &first_key);
    let (status, json) = send_json(
        &app,
        "GET",
        &format!("/api/config/{second_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["message"], "Forbidden");

    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/config/{second_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn registration_rejects_empty_hostname() {
    let app = make_test_app().await;
    let (status, json) = send_json(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({ "hostname": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}
