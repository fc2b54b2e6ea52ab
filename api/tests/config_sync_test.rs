mod helpers;

use axum::http::StatusCode;
use helpers::app::{bearer, make_test_app, register_test_node, send_json};
use serde_json::json;

/// Push → push (supersede) → poll → confirm → re-confirm, end to end.
#[tokio::test]
async fn push_poll_confirm_lifecycle() {
    let app = make_test_app().await;
    let (node_id, api_key) = register_test_node(&app, "cfg-01").await;
    let token = bearer(node_id, &api_key);

    // First push queues the key.
    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/nodes/{node_id}/config"),
        None,
        Some(json!({ "log_level": "DEBUG" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Second push for the same key supersedes the unapplied item.
    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/nodes/{node_id}/config"),
        None,
        Some(json!({ "log_level": "INFO" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Poll sees exactly the latest value.
    let (status, json) = send_json(
        &app,
        "GET",
        &format!("/api/config/{node_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["has_update"], true);
    assert_eq!(json["data"]["config"], json!({ "log_level": "INFO" }));

    // Confirm applies everything currently pending.
    let (status, json) = send_json(
        &app,
        "POST",
        &format!("/api/config/{node_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["applied"], 1);

    // Queue is now empty.
    let (_, json) = send_json(
        &app,
        "GET",
        &format!("/api/config/{node_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(json["data"]["has_update"], false);

    // Confirming with nothing pending is a no-op success.
    let (status, json) = send_json(
        &app,
        "POST",
        &format!("/api/config/{node_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["applied"], 0);
}

/// A push where no key survives the allow-list is rejected and names the
/// allowed keys; a mixed push proceeds and reports the dropped keys.
#[tokio::test]
async fn push_enforces_the_allow_list() {
    let app = make_test_app().await;
    let (node_id, _) = register_test_node(&app, "cfg-02").await;

    let (status, json) = send_json(
        &app,
        "POST",
        &format!("/api/nodes/{node_id}/config"),
        None,
        Some(json!({ "rm_rf": true, "api_key_hash": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["message"].as_str().unwrap().contains("log_level"));

    let (status, json) = send_json(
        &app,
        "POST",
        &format!("/api/nodes/{node_id}/config"),
        None,
        Some(json!({ "live_enabled": true, "bogus_key": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["accepted"], json!(["live_enabled"]));
    assert_eq!(json["data"]["rejected"], json!(["bogus_key"]));
}

/// Applied items stay behind as an audit trail, newest first.
#[tokio::test]
async fn history_retains_applied_pushes() {
    let app = make_test_app().await;
    let (node_id, api_key) = register_test_node(&app, "cfg-03").await;
    let token = bearer(node_id, &api_key);

    send_json(
        &app,
        "POST",
        &format!("/api/nodes/{node_id}/config"),
        None,
        Some(json!({ "log_level": "DEBUG" })),
    )
    .await;
    send_json(
        &app,
        "POST",
        &format!("/api/config/{node_id}"),
        Some(&token),
        None,
    )
    .await;
    send_json(
        &app,
        "POST",
        &format!("/api/nodes/{node_id}/config"),
        None,
        Some(json!({ "live_interval_seconds": 5 })),
    )
    .await;

    let (status, json) = send_json(
        &app,
        "GET",
        &format!("/api/nodes/{node_id}/config/history"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["config_key"], "live_interval_seconds");
    assert_eq!(items[0]["applied"], false);
    assert_eq!(items[1]["config_key"], "log_level");
    assert_eq!(items[1]["applied"], true);
}

#[tokio::test]
async fn push_to_unknown_node_is_not_found() {
    let app = make_test_app().await;
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/nodes/9999/config",
        None,
        Some(json!({ "log_level": "INFO" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
