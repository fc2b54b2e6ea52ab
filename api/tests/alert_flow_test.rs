mod helpers;

use axum::http::StatusCode;
use helpers::app::{bearer, make_test_app, register_test_node, send_json};
use serde_json::json;

fn cycle_with_cpu(cpu: f64) -> serde_json::Value {
    json!({
        "metrics": {
            "cpu_percent": cpu,
            "memory_percent": 10.0,
            "disks": [],
            "uptime_seconds": 60
        }
    })
}

/// Ingesting cpu=96 against the default threshold of 90 raises a critical
/// alert; acknowledging removes it from the active view while its linked
/// notification stays unread until explicitly marked.
#[tokio::test]
async fn alert_acknowledge_leaves_notification_unread() {
    let app = make_test_app().await;
    let (node_id, api_key) = register_test_node(&app, "alert-01").await;
    let token = bearer(node_id, &api_key);

    let (status, json) = send_json(
        &app,
        "POST",
        "/api/metrics",
        Some(&token),
        Some(cycle_with_cpu(96.0)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["alerts_raised"], 1);

    let (_, json) = send_json(&app, "GET", "/api/alerts?acknowledged=false", None, None).await;
    let alerts = json["data"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["alert_type"], "cpu");
    assert_eq!(alerts[0]["severity"], "critical");
    let alert_id = alerts[0]["id"].as_i64().unwrap();

    // Acknowledge, twice: idempotent.
    for _ in 0..2 {
        let (status, json) = send_json(
            &app,
            "POST",
            &format!("/api/alerts/{alert_id}/acknowledge"),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["acknowledged"], true);
    }

    // Gone from the active view.
    let (_, json) = send_json(&app, "GET", "/api/alerts?acknowledged=false", None, None).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    // The linked notification is still unread.
    let (_, json) = send_json(&app, "GET", "/api/notifications?unread_only=true", None, None).await;
    let notifications = json["data"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["alert_id"], alert_id);
    let notification_id = notifications[0]["id"].as_i64().unwrap();

    // Mark it read; the unread view empties.
    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/notifications/{notification_id}/read"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send_json(&app, "GET", "/api/notifications?unread_only=true", None, None).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

/// Identical breaches on consecutive cycles stack: no deduplication.
#[tokio::test]
async fn repeated_breaches_raise_repeated_alerts() {
    let app = make_test_app().await;
    let (node_id, api_key) = register_test_node(&app, "alert-02").await;
    let token = bearer(node_id, &api_key);

    for _ in 0..3 {
        send_json(
            &app,
            "POST",
            "/api/metrics",
            Some(&token),
            Some(cycle_with_cpu(92.0)),
        )
        .await;
    }

    let (_, json) = send_json(&app, "GET", "/api/alerts?acknowledged=false", None, None).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    let (_, json) = send_json(&app, "GET", "/api/notifications", None, None).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn acknowledging_unknown_alert_is_not_found() {
    let app = make_test_app().await;
    let (status, _) = send_json(&app, "POST", "/api/alerts/424242/acknowledge", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
