mod helpers;

use axum::http::StatusCode;
use helpers::app::{make_test_app, send_json};
use serde_json::json;

#[tokio::test]
async fn settings_defaults_then_upsert() {
    let app = make_test_app().await;

    let (status, json) = send_json(&app, "GET", "/api/settings", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["retention_days"], 30);
    assert_eq!(json["data"]["stale_threshold_minutes"], 30);
    assert_eq!(json["data"]["refresh_seconds"], 60);
    assert_eq!(json["data"]["email_alerts_enabled"], false);

    let (status, json) = send_json(
        &app,
        "PATCH",
        "/api/settings",
        None,
        Some(json!({
            "retention_days": 14,
            "email_alerts_enabled": true,
            "alert_email": "ops@example.com"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["retention_days"], 14);
    assert_eq!(json["data"]["email_alerts_enabled"], true);
    assert_eq!(json["data"]["alert_email"], "ops@example.com");
    // Untouched fields keep their values.
    assert_eq!(json["data"]["refresh_seconds"], 60);

    // The update persisted.
    let (_, json) = send_json(&app, "GET", "/api/settings", None, None).await;
    assert_eq!(json["data"]["retention_days"], 14);
}

/// DELETE /settings runs the retention purge and reports what it removed.
#[tokio::test]
async fn delete_settings_triggers_purge() {
    let app = make_test_app().await;

    let (status, json) = send_json(&app, "DELETE", "/api/settings", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["retention_days"], 30);
    assert_eq!(json["data"]["metric_samples"], 0);
    assert_eq!(json["data"]["alerts"], 0);
    assert_eq!(json["data"]["notifications"], 0);
    assert_eq!(json["data"]["live_metric_samples"], 0);
}
