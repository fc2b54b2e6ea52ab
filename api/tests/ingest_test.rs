mod helpers;

use axum::http::StatusCode;
use helpers::app::{bearer, make_test_app, register_test_node, send_json};
use serde_json::json;

fn metrics_body(cpu: f64) -> serde_json::Value {
    json!({
        "metrics": {
            "cpu_percent": cpu,
            "memory_total": 8_589_934_592u64,
            "memory_used": 4_294_967_296u64,
            "memory_free": 4_294_967_296u64,
            "memory_percent": 50.0,
            "disks": [
                { "device": "/dev/sda1", "mountpoint": "/", "fstype": "ext4",
                  "total": 100, "used": 40, "free": 60, "percent": 40.0 }
            ],
            "network": { "bytes_sent": 1000, "bytes_recv": 2000,
                         "packets_sent": 10, "packets_recv": 20 },
            "uptime_seconds": 3600,
            "boot_time": "2026-01-12T00:00:00Z"
        },
        "processes": [
            { "pid": 1, "name": "systemd", "cpu_percent": 0.1,
              "memory_percent": 0.2, "memory_mb": 12.5,
              "status": "sleeping", "username": "root" },
            { "pid": 42, "name": "postgres", "cpu_percent": 3.0,
              "memory_percent": 8.0, "memory_mb": 640.0,
              "status": "running", "username": "postgres" }
        ],
        "services": [
            { "service_name": "nginx", "display_name": "nginx web server",
              "status": "running", "start_type": "enabled", "pid": 100 }
        ]
    })
}

#[tokio::test]
async fn full_cycle_ingestion_stores_everything() {
    let app = make_test_app().await;
    let (node_id, api_key) = register_test_node(&app, "ingest-01").await;
    let token = bearer(node_id, &api_key);

    let (status, json) = send_json(
        &app,
        "POST",
        "/api/metrics",
        Some(&token),
        Some(metrics_body(12.5)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["data"]["alerts_raised"], 0);

    // Latest sample is queryable.
    let (status, json) = send_json(
        &app,
        "GET",
        &format!("/api/nodes/{node_id}/metrics/latest"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["cpu_percent"], 12.5);

    // Snapshot batches are queryable.
    let (_, json) = send_json(
        &app,
        "GET",
        &format!("/api/nodes/{node_id}/processes"),
        None,
        None,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let (_, json) = send_json(
        &app,
        "GET",
        &format!("/api/nodes/{node_id}/services"),
        None,
        None,
    )
    .await;
    assert_eq!(json["data"][0]["service_name"], "nginx");

    // Ingestion refreshed last-seen.
    let (_, json) = send_json(&app, "GET", &format!("/api/nodes/{node_id}"), None, None).await;
    assert!(!json["data"]["last_seen"].is_null());

    // History contains the sample, ascending.
    let (_, json) = send_json(
        &app,
        "GET",
        &format!("/api/nodes/{node_id}/metrics/history?hours=1"),
        None,
        None,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

/// The "current" process set is the newest batch only, even when an older
/// batch holds more rows.
#[tokio::test]
async fn latest_snapshot_is_newest_batch_only() {
    let app = make_test_app().await;
    let (node_id, api_key) = register_test_node(&app, "ingest-02").await;
    let token = bearer(node_id, &api_key);

    send_json(&app, "POST", "/api/metrics", Some(&token), Some(metrics_body(5.0))).await;

    let mut second = metrics_body(6.0);
    second["processes"] = json!([
        { "pid": 7, "name": "redis-server", "cpu_percent": 1.0,
          "memory_percent": 2.0, "memory_mb": 80.0,
          "status": "running", "username": "redis" }
    ]);
    send_json(&app, "POST", "/api/metrics", Some(&token), Some(second)).await;

    let (_, json) = send_json(
        &app,
        "GET",
        &format!("/api/nodes/{node_id}/processes"),
        None,
        None,
    )
    .await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "redis-server");
}

#[tokio::test]
async fn live_ingestion_feeds_benchmark() {
    let app = make_test_app().await;
    let (node_id, api_key) = register_test_node(&app, "ingest-03").await;
    let token = bearer(node_id, &api_key);

    for cpu in [10.0, 50.0, 90.0] {
        let (status, _) = send_json(
            &app,
            "POST",
            "/api/metrics/live",
            Some(&token),
            Some(json!({
                "cpu_percent": cpu,
                "cpu_per_core": [cpu, cpu],
                "cpu_freq_mhz": 2400.0,
                "memory_percent": 40.0,
                "memory_used": 100,
                "memory_available": 100,
                "swap_percent": 0.0,
                "swap_used": 0,
                "network_rate": { "bytes_sent_per_sec": 1.0 },
                "disk_io_rate": { "read_bytes_per_sec": 2.0 },
                "process_count": 100,
                "thread_count": 500,
                "handle_count": 0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, json) = send_json(
        &app,
        "GET",
        &format!("/api/nodes/{node_id}/benchmark?minutes=30"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["sample_count"], 3);
    assert_eq!(json["data"]["cpu_percent"]["min"], 10.0);
    assert_eq!(json["data"]["cpu_percent"]["max"], 90.0);
    assert_eq!(json["data"]["cpu_percent"]["avg"], 50.0);

    // Empty window on another node reports zero samples, not an error.
    let (other_id, _) = register_test_node(&app, "ingest-04").await;
    let (status, json) = send_json(
        &app,
        "GET",
        &format!("/api/nodes/{other_id}/benchmark?minutes=30"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["sample_count"], 0);
    assert!(json["data"]["cpu_percent"].is_null());
}
