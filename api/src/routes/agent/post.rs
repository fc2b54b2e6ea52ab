//! # Agent POST Handlers
//!
//! - `POST /api/register`: Register a node and mint its api key
//! - `POST /api/metrics`: Full-cycle ingestion (sample + snapshots + alerting)
//! - `POST /api/metrics/live`: High-frequency snapshot ingestion
//! - `POST /api/ping`: Heartbeat, refreshes last-seen only
//! - `POST /api/config/{node_id}`: Confirm pending config applied

use axum::{Json, extract::{Path, State}, http::StatusCode, response::IntoResponse};
use util::state::AppState;
use validator::Validate;

use crate::auth::guards::ensure_node_scope;
use crate::auth::identity::AuthNode;
use crate::response::ApiResponse;
use crate::routes::agent::common::{
    ConfigConfirmResponse, LiveSubmission, MetricsAccepted, MetricsSubmission,
    RegisterNodeRequest, RegisterNodeResponse,
};
use crate::services::alert_engine;
use db::models::{
    live_metric_sample, metric_sample, node, pending_config, process_snapshot, service_snapshot,
};

/// POST /api/register
///
/// Registers a new node. No authentication: this is the bootstrap call an
/// agent makes exactly once.
///
/// ### Request Body
/// ```json
/// { "hostname": "web-01", "ip_address": "10.0.0.5", "os_info": "Linux 6.8 x86_64" }
/// ```
///
/// ### Response: 201 Created
/// The minted node id and the one-time api key. The key is stored hashed and
/// can never be fetched again.
///
/// ### Errors
/// - 400 Bad Request — Validation failure
pub async fn register_node(
    State(state): State<AppState>,
    Json(req): Json<RegisterNodeRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(format!("Validation failed: {e}"))),
        )
            .into_response();
    }

    match node::Model::create(state.db(), req.into()).await {
        Ok((node, api_key)) => {
            tracing::info!(node_id = node.id, hostname = %node.hostname, "Node registered");
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    RegisterNodeResponse {
                        node_id: node.id,
                        api_key,
                    },
                    "Node registered successfully",
                )),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to register node");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to register node")),
            )
                .into_response()
        }
    }
}

/// POST /api/metrics
///
/// Stores one full collection cycle, evaluates alert thresholds, and
/// refreshes the node's last-seen timestamp. Rate-limited per client address.
///
/// ### Request Body
/// ```json
/// { "metrics": { "cpu_percent": 12.5, ... }, "processes": [...], "services": [...] }
/// ```
///
/// ### Response: 200 OK
/// The stored sample id and how many alerts this cycle raised.
pub async fn submit_metrics(
    State(state): State<AppState>,
    AuthNode(node): AuthNode,
    Json(req): Json<MetricsSubmission>,
) -> impl IntoResponse {
    let db = state.db();
    let cpu_percent = req.metrics.cpu_percent;
    let memory_percent = req.metrics.memory_percent;
    let disks = req.metrics.disks.clone();

    let sample = match metric_sample::Model::insert(db, node.id, req.metrics).await {
        Ok(sample) => sample,
        Err(e) => {
            tracing::error!(error = %e, node_id = node.id, "Failed to store metric sample");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to store metrics")),
            )
                .into_response();
        }
    };

    if let Err(e) = process_snapshot::Model::insert_batch(db, node.id, req.processes).await {
        tracing::error!(error = %e, node_id = node.id, "Failed to store process snapshot");
    }
    if let Err(e) = service_snapshot::Model::insert_batch(db, node.id, req.services).await {
        tracing::error!(error = %e, node_id = node.id, "Failed to store service snapshot");
    }

    let alerts_raised =
        match alert_engine::evaluate(db, &node, cpu_percent, memory_percent, &disks).await {
            Ok(raised) => raised.len(),
            Err(e) => {
                tracing::error!(error = %e, node_id = node.id, "Alert evaluation failed");
                0
            }
        };

    if let Err(e) = node::Model::touch_last_seen(db, node.id).await {
        tracing::error!(error = %e, node_id = node.id, "Failed to refresh last-seen");
    }

    Json(ApiResponse::success(
        MetricsAccepted {
            sample_id: sample.id,
            alerts_raised,
        },
        "Metrics stored successfully",
    ))
    .into_response()
}

/// POST /api/metrics/live
///
/// Stores one high-frequency snapshot and refreshes last-seen. Rate-limited
/// per client address. Aged live samples are swept by the periodic background
/// task, not by this handler.
pub async fn submit_live_metrics(
    State(state): State<AppState>,
    AuthNode(node): AuthNode,
    Json(req): Json<LiveSubmission>,
) -> impl IntoResponse {
    let db = state.db();

    match live_metric_sample::Model::insert(db, node.id, req).await {
        Ok(_) => {
            if let Err(e) = node::Model::touch_last_seen(db, node.id).await {
                tracing::error!(error = %e, node_id = node.id, "Failed to refresh last-seen");
            }
            Json(ApiResponse::success((), "Live metrics stored")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, node_id = node.id, "Failed to store live metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to store live metrics")),
            )
                .into_response()
        }
    }
}

/// POST /api/ping
///
/// Lightweight heartbeat: refreshes the node's last-seen timestamp and
/// nothing else. Requires auth but sits outside the ingestion rate bucket.
pub async fn ping(State(state): State<AppState>, AuthNode(node): AuthNode) -> impl IntoResponse {
    match node::Model::touch_last_seen(state.db(), node.id).await {
        Ok(()) => Json(ApiResponse::success((), "Heartbeat received")).into_response(),
        Err(e) => {
            tracing::error!(error = %e, node_id = node.id, "Failed to record heartbeat");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to record heartbeat")),
            )
                .into_response()
        }
    }
}

/// POST /api/config/{node_id}
///
/// Marks every currently-unapplied pending config item for the node as
/// applied. All-or-nothing ack; confirming with nothing pending is a no-op.
///
/// ### Errors
/// - 403 Forbidden — the authenticated node does not own `{node_id}`
pub async fn confirm_config(
    State(state): State<AppState>,
    auth: AuthNode,
    Path(node_id): Path<i64>,
) -> impl IntoResponse {
    if let Err(rejection) = ensure_node_scope(&auth, node_id) {
        return rejection.into_response();
    }

    match pending_config::Model::mark_all_applied(state.db(), node_id).await {
        Ok(applied) => Json(ApiResponse::success(
            ConfigConfirmResponse { applied },
            "Configuration confirmed",
        ))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, node_id, "Failed to confirm configuration");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to confirm configuration")),
            )
                .into_response()
        }
    }
}
