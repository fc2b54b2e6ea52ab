//! # Node Query Routes
//!
//! Read-only administrative queries: node listings, latest/historic samples,
//! current process/service sets, live windows, and benchmark rollups.
//!
//! Unknown node ids return `404 Not Found`; they never surface as errors.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::nodes::common::{HoursQuery, MinutesQuery, NodeResponse};
use crate::services::benchmark;
use db::models::{
    live_metric_sample, metric_sample, node, pending_config, process_snapshot, service_snapshot,
};

/// Shorthand for the repeated "does this node exist" check.
async fn require_node(
    state: &AppState,
    node_id: i64,
) -> Result<node::Model, axum::response::Response> {
    match node::Model::find_by_id(state.db(), node_id).await {
        Ok(Some(node)) => Ok(node),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("Node not found")),
        )
            .into_response()),
        Err(e) => {
            tracing::error!(error = %e, node_id, "Failed to load node");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to load node")),
            )
                .into_response())
        }
    }
}

/// GET /api/nodes
///
/// Lists every registered node.
pub async fn list_nodes(State(state): State<AppState>) -> impl IntoResponse {
    match node::Model::get_all(state.db()).await {
        Ok(nodes) => {
            let nodes: Vec<NodeResponse> = nodes.into_iter().map(NodeResponse::from).collect();
            Json(ApiResponse::success(nodes, "Nodes retrieved successfully")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list nodes");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to list nodes")),
            )
                .into_response()
        }
    }
}

/// GET /api/nodes/{node_id}
///
/// Fetches one node.
///
/// ### Errors
/// - 404 Not Found — unknown node id
pub async fn get_node(
    State(state): State<AppState>,
    Path(node_id): Path<i64>,
) -> impl IntoResponse {
    match require_node(&state, node_id).await {
        Ok(node) => Json(ApiResponse::success(
            NodeResponse::from(node),
            "Node retrieved successfully",
        ))
        .into_response(),
        Err(rejection) => rejection,
    }
}

/// GET /api/nodes/{node_id}/metrics/latest
///
/// The node's most recent full-cycle sample, or `null` when it has never
/// reported.
pub async fn latest_metrics(
    State(state): State<AppState>,
    Path(node_id): Path<i64>,
) -> impl IntoResponse {
    if let Err(rejection) = require_node(&state, node_id).await {
        return rejection;
    }

    match metric_sample::Model::latest(state.db(), node_id).await {
        Ok(sample) => {
            Json(ApiResponse::success(sample, "Latest metrics retrieved")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, node_id, "Failed to load latest metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to load latest metrics")),
            )
                .into_response()
        }
    }
}

/// GET /api/nodes/{node_id}/metrics/history?hours=24
///
/// Samples within the window, oldest first.
pub async fn metric_history(
    State(state): State<AppState>,
    Path(node_id): Path<i64>,
    Query(query): Query<HoursQuery>,
) -> impl IntoResponse {
    if let Err(rejection) = require_node(&state, node_id).await {
        return rejection;
    }

    match metric_sample::Model::history(state.db(), node_id, query.hours).await {
        Ok(samples) => Json(ApiResponse::success(samples, "Metric history retrieved"))
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, node_id, "Failed to load metric history");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to load metric history")),
            )
                .into_response()
        }
    }
}

/// GET /api/nodes/{node_id}/metrics/live?minutes=30
///
/// Live snapshots within the window, oldest first.
pub async fn live_metrics(
    State(state): State<AppState>,
    Path(node_id): Path<i64>,
    Query(query): Query<MinutesQuery>,
) -> impl IntoResponse {
    if let Err(rejection) = require_node(&state, node_id).await {
        return rejection;
    }

    match live_metric_sample::Model::window(state.db(), node_id, query.minutes).await {
        Ok(samples) => {
            Json(ApiResponse::success(samples, "Live metrics retrieved")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, node_id, "Failed to load live metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to load live metrics")),
            )
                .into_response()
        }
    }
}

/// GET /api/nodes/{node_id}/processes
///
/// Every process row from the node's most recent batch.
pub async fn latest_processes(
    State(state): State<AppState>,
    Path(node_id): Path<i64>,
) -> impl IntoResponse {
    if let Err(rejection) = require_node(&state, node_id).await {
        return rejection;
    }

    match process_snapshot::Model::latest(state.db(), node_id).await {
        Ok(rows) => Json(ApiResponse::success(rows, "Processes retrieved")).into_response(),
        Err(e) => {
            tracing::error!(error = %e, node_id, "Failed to load processes");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to load processes")),
            )
                .into_response()
        }
    }
}

/// GET /api/nodes/{node_id}/services
///
/// Every service row from the node's most recent batch.
pub async fn latest_services(
    State(state): State<AppState>,
    Path(node_id): Path<i64>,
) -> impl IntoResponse {
    if let Err(rejection) = require_node(&state, node_id).await {
        return rejection;
    }

    match service_snapshot::Model::latest(state.db(), node_id).await {
        Ok(rows) => Json(ApiResponse::success(rows, "Services retrieved")).into_response(),
        Err(e) => {
            tracing::error!(error = %e, node_id, "Failed to load services");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to load services")),
            )
                .into_response()
        }
    }
}

/// GET /api/nodes/{node_id}/benchmark?minutes=60
///
/// Min/max/avg rollup over the node's live window. A `sample_count` of zero
/// means the window was empty and the stats are absent.
pub async fn node_benchmark(
    State(state): State<AppState>,
    Path(node_id): Path<i64>,
    Query(query): Query<MinutesQuery>,
) -> impl IntoResponse {
    if let Err(rejection) = require_node(&state, node_id).await {
        return rejection;
    }

    match benchmark::compute(state.db(), node_id, query.minutes).await {
        Ok(report) => Json(ApiResponse::success(report, "Benchmark computed")).into_response(),
        Err(e) => {
            tracing::error!(error = %e, node_id, "Failed to compute benchmark");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to compute benchmark")),
            )
                .into_response()
        }
    }
}

/// GET /api/nodes/{node_id}/config/history
///
/// Config push history for the node, newest first, capped at 50 entries.
pub async fn config_history(
    State(state): State<AppState>,
    Path(node_id): Path<i64>,
) -> impl IntoResponse {
    if let Err(rejection) = require_node(&state, node_id).await {
        return rejection;
    }

    match pending_config::Model::history(state.db(), node_id, 50).await {
        Ok(items) => Json(ApiResponse::success(items, "Config history retrieved")).into_response(),
        Err(e) => {
            tracing::error!(error = %e, node_id, "Failed to load config history");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to load config history")),
            )
                .into_response()
        }
    }
}
