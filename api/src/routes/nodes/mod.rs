//! # Nodes Routes Module
//!
//! This module defines and wires up routes for the `/api/nodes` endpoint group.
//!
//! ## Structure
//! - `get.rs` — GET handlers (list nodes, per-node samples/snapshots/benchmark)
//! - `post.rs` — POST handlers (push pending config)
//! - `patch.rs` — PATCH handlers (allow-listed node update)
//! - `delete.rs` — DELETE handlers (cascading node removal)
//!
//! ## Access control
//! Administrative: these routes run behind a trusted boundary and carry no
//! bearer auth of their own.

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use util::state::AppState;

use delete::delete_node;
use get::{
    config_history, get_node, latest_metrics, latest_processes, latest_services, list_nodes,
    live_metrics, metric_history, node_benchmark,
};
use patch::update_node;
use post::push_config;

pub mod common;
pub mod delete;
pub mod get;
pub mod patch;
pub mod post;

/// Builds the `/nodes` route group, mapping HTTP methods to handlers.
///
/// - `GET /nodes` → `list_nodes`
/// - `GET /nodes/{node_id}` → `get_node`
/// - `PATCH /nodes/{node_id}` → `update_node`
/// - `DELETE /nodes/{node_id}` → `delete_node`
/// - `GET /nodes/{node_id}/metrics/latest` → `latest_metrics`
/// - `GET /nodes/{node_id}/metrics/history` → `metric_history`
/// - `GET /nodes/{node_id}/metrics/live` → `live_metrics`
/// - `GET /nodes/{node_id}/processes` → `latest_processes`
/// - `GET /nodes/{node_id}/services` → `latest_services`
/// - `GET /nodes/{node_id}/benchmark` → `node_benchmark`
/// - `POST /nodes/{node_id}/config` → `push_config`
/// - `GET /nodes/{node_id}/config/history` → `config_history`
pub fn nodes_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_nodes))
        .route("/{node_id}", get(get_node))
        .route("/{node_id}", patch(update_node))
        .route("/{node_id}", delete(delete_node))
        .route("/{node_id}/metrics/latest", get(latest_metrics))
        .route("/{node_id}/metrics/history", get(metric_history))
        .route("/{node_id}/metrics/live", get(live_metrics))
        .route("/{node_id}/processes", get(latest_processes))
        .route("/{node_id}/services", get(latest_services))
        .route("/{node_id}/benchmark", get(node_benchmark))
        .route("/{node_id}/config", post(push_config))
        .route("/{node_id}/config/history", get(config_history))
}
