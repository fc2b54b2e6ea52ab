//! # Agent Routes Module
//!
//! Endpoints called by remote monitoring agents.
//!
//! ## Structure
//! - `post.rs` — registration, metric ingestion, heartbeat, config confirm
//! - `get.rs` — config poll
//! - `common.rs` — request/response payload types
//!
//! ## Access control
//! Every route except `/register` requires the `Bearer {nodeId}:{secret}`
//! token. The two ingestion routes additionally pass through the per-client
//! rate limiter; the heartbeat stays outside that bucket so a throttled agent
//! can still report liveness.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use util::state::AppState;

use crate::auth::guards::enforce_rate_limit;
use get::poll_config;
use post::{confirm_config, ping, register_node, submit_live_metrics, submit_metrics};

pub mod common;
pub mod get;
pub mod post;

/// Builds the agent-facing route group, mounted directly under `/api`.
///
/// - `POST /register` → `register_node` (no auth)
/// - `POST /metrics` → `submit_metrics` (auth + rate limit)
/// - `POST /metrics/live` → `submit_live_metrics` (auth + rate limit)
/// - `POST /ping` → `ping` (auth)
/// - `GET /config/{node_id}` → `poll_config` (auth, node-scoped)
/// - `POST /config/{node_id}` → `confirm_config` (auth, node-scoped)
pub fn agent_routes(app_state: AppState) -> Router<AppState> {
    let ingestion = Router::new()
        .route("/metrics", post(submit_metrics))
        .route("/metrics/live", post(submit_live_metrics))
        .route_layer(from_fn_with_state(app_state, enforce_rate_limit));

    Router::new()
        .route("/register", post(register_node))
        .route("/ping", post(ping))
        .route("/config/{node_id}", get(poll_config))
        .route("/config/{node_id}", post(confirm_config))
        .merge(ingestion)
}
