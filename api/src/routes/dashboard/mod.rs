//! # Dashboard Routes Module
//!
//! Read-only fleet views consumed by the UI layer.

use axum::{Router, routing::get};
use util::state::AppState;

use get::{dashboard_summary, node_detail};

pub mod get;

/// Builds the `/dashboard` route group.
///
/// - `GET /dashboard/summary` → `dashboard_summary`
/// - `GET /dashboard/nodes/{node_id}` → `node_detail`
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(dashboard_summary))
        .route("/nodes/{node_id}", get(node_detail))
}
