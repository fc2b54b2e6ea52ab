//! # Node Deletion Route
//!
//! - `DELETE /api/nodes/{node_id}`: Remove a node and everything it owns.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::node;

/// DELETE /api/nodes/{node_id}
///
/// Hard-deletes the node; samples, snapshots, alerts, notifications, and
/// pending config items all go with it in one transaction.
///
/// ### Errors
/// - 404 Not Found — unknown node id
pub async fn delete_node(
    State(state): State<AppState>,
    Path(node_id): Path<i64>,
) -> impl IntoResponse {
    match node::Model::delete(state.db(), node_id).await {
        Ok(true) => {
            tracing::info!(node_id, "Node deleted");
            Json(ApiResponse::success((), "Node deleted successfully")).into_response()
        }
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("Node not found")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, node_id, "Failed to delete node");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to delete node")),
            )
                .into_response()
        }
    }
}
