//! # Node Config Push Route
//!
//! - `POST /api/nodes/{node_id}/config`: Queue configuration changes for a
//!   node to pick up on its next poll.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Map, Value};
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::{node, pending_config};

/// POST /api/nodes/{node_id}/config
///
/// Queues the submitted key/value pairs for the node, last-write-wins per
/// key. Keys outside the allow-list are dropped and reported back; a push in
/// which *no* key survives the allow-list is rejected outright.
///
/// ### Request Body
/// ```json
/// { "log_level": "DEBUG", "live_enabled": true }
/// ```
///
/// ### Response: 200 OK
/// ```json
/// { "success": true, "data": { "accepted": ["log_level"], "rejected": [] }, "message": "..." }
/// ```
///
/// ### Errors
/// - 404 Not Found — unknown node id
/// - 422 Unprocessable Entity — no submitted key is on the allow-list
pub async fn push_config(
    State(state): State<AppState>,
    Path(node_id): Path<i64>,
    Json(changes): Json<Map<String, Value>>,
) -> impl IntoResponse {
    let db = state.db();

    match node::Model::find_by_id(db, node_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("Node not found")),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, node_id, "Failed to load node");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to load node")),
            )
                .into_response();
        }
    }

    let no_valid_keys = !changes
        .keys()
        .any(|key| pending_config::ALLOWED_KEYS.contains(&key.as_str()));
    if changes.is_empty() || no_valid_keys {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::<()>::error(format!(
                "No valid configuration keys. Allowed keys: {}",
                pending_config::ALLOWED_KEYS.join(", ")
            ))),
        )
            .into_response();
    }

    match pending_config::Model::queue(db, node_id, changes).await {
        Ok(outcome) => {
            tracing::info!(
                node_id,
                accepted = outcome.accepted.len(),
                rejected = outcome.rejected.len(),
                "Config push queued"
            );
            Json(ApiResponse::success(outcome, "Configuration queued")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, node_id, "Failed to queue configuration");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to queue configuration")),
            )
                .into_response()
        }
    }
}
