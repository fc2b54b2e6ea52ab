//! # Agent GET Handlers
//!
//! - `GET /api/config/{node_id}`: Poll for pending configuration changes

use axum::{Json, extract::{Path, State}, http::StatusCode, response::IntoResponse};
use util::state::AppState;

use crate::auth::guards::ensure_node_scope;
use crate::auth::identity::AuthNode;
use crate::response::ApiResponse;
use crate::routes::agent::common::ConfigPollResponse;
use db::models::pending_config;

/// GET /api/config/{node_id}
///
/// Returns the node's unapplied config items as a key → value map, or
/// `has_update: false` when nothing is queued. The agent applies the map
/// locally and then confirms via `POST /api/config/{node_id}`.
///
/// ### Response: 200 OK
/// ```json
/// { "success": true, "data": { "has_update": true, "config": { "log_level": "INFO" } }, "message": "..." }
/// ```
///
/// ### Errors
/// - 403 Forbidden — the authenticated node does not own `{node_id}`
pub async fn poll_config(
    State(state): State<AppState>,
    auth: AuthNode,
    Path(node_id): Path<i64>,
) -> impl IntoResponse {
    if let Err(rejection) = ensure_node_scope(&auth, node_id) {
        return rejection.into_response();
    }

    match pending_config::Model::unapplied_map(state.db(), node_id).await {
        Ok(map) if map.is_empty() => Json(ApiResponse::success(
            ConfigPollResponse {
                has_update: false,
                config: None,
            },
            "No pending configuration",
        ))
        .into_response(),
        Ok(map) => Json(ApiResponse::success(
            ConfigPollResponse {
                has_update: true,
                config: Some(map),
            },
            "Pending configuration available",
        ))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, node_id, "Failed to read pending configuration");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to read pending configuration")),
            )
                .into_response()
        }
    }
}
