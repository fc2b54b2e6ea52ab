//! # Node Update Route
//!
//! - `PATCH /api/nodes/{node_id}`: Partial update of allow-listed fields.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::{Map, Value};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::nodes::common::NodeResponse;
use db::models::node::{self, UpdateNode};

/// Fields a PATCH may touch. Any other field in the body rejects the call
/// before the store is reached.
const UPDATABLE_FIELDS: &[&str] = &[
    "display_name",
    "group_name",
    "cpu_alert_threshold",
    "memory_alert_threshold",
    "disk_alert_threshold",
    "collection_interval_minutes",
    "is_active",
];

/// PATCH /api/nodes/{node_id}
///
/// Blind last-write-wins overwrite of the supplied subset of allow-listed
/// fields. There is no concurrency token: concurrent updates race at the
/// granularity of each call's field set.
///
/// ### Errors
/// - 404 Not Found — unknown node id
/// - 422 Unprocessable Entity — body contains a field outside the allow-list
pub async fn update_node(
    State(state): State<AppState>,
    Path(node_id): Path<i64>,
    Json(body): Json<Map<String, Value>>,
) -> impl IntoResponse {
    let unknown: Vec<&str> = body
        .keys()
        .map(String::as_str)
        .filter(|key| !UPDATABLE_FIELDS.contains(key))
        .collect();
    if !unknown.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::<()>::error(format!(
                "Unknown fields: {}. Allowed fields: {}",
                unknown.join(", "),
                UPDATABLE_FIELDS.join(", ")
            ))),
        )
            .into_response();
    }

    let update: UpdateNode = match serde_json::from_value(Value::Object(body)) {
        Ok(update) => update,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::<()>::error(format!("Invalid field value: {e}"))),
            )
                .into_response();
        }
    };

    match node::Model::update(state.db(), node_id, update).await {
        Ok(Some(node)) => Json(ApiResponse::success(
            NodeResponse::from(node),
            "Node updated successfully",
        ))
        .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("Node not found")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, node_id, "Failed to update node");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to update node")),
            )
                .into_response()
        }
    }
}
