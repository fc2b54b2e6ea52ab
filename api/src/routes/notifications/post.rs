//! # Notification Read-Marking Routes

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::notification;

/// POST /api/notifications/{notification_id}/read
///
/// Marks one notification read. Idempotent.
///
/// ### Errors
/// - 404 Not Found — unknown notification id
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(notification_id): Path<i64>,
) -> impl IntoResponse {
    match notification::Model::mark_read(state.db(), notification_id).await {
        Ok(Some(notification)) => {
            Json(ApiResponse::success(notification, "Notification marked read")).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("Notification not found")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, notification_id, "Failed to mark notification read");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to mark notification read")),
            )
                .into_response()
        }
    }
}

#[derive(Serialize, Default)]
pub struct ReadAllResponse {
    pub marked: u64,
}

/// POST /api/notifications/read-all
///
/// Marks every unread notification read.
pub async fn mark_all_read(State(state): State<AppState>) -> impl IntoResponse {
    match notification::Model::mark_all_read(state.db()).await {
        Ok(marked) => Json(ApiResponse::success(
            ReadAllResponse { marked },
            "All notifications marked read",
        ))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to mark notifications read");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to mark notifications read")),
            )
                .into_response()
        }
    }
}
