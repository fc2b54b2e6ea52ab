//! # Notification Query Routes

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::notification;

#[derive(Debug, Deserialize)]
pub struct NotificationsQuery {
    #[serde(default)]
    pub unread_only: bool,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    100
}

/// GET /api/notifications?unread_only=true&limit=100
///
/// Lists notifications, newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationsQuery>,
) -> impl IntoResponse {
    match notification::Model::list(state.db(), query.unread_only, query.limit).await {
        Ok(notifications) => {
            Json(ApiResponse::success(notifications, "Notifications retrieved")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list notifications");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to list notifications")),
            )
                .into_response()
        }
    }
}
