//! # Alert Acknowledgment Route

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::alert;

/// POST /api/alerts/{alert_id}/acknowledge
///
/// Acknowledges an alert. Idempotent and irreversible: re-acknowledging is a
/// no-op success, and there is no way back to the active state.
///
/// ### Errors
/// - 404 Not Found — unknown alert id
pub async fn acknowledge_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<i64>,
) -> impl IntoResponse {
    match alert::Model::acknowledge(state.db(), alert_id).await {
        Ok(Some(alert)) => {
            Json(ApiResponse::success(alert, "Alert acknowledged")).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("Alert not found")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, alert_id, "Failed to acknowledge alert");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to acknowledge alert")),
            )
                .into_response()
        }
    }
}
