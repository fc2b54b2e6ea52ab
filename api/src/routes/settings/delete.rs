//! # Retention Purge Route

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::services::retention;

/// DELETE /api/settings
///
/// Runs the on-demand retention purge using the current retention-days
/// setting: samples and snapshots age out unconditionally, alerts only once
/// acknowledged, notifications only once read. Also sweeps the short
/// live-metric window.
pub async fn purge_old_data(State(state): State<AppState>) -> impl IntoResponse {
    match retention::run_purge(state.db()).await {
        Ok(summary) => Json(ApiResponse::success(summary, "Old data purged")).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Retention purge failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Retention purge failed")),
            )
                .into_response()
        }
    }
}
