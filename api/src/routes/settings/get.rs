//! # Settings Query Route

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::setting;

/// GET /api/settings
///
/// Returns the global settings, creating the defaults on first access.
pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    match setting::Model::get_or_default(state.db()).await {
        Ok(settings) => Json(ApiResponse::success(settings, "Settings retrieved")).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load settings");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to load settings")),
            )
                .into_response()
        }
    }
}
