//! # Settings Update Route

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::setting::{self, UpdateSettings};

/// PATCH /api/settings
///
/// Upserts the supplied subset of settings fields.
///
/// ### Request Body
/// ```json
/// { "retention_days": 14, "email_alerts_enabled": true, "alert_email": "ops@example.com" }
/// ```
pub async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<UpdateSettings>,
) -> impl IntoResponse {
    match setting::Model::update(state.db(), update).await {
        Ok(settings) => {
            Json(ApiResponse::success(settings, "Settings updated")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to update settings");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to update settings")),
            )
                .into_response()
        }
    }
}
