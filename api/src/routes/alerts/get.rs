//! # Alert Query Routes

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::alert;

/// Query filters for the alert listing.
#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    /// Filter by acknowledgment state; omit for everything.
    pub acknowledged: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    100
}

/// GET /api/alerts?acknowledged=false&limit=100
///
/// Lists alerts, newest first. `acknowledged=false` is the active-alerts
/// view; acknowledged alerts never reappear there.
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>,
) -> impl IntoResponse {
    match alert::Model::list(state.db(), query.acknowledged, query.limit).await {
        Ok(alerts) => Json(ApiResponse::success(alerts, "Alerts retrieved")).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list alerts");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to list alerts")),
            )
                .into_response()
        }
    }
}
