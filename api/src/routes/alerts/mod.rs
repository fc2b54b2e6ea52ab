//! # Alerts Routes Module
//!
//! Administrative alert listing and acknowledgment.

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

use get::list_alerts;
use post::acknowledge_alert;

pub mod get;
pub mod post;

/// Builds the `/alerts` route group.
///
/// - `GET /alerts` → `list_alerts`
/// - `POST /alerts/{alert_id}/acknowledge` → `acknowledge_alert`
pub fn alerts_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts))
        .route("/{alert_id}/acknowledge", post(acknowledge_alert))
}
