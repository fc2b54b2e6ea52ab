//! # Notifications Routes Module
//!
//! In-app notification listing and read-marking.

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

use get::list_notifications;
use post::{mark_all_read, mark_notification_read};

pub mod get;
pub mod post;

/// Builds the `/notifications` route group.
///
/// - `GET /notifications` → `list_notifications`
/// - `POST /notifications/{notification_id}/read` → `mark_notification_read`
/// - `POST /notifications/read-all` → `mark_all_read`
pub fn notifications_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/{notification_id}/read", post(mark_notification_read))
        .route("/read-all", post(mark_all_read))
}
