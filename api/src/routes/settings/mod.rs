//! # Settings Routes Module
//!
//! Global settings management. `DELETE /settings` is the on-demand retention
//! purge trigger, mirroring the agent dashboard's "clear old data" action.

use axum::{
    Router,
    routing::{delete, get, patch},
};
use util::state::AppState;

use delete::purge_old_data;
use get::get_settings;
use patch::update_settings;

pub mod delete;
pub mod get;
pub mod patch;

/// Builds the `/settings` route group.
///
/// - `GET /settings` → `get_settings`
/// - `PATCH /settings` → `update_settings`
/// - `DELETE /settings` → `purge_old_data`
pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_settings))
        .route("/", patch(update_settings))
        .route("/", delete(purge_old_data))
}
