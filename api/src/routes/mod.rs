//! HTTP route entry point for `/api/...`.
//!
//! This module defines all HTTP entry points under the `/api` namespace.
//! Routes are organized by domain (agent ingestion, node administration,
//! alerts, notifications, settings, dashboard, reports, health).
//!
//! Route groups include:
//! - `/health` → Health check endpoint (public)
//! - `/register`, `/metrics`, `/metrics/live`, `/ping`, `/config/{node_id}` →
//!   Agent-facing endpoints (bearer `{nodeId}:{secret}` auth; ingestion is
//!   rate-limited per client address)
//! - `/nodes` → Node administration and per-node queries
//! - `/alerts`, `/notifications` → Alert lifecycle and in-app notifications
//! - `/settings` → Global settings (DELETE triggers the retention purge)
//! - `/dashboard`, `/reports` → Read-only fleet views and exports
//!
//! Administrative groups are expected to run behind a trusted boundary and
//! carry no bearer auth of their own.

use axum::Router;
use util::state::AppState;

pub mod agent;
pub mod alerts;
pub mod dashboard;
pub mod health;
pub mod nodes;
pub mod notifications;
pub mod reports;
pub mod settings;

use crate::routes::{
    agent::agent_routes, alerts::alerts_routes, dashboard::dashboard_routes,
    health::health_routes, nodes::nodes_routes, notifications::notifications_routes,
    reports::reports_routes, settings::settings_routes,
};

/// Builds the complete application router for all HTTP endpoints.
///
/// The returned router is fully stateful: `AppState` is applied here so the
/// caller only nests it under `/api`.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .merge(agent_routes(app_state.clone()))
        .nest("/nodes", nodes_routes())
        .nest("/alerts", alerts_routes())
        .nest("/notifications", notifications_routes())
        .nest("/settings", settings_routes())
        .nest("/dashboard", dashboard_routes())
        .nest("/reports", reports_routes())
        .with_state(app_state)
}
