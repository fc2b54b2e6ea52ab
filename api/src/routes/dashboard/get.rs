//! # Dashboard Query Routes
//!
//! Aggregated fleet views. A node counts as online when its last-seen
//! timestamp is within the configured stale threshold.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use serde::Serialize;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::nodes::common::NodeResponse;
use db::models::{
    alert, metric_sample, node, notification, process_snapshot, service_snapshot, setting,
};

/// One node's row in the fleet summary.
#[derive(Debug, Serialize)]
pub struct NodeSummary {
    #[serde(flatten)]
    pub node: NodeResponse,
    pub online: bool,
    pub active_alerts: u64,
    pub latest_sample: Option<metric_sample::Model>,
}

/// Fleet-wide totals for the summary header.
#[derive(Debug, Serialize, Default)]
pub struct FleetTotals {
    pub nodes: usize,
    pub online: usize,
    pub offline: usize,
    pub active_alerts: u64,
    pub unread_notifications: u64,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub totals: FleetTotals,
    pub refresh_seconds: i64,
    pub nodes: Vec<NodeSummary>,
}

/// GET /api/dashboard/summary
///
/// Per-node latest sample, online flag, and active-alert count, plus fleet
/// totals and the UI refresh interval.
pub async fn dashboard_summary(State(state): State<AppState>) -> impl IntoResponse {
    let db = state.db();

    let result: Result<DashboardSummary, sea_orm::DbErr> = async {
        let settings = setting::Model::get_or_default(db).await?;
        let stale_cutoff = Utc::now() - Duration::minutes(settings.stale_threshold_minutes);

        let mut summaries = Vec::new();
        let mut totals = FleetTotals {
            unread_notifications: notification::Model::unread_count(db).await?,
            ..Default::default()
        };

        for node in node::Model::get_all(db).await? {
            let online = node.last_seen.is_some_and(|seen| seen >= stale_cutoff);
            let active_alerts = alert::Model::active_count(db, node.id).await?;
            let latest_sample = metric_sample::Model::latest(db, node.id).await?;

            totals.nodes += 1;
            if online {
                totals.online += 1;
            } else {
                totals.offline += 1;
            }
            totals.active_alerts += active_alerts;

            summaries.push(NodeSummary {
                node: NodeResponse::from(node),
                online,
                active_alerts,
                latest_sample,
            });
        }

        Ok(DashboardSummary {
            totals,
            refresh_seconds: settings.refresh_seconds,
            nodes: summaries,
        })
    }
    .await;

    match result {
        Ok(summary) => {
            Json(ApiResponse::success(summary, "Dashboard summary retrieved")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to build dashboard summary");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to build dashboard summary")),
            )
                .into_response()
        }
    }
}

/// Everything the per-node dashboard page needs in one call.
#[derive(Debug, Serialize)]
pub struct NodeDetail {
    pub node: NodeResponse,
    pub online: bool,
    pub latest_sample: Option<metric_sample::Model>,
    pub processes: Vec<process_snapshot::Model>,
    pub services: Vec<service_snapshot::Model>,
    pub recent_alerts: Vec<alert::Model>,
}

/// GET /api/dashboard/nodes/{node_id}
///
/// Node detail view: latest sample, current process/service sets, and recent
/// alerts.
///
/// ### Errors
/// - 404 Not Found — unknown node id
pub async fn node_detail(
    State(state): State<AppState>,
    Path(node_id): Path<i64>,
) -> impl IntoResponse {
    let db = state.db();

    let node = match node::Model::find_by_id(db, node_id).await {
        Ok(Some(node)) => node,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<()>::error("Node not found")),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, node_id, "Failed to load node");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to load node")),
            )
                .into_response();
        }
    };

    let result: Result<NodeDetail, sea_orm::DbErr> = async {
        let settings = setting::Model::get_or_default(db).await?;
        let stale_cutoff = Utc::now() - Duration::minutes(settings.stale_threshold_minutes);
        let online = node.last_seen.is_some_and(|seen| seen >= stale_cutoff);

        Ok(NodeDetail {
            online,
            latest_sample: metric_sample::Model::latest(db, node_id).await?,
            processes: process_snapshot::Model::latest(db, node_id).await?,
            services: service_snapshot::Model::latest(db, node_id).await?,
            recent_alerts: alert::Model::list_for_node(db, node_id, 20).await?,
            node: NodeResponse::from(node),
        })
    }
    .await;

    match result {
        Ok(detail) => Json(ApiResponse::success(detail, "Node detail retrieved")).into_response(),
        Err(e) => {
            tracing::error!(error = %e, node_id, "Failed to build node detail");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to build node detail")),
            )
                .into_response()
        }
    }
}
