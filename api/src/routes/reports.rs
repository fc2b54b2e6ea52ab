//! # Reports Routes
//!
//! Aggregated fleet exports for offline consumption.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::{alert, metric_sample, node};

/// `?hours=` window for the export, defaulting to one day.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default = "default_hours")]
    pub hours: i64,
}

fn default_hours() -> i64 {
    24
}

/// One node's aggregate row in the export.
#[derive(Debug, Serialize)]
pub struct NodeReport {
    pub node_id: i64,
    pub hostname: String,
    pub group_name: String,
    pub sample_count: usize,
    pub avg_cpu_percent: Option<f64>,
    pub max_cpu_percent: Option<f64>,
    pub avg_memory_percent: Option<f64>,
    pub max_memory_percent: Option<f64>,
    pub active_alerts: u64,
    pub last_seen: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FleetReport {
    pub window_hours: i64,
    pub generated_at: String,
    pub nodes: Vec<NodeReport>,
}

/// Builds the `/reports` route group.
///
/// - `GET /reports/export` → `export_report`
pub fn reports_routes() -> Router<AppState> {
    Router::new().route("/export", get(export_report))
}

/// GET /api/reports/export?hours=24
///
/// Per-node cpu/memory aggregates over the window plus active-alert counts,
/// shaped for export rather than interactive display.
pub async fn export_report(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> impl IntoResponse {
    let db = state.db();

    let result: Result<FleetReport, sea_orm::DbErr> = async {
        let mut rows = Vec::new();
        for node in node::Model::get_all(db).await? {
            let samples = metric_sample::Model::history(db, node.id, query.hours).await?;
            let cpu: Vec<f64> = samples.iter().map(|s| s.cpu_percent).collect();
            let memory: Vec<f64> = samples.iter().map(|s| s.memory_percent).collect();

            rows.push(NodeReport {
                node_id: node.id,
                hostname: node.hostname,
                group_name: node.group_name,
                sample_count: samples.len(),
                avg_cpu_percent: mean(&cpu),
                max_cpu_percent: max(&cpu),
                avg_memory_percent: mean(&memory),
                max_memory_percent: max(&memory),
                active_alerts: alert::Model::active_count(db, node.id).await?,
                last_seen: node.last_seen.map(|t| t.to_rfc3339()),
            });
        }

        Ok(FleetReport {
            window_hours: query.hours,
            generated_at: chrono::Utc::now().to_rfc3339(),
            nodes: rows,
        })
    }
    .await;

    match result {
        Ok(report) => Json(ApiResponse::success(report, "Report generated")).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to generate report");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("Failed to generate report")),
            )
                .into_response()
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}
