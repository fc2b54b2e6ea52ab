//! Statistical rollups over the live-metric window.
//!
//! Pure reads: nothing here mutates the store. An empty window yields
//! `sample_count = 0` with no stats; callers must treat zero specially.

use db::models::live_metric_sample;
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;

/// Min/max/avg triple for one metric over the window.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl MetricStats {
    fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = values.iter().sum::<f64>() / values.len() as f64;
        Some(Self { min, max, avg })
    }
}

/// Rollup over one node's live samples within the window.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub node_id: i64,
    pub window_minutes: i64,
    pub sample_count: usize,
    pub cpu_percent: Option<MetricStats>,
    pub memory_percent: Option<MetricStats>,
    pub swap_percent: Option<MetricStats>,
    pub process_count: Option<MetricStats>,
    pub thread_count: Option<MetricStats>,
}

/// Computes the benchmark for a node over the past `window_minutes`.
pub async fn compute(
    db: &DatabaseConnection,
    node_id: i64,
    window_minutes: i64,
) -> Result<BenchmarkReport, DbErr> {
    let samples = live_metric_sample::Model::window(db, node_id, window_minutes).await?;

    let collect = |f: fn(&live_metric_sample::Model) -> f64| -> Vec<f64> {
        samples.iter().map(f).collect()
    };

    Ok(BenchmarkReport {
        node_id,
        window_minutes,
        sample_count: samples.len(),
        cpu_percent: MetricStats::from_values(&collect(|s| s.cpu_percent)),
        memory_percent: MetricStats::from_values(&collect(|s| s.memory_percent)),
        swap_percent: MetricStats::from_values(&collect(|s| s.swap_percent)),
        process_count: MetricStats::from_values(&collect(|s| f64::from(s.process_count))),
        thread_count: MetricStats::from_values(&collect(|s| f64::from(s.thread_count))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::models::{live_metric_sample::NewLiveMetricSample, node, node::RegisterNode};
    use db::test_utils::setup_test_db;

    fn live_sample(cpu: f64) -> NewLiveMetricSample {
        NewLiveMetricSample {
            cpu_percent: cpu,
            cpu_per_core: vec![],
            cpu_freq_mhz: 0.0,
            memory_percent: 40.0,
            memory_used: 0,
            memory_available: 0,
            swap_percent: 0.0,
            swap_used: 0,
            network_rate: serde_json::json!({}),
            disk_io_rate: serde_json::json!({}),
            process_count: 100,
            thread_count: 800,
            handle_count: 0,
        }
    }

    #[tokio::test]
    async fn rollup_over_three_samples() {
        let db = setup_test_db().await;
        let (node, _) = node::Model::create(
            &db,
            RegisterNode {
                hostname: "bench-01".into(),
                ip_address: None,
                os_info: None,
                display_name: None,
                group_name: None,
                tags: None,
            },
        )
        .await
        .unwrap();

        for cpu in [10.0, 50.0, 90.0] {
            live_metric_sample::Model::insert(&db, node.id, live_sample(cpu))
                .await
                .unwrap();
        }

        let report = compute(&db, node.id, 30).await.unwrap();
        assert_eq!(report.sample_count, 3);
        let cpu = report.cpu_percent.unwrap();
        assert_eq!(cpu.min, 10.0);
        assert_eq!(cpu.max, 90.0);
        assert_eq!(cpu.avg, 50.0);
        assert_eq!(report.process_count.unwrap().avg, 100.0);
    }

    #[tokio::test]
    async fn empty_window_reports_zero_samples() {
        let db = setup_test_db().await;
        let report = compute(&db, 999, 30).await.unwrap();
        assert_eq!(report.sample_count, 0);
        assert!(report.cpu_percent.is_none());
        assert!(report.thread_count.is_none());
    }
}
