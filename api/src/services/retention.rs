//! Retention sweeping.
//!
//! Two triggers: the on-demand purge behind `DELETE /api/settings`, and a
//! periodic background task for the short live-metric window. The background
//! task replaces any per-request counter scheme so sweep timing is
//! independent of ingestion volume and safe under concurrent handlers.

use chrono::{Duration, Utc};
use db::models::{alert, live_metric_sample, metric_sample, notification, process_snapshot,
    service_snapshot, setting};
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;
use util::{config, state::AppState};

/// Row counts removed by one on-demand purge.
#[derive(Debug, Clone, Serialize, Default)]
pub struct PurgeSummary {
    pub retention_days: i64,
    pub metric_samples: u64,
    pub process_snapshots: u64,
    pub service_snapshots: u64,
    pub alerts: u64,
    pub notifications: u64,
    pub live_metric_samples: u64,
}

/// Purges aged rows using the current retention-days setting.
///
/// Sample and snapshot tables age out unconditionally. Alerts age out only
/// once acknowledged, notifications only once read; active/unread rows stay
/// forever. Finishes with a live-metric sweep on its own shorter window.
pub async fn run_purge(db: &DatabaseConnection) -> Result<PurgeSummary, DbErr> {
    let settings = setting::Model::get_or_default(db).await?;
    let cutoff = Utc::now() - Duration::days(settings.retention_days);

    let summary = PurgeSummary {
        retention_days: settings.retention_days,
        metric_samples: metric_sample::Model::purge_older_than(db, cutoff).await?,
        process_snapshots: process_snapshot::Model::purge_older_than(db, cutoff).await?,
        service_snapshots: service_snapshot::Model::purge_older_than(db, cutoff).await?,
        alerts: alert::Model::purge_acknowledged_older_than(db, cutoff).await?,
        notifications: notification::Model::purge_read_older_than(db, cutoff).await?,
        live_metric_samples: sweep_live(db).await?,
    };

    tracing::info!(
        retention_days = summary.retention_days,
        metric_samples = summary.metric_samples,
        alerts = summary.alerts,
        notifications = summary.notifications,
        "Retention purge completed"
    );

    Ok(summary)
}

/// Drops live samples older than the fixed live-retention window.
pub async fn sweep_live(db: &DatabaseConnection) -> Result<u64, DbErr> {
    live_metric_sample::Model::purge_older_than(db, config::live_retention_minutes()).await
}

/// Spawns the periodic live-metric sweep and the rate-limiter eviction sweep.
///
/// Called once from `main` after the state is built.
pub fn spawn_background_tasks(state: AppState) {
    let db = state.db_clone();
    let sweep_interval = std::time::Duration::from_secs(config::live_sweep_interval_seconds());
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match sweep_live(&db).await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "Live metric sweep"),
                Err(e) => tracing::error!(error = %e, "Live metric sweep failed"),
            }
        }
    });

    let limiter = state.limiter_clone();
    let evict_interval =
        std::time::Duration::from_secs(config::rate_limit_evict_interval_seconds());
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(evict_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            limiter.evict_expired();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::models::{node, node::RegisterNode};
    use db::test_utils::setup_test_db;
    use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};

    #[tokio::test]
    async fn purge_spares_active_alerts_and_unread_notifications() {
        let db = setup_test_db().await;
        let (node, _) = node::Model::create(
            &db,
            RegisterNode {
                hostname: "old-01".into(),
                ip_address: None,
                os_info: None,
                display_name: None,
                group_name: None,
                tags: None,
            },
        )
        .await
        .unwrap();

        // Two aged alerts, one acknowledged. Backdate both past the window.
        let stale = Utc::now() - Duration::days(90);
        let acked = alert::Model::raise(&db, node.id, "cpu", "warning", "old acked", 91.0, 90.0)
            .await
            .unwrap();
        alert::Model::acknowledge(&db, acked.id).await.unwrap();
        let active = alert::Model::raise(&db, node.id, "cpu", "warning", "old active", 91.0, 90.0)
            .await
            .unwrap();
        for id in [acked.id, active.id] {
            let mut backdate: alert::ActiveModel = alert::Entity::find_by_id(id)
                .one(&db)
                .await
                .unwrap()
                .unwrap()
                .into();
            backdate.created_at = Set(stale);
            backdate.update(&db).await.unwrap();
        }

        let summary = run_purge(&db).await.unwrap();
        assert_eq!(summary.alerts, 1);

        let remaining = alert::Model::list(&db, None, 10).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(!remaining[0].acknowledged);

        // Linked notifications were never read, so both survive.
        let notifications = notification::Model::list(&db, false, 10).await.unwrap();
        assert_eq!(notifications.len(), 2);
    }

    #[tokio::test]
    async fn purge_on_empty_store_is_a_noop() {
        let db = setup_test_db().await;
        let summary = run_purge(&db).await.unwrap();
        assert_eq!(summary.metric_samples, 0);
        assert_eq!(summary.alerts, 0);
        assert_eq!(summary.retention_days, 30);
    }
}
