//! Threshold evaluation over incoming metric samples.
//!
//! Called once per full-cycle ingestion. Every breach raises a fresh alert
//! and its linked notification; there is no deduplication against alerts
//! still unacknowledged from earlier cycles.

use db::models::{
    alert::{self, SEVERITY_CRITICAL, SEVERITY_WARNING},
    metric_sample::DiskUsage,
    node, setting,
};
use sea_orm::{DatabaseConnection, DbErr};

use crate::services::email::EmailService;

/// Values at or above this are classified critical regardless of threshold.
pub const CRITICAL_CUTOFF: f64 = 95.0;

/// Filesystem types that never map to a real disk.
pub const VIRTUAL_FSTYPES: &[&str] = &[
    "squashfs", "tmpfs", "devtmpfs", "overlay", "aufs", "iso9660", "ramfs",
];

/// Mount locations that hold pseudo or snapshot filesystems.
const VIRTUAL_MOUNT_PREFIXES: &[&str] = &[
    "/snap",
    "/proc",
    "/sys",
    "/run",
    "/dev",
    "/boot/efi",
    "/var/lib/docker/overlay",
];

/// Loopback devices are images, not disks.
const VIRTUAL_DEVICE_PREFIXES: &[&str] = &["/dev/loop"];

fn severity_for(value: f64) -> &'static str {
    if value >= CRITICAL_CUTOFF {
        SEVERITY_CRITICAL
    } else {
        SEVERITY_WARNING
    }
}

/// True when a partition entry should be excluded from threshold evaluation.
pub fn is_virtual_disk(disk: &DiskUsage) -> bool {
    if VIRTUAL_FSTYPES.contains(&disk.fstype.as_str()) {
        return true;
    }
    if VIRTUAL_MOUNT_PREFIXES
        .iter()
        .any(|prefix| disk.mountpoint.starts_with(prefix))
    {
        return true;
    }
    VIRTUAL_DEVICE_PREFIXES
        .iter()
        .any(|prefix| disk.device.starts_with(prefix))
}

/// Evaluates one ingestion cycle against the node's thresholds.
///
/// Returns every alert raised this cycle. Critical alerts additionally get a
/// best-effort email dispatch when email alerts are enabled in settings.
pub async fn evaluate(
    db: &DatabaseConnection,
    node: &node::Model,
    cpu_percent: f64,
    memory_percent: f64,
    disks: &[DiskUsage],
) -> Result<Vec<alert::Model>, DbErr> {
    let mut raised = Vec::new();

    if cpu_percent >= node.cpu_alert_threshold {
        let severity = severity_for(cpu_percent);
        let message = format!(
            "CPU usage at {cpu_percent:.1}% (threshold {:.0}%)",
            node.cpu_alert_threshold
        );
        raised.push(
            alert::Model::raise(
                db,
                node.id,
                "cpu",
                severity,
                &message,
                cpu_percent,
                node.cpu_alert_threshold,
            )
            .await?,
        );
    }

    if memory_percent >= node.memory_alert_threshold {
        let severity = severity_for(memory_percent);
        let message = format!(
            "Memory usage at {memory_percent:.1}% (threshold {:.0}%)",
            node.memory_alert_threshold
        );
        raised.push(
            alert::Model::raise(
                db,
                node.id,
                "memory",
                severity,
                &message,
                memory_percent,
                node.memory_alert_threshold,
            )
            .await?,
        );
    }

    for disk in disks {
        if is_virtual_disk(disk) {
            continue;
        }
        if disk.percent >= node.disk_alert_threshold {
            let severity = severity_for(disk.percent);
            let message = format!(
                "Disk usage on {} at {:.1}% (threshold {:.0}%)",
                disk.mountpoint, disk.percent, node.disk_alert_threshold
            );
            raised.push(
                alert::Model::raise(
                    db,
                    node.id,
                    "disk",
                    severity,
                    &message,
                    disk.percent,
                    node.disk_alert_threshold,
                )
                .await?,
            );
        }
    }

    dispatch_critical_emails(db, node, &raised).await?;

    Ok(raised)
}

/// Fire-and-forget email dispatch for critical alerts.
async fn dispatch_critical_emails(
    db: &DatabaseConnection,
    node: &node::Model,
    raised: &[alert::Model],
) -> Result<(), DbErr> {
    if !raised.iter().any(|a| a.severity == SEVERITY_CRITICAL) {
        return Ok(());
    }

    let settings = setting::Model::get_or_default(db).await?;
    if !settings.email_alerts_enabled {
        return Ok(());
    }
    let Some(recipient) = settings.alert_email else {
        return Ok(());
    };

    for alert in raised.iter().filter(|a| a.severity == SEVERITY_CRITICAL) {
        let recipient = recipient.clone();
        let hostname = node.hostname.clone();
        let message = alert.message.clone();
        tokio::spawn(async move {
            if let Err(e) = EmailService::send_alert_email(&recipient, &hostname, &message).await {
                tracing::warn!(error = %e, "Failed to send alert email");
            }
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::models::{node::RegisterNode, notification};
    use db::test_utils::setup_test_db;
    use sea_orm::EntityTrait;

    async fn test_node(db: &DatabaseConnection) -> node::Model {
        let (node, _) = node::Model::create(
            db,
            RegisterNode {
                hostname: "web-01".into(),
                ip_address: None,
                os_info: None,
                display_name: None,
                group_name: None,
                tags: None,
            },
        )
        .await
        .unwrap();
        node
    }

    #[tokio::test]
    async fn cpu_threshold_classifies_severity() {
        let db = setup_test_db().await;
        let node = test_node(&db).await;

        assert!(evaluate(&db, &node, 89.9, 0.0, &[]).await.unwrap().is_empty());

        let warning = evaluate(&db, &node, 90.0, 0.0, &[]).await.unwrap();
        assert_eq!(warning.len(), 1);
        assert_eq!(warning[0].severity, SEVERITY_WARNING);
        assert_eq!(warning[0].alert_type, "cpu");

        let critical = evaluate(&db, &node, 95.0, 0.0, &[]).await.unwrap();
        assert_eq!(critical[0].severity, SEVERITY_CRITICAL);

        let just_below = evaluate(&db, &node, 94.9, 0.0, &[]).await.unwrap();
        assert_eq!(just_below[0].severity, SEVERITY_WARNING);
    }

    #[tokio::test]
    async fn virtual_disks_never_alert() {
        let db = setup_test_db().await;
        let node = test_node(&db).await;

        let disks = vec![
            DiskUsage {
                device: "tmpfs".into(),
                mountpoint: "/tmp".into(),
                fstype: "tmpfs".into(),
                percent: 99.0,
                ..Default::default()
            },
            DiskUsage {
                device: "/dev/loop3".into(),
                mountpoint: "/mnt/image".into(),
                fstype: "ext4".into(),
                percent: 100.0,
                ..Default::default()
            },
            DiskUsage {
                device: "/dev/sdb1".into(),
                mountpoint: "/data".into(),
                fstype: "ext4".into(),
                percent: 91.0,
                ..Default::default()
            },
        ];

        let raised = evaluate(&db, &node, 0.0, 0.0, &disks).await.unwrap();
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].alert_type, "disk");
        assert_eq!(raised[0].severity, SEVERITY_WARNING);
        assert!(raised[0].message.contains("/data"));
    }

    #[tokio::test]
    async fn each_alert_gets_exactly_one_notification() {
        let db = setup_test_db().await;
        let node = test_node(&db).await;

        let raised = evaluate(&db, &node, 96.0, 92.0, &[]).await.unwrap();
        assert_eq!(raised.len(), 2);

        let notifications = notification::Entity::find().all(&db).await.unwrap();
        assert_eq!(notifications.len(), 2);
        for n in &notifications {
            assert!(!n.read);
            assert!(raised.iter().any(|a| a.id == n.alert_id && a.message == n.message));
        }
    }

    #[tokio::test]
    async fn no_dedup_across_cycles() {
        let db = setup_test_db().await;
        let node = test_node(&db).await;

        evaluate(&db, &node, 92.0, 0.0, &[]).await.unwrap();
        evaluate(&db, &node, 92.0, 0.0, &[]).await.unwrap();

        let alerts = alert::Model::list(&db, Some(false), 50).await.unwrap();
        assert_eq!(alerts.len(), 2);
    }
}
