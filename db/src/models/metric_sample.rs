use chrono::{DateTime, Duration, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;
use serde::{Deserialize, Serialize};

/// One full-cycle metric report from a node. Append-only; rows are only ever
/// removed by the retention sweeper.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "metric_samples")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub node_id: i64,
    pub cpu_percent: f64,
    pub memory_total: i64,
    pub memory_used: i64,
    pub memory_free: i64,
    pub memory_percent: f64,
    /// JSON array of per-partition usage entries.
    pub disks: String,
    /// JSON object of interface counters, when the agent collects them.
    pub network: Option<String>,
    pub uptime_seconds: i64,
    pub boot_time: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::node::Entity",
        from = "Column::NodeId",
        to = "super::node::Column::Id",
        on_delete = "Cascade"
    )]
    Node,
}

impl Related<super::node::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Node.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// One partition usage entry as reported by the agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiskUsage {
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub mountpoint: String,
    #[serde(default)]
    pub fstype: String,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub used: i64,
    #[serde(default)]
    pub free: i64,
    #[serde(default)]
    pub percent: f64,
}

/// Cumulative interface counters as reported by the agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkCounters {
    #[serde(default)]
    pub bytes_sent: i64,
    #[serde(default)]
    pub bytes_recv: i64,
    #[serde(default)]
    pub packets_sent: i64,
    #[serde(default)]
    pub packets_recv: i64,
}

/// Incoming full-cycle payload body, field names matching the agent.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMetricSample {
    pub cpu_percent: f64,
    #[serde(default)]
    pub memory_total: i64,
    #[serde(default)]
    pub memory_used: i64,
    #[serde(default)]
    pub memory_free: i64,
    #[serde(default)]
    pub memory_percent: f64,
    #[serde(default)]
    pub disks: Vec<DiskUsage>,
    #[serde(default)]
    pub network: Option<NetworkCounters>,
    #[serde(default)]
    pub uptime_seconds: i64,
    #[serde(default)]
    pub boot_time: Option<String>,
}

impl Model {
    pub async fn insert(db: &DbConn, node_id: i64, sample: NewMetricSample) -> Result<Model, DbErr> {
        let disks = serde_json::to_string(&sample.disks).unwrap_or_else(|_| "[]".into());
        let network = sample
            .network
            .as_ref()
            .and_then(|n| serde_json::to_string(n).ok());

        let row = ActiveModel {
            node_id: Set(node_id),
            cpu_percent: Set(sample.cpu_percent),
            memory_total: Set(sample.memory_total),
            memory_used: Set(sample.memory_used),
            memory_free: Set(sample.memory_free),
            memory_percent: Set(sample.memory_percent),
            disks: Set(disks),
            network: Set(network),
            uptime_seconds: Set(sample.uptime_seconds),
            boot_time: Set(sample.boot_time),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        row.insert(db).await
    }

    /// Most recent sample for the node, if any.
    pub async fn latest(db: &DbConn, node_id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::NodeId.eq(node_id))
            .order_by_desc(Column::CreatedAt)
            .one(db)
            .await
    }

    /// Samples for the node within the past `hours`, oldest first.
    pub async fn history(db: &DbConn, node_id: i64, hours: i64) -> Result<Vec<Model>, DbErr> {
        let cutoff = Utc::now() - Duration::hours(hours);
        Entity::find()
            .filter(Column::NodeId.eq(node_id))
            .filter(Column::CreatedAt.gte(cutoff))
            .order_by_asc(Column::CreatedAt)
            .all(db)
            .await
    }

    pub async fn purge_older_than(db: &DbConn, cutoff: DateTime<Utc>) -> Result<u64, DbErr> {
        let res = Entity::delete_many()
            .filter(Column::CreatedAt.lt(cutoff))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    /// Parsed partition list; malformed JSON degrades to an empty list.
    pub fn disk_list(&self) -> Vec<DiskUsage> {
        serde_json::from_str(&self.disks).unwrap_or_default()
    }

    /// Parsed interface counters; malformed JSON degrades to `None`.
    pub fn network_counters(&self) -> Option<NetworkCounters> {
        self.network
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}
