use chrono::{DateTime, Duration, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;
use serde::{Deserialize, Serialize};

/// High-frequency performance snapshot. Kept on a short, fixed retention
/// window independent of the main retention setting.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "live_metric_samples")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub node_id: i64,
    pub cpu_percent: f64,
    /// JSON array of per-core percentages.
    pub cpu_per_core: String,
    pub cpu_freq_mhz: f64,
    pub memory_percent: f64,
    pub memory_used: i64,
    pub memory_available: i64,
    pub swap_percent: f64,
    pub swap_used: i64,
    /// JSON object of per-second interface rates.
    pub network_rate: String,
    /// JSON object of per-second disk I/O rates.
    pub disk_io_rate: String,
    pub process_count: i32,
    pub thread_count: i32,
    pub handle_count: i32,
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

/// Incoming live snapshot body, field names matching the agent.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLiveMetricSample {
    pub cpu_percent: f64,
    #[serde(default)]
    pub cpu_per_core: Vec<f64>,
    #[serde(default)]
    pub cpu_freq_mhz: f64,
    #[serde(default)]
    pub memory_percent: f64,
    #[serde(default)]
    pub memory_used: i64,
    #[serde(default)]
    pub memory_available: i64,
    #[serde(default)]
    pub swap_percent: f64,
    #[serde(default)]
    pub swap_used: i64,
    #[serde(default)]
    pub network_rate: serde_json::Value,
    #[serde(default)]
    pub disk_io_rate: serde_json::Value,
    #[serde(default)]
    pub process_count: i32,
    #[serde(default)]
    pub thread_count: i32,
    #[serde(default)]
    pub handle_count: i32,
}

impl Model {
    pub async fn insert(
        db: &DbConn,
        node_id: i64,
        sample: NewLiveMetricSample,
    ) -> Result<Model, DbErr> {
        let row = ActiveModel {
            node_id: Set(node_id),
            cpu_percent: Set(sample.cpu_percent),
            cpu_per_core: Set(
                serde_json::to_string(&sample.cpu_per_core).unwrap_or_else(|_| "[]".into())
            ),
            cpu_freq_mhz: Set(sample.cpu_freq_mhz),
            memory_percent: Set(sample.memory_percent),
            memory_used: Set(sample.memory_used),
            memory_available: Set(sample.memory_available),
            swap_percent: Set(sample.swap_percent),
            swap_used: Set(sample.swap_used),
            network_rate: Set(sample.network_rate.to_string()),
            disk_io_rate: Set(sample.disk_io_rate.to_string()),
            process_count: Set(sample.process_count),
            thread_count: Set(sample.thread_count),
            handle_count: Set(sample.handle_count),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        row.insert(db).await
    }

    /// Snapshots for the node within the past `minutes`, oldest first.
    pub async fn window(db: &DbConn, node_id: i64, minutes: i64) -> Result<Vec<Model>, DbErr> {
        let cutoff = Utc::now() - Duration::minutes(minutes);
        Entity::find()
            .filter(Column::NodeId.eq(node_id))
            .filter(Column::CreatedAt.gte(cutoff))
            .order_by_asc(Column::CreatedAt)
            .all(db)
            .await
    }

    /// Drops snapshots older than `minutes` across all nodes.
    pub async fn purge_older_than(db: &DbConn, minutes: i64) -> Result<u64, DbErr> {
        let cutoff = Utc::now() - Duration::minutes(minutes);
        let res = Entity::delete_many()
            .filter(Column::CreatedAt.lt(cutoff))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    /// Parsed per-core list; malformed JSON degrades to an empty list.
    pub fn per_core(&self) -> Vec<f64> {
        serde_json::from_str(&self.cpu_per_core).unwrap_or_default()
    }
}
