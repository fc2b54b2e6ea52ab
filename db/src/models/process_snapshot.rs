use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, TransactionTrait};
use serde::{Deserialize, Serialize};

/// One process row from a per-cycle batch.
///
/// Rows written together share a per-node `batch_id` assigned inside the
/// insert transaction; the current set for a node is every row carrying the
/// highest batch_id.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "process_snapshots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub node_id: i64,
    pub batch_id: i64,
    pub pid: i64,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub memory_mb: f64,
    pub status: String,
    pub username: String,
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

/// One process entry as reported by the agent.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProcess {
    #[serde(default)]
    pub pid: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cpu_percent: f64,
    #[serde(default)]
    pub memory_percent: f64,
    #[serde(default)]
    pub memory_mb: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub username: String,
}

impl Model {
    /// Inserts one batch of process rows atomically.
    ///
    /// The batch id is the node's previous maximum plus one, computed inside
    /// the same transaction as the inserts so a reader can never observe a
    /// half-written batch. Returns the assigned batch id, or `None` when the
    /// batch is empty.
    pub async fn insert_batch(
        db: &DbConn,
        node_id: i64,
        processes: Vec<NewProcess>,
    ) -> Result<Option<i64>, DbErr> {
        if processes.is_empty() {
            return Ok(None);
        }

        let txn = db.begin().await?;
        let batch_id = Entity::find()
            .filter(Column::NodeId.eq(node_id))
            .order_by_desc(Column::BatchId)
            .one(&txn)
            .await?
            .map(|row| row.batch_id)
            .unwrap_or(0)
            + 1;

        let now = Utc::now();
        let rows: Vec<ActiveModel> = processes
            .into_iter()
            .map(|p| ActiveModel {
                node_id: Set(node_id),
                batch_id: Set(batch_id),
                pid: Set(p.pid),
                name: Set(p.name),
                cpu_percent: Set(p.cpu_percent),
                memory_percent: Set(p.memory_percent),
                memory_mb: Set(p.memory_mb),
                status: Set(p.status),
                username: Set(p.username),
                created_at: Set(now),
                ..Default::default()
            })
            .collect();

        Entity::insert_many(rows).exec(&txn).await?;
        txn.commit().await?;
        Ok(Some(batch_id))
    }

    /// All rows from the node's most recent batch, busiest first. Empty when
    /// the node has never reported processes.
    pub async fn latest(db: &DbConn, node_id: i64) -> Result<Vec<Model>, DbErr> {
        let Some(newest) = Entity::find()
            .filter(Column::NodeId.eq(node_id))
            .order_by_desc(Column::BatchId)
            .one(db)
            .await?
        else {
            return Ok(vec![]);
        };

        Entity::find()
            .filter(Column::NodeId.eq(node_id))
            .filter(Column::BatchId.eq(newest.batch_id))
            .order_by_desc(Column::CpuPercent)
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
}
