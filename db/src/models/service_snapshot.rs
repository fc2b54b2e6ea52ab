use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, TransactionTrait};
use serde::{Deserialize, Serialize};

/// One service row from a per-cycle batch. Same batch contract as
/// `process_snapshot`: rows written together share a per-node `batch_id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "service_snapshots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub node_id: i64,
    pub batch_id: i64,
    pub service_name: String,
    pub display_name: String,
    pub status: String,
    pub start_type: String,
    pub pid: i64,
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

/// One service entry as reported by the agent.
#[derive(Debug, Clone, Deserialize)]
pub struct NewService {
    pub service_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub start_type: String,
    #[serde(default)]
    pub pid: i64,
}

impl Model {
    /// Inserts one batch of service rows atomically. See
    /// `process_snapshot::Model::insert_batch` for the batch-id contract.
    pub async fn insert_batch(
        db: &DbConn,
        node_id: i64,
        services: Vec<NewService>,
    ) -> Result<Option<i64>, DbErr> {
        if services.is_empty() {
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
        let rows: Vec<ActiveModel> = services
            .into_iter()
            .map(|s| ActiveModel {
                node_id: Set(node_id),
                batch_id: Set(batch_id),
                service_name: Set(s.service_name),
                display_name: Set(s.display_name),
                status: Set(s.status),
                start_type: Set(s.start_type),
                pid: Set(s.pid),
                created_at: Set(now),
                ..Default::default()
            })
            .collect();

        Entity::insert_many(rows).exec(&txn).await?;
        txn.commit().await?;
        Ok(Some(batch_id))
    }

    /// All rows from the node's most recent batch, alphabetical. Empty when
    /// the node has never reported services.
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
            .order_by_asc(Column::ServiceName)
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
