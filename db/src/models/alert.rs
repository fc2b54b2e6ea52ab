use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect, TransactionTrait};
use serde::Serialize;

use crate::models::notification;

pub const SEVERITY_WARNING: &str = "warning";
pub const SEVERITY_CRITICAL: &str = "critical";

/// A raised threshold event.
///
/// Lifecycle: active (unacknowledged) until acknowledged; acknowledgment is
/// idempotent and irreversible. Acknowledged rows become eligible for aged
/// purging.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub node_id: i64,
    /// "cpu" | "memory" | "disk"
    pub alert_type: String,
    /// "warning" | "critical"
    pub severity: String,
    pub message: String,
    pub value: f64,
    pub threshold: f64,
    pub acknowledged: bool,
    pub acknowledged_at: Option<DateTime<Utc>>,
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

    #[sea_orm(has_many = "super::notification::Entity")]
    Notification,
}

impl Related<super::node::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Node.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Raises an alert and its linked notification in one transaction.
    ///
    /// Exactly one notification is created per alert, carrying the same
    /// message.
    pub async fn raise(
        db: &DbConn,
        node_id: i64,
        alert_type: &str,
        severity: &str,
        message: &str,
        value: f64,
        threshold: f64,
    ) -> Result<Model, DbErr> {
        let txn = db.begin().await?;
        let now = Utc::now();

        let alert = ActiveModel {
            node_id: Set(node_id),
            alert_type: Set(alert_type.to_owned()),
            severity: Set(severity.to_owned()),
            message: Set(message.to_owned()),
            value: Set(value),
            threshold: Set(threshold),
            acknowledged: Set(false),
            acknowledged_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        notification::ActiveModel {
            node_id: Set(node_id),
            alert_id: Set(alert.id),
            message: Set(message.to_owned()),
            read: Set(false),
            read_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(alert)
    }

    /// Lists alerts, newest first. `acknowledged = None` returns everything.
    pub async fn list(
        db: &DbConn,
        acknowledged: Option<bool>,
        limit: u64,
    ) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find().order_by_desc(Column::CreatedAt).limit(limit);
        if let Some(acknowledged) = acknowledged {
            query = query.filter(Column::Acknowledged.eq(acknowledged));
        }
        query.all(db).await
    }

    /// Recent alerts for one node, newest first.
    pub async fn list_for_node(db: &DbConn, node_id: i64, limit: u64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::NodeId.eq(node_id))
            .order_by_desc(Column::CreatedAt)
            .limit(limit)
            .all(db)
            .await
    }

    /// Number of unacknowledged alerts for one node.
    pub async fn active_count(db: &DbConn, node_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::NodeId.eq(node_id))
            .filter(Column::Acknowledged.eq(false))
            .count(db)
            .await
    }

    /// Acknowledges an alert. Idempotent: acknowledging an already
    /// acknowledged alert returns it unchanged. Returns `None` for an unknown
    /// id.
    pub async fn acknowledge(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        let Some(alert) = Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };
        if alert.acknowledged {
            return Ok(Some(alert));
        }

        let mut active: ActiveModel = alert.into();
        active.acknowledged = Set(true);
        active.acknowledged_at = Set(Some(Utc::now()));
        active.update(db).await.map(Some)
    }

    /// Ages out acknowledged alerts only; active alerts are never purged.
    pub async fn purge_acknowledged_older_than(
        db: &DbConn,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        let res = Entity::delete_many()
            .filter(Column::Acknowledged.eq(true))
            .filter(Column::CreatedAt.lt(cutoff))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }
}
