use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{QueryOrder, QuerySelect};
use serde::Serialize;

/// Lightweight in-app derivative of an alert. Unread until explicitly marked;
/// read rows become eligible for aged purging.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub node_id: i64,
    pub alert_id: i64,
    pub message: String,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
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

    #[sea_orm(
        belongs_to = "super::alert::Entity",
        from = "Column::AlertId",
        to = "super::alert::Column::Id",
        on_delete = "Cascade"
    )]
    Alert,
}

impl Related<super::node::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Node.def()
    }
}

impl Related<super::alert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Alert.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Lists notifications, newest first.
    pub async fn list(db: &DbConn, unread_only: bool, limit: u64) -> Result<Vec<Model>, DbErr> {
        let mut query = Entity::find().order_by_desc(Column::CreatedAt).limit(limit);
        if unread_only {
            query = query.filter(Column::Read.eq(false));
        }
        query.all(db).await
    }

    pub async fn unread_count(db: &DbConn) -> Result<u64, DbErr> {
        Entity::find().filter(Column::Read.eq(false)).count(db).await
    }

    /// Marks one notification read. Idempotent; `None` for an unknown id.
    pub async fn mark_read(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        let Some(notification) = Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };
        if notification.read {
            return Ok(Some(notification));
        }

        let mut active: ActiveModel = notification.into();
        active.read = Set(true);
        active.read_at = Set(Some(Utc::now()));
        active.update(db).await.map(Some)
    }

    /// Marks every unread notification read. Returns how many changed.
    pub async fn mark_all_read(db: &DbConn) -> Result<u64, DbErr> {
        let res = Entity::update_many()
            .col_expr(Column::Read, Expr::value(true))
            .col_expr(Column::ReadAt, Expr::value(Utc::now()))
            .filter(Column::Read.eq(false))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    /// Ages out read notifications only; unread rows are never purged.
    pub async fn purge_read_older_than(db: &DbConn, cutoff: DateTime<Utc>) -> Result<u64, DbErr> {
        let res = Entity::delete_many()
            .filter(Column::Read.eq(true))
            .filter(Column::CreatedAt.lt(cutoff))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }
}
