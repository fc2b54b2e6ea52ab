use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{QueryOrder, QuerySelect, TransactionTrait};
use serde::Serialize;

/// Configuration keys a node will accept from the server. Anything else
/// submitted on a push is dropped and reported back to the caller.
pub const ALLOWED_KEYS: &[&str] = &[
    "collection_interval_minutes",
    "top_processes_count",
    "monitored_services",
    "collect_processes",
    "collect_disks",
    "collect_network",
    "ping_enabled",
    "auto_discover_services",
    "live_enabled",
    "live_interval_seconds",
    "log_level",
    "retry_attempts",
    "retry_delay_seconds",
    "request_timeout_seconds",
];

/// One queued configuration change for a node.
///
/// Invariant: at most one unapplied row per (node_id, config_key). A new push
/// for the same key deletes the unapplied duplicate inside the same
/// transaction before inserting. Applied rows are immutable history.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "pending_configs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub node_id: i64,
    pub config_key: String,
    /// JSON-encoded value, preserving the pushed type.
    pub config_value: String,
    pub applied: bool,
    pub applied_at: Option<DateTime<Utc>>,
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

/// Result of a push: which submitted keys were queued and which were dropped.
#[derive(Debug, Clone, Serialize)]
pub struct PushOutcome {
    pub accepted: Vec<String>,
    pub rejected: Vec<String>,
}

impl Model {
    /// Queues accepted (key, value) pairs for the node, last-write-wins per
    /// key: any unapplied row for the same key is deleted in the same
    /// transaction before the replacement is inserted.
    ///
    /// Keys outside [`ALLOWED_KEYS`] are dropped and reported in the outcome;
    /// the caller decides whether an all-rejected push is an error.
    pub async fn queue(
        db: &DbConn,
        node_id: i64,
        changes: serde_json::Map<String, serde_json::Value>,
    ) -> Result<PushOutcome, DbErr> {
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        let txn = db.begin().await?;
        for (key, value) in changes {
            if !ALLOWED_KEYS.contains(&key.as_str()) {
                rejected.push(key);
                continue;
            }

            Entity::delete_many()
                .filter(Column::NodeId.eq(node_id))
                .filter(Column::ConfigKey.eq(&key))
                .filter(Column::Applied.eq(false))
                .exec(&txn)
                .await?;

            ActiveModel {
                node_id: Set(node_id),
                config_key: Set(key.clone()),
                config_value: Set(value.to_string()),
                applied: Set(false),
                applied_at: Set(None),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            accepted.push(key);
        }
        txn.commit().await?;

        Ok(PushOutcome { accepted, rejected })
    }

    /// Every unapplied item for the node, oldest first.
    pub async fn unapplied(db: &DbConn, node_id: i64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::NodeId.eq(node_id))
            .filter(Column::Applied.eq(false))
            .order_by_asc(Column::CreatedAt)
            .all(db)
            .await
    }

    /// The node's unapplied items as a key → value map.
    pub async fn unapplied_map(
        db: &DbConn,
        node_id: i64,
    ) -> Result<serde_json::Map<String, serde_json::Value>, DbErr> {
        let items = Self::unapplied(db, node_id).await?;
        let mut map = serde_json::Map::new();
        for item in items {
            let value = serde_json::from_str(&item.config_value)
                .unwrap_or(serde_json::Value::Null);
            map.insert(item.config_key, value);
        }
        Ok(map)
    }

    /// Marks every currently-unapplied item for the node applied as of now.
    /// All-or-nothing ack; confirming with nothing pending is a no-op.
    /// Returns how many items were acknowledged.
    pub async fn mark_all_applied(db: &DbConn, node_id: i64) -> Result<u64, DbErr> {
        let res = Entity::update_many()
            .col_expr(Column::Applied, Expr::value(true))
            .col_expr(Column::AppliedAt, Expr::value(Utc::now()))
            .filter(Column::NodeId.eq(node_id))
            .filter(Column::Applied.eq(false))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    /// Push history for the node, newest first, capped.
    pub async fn history(db: &DbConn, node_id: i64, limit: u64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::NodeId.eq(node_id))
            .order_by_desc(Column::CreatedAt)
            .limit(limit)
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::node::{self, RegisterNode};
    use crate::test_utils::setup_test_db;

    fn changes(pairs: &[(&str, serde_json::Value)]) -> serde_json::Map<String, serde_json::Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    async fn test_node(db: &DbConn) -> node::Model {
        let (node, _) = node::Model::create(
            db,
            RegisterNode {
                hostname: "cfg-node".into(),
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
    async fn supersession_keeps_one_unapplied_item_per_key() {
        let db = setup_test_db().await;
        let node = test_node(&db).await;

        Model::queue(&db, node.id, changes(&[("log_level", "DEBUG".into())]))
            .await
            .unwrap();
        Model::queue(&db, node.id, changes(&[("log_level", "INFO".into())]))
            .await
            .unwrap();

        let unapplied = Model::unapplied(&db, node.id).await.unwrap();
        assert_eq!(unapplied.len(), 1);
        assert_eq!(unapplied[0].config_key, "log_level");
        assert_eq!(unapplied[0].config_value, "\"INFO\"");
    }

    #[tokio::test]
    async fn unknown_keys_are_dropped_and_reported() {
        let db = setup_test_db().await;
        let node = test_node(&db).await;

        let outcome = Model::queue(
            &db,
            node.id,
            changes(&[("live_enabled", true.into()), ("not_a_key", 1.into())]),
        )
        .await
        .unwrap();

        assert_eq!(outcome.accepted, vec!["live_enabled"]);
        assert_eq!(outcome.rejected, vec!["not_a_key"]);
        assert_eq!(Model::unapplied(&db, node.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn confirm_is_all_or_nothing_and_idempotent() {
        let db = setup_test_db().await;
        let node = test_node(&db).await;

        Model::queue(
            &db,
            node.id,
            changes(&[("log_level", "INFO".into()), ("live_enabled", true.into())]),
        )
        .await
        .unwrap();

        assert_eq!(Model::mark_all_applied(&db, node.id).await.unwrap(), 2);
        assert!(Model::unapplied_map(&db, node.id).await.unwrap().is_empty());
        // Nothing pending: the second confirm is a no-op.
        assert_eq!(Model::mark_all_applied(&db, node.id).await.unwrap(), 0);

        // Applied items survive as history.
        let history = Model::history(&db, node.id, 10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|item| item.applied));
    }

    #[tokio::test]
    async fn values_preserve_their_json_type() {
        let db = setup_test_db().await;
        let node = test_node(&db).await;

        Model::queue(
            &db,
            node.id,
            changes(&[
                ("live_interval_seconds", 5.into()),
                ("monitored_services", serde_json::json!(["nginx", "sshd"])),
            ]),
        )
        .await
        .unwrap();

        let map = Model::unapplied_map(&db, node.id).await.unwrap();
        assert_eq!(map["live_interval_seconds"], 5);
        assert_eq!(map["monitored_services"], serde_json::json!(["nginx", "sshd"]));
    }
}
