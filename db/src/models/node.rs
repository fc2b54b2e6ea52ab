use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, TransactionTrait};
use serde::{Deserialize, Serialize};

use crate::models::{
    alert::{Column as AlertColumn, Entity as AlertEntity},
    live_metric_sample::{Column as LiveColumn, Entity as LiveEntity},
    metric_sample::{Column as SampleColumn, Entity as SampleEntity},
    notification::{Column as NotificationColumn, Entity as NotificationEntity},
    pending_config::{Column as PendingColumn, Entity as PendingEntity},
    process_snapshot::{Column as ProcessColumn, Entity as ProcessEntity},
    service_snapshot::{Column as ServiceColumn, Entity as ServiceEntity},
};

/// Represents a monitored node in the `nodes` table.
///
/// The api key is stored as an argon2 hash; the plaintext is handed out once
/// at registration and never retrievable again.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "nodes")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    pub hostname: String,
    pub ip_address: Option<String>,
    pub os_info: Option<String>,
    pub display_name: Option<String>,
    pub group_name: String,
    /// JSON array of free-form tag strings.
    pub tags: String,
    /// Securely hashed api key string.
    #[serde(skip_serializing)]
    pub api_key_hash: String,
    /// Alert thresholds, percentages.
    pub cpu_alert_threshold: f64,
    pub memory_alert_threshold: f64,
    pub disk_alert_threshold: f64,
    pub collection_interval_minutes: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_seen: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Fields accepted at registration time.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterNode {
    pub hostname: String,
    pub ip_address: Option<String>,
    pub os_info: Option<String>,
    pub display_name: Option<String>,
    pub group_name: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Allow-listed fields for node updates. Anything outside this set is
/// rejected at the route boundary before reaching the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNode {
    pub display_name: Option<String>,
    pub group_name: Option<String>,
    pub cpu_alert_threshold: Option<f64>,
    pub memory_alert_threshold: Option<f64>,
    pub disk_alert_threshold: Option<f64>,
    pub collection_interval_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

impl Model {
    /// Registers a node and mints its api key.
    ///
    /// Returns the stored model together with the plaintext key. The key is
    /// hashed before storage; this is the only moment it exists in the clear
    /// on the server side.
    pub async fn create(db: &DbConn, reg: RegisterNode) -> Result<(Model, String), DbErr> {
        let api_key = Uuid::new_v4().simple().to_string();
        let tags = reg
            .tags
            .map(|t| serde_json::to_string(&t).unwrap_or_else(|_| "[]".into()))
            .unwrap_or_else(|| "[]".into());

        let node = ActiveModel {
            hostname: Set(reg.hostname),
            ip_address: Set(reg.ip_address),
            os_info: Set(reg.os_info),
            display_name: Set(reg.display_name),
            group_name: Set(reg.group_name.unwrap_or_else(|| "Default".into())),
            tags: Set(tags),
            api_key_hash: Set(Self::hash_api_key(&api_key)),
            cpu_alert_threshold: Set(90.0),
            memory_alert_threshold: Set(90.0),
            disk_alert_threshold: Set(90.0),
            collection_interval_minutes: Set(10),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            last_seen: Set(None),
            ..Default::default()
        };

        let model = node.insert(db).await?;
        Ok((model, api_key))
    }

    pub async fn find_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn get_all(db: &DbConn) -> Result<Vec<Model>, DbErr> {
        Entity::find().order_by_asc(Column::Id).all(db).await
    }

    /// Applies the allow-listed update fields. Blind last-write-wins on the
    /// supplied subset. Returns `None` for an unknown node id.
    pub async fn update(db: &DbConn, id: i64, update: UpdateNode) -> Result<Option<Model>, DbErr> {
        let Some(existing) = Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        if let Some(display_name) = update.display_name {
            active.display_name = Set(Some(display_name));
        }
        if let Some(group_name) = update.group_name {
            active.group_name = Set(group_name);
        }
        if let Some(cpu) = update.cpu_alert_threshold {
            active.cpu_alert_threshold = Set(cpu);
        }
        if let Some(memory) = update.memory_alert_threshold {
            active.memory_alert_threshold = Set(memory);
        }
        if let Some(disk) = update.disk_alert_threshold {
            active.disk_alert_threshold = Set(disk);
        }
        if let Some(interval) = update.collection_interval_minutes {
            active.collection_interval_minutes = Set(interval);
        }
        if let Some(is_active) = update.is_active {
            active.is_active = Set(is_active);
        }

        active.update(db).await.map(Some)
    }

    pub async fn touch_last_seen(db: &DbConn, id: i64) -> Result<(), DbErr> {
        let active = ActiveModel {
            id: Set(id),
            last_seen: Set(Some(Utc::now())),
            ..Default::default()
        };
        active.update(db).await?;
        Ok(())
    }

    /// Removes the node and every dependent row in one transaction.
    ///
    /// Returns `false` when the id was unknown.
    pub async fn delete(db: &DbConn, id: i64) -> Result<bool, DbErr> {
        if Entity::find_by_id(id).one(db).await?.is_none() {
            return Ok(false);
        }

        let txn = db.begin().await?;
        SampleEntity::delete_many()
            .filter(SampleColumn::NodeId.eq(id))
            .exec(&txn)
            .await?;
        LiveEntity::delete_many()
            .filter(LiveColumn::NodeId.eq(id))
            .exec(&txn)
            .await?;
        ProcessEntity::delete_many()
            .filter(ProcessColumn::NodeId.eq(id))
            .exec(&txn)
            .await?;
        ServiceEntity::delete_many()
            .filter(ServiceColumn::NodeId.eq(id))
            .exec(&txn)
            .await?;
        NotificationEntity::delete_many()
            .filter(NotificationColumn::NodeId.eq(id))
            .exec(&txn)
            .await?;
        AlertEntity::delete_many()
            .filter(AlertColumn::NodeId.eq(id))
            .exec(&txn)
            .await?;
        PendingEntity::delete_many()
            .filter(PendingColumn::NodeId.eq(id))
            .exec(&txn)
            .await?;
        Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(true)
    }

    /// Hashes an api key with argon2 and a fresh random salt.
    pub fn hash_api_key(api_key: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(api_key.as_bytes(), &salt)
            .expect("Failed to hash api key")
            .to_string()
    }

    /// Constant-time verification of a presented api key against the stored hash.
    pub fn verify_api_key(&self, api_key: &str) -> bool {
        PasswordHash::new(&self.api_key_hash)
            .map(|hash| {
                Argon2::default()
                    .verify_password(api_key.as_bytes(), &hash)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Parsed tag list; malformed JSON degrades to an empty list.
    pub fn tag_list(&self) -> Vec<String> {
        serde_json::from_str(&self.tags).unwrap_or_default()
    }
}
