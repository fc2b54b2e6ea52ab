use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Global key/value configuration, stored as a singleton row (id = 1) and
/// upserted in place.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub retention_days: i64,
    pub stale_threshold_minutes: i64,
    pub refresh_seconds: i64,
    pub email_alerts_enabled: bool,
    pub alert_email: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Partial settings update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSettings {
    pub retention_days: Option<i64>,
    pub stale_threshold_minutes: Option<i64>,
    pub refresh_seconds: Option<i64>,
    pub email_alerts_enabled: Option<bool>,
    pub alert_email: Option<Option<String>>,
}

impl Model {
    /// Fetches the singleton row, inserting defaults on first access.
    pub async fn get_or_default(db: &DbConn) -> Result<Model, DbErr> {
        if let Some(existing) = Entity::find_by_id(1).one(db).await? {
            return Ok(existing);
        }

        ActiveModel {
            id: Set(1),
            retention_days: Set(30),
            stale_threshold_minutes: Set(30),
            refresh_seconds: Set(60),
            email_alerts_enabled: Set(false),
            alert_email: Set(None),
            updated_at: Set(Utc::now()),
        }
        .insert(db)
        .await
    }

    /// Upserts the supplied subset of fields.
    pub async fn update(db: &DbConn, update: UpdateSettings) -> Result<Model, DbErr> {
        let current = Self::get_or_default(db).await?;
        let mut active: ActiveModel = current.into();

        if let Some(retention_days) = update.retention_days {
            active.retention_days = Set(retention_days);
        }
        if let Some(stale) = update.stale_threshold_minutes {
            active.stale_threshold_minutes = Set(stale);
        }
        if let Some(refresh) = update.refresh_seconds {
            active.refresh_seconds = Set(refresh);
        }
        if let Some(enabled) = update.email_alerts_enabled {
            active.email_alerts_enabled = Set(enabled);
        }
        if let Some(alert_email) = update.alert_email {
            active.alert_email = Set(alert_email);
        }
        active.updated_at = Set(Utc::now());

        active.update(db).await
    }
}
