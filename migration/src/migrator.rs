use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202601120001_create_nodes::Migration),
            Box::new(migrations::m202601120002_create_metric_samples::Migration),
            Box::new(migrations::m202601120003_create_live_metric_samples::Migration),
            Box::new(migrations::m202601120004_create_process_snapshots::Migration),
            Box::new(migrations::m202601120005_create_service_snapshots::Migration),
            Box::new(migrations::m202601120006_create_alerts::Migration),
            Box::new(migrations::m202601120007_create_notifications::Migration),
            Box::new(migrations::m202601120008_create_pending_configs::Migration),
            Box::new(migrations::m202601120009_create_settings::Migration),
        ]
    }
}
