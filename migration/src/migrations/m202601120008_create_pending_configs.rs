use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum PendingConfigs {
    Table,
    Id,
    NodeId,
    ConfigKey,
    ConfigValue,
    Applied,
    AppliedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Nodes {
    Table,
    Id,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601120008_create_pending_configs"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PendingConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PendingConfigs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PendingConfigs::NodeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PendingConfigs::ConfigKey).string().not_null())
                    .col(
                        ColumnDef::new(PendingConfigs::ConfigValue)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingConfigs::Applied)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(PendingConfigs::AppliedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(PendingConfigs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PendingConfigs::Table, PendingConfigs::NodeId)
                            .to(Nodes::Table, Nodes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pending_configs_node_applied")
                    .table(PendingConfigs::Table)
                    .col(PendingConfigs::NodeId)
                    .col(PendingConfigs::Applied)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PendingConfigs::Table).to_owned())
            .await
    }
}
