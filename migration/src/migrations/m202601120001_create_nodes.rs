use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Nodes {
    Table,
    Id,
    Hostname,
    IpAddress,
    OsInfo,
    DisplayName,
    GroupName,
    Tags,
    ApiKeyHash,
    CpuAlertThreshold,
    MemoryAlertThreshold,
    DiskAlertThreshold,
    CollectionIntervalMinutes,
    IsActive,
    CreatedAt,
    LastSeen,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601120001_create_nodes"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Nodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Nodes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Nodes::Hostname).string().not_null())
                    .col(ColumnDef::new(Nodes::IpAddress).string())
                    .col(ColumnDef::new(Nodes::OsInfo).string())
                    .col(ColumnDef::new(Nodes::DisplayName).string())
                    .col(
                        ColumnDef::new(Nodes::GroupName)
                            .string()
                            .not_null()
                            .default("Default"),
                    )
                    .col(
                        ColumnDef::new(Nodes::Tags)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Nodes::ApiKeyHash).string().not_null())
                    .col(
                        ColumnDef::new(Nodes::CpuAlertThreshold)
                            .double()
                            .not_null()
                            .default(90.0),
                    )
                    .col(
                        ColumnDef::new(Nodes::MemoryAlertThreshold)
                            .double()
                            .not_null()
                            .default(90.0),
                    )
                    .col(
                        ColumnDef::new(Nodes::DiskAlertThreshold)
                            .double()
                            .not_null()
                            .default(90.0),
                    )
                    .col(
                        ColumnDef::new(Nodes::CollectionIntervalMinutes)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .col(
                        ColumnDef::new(Nodes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Nodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Nodes::LastSeen).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Nodes::Table).to_owned())
            .await
    }
}
