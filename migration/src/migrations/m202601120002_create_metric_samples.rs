use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum MetricSamples {
    Table,
    Id,
    NodeId,
    CpuPercent,
    MemoryTotal,
    MemoryUsed,
    MemoryFree,
    MemoryPercent,
    Disks,
    Network,
    UptimeSeconds,
    BootTime,
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
        "m202601120002_create_metric_samples"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MetricSamples::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MetricSamples::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MetricSamples::NodeId).big_integer().not_null())
                    .col(ColumnDef::new(MetricSamples::CpuPercent).double().not_null())
                    .col(
                        ColumnDef::new(MetricSamples::MemoryTotal)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MetricSamples::MemoryUsed)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MetricSamples::MemoryFree)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MetricSamples::MemoryPercent)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(MetricSamples::Disks)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(MetricSamples::Network).text())
                    .col(
                        ColumnDef::new(MetricSamples::UptimeSeconds)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(MetricSamples::BootTime).string())
                    .col(
                        ColumnDef::new(MetricSamples::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MetricSamples::Table, MetricSamples::NodeId)
                            .to(Nodes::Table, Nodes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_metric_samples_node_created")
                    .table(MetricSamples::Table)
                    .col(MetricSamples::NodeId)
                    .col(MetricSamples::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MetricSamples::Table).to_owned())
            .await
    }
}
