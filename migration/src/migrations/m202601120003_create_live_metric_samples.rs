use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum LiveMetricSamples {
    Table,
    Id,
    NodeId,
    CpuPercent,
    CpuPerCore,
    CpuFreqMhz,
    MemoryPercent,
    MemoryUsed,
    MemoryAvailable,
    SwapPercent,
    SwapUsed,
    NetworkRate,
    DiskIoRate,
    ProcessCount,
    ThreadCount,
    HandleCount,
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
        "m202601120003_create_live_metric_samples"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LiveMetricSamples::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LiveMetricSamples::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LiveMetricSamples::NodeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LiveMetricSamples::CpuPercent)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LiveMetricSamples::CpuPerCore)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(LiveMetricSamples::CpuFreqMhz)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(LiveMetricSamples::MemoryPercent)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(LiveMetricSamples::MemoryUsed)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LiveMetricSamples::MemoryAvailable)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LiveMetricSamples::SwapPercent)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(LiveMetricSamples::SwapUsed)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LiveMetricSamples::NetworkRate)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(LiveMetricSamples::DiskIoRate)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(LiveMetricSamples::ProcessCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LiveMetricSamples::ThreadCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LiveMetricSamples::HandleCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LiveMetricSamples::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LiveMetricSamples::Table, LiveMetricSamples::NodeId)
                            .to(Nodes::Table, Nodes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_live_metric_samples_node_created")
                    .table(LiveMetricSamples::Table)
                    .col(LiveMetricSamples::NodeId)
                    .col(LiveMetricSamples::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LiveMetricSamples::Table).to_owned())
            .await
    }
}
