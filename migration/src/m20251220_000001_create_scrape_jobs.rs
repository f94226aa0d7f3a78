// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create scrape_jobs table
        manager
            .create_table(
                Table::create()
                    .table(ScrapeJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapeJobs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScrapeJobs::CrawlId).uuid().not_null())
                    .col(ColumnDef::new(ScrapeJobs::TeamId).uuid().not_null())
                    .col(ColumnDef::new(ScrapeJobs::Url).text().not_null())
                    .col(
                        ColumnDef::new(ScrapeJobs::Priority)
                            .integer()
                            .not_null()
                            .default(20),
                    )
                    .col(ColumnDef::new(ScrapeJobs::Status).string().not_null())
                    .col(ColumnDef::new(ScrapeJobs::Payload).json().not_null())
                    .col(ColumnDef::new(ScrapeJobs::WorkerId).uuid())
                    .col(
                        ColumnDef::new(ScrapeJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ScrapeJobs::StartedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Dequeue order: lowest priority value first, then oldest
        manager
            .create_index(
                Index::create()
                    .name("idx_scrape_jobs_status_priority_created")
                    .table(ScrapeJobs::Table)
                    .col(ScrapeJobs::Status)
                    .col(ScrapeJobs::Priority)
                    .col(ScrapeJobs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scrape_jobs_crawl_id")
                    .table(ScrapeJobs::Table)
                    .col(ScrapeJobs::CrawlId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScrapeJobs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScrapeJobs {
    Table,
    Id,
    CrawlId,
    TeamId,
    Url,
    Priority,
    Status,
    Payload,
    WorkerId,
    CreatedAt,
    StartedAt,
}
