// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    application::{
        dto::batch_scrape_request::{
            BatchScrapeRequestDto, BatchScrapeResponseDto, BatchScrapeStatusDto,
        },
        use_cases::batch_scrape_use_case::{AdmissionError, BatchScrapeUseCase},
    },
    presentation::{errors::AppError, extractors::team_id::Team},
};

/// 接纳一批URL
pub async fn create_batch_scrape(
    Extension(use_case): Extension<Arc<BatchScrapeUseCase>>,
    Team(team): Team,
    payload: Result<Json<BatchScrapeRequestDto>, JsonRejection>,
) -> Result<Json<BatchScrapeResponseDto>, AppError> {
    let Json(payload) =
        payload.map_err(|e| AdmissionError::Validation(e.body_text()))?;

    let outcome = use_case.admit(team, payload).await?;

    Ok(Json(BatchScrapeResponseDto {
        success: true,
        id: outcome.crawl_id,
        url: outcome.url,
        dispatched: outcome.dispatched,
    }))
}

/// 查询批量抓取进度
pub async fn get_batch_scrape_status(
    Extension(use_case): Extension<Arc<BatchScrapeUseCase>>,
    Team(team): Team,
    Path(crawl_id): Path<Uuid>,
) -> Result<Json<BatchScrapeStatusDto>, AppError> {
    let progress = use_case.progress(team.team_id, crawl_id).await?;

    let status = if progress.finished {
        "completed"
    } else {
        "scraping"
    };

    Ok(Json(BatchScrapeStatusDto {
        id: progress.crawl_id,
        status: status.to_string(),
        total: progress.total,
        completed: progress.completed,
        created_at: progress.created_at,
    }))
}
