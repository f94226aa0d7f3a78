// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::{
    application::dto::batch_scrape_request::BatchScrapeRequestDto,
    domain::{
        models::{
            crawl::StoredCrawl, job::DispatchContext, team::TeamContext,
            webhook::WebhookEventType,
        },
        repositories::crawl_repository::{CrawlRepository, StoreError},
        services::{
            dispatch_service::DispatchService, priority_service::PriorityService,
            webhook_service::CrawlNotifier,
        },
    },
};
use chrono::{DateTime, Utc};
use metrics::counter;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Error, Debug)]
pub enum AdmissionError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Crawl not found")]
    NotFound,
    #[error("Crawl id already exists")]
    AlreadyExists,
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AdmissionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AdmissionError::NotFound,
            StoreError::AlreadyExists => AdmissionError::AlreadyExists,
            other => AdmissionError::Store(other),
        }
    }
}

/// 一次接纳的结果
#[derive(Debug, Clone)]
pub struct AdmissionOutcome {
    pub crawl_id: Uuid,
    /// 查询该爬取的资源地址
    pub url: String,
    /// 成功推送的作业数
    pub dispatched: usize,
    /// 因已锁定而跳过的URL数
    pub skipped: usize,
    /// 已占用但未推送的作业数
    pub failed: usize,
    pub priority: i32,
    /// 是否新建了爬取
    pub is_new: bool,
    /// 是否触发了开始事件
    pub started_event: bool,
}

/// 爬取进度
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlProgress {
    pub crawl_id: Uuid,
    pub total: u64,
    pub completed: u64,
    pub finished: bool,
    pub created_at: DateTime<Utc>,
}

/// 批量抓取接纳用例
///
/// 解析爬取（新建或追加）→ 计算优先级 → 分发 → 通知 → 返回。
/// 校验与身份错误在任何写操作之前返回；一旦开始写入，
/// 尽可能完成后续步骤，不回滚。
pub struct BatchScrapeUseCase {
    crawl_repo: Arc<dyn CrawlRepository>,
    priority_service: PriorityService,
    dispatch_service: DispatchService,
    notifier: CrawlNotifier,
    public_base_url: String,
    max_batch_size: usize,
}

impl BatchScrapeUseCase {
    pub fn new(
        crawl_repo: Arc<dyn CrawlRepository>,
        priority_service: PriorityService,
        dispatch_service: DispatchService,
        notifier: CrawlNotifier,
        public_base_url: String,
        max_batch_size: usize,
    ) -> Self {
        Self {
            crawl_repo,
            priority_service,
            dispatch_service,
            notifier,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_batch_size,
        }
    }

    /// 爬取的资源地址
    pub fn resource_url(&self, crawl_id: Uuid) -> String {
        format!("{}/v1/batch/scrape/{}", self.public_base_url, crawl_id)
    }

    /// 接纳一批URL
    ///
    /// # 参数
    ///
    /// * `team` - 发起请求的团队
    /// * `dto` - 请求内容
    ///
    /// # 返回值
    ///
    /// * `Ok(AdmissionOutcome)` - 爬取ID与分发结果，可能包含部分推送失败
    /// * `Err(AdmissionError)` - 致命错误
    #[instrument(
        skip_all,
        fields(team_id = %team.team_id, batch_size = dto.urls.len(), crawl_id)
    )]
    pub async fn admit(
        &self,
        team: TeamContext,
        dto: BatchScrapeRequestDto,
    ) -> Result<AdmissionOutcome, AdmissionError> {
        dto.validate()
            .map_err(|e| AdmissionError::Validation(e.to_string()))?;
        if dto.urls.len() > self.max_batch_size {
            return Err(AdmissionError::Validation(format!(
                "urls: at most {} URLs per batch",
                self.max_batch_size
            )));
        }

        let (crawl_id, crawl, is_new) = self.resolve_crawl(&team, &dto).await?;
        tracing::Span::current().record("crawl_id", tracing::field::display(crawl_id));
        let kind = if is_new { "new" } else { "append" };
        counter!("admission_requests_total", "kind" => kind).increment(1);

        let priority = self
            .priority_service
            .compute(team.team_id, &team.plan, dto.urls.len())
            .await;

        let context = DispatchContext {
            team_id: team.team_id,
            plan: team.plan.clone(),
            priority,
            // Per request, unlike scrape options which stay with the crawl.
            webhook: dto.webhook.clone(),
        };
        let candidates = dto
            .urls
            .into_iter()
            .map(|url| (url, crawl.scrape_options.clone()))
            .collect();

        let report = self
            .dispatch_service
            .dispatch(crawl_id, &crawl, candidates, &context)
            .await?;

        if report.has_failures() {
            error!(
                failed = report.failed_job_ids.len(),
                "Batch partially dispatched"
            );
        }

        let started_event = match (&dto.webhook, is_new) {
            (Some(webhook), true) => {
                self.notifier.crawl_started(
                    team.team_id,
                    crawl_id,
                    webhook,
                    WebhookEventType::BatchScrapeStarted,
                );
                true
            }
            _ => false,
        };

        info!(
            dispatched = report.dispatched(),
            skipped = report.skipped_urls.len(),
            priority,
            is_new,
            "Batch admitted"
        );

        Ok(AdmissionOutcome {
            crawl_id,
            url: self.resource_url(crawl_id),
            dispatched: report.dispatched(),
            skipped: report.skipped_urls.len(),
            failed: report.failed_job_ids.len(),
            priority,
            is_new,
            started_event,
        })
    }

    async fn resolve_crawl(
        &self,
        team: &TeamContext,
        dto: &BatchScrapeRequestDto,
    ) -> Result<(Uuid, StoredCrawl, bool), AdmissionError> {
        if let Some(existing) = dto.append_to_id {
            let crawl = self.crawl_repo.get(existing).await?;
            if crawl.team_id != team.team_id {
                return Err(AdmissionError::NotFound);
            }
            return Ok((existing, crawl, false));
        }

        let crawl_id = Uuid::new_v4();
        let crawl = StoredCrawl::for_batch(team.team_id, team.plan.clone(), dto.scrape_options.clone());
        self.crawl_repo.create(crawl_id, &crawl).await?;
        info!(crawl_id = %crawl_id, "Crawl created");

        Ok((crawl_id, crawl, true))
    }

    /// 查询爬取进度，其他团队的爬取视为不存在
    pub async fn progress(
        &self,
        team_id: Uuid,
        crawl_id: Uuid,
    ) -> Result<CrawlProgress, AdmissionError> {
        let crawl = self.crawl_repo.get(crawl_id).await?;
        if crawl.team_id != team_id {
            return Err(AdmissionError::NotFound);
        }

        let total = self.crawl_repo.job_count(crawl_id).await?;
        let completed = self.crawl_repo.done_count(crawl_id).await?;

        Ok(CrawlProgress {
            crawl_id,
            total,
            completed,
            finished: total > 0 && completed >= total,
            created_at: crawl.created_at,
        })
    }
}
