// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl::{ScrapeOptions, StoredCrawl};
use crate::domain::models::job::{DispatchContext, ScrapeJob};
use crate::domain::repositories::crawl_repository::{CrawlRepository, StoreError};
use crate::domain::repositories::url_lock_repository::UrlLockRepository;
use crate::queue::job_queue::JobQueue;
use metrics::counter;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// 一次分发的结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    /// 已记录并成功推送到队列的作业ID
    pub job_ids: Vec<Uuid>,
    /// 已被占用（本次或之前）因而跳过的URL
    pub skipped_urls: Vec<String>,
    /// 已占用URL但未能推送的作业ID
    pub failed_job_ids: Vec<Uuid>,
}

impl DispatchReport {
    pub fn dispatched(&self) -> usize {
        self.job_ids.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_job_ids.is_empty()
    }
}

/// 作业分发服务
///
/// 分发顺序固定：
/// 1. 在任何副作用之前为每个候选URL生成作业ID；
/// 2. 通过URL锁集合占用URL，只有新占用的URL继续；
/// 3. 把作业ID追加到爬取记录；
/// 4. 按批推送到共享队列。
///
/// 第2、3步持久化完成之后才开始第4步，因此队列中不会出现
/// 爬取记录里没有的作业ID。推送失败只记录，不回滚、不重试。
pub struct DispatchService {
    crawl_repo: Arc<dyn CrawlRepository>,
    url_locks: Arc<dyn UrlLockRepository>,
    queue: Arc<dyn JobQueue>,
    push_batch_size: usize,
}

impl DispatchService {
    pub fn new(
        crawl_repo: Arc<dyn CrawlRepository>,
        url_locks: Arc<dyn UrlLockRepository>,
        queue: Arc<dyn JobQueue>,
        push_batch_size: usize,
    ) -> Self {
        Self {
            crawl_repo,
            url_locks,
            queue,
            push_batch_size: push_batch_size.max(1),
        }
    }

    /// 分发一批作业
    ///
    /// # 参数
    ///
    /// * `crawl_id` - 爬取ID
    /// * `crawl` - 爬取记录
    /// * `candidates` - (URL, 抓取配置) 列表
    /// * `context` - 作业共享的团队、套餐、优先级与Webhook
    ///
    /// # 返回值
    ///
    /// * `Ok(DispatchReport)` - 分发结果，可能包含推送失败的作业
    /// * `Err(StoreError)` - URL占用失败，此时没有作业被推送
    #[instrument(skip_all, fields(crawl_id = %crawl_id, candidates = candidates.len()))]
    pub async fn dispatch(
        &self,
        crawl_id: Uuid,
        crawl: &StoredCrawl,
        candidates: Vec<(String, ScrapeOptions)>,
        context: &DispatchContext,
    ) -> Result<DispatchReport, StoreError> {
        let jobs: Vec<ScrapeJob> = candidates
            .into_iter()
            .map(|(url, options)| ScrapeJob::new(crawl_id, url, options, context))
            .collect();

        let urls: Vec<String> = jobs.iter().map(|job| job.data.url.clone()).collect();
        let claimed = self.url_locks.claim(crawl_id, crawl, &urls).await?;

        let mut remaining: HashSet<String> = claimed.into_iter().collect();
        let mut admitted = Vec::with_capacity(remaining.len());
        let mut skipped_urls = Vec::new();
        for job in jobs {
            if remaining.remove(&job.data.url) {
                admitted.push(job);
            } else {
                skipped_urls.push(job.data.url);
            }
        }

        counter!("admission_urls_skipped_total").increment(skipped_urls.len() as u64);
        debug!(
            claimed = admitted.len(),
            skipped = skipped_urls.len(),
            "URLs claimed"
        );

        if admitted.is_empty() {
            return Ok(DispatchReport {
                skipped_urls,
                ..Default::default()
            });
        }

        let ids: Vec<Uuid> = admitted.iter().map(|job| job.job_id).collect();
        if let Err(e) = self.crawl_repo.append_job_ids(crawl_id, &ids).await {
            // Unrecorded ids must never reach the queue.
            error!(
                failed = ids.len(),
                "Failed to record job ids, jobs not pushed: {}",
                e
            );
            counter!("admission_dispatch_failures_total").increment(ids.len() as u64);
            return Ok(DispatchReport {
                job_ids: Vec::new(),
                skipped_urls,
                failed_job_ids: ids,
            });
        }

        let mut report = DispatchReport {
            skipped_urls,
            ..Default::default()
        };

        for chunk in admitted.chunks(self.push_batch_size) {
            match self.queue.push(chunk).await {
                Ok(inserted) => {
                    if inserted < chunk.len() as u64 {
                        debug!(
                            pushed = chunk.len(),
                            inserted,
                            "Queue ignored already present job ids"
                        );
                    }
                    report.job_ids.extend(chunk.iter().map(|job| job.job_id));
                }
                Err(e) => {
                    error!(
                        failed = chunk.len(),
                        "Failed to push jobs to queue: {}",
                        e
                    );
                    report
                        .failed_job_ids
                        .extend(chunk.iter().map(|job| job.job_id));
                }
            }
        }

        counter!("admission_jobs_dispatched_total").increment(report.job_ids.len() as u64);
        if report.has_failures() {
            counter!("admission_dispatch_failures_total")
                .increment(report.failed_job_ids.len() as u64);
        }

        Ok(report)
    }
}
