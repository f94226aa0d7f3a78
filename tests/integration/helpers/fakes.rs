// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use crawlrs_admission::domain::models::crawl::StoredCrawl;
use crawlrs_admission::domain::models::job::ScrapeJob;
use crawlrs_admission::domain::models::webhook::WebhookEvent;
use crawlrs_admission::domain::repositories::crawl_repository::{CrawlRepository, StoreError};
use crawlrs_admission::domain::repositories::tenant_load_repository::TenantLoadRepository;
use crawlrs_admission::domain::services::webhook_service::WebhookService;
use crawlrs_admission::infrastructure::repositories::memory_store::MemoryCrawlStore;
use crawlrs_admission::queue::job_queue::{JobQueue, QueueError};
use sea_orm::DbErr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

/// 记录所有投递事件的Webhook服务
pub struct RecordingWebhookService {
    tx: mpsc::UnboundedSender<WebhookEvent>,
    rx: Mutex<mpsc::UnboundedReceiver<WebhookEvent>>,
}

impl RecordingWebhookService {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// 等待下一个事件，超时返回 None
    pub async fn next_event(&self, wait: Duration) -> Option<WebhookEvent> {
        let mut rx = self.rx.lock().await;
        tokio::time::timeout(wait, rx.recv()).await.ok().flatten()
    }
}

#[async_trait]
impl WebhookService for RecordingWebhookService {
    async fn send_webhook(&self, event: &WebhookEvent) -> anyhow::Result<()> {
        self.tx
            .send(event.clone())
            .map_err(|e| anyhow::anyhow!("recorder closed: {}", e))
    }
}

/// 推送总是失败的队列
pub struct FailingQueue;

#[async_trait]
impl JobQueue for FailingQueue {
    async fn push(&self, _jobs: &[ScrapeJob]) -> Result<u64, QueueError> {
        Err(QueueError::Database(DbErr::Custom("queue offline".to_string())))
    }

    async fn pop_next(&self, _worker_id: Uuid) -> Result<Option<ScrapeJob>, QueueError> {
        Ok(None)
    }

    async fn pending_count(&self) -> Result<u64, QueueError> {
        Ok(0)
    }
}

/// 负载查询不可用
pub struct UnavailableLoad;

#[async_trait]
impl TenantLoadRepository for UnavailableLoad {
    async fn in_flight(&self, _team_id: Uuid) -> Result<u64, StoreError> {
        Err(StoreError::Corrupt("load store offline".to_string()))
    }

    async fn track(&self, _team_id: Uuid, _job_id: Uuid) -> Result<(), StoreError> {
        Ok(())
    }

    async fn release(&self, _team_id: Uuid, _job_id: Uuid) -> Result<(), StoreError> {
        Ok(())
    }
}

/// 记录作业ID时失败的注册表，其余操作委托给内存存储
pub struct AppendFailingRegistry(pub Arc<MemoryCrawlStore>);

#[async_trait]
impl CrawlRepository for AppendFailingRegistry {
    async fn create(&self, id: Uuid, crawl: &StoredCrawl) -> Result<(), StoreError> {
        self.0.create(id, crawl).await
    }

    async fn get(&self, id: Uuid) -> Result<StoredCrawl, StoreError> {
        self.0.get(id).await
    }

    async fn append_job_ids(&self, _id: Uuid, _job_ids: &[Uuid]) -> Result<(), StoreError> {
        Err(StoreError::Corrupt("registry offline".to_string()))
    }

    async fn job_ids(&self, id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        self.0.job_ids(id).await
    }

    async fn job_count(&self, id: Uuid) -> Result<u64, StoreError> {
        self.0.job_count(id).await
    }

    async fn mark_job_done(&self, id: Uuid, job_id: Uuid) -> Result<(), StoreError> {
        self.0.mark_job_done(id, job_id).await
    }

    async fn done_count(&self, id: Uuid) -> Result<u64, StoreError> {
        self.0.done_count(id).await
    }
}
