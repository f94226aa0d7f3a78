// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::ScrapeJob;
use crate::infrastructure::database::entities::scrape_job;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::{LockBehavior, LockType, OnConflict},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// 队列错误类型
#[derive(Error, Debug)]
pub enum QueueError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// 作业负载无法编解码
    #[error("Payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

/// 队列中作业的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// 等待工作器领取
    Queued,
    /// 已被某个工作器领取
    Active,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Active => write!(f, "active"),
        }
    }
}

/// 共享优先级作业队列特质
///
/// 推送以作业ID为幂等键：重复推送同一ID不会产生第二个可投递项。
/// 优先级数值越小越先被领取，同优先级按创建时间先后。
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// 推送一批作业
    ///
    /// # 返回值
    ///
    /// * `Ok(u64)` - 新入队的作业数（已存在的ID被忽略）
    /// * `Err(QueueError)` - 整批推送失败
    async fn push(&self, jobs: &[ScrapeJob]) -> Result<u64, QueueError>;

    /// 领取下一个作业（工作器侧）
    async fn pop_next(&self, worker_id: Uuid) -> Result<Option<ScrapeJob>, QueueError>;

    /// 等待领取的作业数
    async fn pending_count(&self) -> Result<u64, QueueError>;
}

/// PostgreSQL作业队列实现
///
/// 作业存放在 `scrape_jobs` 表中，领取时使用 `FOR UPDATE SKIP LOCKED`
/// 保证每个作业只交给一个工作器。
#[derive(Clone)]
pub struct PostgresJobQueue {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl PostgresJobQueue {
    /// 创建新的PostgreSQL作业队列实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_active_model(job: &ScrapeJob) -> Result<scrape_job::ActiveModel, QueueError> {
    Ok(scrape_job::ActiveModel {
        id: Set(job.job_id),
        crawl_id: Set(job.data.crawl_id),
        team_id: Set(job.data.team_id),
        url: Set(job.data.url.clone()),
        priority: Set(job.priority),
        status: Set(JobStatus::Queued.to_string()),
        payload: Set(serde_json::to_value(&job.data)?),
        worker_id: Set(None),
        created_at: Set(job.created_at.into()),
        started_at: Set(None),
    })
}

impl TryFrom<scrape_job::Model> for ScrapeJob {
    type Error = QueueError;

    fn try_from(model: scrape_job::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            job_id: model.id,
            priority: model.priority,
            created_at: model.created_at.with_timezone(&Utc),
            data: serde_json::from_value(model.payload)?,
        })
    }
}

#[async_trait]
impl JobQueue for PostgresJobQueue {
    async fn push(&self, jobs: &[ScrapeJob]) -> Result<u64, QueueError> {
        if jobs.is_empty() {
            return Ok(0);
        }

        let models = jobs
            .iter()
            .map(to_active_model)
            .collect::<Result<Vec<_>, _>>()?;

        let inserted = scrape_job::Entity::insert_many(models)
            .on_conflict(
                OnConflict::column(scrape_job::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;

        Ok(inserted)
    }

    async fn pop_next(&self, worker_id: Uuid) -> Result<Option<ScrapeJob>, QueueError> {
        let txn = self.db.begin().await?;

        let model = scrape_job::Entity::find()
            .filter(scrape_job::Column::Status.eq(JobStatus::Queued.to_string()))
            .order_by_asc(scrape_job::Column::Priority)
            .order_by_asc(scrape_job::Column::CreatedAt)
            .lock_with_behavior(LockType::Update, LockBehavior::SkipLocked)
            .one(&txn)
            .await?;

        let Some(model) = model else {
            txn.commit().await?;
            return Ok(None);
        };

        let mut active: scrape_job::ActiveModel = model.into();
        active.status = Set(JobStatus::Active.to_string());
        active.worker_id = Set(Some(worker_id));
        active.started_at = Set(Some(Utc::now().into()));
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        Ok(Some(updated.try_into()?))
    }

    async fn pending_count(&self) -> Result<u64, QueueError> {
        let count = scrape_job::Entity::find()
            .filter(scrape_job::Column::Status.eq(JobStatus::Queued.to_string()))
            .count(self.db.as_ref())
            .await?;
        Ok(count)
    }
}
