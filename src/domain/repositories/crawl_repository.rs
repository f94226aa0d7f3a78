// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl::StoredCrawl;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// 存储层错误类型
///
/// 爬取注册表、URL锁集合与租户负载查询共用。
#[derive(Error, Debug)]
pub enum StoreError {
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 记录已存在
    #[error("Record already exists")]
    AlreadyExists,
    /// Redis错误
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// 存储中的数据无法解析
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// 爬取注册表特质
///
/// 将爬取ID映射到 `StoredCrawl` 记录，并维护该爬取下的作业ID序列。
/// 所有写操作在返回成功前已持久化。
#[async_trait]
pub trait CrawlRepository: Send + Sync {
    /// 创建爬取记录
    ///
    /// # 参数
    ///
    /// * `id` - 爬取ID
    /// * `crawl` - 爬取记录
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 创建成功
    /// * `Err(StoreError::AlreadyExists)` - ID已被占用
    async fn create(&self, id: Uuid, crawl: &StoredCrawl) -> Result<(), StoreError>;

    /// 获取爬取记录
    ///
    /// # 返回值
    ///
    /// * `Ok(StoredCrawl)` - 当前记录
    /// * `Err(StoreError::NotFound)` - 记录不存在
    async fn get(&self, id: Uuid) -> Result<StoredCrawl, StoreError>;

    /// 原子地追加作业ID，并发追加不会丢失条目
    async fn append_job_ids(&self, id: Uuid, job_ids: &[Uuid]) -> Result<(), StoreError>;

    /// 按追加顺序返回作业ID
    async fn job_ids(&self, id: Uuid) -> Result<Vec<Uuid>, StoreError>;

    /// 作业ID数量
    async fn job_count(&self, id: Uuid) -> Result<u64, StoreError>;

    /// 标记作业已完成（由工作器调用）
    async fn mark_job_done(&self, id: Uuid, job_id: Uuid) -> Result<(), StoreError>;

    /// 已完成作业数量
    async fn done_count(&self, id: Uuid) -> Result<u64, StoreError>;

    /// 所有已记录的作业均已完成
    async fn is_finished(&self, id: Uuid) -> Result<bool, StoreError> {
        let total = self.job_count(id).await?;
        if total == 0 {
            return Ok(false);
        }
        Ok(self.done_count(id).await? >= total)
    }
}
