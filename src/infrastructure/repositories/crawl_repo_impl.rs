// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::redis_keys;
use crate::domain::models::crawl::StoredCrawl;
use crate::domain::repositories::crawl_repository::{CrawlRepository, StoreError};
use crate::infrastructure::cache::redis_client::RedisClient;
use async_trait::async_trait;
use redis::AsyncCommands;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// 基于Redis的爬取注册表
pub struct RedisCrawlRepository {
    /// Redis客户端
    redis: Arc<RedisClient>,
    /// 爬取相关键的过期时间（秒）
    ttl_seconds: u64,
}

impl RedisCrawlRepository {
    /// 创建新的爬取注册表实例
    ///
    /// # 参数
    ///
    /// * `redis` - Redis客户端
    /// * `ttl_seconds` - 键过期时间
    pub fn new(redis: Arc<RedisClient>, ttl_seconds: u64) -> Self {
        Self { redis, ttl_seconds }
    }

    async fn conn(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        Ok(self.redis.get_connection().await?)
    }
}

#[async_trait]
impl CrawlRepository for RedisCrawlRepository {
    async fn create(&self, id: Uuid, crawl: &StoredCrawl) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        let body = serde_json::to_string(crawl)?;

        let reply: Option<String> = redis::cmd("SET")
            .arg(redis_keys::crawl(id))
            .arg(body)
            .arg("NX")
            .arg("EX")
            .arg(self.ttl_seconds)
            .query_async(&mut conn)
            .await?;

        match reply {
            Some(_) => Ok(()),
            None => Err(StoreError::AlreadyExists),
        }
    }

    async fn get(&self, id: Uuid) -> Result<StoredCrawl, StoreError> {
        let mut conn = self.conn().await?;
        let body: Option<String> = conn.get(redis_keys::crawl(id)).await?;
        let body = body.ok_or(StoreError::NotFound)?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn append_job_ids(&self, id: Uuid, job_ids: &[Uuid]) -> Result<(), StoreError> {
        if job_ids.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn().await?;
        let key = redis_keys::crawl_jobs(id);
        let values: Vec<String> = job_ids.iter().map(Uuid::to_string).collect();

        redis::pipe()
            .atomic()
            .rpush(&key, values)
            .ignore()
            .cmd("EXPIRE")
            .arg(&key)
            .arg(self.ttl_seconds)
            .arg("NX")
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;

        Ok(())
    }

    async fn job_ids(&self, id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let mut conn = self.conn().await?;
        let raw: Vec<String> = conn.lrange(redis_keys::crawl_jobs(id), 0, -1).await?;
        raw.iter()
            .map(|s| Uuid::from_str(s).map_err(|e| StoreError::Corrupt(e.to_string())))
            .collect()
    }

    async fn job_count(&self, id: Uuid) -> Result<u64, StoreError> {
        let mut conn = self.conn().await?;
        let len: u64 = conn.llen(redis_keys::crawl_jobs(id)).await?;
        Ok(len)
    }

    async fn mark_job_done(&self, id: Uuid, job_id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.conn().await?;
        let key = redis_keys::crawl_jobs_done(id);

        redis::pipe()
            .atomic()
            .sadd(&key, job_id.to_string())
            .ignore()
            .cmd("EXPIRE")
            .arg(&key)
            .arg(self.ttl_seconds)
            .arg("NX")
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;

        Ok(())
    }

    async fn done_count(&self, id: Uuid) -> Result<u64, StoreError> {
        let mut conn = self.conn().await?;
        let count: u64 = conn.scard(redis_keys::crawl_jobs_done(id)).await?;
        Ok(count)
    }
}
