// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::redis_keys;
use crate::domain::models::crawl::StoredCrawl;
use crate::domain::repositories::crawl_repository::StoreError;
use crate::domain::repositories::url_lock_repository::UrlLockRepository;
use crate::infrastructure::cache::redis_client::RedisClient;
use async_trait::async_trait;
use redis::AsyncCommands;
use std::sync::Arc;
use uuid::Uuid;

/// KEYS[1] = visited集合, ARGV[1] = ttl, ARGV[2] = 上限(0为不限), ARGV[3..] = 候选URL
const CLAIM_SCRIPT: &str = r#"
    local key = KEYS[1]
    local ttl = tonumber(ARGV[1])
    local limit = tonumber(ARGV[2])
    local claimed = {}

    for i = 3, #ARGV do
        if limit > 0 and redis.call("SCARD", key) >= limit then
            break
        end
        if redis.call("SADD", key, ARGV[i]) == 1 then
            table.insert(claimed, ARGV[i])
        end
    end

    if redis.call("TTL", key) == -1 then
        redis.call("EXPIRE", key, ttl)
    end

    return claimed
"#;

/// 基于Redis集合的URL锁
///
/// 占用通过单个Lua脚本完成，服务端原子执行，并发调用不会重复报告同一URL。
pub struct RedisUrlLockRepository {
    redis: Arc<RedisClient>,
    ttl_seconds: u64,
    script: redis::Script,
}

impl RedisUrlLockRepository {
    pub fn new(redis: Arc<RedisClient>, ttl_seconds: u64) -> Self {
        Self {
            redis,
            ttl_seconds,
            script: redis::Script::new(CLAIM_SCRIPT),
        }
    }
}

#[async_trait]
impl UrlLockRepository for RedisUrlLockRepository {
    async fn claim(
        &self,
        crawl_id: Uuid,
        crawl: &StoredCrawl,
        urls: &[String],
    ) -> Result<Vec<String>, StoreError> {
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.redis.get_connection().await?;
        let mut invocation = self.script.key(redis_keys::crawl_visited(crawl_id));
        invocation
            .arg(self.ttl_seconds)
            .arg(crawl.url_limit().unwrap_or(0));
        for url in urls {
            invocation.arg(url);
        }

        let claimed: Vec<String> = invocation.invoke_async(&mut conn).await?;
        Ok(claimed)
    }

    async fn locked_count(&self, crawl_id: Uuid) -> Result<u64, StoreError> {
        let mut conn = self.redis.get_connection().await?;
        let count: u64 = conn.scard(redis_keys::crawl_visited(crawl_id)).await?;
        Ok(count)
    }

    async fn is_locked(&self, crawl_id: Uuid, url: &str) -> Result<bool, StoreError> {
        let mut conn = self.redis.get_connection().await?;
        let member: bool = conn
            .sismember(redis_keys::crawl_visited(crawl_id), url)
            .await?;
        Ok(member)
    }
}
