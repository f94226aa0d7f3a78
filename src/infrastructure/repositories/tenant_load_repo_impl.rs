// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::redis_keys;
use crate::domain::repositories::crawl_repository::StoreError;
use crate::domain::repositories::tenant_load_repository::TenantLoadRepository;
use crate::infrastructure::cache::redis_client::RedisClient;
use async_trait::async_trait;
use redis::AsyncCommands;
use std::sync::Arc;
use uuid::Uuid;

/// 在途集合的过期时间，工作器每次登记时刷新
const IN_FLIGHT_TTL_SECONDS: i64 = 60;

/// 基于Redis集合的租户负载
pub struct RedisTenantLoadRepository {
    redis: Arc<RedisClient>,
}

impl RedisTenantLoadRepository {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl TenantLoadRepository for RedisTenantLoadRepository {
    async fn in_flight(&self, team_id: Uuid) -> Result<u64, StoreError> {
        let mut conn = self.redis.get_connection().await?;
        let count: u64 = conn.scard(redis_keys::team_in_flight(team_id)).await?;
        Ok(count)
    }

    async fn track(&self, team_id: Uuid, job_id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.redis.get_connection().await?;
        let key = redis_keys::team_in_flight(team_id);

        redis::pipe()
            .atomic()
            .sadd(&key, job_id.to_string())
            .ignore()
            .expire(&key, IN_FLIGHT_TTL_SECONDS)
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;

        Ok(())
    }

    async fn release(&self, team_id: Uuid, job_id: Uuid) -> Result<(), StoreError> {
        let mut conn = self.redis.get_connection().await?;
        conn.srem::<_, _, ()>(redis_keys::team_in_flight(team_id), job_id.to_string())
            .await?;
        Ok(())
    }
}
