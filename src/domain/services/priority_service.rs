// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl::Plan;
use crate::domain::repositories::tenant_load_repository::TenantLoadRepository;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// 优先级策略参数
///
/// 数值越小越紧急。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityPolicy {
    /// 小批量的默认优先级
    pub default_priority: i32,
    /// 大批量的基础优先级
    pub large_batch_base_priority: i32,
    /// 超过该URL数即视为大批量
    pub large_batch_threshold: usize,
}

impl Default for PriorityPolicy {
    fn default() -> Self {
        Self {
            default_priority: 20,
            large_batch_base_priority: 21,
            large_batch_threshold: 1000,
        }
    }
}

/// 按租户在途负载调整基础优先级
///
/// 在途作业数不超过套餐桶容量时返回 `base`，否则每超出一个作业
/// 增加套餐系数，结果向上取整。
pub fn fairness_priority(base: i32, plan: &Plan, in_flight: u64) -> i32 {
    let (bucket_limit, modifier) = plan.fairness_bucket();
    if in_flight <= bucket_limit {
        return base;
    }

    let overflow = (in_flight - bucket_limit) as f64;
    let bump = (overflow * modifier).ceil();
    base.saturating_add(bump.min(i32::MAX as f64) as i32)
}

/// 优先级计算服务
pub struct PriorityService {
    policy: PriorityPolicy,
    tenant_load: Arc<dyn TenantLoadRepository>,
}

impl PriorityService {
    pub fn new(policy: PriorityPolicy, tenant_load: Arc<dyn TenantLoadRepository>) -> Self {
        Self {
            policy,
            tenant_load,
        }
    }

    /// 计算一批作业的优先级
    ///
    /// 负载查询失败时退回大批量基础优先级，不阻塞接纳。
    pub async fn compute(&self, team_id: Uuid, plan: &Plan, batch_size: usize) -> i32 {
        if batch_size <= self.policy.large_batch_threshold {
            return self.policy.default_priority;
        }

        let base = self.policy.large_batch_base_priority;
        match self.tenant_load.in_flight(team_id).await {
            Ok(in_flight) => {
                let priority = fairness_priority(base, plan, in_flight);
                debug!(
                    team_id = %team_id,
                    in_flight,
                    priority,
                    "Computed fairness priority"
                );
                priority
            }
            Err(e) => {
                warn!(
                    team_id = %team_id,
                    "Tenant load unavailable, using base priority {}: {}",
                    base,
                    e
                );
                base
            }
        }
    }
}
