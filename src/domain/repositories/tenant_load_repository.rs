// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::crawl_repository::StoreError;
use async_trait::async_trait;
use uuid::Uuid;

/// 租户负载查询特质
///
/// 记录每个团队当前在途的作业，供优先级计算做公平性调整。
/// 调用方必须容忍该查询不可用。
#[async_trait]
pub trait TenantLoadRepository: Send + Sync {
    /// 团队当前在途作业数
    async fn in_flight(&self, team_id: Uuid) -> Result<u64, StoreError>;

    /// 作业开始执行时登记（由工作器调用）
    async fn track(&self, team_id: Uuid, job_id: Uuid) -> Result<(), StoreError>;

    /// 作业结束时注销（由工作器调用）
    async fn release(&self, team_id: Uuid, job_id: Uuid) -> Result<(), StoreError>;
}
