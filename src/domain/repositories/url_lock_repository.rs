// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::crawl_repository::StoreError;
use crate::domain::models::crawl::StoredCrawl;
use async_trait::async_trait;
use uuid::Uuid;

/// URL锁集合特质
///
/// 每个爬取一个只增不减的URL集合。`claim` 必须是针对后端存储的
/// 单次原子操作：对同一爬取的并发调用，任何URL最多被报告为
/// "新占用"一次。不同爬取之间互不影响。
#[async_trait]
pub trait UrlLockRepository: Send + Sync {
    /// 占用URL
    ///
    /// # 参数
    ///
    /// * `crawl_id` - 爬取ID
    /// * `crawl` - 爬取记录，用于读取URL数量上限
    /// * `urls` - 候选URL，可包含重复项
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<String>)` - 本次新占用的URL，保持候选顺序
    /// * `Err(StoreError)` - 存储错误，此时不保证任何URL被占用
    async fn claim(
        &self,
        crawl_id: Uuid,
        crawl: &StoredCrawl,
        urls: &[String],
    ) -> Result<Vec<String>, StoreError>;

    /// 已锁定URL数量
    async fn locked_count(&self, crawl_id: Uuid) -> Result<u64, StoreError>;

    /// URL是否已被锁定
    async fn is_locked(&self, crawl_id: Uuid, url: &str) -> Result<bool, StoreError>;
}
