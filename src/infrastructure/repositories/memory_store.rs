// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl::StoredCrawl;
use crate::domain::repositories::crawl_repository::{CrawlRepository, StoreError};
use crate::domain::repositories::tenant_load_repository::TenantLoadRepository;
use crate::domain::repositories::url_lock_repository::UrlLockRepository;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashSet;
use uuid::Uuid;

/// 单个爬取在内存中的状态
#[derive(Default)]
struct CrawlState {
    visited: HashSet<String>,
    job_ids: Vec<Uuid>,
    jobs_done: HashSet<Uuid>,
}

/// 进程内存储
///
/// 同时实现爬取注册表、URL锁集合与租户负载，用于单实例运行和测试。
/// 每个爬取的状态由DashMap分片锁保护，锁只在同步代码段内持有。
#[derive(Default)]
pub struct MemoryCrawlStore {
    crawls: DashMap<Uuid, StoredCrawl>,
    states: DashMap<Uuid, CrawlState>,
    in_flight: DashMap<Uuid, HashSet<Uuid>>,
}

impl MemoryCrawlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前已锁定的URL（无序）
    pub fn locked_urls(&self, crawl_id: Uuid) -> HashSet<String> {
        self.states
            .get(&crawl_id)
            .map(|s| s.visited.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CrawlRepository for MemoryCrawlStore {
    async fn create(&self, id: Uuid, crawl: &StoredCrawl) -> Result<(), StoreError> {
        match self.crawls.entry(id) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(crawl.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: Uuid) -> Result<StoredCrawl, StoreError> {
        self.crawls
            .get(&id)
            .map(|c| c.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn append_job_ids(&self, id: Uuid, job_ids: &[Uuid]) -> Result<(), StoreError> {
        if job_ids.is_empty() {
            return Ok(());
        }
        self.states
            .entry(id)
            .or_default()
            .job_ids
            .extend_from_slice(job_ids);
        Ok(())
    }

    async fn job_ids(&self, id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        Ok(self
            .states
            .get(&id)
            .map(|s| s.job_ids.clone())
            .unwrap_or_default())
    }

    async fn job_count(&self, id: Uuid) -> Result<u64, StoreError> {
        Ok(self
            .states
            .get(&id)
            .map(|s| s.job_ids.len() as u64)
            .unwrap_or(0))
    }

    async fn mark_job_done(&self, id: Uuid, job_id: Uuid) -> Result<(), StoreError> {
        self.states.entry(id).or_default().jobs_done.insert(job_id);
        Ok(())
    }

    async fn done_count(&self, id: Uuid) -> Result<u64, StoreError> {
        Ok(self
            .states
            .get(&id)
            .map(|s| s.jobs_done.len() as u64)
            .unwrap_or(0))
    }
}

#[async_trait]
impl UrlLockRepository for MemoryCrawlStore {
    async fn claim(
        &self,
        crawl_id: Uuid,
        crawl: &StoredCrawl,
        urls: &[String],
    ) -> Result<Vec<String>, StoreError> {
        let limit = crawl.url_limit();
        let mut state = self.states.entry(crawl_id).or_default();
        let mut claimed = Vec::new();

        for url in urls {
            if limit.is_some_and(|max| state.visited.len() as u64 >= max) {
                break;
            }
            if state.visited.insert(url.clone()) {
                claimed.push(url.clone());
            }
        }

        Ok(claimed)
    }

    async fn locked_count(&self, crawl_id: Uuid) -> Result<u64, StoreError> {
        Ok(self
            .states
            .get(&crawl_id)
            .map(|s| s.visited.len() as u64)
            .unwrap_or(0))
    }

    async fn is_locked(&self, crawl_id: Uuid, url: &str) -> Result<bool, StoreError> {
        Ok(self
            .states
            .get(&crawl_id)
            .is_some_and(|s| s.visited.contains(url)))
    }
}

#[async_trait]
impl TenantLoadRepository for MemoryCrawlStore {
    async fn in_flight(&self, team_id: Uuid) -> Result<u64, StoreError> {
        Ok(self
            .in_flight
            .get(&team_id)
            .map(|s| s.len() as u64)
            .unwrap_or(0))
    }

    async fn track(&self, team_id: Uuid, job_id: Uuid) -> Result<(), StoreError> {
        self.in_flight.entry(team_id).or_default().insert(job_id);
        Ok(())
    }

    async fn release(&self, team_id: Uuid, job_id: Uuid) -> Result<(), StoreError> {
        if let Some(mut jobs) = self.in_flight.get_mut(&team_id) {
            jobs.remove(&job_id);
        }
        Ok(())
    }
}
