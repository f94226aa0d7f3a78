// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::job_queue::{JobQueue, QueueError};
use crate::domain::models::job::ScrapeJob;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct QueueState {
    /// (优先级, 入队序号) -> 作业
    pending: BTreeMap<(i32, u64), ScrapeJob>,
    /// 曾经入队过的作业ID，用于幂等推送
    seen: HashSet<Uuid>,
    next_seq: u64,
}

/// 进程内作业队列
///
/// 单实例部署与测试使用，语义与 [`super::job_queue::PostgresJobQueue`] 一致。
#[derive(Default)]
pub struct InMemoryJobQueue {
    state: Mutex<QueueState>,
}

impl InMemoryJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前等待中的作业快照，按领取顺序排列
    pub async fn snapshot(&self) -> Vec<ScrapeJob> {
        self.state.lock().await.pending.values().cloned().collect()
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn push(&self, jobs: &[ScrapeJob]) -> Result<u64, QueueError> {
        let mut state = self.state.lock().await;
        let mut inserted = 0;

        for job in jobs {
            if !state.seen.insert(job.job_id) {
                continue;
            }
            let seq = state.next_seq;
            state.next_seq += 1;
            state.pending.insert((job.priority, seq), job.clone());
            inserted += 1;
        }

        Ok(inserted)
    }

    async fn pop_next(&self, _worker_id: Uuid) -> Result<Option<ScrapeJob>, QueueError> {
        let mut state = self.state.lock().await;
        Ok(state.pending.pop_first().map(|(_, job)| job))
    }

    async fn pending_count(&self) -> Result<u64, QueueError> {
        Ok(self.state.lock().await.pending.len() as u64)
    }
}
