// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::crawl::{CrawlerOptions, Plan, ScrapeOptions};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 抓取作业
///
/// 每个被接纳的URL对应一个作业。`job_id` 在推送前由分发器生成，
/// 既是队列的去重键，也是爬取记录中的作业ID。分发后不再修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeJob {
    /// 作业唯一标识符
    pub job_id: Uuid,
    /// 调度优先级，数值越小越先执行
    pub priority: i32,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 作业负载
    pub data: ScrapeJobData,
}

/// 作业负载，工作器据此执行抓取
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeJobData {
    pub url: String,
    pub mode: JobMode,
    #[serde(rename = "team_id")]
    pub team_id: Uuid,
    pub plan: Plan,
    pub crawler_options: Option<CrawlerOptions>,
    pub scrape_options: ScrapeOptions,
    pub origin: String,
    #[serde(rename = "crawl_id")]
    pub crawl_id: Uuid,
    pub sitemapped: bool,
    pub v1: bool,
    pub webhook: Option<String>,
}

/// 作业模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobMode {
    /// 单URL抓取
    #[default]
    SingleUrls,
}

impl ScrapeJob {
    /// 以新生成的作业ID构造批量抓取作业
    pub fn new(
        crawl_id: Uuid,
        url: String,
        scrape_options: ScrapeOptions,
        context: &DispatchContext,
    ) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            priority: context.priority,
            created_at: Utc::now(),
            data: ScrapeJobData {
                url,
                mode: JobMode::SingleUrls,
                team_id: context.team_id,
                plan: context.plan.clone(),
                crawler_options: None,
                scrape_options,
                origin: "api".to_string(),
                crawl_id,
                sitemapped: true,
                v1: true,
                webhook: context.webhook.clone(),
            },
        }
    }
}

/// 一次分发中所有作业共享的上下文
#[derive(Debug, Clone)]
pub struct DispatchContext {
    pub team_id: Uuid,
    pub plan: Plan,
    pub priority: i32,
    pub webhook: Option<String>,
}
