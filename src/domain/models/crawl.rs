// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 爬取任务记录
///
/// 一次逻辑爬取（或批量抓取）共享的持久化记录。创建后
/// `scrape_options`、`team_id`、`plan`、`created_at` 不再改变。
/// 已锁定的URL集合与作业ID序列存放在独立的键下，只增不减。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCrawl {
    /// 抓取配置快照，应用于该爬取下的每个作业
    pub scrape_options: ScrapeOptions,
    /// 链接跟随爬取的配置，批量抓取时为空
    pub crawler_options: Option<CrawlerOptions>,
    /// 系统内部标志，不对租户暴露
    pub internal_options: InternalOptions,
    /// 所属团队ID
    #[serde(rename = "team_id")]
    pub team_id: Uuid,
    /// 服务套餐
    pub plan: Plan,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl StoredCrawl {
    /// 为批量抓取请求构造新的爬取记录
    pub fn for_batch(team_id: Uuid, plan: Plan, scrape_options: ScrapeOptions) -> Self {
        Self {
            scrape_options,
            crawler_options: None,
            internal_options: InternalOptions {
                is_batch: true,
                ..Default::default()
            },
            team_id,
            plan,
            created_at: Utc::now(),
        }
    }

    /// 锁定URL数量上限（仅链接跟随爬取设置）
    pub fn url_limit(&self) -> Option<u64> {
        self.crawler_options.as_ref().and_then(|o| o.limit)
    }
}

/// 抓取配置
///
/// 未识别的字段保存在 `extra` 中原样透传给下游工作器。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOptions {
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    #[serde(default = "default_true")]
    pub only_main_content: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    /// 页面加载后额外等待时间（毫秒）
    #[serde(default)]
    pub wait_for: u64,
    /// 单页超时时间（毫秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub mobile: bool,
    #[serde(default)]
    pub skip_tls_verification: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            formats: default_formats(),
            only_main_content: true,
            include_tags: Vec::new(),
            exclude_tags: Vec::new(),
            headers: HashMap::new(),
            wait_for: 0,
            timeout: None,
            mobile: false,
            skip_tls_verification: false,
            extra: serde_json::Map::new(),
        }
    }
}

fn default_formats() -> Vec<String> {
    vec!["markdown".to_string()]
}

fn default_true() -> bool {
    true
}

/// 链接跟随爬取配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlerOptions {
    /// 最多锁定的URL数量
    pub limit: Option<u64>,
    #[serde(default)]
    pub include_paths: Vec<String>,
    #[serde(default)]
    pub exclude_paths: Vec<String>,
    pub max_depth: Option<u32>,
}

/// 系统内部配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalOptions {
    #[serde(default)]
    pub disable_smart_wait_cache: bool,
    #[serde(default)]
    pub is_batch: bool,
}

/// 服务套餐
///
/// 决定大批量提交时的公平性调整参数。未知套餐按最保守的
/// 参数处理。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Plan {
    Free,
    Hobby,
    Standard,
    Growth,
    Scale,
    Enterprise,
    TestSuite,
    Unknown(String),
}

impl Plan {
    /// 返回 (桶容量, 套餐系数)
    ///
    /// 团队在途作业数超过桶容量后，每超出一个作业，优先级数值
    /// 增加 `系数` 个单位。
    pub fn fairness_bucket(&self) -> (u64, f64) {
        match self {
            Plan::TestSuite => (1000, 0.25),
            Plan::Free => (25, 0.5),
            Plan::Hobby => (100, 0.3),
            Plan::Standard => (200, 0.2),
            Plan::Growth => (400, 0.1),
            Plan::Scale | Plan::Enterprise => (1000, 0.05),
            Plan::Unknown(_) => (25, 1.0),
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Plan::Free => write!(f, "free"),
            Plan::Hobby => write!(f, "hobby"),
            Plan::Standard => write!(f, "standard"),
            Plan::Growth => write!(f, "growth"),
            Plan::Scale => write!(f, "scale"),
            Plan::Enterprise => write!(f, "enterprise"),
            Plan::TestSuite => write!(f, "test_suite"),
            Plan::Unknown(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for Plan {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let plan = match s.trim().to_ascii_lowercase().as_str() {
            "free" => Plan::Free,
            "hobby" => Plan::Hobby,
            "standard" | "standardnew" => Plan::Standard,
            "growth" | "growthdouble" => Plan::Growth,
            "scale" => Plan::Scale,
            "enterprise" | "etier1a" | "etier2c" => Plan::Enterprise,
            "test_suite" | "testsuite" => Plan::TestSuite,
            other => Plan::Unknown(other.to_string()),
        };
        Ok(plan)
    }
}

impl Serialize for Plan {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Plan {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        // Infallible
        Ok(raw.parse().unwrap_or(Plan::Unknown(raw)))
    }
}
