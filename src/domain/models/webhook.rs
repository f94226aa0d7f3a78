// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use uuid::Uuid;

/// Webhook事件实体
///
/// 表示一次待投递的通知。投递是尽力而为的，不持久化、不重试。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// 事件唯一标识符
    pub id: Uuid,
    /// 所属团队ID
    pub team_id: Uuid,
    /// 关联的爬取ID
    pub crawl_id: Uuid,
    /// 事件类型
    pub event_type: WebhookEventType,
    /// 是否为成功事件
    pub success: bool,
    /// 投递目标URL
    pub webhook_url: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl WebhookEvent {
    pub fn new(
        team_id: Uuid,
        crawl_id: Uuid,
        event_type: WebhookEventType,
        success: bool,
        webhook_url: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_id,
            crawl_id,
            event_type,
            success,
            webhook_url,
            created_at: Utc::now(),
        }
    }

    /// 投递给接收方的JSON正文
    pub fn payload(&self) -> serde_json::Value {
        json!({
            "success": self.success,
            "type": self.event_type.to_string(),
            "id": self.crawl_id,
            "data": [],
            "error": serde_json::Value::Null,
        })
    }
}

/// Webhook事件类型枚举
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// 批量抓取已开始，仅在新建爬取时触发一次
    BatchScrapeStarted,
}

impl fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebhookEventType::BatchScrapeStarted => write!(f, "batch_scrape.started"),
        }
    }
}
