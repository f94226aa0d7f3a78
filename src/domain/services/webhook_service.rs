// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::webhook::{WebhookEvent, WebhookEventType};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Webhook服务特质
///
/// 定义Webhook发送的核心逻辑
#[async_trait]
pub trait WebhookService: Send + Sync {
    /// 发送Webhook事件
    ///
    /// # 参数
    ///
    /// * `event` - Webhook事件
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 发送成功
    /// * `Err(anyhow::Error)` - 发送失败
    async fn send_webhook(&self, event: &WebhookEvent) -> Result<()>;
}

/// 事件通知器
///
/// 把投递交给运行时后台执行后立即返回，调用方从不等待接收方。
/// 投递失败只记录日志，不重试。
#[derive(Clone)]
pub struct CrawlNotifier {
    webhook_service: Arc<dyn WebhookService>,
}

impl CrawlNotifier {
    pub fn new(webhook_service: Arc<dyn WebhookService>) -> Self {
        Self { webhook_service }
    }

    /// 通知爬取已开始
    ///
    /// 只应在新建爬取时调用一次，追加到已有爬取时不调用。
    pub fn crawl_started(
        &self,
        team_id: Uuid,
        crawl_id: Uuid,
        webhook_url: &str,
        event_type: WebhookEventType,
    ) {
        let event = WebhookEvent::new(team_id, crawl_id, event_type, true, webhook_url.to_string());
        let service = Arc::clone(&self.webhook_service);

        tokio::spawn(async move {
            match service.send_webhook(&event).await {
                Ok(()) => debug!(
                    crawl_id = %event.crawl_id,
                    event_type = %event.event_type,
                    "Webhook delivered"
                ),
                Err(e) => warn!(
                    crawl_id = %event.crawl_id,
                    event_type = %event.event_type,
                    "Webhook delivery failed: {}",
                    e
                ),
            }
        });
    }
}
