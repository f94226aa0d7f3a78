// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl::ScrapeOptions;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// 批量抓取请求
///
/// 除 `urls`、`appendToId`、`webhook` 外的字段都视为抓取配置。
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BatchScrapeRequestDto {
    #[validate(length(min = 1), custom(function = "validate_http_urls"))]
    pub urls: Vec<String>,
    /// 追加到已有爬取
    pub append_to_id: Option<Uuid>,
    #[validate(url)]
    pub webhook: Option<String>,
    #[serde(flatten)]
    pub scrape_options: ScrapeOptions,
}

fn validate_http_urls(urls: &[String]) -> Result<(), ValidationError> {
    for raw in urls {
        let parsed = url::Url::parse(raw).map_err(|_| invalid_url(raw))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(invalid_url(raw));
        }
    }
    Ok(())
}

fn invalid_url(raw: &str) -> ValidationError {
    let mut err = ValidationError::new("http_url");
    err.message = Some(format!("invalid URL: {}", raw).into());
    err
}

/// 批量抓取响应
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchScrapeResponseDto {
    pub success: bool,
    pub id: Uuid,
    pub url: String,
    pub dispatched: usize,
}

/// 批量抓取状态
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchScrapeStatusDto {
    pub id: Uuid,
    pub status: String,
    pub total: u64,
    pub completed: u64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
