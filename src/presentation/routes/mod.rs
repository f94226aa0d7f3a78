// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::batch_scrape_use_case::BatchScrapeUseCase;
use crate::presentation::handlers::batch_scrape_handler;
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// 创建应用路由
///
/// # 参数
///
/// * `use_case` - 批量抓取接纳用例
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(use_case: Arc<BatchScrapeUseCase>) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let batch_routes = Router::new()
        .route(
            "/v1/batch/scrape",
            post(batch_scrape_handler::create_batch_scrape),
        )
        .route(
            "/v1/batch/scrape/{id}",
            get(batch_scrape_handler::get_batch_scrape_status),
        )
        .layer(Extension(use_case));

    Router::new().merge(public_routes).merge(batch_routes)
}

/// 健康检查端点
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
