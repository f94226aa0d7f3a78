// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crawlrs_admission::application::use_cases::batch_scrape_use_case::BatchScrapeUseCase;
use crawlrs_admission::config::settings::{Settings, StoreBackend};
use crawlrs_admission::domain::repositories::{
    crawl_repository::CrawlRepository, tenant_load_repository::TenantLoadRepository,
    url_lock_repository::UrlLockRepository,
};
use crawlrs_admission::domain::services::{
    dispatch_service::DispatchService,
    priority_service::{PriorityPolicy, PriorityService},
    webhook_service::CrawlNotifier,
};
use crawlrs_admission::infrastructure::cache::redis_client::RedisClient;
use crawlrs_admission::infrastructure::database::connection;
use crawlrs_admission::infrastructure::repositories::{
    crawl_repo_impl::RedisCrawlRepository, memory_store::MemoryCrawlStore,
    tenant_load_repo_impl::RedisTenantLoadRepository, url_lock_repo_impl::RedisUrlLockRepository,
};
use crawlrs_admission::infrastructure::services::webhook_service_impl::WebhookServiceImpl;
use crawlrs_admission::presentation::routes;
use crawlrs_admission::queue::{
    job_queue::{JobQueue, PostgresJobQueue},
    memory_queue::InMemoryJobQueue,
};
use crawlrs_admission::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// 各端口的具体实现
struct Backends {
    crawl_repo: Arc<dyn CrawlRepository>,
    url_locks: Arc<dyn UrlLockRepository>,
    tenant_load: Arc<dyn TenantLoadRepository>,
    queue: Arc<dyn JobQueue>,
}

async fn build_backends(settings: &Settings) -> anyhow::Result<Backends> {
    match settings.store.backend {
        StoreBackend::Redis => {
            let redis = Arc::new(RedisClient::new(&settings.redis.url).await?);
            if let Err(e) = redis.ping().await {
                warn!("Redis not reachable at startup: {}", e);
            }
            info!("Redis client initialized");

            let db = Arc::new(connection::connect_and_migrate(&settings.database).await?);
            info!("Database connection established");

            let ttl = settings.store.crawl_ttl_seconds;
            Ok(Backends {
                crawl_repo: Arc::new(RedisCrawlRepository::new(redis.clone(), ttl)),
                url_locks: Arc::new(RedisUrlLockRepository::new(redis.clone(), ttl)),
                tenant_load: Arc::new(RedisTenantLoadRepository::new(redis)),
                queue: Arc::new(PostgresJobQueue::new(db)),
            })
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store; state is lost on restart");
            let store = Arc::new(MemoryCrawlStore::new());
            Ok(Backends {
                crawl_repo: store.clone(),
                url_locks: store.clone(),
                tenant_load: store,
                queue: Arc::new(InMemoryJobQueue::new()),
            })
        }
    }
}

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting crawlrs-admission...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    if settings.metrics.enabled {
        crawlrs_admission::infrastructure::metrics::init_metrics(&settings.metrics.listen_address);
    }

    // 3. Backends
    let backends = build_backends(&settings).await?;

    // 4. Services
    let admission = &settings.admission;
    let priority_service = PriorityService::new(
        PriorityPolicy {
            default_priority: admission.default_priority,
            large_batch_base_priority: admission.large_batch_base_priority,
            large_batch_threshold: admission.large_batch_threshold,
        },
        backends.tenant_load,
    );
    let dispatch_service = DispatchService::new(
        backends.crawl_repo.clone(),
        backends.url_locks,
        backends.queue,
        admission.push_batch_size,
    );
    let webhook_service = Arc::new(WebhookServiceImpl::new(
        settings.webhook.secret.clone(),
        settings.webhook.timeout_seconds,
    )?);

    let use_case = Arc::new(BatchScrapeUseCase::new(
        backends.crawl_repo,
        priority_service,
        dispatch_service,
        CrawlNotifier::new(webhook_service),
        settings.server.public_base_url.clone(),
        admission.max_batch_size,
    ));

    // 5. Start HTTP server
    let app = routes::routes(use_case)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
