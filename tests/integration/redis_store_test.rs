// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Redis存储测试，每个测试启动独立的 `redis:7-alpine` 容器

use super::helpers::start_redis;
use crawlrs_admission::domain::models::crawl::{CrawlerOptions, Plan, ScrapeOptions, StoredCrawl};
use crawlrs_admission::domain::repositories::crawl_repository::{CrawlRepository, StoreError};
use crawlrs_admission::domain::repositories::tenant_load_repository::TenantLoadRepository;
use crawlrs_admission::domain::repositories::url_lock_repository::UrlLockRepository;
use crawlrs_admission::infrastructure::repositories::crawl_repo_impl::RedisCrawlRepository;
use crawlrs_admission::infrastructure::repositories::redis_keys;
use crawlrs_admission::infrastructure::repositories::tenant_load_repo_impl::RedisTenantLoadRepository;
use crawlrs_admission::infrastructure::repositories::url_lock_repo_impl::RedisUrlLockRepository;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

const TTL: u64 = 600;

fn batch_crawl() -> StoredCrawl {
    StoredCrawl::for_batch(Uuid::new_v4(), Plan::Standard, ScrapeOptions::default())
}

#[tokio::test]
async fn test_redis_registry_create_get_append() {
    let (_redis_node, redis) = start_redis().await;
    let repo = RedisCrawlRepository::new(redis.clone(), TTL);
    let id = Uuid::new_v4();
    let crawl = batch_crawl();

    repo.create(id, &crawl).await.unwrap();
    assert!(matches!(
        repo.create(id, &crawl).await,
        Err(StoreError::AlreadyExists)
    ));
    assert_eq!(repo.get(id).await.unwrap(), crawl);
    assert!(matches!(
        repo.get(Uuid::new_v4()).await,
        Err(StoreError::NotFound)
    ));

    let jobs = vec![Uuid::new_v4(), Uuid::new_v4()];
    repo.append_job_ids(id, &jobs).await.unwrap();
    assert_eq!(repo.job_ids(id).await.unwrap(), jobs);

    let mut conn = redis.get_connection().await.unwrap();
    let ttl: i64 = redis::cmd("TTL")
        .arg(redis_keys::crawl_jobs(id))
        .query_async(&mut conn)
        .await
        .unwrap();
    assert!(ttl > 0 && ttl <= TTL as i64);

    repo.mark_job_done(id, jobs[0]).await.unwrap();
    assert_eq!(repo.done_count(id).await.unwrap(), 1);
    assert!(!repo.is_finished(id).await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_redis_claim_is_atomic_under_contention() {
    let (_redis_node, redis) = start_redis().await;
    let locks = Arc::new(RedisUrlLockRepository::new(redis, TTL));
    let crawl_id = Uuid::new_v4();
    let crawl = Arc::new(batch_crawl());
    let candidates: Vec<String> = (0..100)
        .map(|i| format!("https://example.com/{}", i))
        .collect();

    let tasks = (0..10).map(|_| {
        let locks = locks.clone();
        let crawl = crawl.clone();
        let candidates = candidates.clone();
        tokio::spawn(async move { locks.claim(crawl_id, &crawl, &candidates).await })
    });

    let mut claimed = Vec::new();
    for result in join_all(tasks).await {
        claimed.extend(result.unwrap().unwrap());
    }

    let distinct: HashSet<&String> = claimed.iter().collect();
    assert_eq!(claimed.len(), 100);
    assert_eq!(distinct.len(), 100);
    assert_eq!(locks.locked_count(crawl_id).await.unwrap(), 100);
}

#[tokio::test]
async fn test_redis_claim_respects_crawler_limit() {
    let (_redis_node, redis) = start_redis().await;
    let locks = RedisUrlLockRepository::new(redis, TTL);
    let crawl_id = Uuid::new_v4();
    let mut crawl = batch_crawl();
    crawl.crawler_options = Some(CrawlerOptions {
        limit: Some(2),
        ..Default::default()
    });

    let candidates: Vec<String> = vec![
        "https://example.com/a".to_string(),
        "https://example.com/a".to_string(),
        "https://example.com/b".to_string(),
        "https://example.com/c".to_string(),
    ];
    let claimed = locks.claim(crawl_id, &crawl, &candidates).await.unwrap();

    assert_eq!(claimed, vec!["https://example.com/a", "https://example.com/b"]);
    assert!(!locks.is_locked(crawl_id, "https://example.com/c").await.unwrap());

    let later = vec!["https://example.com/d".to_string()];
    assert!(locks.claim(crawl_id, &crawl, &later).await.unwrap().is_empty());
    assert_eq!(locks.locked_count(crawl_id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_redis_reclaim_reports_nothing_and_keeps_ttl() {
    let (_redis_node, redis) = start_redis().await;
    let locks = RedisUrlLockRepository::new(redis.clone(), TTL);
    let crawl_id = Uuid::new_v4();
    let crawl = batch_crawl();
    let candidates: Vec<String> = vec![
        "https://example.com/x".to_string(),
        "https://example.com/y".to_string(),
    ];

    assert_eq!(locks.claim(crawl_id, &crawl, &candidates).await.unwrap(), candidates);
    assert!(locks.claim(crawl_id, &crawl, &candidates).await.unwrap().is_empty());

    let mut conn = redis.get_connection().await.unwrap();
    let ttl: i64 = redis::cmd("TTL")
        .arg(redis_keys::crawl_visited(crawl_id))
        .query_async(&mut conn)
        .await
        .unwrap();
    assert!(ttl > 0 && ttl <= TTL as i64);
}

#[tokio::test]
async fn test_redis_tenant_load() {
    let (_redis_node, redis) = start_redis().await;
    let load = RedisTenantLoadRepository::new(redis);
    let team = Uuid::new_v4();
    let job = Uuid::new_v4();

    assert_eq!(load.in_flight(team).await.unwrap(), 0);
    load.track(team, job).await.unwrap();
    assert_eq!(load.in_flight(team).await.unwrap(), 1);
    load.release(team, job).await.unwrap();
    assert_eq!(load.in_flight(team).await.unwrap(), 0);
}
