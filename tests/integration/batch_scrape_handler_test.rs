// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, urls, PUBLIC_BASE_URL};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use crawlrs_admission::domain::repositories::crawl_repository::CrawlRepository;
use crawlrs_admission::queue::job_queue::JobQueue;
use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;

fn team_header(team_id: Uuid) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-team-id"),
        HeaderValue::from_str(&team_id.to_string()).unwrap(),
    )
}

fn plan_header(plan: &'static str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-team-plan"),
        HeaderValue::from_static(plan),
    )
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app.server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_create_batch_scrape() {
    let app = create_test_app();
    let team_id = Uuid::new_v4();
    let (name, value) = team_header(team_id);
    let (plan_name, plan_value) = plan_header("growth");

    let response = app
        .server
        .post("/v1/batch/scrape")
        .add_header(name, value)
        .add_header(plan_name, plan_value)
        .json(&json!({
            "urls": urls(3, "http"),
            "formats": ["markdown", "html"],
            "webhook": "https://hooks.example.com/in"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["dispatched"], 3);

    let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
    assert_eq!(
        body["url"],
        format!("{}/v1/batch/scrape/{}", PUBLIC_BASE_URL, id)
    );

    let stored = app.store.get(id).await.unwrap();
    assert_eq!(stored.team_id, team_id);
    assert_eq!(stored.plan.to_string(), "growth");
    assert_eq!(
        stored.scrape_options.formats,
        vec!["markdown".to_string(), "html".to_string()]
    );
    assert_eq!(app.queue.pending_count().await.unwrap(), 3);
    assert!(app.webhooks.next_event(Duration::from_millis(300)).await.is_some());
}

#[tokio::test]
async fn test_missing_team_header_is_rejected() {
    let app = create_test_app();

    let response = app
        .server
        .post("/v1/batch/scrape")
        .json(&json!({ "urls": urls(1, "anon") }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(app.queue.pending_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_invalid_urls_are_rejected() {
    let app = create_test_app();
    let (name, value) = team_header(Uuid::new_v4());

    let response = app
        .server
        .post("/v1/batch/scrape")
        .add_header(name, value)
        .json(&json!({ "urls": ["mailto:someone@example.com"] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = create_test_app();
    let (name, value) = team_header(Uuid::new_v4());

    let response = app
        .server
        .post("/v1/batch/scrape")
        .add_header(name, value)
        .json(&json!({ "urls": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_append_to_unknown_crawl_is_404() {
    let app = create_test_app();
    let (name, value) = team_header(Uuid::new_v4());

    let response = app
        .server
        .post("/v1/batch/scrape")
        .add_header(name, value)
        .json(&json!({
            "urls": urls(1, "missing"),
            "appendToId": Uuid::new_v4()
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_endpoint() {
    let app = create_test_app();
    let team_id = Uuid::new_v4();

    let (name, value) = team_header(team_id);
    let created: Value = app
        .server
        .post("/v1/batch/scrape")
        .add_header(name, value)
        .json(&json!({ "urls": urls(2, "status") }))
        .await
        .json();
    let id = created["id"].as_str().unwrap().to_string();

    let (name, value) = team_header(team_id);
    let response = app
        .server
        .get(&format!("/v1/batch/scrape/{}", id))
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], id);
    assert_eq!(body["status"], "scraping");
    assert_eq!(body["total"], 2);
    assert_eq!(body["completed"], 0);
    assert!(body["createdAt"].is_string());

    let (name, value) = team_header(Uuid::new_v4());
    app.server
        .get(&format!("/v1/batch/scrape/{}", id))
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
