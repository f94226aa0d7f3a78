// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Redis键布局
//!
//! 同一爬取的所有键共享 `crawl:{id}` 前缀，TTL只在键不存在过期时间时设置。

use uuid::Uuid;

pub fn crawl(id: Uuid) -> String {
    format!("crawl:{}", id)
}

pub fn crawl_jobs(id: Uuid) -> String {
    format!("crawl:{}:jobs", id)
}

pub fn crawl_jobs_done(id: Uuid) -> String {
    format!("crawl:{}:jobs_done", id)
}

pub fn crawl_visited(id: Uuid) -> String {
    format!("crawl:{}:visited", id)
}

pub fn team_in_flight(team_id: Uuid) -> String {
    format!("limit_team_id:{}", team_id)
}
