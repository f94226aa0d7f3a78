// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::{crawl::Plan, team::TeamContext};
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use uuid::Uuid;

pub const TEAM_ID_HEADER: &str = "x-team-id";
pub const TEAM_PLAN_HEADER: &str = "x-team-plan";

/// 由上游网关注入的租户身份
///
/// `X-Team-Id` 必填；`X-Team-Plan` 缺省时按 `free` 处理。
#[derive(Debug, Clone)]
pub struct Team(pub TeamContext);

fn reject(message: &str) -> Response {
    let body = Json(json!({ "success": false, "error": message }));
    (StatusCode::BAD_REQUEST, body).into_response()
}

impl<S> FromRequestParts<S> for Team
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let team_id = parts
            .headers
            .get(TEAM_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .ok_or_else(|| reject("Missing or invalid X-Team-Id header"))?;

        let plan = match parts.headers.get(TEAM_PLAN_HEADER) {
            None => Plan::Free,
            Some(value) => {
                let raw = value
                    .to_str()
                    .map_err(|_| reject("Invalid X-Team-Plan header"))?;
                raw.parse().unwrap_or(Plan::Free)
            }
        };

        Ok(Team(TeamContext::new(team_id, plan)))
    }
}
