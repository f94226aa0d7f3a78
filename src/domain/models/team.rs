// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::crawl::Plan;
use uuid::Uuid;

/// 发起请求的租户身份
#[derive(Debug, Clone, PartialEq)]
pub struct TeamContext {
    pub team_id: Uuid,
    pub plan: Plan,
}

impl TeamContext {
    pub fn new(team_id: Uuid, plan: Plan) -> Self {
        Self { team_id, plan }
    }
}
