// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 爬取记录（crawl）：多个URL作业共享的爬取状态与配置
/// - 作业（job）：单个URL的抓取工作单元
/// - 团队（team）：发起请求的租户身份
/// - 网络钩子（webhook）：爬取开始等事件通知
pub mod crawl;
pub mod job;
pub mod team;
pub mod webhook;
