// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含接纳核心的业务逻辑，包括：
/// - 领域模型（models）：爬取记录、作业与事件
/// - 仓库接口（repositories）：爬取注册表、URL锁集合与租户负载的抽象
/// - 服务（services）：优先级计算、作业分发与事件通知
pub mod models;
pub mod repositories;
pub mod services;
