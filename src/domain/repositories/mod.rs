// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 具体实现由基础设施层提供（Redis 与内存两种后端）。
///
/// 包含的仓库接口：
/// - 爬取注册表（crawl_repository）：爬取记录与作业ID序列
/// - URL锁集合（url_lock_repository）：按爬取去重的URL占用
/// - 租户负载（tenant_load_repository）：团队在途作业统计
pub mod crawl_repository;
pub mod tenant_load_repository;
pub mod url_lock_repository;
