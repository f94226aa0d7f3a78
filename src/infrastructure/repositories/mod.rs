// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// Redis实现用于生产部署，内存实现用于单实例运行和测试
pub mod crawl_repo_impl;
pub mod memory_store;
pub mod redis_keys;
pub mod tenant_load_repo_impl;
pub mod url_lock_repo_impl;
