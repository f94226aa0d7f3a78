// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库模块
///
/// 作业队列的持久化层：连接池、迁移与实体定义
pub mod connection;
pub mod entities;
