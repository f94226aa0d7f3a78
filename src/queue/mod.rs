// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 共享的优先级作业队列：PostgreSQL实现供多实例部署，
/// 进程内实现供单实例与测试使用
pub mod job_queue;
pub mod memory_queue;
