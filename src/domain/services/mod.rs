// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 分发服务（dispatch_service）：占用URL、记录作业ID并推送到队列
/// - 优先级服务（priority_service）：按批量大小与租户负载计算优先级
/// - Webhook服务（webhook_service）：事件投递特质与通知器
pub mod dispatch_service;
pub mod priority_service;
pub mod webhook_service;
