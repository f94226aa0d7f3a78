// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 安装Prometheus导出器
///
/// 地址无效或端口被占用时只记录警告，服务照常启动。
pub fn init_metrics(listen_addr: &str) {
    let addr: SocketAddr = match listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", listen_addr, e);
            return;
        }
    };

    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_counter!("admission_requests_total", "Admission requests by kind (new or append)");
    describe_counter!("admission_jobs_dispatched_total", "Jobs pushed to the shared queue");
    describe_counter!("admission_urls_skipped_total", "URLs skipped because they were already locked");
    describe_counter!("admission_dispatch_failures_total", "Jobs claimed but not pushed");

    info!("Metrics exporter listening on {}", addr);
}
