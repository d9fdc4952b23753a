//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过独立的 HTTP 端口暴露，供 Prometheus 抓取。

use anyhow::Result;
use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::ObservabilityConfig;

/// Metrics 资源守卫
pub struct MetricsHandle {
    _server_handle: tokio::task::JoinHandle<()>,
}

/// 初始化 Prometheus 指标导出
///
/// 启动一个独立的 HTTP 服务器在指定端口暴露 `/metrics` 端点。
pub async fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    register_common_metrics();

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let server_handle = start_metrics_server(addr, handle).await?;

    Ok(MetricsHandle {
        _server_handle: server_handle,
    })
}

/// 注册通用指标
///
/// 这些描述会出现在 /metrics 端点的 HELP 注释中
fn register_common_metrics() {
    metrics::describe_counter!("http_requests_total", "Total number of HTTP requests");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );

    metrics::describe_counter!(
        "rate_limit_decisions_total",
        "Rate limiter decisions by outcome (allowed / rejected)"
    );
    metrics::describe_gauge!(
        "rate_limit_tracked_clients",
        "Number of client identifiers currently tracked by the rate limiter"
    );
    metrics::describe_counter!(
        "rate_limit_swept_clients_total",
        "Client entries removed by the background sweep"
    );

    metrics::describe_counter!("http_request_timeouts_total", "Requests aborted by timeout");
}

/// 启动指标 HTTP 服务器
async fn start_metrics_server(
    addr: SocketAddr,
    handle: PrometheusHandle,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = Router::new()
        .route("/metrics", get(move || std::future::ready(handle.render())))
        .route("/health", get(|| async { "OK" }));

    let listener = TcpListener::bind(addr).await?;
    info!("Metrics server listening on {}", addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(server_handle)
}

// ============================================================================
// 便捷的指标记录函数
// ============================================================================

/// 记录 HTTP 请求
#[inline]
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status_str = status.to_string();
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str.clone()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str
    )
    .record(duration_secs);
}

/// 记录一次限流判定
#[inline]
pub fn record_rate_limit_decision(allowed: bool) {
    let outcome = if allowed { "allowed" } else { "rejected" };
    metrics::counter!("rate_limit_decisions_total", "outcome" => outcome).increment(1);
}

/// 更新限流器当前跟踪的客户端数量
#[inline]
pub fn set_rate_limit_tracked_clients(count: usize) {
    metrics::gauge!("rate_limit_tracked_clients").set(count as f64);
}

/// 记录后台清理移除的客户端数量
#[inline]
pub fn record_rate_limit_sweep(removed: usize) {
    metrics::counter!("rate_limit_swept_clients_total").increment(removed as u64);
}

/// 记录请求超时
#[inline]
pub fn record_request_timeout(method: &str, path: &str) {
    metrics::counter!(
        "http_request_timeouts_total",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .increment(1);
}
