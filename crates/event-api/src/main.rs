//! 活动平台 API 服务
//!
//! 加载配置、初始化可观测性、启动限流表清理任务并对外提供 HTTP 服务。

use std::net::SocketAddr;

use axum::http::HeaderValue;
use event_api::{routes, state::AppState, worker::RateLimitSweeper};
use event_shared::{
    config::{AppConfig, ServerConfig},
    observability,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

const SERVICE_NAME: &str = "event-api";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 统一加载配置：非法的限流参数直接阻止启动
    let config = AppConfig::load(SERVICE_NAME)?;

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    info!(
        addr = %config.server_addr(),
        environment = %config.environment,
        requests_per_window = config.rate_limit.requests_per_window,
        window_secs = config.rate_limit.window_secs,
        "Starting event-api"
    );

    let state = AppState::new(config.clone());

    // 启动限流表清理 Worker
    match config.rate_limit.sweep_interval() {
        Some(interval) => {
            let sweeper = RateLimitSweeper::new(state.rate_limiter.clone(), interval);
            tokio::spawn(async move {
                sweeper.run().await;
            });
        }
        None => warn!("sweep_interval_secs = 0，限流表清理任务未启动"),
    }

    let app = routes::build_app(state).layer(cors_layer(&config.server, config.is_production()));

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    // 限流以对端 IP 为 key，必须携带连接信息启动
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// CORS 配置：允许的来源由 `server.cors_origins` 控制
///
/// 可通过 EVENT_SERVER__CORS_ORIGINS 覆盖，生产环境应设置为实际域名
fn cors_layer(server: &ServerConfig, is_production: bool) -> CorsLayer {
    if server.cors_allows_any() {
        if is_production {
            warn!("cors_origins = \"*\" 在生产环境中不安全，请设置为具体域名");
        }
        info!("CORS allowed_origins: * (all origins)");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    info!("CORS allowed_origins: {}", server.cors_origins);
    let origins: Vec<HeaderValue> = server
        .cors_origin_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// 监听关闭信号
///
/// 收到 SIGTERM 或 Ctrl+C 后返回，触发 axum 的优雅关闭流程。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "注册 Ctrl+C 处理器失败");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "注册 SIGTERM 处理器失败");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
