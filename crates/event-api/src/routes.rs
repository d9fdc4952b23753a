//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射和中间件栈

use axum::{Router, middleware, routing::get};
use event_shared::observability::middleware as obs_middleware;

use crate::{
    handlers,
    middleware::{rate_limit_middleware, timeout_middleware},
    state::AppState,
};

/// 构建业务 API 路由（挂载在 /api 下）
pub fn api_routes() -> Router<AppState> {
    Router::new().route(
        "/rate-limit",
        get(handlers::rate_limit::get_rate_limit_status),
    )
}

/// 构建完整应用
///
/// 中间件由外到内：request_id → http_tracing → 限流 → 超时 → handler。
/// 被限流拒绝的请求不进入超时计时，也不会触达 handler。
pub fn build_app(state: AppState) -> Router {
    build_app_with_routes(state, api_routes())
}

/// 以给定的业务路由构建完整应用，中间件栈与 `build_app` 相同
pub fn build_app_with_routes(state: AppState, api: Router<AppState>) -> Router {
    let request_timeout = state.config.server.request_timeout();

    let mut app = Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .fallback(handlers::not_found);

    // request_timeout_secs = 0 表示不限制处理时长
    if !request_timeout.is_zero() {
        app = app.layer(middleware::from_fn_with_state(
            request_timeout,
            timeout_middleware,
        ));
    }

    app.layer(middleware::from_fn_with_state(
        state.clone(),
        rate_limit_middleware,
    ))
    .layer(middleware::from_fn(obs_middleware::http_tracing))
    .layer(middleware::from_fn(obs_middleware::request_id))
    .with_state(state)
}
