//! 限流状态查询处理器

use std::time::Instant;

use axum::{
    Json,
    extract::{Request, State},
};

use crate::{
    dto::{ApiResponse, RateLimitStatusDto},
    middleware::{ClientId, client_identifier},
    state::AppState,
};

/// 查询调用方当前的限流配额
///
/// GET /api/rate-limit
///
/// 请求本身已经过限流中间件计数，这里只读取剩余配额，不再额外消耗
pub async fn get_rate_limit_status(
    State(state): State<AppState>,
    request: Request,
) -> Json<ApiResponse<RateLimitStatusDto>> {
    // 优先使用限流中间件注入的标识，保证与计数时使用的 key 一致
    let client_id = request
        .extensions()
        .get::<ClientId>()
        .map(|id| id.0.clone())
        .unwrap_or_else(|| {
            client_identifier(&request, state.config.rate_limit.trusted_proxy_hops)
        });

    let limiter = &state.rate_limiter;
    let dto = RateLimitStatusDto {
        remaining: limiter.remaining(&client_id, Instant::now()),
        requests_per_window: limiter.requests_per_window(),
        window_secs: limiter.window().as_secs(),
        client_id,
    };

    Json(ApiResponse::success(dto))
}
