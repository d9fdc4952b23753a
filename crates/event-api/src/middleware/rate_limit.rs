//! 限流中间件
//!
//! 以客户端 IP 为标识调用进程内滑动窗口限流器：
//! - 超限请求直接返回 429，不再进入后续处理
//! - 放行的响应附带 X-RateLimit-Limit / X-RateLimit-Remaining 头
//!
//! 健康检查端点跳过限流。

use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use event_shared::observability::metrics;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::limiter::RateDecision;
use crate::state::AppState;

/// 无法识别来源时使用的客户端标识
pub const UNKNOWN_CLIENT: &str = "unknown";

pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// 中间件识别出的客户端标识，注入请求扩展供 handler 使用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

/// 限流中间件
///
/// 需要以 `into_make_service_with_connect_info::<SocketAddr>()` 启动服务，
/// 否则拿不到对端地址，所有请求会共享 `unknown` 这一个配额。
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if is_exempt_path(&path) {
        return next.run(request).await;
    }

    let client_id = client_identifier(&request, state.config.rate_limit.trusted_proxy_hops);
    let decision = state.rate_limiter.check(&client_id, Instant::now());
    metrics::record_rate_limit_decision(decision.allowed);

    if !decision.allowed {
        warn!(
            client_id = %client_id,
            path = %path,
            limit = decision.limit,
            "请求频率超限"
        );
        let retry_after = decision
            .retry_after
            .unwrap_or_else(|| state.rate_limiter.window());
        return too_many_requests_response(retry_after);
    }

    debug!(client_id = %client_id, remaining = decision.remaining, "rate limit passed");

    request.extensions_mut().insert(ClientId(client_id));
    let mut response = next.run(request).await;
    insert_quota_headers(response.headers_mut(), &decision);
    response
}

/// 提取客户端标识
///
/// `trusted_proxy_hops = 0` 时只使用对端地址。部署在 N 层可信代理之后时，
/// 取 X-Forwarded-For 从右往左第 N 个地址：左侧的条目由客户端自行填写，
/// 不参与识别。转发头缺失、层数不足或地址非法时回退到对端地址。
pub fn client_identifier<B>(request: &Request<B>, trusted_proxy_hops: usize) -> String {
    if trusted_proxy_hops > 0 {
        if let Some(ip) = forwarded_ip(request.headers(), trusted_proxy_hops) {
            return ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// 按可信代理层数从 X-Forwarded-For 中取客户端 IP
///
/// 多个 X-Forwarded-For 头按出现顺序拼接为一个列表
fn forwarded_ip(headers: &HeaderMap, trusted_proxy_hops: usize) -> Option<IpAddr> {
    let hops: Vec<&str> = headers
        .get_all("x-forwarded-for")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .collect();

    let index = hops.len().checked_sub(trusted_proxy_hops)?;
    hops.get(index)?.parse().ok()
}

/// 免限流路径
fn is_exempt_path(path: &str) -> bool {
    matches!(path, "/health" | "/ready")
}

/// 生成 429 Too Many Requests 响应
///
/// 包含 Retry-After 头（秒，向上取整，至少 1 秒）
fn too_many_requests_response(retry_after: Duration) -> Response {
    let mut response = ApiError::RateLimited.into_response();
    response
        .headers_mut()
        .insert("retry-after", HeaderValue::from(retry_after_secs(retry_after)));
    response
}

fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

fn insert_quota_headers(headers: &mut HeaderMap, decision: &RateDecision) {
    headers.insert(RATE_LIMIT_LIMIT_HEADER, HeaderValue::from(decision.limit));
    headers.insert(
        RATE_LIMIT_REMAINING_HEADER,
        HeaderValue::from(decision.remaining),
    );
}
