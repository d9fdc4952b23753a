//! 请求超时中间件
//!
//! 将后续处理与截止时间赛跑，超时后丢弃处理 future 并返回 408。

use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use event_shared::observability::{metrics, middleware::metrics_path_label};
use tracing::warn;

use crate::error::ApiError;

/// 超时中间件
///
/// 通过 `middleware::from_fn_with_state(timeout, timeout_middleware)` 挂载
pub async fn timeout_middleware(
    State(timeout): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let path_label = metrics_path_label(&request);

    match tokio::time::timeout(timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(method = %method, path = %path, timeout_ms = timeout.as_millis() as u64, "请求处理超时");
            metrics::record_request_timeout(&method, &path_label);
            ApiError::Timeout.into_response()
        }
    }
}
