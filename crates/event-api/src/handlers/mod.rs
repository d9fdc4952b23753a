//! HTTP 请求处理器模块

pub mod health;
pub mod rate_limit;

use axum::http::Uri;

use crate::error::ApiError;

/// 未匹配路由统一返回 404 信封
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
