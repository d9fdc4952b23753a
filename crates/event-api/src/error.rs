//! API 错误类型定义
//!
//! 所有错误统一渲染为 `{"success": false, "message": ...}` 信封

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::dto::ApiResponse;

/// API 错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Request timeout")]
    Timeout,

    #[error("资源不存在: {0}")]
    NotFound(String),
}

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiResponse::<()>::error(self.to_string());
        (status, axum::Json(body)).into_response()
    }
}
