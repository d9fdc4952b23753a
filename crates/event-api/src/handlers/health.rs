//! 健康检查处理器
//!
//! 存活/就绪探针，不经过限流

use axum::{Json, extract::State};
use chrono::Utc;

use crate::{
    dto::{HealthDto, ReadinessDto},
    state::AppState,
};

/// 存活探针：服务进程正常即返回 ok
///
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        service: state.config.service_name.clone(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// 就绪探针
///
/// GET /ready
///
/// 服务没有外部依赖，限流表可访问即视为就绪，同时返回当前跟踪的客户端数量
pub async fn readiness_check(State(state): State<AppState>) -> Json<ReadinessDto> {
    Json(ReadinessDto {
        status: "ok".to_string(),
        service: state.config.service_name.clone(),
        tracked_clients: state.rate_limiter.tracked_clients(),
    })
}
