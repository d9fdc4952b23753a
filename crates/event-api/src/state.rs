//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use event_shared::config::AppConfig;

use crate::limiter::RateLimiter;

/// Axum 应用共享状态
///
/// 限流器和配置通过 Arc 在 handler 与中间件之间共享
#[derive(Clone)]
pub struct AppState {
    /// 进程级限流器
    pub rate_limiter: Arc<RateLimiter>,
    /// 启动时加载的配置（只读）
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(config: AppConfig) -> Self {
        let rate_limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));
        Self {
            rate_limiter,
            config: Arc::new(config),
        }
    }

    /// 使用外部构造的限流器创建状态（测试中注入小窗口限流器）
    pub fn with_rate_limiter(config: AppConfig, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            rate_limiter,
            config: Arc::new(config),
        }
    }
}
