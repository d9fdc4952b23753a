//! 活动平台 API 服务
//!
//! 活动管理平台后端的 HTTP 服务层，负责请求限流、超时控制和健康检查。
//!
//! ## 核心功能
//!
//! - **限流**：按客户端 IP 的进程内滑动窗口限流，超限返回 429
//! - **超时**：单个请求超过处理时限返回 408
//! - **限流表清理**：后台周期删除空闲客户端，保证内存有界
//! - **健康检查**：存活/就绪探针
//!
//! ## 模块结构
//!
//! - `limiter`: 滑动窗口限流器
//! - `middleware`: 限流和超时中间件
//! - `worker`: 后台清理任务
//! - `dto`: 响应数据传输对象
//! - `error`: 错误类型定义
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由与中间件栈
//! - `state`: 应用状态
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 并发表：DashMap
//! - 序列化：serde (camelCase)

pub mod dto;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod worker;

// 重新导出核心类型
pub use dto::ApiResponse;
pub use error::ApiError;
pub use limiter::{RateDecision, RateLimiter};
pub use state::AppState;
