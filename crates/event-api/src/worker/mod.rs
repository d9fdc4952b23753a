//! 后台任务 Worker 模块
//!
//! - `RateLimitSweeper`: 周期清理限流器中已经空闲的客户端

mod sweep_worker;

pub use sweep_worker::RateLimitSweeper;
