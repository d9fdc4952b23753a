//! 中间件模块
//!
//! 提供限流和请求超时中间件

pub mod rate_limit;
mod timeout;

pub use rate_limit::{ClientId, client_identifier, rate_limit_middleware};
pub use timeout::timeout_middleware;
