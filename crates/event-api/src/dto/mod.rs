//! DTO 模块
//!
//! 包含所有响应的数据传输对象

pub mod response;

pub use response::{ApiResponse, HealthDto, RateLimitStatusDto, ReadinessDto};
