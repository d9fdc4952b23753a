//! 共享库
//!
//! 包含所有服务共用的配置加载、错误处理和可观测性等基础设施代码。

pub mod config;
pub mod error;
pub mod observability;
