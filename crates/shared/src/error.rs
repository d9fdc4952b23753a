//! 统一错误处理模块
//!
//! 定义服务启动阶段共享的错误类型，使用 thiserror 提供良好的错误信息。

use thiserror::Error;

/// 配置错误类型
#[derive(Debug, Error)]
pub enum SharedError {
    #[error("配置加载失败: {0}")]
    Config(#[from] config::ConfigError),

    #[error("配置取值无效: {0}")]
    InvalidConfig(String),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, SharedError>;
