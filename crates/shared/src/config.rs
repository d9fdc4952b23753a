//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use validator::Validate;

use crate::error::{Result, SharedError};
use crate::observability;

/// 服务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 单个请求的最长处理时间（秒），超时返回 408，0 表示不限制
    pub request_timeout_secs: u64,
    /// 允许跨域访问的来源，逗号分隔，"*" 表示任意来源
    pub cors_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            cors_origins: "http://localhost:3000,http://localhost:5173".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 解析后的跨域来源列表，忽略空项
    pub fn cors_origin_list(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// 是否允许任意来源
    pub fn cors_allows_any(&self) -> bool {
        self.cors_origin_list().iter().any(|o| o == "*")
    }
}

/// 限流配置
///
/// 按客户端 IP 统计滑动窗口内的请求数，启动时一次性读取，运行期间不支持修改。
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct RateLimitConfig {
    /// 窗口内允许的最大请求数
    #[validate(range(min = 1, message = "requests_per_window 必须大于 0"))]
    pub requests_per_window: u32,
    /// 滑动窗口长度（秒）
    #[validate(range(min = 1, message = "window_secs 必须大于 0"))]
    pub window_secs: u64,
    /// 后台清理过期客户端的间隔（秒），0 表示不启动清理任务
    pub sweep_interval_secs: u64,
    /// 服务前方可信反向代理的层数
    ///
    /// 0 表示忽略 X-Forwarded-For，直接使用对端地址；N 表示取 X-Forwarded-For
    /// 从右往左数第 N 个地址，即最外层可信代理记录的客户端地址。
    pub trusted_proxy_hops: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: 100,
            window_secs: 60,
            sweep_interval_secs: 300,
            trusted_proxy_hops: 0,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// 清理间隔，未启用时返回 None
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

/// 可观测性配置（配置文件层面）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// 日志输出格式：json（结构化）或 pretty（人类可读）
    pub log_format: String,
    pub metrics_enabled: bool,
    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: true,
            metrics_port: 9090,
        }
    }
}

impl ObservabilityConfig {
    /// 注入服务名，转换为可观测性模块的初始化参数
    pub fn with_service_name(self, service_name: &str) -> observability::ObservabilityConfig {
        observability::ObservabilityConfig {
            service_name: service_name.to_string(),
            metrics_port: self.metrics_port,
            metrics_enabled: self.metrics_enabled,
            json_logs: self.log_format.eq_ignore_ascii_case("json"),
            log_level: self.log_level,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub server: ServerConfig,
    pub rate_limit: RateLimitConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. .env 文件（如存在）
    /// 2. config/default.toml（默认配置）
    /// 3. config/{environment}.toml（环境特定配置）
    /// 4. config/{service_name}.toml（服务特定配置）
    /// 5. 环境变量（EVENT_ 前缀，层级用双下划线分隔，如
    ///    EVENT_RATE_LIMIT__REQUESTS_PER_WINDOW -> rate_limit.requests_per_window）
    pub fn load(service_name: &str) -> Result<Self> {
        dotenvy::dotenv().ok();

        let env = std::env::var("EVENT_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", env))).required(false),
            )
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", service_name)))
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("EVENT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// 校验配置取值范围，非法配置阻止服务启动
    pub fn validate(&self) -> Result<()> {
        self.rate_limit
            .validate()
            .map_err(|e| SharedError::InvalidConfig(e.to_string()))
    }

    /// 获取服务地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
