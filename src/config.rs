use crate::error::{AppError, AppResult, ConfigError};
use crate::models::{load_parameter_space, ParameterSpace};
use std::path::PathBuf;
use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- 题库 API 配置 ---
    pub aloc_api_base_url: String,
    pub aloc_api_token: String,
    /// 单次请求超时
    pub request_timeout: Duration,
    /// 每个组合之后的固定等待
    pub request_delay: Duration,
    // --- 存储配置 ---
    /// sqlx SQLite 连接串，例如 `sqlite:questions.db`
    pub database_url: String,
    /// 参数空间 TOML 文件（为空则使用默认参数空间）
    pub parameter_file: Option<PathBuf>,
    /// 失败组合记录文件（为空则不记录）
    pub failure_log_file: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aloc_api_base_url: "https://questions.aloc.com.ng/api/v2".to_string(),
            aloc_api_token: String::new(),
            request_timeout: Duration::from_secs(30),
            request_delay: Duration::from_millis(500),
            database_url: String::new(),
            parameter_file: None,
            failure_log_file: Some("failed_combinations.txt".to_string()),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源加载配置
    ///
    /// `ALOC_API_TOKEN` 和 `DATABASE_URL` 必须存在
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::env_var_not_found(name))
        };

        Ok(Self {
            aloc_api_base_url: lookup("ALOC_API_BASE_URL").unwrap_or(default.aloc_api_base_url),
            aloc_api_token: required("ALOC_API_TOKEN")?,
            request_timeout: parse_var::<u64>(&lookup, "REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(default.request_timeout),
            request_delay: parse_var::<u64>(&lookup, "REQUEST_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(default.request_delay),
            database_url: required("DATABASE_URL")?,
            parameter_file: lookup("PARAMETER_FILE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            failure_log_file: match lookup("FAILURE_LOG_FILE") {
                Some(v) if v.is_empty() => None,
                Some(v) => Some(v),
                None => default.failure_log_file,
            },
            verbose_logging: parse_var::<bool>(&lookup, "VERBOSE_LOGGING")?
                .unwrap_or(default.verbose_logging),
        })
    }

    /// 解析参数空间：配置了 TOML 文件则从文件读取，否则使用默认值
    pub async fn parameter_space(&self) -> AppResult<ParameterSpace> {
        match &self.parameter_file {
            Some(path) => load_parameter_space(path).await,
            None => Ok(ParameterSpace::default()),
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var_name: &str,
) -> AppResult<Option<T>> {
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value.trim().parse::<T>().map(Some).map_err(|_| {
            AppError::Config(ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            })
        }),
    }
}
