use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 题库 API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 存储相关错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 题库 API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 请求超时
    #[error("API请求超时 ({endpoint})")]
    Timeout { endpoint: String },
    /// 非 2xx 响应
    #[error("API返回错误状态 ({endpoint}): {status} {body}")]
    BadStatus {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// 响应体无法解析
    #[error("API响应格式错误 ({endpoint}): {reason}")]
    MalformedBody { endpoint: String, reason: String },
    /// 构建 HTTP 客户端失败
    #[error("HTTP客户端初始化失败: {0}")]
    ClientBuild(String),
}

/// 存储相关错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 连接存储失败
    #[error("无法连接存储 ({url}): {source}")]
    ConnectFailed {
        url: String,
        #[source]
        source: sqlx::Error,
    },
    /// 建表失败
    #[error("初始化表结构失败: {0}")]
    SchemaFailed(#[source] sqlx::Error),
    /// 单条文档写入失败
    #[error("写入失败: {0}")]
    WriteFailed(#[source] sqlx::Error),
    /// 查询失败
    #[error("查询失败: {0}")]
    QueryFailed(#[source] sqlx::Error),
    /// 文档序列化失败
    #[error("文档序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 参数空间无效
    #[error("参数空间无效: {0}")]
    InvalidParameterSpace(String),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建缺失环境变量错误
    pub fn env_var_not_found(var_name: impl Into<String>) -> Self {
        AppError::Config(ConfigError::EnvVarNotFound {
            var_name: var_name.into(),
        })
    }

    /// 创建参数空间无效错误
    pub fn invalid_parameter_space(reason: impl Into<String>) -> Self {
        AppError::Config(ConfigError::InvalidParameterSpace(reason.into()))
    }

    /// 是否为存储连接失败（整个运行中唯一的致命错误）
    pub fn is_connect_failure(&self) -> bool {
        matches!(self, AppError::Store(StoreError::ConnectFailed { .. }))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
