// ==========================================
// 出港物流路线指派系统 - 配置错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件格式错误 ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("环境变量 {key} 取值非法: {value} ({reason})")]
    InvalidOverride {
        key: String,
        value: String,
        reason: String,
    },

    #[error("配置校验失败: {0}")]
    Validation(String),

    #[error("配置序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
