// ==========================================
// 出港物流路线指派系统 - 配置层
// ==========================================
// 职责: 运行参数加载、环境变量覆写、校验、快照
// 来源: JSON 文件（可选）→ 环境变量 → 校验
// ==========================================

pub mod config_manager;
pub mod error;
pub mod routing_config;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use routing_config::RoutingConfig;
