// ==========================================
// 出港物流路线指派系统 - 配置管理器
// ==========================================
// 职责: 配置加载、环境变量覆写、校验、快照
// 优先级: 环境变量 > JSON 配置文件 > 内置默认值
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::routing_config::RoutingConfig;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: RoutingConfig,
    source: Option<String>,
}

impl ConfigManager {
    /// 加载配置
    ///
    /// # 参数
    /// - path: JSON 配置文件路径（None 时使用默认值）
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// 加载配置（环境变量读取可替换，便于测试）
    pub fn load_with<F>(path: Option<&Path>, env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => read_file(path)?,
            None => RoutingConfig::default(),
        };
        apply_env_overrides(&mut config, env)?;
        validate(&config)?;

        let source = path.map(|p| p.display().to_string());
        info!(
            source = source.as_deref().unwrap_or("<default>"),
            max_solve_duration_ms = config.max_solve_duration_ms,
            unreachable_policy = %config.unreachable_policy,
            destination_policy = %config.destination_policy,
            scenarios = config.scenarios.len(),
            "配置加载完成"
        );
        Ok(Self { config, source })
    }

    /// 直接使用给定配置（仍执行校验）
    pub fn from_config(config: RoutingConfig) -> ConfigResult<Self> {
        validate(&config)?;
        Ok(Self { config, source: None })
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// 生效配置快照（写入每份敏感性报告）
    pub fn snapshot_json(&self) -> ConfigResult<serde_json::Value> {
        Ok(serde_json::to_value(&self.config)?)
    }
}

fn read_file(path: &Path) -> ConfigResult<RoutingConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn invalid(key: &str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidOverride {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// 环境变量覆写
fn apply_env_overrides<F>(config: &mut RoutingConfig, env: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(v) = read(config_keys::MAX_SOLVE_MS) {
        config.max_solve_duration_ms = v
            .parse()
            .map_err(|e| invalid(config_keys::MAX_SOLVE_MS, &v, e))?;
    }
    if let Some(v) = read(config_keys::UNREACHABLE_POLICY) {
        config.unreachable_policy = v
            .parse()
            .map_err(|e: String| invalid(config_keys::UNREACHABLE_POLICY, &v, e))?;
    }
    if let Some(v) = read(config_keys::DESTINATION_POLICY) {
        config.destination_policy = v
            .parse()
            .map_err(|e: String| invalid(config_keys::DESTINATION_POLICY, &v, e))?;
    }
    if let Some(v) = read(config_keys::FAST_PATH) {
        config.fast_path_enabled = match v.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => return Err(invalid(config_keys::FAST_PATH, &v, "应为 true/false")),
        };
    }
    if let Some(v) = read(config_keys::OUTPUT_DIR) {
        config.output_dir = Some(v);
    }
    Ok(())
}

/// 配置校验
///
/// - 场景系数 > 0
/// - ε ≥ 0
/// - 恰好一个基准场景，场景名不重复
pub fn validate(config: &RoutingConfig) -> ConfigResult<()> {
    if !(config.tie_break_epsilon >= 0.0) {
        return Err(ConfigError::Validation(format!(
            "tie_break_epsilon 必须 ≥ 0，当前为 {}",
            config.tie_break_epsilon
        )));
    }
    if config.scenarios.is_empty() {
        return Err(ConfigError::Validation("scenarios 不能为空".to_string()));
    }

    let mut labels = BTreeSet::new();
    for scenario in &config.scenarios {
        if !(scenario.capacity_factor > 0.0 && scenario.freight_factor > 0.0) {
            return Err(ConfigError::Validation(format!(
                "场景 {} 的系数必须 > 0",
                scenario.label
            )));
        }
        if !labels.insert(scenario.label.as_str()) {
            return Err(ConfigError::Validation(format!(
                "场景名重复: {}",
                scenario.label
            )));
        }
    }

    let baselines = config.scenarios.iter().filter(|s| s.baseline).count();
    if baselines != 1 {
        return Err(ConfigError::Validation(format!(
            "必须恰好有一个基准场景，当前为 {}",
            baselines
        )));
    }

    if config.max_solve_duration_ms == 0 {
        warn!("max_solve_duration_ms = 0，求解不限时");
    }
    Ok(())
}

// ==========================================
// 配置键（环境变量名）
// ==========================================
pub mod config_keys {
    // 求解
    pub const MAX_SOLVE_MS: &str = "OUTBOUND_ROUTING_MAX_SOLVE_MS";
    pub const FAST_PATH: &str = "OUTBOUND_ROUTING_FAST_PATH";

    // 数据策略
    pub const UNREACHABLE_POLICY: &str = "OUTBOUND_ROUTING_UNREACHABLE_POLICY";
    pub const DESTINATION_POLICY: &str = "OUTBOUND_ROUTING_DESTINATION_POLICY";

    // 输出
    pub const OUTPUT_DIR: &str = "OUTBOUND_ROUTING_OUTPUT_DIR";
}
