// ==========================================
// 出港物流路线指派系统 - 运行参数
// ==========================================
// 职责: JSON 配置的强类型映射,空字段取默认值
// 输出: 编排参数 OrchestratorOptions / 场景列表 / 报表目录
// ==========================================

use crate::domain::types::{DestinationPolicy, UnreachablePolicy};
use crate::engine::orchestrator::OrchestratorOptions;
use crate::engine::scenario::ScenarioSpec;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 运行参数（JSON 配置文件的反序列化目标）
///
/// 所有字段都有默认值，空文件 `{}` 即为默认配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// 单次求解时限（毫秒），0 表示不限时
    pub max_solve_duration_ms: u64,

    /// 无可行路线产品的处理方式
    pub unreachable_policy: UnreachablePolicy,

    /// 同一产品目的港不一致时的处理方式
    pub destination_policy: DestinationPolicy,

    /// 是否启用单工厂快速通道
    pub fast_path_enabled: bool,

    /// 平局扰动系数（目标系数 = 成本 + ε × 组内排名）
    pub tie_break_epsilon: f64,

    /// 是否合并重复运价档
    pub consolidate_duplicate_bands: bool,

    /// 敏感性分析场景
    pub scenarios: Vec<ScenarioSpec>,

    /// 报表输出目录（仅命令行使用）
    pub output_dir: Option<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_solve_duration_ms: 10_000,
            unreachable_policy: UnreachablePolicy::Abort,
            destination_policy: DestinationPolicy::Strict,
            fast_path_enabled: true,
            tie_break_epsilon: 1e-6,
            consolidate_duplicate_bands: false,
            scenarios: ScenarioSpec::default_sweep(),
            output_dir: None,
        }
    }
}

impl RoutingConfig {
    pub fn max_solve_duration(&self) -> Option<Duration> {
        (self.max_solve_duration_ms > 0).then(|| Duration::from_millis(self.max_solve_duration_ms))
    }

    /// 编排参数
    pub fn orchestrator_options(&self) -> OrchestratorOptions {
        OrchestratorOptions {
            unreachable_policy: self.unreachable_policy,
            destination_policy: self.destination_policy,
            fast_path_enabled: self.fast_path_enabled,
            tie_break_epsilon: self.tie_break_epsilon,
            max_solve_duration: self.max_solve_duration(),
        }
    }
}
