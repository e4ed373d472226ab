// ==========================================
// 出港物流路线指派系统 - 场景定义
// ==========================================
// 用途：
// - 敏感性分析按场景逐一试算，场景之间互不影响；
// - 每个场景只携带两个标量系数，参考数据与订单共享同一份快照。

use serde::{Deserialize, Serialize};

/// 试算场景（产能系数 / 运费系数）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub label: String,
    pub capacity_factor: f64,
    pub freight_factor: f64,
    /// 是否为基准场景（增量以它为参照）
    #[serde(default)]
    pub baseline: bool,
}

impl ScenarioSpec {
    pub fn new(label: impl Into<String>, capacity_factor: f64, freight_factor: f64) -> Self {
        Self {
            label: label.into(),
            capacity_factor,
            freight_factor,
            baseline: false,
        }
    }

    pub fn baseline() -> Self {
        Self {
            baseline: true,
            ..Self::new("Baseline", 1.0, 1.0)
        }
    }

    /// 默认五个场景：基准、产能 ±20%、运费 ±10%
    pub fn default_sweep() -> Vec<ScenarioSpec> {
        vec![
            Self::baseline(),
            Self::new("Capacity +20%", 1.2, 1.0),
            Self::new("Capacity -20%", 0.8, 1.0),
            Self::new("Freight +10%", 1.0, 1.1),
            Self::new("Freight -10%", 1.0, 0.9),
        ]
    }
}

impl std::fmt::Display for ScenarioSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (capacity×{}, freight×{})",
            self.label, self.capacity_factor, self.freight_factor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sweep() {
        let sweep = ScenarioSpec::default_sweep();
        assert_eq!(sweep.len(), 5);
        assert_eq!(sweep.iter().filter(|s| s.baseline).count(), 1);
        assert_eq!(sweep[0].label, "Baseline");
        assert_eq!(sweep[2].capacity_factor, 0.8);
        assert_eq!(sweep[3].freight_factor, 1.1);
    }

    #[test]
    fn test_baseline_flag_defaults_to_false() {
        let spec: ScenarioSpec =
            serde_json::from_str(r#"{"label":"X","capacity_factor":1.5,"freight_factor":1.0}"#).unwrap();
        assert!(!spec.baseline);
        assert_eq!(spec.to_string(), "X (capacity×1.5, freight×1)");
    }
}
