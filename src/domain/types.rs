// ==========================================
// 出港物流路线指派系统 - 领域类型定义
// ==========================================
// 职责: 标识符别名 + 策略/状态枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 产品编号（源表为数值型 Product ID）
pub type ProductId = u64;

/// 订单编号
pub type OrderId = u64;

/// 工厂代码（如 PLANT03）
pub type PlantId = String;

/// 港口代码（如 PORT04）
pub type PortCode = String;

/// 运价档编号（运价表数据行号，从 1 开始）
pub type BandId = usize;

// ==========================================
// 无可行路线处理策略
// ==========================================
// 由调用方决定：整场景中止，或剔除后继续
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnreachablePolicy {
    Abort,   // 报 NoFeasibleRoute 并中止当前场景
    Exclude, // 剔除不可达产品，其余产品继续建模
}

impl Default for UnreachablePolicy {
    fn default() -> Self {
        UnreachablePolicy::Abort
    }
}

impl fmt::Display for UnreachablePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnreachablePolicy::Abort => write!(f, "ABORT"),
            UnreachablePolicy::Exclude => write!(f, "EXCLUDE"),
        }
    }
}

impl std::str::FromStr for UnreachablePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ABORT" => Ok(UnreachablePolicy::Abort),
            "EXCLUDE" => Ok(UnreachablePolicy::Exclude),
            other => Err(format!("未知的不可达处理策略: {}", other)),
        }
    }
}

// ==========================================
// 目的港不一致处理策略
// ==========================================
// 同一产品的多张订单目的港不一致时：
// - Strict: 视为数据完整性错误
// - FirstSeen: 以首张订单（按输入顺序）为准，并记录告警
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DestinationPolicy {
    Strict,
    FirstSeen,
}

impl Default for DestinationPolicy {
    fn default() -> Self {
        DestinationPolicy::Strict
    }
}

impl fmt::Display for DestinationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DestinationPolicy::Strict => write!(f, "STRICT"),
            DestinationPolicy::FirstSeen => write!(f, "FIRST_SEEN"),
        }
    }
}

impl std::str::FromStr for DestinationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STRICT" => Ok(DestinationPolicy::Strict),
            "FIRST_SEEN" | "FIRST-SEEN" => Ok(DestinationPolicy::FirstSeen),
            other => Err(format!("未知的目的港策略: {}", other)),
        }
    }
}

// ==========================================
// 求解状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    Optimal,    // 证明最优
    Suboptimal, // 可行但未证明最优
    TimedOut,   // 超时，返回的是已知最好可行解
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "OPTIMAL"),
            SolveStatus::Suboptimal => write!(f, "SUBOPTIMAL"),
            SolveStatus::TimedOut => write!(f, "TIMED_OUT"),
        }
    }
}

// ==========================================
// 指派来源
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentSource {
    FastPath,  // 单工厂预处理直接确定
    Solver,    // 求解器返回
    Heuristic, // 超时后的贪心兜底解
}

impl fmt::Display for AssignmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentSource::FastPath => write!(f, "FAST_PATH"),
            AssignmentSource::Solver => write!(f, "SOLVER"),
            AssignmentSource::Heuristic => write!(f, "HEURISTIC"),
        }
    }
}
