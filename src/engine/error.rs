// ==========================================
// 出港物流路线指派系统 - 引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// 传播: 聚合/候选生成错误只终止当前场景,敏感性分析继续后续场景
// ==========================================

use crate::domain::types::{PlantId, ProductId};
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutingError {
    // ===== 数据错误 =====
    #[error("数据完整性错误 (product_id={product_id}): {message}")]
    DataIntegrity {
        product_id: ProductId,
        message: String,
    },

    #[error("无可行路线: {} 个产品不可达 {product_ids:?}", .product_ids.len())]
    NoFeasibleRoute { product_ids: Vec<ProductId> },

    // ===== 求解错误 =====
    #[error("模型不可行 (scenario={scenario}, capacity_factor={capacity_factor}, freight_factor={freight_factor}): {reason}")]
    InfeasibleModel {
        scenario: String,
        capacity_factor: f64,
        freight_factor: f64,
        reason: String,
    },

    #[error("求解超时且无可行解 (scenario={scenario}, limit_ms={limit_ms})")]
    SolverTimeout { scenario: String, limit_ms: u64 },

    #[error("求解器内部错误: {0}")]
    Solver(String),

    #[error("约束校验失败 (plant={plant_id:?}, product={product_id:?}): {message}")]
    ConstraintViolation {
        plant_id: Option<PlantId>,
        product_id: Option<ProductId>,
        message: String,
    },
}

impl RoutingError {
    /// 稳定的错误代码（用于报表）
    pub fn kind(&self) -> &'static str {
        match self {
            RoutingError::DataIntegrity { .. } => "DATA_INTEGRITY",
            RoutingError::NoFeasibleRoute { .. } => "NO_FEASIBLE_ROUTE",
            RoutingError::InfeasibleModel { .. } => "INFEASIBLE",
            RoutingError::SolverTimeout { .. } => "INFEASIBLE_BY_TIMEOUT",
            RoutingError::Solver(_) => "SOLVER_ERROR",
            RoutingError::ConstraintViolation { .. } => "CONSTRAINT_VIOLATION",
        }
    }

    /// 是否属于“不可行”类结果（含超时无解）
    pub fn is_infeasible(&self) -> bool {
        matches!(
            self,
            RoutingError::InfeasibleModel { .. } | RoutingError::SolverTimeout { .. }
        )
    }
}

/// Result 类型别名
pub type RoutingResult<T> = Result<T, RoutingError>;
