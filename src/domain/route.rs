// ==========================================
// 出港物流路线指派系统 - 候选路线与指派结果
// ==========================================

use crate::domain::types::{AssignmentSource, BandId, PlantId, PortCode, ProductId};
use serde::{Deserialize, Serialize};

// ==========================================
// RouteCandidate - 候选路线
// ==========================================
// (产品, 工厂, 起运港, 运价档) 四元组 + 成本分量
// fixed_cost    = 工厂单件成本 × 产品件数 + 运价档最低收费
// variable_cost = 运价 × 产品重量（运费敏感性只缩放这一项）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCandidate {
    pub product_id: ProductId,
    pub plant_id: PlantId,
    pub port: PortCode,
    pub band_id: BandId,
    pub order_count: u32,
    pub fixed_cost: f64,
    pub variable_cost: f64,
}

impl RouteCandidate {
    /// 给定运费系数下的路线成本
    pub fn cost(&self, freight_factor: f64) -> f64 {
        self.fixed_cost + freight_factor * self.variable_cost
    }

    /// 用于确定性排序/打破平局的键
    pub fn route_key(&self) -> (&str, &str, BandId) {
        (self.plant_id.as_str(), self.port.as_str(), self.band_id)
    }
}

// ==========================================
// Assignment - 最终指派
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub product_id: ProductId,
    pub candidate: RouteCandidate,
    pub cost: f64,
    pub source: AssignmentSource,
}

impl Assignment {
    pub fn new(candidate: RouteCandidate, freight_factor: f64, source: AssignmentSource) -> Self {
        Self {
            product_id: candidate.product_id,
            cost: candidate.cost(freight_factor),
            candidate,
            source,
        }
    }

    pub fn plant_id(&self) -> &str {
        &self.candidate.plant_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_scales_variable_part_only() {
        let candidate = RouteCandidate {
            product_id: 1,
            plant_id: "PLANT01".to_string(),
            port: "PORT01".to_string(),
            band_id: 3,
            order_count: 2,
            fixed_cost: 100.0,
            variable_cost: 50.0,
        };
        assert!((candidate.cost(1.0) - 150.0).abs() < 1e-9);
        assert!((candidate.cost(1.1) - 155.0).abs() < 1e-9);

        let assignment = Assignment::new(candidate, 0.9, AssignmentSource::Solver);
        assert_eq!(assignment.product_id, 1);
        assert!((assignment.cost - 145.0).abs() < 1e-9);
        assert_eq!(assignment.plant_id(), "PLANT01");
    }
}
