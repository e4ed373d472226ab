// ==========================================
// 出港物流路线指派系统 - 指派模型构建
// ==========================================
// 职责: 候选路线 + (产能系数, 运费系数) → 0/1 线性规划模型
// 模型:
//   min Σ (fixed + ff × variable) · x
//   s.t. 每个产品 Σ x = 1                     （指派约束）
//        每个工厂 Σ order_count · x ≤ cf × 产能 − 快速通道占用  （产能约束）
//        x ∈ {0, 1}
// 红线: 只做数据到模型的翻译,不做任何优化
// ==========================================

use crate::domain::route::RouteCandidate;
use crate::domain::types::{PlantId, ProductId};
use crate::engine::error::{RoutingError, RoutingResult};
use crate::engine::network_index::RoutingIndex;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// 约束校验容差
const FEASIBILITY_TOLERANCE: f64 = 1e-6;

// ==========================================
// 模型元素
// ==========================================

/// 0/1 决策变量（与一条候选路线一一对应）
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionVariable {
    pub candidate: RouteCandidate,
    /// 精确成本 fixed + ff × variable
    pub cost: f64,
    /// 目标系数 = cost + ε × 组内排名
    pub objective_coeff: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConstraintSense {
    Equal,
    LessOrEqual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintKind {
    Assignment { product_id: ProductId },
    Capacity { plant_id: PlantId },
}

/// 线性约束: Σ coeff · x[var] (sense) rhs
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub kind: ConstraintKind,
    pub terms: Vec<(usize, f64)>,
    pub sense: ConstraintSense,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn lhs(&self, selected: &[bool]) -> f64 {
        self.terms
            .iter()
            .filter(|(var, _)| selected.get(*var).copied().unwrap_or(false))
            .map(|(_, coeff)| coeff)
            .sum()
    }

    pub fn is_satisfied(&self, selected: &[bool]) -> bool {
        let lhs = self.lhs(selected);
        match self.sense {
            ConstraintSense::Equal => (lhs - self.rhs).abs() <= FEASIBILITY_TOLERANCE,
            ConstraintSense::LessOrEqual => lhs <= self.rhs + FEASIBILITY_TOLERANCE,
        }
    }
}

/// 模型规模统计（写入报表）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ModelStats {
    pub variables: usize,
    pub assignment_constraints: usize,
    pub capacity_constraints: usize,
}

// ==========================================
// AssignmentModel - 指派模型
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentModel {
    pub variables: Vec<DecisionVariable>,
    pub constraints: Vec<LinearConstraint>,
    pub capacity_factor: f64,
    pub freight_factor: f64,
}

impl AssignmentModel {
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn stats(&self) -> ModelStats {
        let capacity_constraints = self
            .constraints
            .iter()
            .filter(|c| matches!(c.kind, ConstraintKind::Capacity { .. }))
            .count();
        ModelStats {
            variables: self.variables.len(),
            assignment_constraints: self.constraints.len() - capacity_constraints,
            capacity_constraints,
        }
    }

    /// 求解器返回值 → 选中标记（> 0.5 视为选中）
    pub fn selection_from_values(&self, values: &[f64]) -> Vec<bool> {
        (0..self.variables.len())
            .map(|i| values.get(i).copied().unwrap_or(0.0) > 0.5)
            .collect()
    }

    /// 选中方案的精确总成本（不含平局扰动项）
    pub fn total_cost(&self, selected: &[bool]) -> f64 {
        self.variables
            .iter()
            .zip(selected)
            .filter(|(_, on)| **on)
            .map(|(var, _)| var.cost)
            .sum()
    }

    /// 校验选中方案满足全部约束
    ///
    /// 任何一条约束不满足都返回 ConstraintViolation,调用方不得输出部分结果。
    pub fn verify(&self, selected: &[bool]) -> RoutingResult<()> {
        if selected.len() != self.variables.len() {
            return Err(RoutingError::ConstraintViolation {
                plant_id: None,
                product_id: None,
                message: format!(
                    "解向量长度 {} 与变量数 {} 不一致",
                    selected.len(),
                    self.variables.len()
                ),
            });
        }

        for constraint in &self.constraints {
            if constraint.is_satisfied(selected) {
                continue;
            }
            let lhs = constraint.lhs(selected);
            return Err(match &constraint.kind {
                ConstraintKind::Assignment { product_id } => RoutingError::ConstraintViolation {
                    plant_id: None,
                    product_id: Some(*product_id),
                    message: format!("产品被选中 {} 条路线（应为 1）", lhs),
                },
                ConstraintKind::Capacity { plant_id } => RoutingError::ConstraintViolation {
                    plant_id: Some(plant_id.clone()),
                    product_id: None,
                    message: format!("工厂订单数 {} 超出上限 {}", lhs, constraint.rhs),
                },
            });
        }
        Ok(())
    }
}

// ==========================================
// AssignmentModelBuilder - 模型构建器
// ==========================================
pub struct AssignmentModelBuilder {
    tie_break_epsilon: f64,
}

impl AssignmentModelBuilder {
    pub fn new(tie_break_epsilon: f64) -> Self {
        Self { tie_break_epsilon }
    }

    /// 构建模型
    ///
    /// # 参数
    /// - candidates: 待建模候选（已按产品/工厂/港口/运价档排序）
    /// - index: 路由索引（取工厂产能）
    /// - charged_orders: 快速通道已占用的订单数
    #[instrument(skip(self, candidates, index, charged_orders), fields(candidates = candidates.len()))]
    pub fn build(
        &self,
        candidates: &[RouteCandidate],
        index: &RoutingIndex,
        capacity_factor: f64,
        freight_factor: f64,
        charged_orders: &BTreeMap<PlantId, f64>,
    ) -> RoutingResult<AssignmentModel> {
        let mut ordered: Vec<&RouteCandidate> = candidates.iter().collect();
        ordered.sort_by(|a, b| {
            a.product_id
                .cmp(&b.product_id)
                .then_with(|| a.route_key().cmp(&b.route_key()))
        });

        let mut variables = Vec::with_capacity(ordered.len());
        let mut by_product: BTreeMap<ProductId, Vec<(usize, f64)>> = BTreeMap::new();
        let mut by_plant: BTreeMap<PlantId, Vec<(usize, f64)>> = BTreeMap::new();

        for candidate in ordered {
            let var = variables.len();
            let group = by_product.entry(candidate.product_id).or_default();
            let rank = group.len() as f64;
            group.push((var, 1.0));
            by_plant
                .entry(candidate.plant_id.clone())
                .or_default()
                .push((var, f64::from(candidate.order_count)));

            let cost = candidate.cost(freight_factor);
            variables.push(DecisionVariable {
                candidate: candidate.clone(),
                cost,
                objective_coeff: cost + self.tie_break_epsilon * rank,
            });
        }

        let mut constraints = Vec::with_capacity(by_product.len() + by_plant.len());
        for (product_id, terms) in by_product {
            constraints.push(LinearConstraint {
                kind: ConstraintKind::Assignment { product_id },
                terms,
                sense: ConstraintSense::Equal,
                rhs: 1.0,
            });
        }
        for (plant_id, terms) in by_plant {
            let plant = index.plant(&plant_id).ok_or_else(|| RoutingError::ConstraintViolation {
                plant_id: Some(plant_id.clone()),
                product_id: None,
                message: "候选引用的工厂不在参考数据中".to_string(),
            })?;
            let charged = charged_orders.get(&plant_id).copied().unwrap_or(0.0);
            constraints.push(LinearConstraint {
                kind: ConstraintKind::Capacity { plant_id },
                terms,
                sense: ConstraintSense::LessOrEqual,
                rhs: plant.scaled_capacity(capacity_factor) - charged,
            });
        }

        let model = AssignmentModel {
            variables,
            constraints,
            capacity_factor,
            freight_factor,
        };
        let stats = model.stats();
        info!(
            variables = stats.variables,
            assignment_constraints = stats.assignment_constraints,
            capacity_constraints = stats.capacity_constraints,
            "指派模型构建完成"
        );
        Ok(model)
    }
}

impl Default for AssignmentModelBuilder {
    fn default() -> Self {
        Self::new(1e-6)
    }
}
