// ==========================================
// 出港物流路线指派系统 - 单工厂快速通道
// ==========================================
// 职责: 候选只涉及一个工厂的产品在建模前直接指派
// 输入: 候选路线（按产品分组）+ 运费系数
// 输出: 已指派结果 + 各工厂已占用订单数 + 剩余待建模候选
// 红线: 只做“无歧义”产品;多工厂产品一律留给求解器
// ==========================================

use crate::domain::route::{Assignment, RouteCandidate};
use crate::domain::types::{AssignmentSource, PlantId, ProductId};
use crate::engine::network_index::RoutingIndex;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

// ==========================================
// PrePassResult - 预处理结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct PrePassResult {
    /// 已由快速通道确定的指派
    pub resolved: Vec<Assignment>,
    /// 各工厂被快速通道占用的订单数
    pub charged_orders: BTreeMap<PlantId, f64>,
    /// 留给求解器的候选（保持原有顺序）
    pub remaining: Vec<RouteCandidate>,
}

impl PrePassResult {
    /// 原样透传（快速通道关闭时使用）
    pub fn passthrough(candidates: &[RouteCandidate]) -> Self {
        Self {
            remaining: candidates.to_vec(),
            ..Default::default()
        }
    }

    /// 占用超出缩放产能的工厂
    pub fn overloaded_plants(&self, index: &RoutingIndex, capacity_factor: f64) -> Vec<PlantOverload> {
        self.charged_orders
            .iter()
            .filter_map(|(plant_id, &charged)| {
                let limit = index.plant(plant_id)?.scaled_capacity(capacity_factor);
                (charged > limit + 1e-9).then(|| PlantOverload {
                    plant_id: plant_id.clone(),
                    charged,
                    limit,
                })
            })
            .collect()
    }
}

/// 快速通道占用超限的工厂
#[derive(Debug, Clone, PartialEq)]
pub struct PlantOverload {
    pub plant_id: PlantId,
    pub charged: f64,
    pub limit: f64,
}

// ==========================================
// SinglePlantResolver - 单工厂快速通道
// ==========================================
pub struct SinglePlantResolver {}

impl SinglePlantResolver {
    pub fn new() -> Self {
        Self {}
    }

    /// 预处理候选
    ///
    /// 规则:
    /// 1) 产品全部候选属于同一工厂 → 取最便宜候选（同价按 工厂/港口/运价档 升序）
    /// 2) 该产品订单数计入工厂占用
    /// 3) 其余产品的候选原样保留
    #[instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    pub fn resolve(&self, candidates: &[RouteCandidate], freight_factor: f64) -> PrePassResult {
        let mut by_product: BTreeMap<ProductId, Vec<&RouteCandidate>> = BTreeMap::new();
        for candidate in candidates {
            by_product.entry(candidate.product_id).or_default().push(candidate);
        }

        let mut result = PrePassResult::default();
        for (product_id, group) in by_product {
            let single_plant = group
                .windows(2)
                .all(|pair| pair[0].plant_id == pair[1].plant_id);
            if !single_plant {
                result.remaining.extend(group.into_iter().cloned());
                continue;
            }

            let Some(best) = cheapest(&group, freight_factor) else {
                continue;
            };
            debug!(product_id, plant_id = %best.plant_id, band_id = best.band_id, "快速通道指派");
            *result
                .charged_orders
                .entry(best.plant_id.clone())
                .or_insert(0.0) += f64::from(best.order_count);
            result
                .resolved
                .push(Assignment::new(best.clone(), freight_factor, AssignmentSource::FastPath));
        }

        info!(
            resolved = result.resolved.len(),
            remaining_candidates = result.remaining.len(),
            "快速通道完成"
        );
        result
    }
}

impl Default for SinglePlantResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// 最便宜候选（确定性平局规则）
pub fn cheapest<'a>(group: &[&'a RouteCandidate], freight_factor: f64) -> Option<&'a RouteCandidate> {
    group.iter().copied().min_by(|a, b| {
        a.cost(freight_factor)
            .partial_cmp(&b.cost(freight_factor))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.route_key().cmp(&b.route_key()))
    })
}
