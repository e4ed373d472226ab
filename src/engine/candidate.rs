// ==========================================
// 出港物流路线指派系统 - 候选路线生成引擎
// ==========================================
// 职责: 需求快照 + 路由索引 → 可行候选路线集合（附成本分量）
// 可行判定: 工厂准入 ∧ 工厂可达港口 ∧ 运价档起运港 = 港口
//           ∧ 运价档目的港 = 产品目的港 ∧ 产品重量 ≤ 运价档上限
// 红线: 成本是候选自身输入的纯函数,不读写任何共享状态
// ==========================================

use crate::domain::network::{CarrierBand, Plant};
use crate::domain::order::{DemandSnapshot, ProductDemand};
use crate::domain::route::RouteCandidate;
use crate::domain::types::ProductId;
use crate::engine::error::{RoutingError, RoutingResult};
use crate::engine::network_index::RoutingIndex;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

// ==========================================
// CandidateSet - 候选生成结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    /// 按 (产品, 工厂, 港口, 运价档) 升序
    pub candidates: Vec<RouteCandidate>,
    /// 没有任何可行候选的产品（升序）
    pub unreachable: Vec<ProductId>,
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// 覆盖检查: 存在不可达产品时返回 NoFeasibleRoute
    pub fn check_coverage(&self) -> RoutingResult<()> {
        if self.unreachable.is_empty() {
            Ok(())
        } else {
            Err(RoutingError::NoFeasibleRoute {
                product_ids: self.unreachable.clone(),
            })
        }
    }

    pub fn for_product(&self, product_id: ProductId) -> impl Iterator<Item = &RouteCandidate> + '_ {
        self.candidates
            .iter()
            .filter(move |c| c.product_id == product_id)
    }

    /// 至少有一条候选的产品
    pub fn covered_products(&self) -> BTreeSet<ProductId> {
        self.candidates.iter().map(|c| c.product_id).collect()
    }

    /// 剔除不可达产品后的候选集（不可达产品本身没有候选,只需清空名单）
    pub fn without_unreachable(mut self) -> (Self, Vec<ProductId>) {
        let excluded = std::mem::take(&mut self.unreachable);
        (self, excluded)
    }
}

// ==========================================
// CandidateGenerator - 候选路线生成引擎
// ==========================================
pub struct CandidateGenerator {}

impl CandidateGenerator {
    pub fn new() -> Self {
        Self {}
    }

    /// 生成候选路线
    ///
    /// 四层嵌套过滤: 产品 → 准入工厂 → 可达港口 → 运价档。
    /// 线路索引按 (起运港, 目的港) 取档,港口/目的港不匹配的档位不会被访问。
    /// 不可达产品只记录,不中止（由调用方按策略处理）。
    #[instrument(skip(self, demand, index), fields(products = demand.len()))]
    pub fn generate(&self, demand: &DemandSnapshot, index: &RoutingIndex) -> CandidateSet {
        let mut set = CandidateSet::default();

        for (product_id, product) in demand {
            let before = set.candidates.len();

            for plant in index.plants_for(*product_id) {
                for port in index.ports_for(&plant.plant_id) {
                    for band in index.bands_on(port, &product.destination_port) {
                        if !is_feasible(product, port, band) {
                            continue;
                        }
                        set.candidates.push(build_candidate(product, plant, port, band));
                    }
                }
            }

            let generated = set.candidates.len() - before;
            if generated == 0 {
                warn!(product_id, destination = %product.destination_port, "产品无可行路线");
                set.unreachable.push(*product_id);
            } else {
                debug!(product_id, candidates = generated, "候选生成");
            }
        }

        info!(
            candidates = set.candidates.len(),
            unreachable = set.unreachable.len(),
            "候选路线生成完成"
        );
        set
    }
}

impl Default for CandidateGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 纯函数: 可行判定与成本
// ==========================================

/// 运价档是否可承运该产品（从给定起运港出发）
pub fn is_feasible(product: &ProductDemand, port: &str, band: &CarrierBand) -> bool {
    band.origin_port == port
        && band.destination_port == product.destination_port
        && band.accepts_weight(product.total_weight)
}

/// 成本分量 (fixed_cost, variable_cost)
///
/// - fixed_cost = 工厂单件成本 × 产品件数 + 运价档最低收费
/// - variable_cost = 运价 × 产品重量
pub fn compute_costs(product: &ProductDemand, plant: &Plant, band: &CarrierBand) -> (f64, f64) {
    let fixed = plant.unit_handling_cost * product.total_unit_quantity + band.minimum_cost;
    let variable = band.rate * product.total_weight;
    (fixed, variable)
}

fn build_candidate(product: &ProductDemand, plant: &Plant, port: &str, band: &CarrierBand) -> RouteCandidate {
    let (fixed_cost, variable_cost) = compute_costs(product, plant, band);
    RouteCandidate {
        product_id: product.product_id,
        plant_id: plant.plant_id.clone(),
        port: port.to_string(),
        band_id: band.band_id,
        order_count: product.order_count,
        fixed_cost,
        variable_cost,
    }
}
