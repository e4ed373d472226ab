// ==========================================
// 出港物流路线指派系统 - 单场景编排器
// ==========================================
// 用途: 按固定顺序串联各阶段,完成一个场景的指派
// 流程: 需求汇总 → 候选生成 → 不可达处理 → 快速通道 → 建模 → 求解 → 提取 → 校验
// 红线: 任一阶段失败即终止本场景,绝不返回部分填充的路线
// ==========================================

use crate::domain::order::Order;
use crate::domain::route::Assignment;
use crate::domain::types::{AssignmentSource, DestinationPolicy, ProductId, SolveStatus, UnreachablePolicy};
use crate::engine::candidate::CandidateGenerator;
use crate::engine::demand::DemandAggregator;
use crate::engine::error::{RoutingError, RoutingResult};
use crate::engine::fast_path::{PrePassResult, SinglePlantResolver};
use crate::engine::model::{AssignmentModelBuilder, ModelStats};
use crate::engine::network_index::RoutingIndex;
use crate::engine::scenario::ScenarioSpec;
use crate::engine::solver::{SolveOutcome, Solver};
use crate::perf::PerfGuard;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

// ==========================================
// OrchestratorOptions - 编排参数
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorOptions {
    pub unreachable_policy: UnreachablePolicy,
    pub destination_policy: DestinationPolicy,
    pub fast_path_enabled: bool,
    pub tie_break_epsilon: f64,
    /// None = 不限时
    pub max_solve_duration: Option<Duration>,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            unreachable_policy: UnreachablePolicy::default(),
            destination_policy: DestinationPolicy::default(),
            fast_path_enabled: true,
            tie_break_epsilon: 1e-6,
            max_solve_duration: Some(Duration::from_secs(10)),
        }
    }
}

// ==========================================
// ScenarioResult - 场景结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    pub label: String,
    pub capacity_factor: f64,
    pub freight_factor: f64,
    pub status: SolveStatus,
    /// 精确总成本 Σ (fixed + ff × variable)
    pub total_cost: f64,
    pub assignments: BTreeMap<ProductId, Assignment>,
    /// 按 Exclude 策略剔除的不可达产品
    pub excluded_products: Vec<ProductId>,
    pub fast_path_resolved: usize,
    pub model_stats: ModelStats,
    pub elapsed_ms: u64,
}

impl ScenarioResult {
    pub fn products_assigned(&self) -> usize {
        self.assignments.len()
    }
}

// ==========================================
// RouteOrchestrator - 单场景编排器
// ==========================================
pub struct RouteOrchestrator<S>
where
    S: Solver,
{
    options: OrchestratorOptions,
    aggregator: DemandAggregator,
    generator: CandidateGenerator,
    resolver: SinglePlantResolver,
    builder: AssignmentModelBuilder,
    solver: S,
}

impl<S> RouteOrchestrator<S>
where
    S: Solver,
{
    /// 创建编排器
    ///
    /// # 参数
    /// - options: 编排参数
    /// - solver: 求解器适配器
    pub fn new(options: OrchestratorOptions, solver: S) -> Self {
        Self {
            aggregator: DemandAggregator::new(options.destination_policy),
            generator: CandidateGenerator::new(),
            resolver: SinglePlantResolver::new(),
            builder: AssignmentModelBuilder::new(options.tie_break_epsilon),
            solver,
            options,
        }
    }

    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    pub fn solver_name(&self) -> &'static str {
        self.solver.name()
    }

    /// 执行单个场景
    ///
    /// # 参数
    /// - orders: 原始订单（只读）
    /// - index: 路由索引（只读,场景间共享）
    /// - scenario: 场景系数
    #[instrument(skip(self, orders, index, scenario), fields(scenario = %scenario.label))]
    pub fn run_scenario(
        &self,
        orders: &[Order],
        index: &RoutingIndex,
        scenario: &ScenarioSpec,
    ) -> RoutingResult<ScenarioResult> {
        let _perf = PerfGuard::new("route_orchestrator.run_scenario");
        let started = Instant::now();
        let cf = scenario.capacity_factor;
        let ff = scenario.freight_factor;
        info!(capacity_factor = cf, freight_factor = ff, orders = orders.len(), "开始执行场景");

        // ==========================================
        // 步骤1: 需求汇总
        // ==========================================
        let demand = self.aggregator.aggregate(orders)?;

        // ==========================================
        // 步骤2: 候选生成 + 不可达处理
        // ==========================================
        let candidate_set = self.generator.generate(&demand, index);
        let (candidate_set, excluded_products) = match self.options.unreachable_policy {
            UnreachablePolicy::Abort => {
                candidate_set.check_coverage()?;
                (candidate_set, Vec::new())
            }
            UnreachablePolicy::Exclude => {
                let (set, excluded) = candidate_set.without_unreachable();
                if !excluded.is_empty() {
                    warn!(excluded = ?excluded, "不可达产品已剔除");
                }
                (set, excluded)
            }
        };

        // ==========================================
        // 步骤3: 单工厂快速通道
        // ==========================================
        let prepass = if self.options.fast_path_enabled {
            self.resolver.resolve(&candidate_set.candidates, ff)
        } else {
            PrePassResult::passthrough(&candidate_set.candidates)
        };
        if let Some(overload) = prepass.overloaded_plants(index, cf).into_iter().next() {
            return Err(self.infeasible(
                scenario,
                format!(
                    "工厂 {} 单工厂产品占用 {} 单,超出缩放产能 {}",
                    overload.plant_id, overload.charged, overload.limit
                ),
            ));
        }

        // ==========================================
        // 步骤4: 建模
        // ==========================================
        let model = self.builder.build(
            &prepass.remaining,
            index,
            cf,
            ff,
            &prepass.charged_orders,
        )?;

        // ==========================================
        // 步骤5: 求解
        // ==========================================
        let outcome = self.solver.solve(&model, self.options.max_solve_duration)?;
        let (status, source, values) = match outcome {
            SolveOutcome::Optimal { values } => (SolveStatus::Optimal, AssignmentSource::Solver, values),
            SolveOutcome::Suboptimal { values, objective } => {
                debug!(objective, "求解器返回次优解");
                (SolveStatus::Suboptimal, AssignmentSource::Solver, values)
            }
            SolveOutcome::TimedOut { best: Some(values) } => {
                (SolveStatus::TimedOut, AssignmentSource::Heuristic, values)
            }
            SolveOutcome::TimedOut { best: None } => {
                return Err(RoutingError::SolverTimeout {
                    scenario: scenario.label.clone(),
                    limit_ms: self.limit_ms(),
                });
            }
            SolveOutcome::Infeasible { reason } => return Err(self.infeasible(scenario, reason)),
        };

        // ==========================================
        // 步骤6: 提取 + 校验
        // ==========================================
        let selected = model.selection_from_values(&values);
        model.verify(&selected)?;

        let fast_path_resolved = prepass.resolved.len();
        let mut assignments: BTreeMap<ProductId, Assignment> = prepass
            .resolved
            .into_iter()
            .map(|a| (a.product_id, a))
            .collect();
        for (var, _) in model.variables.iter().zip(&selected).filter(|(_, on)| **on) {
            let assignment = Assignment::new(var.candidate.clone(), ff, source);
            assignments.insert(assignment.product_id, assignment);
        }

        let total_cost = assignments.values().map(|a| a.cost).sum();
        let result = ScenarioResult {
            label: scenario.label.clone(),
            capacity_factor: cf,
            freight_factor: ff,
            status,
            total_cost,
            excluded_products,
            fast_path_resolved,
            model_stats: model.stats(),
            elapsed_ms: started.elapsed().as_millis() as u64,
            assignments,
        };

        info!(
            status = %result.status,
            total_cost = result.total_cost,
            products_assigned = result.products_assigned(),
            fast_path_resolved = result.fast_path_resolved,
            elapsed_ms = result.elapsed_ms,
            "场景执行完成"
        );
        Ok(result)
    }

    fn infeasible(&self, scenario: &ScenarioSpec, reason: String) -> RoutingError {
        warn!(scenario = %scenario.label, reason = %reason, "模型不可行");
        RoutingError::InfeasibleModel {
            scenario: scenario.label.clone(),
            capacity_factor: scenario.capacity_factor,
            freight_factor: scenario.freight_factor,
            reason,
        }
    }

    fn limit_ms(&self) -> u64 {
        self.options
            .max_solve_duration
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
