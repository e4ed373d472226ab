// ==========================================
// 出港物流路线指派系统 - 敏感性分析
// ==========================================
// 职责: 按场景逐一执行完整流程,汇总总成本并计算相对基准的增量
// 规则:
//   - 单个场景失败不影响后续场景,每个场景的结果都进入报表
//   - 基准场景失败时明确停用增量计算,不输出 0 或无意义的增量
// ==========================================

use crate::domain::order::Order;
use crate::engine::error::RoutingError;
use crate::engine::network_index::RoutingIndex;
use crate::engine::orchestrator::{RouteOrchestrator, ScenarioResult};
use crate::engine::scenario::ScenarioSpec;
use crate::engine::solver::Solver;
use crate::perf::PerfGuard;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ScenarioOutcome - 单场景结局
// ==========================================
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub spec: ScenarioSpec,
    pub result: Result<ScenarioResult, RoutingError>,
}

impl ScenarioOutcome {
    /// 状态码: 成功为求解状态,失败为错误代码
    pub fn status_code(&self) -> String {
        match &self.result {
            Ok(result) => result.status.to_string(),
            Err(err) => err.kind().to_string(),
        }
    }
}

// ==========================================
// SensitivityRow - 报表行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityRow {
    pub scenario: String,
    pub capacity_factor: f64,
    pub freight_factor: f64,
    pub baseline: bool,
    pub status: String,
    pub total_cost: Option<f64>,
    pub products_assigned: usize,
    pub delta_abs: Option<f64>,
    pub delta_rel: Option<f64>,
    pub note: Option<String>,
}

// ==========================================
// SensitivityReport - 敏感性分析报告
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct SensitivityReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub solver: String,
    /// 生效配置快照
    pub config: serde_json::Value,
    pub baseline: Option<String>,
    /// 增量被停用的原因（基准失败/缺失/成本为 0）
    pub deltas_disabled: Option<String>,
    pub rows: Vec<SensitivityRow>,
    #[serde(skip)]
    pub outcomes: Vec<ScenarioOutcome>,
}

impl SensitivityReport {
    pub fn row(&self, scenario: &str) -> Option<&SensitivityRow> {
        self.rows.iter().find(|r| r.scenario == scenario)
    }

    /// 基准场景的成功结果
    pub fn baseline_result(&self) -> Option<&ScenarioResult> {
        self.outcomes
            .iter()
            .find(|o| o.spec.baseline)
            .and_then(|o| o.result.as_ref().ok())
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

// ==========================================
// SensitivityRunner - 敏感性分析执行器
// ==========================================
pub struct SensitivityRunner<'a, S>
where
    S: Solver,
{
    orchestrator: &'a RouteOrchestrator<S>,
}

impl<'a, S> SensitivityRunner<'a, S>
where
    S: Solver,
{
    pub fn new(orchestrator: &'a RouteOrchestrator<S>) -> Self {
        Self { orchestrator }
    }

    /// 逐场景执行并汇总
    ///
    /// # 参数
    /// - orders / index: 各场景共享的只读输入
    /// - scenarios: 场景列表（按给定顺序执行）
    /// - config_snapshot: 写入报告的配置快照
    #[instrument(skip_all, fields(scenarios = scenarios.len()))]
    pub fn run(
        &self,
        orders: &[Order],
        index: &RoutingIndex,
        scenarios: &[ScenarioSpec],
        config_snapshot: serde_json::Value,
    ) -> SensitivityReport {
        let _perf = PerfGuard::new("sensitivity_runner.run");

        let outcomes: Vec<ScenarioOutcome> = scenarios
            .iter()
            .map(|spec| {
                let result = self.orchestrator.run_scenario(orders, index, spec);
                if let Err(err) = &result {
                    warn!(scenario = %spec.label, kind = err.kind(), error = %err, "场景失败,继续后续场景");
                }
                ScenarioOutcome {
                    spec: spec.clone(),
                    result,
                }
            })
            .collect();

        let report = build_report(
            outcomes,
            self.orchestrator.solver_name(),
            config_snapshot,
        );
        info!(
            run_id = %report.run_id,
            failed = report.failed_count(),
            deltas_disabled = report.deltas_disabled.is_some(),
            "敏感性分析完成"
        );
        report
    }
}

/// 汇总场景结局为报告（计算增量）
pub fn build_report(
    outcomes: Vec<ScenarioOutcome>,
    solver: &str,
    config_snapshot: serde_json::Value,
) -> SensitivityReport {
    let baseline = outcomes.iter().find(|o| o.spec.baseline);
    let (baseline_cost, deltas_disabled) = match baseline {
        None => (None, Some("未指定基准场景,不计算增量".to_string())),
        Some(outcome) => match &outcome.result {
            Err(err) => (
                None,
                Some(format!(
                    "基准场景 {} 失败 ({}),不计算增量",
                    outcome.spec.label,
                    err.kind()
                )),
            ),
            Ok(result) => (Some(result.total_cost), None),
        },
    };
    if let Some(reason) = &deltas_disabled {
        warn!(reason = %reason, "增量计算已停用");
    }

    let rows = outcomes
        .iter()
        .map(|outcome| build_row(outcome, baseline_cost))
        .collect();

    SensitivityReport {
        run_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        solver: solver.to_string(),
        config: config_snapshot,
        baseline: baseline.map(|o| o.spec.label.clone()),
        deltas_disabled,
        rows,
        outcomes,
    }
}

fn build_row(outcome: &ScenarioOutcome, baseline_cost: Option<f64>) -> SensitivityRow {
    let spec = &outcome.spec;
    let mut row = SensitivityRow {
        scenario: spec.label.clone(),
        capacity_factor: spec.capacity_factor,
        freight_factor: spec.freight_factor,
        baseline: spec.baseline,
        status: outcome.status_code(),
        total_cost: None,
        products_assigned: 0,
        delta_abs: None,
        delta_rel: None,
        note: None,
    };

    let result = match &outcome.result {
        Ok(result) => result,
        Err(err) => {
            row.note = Some(err.to_string());
            return row;
        }
    };

    row.total_cost = Some(result.total_cost);
    row.products_assigned = result.products_assigned();
    if !result.excluded_products.is_empty() {
        row.note = Some(format!("剔除不可达产品 {:?}", result.excluded_products));
    }

    if spec.baseline {
        return row;
    }
    if let Some(base) = baseline_cost {
        let (delta_abs, delta_rel) = compute_delta(result.total_cost, base);
        row.delta_abs = Some(delta_abs);
        row.delta_rel = delta_rel;
        if delta_rel.is_none() {
            row.note = Some("基准成本为 0,相对增量无定义".to_string());
        }
    }
    row
}

/// 相对基准的增量
///
/// - delta_abs = cost − baseline
/// - delta_rel = (cost / baseline − 1) × 100,保留两位小数；基准为 0 时无定义
pub fn compute_delta(cost: f64, baseline_cost: f64) -> (f64, Option<f64>) {
    let delta_abs = cost - baseline_cost;
    let delta_rel = (baseline_cost != 0.0).then(|| round2((cost / baseline_cost - 1.0) * 100.0));
    (delta_abs, delta_rel)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
