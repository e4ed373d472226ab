// ==========================================
// 出港物流路线指派系统 - 求解器适配层
// ==========================================
// 职责: AssignmentModel → good_lp 模型 → HiGHS 求解 → 变量取值 / 不可行信号
// 时限: 交给 HiGHS 自身的 time_limit,求解在调用线程内结束
//       时限内未证明最优时返回 HiGHS 的现有可行解（经约束校验）
// 红线: 求解器只回答模型问题,不解释业务含义
// ==========================================

use crate::engine::error::{RoutingError, RoutingResult};
use crate::engine::model::{AssignmentModel, ConstraintSense};
use crate::perf;
use good_lp::solvers::highs::highs;
use good_lp::{
    variable, variables, Expression, ResolutionError, Solution, SolutionStatus, SolverModel, Variable,
    WithTimeLimit,
};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

// ==========================================
// SolveOutcome - 求解结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// 证明最优
    Optimal { values: Vec<f64> },
    /// 可行但未证明最优（停在 MIP gap 上）
    Suboptimal { values: Vec<f64>, objective: f64 },
    /// 超时;best 为超时前求解器找到的可行解
    TimedOut { best: Option<Vec<f64>> },
    /// 约束无法同时满足
    Infeasible { reason: String },
}

impl SolveOutcome {
    pub fn values(&self) -> Option<&[f64]> {
        match self {
            SolveOutcome::Optimal { values } | SolveOutcome::Suboptimal { values, .. } => Some(values),
            SolveOutcome::TimedOut { best } => best.as_deref(),
            SolveOutcome::Infeasible { .. } => None,
        }
    }
}

// ==========================================
// Solver Trait
// ==========================================
pub trait Solver {
    fn name(&self) -> &'static str;

    /// 求解模型
    ///
    /// limit 为 None 时不限时。
    fn solve(&self, model: &AssignmentModel, limit: Option<Duration>) -> RoutingResult<SolveOutcome>;
}

// ==========================================
// HighsSolver - good_lp + HiGHS 适配器
// ==========================================
pub struct HighsSolver {}

impl HighsSolver {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for HighsSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    #[instrument(skip(self, model), fields(
        variables = model.variables.len(),
        constraints = model.constraints.len(),
        limit_ms = limit.map(|d| d.as_millis() as u64)
    ))]
    fn solve(&self, model: &AssignmentModel, limit: Option<Duration>) -> RoutingResult<SolveOutcome> {
        if model.is_empty() {
            debug!("空模型,无需求解");
            return Ok(SolveOutcome::Optimal { values: Vec::new() });
        }

        perf::record_solver_call();
        let started = Instant::now();
        let outcome = run_highs(model, limit)?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            SolveOutcome::TimedOut { best } => {
                perf::record_solver_timeout();
                warn!(elapsed_ms, has_incumbent = best.is_some(), "求解达到时限");
            }
            SolveOutcome::Infeasible { .. } => info!(elapsed_ms, "模型不可行"),
            _ => info!(elapsed_ms, "求解完成"),
        }
        Ok(outcome)
    }
}

/// 模型翻译 + 调用 HiGHS
fn run_highs(model: &AssignmentModel, limit: Option<Duration>) -> RoutingResult<SolveOutcome> {
    let mut vars = variables!();
    let x: Vec<Variable> = model
        .variables
        .iter()
        .map(|_| vars.add(variable().binary()))
        .collect();

    let objective = model
        .variables
        .iter()
        .zip(&x)
        .fold(Expression::from(0.0), |acc, (v, &var)| acc + v.objective_coeff * var);

    let mut problem = vars.minimise(objective).using(highs);
    if let Some(limit) = limit {
        problem = problem.with_time_limit(limit.as_secs_f64());
    }

    for constraint in &model.constraints {
        let lhs = constraint
            .terms
            .iter()
            .fold(Expression::from(0.0), |acc, &(var, coeff)| acc + coeff * x[var]);
        problem.add_constraint(match constraint.sense {
            ConstraintSense::Equal => lhs.eq(constraint.rhs),
            ConstraintSense::LessOrEqual => lhs.leq(constraint.rhs),
        });
    }

    let solution = match problem.solve() {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) => {
            return Ok(SolveOutcome::Infeasible {
                reason: "指派约束与产能约束无法同时满足".to_string(),
            })
        }
        Err(e) => return Err(RoutingError::Solver(e.to_string())),
    };

    let values: Vec<f64> = x.iter().map(|&var| solution.value(var)).collect();
    Ok(match solution.status() {
        SolutionStatus::Optimal => SolveOutcome::Optimal { values },
        SolutionStatus::GapLimit => SolveOutcome::Suboptimal {
            objective: objective_value(model, &values),
            values,
        },
        // 时限内的现有解须满足全部约束才算已找到的可行解
        _ => {
            let selected = model.selection_from_values(&values);
            let best = model.verify(&selected).is_ok().then_some(values);
            SolveOutcome::TimedOut { best }
        }
    })
}

fn objective_value(model: &AssignmentModel, values: &[f64]) -> f64 {
    model
        .variables
        .iter()
        .zip(values)
        .map(|(v, value)| v.objective_coeff * value)
        .sum()
}
