// ==========================================
// 出港物流路线指派系统 - 引擎层
// ==========================================
// 职责: 需求汇总 → 候选生成 → 建模 → 求解 → 敏感性分析
// 红线: 引擎不读写文件;参考数据只读,场景之间不共享可变状态
// ==========================================

pub mod candidate;
pub mod demand;
pub mod error;
pub mod fast_path;
pub mod model;
pub mod network_index;
pub mod orchestrator;
pub mod scenario;
pub mod sensitivity;
pub mod solver;

// 重导出核心引擎
pub use candidate::{CandidateGenerator, CandidateSet};
pub use demand::DemandAggregator;
pub use error::{RoutingError, RoutingResult};
pub use fast_path::{PrePassResult, SinglePlantResolver};
pub use model::{AssignmentModel, AssignmentModelBuilder, ModelStats};
pub use network_index::RoutingIndex;
pub use orchestrator::{OrchestratorOptions, RouteOrchestrator, ScenarioResult};
pub use scenario::ScenarioSpec;
pub use sensitivity::{ScenarioOutcome, SensitivityReport, SensitivityRow, SensitivityRunner};
pub use solver::{HighsSolver, SolveOutcome, Solver};
