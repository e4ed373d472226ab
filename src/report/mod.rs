// ==========================================
// 出港物流路线指派系统 - 报表层
// ==========================================
// 职责: 场景结果与敏感性报告 → CSV / JSON / 控制台
// 红线: 只读引擎结果,不重新计算成本
// ==========================================

pub mod bundle;
pub mod error;
pub mod sensitivity_table;
pub mod solution_writer;

pub use bundle::ReportBundle;
pub use error::{ReportError, ReportResult};
pub use sensitivity_table::SensitivityTable;
pub use solution_writer::{OrderRouteRow, ProductRouteRow, SolutionWriter};
