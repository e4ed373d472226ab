// ==========================================
// 出港物流路线指派系统 - 核心库
// ==========================================
// 技术栈: Rust + good_lp/HiGHS (MILP) + calamine/csv
// 系统定位: 决策支持系统（成本最优路线指派 + 敏感性分析）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 候选生成、建模、求解
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 运行参数
pub mod config;

// 报表层 - 结果输出
pub mod report;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AssignmentSource, DestinationPolicy, SolveStatus, UnreachablePolicy};

// 领域实体
pub use domain::{Assignment, CarrierBand, Order, Plant, ProductDemand, ReferenceData, RouteCandidate};

// 引擎
pub use engine::{
    CandidateGenerator, DemandAggregator, HighsSolver, RouteOrchestrator, RoutingError, RoutingIndex,
    ScenarioSpec, SensitivityReport, SensitivityRunner, Solver,
};

// 导入与配置
pub use config::{ConfigManager, RoutingConfig};
pub use importer::{InputTables, TableLoader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "出港物流路线指派系统";
