// ==========================================
// 出港物流路线指派系统 - 领域模型层
// ==========================================
// 职责: 定义订单、参考数据、候选路线、指派结果
// 红线: 不含文件读写逻辑,不含求解逻辑
// ==========================================

pub mod network;
pub mod order;
pub mod route;
pub mod types;

// 重导出核心类型
pub use network::{CarrierBand, Plant, ReferenceData};
pub use order::{DemandSnapshot, Order, ProductDemand};
pub use route::{Assignment, RouteCandidate};
pub use types::{
    AssignmentSource, BandId, DestinationPolicy, OrderId, PlantId, PortCode, ProductId,
    SolveStatus, UnreachablePolicy,
};
