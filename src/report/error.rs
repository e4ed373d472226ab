// ==========================================
// 出港物流路线指派系统 - 报表错误类型
// ==========================================

use crate::domain::types::{BandId, PlantId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("报表写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("指派引用的工厂不存在: {0}")]
    UnknownPlant(PlantId),

    #[error("指派引用的运价档不存在: {0}")]
    UnknownBand(BandId),
}

/// Result 类型别名
pub type ReportResult<T> = Result<T, ReportError>;
