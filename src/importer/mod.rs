// ==========================================
// 出港物流路线指派系统 - 导入层
// ==========================================
// 职责: 外部表格 → 强类型订单与参考数据
// 支持: Excel 工作簿, CSV 目录
// 红线: 只做解析、映射、校验;不做任何路线计算
// ==========================================

pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod table_loader;

// 重导出核心类型
pub use dq_validator::{DqLevel, DqReport, DqValidator, DqViolation};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper, TableKind};
pub use file_parser::{CsvParser, ExcelParser, RawRow, RawTable};
pub use table_loader::{InputTables, TableLoader};
