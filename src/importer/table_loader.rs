// ==========================================
// 出港物流路线指派系统 - 输入表加载
// ==========================================
// 流程: 文件解析 → 字段映射 → DQ 校验 → InputTables
// 输入: .xlsx/.xls 工作簿（按序号取 5 张表）或含 5 个 CSV 的目录
// ==========================================

use crate::domain::network::ReferenceData;
use crate::domain::order::Order;
use crate::importer::dq_validator::{DqReport, DqValidator};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{FieldMapper, TableKind};
use crate::importer::file_parser::{CsvParser, ExcelParser, RawTable};
use crate::perf::PerfGuard;
use std::path::Path;
use tracing::{info, instrument, warn};

/// 加载完成的输入数据（单次运行内只读）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputTables {
    pub orders: Vec<Order>,
    pub reference: ReferenceData,
    pub dq_report: DqReport,
}

pub struct TableLoader;

impl TableLoader {
    /// 按路径类型加载（目录 → CSV,文件 → 工作簿）
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> ImportResult<InputTables> {
        let _perf = PerfGuard::new("table_loader.load");
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let tables = if path.is_dir() {
            self.read_csv_dir(path)?
        } else {
            self.read_workbook(path)?
        };
        self.assemble(tables)
    }

    fn read_workbook(&self, path: &Path) -> ImportResult<Vec<RawTable>> {
        let mut sheets = ExcelParser.parse_sheets(path)?;
        for kind in TableKind::ALL {
            if sheets.len() <= kind.sheet_index() {
                return Err(ImportError::MissingSheet {
                    index: kind.sheet_index(),
                    expected: kind.name().to_string(),
                });
            }
        }
        if sheets.len() > TableKind::ALL.len() {
            info!(ignored = sheets.len() - TableKind::ALL.len(), "忽略多余工作表");
        }
        sheets.truncate(TableKind::ALL.len());
        Ok(sheets)
    }

    fn read_csv_dir(&self, dir: &Path) -> ImportResult<Vec<RawTable>> {
        TableKind::ALL
            .iter()
            .map(|kind| CsvParser.parse_table(&dir.join(kind.csv_file_name()), kind.name()))
            .collect()
    }

    /// tables 按 TableKind::ALL 顺序排列
    fn assemble(&self, tables: Vec<RawTable>) -> ImportResult<InputTables> {
        let table = |kind: TableKind| &tables[kind.sheet_index()];
        let mapper = FieldMapper;

        let orders = mapper.map_orders(table(TableKind::Orders))?;
        let reference = ReferenceData {
            plants: mapper.map_plants(table(TableKind::Plants))?,
            plant_products: mapper.map_plant_products(table(TableKind::PlantProducts))?,
            plant_ports: mapper.map_plant_ports(table(TableKind::PlantPorts))?,
            carrier_bands: mapper.map_carrier_bands(table(TableKind::CarrierBands))?,
        };

        let dq_report = DqValidator.validate(&orders, &reference);
        for violation in &dq_report.violations {
            warn!(violation = %violation, "数据质量问题");
        }
        if let Some(first) = dq_report.errors().next() {
            return Err(ImportError::DataQuality {
                count: dq_report.error_count(),
                first: first.to_string(),
            });
        }

        info!(
            orders = orders.len(),
            plants = reference.plants.len(),
            plant_products = reference.plant_products.len(),
            plant_ports = reference.plant_ports.len(),
            carrier_bands = reference.carrier_bands.len(),
            dq_warnings = dq_report.warning_count(),
            "输入数据加载完成"
        );
        Ok(InputTables {
            orders,
            reference,
            dq_report,
        })
    }
}
