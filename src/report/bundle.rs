// ==========================================
// 出港物流路线指派系统 - 报表目录输出
// ==========================================
// 输出文件:
//   sensitivity.csv / sensitivity.json  敏感性分析表
//   baseline_products.csv               基准场景按产品指派
//   baseline_orders.csv                 基准场景按订单指派
// 基准场景失败时不输出后两个文件
// ==========================================

use crate::domain::order::Order;
use crate::engine::network_index::RoutingIndex;
use crate::engine::sensitivity::SensitivityReport;
use crate::report::error::ReportResult;
use crate::report::sensitivity_table::SensitivityTable;
use crate::report::solution_writer::SolutionWriter;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

pub const SENSITIVITY_CSV: &str = "sensitivity.csv";
pub const SENSITIVITY_JSON: &str = "sensitivity.json";
pub const BASELINE_PRODUCTS_CSV: &str = "baseline_products.csv";
pub const BASELINE_ORDERS_CSV: &str = "baseline_orders.csv";

pub struct ReportBundle<'a> {
    output_dir: &'a Path,
}

impl<'a> ReportBundle<'a> {
    pub fn new(output_dir: &'a Path) -> Self {
        Self { output_dir }
    }

    /// 写出全部报表,返回已写文件路径
    #[instrument(skip_all, fields(output_dir = %self.output_dir.display()))]
    pub fn write_all(
        &self,
        report: &SensitivityReport,
        orders: &[Order],
        index: &RoutingIndex,
    ) -> ReportResult<Vec<PathBuf>> {
        fs::create_dir_all(self.output_dir)?;
        let mut written = Vec::new();

        let path = self.output_dir.join(SENSITIVITY_CSV);
        SensitivityTable.write_csv(report, BufWriter::new(File::create(&path)?))?;
        written.push(path);

        let path = self.output_dir.join(SENSITIVITY_JSON);
        SensitivityTable.write_json(report, BufWriter::new(File::create(&path)?))?;
        written.push(path);

        if let Some(baseline) = report.baseline_result() {
            let writer = SolutionWriter::new(index);

            let path = self.output_dir.join(BASELINE_PRODUCTS_CSV);
            writer.write_products_csv(baseline, BufWriter::new(File::create(&path)?))?;
            written.push(path);

            let path = self.output_dir.join(BASELINE_ORDERS_CSV);
            writer.write_orders_csv(orders, baseline, BufWriter::new(File::create(&path)?))?;
            written.push(path);
        }

        info!(files = written.len(), "报表写出完成");
        Ok(written)
    }
}
