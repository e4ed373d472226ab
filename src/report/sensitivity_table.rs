// ==========================================
// 出港物流路线指派系统 - 敏感性分析报表
// ==========================================
// 职责: SensitivityReport → CSV / JSON / 控制台文本
// 红线: 失败场景同样输出一行;基准失败时明确提示,不输出增量
// ==========================================

use crate::engine::sensitivity::{SensitivityReport, SensitivityRow};
use crate::report::error::ReportResult;
use crate::report::solution_writer::write_csv;
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;

/// CSV 行（空值输出为空单元格）
#[derive(Debug, Serialize)]
struct SensitivityCsvRow<'a> {
    scenario: &'a str,
    capacity_factor: f64,
    freight_factor: f64,
    status: &'a str,
    total_cost: Option<f64>,
    products_assigned: usize,
    delta_abs: Option<f64>,
    delta_rel: Option<f64>,
    note: Option<&'a str>,
}

impl<'a> From<&'a SensitivityRow> for SensitivityCsvRow<'a> {
    fn from(row: &'a SensitivityRow) -> Self {
        Self {
            scenario: &row.scenario,
            capacity_factor: row.capacity_factor,
            freight_factor: row.freight_factor,
            status: &row.status,
            total_cost: row.total_cost,
            products_assigned: row.products_assigned,
            delta_abs: row.delta_abs,
            delta_rel: row.delta_rel,
            note: row.note.as_deref(),
        }
    }
}

pub struct SensitivityTable;

impl SensitivityTable {
    pub fn write_csv<W: Write>(&self, report: &SensitivityReport, writer: W) -> ReportResult<()> {
        let rows: Vec<SensitivityCsvRow<'_>> = report.rows.iter().map(SensitivityCsvRow::from).collect();
        write_csv(writer, &rows)
    }

    pub fn write_json<W: Write>(&self, report: &SensitivityReport, mut writer: W) -> ReportResult<()> {
        serde_json::to_writer_pretty(&mut writer, report)?;
        writer.flush()?;
        Ok(())
    }

    /// 控制台文本
    pub fn render(&self, report: &SensitivityReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "敏感性分析 run_id={} solver={}", report.run_id, report.solver);
        for row in &report.rows {
            let cost = match row.total_cost {
                Some(cost) => format!("{:.2}", cost),
                None => "-".to_string(),
            };
            let _ = writeln!(
                out,
                "  {:<16} cap×{:.2} freight×{:.2}  {:<12} cost={:<14} assigned={}",
                row.scenario, row.capacity_factor, row.freight_factor, row.status, cost, row.products_assigned
            );
            if let Some(delta) = delta_line(row) {
                let _ = writeln!(out, "      {}", delta);
            }
            if let Some(note) = &row.note {
                let _ = writeln!(out, "      注: {}", note);
            }
        }
        if let Some(reason) = &report.deltas_disabled {
            let _ = writeln!(out, "!! {}", reason);
        }
        out
    }
}

fn delta_line(row: &SensitivityRow) -> Option<String> {
    let delta_abs = row.delta_abs?;
    Some(match row.delta_rel {
        Some(rel) => format!("Δ cost vs baseline = {:.2} ({:+.2}%)", delta_abs, rel),
        None => format!("Δ cost vs baseline = {:.2} (n/a)", delta_abs),
    })
}
