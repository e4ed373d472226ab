// ==========================================
// 出港物流路线指派系统 - 文件解析器
// ==========================================
// 职责: 文件 → 原始表（表头 + 字符串单元格）
// 支持: Excel 工作簿（多工作表）/ CSV 单表
// 红线: 只做读取与去空白,不做类型转换
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::debug;

// ==========================================
// RawTable - 原始表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// 原始数据行
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// 数据行号（表头之后从 1 开始,按源文件行计,空白行也占号）
    pub row_number: usize,
    pub values: HashMap<String, String>,
}

impl RawRow {
    pub fn get(&self, header: &str) -> Option<&str> {
        self.values.get(header).map(String::as_str)
    }
}

fn build_row(headers: &[String], cells: impl Iterator<Item = String>, row_number: usize) -> Option<RawRow> {
    let mut values = HashMap::new();
    for (col_idx, value) in cells.enumerate() {
        if let Some(header) = headers.get(col_idx) {
            values.insert(header.clone(), value.trim().to_string());
        }
    }

    // 跳过完全空白的行
    if values.values().all(|v| v.is_empty()) {
        return None;
    }
    Some(RawRow { row_number, values })
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ImportError::FileNotFound(path.display().to_string()))
    }
}

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl CsvParser {
    pub fn parse_table(&self, path: &Path, name: &str) -> ImportResult<RawTable> {
        ensure_exists(path)?;

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            // csv 会跳过空行,行号按记录起始行计（表头在第 1 行）
            let row_number = record
                .position()
                .map_or(idx + 1, |pos| pos.line().saturating_sub(1) as usize);
            if let Some(row) = build_row(&headers, record.iter().map(str::to_string), row_number) {
                rows.push(row);
            }
        }

        debug!(table = name, rows = rows.len(), "CSV 读取完成");
        Ok(RawTable {
            name: name.to_string(),
            headers,
            rows,
        })
    }
}

// ==========================================
// Excel Parser
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 按工作表顺序读取全部工作表
    pub fn parse_sheets(&self, path: &Path) -> ImportResult<Vec<RawTable>> {
        ensure_exists(path)?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(path)?;
        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError("Excel 文件无工作表".to_string()));
        }

        let mut tables = Vec::with_capacity(sheet_names.len());
        for sheet_name in sheet_names {
            let range = workbook.worksheet_range(&sheet_name)?;
            let mut rows_iter = range.rows();

            // 表头（第一行）;空工作表视为无数据
            let headers: Vec<String> = match rows_iter.next() {
                Some(header_row) => header_row
                    .iter()
                    .map(|cell| cell.to_string().trim().to_string())
                    .collect(),
                None => Vec::new(),
            };

            let mut rows = Vec::new();
            for (idx, data_row) in rows_iter.enumerate() {
                if let Some(row) = build_row(&headers, data_row.iter().map(|c| c.to_string()), idx + 1) {
                    rows.push(row);
                }
            }

            debug!(sheet = %sheet_name, rows = rows.len(), "工作表读取完成");
            tables.push(RawTable {
                name: sheet_name,
                headers,
                rows,
            });
        }
        Ok(tables)
    }
}
