// ==========================================
// 出港物流路线指派系统 - 字段映射器
// ==========================================
// 职责: 原始表 → 强类型记录（订单/工厂/准入/运价档/工厂港口）
// 列名: 去空白后按别名表匹配,不区分大小写
// ==========================================

use crate::domain::network::{CarrierBand, Plant};
use crate::domain::order::Order;
use crate::domain::types::{PlantId, PortCode, ProductId};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRow, RawTable};
use std::collections::HashMap;

// ==========================================
// TableKind - 输入表种类
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Orders,
    Plants,
    PlantProducts,
    CarrierBands,
    PlantPorts,
}

impl TableKind {
    pub const ALL: [TableKind; 5] = [
        TableKind::Orders,
        TableKind::Plants,
        TableKind::PlantProducts,
        TableKind::CarrierBands,
        TableKind::PlantPorts,
    ];

    /// 工作簿中的工作表序号
    pub fn sheet_index(&self) -> usize {
        match self {
            TableKind::Orders => 0,
            TableKind::Plants => 1,
            TableKind::PlantProducts => 2,
            TableKind::CarrierBands => 3,
            TableKind::PlantPorts => 4,
        }
    }

    /// CSV 目录中的文件名
    pub fn csv_file_name(&self) -> &'static str {
        match self {
            TableKind::Orders => "orders.csv",
            TableKind::Plants => "plants.csv",
            TableKind::PlantProducts => "plant_products.csv",
            TableKind::CarrierBands => "carrier_bands.csv",
            TableKind::PlantPorts => "plant_ports.csv",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TableKind::Orders => "Orders",
            TableKind::Plants => "Plants",
            TableKind::PlantProducts => "ProductsPerPlant",
            TableKind::CarrierBands => "FreightRates",
            TableKind::PlantPorts => "PlantPorts",
        }
    }
}

// ==========================================
// 列名别名表
// ==========================================
const PRODUCT_ID: &[&str] = &["Product ID", "product_id"];
const ORDER_ID: &[&str] = &["Order ID", "order_id"];
const UNIT_QUANTITY: &[&str] = &["Unit quantity", "unit_quantity", "Units"];
const WEIGHT: &[&str] = &["Weight", "weight"];
const DESTINATION_PORT: &[&str] = &["Destination Port", "destination_port", "dest_port_cd"];
const PLANT_ID: &[&str] = &["Plant ID", "Plant Code", "plant_id", "WH"];
const CAPACITY: &[&str] = &["Daily Capacity", "capacity"];
const UNIT_COST: &[&str] = &["Cost/unit", "unit_cost", "Cost per unit"];
const PORT: &[&str] = &["Port", "port"];
const CARRIER: &[&str] = &["Carrier", "carrier"];
const ORIGIN_PORT: &[&str] = &["orig_port_cd", "origin_port"];
const MIN_WEIGHT: &[&str] = &["minm_wgh_qty", "min_weight"];
const MAX_WEIGHT: &[&str] = &["max_wgh_qty", "max_weight"];
const SERVICE_CODE: &[&str] = &["svc_cd", "service_code"];
const MINIMUM_COST: &[&str] = &["minimum cost", "minimum_cost"];
const RATE: &[&str] = &["rate"];
const CARRIER_TYPE: &[&str] = &["Carrier type", "carrier_type"];
const BAND_DESTINATION: &[&str] = &["dest_port_cd", "destination_port"];

// ==========================================
// ColumnMap - 已解析的列
// ==========================================
// 标准字段（别名表首项）→ 实际表头
struct ColumnMap<'t> {
    table: &'t RawTable,
    resolved: HashMap<&'static str, &'t str>,
}

impl<'t> ColumnMap<'t> {
    fn resolve(table: &'t RawTable, fields: &[&'static [&'static str]]) -> ImportResult<Self> {
        let mut resolved = HashMap::new();
        for aliases in fields {
            let header = table
                .headers
                .iter()
                .find(|h| aliases.iter().any(|a| h.trim().eq_ignore_ascii_case(a)))
                .ok_or_else(|| ImportError::MissingColumn {
                    table: table.name.clone(),
                    column: aliases[0].to_string(),
                })?;
            resolved.insert(aliases[0], header.as_str());
        }
        Ok(Self { table, resolved })
    }

    fn raw<'r>(&self, row: &'r RawRow, field: &'static [&'static str]) -> ImportResult<&'r str> {
        let header = self.resolved.get(field[0]).copied().unwrap_or(field[0]);
        match row.get(header) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(self.conversion(row, field, "值为空")),
        }
    }

    fn string(&self, row: &RawRow, field: &'static [&'static str]) -> ImportResult<String> {
        self.raw(row, field).map(str::to_string)
    }

    fn id(&self, row: &RawRow, field: &'static [&'static str]) -> ImportResult<u64> {
        let value = self.raw(row, field)?;
        parse_id(value).ok_or_else(|| self.conversion(row, field, &format!("无法解析为整数编号: {}", value)))
    }

    fn number(&self, row: &RawRow, field: &'static [&'static str]) -> ImportResult<f64> {
        let value = self.raw(row, field)?;
        parse_number(value).ok_or_else(|| self.conversion(row, field, &format!("无法解析为数值: {}", value)))
    }

    fn conversion(&self, row: &RawRow, field: &'static [&'static str], message: &str) -> ImportError {
        ImportError::TypeConversionError {
            table: self.table.name.clone(),
            row: row.row_number,
            field: field[0].to_string(),
            message: message.to_string(),
        }
    }
}

/// 解析整数编号（接受 "1700106.0" 这类浮点写法）
pub fn parse_id(value: &str) -> Option<u64> {
    let value = value.trim();
    if let Ok(id) = value.parse::<u64>() {
        return Some(id);
    }
    let float = value.parse::<f64>().ok()?;
    (float.is_finite() && float >= 0.0 && float.fract() == 0.0 && float <= u64::MAX as f64)
        .then(|| float as u64)
}

/// 解析数值（允许千分位逗号）
pub fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ==========================================
// FieldMapper - 字段映射器
// ==========================================
pub struct FieldMapper;

impl FieldMapper {
    pub fn map_orders(&self, table: &RawTable) -> ImportResult<Vec<Order>> {
        let cols = ColumnMap::resolve(table, &[PRODUCT_ID, ORDER_ID, UNIT_QUANTITY, WEIGHT, DESTINATION_PORT])?;
        table
            .rows
            .iter()
            .map(|row| {
                Ok(Order::new(
                    cols.id(row, PRODUCT_ID)?,
                    cols.id(row, ORDER_ID)?,
                    cols.number(row, UNIT_QUANTITY)?,
                    cols.number(row, WEIGHT)?,
                    cols.string(row, DESTINATION_PORT)?,
                ))
            })
            .collect()
    }

    pub fn map_plants(&self, table: &RawTable) -> ImportResult<Vec<Plant>> {
        let cols = ColumnMap::resolve(table, &[PLANT_ID, CAPACITY, UNIT_COST])?;
        table
            .rows
            .iter()
            .map(|row| {
                Ok(Plant::new(
                    cols.string(row, PLANT_ID)?,
                    cols.number(row, CAPACITY)?,
                    cols.number(row, UNIT_COST)?,
                ))
            })
            .collect()
    }

    /// 工厂-产品准入: (工厂, 产品)
    pub fn map_plant_products(&self, table: &RawTable) -> ImportResult<Vec<(PlantId, ProductId)>> {
        let cols = ColumnMap::resolve(table, &[PRODUCT_ID, PLANT_ID])?;
        table
            .rows
            .iter()
            .map(|row| Ok((cols.string(row, PLANT_ID)?, cols.id(row, PRODUCT_ID)?)))
            .collect()
    }

    /// 工厂-港口: (工厂, 港口)
    pub fn map_plant_ports(&self, table: &RawTable) -> ImportResult<Vec<(PlantId, PortCode)>> {
        let cols = ColumnMap::resolve(table, &[PLANT_ID, PORT])?;
        table
            .rows
            .iter()
            .map(|row| Ok((cols.string(row, PLANT_ID)?, cols.string(row, PORT)?)))
            .collect()
    }

    /// 运价档（band_id = 数据行号）
    pub fn map_carrier_bands(&self, table: &RawTable) -> ImportResult<Vec<CarrierBand>> {
        let cols = ColumnMap::resolve(
            table,
            &[
                CARRIER,
                ORIGIN_PORT,
                MIN_WEIGHT,
                MAX_WEIGHT,
                SERVICE_CODE,
                MINIMUM_COST,
                RATE,
                CARRIER_TYPE,
                BAND_DESTINATION,
            ],
        )?;
        table
            .rows
            .iter()
            .map(|row| {
                Ok(CarrierBand {
                    band_id: row.row_number,
                    carrier_name: cols.string(row, CARRIER)?,
                    carrier_type: cols.string(row, CARRIER_TYPE)?,
                    origin_port: cols.string(row, ORIGIN_PORT)?,
                    destination_port: cols.string(row, BAND_DESTINATION)?,
                    min_weight: cols.number(row, MIN_WEIGHT)?,
                    max_weight: cols.number(row, MAX_WEIGHT)?,
                    minimum_cost: cols.number(row, MINIMUM_COST)?,
                    rate: cols.number(row, RATE)?,
                    service_code: cols.string(row, SERVICE_CODE)?,
                })
            })
            .collect()
    }
}
