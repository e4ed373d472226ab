// ==========================================
// 出港物流路线指派系统 - 数据质量校验器
// ==========================================
// 职责: 对已映射的强类型记录做取值校验,生成 DQ 报告
// 级别: ERROR 阻断导入 / WARNING 仅记录
// ==========================================

use crate::domain::network::{CarrierBand, Plant, ReferenceData};
use crate::domain::order::Order;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Error,
    Warning,
}

/// 单条 DQ 问题
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DqViolation {
    pub table: &'static str,
    /// 记录序号（从 1 开始）
    pub row_number: usize,
    pub level: DqLevel,
    pub field: String,
    pub message: String,
}

impl fmt::Display for DqViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} 第 {} 行 {}: {}",
            match self.level {
                DqLevel::Error => "ERROR",
                DqLevel::Warning => "WARNING",
            },
            self.table,
            self.row_number,
            self.field,
            self.message
        )
    }
}

/// DQ 报告
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DqReport {
    pub violations: Vec<DqViolation>,
}

impl DqReport {
    pub fn errors(&self) -> impl Iterator<Item = &DqViolation> {
        self.violations.iter().filter(|v| v.level == DqLevel::Error)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.violations.len() - self.error_count()
    }
}

pub struct DqValidator;

impl DqValidator {
    /// 校验全部输入
    pub fn validate(&self, orders: &[Order], reference: &ReferenceData) -> DqReport {
        let mut report = DqReport::default();
        self.validate_orders(orders, &mut report.violations);
        self.validate_plants(&reference.plants, &mut report.violations);
        self.validate_bands(&reference.carrier_bands, &mut report.violations);
        report
    }

    fn validate_orders(&self, orders: &[Order], out: &mut Vec<DqViolation>) {
        let mut seen = HashSet::new();
        for (idx, order) in orders.iter().enumerate() {
            let row_number = idx + 1;
            non_negative(out, "Orders", row_number, "Unit quantity", order.unit_quantity);
            non_negative(out, "Orders", row_number, "Weight", order.weight);
            if !seen.insert(order.order_id) {
                out.push(DqViolation {
                    table: "Orders",
                    row_number,
                    level: DqLevel::Warning,
                    field: "Order ID".to_string(),
                    message: format!("订单号重复: {}", order.order_id),
                });
            }
        }
    }

    fn validate_plants(&self, plants: &[Plant], out: &mut Vec<DqViolation>) {
        for (idx, plant) in plants.iter().enumerate() {
            let row_number = idx + 1;
            non_negative(out, "Plants", row_number, "Daily Capacity", plant.capacity);
            non_negative(out, "Plants", row_number, "Cost/unit", plant.unit_handling_cost);
        }
    }

    fn validate_bands(&self, bands: &[CarrierBand], out: &mut Vec<DqViolation>) {
        for band in bands {
            let row_number = band.band_id;
            non_negative(out, "FreightRates", row_number, "minm_wgh_qty", band.min_weight);
            non_negative(out, "FreightRates", row_number, "max_wgh_qty", band.max_weight);
            non_negative(out, "FreightRates", row_number, "minimum cost", band.minimum_cost);
            non_negative(out, "FreightRates", row_number, "rate", band.rate);
            if band.min_weight > band.max_weight {
                out.push(DqViolation {
                    table: "FreightRates",
                    row_number,
                    level: DqLevel::Error,
                    field: "minm_wgh_qty,max_wgh_qty".to_string(),
                    message: format!("最小重量 {} 大于最大重量 {}", band.min_weight, band.max_weight),
                });
            }
        }
    }
}

fn non_negative(out: &mut Vec<DqViolation>, table: &'static str, row_number: usize, field: &str, value: f64) {
    if value < 0.0 {
        out.push(DqViolation {
            table,
            row_number,
            level: DqLevel::Error,
            field: field.to_string(),
            message: format!("取值为负: {}", value),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(id: usize, min: f64, max: f64, rate: f64) -> CarrierBand {
        CarrierBand {
            band_id: id,
            carrier_name: "V444_6".to_string(),
            carrier_type: "V88888888_0".to_string(),
            origin_port: "PORT08".to_string(),
            destination_port: "PORT09".to_string(),
            min_weight: min,
            max_weight: max,
            minimum_cost: 1.0,
            rate,
            service_code: "DTD".to_string(),
        }
    }

    #[test]
    fn test_clean_input_has_no_errors() {
        let orders = vec![Order::new(1, 10, 5.0, 1.0, "PORT09")];
        let reference = ReferenceData {
            plants: vec![Plant::new("PLANT01", 0.0, 0.5)],
            carrier_bands: vec![band(1, 0.0, 10.0, 0.7)],
            ..Default::default()
        };
        let report = DqValidator.validate(&orders, &reference);
        assert_eq!(report.error_count(), 0);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn test_negative_values_and_inverted_band() {
        let orders = vec![
            Order::new(1, 10, 5.0, -1.0, "PORT09"),
            Order::new(1, 10, 5.0, 1.0, "PORT09"),
        ];
        let reference = ReferenceData {
            plants: vec![Plant::new("PLANT01", -3.0, 0.5)],
            carrier_bands: vec![band(7, 20.0, 10.0, 0.7)],
            ..Default::default()
        };
        let report = DqValidator.validate(&orders, &reference);

        assert_eq!(report.error_count(), 3);
        assert_eq!(report.warning_count(), 1);
        let inverted = report
            .errors()
            .find(|v| v.table == "FreightRates")
            .unwrap();
        assert_eq!(inverted.row_number, 7);
        assert!(inverted.to_string().starts_with("[ERROR] FreightRates 第 7 行"));
    }
}
