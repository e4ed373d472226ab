// ==========================================
// 出港物流路线指派系统 - 指派结果输出
// ==========================================
// 职责: 场景结果 → 按产品 / 按订单的路线明细表（CSV）
// 成本拆分:
//   工厂成本 = 工厂单件成本 × 产品件数
//   运输成本 = 运价档最低收费 + 运费系数 × 运价 × 产品重量
// ==========================================

use crate::domain::order::Order;
use crate::domain::route::Assignment;
use crate::engine::network_index::RoutingIndex;
use crate::engine::orchestrator::ScenarioResult;
use crate::report::error::{ReportError, ReportResult};
use serde::Serialize;
use std::io::Write;

/// 按产品的路线明细
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRouteRow {
    #[serde(rename = "Product ID")]
    pub product_id: u64,
    #[serde(rename = "Plant code")]
    pub plant_id: String,
    #[serde(rename = "Origin port")]
    pub origin_port: String,
    #[serde(rename = "Band ID")]
    pub band_id: usize,
    #[serde(rename = "Carrier")]
    pub carrier: String,
    #[serde(rename = "Orders")]
    pub order_count: u32,
    #[serde(rename = "Plant cost for product group")]
    pub plant_cost: f64,
    #[serde(rename = "Transportation cost for product group")]
    pub transport_cost: f64,
    #[serde(rename = "Total cost")]
    pub total_cost: f64,
    #[serde(rename = "Source")]
    pub source: String,
}

/// 按订单的路线明细（同一产品的订单共享产品级成本）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRouteRow {
    #[serde(rename = "Product ID")]
    pub product_id: u64,
    #[serde(rename = "Order ID")]
    pub order_id: u64,
    #[serde(rename = "Unit quantity")]
    pub unit_quantity: f64,
    #[serde(rename = "Weight")]
    pub weight: f64,
    #[serde(rename = "Destination port")]
    pub destination_port: String,
    #[serde(rename = "Plant code")]
    pub plant_id: String,
    #[serde(rename = "Origin port")]
    pub origin_port: String,
    #[serde(rename = "Carrier")]
    pub carrier: String,
    #[serde(rename = "minm_wgh_qty")]
    pub min_weight: f64,
    #[serde(rename = "max_wgh_qty")]
    pub max_weight: f64,
    #[serde(rename = "Service level")]
    pub service_code: String,
    #[serde(rename = "Plant cost for product group")]
    pub plant_cost: f64,
    #[serde(rename = "Transportation cost for product group")]
    pub transport_cost: f64,
}

pub struct SolutionWriter<'a> {
    index: &'a RoutingIndex,
}

impl<'a> SolutionWriter<'a> {
    pub fn new(index: &'a RoutingIndex) -> Self {
        Self { index }
    }

    pub fn product_rows(&self, result: &ScenarioResult) -> ReportResult<Vec<ProductRouteRow>> {
        result
            .assignments
            .values()
            .map(|assignment| {
                let (plant_cost, transport_cost) = self.split_cost(assignment)?;
                let band = self.band(assignment)?;
                Ok(ProductRouteRow {
                    product_id: assignment.product_id,
                    plant_id: assignment.candidate.plant_id.clone(),
                    origin_port: assignment.candidate.port.clone(),
                    band_id: assignment.candidate.band_id,
                    carrier: band.carrier_name.clone(),
                    order_count: assignment.candidate.order_count,
                    plant_cost,
                    transport_cost,
                    total_cost: assignment.cost,
                    source: assignment.source.to_string(),
                })
            })
            .collect()
    }

    /// 订单明细（未指派产品的订单不输出）
    pub fn order_rows(&self, orders: &[Order], result: &ScenarioResult) -> ReportResult<Vec<OrderRouteRow>> {
        let mut rows = Vec::with_capacity(orders.len());
        for order in orders {
            let Some(assignment) = result.assignments.get(&order.product_id) else {
                continue;
            };
            let (plant_cost, transport_cost) = self.split_cost(assignment)?;
            let band = self.band(assignment)?;
            rows.push(OrderRouteRow {
                product_id: order.product_id,
                order_id: order.order_id,
                unit_quantity: order.unit_quantity,
                weight: order.weight,
                destination_port: order.destination_port.clone(),
                plant_id: assignment.candidate.plant_id.clone(),
                origin_port: assignment.candidate.port.clone(),
                carrier: band.carrier_name.clone(),
                min_weight: band.min_weight,
                max_weight: band.max_weight,
                service_code: band.service_code.clone(),
                plant_cost,
                transport_cost,
            });
        }
        Ok(rows)
    }

    pub fn write_products_csv<W: Write>(&self, result: &ScenarioResult, writer: W) -> ReportResult<()> {
        write_csv(writer, &self.product_rows(result)?)
    }

    pub fn write_orders_csv<W: Write>(&self, orders: &[Order], result: &ScenarioResult, writer: W) -> ReportResult<()> {
        write_csv(writer, &self.order_rows(orders, result)?)
    }

    fn band(&self, assignment: &Assignment) -> ReportResult<&'a crate::domain::network::CarrierBand> {
        self.index
            .band(assignment.candidate.band_id)
            .ok_or(ReportError::UnknownBand(assignment.candidate.band_id))
    }

    /// (工厂成本, 运输成本)
    fn split_cost(&self, assignment: &Assignment) -> ReportResult<(f64, f64)> {
        let band = self.band(assignment)?;
        if self.index.plant(assignment.plant_id()).is_none() {
            return Err(ReportError::UnknownPlant(assignment.candidate.plant_id.clone()));
        }
        let plant_cost = assignment.candidate.fixed_cost - band.minimum_cost;
        Ok((plant_cost, assignment.cost - plant_cost))
    }
}

pub(crate) fn write_csv<W: Write, T: Serialize>(writer: W, rows: &[T]) -> ReportResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
