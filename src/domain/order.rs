// ==========================================
// 出港物流路线指派系统 - 订单与产品需求
// ==========================================
// Order: 不可变输入行
// ProductDemand: 按 product_id 汇总后的需求快照
// ==========================================

use crate::domain::types::{OrderId, PortCode, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// Order - 原始订单行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub product_id: ProductId,
    pub order_id: OrderId,
    pub unit_quantity: f64,       // 件数
    pub weight: f64,              // 重量
    pub destination_port: PortCode,
}

impl Order {
    pub fn new(
        product_id: ProductId,
        order_id: OrderId,
        unit_quantity: f64,
        weight: f64,
        destination_port: impl Into<PortCode>,
    ) -> Self {
        Self {
            product_id,
            order_id,
            unit_quantity,
            weight,
            destination_port: destination_port.into(),
        }
    }
}

// ==========================================
// ProductDemand - 产品需求
// ==========================================
// 不变量: 同一产品所有订单目的港一致（由 DemandAggregator 校验）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDemand {
    pub product_id: ProductId,
    pub total_unit_quantity: f64,
    pub total_weight: f64,
    pub destination_port: PortCode,
    pub order_count: u32,
}

/// 需求快照（按 product_id 有序）
///
/// 每次场景运行重新生成，生成后只读。
pub type DemandSnapshot = BTreeMap<ProductId, ProductDemand>;
