// ==========================================
// 出港物流路线指派系统 - 网络参考数据
// ==========================================
// 工厂 / 工厂-产品准入 / 工厂-港口 / 承运商运价档
// 红线: 单次运行内只读，场景之间共享同一份快照
// ==========================================

use crate::domain::types::{BandId, PlantId, PortCode, ProductId};
use serde::{Deserialize, Serialize};

// ==========================================
// Plant - 工厂
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub plant_id: PlantId,
    pub capacity: f64,          // 日产能（按订单数口径）
    pub unit_handling_cost: f64, // 单件处理成本
}

impl Plant {
    pub fn new(plant_id: impl Into<PlantId>, capacity: f64, unit_handling_cost: f64) -> Self {
        Self {
            plant_id: plant_id.into(),
            capacity,
            unit_handling_cost,
        }
    }

    /// 按产能系数缩放后的订单上限
    pub fn scaled_capacity(&self, capacity_factor: f64) -> f64 {
        capacity_factor * self.capacity
    }
}

// ==========================================
// CarrierBand - 承运商运价档
// ==========================================
// 一条起运港→目的港线路上的一个重量区间
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierBand {
    pub band_id: BandId,
    pub carrier_name: String,
    pub carrier_type: String,
    pub origin_port: PortCode,
    pub destination_port: PortCode,
    pub min_weight: f64,
    pub max_weight: f64,
    pub minimum_cost: f64,
    pub rate: f64,              // 单位重量运价
    pub service_code: String,
}

impl CarrierBand {
    /// 重量是否在运价档承载上限内
    pub fn accepts_weight(&self, weight: f64) -> bool {
        weight <= self.max_weight
    }

    /// 按满载重量估算的档位成本（用于重复运价档去重比较）
    pub fn full_load_cost(&self) -> f64 {
        self.minimum_cost + self.rate * self.max_weight
    }
}

// ==========================================
// ReferenceData - 参考数据快照
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub plants: Vec<Plant>,
    /// (工厂, 产品) 准入关系
    pub plant_products: Vec<(PlantId, ProductId)>,
    /// (工厂, 起运港) 关系
    pub plant_ports: Vec<(PlantId, PortCode)>,
    pub carrier_bands: Vec<CarrierBand>,
}
