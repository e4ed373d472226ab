// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================
// 订单 + 参考数据的链式构建,运价档 ID 按添加顺序从 1 编号
// ==========================================

use outbound_routing::domain::network::{CarrierBand, Plant, ReferenceData};
use outbound_routing::domain::order::Order;
use outbound_routing::engine::RoutingIndex;

// ==========================================
// NetworkBuilder - 路网与订单构建器
// ==========================================

#[derive(Default)]
pub struct NetworkBuilder {
    orders: Vec<Order>,
    reference: ReferenceData,
    next_order_id: u64,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self {
            next_order_id: 1000,
            ..Default::default()
        }
    }

    pub fn plant(mut self, plant_id: &str, capacity: f64, unit_cost: f64) -> Self {
        self.reference.plants.push(Plant::new(plant_id, capacity, unit_cost));
        self
    }

    /// 工厂可生产该产品
    pub fn eligible(mut self, plant_id: &str, product_id: u64) -> Self {
        self.reference.plant_products.push((plant_id.to_string(), product_id));
        self
    }

    /// 工厂可从该港口发运
    pub fn port(mut self, plant_id: &str, port: &str) -> Self {
        self.reference.plant_ports.push((plant_id.to_string(), port.to_string()));
        self
    }

    /// 运价档（承运商名称按序号生成,重量下限为 0）
    pub fn band(mut self, origin: &str, destination: &str, max_weight: f64, minimum_cost: f64, rate: f64) -> Self {
        let band_id = self.reference.carrier_bands.len() + 1;
        self.reference.carrier_bands.push(CarrierBand {
            band_id,
            carrier_name: format!("V444_{}", band_id),
            carrier_type: "V88888888_0".to_string(),
            origin_port: origin.to_string(),
            destination_port: destination.to_string(),
            min_weight: 0.0,
            max_weight,
            minimum_cost,
            rate,
            service_code: "DTD".to_string(),
        });
        self
    }

    pub fn order(mut self, product_id: u64, unit_quantity: f64, weight: f64, destination: &str) -> Self {
        self.next_order_id += 1;
        self.orders.push(Order::new(
            product_id,
            self.next_order_id,
            unit_quantity,
            weight,
            destination,
        ));
        self
    }

    /// 同一产品追加 count 张订单（每张件数 1、重量 1）
    pub fn orders(mut self, product_id: u64, count: usize, destination: &str) -> Self {
        for _ in 0..count {
            self = self.order(product_id, 1.0, 1.0, destination);
        }
        self
    }

    pub fn build(self) -> (Vec<Order>, ReferenceData) {
        (self.orders, self.reference)
    }

    pub fn build_indexed(self) -> (Vec<Order>, RoutingIndex) {
        let (orders, reference) = self.build();
        let index = RoutingIndex::build(&reference, false);
        (orders, index)
    }
}

// ==========================================
// 预置场景
// ==========================================

/// 三产品网络
///
/// - 产品 1: 仅 PLANT01 可产,唯一候选 fixed=500, variable=0
/// - 产品 2: PLANT02 成本 30 / PLANT03 成本 33
/// - 产品 3: PLANT02 成本 56 / PLANT03 成本 24
pub fn three_product_network() -> NetworkBuilder {
    NetworkBuilder::new()
        .plant("PLANT01", 100.0, 0.0)
        .plant("PLANT02", 100.0, 1.0)
        .plant("PLANT03", 100.0, 2.0)
        .eligible("PLANT01", 1)
        .eligible("PLANT02", 2)
        .eligible("PLANT03", 2)
        .eligible("PLANT02", 3)
        .eligible("PLANT03", 3)
        .port("PLANT01", "PORT01")
        .port("PLANT02", "PORT02")
        .port("PLANT03", "PORT03")
        .band("PORT01", "DEST01", 1000.0, 500.0, 0.0)
        .band("PORT02", "DEST02", 100.0, 10.0, 2.0)
        .band("PORT03", "DEST02", 100.0, 8.0, 1.0)
        .band("PORT02", "DEST03", 100.0, 50.0, 1.0)
        .band("PORT03", "DEST03", 100.0, 10.0, 3.0)
        .order(1, 3.0, 40.0, "DEST01")
        .order(2, 6.0, 2.0, "DEST02")
        .order(2, 4.0, 3.0, "DEST02")
        .order(3, 4.0, 2.0, "DEST03")
}

/// 两个各 6 单的产品共用产能 10 的 PLANT01
///
/// with_alternate 为 true 时产品 2 另可由 PLANT02（更贵）生产
pub fn shared_capacity_network(with_alternate: bool) -> NetworkBuilder {
    let mut builder = NetworkBuilder::new()
        .plant("PLANT01", 10.0, 1.0)
        .plant("PLANT02", 10.0, 5.0)
        .eligible("PLANT01", 1)
        .eligible("PLANT01", 2)
        .port("PLANT01", "PORT01")
        .port("PLANT02", "PORT02")
        .band("PORT01", "DEST01", 100.0, 10.0, 1.0)
        .band("PORT02", "DEST01", 100.0, 10.0, 1.0)
        .orders(1, 6, "DEST01")
        .orders(2, 6, "DEST01");
    if with_alternate {
        builder = builder.eligible("PLANT02", 2);
    }
    builder
}

/// 产能随系数变化的网络: PLANT01 便宜但产能 10,PLANT02 贵且产能充足
pub fn capacity_sensitive_network() -> NetworkBuilder {
    NetworkBuilder::new()
        .plant("PLANT01", 10.0, 1.0)
        .plant("PLANT02", 100.0, 3.0)
        .eligible("PLANT01", 1)
        .eligible("PLANT02", 1)
        .eligible("PLANT01", 2)
        .eligible("PLANT02", 2)
        .port("PLANT01", "PORT01")
        .port("PLANT02", "PORT02")
        .band("PORT01", "DEST01", 100.0, 10.0, 1.0)
        .band("PORT02", "DEST01", 100.0, 10.0, 1.0)
        .orders(1, 6, "DEST01")
        .orders(2, 6, "DEST01")
}
