// ==========================================
// 出港物流路线指派系统 - 需求汇总引擎
// ==========================================
// 职责: 原始订单行 → 按产品汇总的需求快照
// 输入: &[Order]（只读）
// 输出: DemandSnapshot（新建的不可变快照,不修改任何共享状态）
// ==========================================

use crate::domain::order::{DemandSnapshot, Order, ProductDemand};
use crate::domain::types::{DestinationPolicy, ProductId};
use crate::engine::error::{RoutingError, RoutingResult};
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

// ==========================================
// DemandAggregator - 需求汇总引擎
// ==========================================
pub struct DemandAggregator {
    destination_policy: DestinationPolicy,
}

impl DemandAggregator {
    pub fn new(destination_policy: DestinationPolicy) -> Self {
        Self { destination_policy }
    }

    /// 汇总订单
    ///
    /// 规则：
    /// 1) 同一 product_id 的 unit_quantity / weight 求和
    /// 2) order_count = 参与汇总的订单数
    /// 3) 目的港取首张订单；与后续订单不一致时按 destination_policy 处理
    #[instrument(skip(self, orders), fields(orders_count = orders.len(), policy = %self.destination_policy))]
    pub fn aggregate(&self, orders: &[Order]) -> RoutingResult<DemandSnapshot> {
        let mut groups: BTreeMap<ProductId, Vec<&Order>> = BTreeMap::new();
        for order in orders {
            groups.entry(order.product_id).or_default().push(order);
        }

        let mut snapshot = DemandSnapshot::new();
        for (product_id, group) in groups {
            let demand = self.summarize(product_id, &group)?;
            snapshot.insert(product_id, demand);
        }

        info!(products_count = snapshot.len(), "需求汇总完成");
        Ok(snapshot)
    }

    fn summarize(&self, product_id: ProductId, group: &[&Order]) -> RoutingResult<ProductDemand> {
        let first = group.first().ok_or_else(|| RoutingError::DataIntegrity {
            product_id,
            message: "产品没有任何订单".to_string(),
        })?;

        let mut total_unit_quantity = 0.0;
        let mut total_weight = 0.0;
        let mut conflict_reported = false;

        for order in group {
            total_unit_quantity += order.unit_quantity;
            total_weight += order.weight;

            if order.destination_port == first.destination_port {
                continue;
            }
            match self.destination_policy {
                DestinationPolicy::Strict => {
                    return Err(RoutingError::DataIntegrity {
                        product_id,
                        message: format!(
                            "目的港不一致: order_id={} 为 {}, order_id={} 为 {}",
                            first.order_id,
                            first.destination_port,
                            order.order_id,
                            order.destination_port
                        ),
                    });
                }
                DestinationPolicy::FirstSeen if !conflict_reported => {
                    warn!(
                        product_id,
                        kept = %first.destination_port,
                        ignored = %order.destination_port,
                        "目的港不一致,按首张订单处理"
                    );
                    conflict_reported = true;
                }
                DestinationPolicy::FirstSeen => {}
            }
        }

        Ok(ProductDemand {
            product_id,
            total_unit_quantity,
            total_weight,
            destination_port: first.destination_port.clone(),
            order_count: group.len() as u32,
        })
    }
}

impl Default for DemandAggregator {
    fn default() -> Self {
        Self::new(DestinationPolicy::default())
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn sample_orders() -> Vec<Order> {
        vec![
            Order::new(10, 1, 100.0, 2.5, "PORT09"),
            Order::new(20, 2, 40.0, 1.0, "PORT09"),
            Order::new(10, 3, 60.0, 1.5, "PORT09"),
            Order::new(10, 4, 5.0, 0.25, "PORT09"),
        ]
    }

    #[test]
    fn test_aggregate_sums_per_product() {
        let snapshot = DemandAggregator::default().aggregate(&sample_orders()).unwrap();

        assert_eq!(snapshot.len(), 2);
        let p10 = &snapshot[&10];
        assert_eq!(p10.order_count, 3);
        assert!((p10.total_unit_quantity - 165.0).abs() < 1e-9);
        assert!((p10.total_weight - 4.25).abs() < 1e-9);
        assert_eq!(p10.destination_port, "PORT09");

        let p20 = &snapshot[&20];
        assert_eq!(p20.order_count, 1);
        assert!((p20.total_weight - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_is_ordered_by_product() {
        let snapshot = DemandAggregator::default().aggregate(&sample_orders()).unwrap();
        let keys: Vec<ProductId> = snapshot.keys().copied().collect();
        assert_eq!(keys, vec![10, 20]);
    }

    #[test]
    fn test_empty_orders_gives_empty_snapshot() {
        let snapshot = DemandAggregator::default().aggregate(&[]).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_strict_policy_rejects_inconsistent_destination() {
        let mut orders = sample_orders();
        orders.push(Order::new(10, 5, 1.0, 0.1, "PORT02"));

        let err = DemandAggregator::new(DestinationPolicy::Strict)
            .aggregate(&orders)
            .unwrap_err();
        match err {
            RoutingError::DataIntegrity { product_id, message } => {
                assert_eq!(product_id, 10);
                assert!(message.contains("PORT02"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_first_seen_policy_keeps_first_destination() {
        let mut orders = vec![Order::new(10, 9, 1.0, 0.1, "PORT02")];
        orders.extend(sample_orders());

        let snapshot = DemandAggregator::new(DestinationPolicy::FirstSeen)
            .aggregate(&orders)
            .unwrap();
        assert_eq!(snapshot[&10].destination_port, "PORT02");
        assert_eq!(snapshot[&10].order_count, 4);
    }
}
