// ==========================================
// 出港物流路线指派系统 - 路由索引
// ==========================================
// 职责: 把参考数据表整理为只读索引,避免候选生成时反复线性扫描
// 结构: 数据区（plants / bands 原样保存）+ 有序索引（按编号/港口键）
// 红线: 构建后只读;所有场景共享同一份索引
// ==========================================

use crate::domain::network::{CarrierBand, Plant, ReferenceData};
use crate::domain::types::{BandId, PlantId, PortCode, ProductId};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument, warn};

// ==========================================
// RoutingIndex - 路由索引
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RoutingIndex {
    plants: Vec<Plant>,
    bands: Vec<CarrierBand>,

    plant_by_id: BTreeMap<PlantId, usize>,
    band_by_id: BTreeMap<BandId, usize>,
    /// 工厂 → 准入产品
    plant_products: BTreeMap<PlantId, BTreeSet<ProductId>>,
    /// 产品 → 准入工厂（候选生成的查询方向）
    product_plants: BTreeMap<ProductId, BTreeSet<PlantId>>,
    /// 工厂 → 起运港
    plant_ports: BTreeMap<PlantId, BTreeSet<PortCode>>,
    /// 起运港 → 目的港 → 运价档（按 band_id 升序）
    lanes: BTreeMap<PortCode, BTreeMap<PortCode, Vec<usize>>>,

    consolidated_bands: usize,
}

impl RoutingIndex {
    /// 构建索引
    ///
    /// # 参数
    /// - reference: 参考数据快照
    /// - consolidate_duplicate_bands: 是否合并重复运价档
    #[instrument(skip(reference), fields(
        plants = reference.plants.len(),
        bands = reference.carrier_bands.len()
    ))]
    pub fn build(reference: &ReferenceData, consolidate_duplicate_bands: bool) -> Self {
        let mut index = RoutingIndex::default();

        for plant in &reference.plants {
            if index.plant_by_id.contains_key(&plant.plant_id) {
                warn!(plant_id = %plant.plant_id, "工厂重复出现,保留首行");
                continue;
            }
            index
                .plant_by_id
                .insert(plant.plant_id.clone(), index.plants.len());
            index.plants.push(plant.clone());
        }

        for (plant_id, product_id) in &reference.plant_products {
            if !index.plant_by_id.contains_key(plant_id) {
                debug!(plant_id = %plant_id, product_id, "准入关系引用未知工厂,忽略");
                continue;
            }
            index
                .plant_products
                .entry(plant_id.clone())
                .or_default()
                .insert(*product_id);
            index
                .product_plants
                .entry(*product_id)
                .or_default()
                .insert(plant_id.clone());
        }

        for (plant_id, port) in &reference.plant_ports {
            index
                .plant_ports
                .entry(plant_id.clone())
                .or_default()
                .insert(port.clone());
        }

        let bands = if consolidate_duplicate_bands {
            consolidate_bands(&reference.carrier_bands)
        } else {
            reference.carrier_bands.clone()
        };
        index.consolidated_bands = reference.carrier_bands.len() - bands.len();

        for band in bands {
            let slot = index.bands.len();
            index.band_by_id.insert(band.band_id, slot);
            index
                .lanes
                .entry(band.origin_port.clone())
                .or_default()
                .entry(band.destination_port.clone())
                .or_default()
                .push(slot);
            index.bands.push(band);
        }

        let bands = &index.bands;
        for destinations in index.lanes.values_mut() {
            for slots in destinations.values_mut() {
                slots.sort_by_key(|&slot| bands[slot].band_id);
            }
        }

        info!(
            plants = index.plants.len(),
            bands = index.bands.len(),
            lanes = index.lane_count(),
            consolidated = index.consolidated_bands,
            "路由索引构建完成"
        );
        index
    }

    pub fn plant(&self, plant_id: &str) -> Option<&Plant> {
        self.plant_by_id.get(plant_id).map(|&i| &self.plants[i])
    }

    pub fn band(&self, band_id: BandId) -> Option<&CarrierBand> {
        self.band_by_id.get(&band_id).map(|&i| &self.bands[i])
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    /// 产品的准入工厂（按工厂代码升序）
    pub fn plants_for(&self, product_id: ProductId) -> impl Iterator<Item = &Plant> + '_ {
        self.product_plants
            .get(&product_id)
            .into_iter()
            .flatten()
            .filter_map(move |plant_id| self.plant(plant_id))
    }

    /// 工厂的准入产品
    pub fn products_of(&self, plant_id: &str) -> impl Iterator<Item = ProductId> + '_ {
        self.plant_products
            .get(plant_id)
            .into_iter()
            .flatten()
            .copied()
    }

    /// 工厂可用的起运港（按港口代码升序）
    pub fn ports_for(&self, plant_id: &str) -> impl Iterator<Item = &str> + '_ {
        self.plant_ports
            .get(plant_id)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// 某条线路上的运价档（按 band_id 升序）
    pub fn bands_on(&self, origin: &str, destination: &str) -> impl Iterator<Item = &CarrierBand> + '_ {
        self.lanes
            .get(origin)
            .and_then(|destinations| destinations.get(destination))
            .into_iter()
            .flatten()
            .map(move |&slot| &self.bands[slot])
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.values().map(BTreeMap::len).sum()
    }

    /// 被合并掉的重复运价档数量
    pub fn consolidated_bands(&self) -> usize {
        self.consolidated_bands
    }
}

// ==========================================
// 重复运价档合并
// ==========================================
// 同一 (承运商, 起运港, 目的港, 最小重量, 最大重量) 只保留满载成本最低的一档
// 满载成本相同时保留 band_id 较小者
fn consolidate_bands(bands: &[CarrierBand]) -> Vec<CarrierBand> {
    let mut best: BTreeMap<(&str, &str, &str, u64, u64), &CarrierBand> = BTreeMap::new();

    for band in bands {
        let key = (
            band.carrier_name.as_str(),
            band.origin_port.as_str(),
            band.destination_port.as_str(),
            band.min_weight.to_bits(),
            band.max_weight.to_bits(),
        );
        let replace = best.get(&key).map_or(true, |kept| replaces(band, kept));
        if replace {
            best.insert(key, band);
        }
    }

    let mut kept: Vec<CarrierBand> = best.into_values().cloned().collect();
    kept.sort_by_key(|band| band.band_id);
    kept
}

fn replaces(candidate: &CarrierBand, kept: &CarrierBand) -> bool {
    let (a, b) = (candidate.full_load_cost(), kept.full_load_cost());
    a < b || (a == b && candidate.band_id < kept.band_id)
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn band(id: BandId, carrier: &str, origin: &str, dest: &str, max: f64, min_cost: f64, rate: f64) -> CarrierBand {
        CarrierBand {
            band_id: id,
            carrier_name: carrier.to_string(),
            carrier_type: "V88888888_0".to_string(),
            origin_port: origin.to_string(),
            destination_port: dest.to_string(),
            min_weight: 0.0,
            max_weight: max,
            minimum_cost: min_cost,
            rate,
            service_code: "DTD".to_string(),
        }
    }

    fn reference() -> ReferenceData {
        ReferenceData {
            plants: vec![
                Plant::new("PLANT02", 100.0, 0.5),
                Plant::new("PLANT01", 50.0, 1.0),
            ],
            plant_products: vec![
                ("PLANT02".to_string(), 7),
                ("PLANT01".to_string(), 7),
                ("PLANT01".to_string(), 7),
                ("PLANT99".to_string(), 7),
            ],
            plant_ports: vec![
                ("PLANT01".to_string(), "PORT04".to_string()),
                ("PLANT01".to_string(), "PORT02".to_string()),
            ],
            carrier_bands: vec![
                band(1, "V444_6", "PORT04", "PORT09", 10.0, 20.0, 1.0),
                band(2, "V444_6", "PORT04", "PORT09", 10.0, 15.0, 1.0),
                band(3, "V444_1", "PORT02", "PORT09", 99.0, 30.0, 0.2),
            ],
        }
    }

    #[test]
    fn test_lookup_is_sorted_and_deduplicated() {
        let index = RoutingIndex::build(&reference(), false);

        let plants: Vec<&str> = index.plants_for(7).map(|p| p.plant_id.as_str()).collect();
        assert_eq!(plants, vec!["PLANT01", "PLANT02"]);

        let ports: Vec<&str> = index.ports_for("PLANT01").collect();
        assert_eq!(ports, vec!["PORT02", "PORT04"]);
        assert_eq!(index.ports_for("PLANT02").count(), 0);

        let products: Vec<ProductId> = index.products_of("PLANT01").collect();
        assert_eq!(products, vec![7]);
    }

    #[test]
    fn test_lanes_keyed_by_origin_and_destination() {
        let index = RoutingIndex::build(&reference(), false);

        let ids: Vec<BandId> = index.bands_on("PORT04", "PORT09").map(|b| b.band_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(index.bands_on("PORT09", "PORT04").count(), 0);
        assert_eq!(index.lane_count(), 2);
        assert_eq!(index.band(3).map(|b| b.carrier_name.as_str()), Some("V444_1"));
    }

    #[test]
    fn test_consolidation_keeps_cheapest_duplicate() {
        let index = RoutingIndex::build(&reference(), true);

        let ids: Vec<BandId> = index.bands_on("PORT04", "PORT09").map(|b| b.band_id).collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(index.consolidated_bands(), 1);
        assert!(index.band(1).is_none());
    }

    #[test]
    fn test_consolidation_tie_keeps_lower_band_id() {
        let mut data = reference();
        data.carrier_bands[1].minimum_cost = 20.0;
        let index = RoutingIndex::build(&data, true);

        let ids: Vec<BandId> = index.bands_on("PORT04", "PORT09").map(|b| b.band_id).collect();
        assert_eq!(ids, vec![1]);
    }
}
