// ==========================================
// 路线指派全流程集成测试
// ==========================================
// 场景: 需求汇总 → 候选生成 → 快速通道 → 建模 → HiGHS 求解
// ==========================================

mod helpers;

use helpers::test_data_builder::{
    capacity_sensitive_network, shared_capacity_network, three_product_network, NetworkBuilder,
};
use outbound_routing::domain::types::{AssignmentSource, SolveStatus, UnreachablePolicy};
use outbound_routing::engine::candidate::{compute_costs, is_feasible};
use outbound_routing::engine::{
    CandidateGenerator, DemandAggregator, HighsSolver, OrchestratorOptions, RouteOrchestrator,
    RoutingError, ScenarioResult, ScenarioSpec,
};
use outbound_routing::domain::types::DestinationPolicy;
use std::collections::{BTreeMap, BTreeSet};

fn orchestrator(options: OrchestratorOptions) -> RouteOrchestrator<HighsSolver> {
    RouteOrchestrator::new(options, HighsSolver::new())
}

fn default_orchestrator() -> RouteOrchestrator<HighsSolver> {
    orchestrator(OrchestratorOptions::default())
}

fn plant_loads(result: &ScenarioResult) -> BTreeMap<String, u32> {
    let mut loads = BTreeMap::new();
    for assignment in result.assignments.values() {
        *loads.entry(assignment.candidate.plant_id.clone()).or_insert(0) += assignment.candidate.order_count;
    }
    loads
}

// ==========================================
// 候选生成
// ==========================================

#[test]
fn test_candidate_membership_matches_feasibility_predicate() {
    // 混合网络: 重量超限档、目的港不匹配档、不可达港口
    let (orders, reference) = three_product_network()
        .band("PORT02", "DEST02", 4.0, 1.0, 0.1)
        .band("PORT09", "DEST02", 100.0, 1.0, 0.1)
        .port("PLANT03", "PORT02")
        .build();
    let index = outbound_routing::engine::RoutingIndex::build(&reference, false);
    let demand = DemandAggregator::new(DestinationPolicy::Strict)
        .aggregate(&orders)
        .unwrap();

    let generated: BTreeSet<(u64, String, String, usize)> = CandidateGenerator::new()
        .generate(&demand, &index)
        .candidates
        .into_iter()
        .map(|c| (c.product_id, c.plant_id, c.port, c.band_id))
        .collect();

    // 穷举全部组合并逐一套用可行性判定
    let mut expected = BTreeSet::new();
    for (product_id, product) in &demand {
        for (plant_id, eligible_product) in &reference.plant_products {
            if eligible_product != product_id {
                continue;
            }
            for (port_plant, port) in &reference.plant_ports {
                if port_plant != plant_id {
                    continue;
                }
                for band in &reference.carrier_bands {
                    if is_feasible(product, port, band) {
                        expected.insert((*product_id, plant_id.clone(), port.clone(), band.band_id));
                    }
                }
            }
        }
    }

    assert_eq!(generated, expected);
    // 重量 5 > 4 的档位不应出现
    assert!(!generated.iter().any(|(_, _, _, band)| *band == 6));
    assert!(!generated.iter().any(|(_, _, _, band)| *band == 7));
    // PLANT03 经 PORT02 的新组合应出现
    assert!(generated.contains(&(2, "PLANT03".to_string(), "PORT02".to_string(), 2)));
}

#[test]
fn test_candidate_costs_are_pure() {
    let (orders, reference) = three_product_network().build();
    let demand = DemandAggregator::new(DestinationPolicy::Strict)
        .aggregate(&orders)
        .unwrap();
    let product = &demand[&2];
    let plant = &reference.plants[1];
    let band = &reference.carrier_bands[1];

    let first = compute_costs(product, plant, band);
    let second = compute_costs(product, plant, band);
    assert_eq!(first, second);
    assert_eq!(first, (20.0, 10.0));
}

// ==========================================
// 单场景求解
// ==========================================

#[test]
fn test_three_product_baseline() {
    let (orders, index) = three_product_network().build_indexed();
    let result = default_orchestrator()
        .run_scenario(&orders, &index, &ScenarioSpec::baseline())
        .unwrap();

    assert_eq!(result.status, SolveStatus::Optimal);
    assert_eq!(result.products_assigned(), 3);

    let a = &result.assignments[&1];
    assert_eq!(a.candidate.plant_id, "PLANT01");
    assert_eq!(a.cost, 500.0);
    assert_eq!(a.source, AssignmentSource::FastPath);

    assert_eq!(result.assignments[&2].candidate.plant_id, "PLANT02");
    assert_eq!(result.assignments[&3].candidate.plant_id, "PLANT03");
    // 500 + 30 + 24
    assert!((result.total_cost - 554.0).abs() < 1e-9);
}

#[test]
fn test_three_product_without_fast_path_gives_same_routes() {
    let (orders, index) = three_product_network().build_indexed();
    let options = OrchestratorOptions {
        fast_path_enabled: false,
        ..OrchestratorOptions::default()
    };
    let result = orchestrator(options)
        .run_scenario(&orders, &index, &ScenarioSpec::baseline())
        .unwrap();

    assert_eq!(result.fast_path_resolved, 0);
    assert_eq!(result.model_stats.assignment_constraints, 3);
    assert_eq!(result.assignments[&1].source, AssignmentSource::Solver);
    assert!((result.total_cost - 554.0).abs() < 1e-9);
}

#[test]
fn test_freight_factor_scales_variable_cost_only() {
    let (orders, index) = three_product_network().build_indexed();
    let result = default_orchestrator()
        .run_scenario(&orders, &index, &ScenarioSpec::new("Freight +10%", 1.0, 1.1))
        .unwrap();

    // 500 + (20 + 1.1×10) + (18 + 1.1×6)
    assert!((result.total_cost - 555.6).abs() < 1e-9);
}

#[test]
fn test_shared_capacity_is_infeasible() {
    let (orders, index) = shared_capacity_network(false).build_indexed();
    let err = default_orchestrator()
        .run_scenario(&orders, &index, &ScenarioSpec::baseline())
        .unwrap_err();

    match err {
        RoutingError::InfeasibleModel {
            scenario,
            capacity_factor,
            freight_factor,
            ..
        } => {
            assert_eq!(scenario, "Baseline");
            assert_eq!(capacity_factor, 1.0);
            assert_eq!(freight_factor, 1.0);
        }
        other => panic!("期望 InfeasibleModel, 实际 {:?}", other),
    }
}

#[test]
fn test_shared_capacity_is_infeasible_in_solver() {
    let (orders, index) = shared_capacity_network(false).build_indexed();
    let options = OrchestratorOptions {
        fast_path_enabled: false,
        ..OrchestratorOptions::default()
    };
    let err = orchestrator(options)
        .run_scenario(&orders, &index, &ScenarioSpec::baseline())
        .unwrap_err();
    assert!(err.is_infeasible());
}

#[test]
fn test_shared_capacity_with_alternate_route() {
    let (orders, index) = shared_capacity_network(true).build_indexed();
    let result = default_orchestrator()
        .run_scenario(&orders, &index, &ScenarioSpec::baseline())
        .unwrap();

    assert_eq!(result.assignments[&1].candidate.plant_id, "PLANT01");
    assert_eq!(result.assignments[&2].candidate.plant_id, "PLANT02");
    // 22 + 46
    assert!((result.total_cost - 68.0).abs() < 1e-9);
    assert_eq!(plant_loads(&result)["PLANT01"], 6);
}

#[test]
fn test_unreachable_product_policies() {
    let builder = || three_product_network().order(4, 1.0, 1.0, "NOWHERE");

    let (orders, index) = builder().build_indexed();
    let err = default_orchestrator()
        .run_scenario(&orders, &index, &ScenarioSpec::baseline())
        .unwrap_err();
    assert!(matches!(err, RoutingError::NoFeasibleRoute { ref product_ids } if product_ids == &vec![4]));

    let (orders, index) = builder().build_indexed();
    let options = OrchestratorOptions {
        unreachable_policy: UnreachablePolicy::Exclude,
        ..OrchestratorOptions::default()
    };
    let result = orchestrator(options)
        .run_scenario(&orders, &index, &ScenarioSpec::baseline())
        .unwrap();
    assert_eq!(result.excluded_products, vec![4]);
    assert_eq!(result.products_assigned(), 3);
}

// ==========================================
// 解的性质
// ==========================================

#[test]
fn test_solution_respects_assignment_and_capacity() {
    let (orders, index) = capacity_sensitive_network().build_indexed();
    let orchestrator = default_orchestrator();

    for cf in [0.8, 1.0, 1.2] {
        let result = orchestrator
            .run_scenario(&orders, &index, &ScenarioSpec::new(format!("cap×{}", cf), cf, 1.0))
            .unwrap();

        // 每个产品恰好一条路线
        assert_eq!(result.products_assigned(), 2);
        for (product_id, assignment) in &result.assignments {
            assert_eq!(*product_id, assignment.product_id);
        }
        for (plant_id, load) in plant_loads(&result) {
            let limit = index.plant(&plant_id).unwrap().scaled_capacity(cf);
            assert!(f64::from(load) <= limit + 1e-9, "{} 超出产能", plant_id);
        }
    }
}

#[test]
fn test_capacity_monotonicity() {
    let (orders, index) = capacity_sensitive_network().build_indexed();
    let orchestrator = default_orchestrator();

    let costs: Vec<f64> = [0.8, 1.0, 1.2]
        .iter()
        .map(|&cf| {
            orchestrator
                .run_scenario(&orders, &index, &ScenarioSpec::new("cap", cf, 1.0))
                .unwrap()
                .total_cost
        })
        .collect();

    assert!(costs[1] <= costs[0] + 1e-9);
    assert!(costs[2] <= costs[1] + 1e-9);
    // 1.2 时两个产品都能放进 PLANT01
    assert!((costs[0] - 56.0).abs() < 1e-9);
    assert!((costs[2] - 44.0).abs() < 1e-9);
}

#[test]
fn test_rerun_is_idempotent() {
    let (orders, index) = capacity_sensitive_network().build_indexed();
    let orchestrator = default_orchestrator();
    let spec = ScenarioSpec::new("Capacity -20%", 0.8, 1.0);

    let first = orchestrator.run_scenario(&orders, &index, &spec).unwrap();
    let second = orchestrator.run_scenario(&orders, &index, &spec).unwrap();

    assert_eq!(first.total_cost, second.total_cost);
    assert_eq!(first.assignments, second.assignments);
}

#[test]
fn test_equal_cost_tie_breaks_to_lowest_plant() {
    // 两个工厂成本完全相同,应选 (plant, port, band) 序最小者
    let (orders, index) = NetworkBuilder::new()
        .plant("PLANT02", 10.0, 1.0)
        .plant("PLANT01", 10.0, 1.0)
        .plant("PLANT03", 10.0, 9.0)
        .eligible("PLANT02", 1)
        .eligible("PLANT01", 1)
        .eligible("PLANT03", 1)
        .eligible("PLANT03", 2)
        .port("PLANT01", "PORT01")
        .port("PLANT02", "PORT02")
        .port("PLANT03", "PORT03")
        .band("PORT02", "DEST01", 100.0, 10.0, 1.0)
        .band("PORT01", "DEST01", 100.0, 10.0, 1.0)
        .band("PORT03", "DEST01", 100.0, 10.0, 1.0)
        .order(1, 2.0, 2.0, "DEST01")
        .order(2, 1.0, 1.0, "DEST01")
        .build_indexed();

    let result = default_orchestrator()
        .run_scenario(&orders, &index, &ScenarioSpec::baseline())
        .unwrap();
    assert_eq!(result.assignments[&1].candidate.plant_id, "PLANT01");
}

#[test]
fn test_tiny_time_limit_through_real_solver() {
    // 60 个产品 × 6 个工厂,总产能 126,总订单 120
    let mut builder = NetworkBuilder::new();
    for k in 1..=6u64 {
        let plant = format!("PLANT{:02}", k);
        let port = format!("PORT{:02}", k);
        builder = builder
            .plant(&plant, 21.0, k as f64)
            .port(&plant, &port)
            .band(&port, "DEST01", 1000.0, ((k * 13) % 17) as f64, 0.5);
    }
    for product in 1..=60u64 {
        builder = builder.orders(product, 1 + (product % 3) as usize, "DEST01");
        for k in 1..=6u64 {
            builder = builder.eligible(&format!("PLANT{:02}", k), product);
        }
    }
    let (orders, index) = builder.build_indexed();
    let options = OrchestratorOptions {
        max_solve_duration: Some(std::time::Duration::from_millis(1)),
        ..OrchestratorOptions::default()
    };

    match orchestrator(options).run_scenario(&orders, &index, &ScenarioSpec::baseline()) {
        Ok(result) => {
            assert_eq!(result.products_assigned(), 60);
            for (plant_id, load) in plant_loads(&result) {
                assert!(load <= 21, "{} 超出产能", plant_id);
            }
        }
        Err(err) => assert_eq!(err.kind(), "INFEASIBLE_BY_TIMEOUT", "{}", err),
    }
}
