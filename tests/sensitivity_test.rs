// ==========================================
// 敏感性分析集成测试
// ==========================================
// 场景: 默认五场景扫描 → 增量计算 → 报表目录输出
// ==========================================

mod helpers;

use helpers::test_data_builder::{shared_capacity_network, three_product_network};
use outbound_routing::engine::{
    HighsSolver, OrchestratorOptions, RouteOrchestrator, ScenarioSpec, SensitivityRunner,
};
use outbound_routing::report::bundle::{
    BASELINE_ORDERS_CSV, BASELINE_PRODUCTS_CSV, SENSITIVITY_CSV, SENSITIVITY_JSON,
};
use outbound_routing::report::{ReportBundle, SensitivityTable};
use std::fs;
use tempfile::TempDir;

fn orchestrator() -> RouteOrchestrator<HighsSolver> {
    RouteOrchestrator::new(OrchestratorOptions::default(), HighsSolver::new())
}

#[test]
fn test_default_sweep_deltas() {
    let (orders, index) = three_product_network().build_indexed();
    let orchestrator = orchestrator();
    let report = SensitivityRunner::new(&orchestrator).run(
        &orders,
        &index,
        &ScenarioSpec::default_sweep(),
        serde_json::json!({}),
    );

    assert_eq!(report.rows.len(), 5);
    assert_eq!(report.failed_count(), 0);
    assert!(report.deltas_disabled.is_none());

    let baseline = report.row("Baseline").unwrap();
    assert!(baseline.baseline);
    assert!((baseline.total_cost.unwrap() - 554.0).abs() < 1e-9);
    assert_eq!(baseline.delta_abs, None);

    // 500 + 31 + 24.6
    let freight_up = report.row("Freight +10%").unwrap();
    assert!((freight_up.delta_abs.unwrap() - 1.6).abs() < 1e-9);
    assert_eq!(freight_up.delta_rel, Some(0.29));

    // 500 + 29 + 23.4
    let freight_down = report.row("Freight -10%").unwrap();
    assert!((freight_down.delta_abs.unwrap() + 1.6).abs() < 1e-9);
    assert_eq!(freight_down.delta_rel, Some(-0.29));

    // 产能充足,产能系数不影响成本
    let capacity_up = report.row("Capacity +20%").unwrap();
    assert_eq!(capacity_up.delta_rel, Some(0.0));
    assert_eq!(capacity_up.products_assigned, 3);
}

#[test]
fn test_failed_baseline_keeps_running_and_disables_deltas() {
    let (orders, index) = shared_capacity_network(false).build_indexed();
    let orchestrator = orchestrator();
    let report = SensitivityRunner::new(&orchestrator).run(
        &orders,
        &index,
        &ScenarioSpec::default_sweep(),
        serde_json::json!({}),
    );

    // 每个场景都有结果行
    assert_eq!(report.rows.len(), 5);
    assert!(report.deltas_disabled.is_some());
    assert!(report.baseline_result().is_none());

    let baseline = report.row("Baseline").unwrap();
    assert_eq!(baseline.status, "INFEASIBLE");
    assert_eq!(baseline.total_cost, None);

    // 产能 ×1.2 → 12 单恰好放下
    let capacity_up = report.row("Capacity +20%").unwrap();
    assert!((capacity_up.total_cost.unwrap() - 44.0).abs() < 1e-9);
    assert_eq!(capacity_up.products_assigned, 2);
    assert_eq!(capacity_up.delta_abs, None);
    assert_eq!(capacity_up.delta_rel, None);

    assert!(report.rows.iter().all(|r| r.delta_abs.is_none()));
    let text = SensitivityTable.render(&report);
    assert!(text.contains("!!"));
}

#[test]
fn test_report_bundle_written_to_directory() {
    let (orders, index) = three_product_network().build_indexed();
    let orchestrator = orchestrator();
    let report = SensitivityRunner::new(&orchestrator).run(
        &orders,
        &index,
        &ScenarioSpec::default_sweep(),
        serde_json::json!({"fast_path_enabled": true}),
    );

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("reports");
    let written = ReportBundle::new(&out).write_all(&report, &orders, &index).unwrap();
    assert_eq!(written.len(), 4);

    let sensitivity = fs::read_to_string(out.join(SENSITIVITY_CSV)).unwrap();
    assert_eq!(sensitivity.lines().count(), 6);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join(SENSITIVITY_JSON)).unwrap()).unwrap();
    assert_eq!(json["baseline"], "Baseline");
    assert_eq!(json["config"]["fast_path_enabled"], true);

    let products = fs::read_to_string(out.join(BASELINE_PRODUCTS_CSV)).unwrap();
    assert_eq!(products.lines().count(), 4);

    let order_rows = fs::read_to_string(out.join(BASELINE_ORDERS_CSV)).unwrap();
    assert_eq!(order_rows.lines().count(), 5);
}

#[test]
fn test_report_bundle_skips_solution_without_baseline() {
    let (orders, index) = shared_capacity_network(false).build_indexed();
    let orchestrator = orchestrator();
    let report = SensitivityRunner::new(&orchestrator).run(
        &orders,
        &index,
        &[ScenarioSpec::baseline()],
        serde_json::json!({}),
    );

    let dir = TempDir::new().unwrap();
    let written = ReportBundle::new(dir.path()).write_all(&report, &orders, &index).unwrap();
    assert_eq!(written.len(), 2);
    assert!(!dir.path().join(BASELINE_ORDERS_CSV).exists());
}
