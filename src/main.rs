// ==========================================
// 出港物流路线指派系统 - 命令行入口
// ==========================================
// 用法: outbound-routing <输入工作簿或CSV目录> [config.json]
// 流程: 配置 → 导入 → 路网索引 → 敏感性分析 → 报表
// ==========================================

use anyhow::{bail, Context, Result};
use outbound_routing::config::ConfigManager;
use outbound_routing::engine::{HighsSolver, RouteOrchestrator, RoutingIndex, SensitivityRunner};
use outbound_routing::importer::TableLoader;
use outbound_routing::report::{ReportBundle, SensitivityTable};
use outbound_routing::{logging, APP_NAME, VERSION};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        bail!("用法: outbound-routing <输入工作簿或CSV目录> [config.json]");
    };
    let config_path = args.next().map(PathBuf::from);

    tracing::info!("==================================================");
    tracing::info!("{} v{}", APP_NAME, VERSION);
    tracing::info!("==================================================");

    let manager = ConfigManager::load(config_path.as_deref()).context("加载配置失败")?;
    let config = manager.config();
    tracing::info!(source = manager.source().unwrap_or("默认配置"), "配置已加载");

    let input = TableLoader
        .load(Path::new(&input))
        .with_context(|| format!("导入输入数据失败: {}", input))?;
    let index = RoutingIndex::build(&input.reference, config.consolidate_duplicate_bands);

    let orchestrator = RouteOrchestrator::new(config.orchestrator_options(), HighsSolver::new());
    let snapshot = manager.snapshot_json().context("生成配置快照失败")?;
    let report = SensitivityRunner::new(&orchestrator).run(&input.orders, &index, &config.scenarios, snapshot);

    println!("{}", SensitivityTable.render(&report));

    if let Some(dir) = &config.output_dir {
        let written = ReportBundle::new(Path::new(dir))
            .write_all(&report, &input.orders, &index)
            .with_context(|| format!("写出报表失败: {}", dir))?;
        for path in written {
            println!("已写出 {}", path.display());
        }
    }
    Ok(())
}
