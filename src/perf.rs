use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

static SLOW_SOLVE_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);
static PERF_ENABLED: OnceLock<bool> = OnceLock::new();

thread_local! {
    static PERF_DEPTH: Cell<u32> = Cell::new(0);
    static SOLVER_CALLS: Cell<u64> = Cell::new(0);
    static SOLVER_TIMEOUTS: Cell<u64> = Cell::new(0);
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 是否输出阶段耗时日志
///
/// 开关：
/// - Debug 默认开启；Release 默认关闭
/// - `OUTBOUND_ROUTING_PERF=1` 强制开启
fn perf_enabled() -> bool {
    *PERF_ENABLED.get_or_init(|| match std::env::var("OUTBOUND_ROUTING_PERF") {
        Ok(v) => is_true(&v),
        Err(_) => cfg!(debug_assertions),
    })
}

/// 慢求解阈值（毫秒）
///
/// `OUTBOUND_ROUTING_SLOW_SOLVE_MS=2000` 覆盖默认值（Debug 1000 / Release 5000）
pub fn slow_solve_threshold_ms() -> u64 {
    let cached = SLOW_SOLVE_THRESHOLD_MS.load(Ordering::Relaxed);
    if cached > 0 {
        return cached;
    }
    let ms = std::env::var("OUTBOUND_ROUTING_SLOW_SOLVE_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(if cfg!(debug_assertions) { 1000 } else { 5000 });
    SLOW_SOLVE_THRESHOLD_MS.store(ms, Ordering::Relaxed);
    ms
}

/// 记录一次求解器调用（仅在 Guard 作用域内计数）
pub fn record_solver_call() {
    if PERF_DEPTH.with(|d| d.get() > 0) {
        SOLVER_CALLS.with(|c| c.set(c.get().saturating_add(1)));
    }
}

/// 记录一次求解超时
pub fn record_solver_timeout() {
    if PERF_DEPTH.with(|d| d.get() > 0) {
        SOLVER_TIMEOUTS.with(|c| c.set(c.get().saturating_add(1)));
    }
}

/// 性能统计 Guard：记录 elapsed_ms + 求解次数 + 超时次数
///
/// 使用方式：
/// ```ignore
/// let _perf = outbound_routing::perf::PerfGuard::new("sensitivity_runner.run");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    calls_start: u64,
    timeouts_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        PERF_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        Self {
            op,
            start: Instant::now(),
            calls_start: SOLVER_CALLS.with(|c| c.get()),
            timeouts_start: SOLVER_TIMEOUTS.with(|c| c.get()),
        }
    }

    /// Guard 创建以来的求解次数
    pub fn solver_calls(&self) -> u64 {
        SOLVER_CALLS.with(|c| c.get()).saturating_sub(self.calls_start)
    }

    pub fn solver_timeouts(&self) -> u64 {
        SOLVER_TIMEOUTS.with(|c| c.get()).saturating_sub(self.timeouts_start)
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let solver_calls = self.solver_calls();
        let solver_timeouts = self.solver_timeouts();

        if solver_calls > 0 && elapsed_ms >= slow_solve_threshold_ms() {
            tracing::warn!(
                target: "slow_solve",
                op = self.op,
                elapsed_ms,
                solver_calls,
                "slow solve"
            );
        }
        if perf_enabled() {
            tracing::info!(
                target: "perf",
                op = self.op,
                elapsed_ms,
                solver_calls,
                solver_timeouts,
                "done"
            );
        }

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
