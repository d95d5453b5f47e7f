//! Polling cycle driver.
//!
//! One cycle: fetch → print the price table with movement indicators →
//! journal the raw results → check baselines → print and journal any
//! alerts. The outer loop (interval timer, shutdown signal) lives in
//! the binary entry point.

use tracing::{debug, info};

use crate::journal::Journal;
use crate::quotes::QuoteSource;
use crate::tracker::ChangeTracker;
use crate::types::MonitorError;

/// Width of the console separator rule.
const RULE_WIDTH: usize = 40;

/// Summary of one completed polling cycle.
#[derive(Debug, Clone, Copy)]
pub struct CycleReport {
    pub ticks: usize,
    pub baselines_set: usize,
    pub alerts: usize,
}

/// Run a single fetch→track→journal cycle.
///
/// Fetch and journal errors propagate to the caller, which logs them
/// and waits out the normal interval — no error here ends the loop.
pub async fn run_cycle(
    source: &dyn QuoteSource,
    tracker: &mut ChangeTracker,
    journal: &Journal,
) -> Result<CycleReport, MonitorError> {
    // 1. Fetch
    let quotes = source.fetch_ticks().await?;
    debug!(source = source.name(), ticks = quotes.len(), "Ticks fetched");

    // 2. Console table with movement indicators
    println!("股票数据:");
    for quote in &quotes {
        let indicator = tracker.indicator(&quote.code, quote.price);
        println!("代码: {}, 价格: {} {}", quote.code, quote.price, indicator);
    }
    println!("{}", "-".repeat(RULE_WIDTH));

    // 3. Journal the raw results
    journal.append(&format!("获取股票数据 - {} 只股票", quotes.len()))?;
    for quote in &quotes {
        journal.append(&format!("  {quote}"))?;
    }

    // 4. Baseline check → alerts
    let outcome = tracker.check_alerts(&quotes);
    for (code, price) in &outcome.baselines_set {
        journal.append(&format!("设置基准价格 - {code}: {price}"))?;
    }

    if !outcome.alerts.is_empty() {
        println!("\n🚨 价格预警:");
        for alert in &outcome.alerts {
            println!("{alert}");
            journal.append(&alert.to_string())?;
        }
        println!("{}", "-".repeat(RULE_WIDTH));
    }

    Ok(CycleReport {
        ticks: quotes.len(),
        baselines_set: outcome.baselines_set.len(),
        alerts: outcome.alerts.len(),
    })
}

/// Log a structured cycle summary.
pub fn log_cycle_report(cycle: u64, report: &CycleReport) {
    info!(
        cycle,
        ticks = report.ticks,
        baselines_set = report.baselines_set,
        alerts = report.alerts,
        "Cycle complete"
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
