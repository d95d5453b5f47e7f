//! TICKWATCH — stock quote polling monitor.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! writes the startup banner to the journal, and runs the
//! fetch→track→journal loop with graceful shutdown.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{error, info};

use tickwatch::config;
use tickwatch::journal::Journal;
use tickwatch::monitor::{log_cycle_report, run_cycle};
use tickwatch::quotes::alltick::AllTickClient;
use tickwatch::tracker::ChangeTracker;
use tickwatch::types::MonitorState;

const BANNER: &str = r#"
 _____ ___ ____ _  ____        ___  _____ ____ _   _
|_   _|_ _/ ___| |/ /\ \      / / \|_   _/ ___| | | |
  | |  | | |   | ' /  \ \ /\ / / _ \ | || |   | |_| |
  | |  | | |___| . \   \ V  V / ___ \| || |___|  _  |
  |_| |___\____|_|\_\   \_/\_/_/   \_\_| \____|_| |_|

  Stock quote polling monitor
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = config::AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        symbols = ?cfg.monitor.symbols,
        poll_interval_secs = cfg.monitor.poll_interval_secs,
        alert_threshold_pct = %cfg.monitor.alert_threshold_pct,
        log_file = %cfg.monitor.log_file,
        "TICKWATCH starting up"
    );

    // -- Initialise components -------------------------------------------

    let token = config::AppConfig::resolve_env(&cfg.api.token_env)
        .context("Quote API token is required")?;

    let source = AllTickClient::new(
        &cfg.api.base_url,
        &token,
        &cfg.monitor.symbols,
        Duration::from_secs(cfg.api.http_timeout_secs),
    )?;

    let mut tracker = ChangeTracker::new(cfg.monitor.alert_threshold_pct);
    let journal = Journal::new(&cfg.monitor.log_file);
    let mut state = MonitorState::new();

    // Startup banner in the journal: separator, symbol list, threshold.
    journal.startup_banner(&cfg.monitor.symbols, cfg.monitor.alert_threshold_pct)?;

    // -- Main loop ---------------------------------------------------------

    let poll_interval = Duration::from_secs(cfg.monitor.poll_interval_secs);
    let mut interval = tokio::time::interval(poll_interval);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.monitor.poll_interval_secs,
        "Entering main loop. Press Ctrl+C to stop."
    );

    while state.is_running() {
        tokio::select! {
            _ = interval.tick() => {
                state.cycle_count += 1;
                match run_cycle(&source, &mut tracker, &journal).await {
                    Ok(report) => log_cycle_report(state.cycle_count, &report),
                    Err(e) => {
                        // Recoverable per cycle: surface it, then wait out
                        // the normal interval.
                        let message = format!("请求出错: {e}");
                        println!("{message}");
                        if let Err(journal_err) = journal.append(&message) {
                            error!(error = %journal_err, "Failed to journal cycle error");
                        }
                        error!(error = %e, cycle = state.cycle_count, "Cycle failed — continuing to next");
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                state.stop();
            }
        }
    }

    println!("\n程序已停止");
    journal.append("程序正常停止")?;
    info!(cycles = state.cycle_count, "TICKWATCH shut down cleanly.");

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tickwatch=info"));

    let json_logging = std::env::var("TICKWATCH_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
