//! Binary MM Bot — Entry Point
//!
//! Initializes configuration, logging, the simulated venue, and the
//! replay engine, then runs a seeded random-walk scenario end to end.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (JSON or human-readable, per config)
//! 3. Create quote observer (Prometheus counters or no-op)
//! 4. Create MockVenue and register configured markets
//! 5. Create BinaryMmStrategy for the first active market
//! 6. Create FileRepository (JSONL trades + state snapshots)
//! 7. Wire ReplayEngine (router, risk gates, kill switch, clock)
//! 8. Generate the seeded random-walk scenario
//! 9. Run to completion or SIGINT
//! 10. Log the replay report and dump metrics

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tokio::signal;
use tracing::{info, warn};

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::metrics::PrometheusObserver;
use adapters::persistence::FileRepository;
use adapters::venue::MockVenue;
use domain::types::Market;
use ports::observer::{NoopObserver, QuoteObserver};
use usecases::quoting::BinaryMmStrategy;
use usecases::replay::{ReplayEngine, random_walk};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config = config::loader::load_config("config.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured logging ────────────────────
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.bot.log_level));
    if config.bot.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!(
        name = %config.bot.name,
        version = env!("CARGO_PKG_VERSION"),
        markets = config.markets.len(),
        "Starting binary MM bot"
    );

    // ── 3. Quote observer: Prometheus counters or no-op ─────
    let prometheus = if config.metrics.enabled {
        Some(Arc::new(
            PrometheusObserver::new().context("Failed to register metrics")?,
        ))
    } else {
        None
    };
    let observer: Arc<dyn QuoteObserver> = match &prometheus {
        Some(p) => Arc::clone(p) as Arc<dyn QuoteObserver>,
        None => Arc::new(NoopObserver),
    };

    // ── 4. Simulated venue with configured markets ──────────
    let fee_bps = Decimal::from_f64(config.replay.fee_bps).unwrap_or(Decimal::ZERO);
    let venue = Arc::new(MockVenue::new(fee_bps));
    let mut quoted_market: Option<Market> = None;
    for market_cfg in config.markets.iter().filter(|m| m.active) {
        let mut market = Market::binary(&market_cfg.id, &market_cfg.question);
        market.tick_size = market_cfg.tick_size;
        venue
            .add_market(market.clone(), config.replay.start_mid)
            .await
            .with_context(|| format!("Failed to register market {}", market_cfg.id))?;
        if quoted_market.is_none() {
            quoted_market = Some(market);
        }
    }
    let market = quoted_market.context("No active markets configured")?;

    // ── 5. Quoting strategy for the first active market ─────
    let strategy = Arc::new(
        BinaryMmStrategy::new(&market, &config.strategy, Arc::clone(&observer))
            .context("Failed to build strategy")?,
    );
    info!(
        market = %market.id,
        spread_bps = config.strategy.spread_bps,
        alpha = config.strategy.inventory_alpha,
        mid_source = ?config.strategy.mid_source,
        "Strategy ready"
    );

    // ── 6. File-backed repository ───────────────────────────
    let repository = Arc::new(
        FileRepository::from_data_dir(&config.persistence.data_dir)
            .await
            .context("Failed to open data directory")?,
    );

    // ── 7. Replay engine ────────────────────────────────────
    let mut engine = ReplayEngine::new(
        Arc::clone(&venue),
        Arc::clone(&strategy),
        repository,
        Arc::clone(&observer),
        &config,
    )
    .context("Failed to wire replay engine")?;

    // ── 8. Seeded random-walk scenario ──────────────────────
    let scenario = random_walk(
        &market.id,
        config.replay.start_mid,
        config.replay.steps,
        config.replay.step_size,
        config.replay.seed,
    );

    // ── 9. Run until done or SIGINT ─────────────────────────
    tokio::select! {
        result = engine.run(&scenario) => {
            let report = result.context("Replay failed")?;
            info!(
                steps = report.steps_run,
                fills = report.fills,
                pnl = report.final_pnl,
                kill_switch = report.kill_switch_tripped,
                "Replay report"
            );
            for (market_id, net_yes) in &report.final_net_yes {
                info!(market = %market_id, net_yes, "Final inventory");
            }
        }
        _ = signal::ctrl_c() => {
            warn!("SIGINT received, stopping replay; trade log is already on disk");
        }
    }

    // ── 10. Dump metrics in text exposition format ──────────
    if let Some(p) = prometheus {
        let text = p.export().context("Metrics export failed")?;
        info!(metrics = %text, "Final metrics");
    }

    info!("Shutdown complete");
    Ok(())
}
