//! Replay Engine - Scenario-Driven Quoting Loop
//!
//! Drives the full quoting stack through a scripted price path:
//! 1. Move the simulated venue to the step's mid
//! 2. Fetch the book and quote around it
//! 3. Gate orders through risk limits
//! 4. Route survivors and absorb resulting fills
//! 5. Mark to market and feed the kill switch
//!
//! The same loop serves backtests (zero-delay clock) and paced demo
//! runs (real-time or accelerated).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, info, instrument, warn};

use crate::config::AppConfig;
use crate::domain::book::RollingBook;
use crate::domain::types::{MarketId, OUTCOME_NO, OUTCOME_YES, Trade};
use crate::ports::observer::{QuoteEvent, QuoteObserver};
use crate::ports::repository::{BotState, Repository, TradeRecord};
use crate::ports::venue::{PriceDriver, Venue};

use super::quoting::Strategy;
use super::risk::{KillSwitch, RiskLimits, portfolio_value_binary};
use super::router::OrderRouter;
use super::store::MarketStore;

/// One step of a replay scenario: where the market mid goes next.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioStep {
  /// Market to move.
  pub market_id: MarketId,
  /// New mid price, in [0.01, 0.99].
  pub mid: f64,
}

/// Generates a seeded random-walk price path.
///
/// Steps are uniform in `[-step_size, step_size]` and the mid is kept
/// inside [0.01, 0.99]. The same seed always yields the same path.
pub fn random_walk(
  market_id: &str,
  start_mid: f64,
  steps: usize,
  step_size: f64,
  seed: u64,
) -> Vec<ScenarioStep> {
  let mut rng = StdRng::seed_from_u64(seed);
  let mut mid = start_mid.clamp(0.01, 0.99);
  (0..steps)
    .map(|_| {
      mid = (mid + rng.gen_range(-step_size..=step_size)).clamp(0.01, 0.99);
      ScenarioStep {
        market_id: market_id.to_string(),
        mid,
      }
    })
    .collect()
}

/// Paces replay steps: a speed multiplier over the configured step
/// interval. Speed 0 disables sleeping entirely (backtest mode).
#[derive(Debug, Clone, Copy)]
pub struct SimClock {
  speed: f64,
}

impl SimClock {
  /// Creates a clock with the given speed multiplier.
  pub fn new(speed: f64) -> Self {
    Self {
      speed: speed.max(0.0),
    }
  }

  /// Sleeps one step interval scaled by the speed, or not at all when
  /// the speed is 0.
  pub async fn pace(&self, step: Duration) {
    if self.speed > 0.0 {
      tokio::time::sleep(step.div_f64(self.speed)).await;
    }
  }
}

/// Summary of a finished replay run.
#[derive(Debug, Clone)]
pub struct ReplayReport {
  /// Steps actually executed (may stop early on kill switch).
  pub steps_run: usize,
  /// Total fills absorbed.
  pub fills: u64,
  /// Final mark-to-market PnL.
  pub final_pnl: f64,
  /// Whether the kill switch ended the run.
  pub kill_switch_tripped: bool,
  /// Final net YES inventory per market.
  pub final_net_yes: Vec<(MarketId, f64)>,
}

/// Scenario-driven quoting loop over a simulated venue.
pub struct ReplayEngine<V, S, R>
where
  V: Venue + PriceDriver,
  S: Strategy,
  R: Repository,
{
  /// Simulated venue, movable per step.
  venue: Arc<V>,
  /// Quoting strategy (owns the inventory scalar).
  strategy: Arc<S>,
  /// Router with rate budget.
  router: OrderRouter<V>,
  /// Pre-trade gates.
  limits: RiskLimits,
  /// Latched loss trigger.
  kill_switch: KillSwitch,
  /// Registry and fill ledger.
  store: MarketStore,
  /// Recent books per market, for mark-to-market.
  history: HashMap<MarketId, RollingBook>,
  /// Trade log and state snapshots.
  repository: Arc<R>,
  /// Telemetry sink.
  observer: Arc<dyn QuoteObserver>,
  /// Step pacing.
  clock: SimClock,
  /// Nominal wall-clock length of one step.
  step_interval: Duration,
  /// Book history window per market.
  book_window: usize,
}

impl<V, S, R> ReplayEngine<V, S, R>
where
  V: Venue + PriceDriver,
  S: Strategy,
  R: Repository,
{
  /// Wires the engine from config and already-constructed parts.
  ///
  /// # Errors
  /// Fails if the router's rate budget is invalid.
  pub fn new(
    venue: Arc<V>,
    strategy: Arc<S>,
    repository: Arc<R>,
    observer: Arc<dyn QuoteObserver>,
    config: &AppConfig,
  ) -> Result<Self> {
    let router = OrderRouter::new(
      Arc::clone(&venue),
      Arc::clone(&observer),
      config.routing.max_orders_per_minute,
    )?;
    Ok(Self {
      venue,
      strategy,
      router,
      limits: RiskLimits::new(&config.risk),
      kill_switch: KillSwitch::new(config.risk.max_loss),
      store: MarketStore::new(),
      history: HashMap::new(),
      repository,
      observer,
      clock: SimClock::new(config.replay.speed),
      step_interval: Duration::from_millis(config.replay.step_interval_ms),
      book_window: config.replay.book_window,
    })
  }

  /// Runs the scenario to completion (or until the kill switch trips),
  /// then persists a final state snapshot.
  #[instrument(skip(self, scenario), name = "replay_loop")]
  pub async fn run(&mut self, scenario: &[ScenarioStep]) -> Result<ReplayReport> {
    let markets = self
      .venue
      .list_markets()
      .await
      .context("market discovery failed")?;
    info!(
      venue = self.venue.name(),
      markets = markets.len(),
      steps = scenario.len(),
      "starting replay"
    );
    for market in markets {
      self.store.upsert_market(market);
    }

    let mut steps_run = 0;
    let mut tripped = false;
    for step in scenario {
      self.process_step(step).await?;
      steps_run += 1;

      let pnl = self.mark_to_market();
      if self.kill_switch.check(pnl) {
        self.observer.record(QuoteEvent::KillSwitchTripped);
        warn!(pnl, steps_run, "kill switch ended the replay");
        tripped = true;
        break;
      }

      self.clock.pace(self.step_interval).await;
    }

    let report = ReplayReport {
      steps_run,
      fills: self.store.trade_count(),
      final_pnl: self.mark_to_market(),
      kill_switch_tripped: tripped,
      final_net_yes: self.store.net_yes_all(),
    };
    self.persist_state(&report).await?;
    info!(
      steps = report.steps_run,
      fills = report.fills,
      pnl = report.final_pnl,
      "replay finished"
    );
    Ok(report)
  }

  /// One scenario step: move the venue, quote, gate, route, absorb.
  #[instrument(skip(self, step), fields(market = %step.market_id, mid = step.mid))]
  async fn process_step(&mut self, step: &ScenarioStep) -> Result<()> {
    self
      .venue
      .set_mid(&step.market_id, step.mid)
      .await
      .context("price move failed")?;

    let book = self
      .venue
      .order_book(&step.market_id)
      .await
      .context("book fetch failed")?;
    self
      .history
      .entry(step.market_id.clone())
      .or_insert_with(|| RollingBook::new(self.book_window))
      .push(book.clone());

    let quote = self.strategy.quote(&book)?;
    let net_yes = self.strategy.net_yes();
    let orders: Vec<_> = quote
      .into_orders()
      .into_iter()
      .filter(|order| self.limits.allow_order(net_yes, order))
      .collect();
    if orders.is_empty() {
      debug!(net_yes, "all orders blocked by risk gates");
      return Ok(());
    }

    let trades = self.router.route(orders).await?;
    for trade in &trades {
      self.absorb_fill(trade).await?;
    }
    Ok(())
  }

  /// Applies one fill to the ledger, the strategy inventory, and the
  /// trade log.
  async fn absorb_fill(&mut self, trade: &Trade) -> Result<()> {
    self.store.apply_trade(trade);

    let signed = trade.signed_qty().to_f64().unwrap_or(0.0);
    // NO-leg fills move net YES exposure the opposite way.
    let delta = if trade.outcome == OUTCOME_NO { -signed } else { signed };
    self.strategy.update_inventory(delta)?;

    self
      .repository
      .save_trade(&TradeRecord::from_trade(trade))
      .await
      .context("trade log append failed")?;
    Ok(())
  }

  /// Cash plus positions marked at each market's latest mid.
  fn mark_to_market(&self) -> f64 {
    let cash = self.store.cash().to_f64().unwrap_or(0.0);
    let positions: f64 = self
      .store
      .net_yes_all()
      .iter()
      .map(|(market_id, _)| {
        let mid = self
          .history
          .get(market_id)
          .and_then(RollingBook::last_mid)
          .unwrap_or(0.5);
        let qty_yes = self.store.qty(market_id, OUTCOME_YES).to_f64().unwrap_or(0.0);
        let qty_no = self.store.qty(market_id, OUTCOME_NO).to_f64().unwrap_or(0.0);
        portfolio_value_binary(qty_yes, qty_no, mid)
      })
      .sum();
    cash + positions
  }

  /// Saves the crash-recovery snapshot for this run.
  async fn persist_state(&self, report: &ReplayReport) -> Result<()> {
    let state = BotState {
      version: env!("CARGO_PKG_VERSION").to_string(),
      timestamp_ms: chrono::Utc::now().timestamp_millis().max(0) as u64,
      net_yes: report.final_net_yes.clone(),
      realized_pnl: report.final_pnl,
      trade_count: report.fills,
    };
    self
      .repository
      .save_state(&state)
      .await
      .context("state snapshot failed")
  }
}
