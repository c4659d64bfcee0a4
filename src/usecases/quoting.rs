//! Binary Market-Making Strategy - Two-Sided Quote Generation
//!
//! The quoting pipeline, run once per book snapshot:
//! mid estimation -> inventory skew -> half-spread -> tick rounding ->
//! ordering repair -> emitted quote. Every degenerate input (empty
//! book, saturated skew, sub-tick spread) is repaired locally with a
//! deterministic fallback and reported to the observer; the caller
//! always gets a valid quote or an explicit input error.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, instrument, warn};

use crate::config::StrategyConfig;
use crate::domain::error::{QuoteError, QuoteResult, ensure_finite};
use crate::domain::lmsr::Lmsr;
use crate::domain::pricing::{MidSource, ModelKind, PricingModel};
use crate::domain::skew::skew_probabilities;
use crate::domain::ticks::TickRounder;
use crate::domain::types::{
  Market, MarketId, OUTCOME_NO, OUTCOME_YES, Order, OrderBookSnapshot, OrderSide,
  OutcomeQuantities, Quote,
};
use crate::ports::observer::{QuoteEvent, QuoteObserver};

/// Strategy seam used by drivers: produce a quote from a snapshot,
/// absorb fills into inventory.
pub trait Strategy: Send + Sync + 'static {
  /// Computes a two-sided quote for the snapshot's market.
  ///
  /// # Errors
  /// Returns `InvalidInput` if the snapshot carries non-finite prices
  /// or quantities.
  fn quote(&self, book: &OrderBookSnapshot) -> QuoteResult<Quote>;

  /// Adds `delta` contracts to net YES inventory (negative for sells)
  /// and returns the new value. Applied atomically with respect to
  /// concurrent `quote` calls.
  ///
  /// # Errors
  /// Returns `InvalidInput` for a non-finite delta.
  fn update_inventory(&self, delta: f64) -> QuoteResult<f64>;

  /// Current net YES inventory.
  fn net_yes(&self) -> f64;
}

/// Inventory-aware two-sided quoting for one binary market.
///
/// Holds the only mutable state in the core: the net YES inventory
/// scalar, behind a lock so quotes read a consistent value and updates
/// are never lost. Everything else is a pure pipeline, so two calls
/// with the same snapshot and inventory produce identical quotes.
pub struct BinaryMmStrategy {
  /// Market this instance quotes.
  market_id: MarketId,
  /// Total spread in basis points (100 = 1%).
  spread_bps: u32,
  /// Probability shift per contract of net inventory.
  inventory_alpha: f64,
  /// Contracts quoted on each side.
  default_qty: f64,
  /// Price grid of the quoted market.
  ticks: TickRounder,
  /// Pricing model, used when `mid_source` is `Model`.
  model: Arc<dyn PricingModel>,
  /// Book mid versus model-implied mid.
  mid_source: MidSource,
  /// Net YES inventory, the single mutable scalar.
  net_yes: Mutex<f64>,
  /// Telemetry sink for degenerate-input recoveries.
  observer: Arc<dyn QuoteObserver>,
}

impl BinaryMmStrategy {
  /// Creates a strategy for `market` from validated configuration.
  ///
  /// # Errors
  /// Returns `InvalidConfiguration` if any parameter is out of range:
  /// `spread_bps == 0`, `inventory_alpha < 0`, `default_qty <= 0`,
  /// tick size or liquidity not strictly positive.
  pub fn new(
    market: &Market,
    config: &StrategyConfig,
    observer: Arc<dyn QuoteObserver>,
  ) -> QuoteResult<Self> {
    if config.spread_bps == 0 {
      return Err(QuoteError::config("spread_bps must be > 0"));
    }
    ensure_finite(config.inventory_alpha, "inventory_alpha")?;
    if config.inventory_alpha < 0.0 {
      return Err(QuoteError::config(format!(
        "inventory_alpha must be >= 0, got {}",
        config.inventory_alpha
      )));
    }
    ensure_finite(config.default_qty, "default_qty")?;
    if config.default_qty <= 0.0 {
      return Err(QuoteError::config(format!(
        "default_qty must be > 0, got {}",
        config.default_qty
      )));
    }

    let ticks = TickRounder::new(market.tick_size)?;
    let model: Arc<dyn PricingModel> = match config.model {
      ModelKind::Lmsr => Arc::new(Lmsr::new(config.liquidity_b, market.outcomes.clone())?),
    };

    Ok(Self {
      market_id: market.id.clone(),
      spread_bps: config.spread_bps,
      inventory_alpha: config.inventory_alpha,
      default_qty: config.default_qty,
      ticks,
      model,
      mid_source: config.mid_source,
      net_yes: Mutex::new(0.0),
      observer,
    })
  }

  /// Base YES probability for this snapshot.
  fn estimate_mid(&self, book: &OrderBookSnapshot, inv: f64) -> QuoteResult<f64> {
    match self.mid_source {
      MidSource::Book => Ok(book.mid().unwrap_or_else(|| {
        self.observer.record(QuoteEvent::EmptyBookFallback);
        debug!(market = %self.market_id, "book missing a side, quoting around 0.5");
        0.5
      })),
      MidSource::Model => {
        // Price the model as if the market absorbed our inventory:
        // long net_yes means the crowd is net short YES against us.
        let mut quantities = OutcomeQuantities::new();
        quantities.insert(OUTCOME_YES.to_string(), -inv);
        quantities.insert(OUTCOME_NO.to_string(), inv);
        let prices = self.model.prices(&quantities)?;
        Ok(prices.get(OUTCOME_YES).copied().unwrap_or(0.5))
      }
    }
  }
}

impl Strategy for BinaryMmStrategy {
  #[instrument(skip(self, book))]
  fn quote(&self, book: &OrderBookSnapshot) -> QuoteResult<Quote> {
    for level in book.bids.iter().chain(book.asks.iter()) {
      ensure_finite(level.price, "book price")?;
      ensure_finite(level.qty, "book quantity")?;
    }

    // Inventory snapshot is taken once, at call start.
    let inv = self.net_yes();

    let mid = self.estimate_mid(book, inv)?;
    let pair = skew_probabilities(mid, 1.0 - mid, inv, self.inventory_alpha)?;
    if pair.saturated {
      self.observer.record(QuoteEvent::SkewSaturated);
      warn!(
        market = %self.market_id,
        inv,
        p_yes = pair.p_yes,
        "inventory skew saturated"
      );
    }

    let half_spread = f64::from(self.spread_bps) / 20_000.0;
    let bid_raw = (pair.p_yes - half_spread).max(0.0);
    let ask_raw = (pair.p_yes + half_spread).min(1.0);

    let tick = self.ticks.tick();
    let bid = self.ticks.floor(bid_raw);
    let ask = self.ticks.ceil(ask_raw);

    // Ordering repair on grid indices: exact tick steps, no drift from
    // repeated float subtraction. Terminates because the bid leg is
    // floored at 0 and the ask leg is capped at 1.
    let mut bid_idx = (bid / tick).round() as i64;
    let mut ask_idx = (ask / tick).round() as i64;
    let price_at = |idx: i64| (idx as f64 * tick).clamp(0.0, 1.0);
    let mut steps = 0u32;
    while price_at(bid_idx) >= price_at(ask_idx) {
      bid_idx = (bid_idx - 1).max(0);
      ask_idx += 1;
      steps += 1;
    }
    if steps > 0 {
      self.observer.record(QuoteEvent::OrderingRepaired { steps });
      debug!(market = %self.market_id, steps, "widened quote to restore bid < ask");
    }
    let bid = price_at(bid_idx);
    let ask = price_at(ask_idx);

    let quote = Quote {
      bid: Order::new(
        book.market_id.clone(),
        OUTCOME_YES,
        OrderSide::Buy,
        bid,
        self.default_qty,
      ),
      ask: Order::new(
        book.market_id.clone(),
        OUTCOME_YES,
        OrderSide::Sell,
        ask,
        self.default_qty,
      ),
    };
    self.observer.record(QuoteEvent::QuoteEmitted);
    debug!(market = %book.market_id, bid, ask, inv, "quote");
    Ok(quote)
  }

  fn update_inventory(&self, delta: f64) -> QuoteResult<f64> {
    ensure_finite(delta, "inventory delta")?;
    let mut net = self.net_yes.lock().unwrap_or_else(PoisonError::into_inner);
    *net += delta;
    Ok(*net)
  }

  fn net_yes(&self) -> f64 {
    *self.net_yes.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::types::BookLevel;
  use crate::ports::observer::NoopObserver;
  use chrono::Utc;

  fn test_config() -> StrategyConfig {
    StrategyConfig {
      spread_bps: 100,
      inventory_alpha: 0.0,
      default_qty: 10.0,
      liquidity_b: 100.0,
      model: ModelKind::Lmsr,
      mid_source: MidSource::Book,
    }
  }

  fn test_market(tick: f64) -> Market {
    let mut market = Market::binary("mkt-test", "test market");
    market.tick_size = tick;
    market
  }

  fn strategy(config: StrategyConfig, tick: f64) -> BinaryMmStrategy {
    BinaryMmStrategy::new(&test_market(tick), &config, Arc::new(NoopObserver)).unwrap()
  }

  fn book(bid: f64, ask: f64) -> OrderBookSnapshot {
    OrderBookSnapshot {
      market_id: "mkt-test".to_string(),
      bids: vec![BookLevel { price: bid, qty: 100.0 }],
      asks: vec![BookLevel { price: ask, qty: 100.0 }],
      timestamp: Utc::now(),
    }
  }

  fn empty_book() -> OrderBookSnapshot {
    OrderBookSnapshot {
      market_id: "mkt-test".to_string(),
      bids: vec![],
      asks: vec![],
      timestamp: Utc::now(),
    }
  }

  #[test]
  fn test_symmetric_quote_around_book_mid() {
    // 100 bps total spread on a 0.50 mid: bid 0.495, ask 0.505.
    let strat = strategy(test_config(), 0.001);
    let quote = strat.quote(&book(0.49, 0.51)).unwrap();
    assert!((quote.bid.price - 0.495).abs() < 1e-9, "bid {}", quote.bid.price);
    assert!((quote.ask.price - 0.505).abs() < 1e-9, "ask {}", quote.ask.price);
    assert_eq!(quote.bid.side, OrderSide::Buy);
    assert_eq!(quote.ask.side, OrderSide::Sell);
    assert_eq!(quote.bid.qty, 10.0);
  }

  #[test]
  fn test_long_inventory_shifts_quote_down() {
    // inv +30 at alpha 0.01 moves p_yes from 0.5 to 0.2.
    let mut config = test_config();
    config.inventory_alpha = 0.01;
    let strat = strategy(config, 0.001);
    strat.update_inventory(30.0).unwrap();
    let quote = strat.quote(&book(0.49, 0.51)).unwrap();
    assert!((quote.bid.price - 0.195).abs() < 1e-9, "bid {}", quote.bid.price);
    assert!((quote.ask.price - 0.205).abs() < 1e-9, "ask {}", quote.ask.price);
  }

  #[test]
  fn test_empty_book_quotes_around_half() {
    let strat = strategy(test_config(), 0.001);
    strat.update_inventory(5.0).unwrap();
    let quote = strat.quote(&empty_book()).unwrap();
    // alpha is 0 here, so inventory does not move the fallback mid.
    assert!((quote.bid.price - 0.495).abs() < 1e-9);
    assert!((quote.ask.price - 0.505).abs() < 1e-9);
  }

  #[test]
  fn test_one_sided_book_also_falls_back() {
    let strat = strategy(test_config(), 0.001);
    let mut snapshot = empty_book();
    snapshot.asks = vec![BookLevel { price: 0.70, qty: 5.0 }];
    let quote = strat.quote(&snapshot).unwrap();
    assert!((quote.bid.price - 0.495).abs() < 1e-9);
  }

  #[test]
  fn test_sub_tick_spread_is_widened() {
    // 2 bps half-spread is far below one 0.01 tick; floor/ceil rounding
    // still forces at least a full tick between bid and ask.
    let mut config = test_config();
    config.spread_bps = 2;
    let strat = strategy(config, 0.01);
    let quote = strat.quote(&book(0.49, 0.51)).unwrap();
    assert!(quote.bid.price < quote.ask.price);
    assert!(quote.ask.price - quote.bid.price >= 0.01 - 1e-9);
  }

  #[test]
  fn test_quote_near_boundary_stays_in_range() {
    let mut config = test_config();
    config.inventory_alpha = 0.01;
    let strat = strategy(config, 0.01);
    strat.update_inventory(5_000.0).unwrap();
    let quote = strat.quote(&book(0.01, 0.03)).unwrap();
    assert!(quote.bid.price >= 0.0);
    assert!(quote.ask.price <= 1.0);
    assert!(quote.bid.price < quote.ask.price);
  }

  #[test]
  fn test_quote_is_idempotent() {
    let mut config = test_config();
    config.inventory_alpha = 0.02;
    let strat = strategy(config, 0.01);
    strat.update_inventory(-12.5).unwrap();
    let snapshot = book(0.61, 0.63);
    let first = strat.quote(&snapshot).unwrap();
    let second = strat.quote(&snapshot).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn test_update_inventory_accumulates() {
    let strat = strategy(test_config(), 0.01);
    assert_eq!(strat.update_inventory(10.0).unwrap(), 10.0);
    assert_eq!(strat.update_inventory(-4.0).unwrap(), 6.0);
    assert_eq!(strat.net_yes(), 6.0);
    assert!(strat.update_inventory(f64::NAN).is_err());
    // A rejected delta must leave inventory untouched.
    assert_eq!(strat.net_yes(), 6.0);
  }

  #[test]
  fn test_model_mid_uses_inventory() {
    let mut config = test_config();
    config.mid_source = MidSource::Model;
    config.liquidity_b = 50.0;
    let strat = strategy(config, 0.001);
    // Flat inventory: model mid is 0.5 even though the book says 0.62.
    let quote = strat.quote(&book(0.61, 0.63)).unwrap();
    assert!((quote.bid.price - 0.495).abs() < 1e-9);

    // Long 50 YES with b = 50: q_yes - q_no = -100, so the model mid
    // drops to 1/(1+e^2) ~ 0.1192.
    strat.update_inventory(50.0).unwrap();
    let quote = strat.quote(&book(0.61, 0.63)).unwrap();
    let expected_mid = 1.0 / (1.0 + 2.0_f64.exp());
    assert!((quote.bid.price - (expected_mid - 0.005)).abs() < 0.002);
  }

  #[test]
  fn test_rejects_non_finite_book() {
    let strat = strategy(test_config(), 0.01);
    let mut snapshot = book(0.49, 0.51);
    snapshot.bids[0].price = f64::NAN;
    assert!(strat.quote(&snapshot).is_err());
  }

  #[test]
  fn test_construction_rejects_bad_parameters() {
    let market = test_market(0.01);
    let observer: Arc<dyn QuoteObserver> = Arc::new(NoopObserver);

    let mut config = test_config();
    config.spread_bps = 0;
    assert!(BinaryMmStrategy::new(&market, &config, observer.clone()).is_err());

    let mut config = test_config();
    config.inventory_alpha = -0.01;
    assert!(BinaryMmStrategy::new(&market, &config, observer.clone()).is_err());

    let mut config = test_config();
    config.default_qty = 0.0;
    assert!(BinaryMmStrategy::new(&market, &config, observer.clone()).is_err());

    let mut config = test_config();
    config.liquidity_b = -5.0;
    assert!(BinaryMmStrategy::new(&market, &config, observer.clone()).is_err());

    let bad_market = test_market(0.0);
    assert!(BinaryMmStrategy::new(&bad_market, &test_config(), observer).is_err());
  }
}
