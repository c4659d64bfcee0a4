//! Venue Port - Market Access Interface
//!
//! Defines the trait for everything the bot needs from a trading venue:
//! market discovery, order-book snapshots, and order placement.
//!
//! Key design decisions:
//! - Snapshots are pull-based; the driver decides the cadence
//! - `place_orders` is immediate-or-cancel and returns the resulting
//!   fills, so callers never track resting order state
//! - Fees are quoted in basis points of notional and charged per fill

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::types::{Market, MarketId, Order, OrderBookSnapshot, Trade};

/// Trait for trading venue providers.
///
/// Implementors expose one venue (real or simulated). All prices are
/// probabilities in [0, 1]; all quantities are contracts.
#[async_trait]
pub trait Venue: Send + Sync + 'static {
  /// Human-readable venue name, used in logs and trade records.
  fn name(&self) -> &str;

  /// Taker fee in basis points of traded notional.
  fn fee_bps(&self) -> Decimal;

  /// Fee charged on the given notional: `notional * fee_bps / 10000`.
  fn compute_fee(&self, notional: Decimal) -> Decimal {
    notional * self.fee_bps() / dec!(10000)
  }

  /// All markets currently tradable on this venue.
  async fn list_markets(&self) -> anyhow::Result<Vec<Market>>;

  /// Current order-book snapshot for one market.
  ///
  /// # Errors
  /// Returns an error for unknown markets.
  async fn order_book(&self, market_id: &MarketId) -> anyhow::Result<OrderBookSnapshot>;

  /// Submits orders immediate-or-cancel and returns the fills they
  /// produced. Unfilled quantity is dropped, not rested.
  async fn place_orders(&self, orders: &[Order]) -> anyhow::Result<Vec<Trade>>;
}

/// A venue whose prices can be driven externally.
///
/// Only simulated venues implement this; the replay engine uses it to
/// walk the market through a scenario.
#[async_trait]
pub trait PriceDriver: Send + Sync + 'static {
  /// Re-centers the market's book around a new mid price.
  async fn set_mid(&self, market_id: &MarketId, mid: f64) -> anyhow::Result<()>;
}
