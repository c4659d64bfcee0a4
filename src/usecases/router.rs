//! Order Router - Quote Submission with Rate Limiting
//!
//! Takes the strategy's unrouted orders, stamps identities, enforces
//! the venue rate budget, and submits what survives:
//! - Order IDs are assigned here, never by the strategy, so quoting
//!   stays deterministic
//! - Throttled orders are dropped (not queued); the next quote cycle
//!   replaces them anyway
//! - Surviving orders are submitted as one batch

use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::{Context, Result};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::types::{Order, Trade};
use crate::ports::observer::{QuoteEvent, QuoteObserver};
use crate::ports::venue::Venue;

/// Routes orders to a venue under an orders-per-minute budget.
pub struct OrderRouter<V: Venue> {
  /// Venue port.
  venue: Arc<V>,
  /// Token-bucket limiter over order submissions.
  limiter: DefaultDirectRateLimiter,
  /// Telemetry sink for throttle drops.
  observer: Arc<dyn QuoteObserver>,
}

impl<V: Venue> OrderRouter<V> {
  /// Creates a router with the given per-minute order budget.
  ///
  /// # Errors
  /// Fails if `max_orders_per_minute` is zero.
  pub fn new(
    venue: Arc<V>,
    observer: Arc<dyn QuoteObserver>,
    max_orders_per_minute: u32,
  ) -> Result<Self> {
    let burst = NonZeroU32::new(max_orders_per_minute)
      .context("max_orders_per_minute must be > 0")?;
    Ok(Self {
      venue,
      limiter: RateLimiter::direct(Quota::per_minute(burst)),
      observer,
    })
  }

  /// Stamps, throttles, and submits orders; returns resulting fills.
  ///
  /// Orders that exceed the rate budget are dropped and counted via
  /// the observer. An empty submission short-circuits without touching
  /// the venue.
  #[instrument(skip(self, orders), fields(count = orders.len()))]
  pub async fn route(&self, orders: Vec<Order>) -> Result<Vec<Trade>> {
    let mut accepted = Vec::with_capacity(orders.len());
    for mut order in orders {
      if self.limiter.check().is_err() {
        self.observer.record(QuoteEvent::OrderThrottled);
        warn!(
          market = %order.market_id,
          side = %order.side,
          price = order.price,
          "rate budget exhausted, dropping order"
        );
        continue;
      }
      order.id = Uuid::new_v4().to_string();
      accepted.push(order);
    }

    if accepted.is_empty() {
      return Ok(Vec::new());
    }

    let trades = self
      .venue
      .place_orders(&accepted)
      .await
      .with_context(|| format!("order submission to {} failed", self.venue.name()))?;
    info!(
      venue = self.venue.name(),
      submitted = accepted.len(),
      fills = trades.len(),
      "orders routed"
    );
    Ok(trades)
  }
}
