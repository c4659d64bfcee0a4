//! Mock Venue - In-Memory Simulated Market
//!
//! A deterministic venue for backtests and demos:
//! - One synthetic book level per side, one tick around a movable mid
//! - Immediate-or-cancel matching: an order fills only if it crosses
//!   the opposite touch, at the touch price
//! - Fees charged on fill notional at the configured bps
//!
//! No randomness lives here; price movement comes entirely from the
//! scenario driving `set_mid`.

use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ticks::TickRounder;
use crate::domain::types::{
    BookLevel, Market, MarketId, Order, OrderBookSnapshot, OrderSide, Trade,
};
use crate::ports::venue::{PriceDriver, Venue};

/// Per-market simulation state.
struct MarketSim {
    market: Market,
    ticks: TickRounder,
    mid: f64,
}

/// In-memory venue with a single-level synthetic book per market.
pub struct MockVenue {
    /// Venue name for logs and records.
    name: String,
    /// Taker fee in basis points.
    fee_bps: Decimal,
    /// Quantity shown on each synthetic level.
    level_qty: f64,
    /// Mutable simulation state.
    sims: Mutex<HashMap<MarketId, MarketSim>>,
}

impl MockVenue {
    /// Creates an empty mock venue.
    pub fn new(fee_bps: Decimal) -> Self {
        Self {
            name: "mock".to_string(),
            fee_bps,
            level_qty: 100.0,
            sims: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a market and seeds its mid.
    ///
    /// # Errors
    /// Fails if the market's tick size is invalid.
    pub async fn add_market(&self, market: Market, mid: f64) -> Result<()> {
        let ticks = TickRounder::new(market.tick_size)
            .with_context(|| format!("market {} has a bad tick size", market.id))?;
        let mut sims = self.sims.lock().await;
        sims.insert(
            market.id.clone(),
            MarketSim {
                market,
                ticks,
                mid: mid.clamp(0.01, 0.99),
            },
        );
        Ok(())
    }

    /// Synthesizes the one-level book around the sim's current mid.
    fn synth_book(&self, sim: &MarketSim) -> OrderBookSnapshot {
        let tick = sim.ticks.tick();
        let bid = sim.ticks.nearest(sim.mid - tick);
        let ask = sim.ticks.nearest(sim.mid + tick);
        OrderBookSnapshot {
            market_id: sim.market.id.clone(),
            bids: vec![BookLevel {
                price: bid,
                qty: self.level_qty,
            }],
            asks: vec![BookLevel {
                price: ask,
                qty: self.level_qty,
            }],
            timestamp: Utc::now(),
        }
    }
}

#[async_trait]
impl Venue for MockVenue {
    fn name(&self) -> &str {
        &self.name
    }

    fn fee_bps(&self) -> Decimal {
        self.fee_bps
    }

    async fn list_markets(&self) -> Result<Vec<Market>> {
        let sims = self.sims.lock().await;
        Ok(sims.values().map(|s| s.market.clone()).collect())
    }

    async fn order_book(&self, market_id: &MarketId) -> Result<OrderBookSnapshot> {
        let sims = self.sims.lock().await;
        let sim = sims
            .get(market_id)
            .with_context(|| format!("unknown market {market_id}"))?;
        Ok(self.synth_book(sim))
    }

    async fn place_orders(&self, orders: &[Order]) -> Result<Vec<Trade>> {
        let sims = self.sims.lock().await;
        let mut trades = Vec::new();

        for order in orders {
            let Some(sim) = sims.get(&order.market_id) else {
                bail!("unknown market {}", order.market_id);
            };
            let book = self.synth_book(sim);

            // IOC: fill at the touch only if the limit crosses it.
            let fill = match order.side {
                OrderSide::Buy => book
                    .best_ask()
                    .filter(|&ask| order.price >= ask)
                    .map(|ask| (ask, order.qty.min(self.level_qty))),
                OrderSide::Sell => book
                    .best_bid()
                    .filter(|&bid| order.price <= bid)
                    .map(|bid| (bid, order.qty.min(self.level_qty))),
            };

            let Some((price, qty)) = fill else {
                debug!(
                    market = %order.market_id,
                    side = %order.side,
                    price = order.price,
                    "order did not cross, cancelled"
                );
                continue;
            };

            let price_dec = Decimal::from_f64(price).unwrap_or_default();
            let qty_dec = Decimal::from_f64(qty).unwrap_or_default();
            let fee = self.compute_fee(price_dec * qty_dec);
            trades.push(Trade {
                id: Uuid::new_v4(),
                order_id: order.id.clone(),
                market_id: order.market_id.clone(),
                outcome: order.outcome.clone(),
                side: order.side,
                price: price_dec,
                qty: qty_dec,
                fee,
                executed_at: Utc::now(),
            });
        }

        Ok(trades)
    }
}

#[async_trait]
impl PriceDriver for MockVenue {
    async fn set_mid(&self, market_id: &MarketId, mid: f64) -> Result<()> {
        let mut sims = self.sims.lock().await;
        let sim = sims
            .get_mut(market_id)
            .with_context(|| format!("unknown market {market_id}"))?;
        sim.mid = mid.clamp(0.01, 0.99);
        debug!(market = %market_id, mid = sim.mid, "mid moved");
        Ok(())
    }
}
