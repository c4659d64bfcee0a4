//! Core quoting domain types.
//!
//! Defines the business entities the quoting core operates on: markets,
//! book levels and snapshots, orders, quotes, trades, and positions.
//! These types are the foundation of the hexagonal architecture's inner ring.
//!
//! Exposes two API surfaces:
//! - Lightweight f64-based structs for the pricing/quoting hot path
//! - Rich types (Decimal, Uuid, DateTime) for the fill ledger and audit log

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ────────────────────────────────────────────
// Type aliases consumed by ports and adapters
// ────────────────────────────────────────────

/// Lightweight market identifier used at the ports boundary.
pub type MarketId = String;

/// Lightweight order identifier (empty until the router assigns one).
pub type OrderId = String;

/// Outcome label within a market ("YES" / "NO" for binary contracts).
pub type Outcome = String;

/// Outstanding quantity per outcome, as seen by the pricing model.
///
/// Quantities may be negative (net short). `BTreeMap` keeps iteration
/// order deterministic, which the quoting core requires.
pub type OutcomeQuantities = BTreeMap<Outcome, f64>;

/// Probability per outcome. Every value lies in [0, 1] and the values
/// sum to 1 within 1e-9; producers are responsible for the invariant.
pub type ProbabilityVector = BTreeMap<Outcome, f64>;

/// Canonical YES outcome label for binary markets.
pub const OUTCOME_YES: &str = "YES";

/// Canonical NO outcome label for binary markets.
pub const OUTCOME_NO: &str = "NO";

// ────────────────────────────────────────────
// Enums shared across domain and ports
// ────────────────────────────────────────────

/// Order side — canonical enum used by both domain and ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

// ────────────────────────────────────────────
// Market and order book
// ────────────────────────────────────────────

/// A tradable binary-outcome market definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    /// Unique market identifier on the venue
    pub id: MarketId,
    /// Human-readable market question
    pub question: String,
    /// Outcome labels, YES/NO for binary contracts
    pub outcomes: Vec<Outcome>,
    /// Minimum price increment, in probability units
    pub tick_size: f64,
    /// Whether the market currently accepts orders
    pub active: bool,
}

impl Market {
    /// Creates a standard binary YES/NO market with a 0.01 tick.
    pub fn binary(id: impl Into<MarketId>, question: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            outcomes: vec![OUTCOME_YES.to_string(), OUTCOME_NO.to_string()],
            tick_size: 0.01,
            active: true,
        }
    }
}

/// One resting level of an order book side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookLevel {
    /// Price in probability units, within [0, 1]
    pub price: f64,
    /// Resting quantity at this price, non-negative
    pub qty: f64,
}

/// Immutable snapshot of a market's order book.
///
/// Bids are sorted descending, asks ascending; the snapshot is consumed
/// per call and the quoting core retains no reference to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// Market this book belongs to
    pub market_id: MarketId,
    /// Bid levels, best (highest) first
    pub bids: Vec<BookLevel>,
    /// Ask levels, best (lowest) first
    pub asks: Vec<BookLevel>,
    /// Snapshot capture time
    pub timestamp: DateTime<Utc>,
}

impl OrderBookSnapshot {
    /// Best bid price, if any bids rest.
    pub fn best_bid(&self) -> Option<f64> {
        self.bids.first().map(|l| l.price)
    }

    /// Best ask price, if any asks rest.
    pub fn best_ask(&self) -> Option<f64> {
        self.asks.first().map(|l| l.price)
    }

    /// Mid price when both sides exist.
    pub fn mid(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            _ => None,
        }
    }

    /// Top-of-book spread when both sides exist.
    pub fn spread(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────
// Orders and quotes
// ────────────────────────────────────────────

/// Lightweight order representation used at the ports boundary.
///
/// Constructed by the quoting strategy and submitted by the router.
/// Carries no timestamp and an empty `id` until routed, so identical
/// inputs produce byte-identical orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Router-assigned order ID (empty until submitted).
    pub id: OrderId,
    /// Market the order targets.
    pub market_id: MarketId,
    /// Outcome leg (YES or NO).
    pub outcome: Outcome,
    /// Buy or sell.
    pub side: OrderSide,
    /// Limit price in probability units, within [0, 1].
    pub price: f64,
    /// Size in contracts, strictly positive.
    pub qty: f64,
}

impl Order {
    /// Creates a new unrouted order with an empty id.
    pub fn new(
        market_id: impl Into<MarketId>,
        outcome: impl Into<Outcome>,
        side: OrderSide,
        price: f64,
        qty: f64,
    ) -> Self {
        Self {
            id: String::new(),
            market_id: market_id.into(),
            outcome: outcome.into(),
            side,
            price,
            qty,
        }
    }
}

/// A two-sided quote: exactly one buy and one sell on the same market,
/// with `bid.price < ask.price` guaranteed by the strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Buy order at the bid price
    pub bid: Order,
    /// Sell order at the ask price
    pub ask: Order,
}

impl Quote {
    /// Consumes the quote into routable orders, bid first.
    pub fn into_orders(self) -> Vec<Order> {
        vec![self.bid, self.ask]
    }
}

// ────────────────────────────────────────────
// Rich domain types (Decimal/Uuid) for the ledger
// ────────────────────────────────────────────

/// A completed fill record for the ledger and audit log (JSONL persistence).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Internal trade ID
    pub id: Uuid,
    /// Order that generated this trade
    pub order_id: OrderId,
    /// Market traded
    pub market_id: MarketId,
    /// Outcome leg
    pub outcome: Outcome,
    /// Buy or sell
    pub side: OrderSide,
    /// Execution price
    pub price: Decimal,
    /// Executed quantity
    pub qty: Decimal,
    /// Fee charged by the venue
    pub fee: Decimal,
    /// Execution timestamp
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    /// Signed quantity of this fill: positive for buys, negative for sells.
    pub fn signed_qty(&self) -> Decimal {
        match self.side {
            OrderSide::Buy => self.qty,
            OrderSide::Sell => -self.qty,
        }
    }
}

/// Accumulated net position in one outcome of one market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Market the position is in
    pub market_id: MarketId,
    /// Outcome held
    pub outcome: Outcome,
    /// Net contracts held (positive = long, negative = short)
    pub qty: Decimal,
    /// Average entry price over the accumulating fills
    pub avg_price: Decimal,
}
