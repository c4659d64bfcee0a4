//! Repository Port - State Persistence Interface
//!
//! Defines traits for persisting bot state using JSONL files.
//! No database dependency - lightweight append-only log format
//! optimized for audit trails and crash recovery.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::domain::types::{MarketId, OrderId, Trade};

/// A single fill record for persistence and auditing.
///
/// Flat f64 projection of the rich domain `Trade`, one JSON line each.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
  /// Unique trade identifier.
  pub id: String,
  /// Order that produced the fill.
  pub order_id: OrderId,
  /// Market this trade belongs to.
  pub market_id: MarketId,
  /// Outcome leg (YES/NO).
  pub outcome: String,
  /// Trade side ("BUY"/"SELL").
  pub side: String,
  /// Execution price.
  pub price: f64,
  /// Executed quantity.
  pub qty: f64,
  /// Fee paid.
  pub fee: f64,
  /// Execution timestamp (Unix ms).
  pub timestamp_ms: u64,
}

impl TradeRecord {
  /// Projects a domain trade down to the flat persistence record.
  pub fn from_trade(trade: &Trade) -> Self {
    Self {
      id: trade.id.to_string(),
      order_id: trade.order_id.clone(),
      market_id: trade.market_id.clone(),
      outcome: trade.outcome.clone(),
      side: trade.side.to_string(),
      price: trade.price.to_f64().unwrap_or(0.0),
      qty: trade.qty.to_f64().unwrap_or(0.0),
      fee: trade.fee.to_f64().unwrap_or(0.0),
      timestamp_ms: trade.executed_at.timestamp_millis().max(0) as u64,
    }
  }
}

/// Bot state snapshot for crash recovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotState {
  /// Version of the state format.
  pub version: String,
  /// Timestamp of snapshot (Unix ms).
  pub timestamp_ms: u64,
  /// Net YES inventory per market.
  pub net_yes: Vec<(MarketId, f64)>,
  /// Realized profit and loss since start.
  pub realized_pnl: f64,
  /// Total number of fills recorded.
  pub trade_count: u64,
}

/// Trait for state persistence providers.
///
/// Uses JSONL (JSON Lines) format for append-only logging.
/// Each line is a self-contained JSON record, making it easy
/// to parse, stream, and recover from partial writes.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
  /// Append a trade record to the trade log.
  async fn save_trade(&self, record: &TradeRecord) -> anyhow::Result<()>;

  /// Load all trade records (for recovery/analysis).
  async fn load_trades(&self) -> anyhow::Result<Vec<TradeRecord>>;

  /// Save a bot state snapshot (for crash recovery).
  async fn save_state(&self, state: &BotState) -> anyhow::Result<()>;

  /// Load the most recent bot state snapshot, if one exists.
  async fn load_state(&self) -> anyhow::Result<Option<BotState>>;
}
