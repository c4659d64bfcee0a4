//! Market Store - Registry and Fill Ledger
//!
//! Owns the audit-side view of the world: known markets, per-outcome
//! positions accumulated from fills, and the cash account. Decimal
//! arithmetic throughout; f64 only at the boundary accessors that feed
//! the strategy and risk gates.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::domain::types::{
  Market, MarketId, OUTCOME_NO, OUTCOME_YES, Outcome, OrderSide, Position, Trade,
};

/// Market registry plus inventory ledger.
#[derive(Debug, Default)]
pub struct MarketStore {
  /// Known market definitions by id.
  markets: HashMap<MarketId, Market>,
  /// Net positions keyed by (market, outcome).
  positions: HashMap<(MarketId, Outcome), Position>,
  /// Cash account: fills debit buys and credit sells, fees included.
  cash: Decimal,
  /// Total fills applied.
  trade_count: u64,
}

impl MarketStore {
  /// Creates an empty store.
  pub fn new() -> Self {
    Self::default()
  }

  /// Inserts or replaces a market definition.
  pub fn upsert_market(&mut self, market: Market) {
    self.markets.insert(market.id.clone(), market);
  }

  /// Looks up a market by id.
  pub fn market(&self, id: &str) -> Option<&Market> {
    self.markets.get(id)
  }

  /// All known markets, in no particular order.
  pub fn markets(&self) -> impl Iterator<Item = &Market> {
    self.markets.values()
  }

  /// Applies one fill: moves cash, fees, and the outcome position.
  pub fn apply_trade(&mut self, trade: &Trade) {
    let notional = trade.price * trade.qty;
    match trade.side {
      OrderSide::Buy => self.cash -= notional + trade.fee,
      OrderSide::Sell => self.cash += notional - trade.fee,
    }

    let key = (trade.market_id.clone(), trade.outcome.clone());
    let pos = self.positions.entry(key).or_insert_with(|| Position {
      market_id: trade.market_id.clone(),
      outcome: trade.outcome.clone(),
      qty: Decimal::ZERO,
      avg_price: Decimal::ZERO,
    });

    let signed = trade.signed_qty();
    let new_qty = pos.qty + signed;
    if pos.qty.is_zero() {
      pos.avg_price = trade.price;
    } else if pos.qty.is_sign_positive() == signed.is_sign_positive() {
      // Accumulating in the same direction: blend the entry price.
      let old_abs = pos.qty.abs();
      let add_abs = signed.abs();
      pos.avg_price =
        (pos.avg_price * old_abs + trade.price * add_abs) / (old_abs + add_abs);
    } else if new_qty.is_zero() {
      pos.avg_price = Decimal::ZERO;
    } else if pos.qty.is_sign_positive() != new_qty.is_sign_positive() {
      // Crossed through flat: the residual was opened at this fill.
      pos.avg_price = trade.price;
    }
    pos.qty = new_qty;
    self.trade_count += 1;
  }

  /// Net quantity held in one outcome of one market.
  pub fn qty(&self, market_id: &str, outcome: &str) -> Decimal {
    self
      .positions
      .get(&(market_id.to_string(), outcome.to_string()))
      .map_or(Decimal::ZERO, |p| p.qty)
  }

  /// Position record for one outcome, if any fills touched it.
  pub fn position(&self, market_id: &str, outcome: &str) -> Option<&Position> {
    self
      .positions
      .get(&(market_id.to_string(), outcome.to_string()))
  }

  /// Net YES exposure for a market: `qty(YES) - qty(NO)`, at the f64
  /// boundary for the strategy and risk gates.
  pub fn net_yes(&self, market_id: &str) -> f64 {
    let net = self.qty(market_id, OUTCOME_YES) - self.qty(market_id, OUTCOME_NO);
    net.to_f64().unwrap_or(0.0)
  }

  /// Net YES exposure for every market with a position.
  pub fn net_yes_all(&self) -> Vec<(MarketId, f64)> {
    let mut ids: Vec<MarketId> = self
      .positions
      .keys()
      .map(|(market_id, _)| market_id.clone())
      .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
      .into_iter()
      .map(|id| {
        let net = self.net_yes(&id);
        (id, net)
      })
      .collect()
  }

  /// Cash account balance (starts at zero).
  pub fn cash(&self) -> Decimal {
    self.cash
  }

  /// Number of fills applied so far.
  pub fn trade_count(&self) -> u64 {
    self.trade_count
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;
  use rust_decimal_macros::dec;
  use uuid::Uuid;

  fn trade(side: OrderSide, price: Decimal, qty: Decimal) -> Trade {
    trade_for(OUTCOME_YES, side, price, qty)
  }

  fn trade_for(outcome: &str, side: OrderSide, price: Decimal, qty: Decimal) -> Trade {
    Trade {
      id: Uuid::new_v4(),
      order_id: "o-1".to_string(),
      market_id: "mkt".to_string(),
      outcome: outcome.to_string(),
      side,
      price,
      qty,
      fee: dec!(0),
      executed_at: Utc::now(),
    }
  }

  #[test]
  fn test_upsert_and_lookup_market() {
    let mut store = MarketStore::new();
    store.upsert_market(Market::binary("mkt", "q?"));
    assert!(store.market("mkt").is_some());
    assert!(store.market("other").is_none());
    assert_eq!(store.markets().count(), 1);
  }

  #[test]
  fn test_buy_then_sell_nets_out() {
    let mut store = MarketStore::new();
    store.apply_trade(&trade(OrderSide::Buy, dec!(0.50), dec!(10)));
    assert_eq!(store.qty("mkt", OUTCOME_YES), dec!(10));
    store.apply_trade(&trade(OrderSide::Sell, dec!(0.55), dec!(10)));
    assert_eq!(store.qty("mkt", OUTCOME_YES), dec!(0));
    // Bought at 5.00, sold at 5.50: cash is up 0.50.
    assert_eq!(store.cash(), dec!(0.50));
    assert_eq!(store.trade_count(), 2);
  }

  #[test]
  fn test_avg_price_blends_on_accumulation() {
    let mut store = MarketStore::new();
    store.apply_trade(&trade(OrderSide::Buy, dec!(0.40), dec!(10)));
    store.apply_trade(&trade(OrderSide::Buy, dec!(0.60), dec!(10)));
    let pos = store.position("mkt", OUTCOME_YES).unwrap();
    assert_eq!(pos.avg_price, dec!(0.50));
    assert_eq!(pos.qty, dec!(20));
  }

  #[test]
  fn test_crossing_flat_resets_entry() {
    let mut store = MarketStore::new();
    store.apply_trade(&trade(OrderSide::Buy, dec!(0.40), dec!(10)));
    store.apply_trade(&trade(OrderSide::Sell, dec!(0.45), dec!(25)));
    let pos = store.position("mkt", OUTCOME_YES).unwrap();
    assert_eq!(pos.qty, dec!(-15));
    assert_eq!(pos.avg_price, dec!(0.45));
  }

  #[test]
  fn test_net_yes_spans_both_outcomes() {
    let mut store = MarketStore::new();
    store.apply_trade(&trade_for(OUTCOME_YES, OrderSide::Buy, dec!(0.50), dec!(30)));
    store.apply_trade(&trade_for(OUTCOME_NO, OrderSide::Buy, dec!(0.50), dec!(10)));
    assert!((store.net_yes("mkt") - 20.0).abs() < 1e-12);
  }

  #[test]
  fn test_fees_hit_cash() {
    let mut store = MarketStore::new();
    let mut t = trade(OrderSide::Buy, dec!(0.50), dec!(10));
    t.fee = dec!(0.10);
    store.apply_trade(&t);
    assert_eq!(store.cash(), dec!(-5.10));
  }

  #[test]
  fn test_net_yes_all_lists_touched_markets() {
    let mut store = MarketStore::new();
    store.apply_trade(&trade(OrderSide::Buy, dec!(0.50), dec!(5)));
    let all = store.net_yes_all();
    assert_eq!(all, vec![("mkt".to_string(), 5.0)]);
  }
}
