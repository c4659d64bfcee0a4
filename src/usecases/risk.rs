//! Risk Controls - Order Gates and Kill Switch
//!
//! Pre-trade gates applied by the driver between quoting and routing:
//! - Per-order notional cap
//! - Per-market position cap (post-fill projection)
//! - Latched kill switch on mark-to-market loss
//!
//! Plus exposure helpers for marking a binary book. The quoting core
//! itself never consults these; risk is driver policy.

use tracing::warn;

use crate::config::RiskConfig;
use crate::domain::types::{Order, OrderSide, ProbabilityVector};

/// Static order gates: notional and position caps.
#[derive(Debug, Clone)]
pub struct RiskLimits {
  /// Maximum notional (price * qty) per order.
  max_order_notional: f64,
  /// Maximum absolute net position per market, in contracts.
  max_position: f64,
}

impl RiskLimits {
  /// Creates limits from config.
  pub fn new(config: &RiskConfig) -> Self {
    Self {
      max_order_notional: config.max_order_notional,
      max_position: config.max_position,
    }
  }

  /// True if the order's notional is within the per-order cap.
  pub fn within_notional(&self, order: &Order) -> bool {
    order.price * order.qty <= self.max_order_notional
  }

  /// True if filling the whole order would keep the net position
  /// within the per-market cap.
  pub fn within_position(&self, net_yes: f64, order: &Order) -> bool {
    let signed = match order.side {
      OrderSide::Buy => order.qty,
      OrderSide::Sell => -order.qty,
    };
    (net_yes + signed).abs() <= self.max_position
  }

  /// Applies both gates; logs the first violated one.
  pub fn allow_order(&self, net_yes: f64, order: &Order) -> bool {
    if !self.within_notional(order) {
      warn!(
        market = %order.market_id,
        notional = order.price * order.qty,
        cap = self.max_order_notional,
        "order blocked: notional cap"
      );
      return false;
    }
    if !self.within_position(net_yes, order) {
      warn!(
        market = %order.market_id,
        net_yes,
        qty = order.qty,
        cap = self.max_position,
        "order blocked: position cap"
      );
      return false;
    }
    true
  }
}

/// Latched loss trigger: once the mark-to-market loss breaches the
/// limit, trading stops for the rest of the run.
#[derive(Debug, Clone)]
pub struct KillSwitch {
  /// Loss (positive number) that trips the switch.
  max_loss: f64,
  /// Whether the switch has latched.
  triggered: bool,
}

impl KillSwitch {
  /// Creates a switch tripping at the given loss.
  pub fn new(max_loss: f64) -> Self {
    Self {
      max_loss,
      triggered: false,
    }
  }

  /// Feeds the current portfolio PnL. Trips (and latches) when
  /// `pnl <= -max_loss`. Returns the latched state.
  pub fn check(&mut self, pnl: f64) -> bool {
    if !self.triggered && pnl <= -self.max_loss {
      self.triggered = true;
      warn!(pnl, max_loss = self.max_loss, "kill switch tripped");
    }
    self.triggered
  }

  /// Whether the switch has latched.
  pub fn is_triggered(&self) -> bool {
    self.triggered
  }
}

/// Net directional exposure of a binary position, in contracts:
/// long YES counts positive, long NO counts negative.
pub fn delta_binary(qty_yes: f64, qty_no: f64) -> f64 {
  qty_yes - qty_no
}

/// Mark-to-market value of a binary position at the given YES mid.
pub fn portfolio_value_binary(qty_yes: f64, qty_no: f64, mid_yes: f64) -> f64 {
  qty_yes * mid_yes + qty_no * (1.0 - mid_yes)
}

/// Shannon entropy of a probability vector in nats. Zero probabilities
/// contribute zero. Maximal for the uniform distribution, so a low
/// value flags a market the model considers nearly decided.
pub fn entropy(probs: &ProbabilityVector) -> f64 {
  probs
    .values()
    .filter(|&&p| p > 0.0)
    .map(|&p| -p * p.ln())
    .sum()
}
