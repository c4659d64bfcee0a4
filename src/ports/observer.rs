//! Observer Port - Quoting Telemetry Interface
//!
//! The quoting core recovers from degenerate inputs (empty books, skew
//! saturation, sub-tick spreads) without erroring. Those recoveries are
//! still worth counting, so the core reports them through this port.
//!
//! Key design decisions:
//! - Synchronous and non-blocking: the quoting path never awaits
//! - Injected at construction with a no-op default, so the core has
//!   no hard metrics dependency

/// A single countable event on the quoting or routing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteEvent {
  /// Book had fewer than two sides; mid fell back to 0.5.
  EmptyBookFallback,
  /// Inventory skew ran past the interior margin and was clamped.
  SkewSaturated,
  /// Tick rounding collapsed the spread; quote was widened to repair
  /// ordering. Carries the number of widening steps taken.
  OrderingRepaired { steps: u32 },
  /// A quote was produced successfully.
  QuoteEmitted,
  /// The router dropped an order because the rate limit was exhausted.
  OrderThrottled,
  /// The kill switch latched and trading stopped.
  KillSwitchTripped,
}

/// Sink for quoting telemetry.
///
/// Implementations must be cheap and non-blocking; they run inline on
/// the quoting path.
pub trait QuoteObserver: Send + Sync + 'static {
  /// Records one event occurrence.
  fn record(&self, event: QuoteEvent);
}

/// Default observer that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl QuoteObserver for NoopObserver {
  fn record(&self, _event: QuoteEvent) {}
}
