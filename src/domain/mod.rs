//! Domain layer - Core quoting logic and models.
//!
//! This module contains the pure pricing and quoting mathematics.
//! No I/O and no async here (hexagonal architecture inner ring).
//! All types are serializable and testable in isolation.

pub mod book;
pub mod error;
pub mod lmsr;
pub mod pricing;
pub mod skew;
pub mod ticks;
pub mod types;

// Re-export core types for convenience
pub use book::RollingBook;
pub use error::{QuoteError, QuoteResult};
pub use lmsr::Lmsr;
pub use pricing::{MidSource, ModelKind, PricingModel};
pub use skew::{SKEW_EPS, SkewedPair, skew_probabilities};
pub use ticks::TickRounder;
pub use types::{
    BookLevel, Market, MarketId, OUTCOME_NO, OUTCOME_YES, Order, OrderBookSnapshot, OrderId,
    OrderSide, Outcome, OutcomeQuantities, Position, ProbabilityVector, Quote, Trade,
};
