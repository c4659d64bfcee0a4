//! Pricing model seam.
//!
//! The quoting strategy depends on this trait rather than a concrete
//! model, so the model variant is a construction-time configuration
//! choice instead of a code change.

use serde::{Deserialize, Serialize};

use crate::domain::error::QuoteResult;
use crate::domain::types::{OutcomeQuantities, ProbabilityVector};

/// Maps outstanding outcome quantities to a probability per outcome.
///
/// Implementations are pure, synchronous, and validated at
/// construction. Returned vectors satisfy the simplex invariant: every
/// value in (0, 1), sum equal to 1 within 1e-9.
pub trait PricingModel: Send + Sync {
    /// Computes the probability vector for the given quantities.
    ///
    /// # Errors
    /// Returns `InvalidInput` if any quantity is NaN or infinite.
    fn prices(&self, quantities: &OutcomeQuantities) -> QuoteResult<ProbabilityVector>;
}

/// Pricing model variant, selected by configuration.
///
/// Only `lmsr` exists today; other names fail TOML deserialization, so
/// a typo or an unimplemented model is caught at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Logarithmic market scoring rule
    Lmsr,
}

impl Default for ModelKind {
    fn default() -> Self {
        Self::Lmsr
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lmsr => write!(f, "lmsr"),
        }
    }
}

/// Where the strategy takes its base probability from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MidSource {
    /// Mid of best bid and best ask; the default. Falls back to a fair
    /// coin when either side is missing.
    Book,
    /// Price implied by the pricing model at current inventory.
    Model,
}

impl Default for MidSource {
    fn default() -> Self {
        Self::Book
    }
}
