//! Price grid rounding.
//!
//! Quotes must land on the venue's price grid: bids are rounded down,
//! asks are rounded up, and everything stays inside [0, 1]. A small
//! epsilon is applied to the quotient before flooring/ceiling so that
//! prices already on the grid survive representation error instead of
//! slipping a full tick.

use crate::domain::error::{QuoteError, QuoteResult, ensure_finite};

/// Guard against f64 representation error when a price sits exactly on
/// the grid. Covers quotient error for tick sizes down to 1e-3.
const GRID_EPS: f64 = 1e-12;

/// Rounds prices onto a fixed tick grid, clamped to [0, 1].
///
/// The tick size is validated once at construction; rounding calls are
/// then infallible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRounder {
    tick: f64,
}

impl TickRounder {
    /// Creates a rounder for the given tick size.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if the tick is not finite or not
    /// strictly positive.
    pub fn new(tick: f64) -> QuoteResult<Self> {
        ensure_finite(tick, "tick size")?;
        if tick <= 0.0 {
            return Err(QuoteError::config(format!(
                "tick size must be > 0, got {tick}"
            )));
        }
        Ok(Self { tick })
    }

    /// The configured tick size.
    pub fn tick(&self) -> f64 {
        self.tick
    }

    /// Rounds down to the nearest grid price, clamped to [0, 1].
    ///
    /// Exact for inputs already on the grid.
    pub fn floor(&self, x: f64) -> f64 {
        ((x / self.tick + GRID_EPS).floor() * self.tick).clamp(0.0, 1.0)
    }

    /// Rounds up to the nearest grid price, clamped to [0, 1].
    ///
    /// Exact for inputs already on the grid.
    pub fn ceil(&self, x: f64) -> f64 {
        ((x / self.tick - GRID_EPS).ceil() * self.tick).clamp(0.0, 1.0)
    }

    /// Rounds to the nearest grid price, clamped to [0, 1].
    ///
    /// Used when synthesizing levels, not on the quoting path.
    pub fn nearest(&self, x: f64) -> f64 {
        ((x / self.tick).round() * self.tick).clamp(0.0, 1.0)
    }
}
