//! Typed errors for the quoting core.
//!
//! Two failure classes exist: bad configuration, caught once at
//! construction, and bad input data, caught at the call boundary before
//! any arithmetic runs. Degenerate but recoverable conditions (empty
//! book, skew saturation, sub-tick spread) are not errors; the core
//! repairs them locally and reports them through the observer port.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    /// A construction-time parameter is out of range. Fatal: the
    /// component refuses to construct rather than quote incorrectly.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A runtime input (quantity, book price, inventory delta) is NaN
    /// or infinite. Rejected before it can poison downstream math.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl QuoteError {
    /// Shorthand for configuration failures.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Shorthand for input rejections.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

pub type QuoteResult<T> = std::result::Result<T, QuoteError>;

/// Returns an `InvalidInput` error if `value` is NaN or infinite.
///
/// `what` names the offending field in the error message.
pub fn ensure_finite(value: f64, what: &str) -> QuoteResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(QuoteError::input(format!("{what} is not finite: {value}")))
    }
}
