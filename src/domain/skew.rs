//! Inventory-driven probability skew.
//!
//! A net-long YES position should quote YES lower (encourage selling
//! back to flat); net-short quotes it higher. The shift is linear in
//! inventory, then clamped strictly inside (0, 1) and renormalized so
//! the pair stays on the probability simplex.

use crate::domain::error::{QuoteResult, ensure_finite};

/// Interior margin: skewed probabilities never get closer than this to
/// 0 or 1, so the spread transform always has room to work with.
pub const SKEW_EPS: f64 = 1e-6;

/// Result of applying inventory skew to a probability pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkewedPair {
    /// Adjusted YES probability, in (0, 1)
    pub p_yes: f64,
    /// Adjusted NO probability, `p_yes + p_no == 1`
    pub p_no: f64,
    /// True if clamping bound, i.e. the requested shift ran past the
    /// interior margin and was cut back
    pub saturated: bool,
}

/// Skews `(p_yes, p_no)` by `alpha * inv`:
/// `p_yes' = p_yes - alpha*inv`, `p_no' = p_no + alpha*inv`, each
/// clamped to `[SKEW_EPS, 1 - SKEW_EPS]`, then renormalized to sum 1.
///
/// For `alpha >= 0`, `p_yes'` is non-increasing in `inv`. If clamping
/// pins both values to the same boundary (possible only when the input
/// pair is itself degenerate), the result falls back to a fair coin
/// with `p_yes` offset by `SKEW_EPS` away from that boundary.
///
/// Pure function: no state, no I/O. The caller validates `alpha >= 0`
/// at construction time.
///
/// # Errors
/// Returns `InvalidInput` if any argument is NaN or infinite.
pub fn skew_probabilities(
    p_yes: f64,
    p_no: f64,
    inv: f64,
    alpha: f64,
) -> QuoteResult<SkewedPair> {
    ensure_finite(p_yes, "p_yes")?;
    ensure_finite(p_no, "p_no")?;
    ensure_finite(inv, "inventory")?;
    ensure_finite(alpha, "inventory_alpha")?;

    // The product may overflow to infinity for extreme inventory; the
    // clamp below absorbs that as full saturation.
    let shift = alpha * inv;
    let raw_yes = p_yes - shift;
    let raw_no = p_no + shift;

    let hi = 1.0 - SKEW_EPS;
    let clamped_yes = raw_yes.clamp(SKEW_EPS, hi);
    let clamped_no = raw_no.clamp(SKEW_EPS, hi);
    let saturated = clamped_yes != raw_yes || clamped_no != raw_no;

    let both_low = clamped_yes == SKEW_EPS && clamped_no == SKEW_EPS;
    let both_high = clamped_yes == hi && clamped_no == hi;
    if both_low || both_high {
        let p_yes = if both_low { 0.5 + SKEW_EPS } else { 0.5 - SKEW_EPS };
        return Ok(SkewedPair {
            p_yes,
            p_no: 1.0 - p_yes,
            saturated: true,
        });
    }

    let sum = clamped_yes + clamped_no;
    Ok(SkewedPair {
        p_yes: clamped_yes / sum,
        p_no: clamped_no / sum,
        saturated,
    })
}
