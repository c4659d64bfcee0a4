//! Logarithmic Market Scoring Rule (LMSR) pricing.
//!
//! Converts outstanding outcome quantities into probabilities via the
//! softmax of `q_i / b`, where `b` is the liquidity parameter:
//! - Higher `b` = deeper market, prices move slowly with flow
//! - Lower `b` = shallow market, prices move fast
//!
//! All exponentials run through a max-shift (log-sum-exp) so that large
//! quantity imbalances cannot overflow. Reference: Hanson (2003),
//! "Combinatorial Information Market Design".

use crate::domain::error::{QuoteError, QuoteResult, ensure_finite};
use crate::domain::pricing::PricingModel;
use crate::domain::types::{
    OUTCOME_NO, OUTCOME_YES, Outcome, OutcomeQuantities, ProbabilityVector,
};

/// Keeps every emitted probability inside the open interval (0, 1).
/// Extreme imbalances underflow `exp` to an exact 0.0 otherwise.
const PROB_EPS: f64 = 1e-12;

/// LMSR pricing model.
#[derive(Debug, Clone)]
pub struct Lmsr {
    /// Liquidity parameter (b > 0)
    b: f64,
    /// Outcome set used when an empty quantity map is priced
    outcomes: Vec<Outcome>,
}

impl Lmsr {
    /// Creates an LMSR model over the given outcome set.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if `b` is not finite and strictly
    /// positive, or if the outcome set is empty.
    pub fn new(b: f64, outcomes: Vec<Outcome>) -> QuoteResult<Self> {
        ensure_finite(b, "liquidity b")?;
        if b <= 0.0 {
            return Err(QuoteError::config(format!(
                "LMSR liquidity b must be > 0, got {b}"
            )));
        }
        if outcomes.is_empty() {
            return Err(QuoteError::config(
                "LMSR outcome set must not be empty".to_string(),
            ));
        }
        Ok(Self { b, outcomes })
    }

    /// Creates a binary YES/NO model.
    pub fn binary(b: f64) -> QuoteResult<Self> {
        Self::new(b, vec![OUTCOME_YES.to_string(), OUTCOME_NO.to_string()])
    }

    /// The liquidity parameter.
    pub fn liquidity(&self) -> f64 {
        self.b
    }

    /// Prices every outcome: `p_i = exp(q_i/b) / sum_j exp(q_j/b)`.
    ///
    /// An empty quantity map prices to the uniform distribution over the
    /// configured outcome set. Output values lie in (0, 1) and sum to 1
    /// within 1e-9.
    ///
    /// # Errors
    /// Returns `InvalidInput` if any quantity is NaN or infinite; the
    /// check runs before any exponentiation.
    pub fn prices(&self, quantities: &OutcomeQuantities) -> QuoteResult<ProbabilityVector> {
        if quantities.is_empty() {
            let uniform = 1.0 / self.outcomes.len() as f64;
            return Ok(self
                .outcomes
                .iter()
                .map(|o| (o.clone(), uniform))
                .collect());
        }

        for (outcome, &q) in quantities {
            ensure_finite(q, &format!("quantity for {outcome}"))?;
        }

        // Log-sum-exp: shift by the max scaled quantity so the largest
        // exponent is exactly 0.
        let max_z = quantities
            .values()
            .map(|q| q / self.b)
            .fold(f64::NEG_INFINITY, f64::max);

        let weights: Vec<(Outcome, f64)> = quantities
            .iter()
            .map(|(o, &q)| (o.clone(), (q / self.b - max_z).exp()))
            .collect();
        let total: f64 = weights.iter().map(|(_, w)| w).sum();

        Ok(weights
            .into_iter()
            .map(|(o, w)| (o, (w / total).clamp(PROB_EPS, 1.0 - PROB_EPS)))
            .collect())
    }

    /// Binary shortcut: `p_yes = 1 / (1 + exp(-(q_yes - q_no)/b))`.
    ///
    /// Agrees with the two-outcome softmax of [`Self::prices`] within
    /// 1e-9 for all finite inputs.
    ///
    /// # Errors
    /// Returns `InvalidInput` for non-finite quantities.
    pub fn price_yes(&self, q_yes: f64, q_no: f64) -> QuoteResult<f64> {
        ensure_finite(q_yes, "q_yes")?;
        ensure_finite(q_no, "q_no")?;
        let z = (q_yes - q_no) / self.b;
        Ok((1.0 / (1.0 + (-z).exp())).clamp(PROB_EPS, 1.0 - PROB_EPS))
    }

    /// LMSR cost function: `C(q) = b * ln(sum_i exp(q_i/b))`.
    ///
    /// An empty map is costed as all-zero quantities over the configured
    /// outcomes, giving `b * ln(n)`.
    ///
    /// # Errors
    /// Returns `InvalidInput` for non-finite quantities.
    pub fn cost(&self, quantities: &OutcomeQuantities) -> QuoteResult<f64> {
        if quantities.is_empty() {
            return Ok(self.b * (self.outcomes.len() as f64).ln());
        }

        for (outcome, &q) in quantities {
            ensure_finite(q, &format!("quantity for {outcome}"))?;
        }

        let max_z = quantities
            .values()
            .map(|q| q / self.b)
            .fold(f64::NEG_INFINITY, f64::max);
        let sum_exp: f64 = quantities
            .values()
            .map(|q| (q / self.b - max_z).exp())
            .sum();
        Ok(self.b * (max_z + sum_exp.ln()))
    }

    /// Cost of trading `delta` contracts of one outcome from state `q`:
    /// `C(q + delta * e_outcome) - C(q)`.
    ///
    /// # Errors
    /// Returns `InvalidInput` for non-finite quantities or delta.
    pub fn trade_cost(
        &self,
        quantities: &OutcomeQuantities,
        outcome: &str,
        delta: f64,
    ) -> QuoteResult<f64> {
        ensure_finite(delta, "trade delta")?;
        let before = self.cost(quantities)?;
        let mut after_q = quantities.clone();
        *after_q.entry(outcome.to_string()).or_insert(0.0) += delta;
        let after = self.cost(&after_q)?;
        Ok(after - before)
    }
}

impl PricingModel for Lmsr {
    fn prices(&self, quantities: &OutcomeQuantities) -> QuoteResult<ProbabilityVector> {
        Self::prices(self, quantities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn quantities(pairs: &[(&str, f64)]) -> OutcomeQuantities {
        pairs.iter().map(|(o, q)| (o.to_string(), *q)).collect()
    }

    #[test]
    fn test_rejects_bad_liquidity() {
        assert!(Lmsr::binary(0.0).is_err());
        assert!(Lmsr::binary(-50.0).is_err());
        assert!(Lmsr::binary(f64::NAN).is_err());
        assert!(Lmsr::binary(100.0).is_ok());
    }

    #[test]
    fn test_rejects_empty_outcome_set() {
        assert!(Lmsr::new(100.0, vec![]).is_err());
    }

    #[test]
    fn test_equal_quantities_price_half() {
        let model = Lmsr::binary(100.0).unwrap();
        let p = model
            .prices(&quantities(&[("YES", 0.0), ("NO", 0.0)]))
            .unwrap();
        assert!((p["YES"] - 0.5).abs() < 1e-12);
        assert!((p["NO"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_map_prices_uniform() {
        let model = Lmsr::binary(100.0).unwrap();
        let p = model.prices(&BTreeMap::new()).unwrap();
        assert_eq!(p.len(), 2);
        assert!((p["YES"] - 0.5).abs() < 1e-12);

        let three = Lmsr::new(50.0, vec!["A".into(), "B".into(), "C".into()]).unwrap();
        let p3 = three.prices(&BTreeMap::new()).unwrap();
        assert!((p3["B"] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_prices_sum_to_one() {
        let model = Lmsr::binary(100.0).unwrap();
        let p = model
            .prices(&quantities(&[("YES", 50.0), ("NO", 30.0)]))
            .unwrap();
        let sum: f64 = p.values().sum();
        assert!((sum - 1.0).abs() < 1e-9, "prices must sum to 1, got {sum}");
    }

    #[test]
    fn test_more_yes_quantity_raises_yes_price() {
        let model = Lmsr::binary(100.0).unwrap();
        let p_flat = model
            .prices(&quantities(&[("YES", 0.0), ("NO", 0.0)]))
            .unwrap();
        let p_long = model
            .prices(&quantities(&[("YES", 50.0), ("NO", 0.0)]))
            .unwrap();
        assert!(p_long["YES"] > p_flat["YES"]);
    }

    #[test]
    fn test_binary_shortcut_known_value() {
        // q_yes - q_no = 100, b = 50 => p_yes = 1/(1+e^-2) ~ 0.8808
        let model = Lmsr::binary(50.0).unwrap();
        let p = model.price_yes(100.0, 0.0).unwrap();
        assert!((p - 0.880_797_077_977_882_3).abs() < 1e-9, "got {p}");
    }

    #[test]
    fn test_shortcut_matches_softmax() {
        let model = Lmsr::binary(75.0).unwrap();
        for (q_yes, q_no) in [
            (0.0, 0.0),
            (100.0, -40.0),
            (-2000.0, 15.0),
            (1e6, 0.0),
            (3.75, 3.75),
        ] {
            let shortcut = model.price_yes(q_yes, q_no).unwrap();
            let softmax = model
                .prices(&quantities(&[("YES", q_yes), ("NO", q_no)]))
                .unwrap();
            assert!(
                (shortcut - softmax["YES"]).abs() < 1e-9,
                "mismatch at ({q_yes}, {q_no}): {shortcut} vs {}",
                softmax["YES"]
            );
        }
    }

    #[test]
    fn test_extreme_imbalance_stays_in_open_interval() {
        let model = Lmsr::binary(1.0).unwrap();
        let p = model
            .prices(&quantities(&[("YES", 5000.0), ("NO", -5000.0)]))
            .unwrap();
        assert!(p["YES"] < 1.0);
        assert!(p["NO"] > 0.0);
        let sum: f64 = p.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_finite_quantities() {
        let model = Lmsr::binary(100.0).unwrap();
        assert!(
            model
                .prices(&quantities(&[("YES", f64::NAN), ("NO", 0.0)]))
                .is_err()
        );
        assert!(
            model
                .prices(&quantities(&[("YES", f64::INFINITY), ("NO", 0.0)]))
                .is_err()
        );
        assert!(model.price_yes(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_cost_of_flat_book_is_b_ln_n() {
        let model = Lmsr::binary(100.0).unwrap();
        let c = model.cost(&BTreeMap::new()).unwrap();
        assert!((c - 100.0 * 2.0_f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_trade_cost_positive_for_buys() {
        let model = Lmsr::binary(100.0).unwrap();
        let q = quantities(&[("YES", 0.0), ("NO", 0.0)]);
        let cost = model.trade_cost(&q, "YES", 10.0).unwrap();
        assert!(cost > 0.0);
        // Buying 10 YES at even odds costs a bit more than 5
        assert!(cost > 5.0 && cost < 6.0, "got {cost}");
    }

    #[test]
    fn test_trade_cost_matches_cost_difference() {
        let model = Lmsr::binary(80.0).unwrap();
        let q = quantities(&[("YES", 25.0), ("NO", -10.0)]);
        let direct = model.trade_cost(&q, "NO", 40.0).unwrap();
        let after = quantities(&[("YES", 25.0), ("NO", 30.0)]);
        let diff = model.cost(&after).unwrap() - model.cost(&q).unwrap();
        assert!((direct - diff).abs() < 1e-9);
    }
}
