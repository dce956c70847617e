//! statistical_tests::chi_square — chi-square tests for the Crow-AMSAA fit.
//!
//! Purpose
//! -------
//! Provide the two chi-square checks used in growth analysis:
//! - for exact failure times, the pivotal statistic 2N/β̂, which follows a
//!   χ² distribution with 2(N − 1) (failure terminated) or 2N (time
//!   terminated) degrees of freedom;
//! - for grouped data, Pearson's statistic over the recorded intervals with
//!   expected counts θᵢ = K α̂ (tᵢ^β̂ − tᵢ₋₁^β̂).
//!
//! Key behaviors
//! -------------
//! - [`ChiSquareOutcome::exact`] and [`ChiSquareOutcome::grouped`] return
//!   the statistic, degrees of freedom, `(lower, upper)` critical values and
//!   the reject decision.
//! - Termination mode only changes the degrees of freedom, never the exact
//!   data statistic.
//!
//! Conventions
//! -----------
//! - Exact data: critical values are χ²⁻¹((1 − c)/2) and χ²⁻¹(c + (1 − c)/2);
//!   the fit is rejected when the statistic falls outside them.
//! - Grouped data: critical values are χ²⁻¹(1 − c) and χ²⁻¹(c) with k − 1
//!   degrees of freedom; the fit is rejected above the upper value.
//! - Critical values are always reported in `(lower, upper)` order.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::statistical_tests::{
    errors::{GofError, GofResult},
    validation::{validate_confidence, validate_counts, validate_times},
};

/// Result of a chi-square goodness-of-fit test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareOutcome {
    pub statistic: f64,
    pub df: f64,
    /// `(lower, upper)`.
    pub critical_values: (f64, f64),
    pub reject: bool,
}

impl ChiSquareOutcome {
    /// Chi-square test of β̂ for exact failure times.
    ///
    /// Parameters
    /// ----------
    /// - `n_failures`: total failures N (must exceed 1).
    /// - `beta`: shape point estimate.
    /// - `confidence`: two-sided level.
    /// - `time_terminated`: `true` when the test ended at a fixed time.
    ///
    /// Errors
    /// ------
    /// - `GofError::InsufficientData` when N < 2.
    /// - `GofError::InvalidShape` for a non-positive β̂.
    /// - `GofError::InvalidConfidence` outside (0, 1).
    pub fn exact(
        n_failures: f64, beta: f64, confidence: f64, time_terminated: bool,
    ) -> GofResult<Self> {
        validate_confidence(confidence)?;
        if !(n_failures >= 2.0) {
            return Err(GofError::InsufficientData(n_failures.max(0.0) as usize));
        }
        if !beta.is_finite() || beta <= 0.0 {
            return Err(GofError::InvalidShape(beta));
        }
        let statistic = 2.0 * n_failures / beta;
        let df = if time_terminated { 2.0 * n_failures } else { 2.0 * (n_failures - 1.0) };
        let tail = (1.0 - confidence) / 2.0;
        let lower = chi_squared_inverse(tail, df)?;
        let upper = chi_squared_inverse(confidence + tail, df)?;
        Ok(ChiSquareOutcome {
            statistic,
            df,
            critical_values: (lower, upper),
            reject: statistic < lower || statistic > upper,
        })
    }

    /// Pearson chi-square test over grouped intervals.
    ///
    /// Parameters
    /// ----------
    /// - `edges`: interval right edges, ascending; the first interval starts
    ///   at 0.
    /// - `counts`: observed failures per interval.
    /// - `alpha`, `beta`: fitted per-unit scale and shape.
    /// - `n_units`: number of units K sharing the intervals.
    /// - `confidence`: test level.
    ///
    /// Errors
    /// ------
    /// - Input errors from the validators.
    /// - `GofError::ZeroExpected(i)` when an interval's expected count is 0.
    pub fn grouped(
        edges: &[f64], counts: &[f64], alpha: f64, beta: f64, n_units: f64, confidence: f64,
    ) -> GofResult<Self> {
        validate_confidence(confidence)?;
        validate_times(edges, beta)?;
        validate_counts(edges, counts)?;

        let mut statistic = 0.0;
        let mut prev_pow = 0.0;
        for (i, (&t, &f)) in edges.iter().zip(counts).enumerate() {
            let t_pow = t.powf(beta);
            let expected = n_units * alpha * (t_pow - prev_pow);
            if !(expected > 0.0) {
                return Err(GofError::ZeroExpected(i));
            }
            statistic += (f - expected).powi(2) / expected;
            prev_pow = t_pow;
        }

        let df = (edges.len() - 1) as f64;
        let lower = chi_squared_inverse(1.0 - confidence, df)?;
        let upper = chi_squared_inverse(confidence, df)?;
        Ok(ChiSquareOutcome {
            statistic,
            df,
            critical_values: (lower.min(upper), lower.max(upper)),
            reject: statistic > lower.max(upper),
        })
    }
}

// ---- Helper Methods ----

fn chi_squared_inverse(p: f64, df: f64) -> GofResult<f64> {
    let dist = ChiSquared::new(df).map_err(|e| GofError::Distribution(e.to_string()))?;
    Ok(dist.inverse_cdf(p))
}
