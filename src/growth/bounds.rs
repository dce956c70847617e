//! growth::bounds — confidence bounds for Crow-AMSAA quantities.
//!
//! Purpose
//! -------
//! Compute two-sided confidence bounds for the Crow-AMSAA shape (β) and
//! scale (α) parameters and for cumulative failure intensity, using either
//! Crow's chi-square method or Fisher-matrix (log-normal) bounds.
//!
//! Key behaviors
//! -------------
//! - [`crow_shape_bounds`], [`crow_scale_bounds`], and
//!   [`crow_cumulative_intensity_bounds`] use chi-square quantiles whose
//!   degrees of freedom depend on the [`Termination`] type.
//! - [`fisher_variance_covariance`] inverts the 2×2 observed information of
//!   the power-law NHPP with `nalgebra`; [`fisher_bounds`] turns a variance
//!   into log-normal bounds; [`fisher_mtbf_variance`] applies the delta
//!   method to cumulative or instantaneous MTBF.
//! - [`Bounded`] is the `(lower, point, upper)` triple returned to callers.
//!
//! Invariants & assumptions
//! ------------------------
//! - `0 < confidence < 1`; callers validate via `GrowthOptions`.
//! - Failure-terminated shape bounds need N > 2; time-terminated shape
//!   bounds need N > 1. Smaller counts return `InsufficientData`.
//! - Times and parameter estimates are finite and strictly positive.
//!
//! Conventions
//! -----------
//! - α_l = (1 − c)/2 is used for lower bounds and α_u = 1 − α_l for upper
//!   bounds.
//! - Fisher bounds use z = Φ⁻¹(c) on each side.
//! - `n_units` scales the expected-failure term so that α is a per-unit
//!   intensity when several test units share one calendar.
//!
//! Testing notes
//! -------------
//! - Unit tests compare against the 22-failure reference data set at
//!   c = 0.75 and c = 0.9 and check the N ≤ 2 guard.

use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

use crate::growth::errors::{GrowthError, GrowthResult};

/// Lower bound, point estimate, and upper bound of one quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounded {
    pub lower: f64,
    pub point: f64,
    pub upper: f64,
}

impl Bounded {
    pub fn new(lower: f64, point: f64, upper: f64) -> Self {
        Bounded { lower, point, upper }
    }

    /// Order three values so that `lower <= point <= upper`, keeping the
    /// middle value as the point estimate.
    pub fn ordered(a: f64, mid: f64, b: f64) -> Self {
        Bounded { lower: a.min(b), point: mid, upper: a.max(b) }
    }

    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.lower, self.point, self.upper)
    }
}

/// How the growth test ended.
///
/// - `Failure`: failure terminated (Type II); the last failure time closes
///   the observation window.
/// - `Time`: time terminated (Type I) at a fixed end time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    Failure,
    Time,
}

impl Termination {
    /// Type I when `test_termination_time > 0`, else Type II.
    pub fn from_termination_time(test_termination_time: f64) -> Self {
        if test_termination_time > 0.0 { Termination::Time } else { Termination::Failure }
    }
}

/// Chi-square quantile χ²(p, df).
///
/// Errors
/// ------
/// - `GrowthError::InvalidParameter` when `df <= 0` or `p` is outside
///   (0, 1).
pub fn chi_squared_quantile(p: f64, df: f64) -> GrowthResult<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(GrowthError::InvalidParameter {
            text: format!("chi-square probability {p} must lie in (0, 1)"),
        });
    }
    let dist = ChiSquared::new(df).map_err(|e| GrowthError::InvalidParameter {
        text: format!("chi-square degrees of freedom {df}: {e}"),
    })?;
    Ok(dist.inverse_cdf(p))
}

/// Standard normal quantile Φ⁻¹(p).
pub fn normal_quantile(p: f64) -> GrowthResult<f64> {
    let dist = Normal::new(0.0, 1.0)
        .map_err(|e| GrowthError::InvalidParameter { text: e.to_string() })?;
    Ok(dist.inverse_cdf(p))
}

#[inline]
fn tail_probabilities(confidence: f64) -> (f64, f64) {
    let alpha_l = (1.0 - confidence) / 2.0;
    (alpha_l, 1.0 - alpha_l)
}

/// Crow chi-square bounds on the shape parameter β.
///
/// Parameters
/// ----------
/// - `n`: `f64`
///   Total number of failures N.
/// - `beta`: `f64`
///   Point estimate β̂.
/// - `confidence`: `f64`
///   Two-sided confidence level.
/// - `termination`: [`Termination`]
///   Type II uses β̂·N·χ²(p, 2(N−1)) / (2(N−1)(N−2)); Type I uses
///   β̂·χ²(p, 2N) / (2(N−1)).
///
/// Returns
/// -------
/// `GrowthResult<(f64, f64)>`
///   `(lower, upper)`.
///
/// Errors
/// ------
/// - `GrowthError::InsufficientData` when N ≤ 2 (Type II) or N ≤ 1 (Type I).
pub fn crow_shape_bounds(
    n: f64, beta: f64, confidence: f64, termination: Termination,
) -> GrowthResult<(f64, f64)> {
    let (alpha_l, alpha_u) = tail_probabilities(confidence);
    match termination {
        Termination::Failure => {
            if n <= 2.0 {
                return Err(GrowthError::InsufficientData { found: n as usize });
            }
            let df = 2.0 * (n - 1.0);
            let scale = beta * n / (2.0 * (n - 1.0) * (n - 2.0));
            Ok((scale * chi_squared_quantile(alpha_l, df)?, scale * chi_squared_quantile(alpha_u, df)?))
        }
        Termination::Time => {
            if n <= 1.0 {
                return Err(GrowthError::InsufficientData { found: n as usize });
            }
            let df = 2.0 * n;
            let scale = beta / (2.0 * (n - 1.0));
            Ok((scale * chi_squared_quantile(alpha_l, df)?, scale * chi_squared_quantile(alpha_u, df)?))
        }
    }
}

/// Crow chi-square bounds on the scale parameter α.
///
/// The lower bound is χ²(α_l, 2N) / (2 K T^β̂) for both test types; the
/// upper bound uses 2N degrees of freedom for Type II and 2(N + 2) for
/// Type I.
pub fn crow_scale_bounds(
    n: f64, t_end: f64, beta: f64, n_units: f64, confidence: f64, termination: Termination,
) -> GrowthResult<(f64, f64)> {
    let (alpha_l, alpha_u) = tail_probabilities(confidence);
    let denom = 2.0 * n_units * t_end.powf(beta);
    let lower = chi_squared_quantile(alpha_l, 2.0 * n)? / denom;
    let upper_df = match termination {
        Termination::Failure => 2.0 * n,
        Termination::Time => 2.0 * (n + 2.0),
    };
    let upper = chi_squared_quantile(alpha_u, upper_df)? / denom;
    Ok((lower, upper))
}

/// Crow bounds on the cumulative failure intensity N(t)/t at time `t`,
/// where `n` is the cumulative failure count up to `t`.
pub fn crow_cumulative_intensity_bounds(
    n: f64, t: f64, confidence: f64, termination: Termination,
) -> GrowthResult<(f64, f64)> {
    let (alpha_l, alpha_u) = tail_probabilities(confidence);
    let lower = chi_squared_quantile(alpha_l, 2.0 * n)? / (2.0 * t);
    let upper_df = match termination {
        Termination::Failure => 2.0 * n,
        Termination::Time => 2.0 * (n + 2.0),
    };
    let upper = chi_squared_quantile(alpha_u, upper_df)? / (2.0 * t);
    Ok((lower, upper))
}

/// Variance-covariance matrix of (α̂, β̂) for the power-law NHPP.
///
/// Parameters
/// ----------
/// - `n`: total failures N.
/// - `t_end`: observation end time T.
/// - `alpha`, `beta`: point estimates.
/// - `n_units`: number of test units K sharing the calendar.
///
/// Returns
/// -------
/// `GrowthResult<Matrix2<f64>>`
///   `[[Var(α), Cov(α, β)], [Cov(α, β), Var(β)]]`, the inverse of the
///   observed information
///   `[[N/α², K T^β ln T], [K T^β ln T, N/β² + K α T^β ln² T]]`.
///
/// Errors
/// ------
/// - `GrowthError::ConditionViolated` if the information matrix is
///   singular.
pub fn fisher_variance_covariance(
    n: f64, t_end: f64, alpha: f64, beta: f64, n_units: f64,
) -> GrowthResult<Matrix2<f64>> {
    let ln_t = t_end.ln();
    let t_beta = t_end.powf(beta);
    let i_aa = n / (alpha * alpha);
    let i_ab = n_units * t_beta * ln_t;
    let i_bb = n / (beta * beta) + n_units * alpha * t_beta * ln_t * ln_t;
    let info = Matrix2::new(i_aa, i_ab, i_ab, i_bb);

    info.try_inverse().ok_or_else(|| GrowthError::ConditionViolated {
        text: "observed information matrix is singular".to_string(),
    })
}

/// Log-normal Fisher bounds `value · exp(∓ z √variance / value)` with
/// `z = Φ⁻¹(confidence)`.
pub fn fisher_bounds(value: f64, variance: f64, confidence: f64) -> GrowthResult<(f64, f64)> {
    let z = normal_quantile(confidence)?;
    let spread = z * variance.sqrt() / value;
    Ok((value * (-spread).exp(), value * spread.exp()))
}

/// MTBF flavour for [`fisher_mtbf_variance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtbfKind {
    Cumulative,
    Instantaneous,
}

/// Delta-method variance of cumulative or instantaneous MTBF at time `t`.
///
/// Cumulative MTBF is (1/α) t^(1−β); instantaneous MTBF is
/// (1/(αβ)) t^(1−β). Gradients with respect to (α, β) are combined with
/// the matrix from [`fisher_variance_covariance`] evaluated at
/// `(n, t, alpha, beta, n_units)`.
pub fn fisher_mtbf_variance(
    n: f64, t: f64, alpha: f64, beta: f64, n_units: f64, kind: MtbfKind,
) -> GrowthResult<f64> {
    let cov = fisher_variance_covariance(n, t, alpha, beta, n_units)?;
    let t_pow = t.powf(1.0 - beta);
    let ln_t = t.ln();
    let (d_alpha, d_beta) = match kind {
        MtbfKind::Cumulative => (-t_pow / (alpha * alpha), -t_pow * ln_t / alpha),
        MtbfKind::Instantaneous => (
            -t_pow / (alpha * alpha * beta),
            -t_pow / (alpha * beta * beta) - t_pow * ln_t / (alpha * beta),
        ),
    };
    Ok(d_beta * d_beta * cov[(1, 1)]
        + d_alpha * d_alpha * cov[(0, 0)]
        + 2.0 * d_beta * d_alpha * cov[(0, 1)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Crow shape/scale/intensity bounds on the 22-failure reference data.
    // - Fisher variance-covariance, parameter bounds, and MTBF variances.
    // - The N ≤ 2 guard for failure-terminated shape bounds.
    // -------------------------------------------------------------------------

    const N: f64 = 22.0;
    const T: f64 = 620.0;
    const ALPHA: f64 = 0.42394221488057504;
    const BETA: f64 = 0.6142103999317297;

    #[test]
    // Purpose
    // -------
    // Verify Type II Crow bounds on β and α at c = 0.75.
    //
    // Given
    // -----
    // - N = 22, T = 620, β̂ = 0.6142104.
    //
    // Expect
    // ------
    // - β ∈ [0.5107740, 0.8474288] and α ∈ [0.3227920, 0.5292489].
    fn crow_bounds_failure_terminated_match_reference() {
        // Act
        let (b_lo, b_hi) = crow_shape_bounds(N, BETA, 0.75, Termination::Failure).unwrap();
        let (a_lo, a_hi) = crow_scale_bounds(N, T, BETA, 1.0, 0.75, Termination::Failure).unwrap();

        // Assert
        assert_relative_eq!(b_lo, 0.5107739935, max_relative = 1e-6);
        assert_relative_eq!(b_hi, 0.8474287961, max_relative = 1e-6);
        assert_relative_eq!(a_lo, 0.3227920329, max_relative = 1e-6);
        assert_relative_eq!(a_hi, 0.5292489370, max_relative = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Verify Type I Crow shape bounds use 2N degrees of freedom.
    //
    // Given
    // -----
    // - N = 22, β̂ = 0.6142104, c = 0.75.
    //
    // Expect
    // ------
    // - β ∈ [0.4899330, 0.8032928].
    fn crow_shape_bounds_time_terminated_match_reference() {
        let (lo, hi) = crow_shape_bounds(N, BETA, 0.75, Termination::Time).unwrap();
        assert_relative_eq!(lo, 0.4899330018, max_relative = 1e-6);
        assert_relative_eq!(hi, 0.8032928138, max_relative = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Ensure failure-terminated shape bounds refuse N = 2, where the
    // denominator 2(N−1)(N−2) vanishes.
    //
    // Given
    // -----
    // - N = 2.
    //
    // Expect
    // ------
    // - `GrowthError::InsufficientData { found: 2 }`.
    fn crow_shape_bounds_two_failures_is_insufficient() {
        let result = crow_shape_bounds(2.0, 0.8, 0.75, Termination::Failure);
        assert_eq!(result, Err(GrowthError::InsufficientData { found: 2 }));
    }

    #[test]
    // Purpose
    // -------
    // Verify the cumulative-intensity bounds for the first failure.
    //
    // Given
    // -----
    // - One failure at t = 2.7, c = 0.75.
    //
    // Expect
    // ------
    // - Reciprocals give cumulative MTBF bounds 1.2984255 and 20.2199644.
    fn crow_cumulative_intensity_first_failure_matches_reference() {
        let (lo, hi) = crow_cumulative_intensity_bounds(1.0, 2.7, 0.75, Termination::Failure).unwrap();
        assert_relative_eq!(1.0 / hi, 1.2984255368, max_relative = 1e-6);
        assert_relative_eq!(1.0 / lo, 20.2199643614, max_relative = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Verify the Fisher variance-covariance matrix and the resulting
    // parameter bounds at c = 0.9.
    //
    // Given
    // -----
    // - N = 22, T = 620, the exact-data MLE (α̂, β̂).
    //
    // Expect
    // ------
    // - Var(β) ≈ 0.0171479, Cov ≈ −0.0467423.
    // - α lower ≈ 0.1392834, β lower ≈ 0.4673647.
    fn fisher_bounds_match_reference() {
        // Act
        let cov = fisher_variance_covariance(N, T, ALPHA, BETA, 1.0).unwrap();
        let (a_lo, _) = fisher_bounds(ALPHA, cov[(0, 0)], 0.9).unwrap();
        let (b_lo, b_hi) = fisher_bounds(BETA, cov[(1, 1)], 0.9).unwrap();

        // Assert
        assert_relative_eq!(cov[(1, 1)], 0.01714792797, max_relative = 1e-8);
        assert_relative_eq!(cov[(0, 1)], -0.04674232821, max_relative = 1e-8);
        assert_relative_eq!(a_lo, 0.13928340594, max_relative = 1e-7);
        assert_relative_eq!(b_lo, 0.46736466890, max_relative = 1e-7);
        assert_relative_eq!(b_hi, 0.80719498176, max_relative = 1e-7);
    }

    #[test]
    // Purpose
    // -------
    // Verify the delta-method MTBF variances.
    //
    // Given
    // -----
    // - N = 22, T = 620, α = 0.4239422, β = 0.6142104.
    //
    // Expect
    // ------
    // - Cumulative ≈ 36.1006787, instantaneous ≈ 191.3863557.
    fn fisher_mtbf_variance_matches_reference() {
        let cum = fisher_mtbf_variance(N, T, 0.4239422, 0.6142104, 1.0, MtbfKind::Cumulative).unwrap();
        let inst =
            fisher_mtbf_variance(N, T, 0.4239422, 0.6142104, 1.0, MtbfKind::Instantaneous).unwrap();
        assert_relative_eq!(cum, 36.1006787, max_relative = 1e-6);
        assert_relative_eq!(inst, 191.3863557, max_relative = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Verify `Bounded::ordered` swaps reversed bounds.
    fn bounded_ordered_sorts_outer_values() {
        let b = Bounded::ordered(3.0, 2.0, 1.0);
        assert_eq!(b.as_tuple(), (1.0, 2.0, 3.0));
    }
}
