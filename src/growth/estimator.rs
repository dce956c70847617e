//! growth::estimator — Crow-AMSAA (power-law NHPP) parameter estimation.
//!
//! Purpose
//! -------
//! Produce point estimates and two-sided confidence bounds for the
//! Crow-AMSAA scale α and shape β from a validated [`FailureRecordStore`].
//!
//! Key behaviors
//! -------------
//! - Exact failure times use the closed-form MLE
//!   β̂ = N / (N ln T − Σ cᵢ ln tᵢ) and α̂ = N / (K T^β̂).
//! - Grouped counts solve the interval likelihood equation for β̂ through
//!   [`solve_grouped_shape`], then use the same α̂ relation.
//! - Bounds come from Crow's chi-square method or from the Fisher matrix,
//!   per [`BoundsMethod`].
//!
//! Invariants & assumptions
//! ------------------------
//! - At least two records are required; fewer yields `InsufficientData`.
//! - A positive `test_termination_time` must be at least the last failure
//!   time and marks the test as time terminated.
//! - K is the number of distinct `unit_id`s; all units share one β and α is
//!   a per-unit intensity scale.
//!
//! Conventions
//! -----------
//! - Every [`Bounded`] is ordered `lower <= point <= upper`.
//! - Grouped data always end at the last interval edge.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::growth::{
    bounds::{
        Bounded, Termination, crow_scale_bounds, crow_shape_bounds, fisher_bounds,
        fisher_variance_covariance,
    },
    errors::{GrowthError, GrowthResult},
    grouped::{GroupedShapeEquation, solve_grouped_shape},
    options::{BoundsMethod, GrowthOptions},
    records::FailureRecordStore,
};

/// Fitted Crow-AMSAA model.
///
/// Fields
/// ------
/// - `alpha`, `beta`: bounded estimates of scale and shape.
/// - `n_failures`: total failures N.
/// - `end_time`: the observation end T used in the fit.
/// - `n_units`: distinct test units K.
/// - `termination`: failure or time terminated.
/// - `confidence`: the two-sided level the bounds were built at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrowAmsaaFit {
    pub alpha: Bounded,
    pub beta: Bounded,
    pub n_failures: f64,
    pub end_time: f64,
    pub n_units: usize,
    pub termination: Termination,
    pub confidence: f64,
}

/// `CrowAmsaaEstimator` — maximum-likelihood fitting of the power-law NHPP.
///
/// Purpose
/// -------
/// Bind a validated [`GrowthOptions`] to the estimation routine so the same
/// configuration can be applied to several failure logs.
///
/// Notes
/// -----
/// - The estimator holds no state beyond its options; `estimate` is pure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrowAmsaaEstimator {
    options: GrowthOptions,
}

impl CrowAmsaaEstimator {
    /// Create an estimator after validating `options`.
    pub fn new(options: GrowthOptions) -> GrowthResult<Self> {
        options.validate()?;
        Ok(CrowAmsaaEstimator { options })
    }

    pub fn options(&self) -> &GrowthOptions {
        &self.options
    }

    /// Fit α and β to `store`.
    ///
    /// Parameters
    /// ----------
    /// - `store`: `&FailureRecordStore`
    ///   Exact failure times or grouped counts, depending on
    ///   `options.grouped`.
    ///
    /// Returns
    /// -------
    /// `GrowthResult<CrowAmsaaFit>`
    ///   Bounded α̂ and β̂ plus the fit context.
    ///
    /// Errors
    /// ------
    /// - `GrowthError::InsufficientData` for fewer than two records, or too
    ///   few failures for the requested bounds.
    /// - `GrowthError::InvalidTerminationTime` if a positive termination time
    ///   does not exceed the last failure. A time-terminated test ends
    ///   strictly after its last failure; the goodness-of-fit step uses the
    ///   same rule.
    /// - `GrowthError::InvalidInterval` for malformed grouped intervals.
    /// - `GrowthError::NonConvergence` when the grouped solve fails.
    /// - `GrowthError::DegenerateEstimate` when β̂ is not finite and positive.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_growth::growth::prelude::*;
    /// let store = FailureRecordStore::new(
    ///     [2.7, 10.3, 12.5, 30.6].iter().map(|&t| FailureRecord::exact(1, t)).collect(),
    /// )
    /// .unwrap();
    /// let fit = CrowAmsaaEstimator::new(GrowthOptions::default())
    ///     .unwrap()
    ///     .estimate(&store)
    ///     .unwrap();
    /// assert!(fit.beta.point > 0.0);
    /// ```
    pub fn estimate(&self, store: &FailureRecordStore) -> GrowthResult<CrowAmsaaFit> {
        if store.len() < 2 {
            return Err(GrowthError::InsufficientData { found: store.len() });
        }
        let last_time = store.last_time().ok_or(GrowthError::InsufficientData { found: 0 })?;
        let termination = Termination::from_termination_time(self.options.test_termination_time);
        let n = store.total_failures() as f64;
        let k = store.n_units() as f64;

        let (beta, end_time) = if self.options.grouped {
            store.validate_grouped()?;
            let equation = GroupedShapeEquation::new(&store.times(), &store.counts())?;
            (solve_grouped_shape(equation, &self.options.solver)?, last_time)
        } else {
            let end_time = self.exact_end_time(last_time)?;
            (exact_shape(store, n, end_time)?, end_time)
        };
        let alpha = n / (k * end_time.powf(beta));

        let confidence = self.options.confidence;
        let (alpha_b, beta_b) = match self.options.bounds {
            BoundsMethod::Crow => {
                let (b_lo, b_hi) = crow_shape_bounds(n, beta, confidence, termination)?;
                let (a_lo, a_hi) =
                    crow_scale_bounds(n, end_time, beta, k, confidence, termination)?;
                (Bounded::ordered(a_lo, alpha, a_hi), Bounded::ordered(b_lo, beta, b_hi))
            }
            BoundsMethod::Fisher => {
                let cov = fisher_variance_covariance(n, end_time, alpha, beta, k)?;
                let (a_lo, a_hi) = fisher_bounds(alpha, cov[(0, 0)], confidence)?;
                let (b_lo, b_hi) = fisher_bounds(beta, cov[(1, 1)], confidence)?;
                (Bounded::ordered(a_lo, alpha, a_hi), Bounded::ordered(b_lo, beta, b_hi))
            }
        };

        debug!(
            alpha,
            beta,
            n_failures = n,
            end_time,
            n_units = store.n_units(),
            grouped = self.options.grouped,
            "Crow-AMSAA fit"
        );

        Ok(CrowAmsaaFit {
            alpha: alpha_b,
            beta: beta_b,
            n_failures: n,
            end_time,
            n_units: store.n_units(),
            termination,
            confidence,
        })
    }

    fn exact_end_time(&self, last_time: f64) -> GrowthResult<f64> {
        let ttt = self.options.test_termination_time;
        if ttt > 0.0 {
            if ttt <= last_time {
                return Err(GrowthError::InvalidTerminationTime { value: ttt, last_time });
            }
            Ok(ttt)
        } else {
            Ok(last_time)
        }
    }
}

/// Fit with default solver settings and Crow bounds.
///
/// Shorthand for `CrowAmsaaEstimator::new(GrowthOptions::new(grouped,
/// confidence, 1, 0.0)?)?.estimate(store)`.
pub fn estimate(
    store: &FailureRecordStore, grouped: bool, confidence: f64,
) -> GrowthResult<CrowAmsaaFit> {
    CrowAmsaaEstimator::new(GrowthOptions::new(grouped, confidence, 1, 0.0)?)?.estimate(store)
}

// ---- Helper Methods ----

fn exact_shape(store: &FailureRecordStore, n: f64, end_time: f64) -> GrowthResult<f64> {
    let weighted_ln: f64 =
        store.pooled().iter().map(|r| f64::from(r.count) * r.right_time.ln()).sum();
    let beta = n / (n * end_time.ln() - weighted_ln);
    if !beta.is_finite() || beta <= 0.0 {
        return Err(GrowthError::DegenerateEstimate { beta });
    }
    Ok(beta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::records::FailureRecord;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact-data MLE and Crow bounds on the 22-failure reference log.
    // - Grouped-data MLE and bounds on the six-interval reference log.
    // - Fisher bounds, multi-unit scaling, and input guards.
    // -------------------------------------------------------------------------

    const TIMES: [f64; 22] = [
        2.7, 10.3, 12.5, 30.6, 57.0, 61.3, 80.0, 109.5, 125.0, 128.6, 143.8, 167.9, 229.2,
        296.7, 320.6, 328.2, 366.2, 396.7, 421.1, 438.2, 501.2, 620.0,
    ];

    fn exact_store() -> FailureRecordStore {
        FailureRecordStore::new(TIMES.iter().map(|&t| FailureRecord::exact(1, t)).collect())
            .unwrap()
    }

    fn grouped_store() -> FailureRecordStore {
        FailureRecordStore::from_tuples(vec![
            (1, 0.0, 62.0, 12),
            (1, 62.0, 100.0, 6),
            (1, 100.0, 187.0, 15),
            (1, 187.0, 210.0, 3),
            (1, 210.0, 350.0, 18),
            (1, 350.0, 500.0, 16),
        ])
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify the exact-data point estimates and Crow bounds.
    //
    // Given
    // -----
    // - 22 exact failures, failure terminated, c = 0.75.
    //
    // Expect
    // ------
    // - β̂ ≈ 0.6142104, α̂ ≈ 0.4239422, β ∈ [0.5107740, 0.8474288],
    //   α ∈ [0.3227920, 0.5292489].
    fn estimate_exact_matches_reference() {
        // Arrange
        let store = exact_store();

        // Act
        let fit = estimate(&store, false, 0.75).unwrap();

        // Assert
        assert_relative_eq!(fit.beta.point, 0.6142103999317297, max_relative = 1e-10);
        assert_relative_eq!(fit.alpha.point, 0.42394221488057504, max_relative = 1e-10);
        assert_relative_eq!(fit.beta.lower, 0.5107739935, max_relative = 1e-6);
        assert_relative_eq!(fit.beta.upper, 0.8474287961, max_relative = 1e-6);
        assert_relative_eq!(fit.alpha.lower, 0.3227920329, max_relative = 1e-6);
        assert_relative_eq!(fit.alpha.upper, 0.5292489370, max_relative = 1e-6);
        assert_eq!(fit.termination, Termination::Failure);
    }

    #[test]
    // Purpose
    // -------
    // Verify the grouped-data estimates and bounds.
    //
    // Given
    // -----
    // - Six intervals with 70 failures ending at 500.
    //
    // Expect
    // ------
    // - β̂ ≈ 0.8136085, α̂ ≈ 0.4458543, β ∈ [0.7231246, 0.9545687],
    //   α ∈ [0.3853772, 0.5077047].
    fn estimate_grouped_matches_reference() {
        // Arrange
        let store = grouped_store();

        // Act
        let fit = estimate(&store, true, 0.75).unwrap();

        // Assert
        assert_relative_eq!(fit.beta.point, 0.8136085396567743, max_relative = 1e-7);
        assert_relative_eq!(fit.alpha.point, 0.4458543376753151, max_relative = 1e-6);
        assert_relative_eq!(fit.beta.lower, 0.7231246075, max_relative = 1e-6);
        assert_relative_eq!(fit.beta.upper, 0.9545686623, max_relative = 1e-6);
        assert_relative_eq!(fit.alpha.lower, 0.3853771588, max_relative = 1e-6);
        assert_relative_eq!(fit.alpha.upper, 0.5077046703, max_relative = 1e-6);
        assert_eq!(fit.n_failures, 70.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify Fisher-matrix bounds on the exact reference log.
    //
    // Given
    // -----
    // - 22 exact failures, c = 0.9, `BoundsMethod::Fisher`.
    //
    // Expect
    // ------
    // - β ∈ [0.4673647, 0.8071950], α lower ≈ 0.1392834.
    fn estimate_with_fisher_bounds_matches_reference() {
        // Arrange
        let opts = GrowthOptions::new(false, 0.9, 1, 0.0).unwrap().with_bounds(BoundsMethod::Fisher);
        let estimator = CrowAmsaaEstimator::new(opts).unwrap();

        // Act
        let fit = estimator.estimate(&exact_store()).unwrap();

        // Assert
        assert_relative_eq!(fit.beta.lower, 0.46736466889703454, max_relative = 1e-7);
        assert_relative_eq!(fit.beta.upper, 0.8071949817571866, max_relative = 1e-7);
        assert_relative_eq!(fit.alpha.lower, 0.13928340594382746, max_relative = 1e-7);
        assert_relative_eq!(fit.alpha.upper, 1.2903690884062022, max_relative = 1e-7);
    }

    #[test]
    // Purpose
    // -------
    // Ensure fewer than two records are rejected.
    //
    // Given
    // -----
    // - A single exact failure.
    //
    // Expect
    // ------
    // - `GrowthError::InsufficientData { found: 1 }`.
    fn estimate_single_record_is_insufficient() {
        // Arrange
        let store = FailureRecordStore::new(vec![FailureRecord::exact(1, 5.0)]).unwrap();

        // Act
        let result = estimate(&store, false, 0.75);

        // Assert
        assert_eq!(result, Err(GrowthError::InsufficientData { found: 1 }));
    }

    #[test]
    // Purpose
    // -------
    // Verify that two units sharing a calendar halve the per-unit scale.
    //
    // Given
    // -----
    // - The reference log duplicated onto a second unit.
    //
    // Expect
    // ------
    // - β̂ is unchanged; α̂ equals the single-unit value (2N / (2 T^β̂)).
    fn estimate_two_units_share_shape() {
        // Arrange
        let records: Vec<FailureRecord> = TIMES
            .iter()
            .flat_map(|&t| [FailureRecord::exact(1, t), FailureRecord::exact(2, t)])
            .collect();
        let store = FailureRecordStore::new(records).unwrap();

        // Act
        let fit = estimate(&store, false, 0.75).unwrap();

        // Assert
        assert_eq!(fit.n_units, 2);
        assert_relative_eq!(fit.beta.point, 0.6142103999317297, max_relative = 1e-10);
        assert_relative_eq!(fit.alpha.point, 0.42394221488057504, max_relative = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a termination time before the last failure is rejected and a
    // later one switches to time-terminated bounds.
    //
    // Given
    // -----
    // - Termination times 600 and 650 on the reference log.
    //
    // Expect
    // ------
    // - 600 → `InvalidTerminationTime`; 650 → `Termination::Time`, T = 650.
    fn estimate_respects_termination_time() {
        // Arrange
        let early = CrowAmsaaEstimator::new(GrowthOptions::new(false, 0.75, 1, 600.0).unwrap());
        let late = CrowAmsaaEstimator::new(GrowthOptions::new(false, 0.75, 1, 650.0).unwrap());

        // Act
        let r_early = early.unwrap().estimate(&exact_store());
        let r_late = late.unwrap().estimate(&exact_store()).unwrap();

        // Assert
        assert_eq!(
            r_early,
            Err(GrowthError::InvalidTerminationTime { value: 600.0, last_time: 620.0 })
        );
        assert_eq!(r_late.termination, Termination::Time);
        assert_eq!(r_late.end_time, 650.0);
        assert!(r_late.beta.point < 0.6142103999317297);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a termination time equal to the last failure is rejected, so
    // the fit and the Type I Cramér–von Mises step agree.
    //
    // Given
    // -----
    // - Termination time 620 on the reference log, whose last failure is
    //   at 620.
    //
    // Expect
    // ------
    // - `InvalidTerminationTime { value: 620, last_time: 620 }`.
    fn estimate_rejects_termination_at_last_failure() {
        // Arrange
        let estimator =
            CrowAmsaaEstimator::new(GrowthOptions::new(false, 0.9, 1, 620.0).unwrap()).unwrap();

        // Act
        let result = estimator.estimate(&exact_store());

        // Assert
        assert_eq!(
            result,
            Err(GrowthError::InvalidTerminationTime { value: 620.0, last_time: 620.0 })
        );
    }
}
