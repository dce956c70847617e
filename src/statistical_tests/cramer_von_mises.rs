//! statistical_tests::cramer_von_mises — Cramér–von Mises test for the
//! power-law NHPP.
//!
//! Purpose
//! -------
//! Test whether exact failure times are consistent with a fitted
//! Crow-AMSAA model. Under the model, (tᵢ/T)^β̄ behaves like ordered
//! uniform variates; the statistic measures their squared distance from the
//! uniform plotting positions.
//!
//! Key behaviors
//! -------------
//! - [`cramer_von_mises_statistic`] computes
//!   C = Σⱼ ((tⱼ/T)^β̄ − (2j − 1)/(2M))² + 1/(12M) with 0-based j over all
//!   failure times.
//! - Failure-terminated (Type II) tests use T = last time,
//!   β̄ = (N − 1)β/N and M = N − 1.
//! - Time-terminated (Type I) tests use T = t_star, β̄ = β and M = N.
//! - [`CvmOutcome::cramer_von_mises`] adds the tabulated critical value at
//!   significance 1 − confidence and the reject decision.
//!
//! Invariants & assumptions
//! ------------------------
//! - Times are positive, finite, and non-decreasing.
//! - Type I requires `t_star > last failure time`.
//!
//! Testing notes
//! -------------
//! - Unit tests reproduce the reference statistics 0.04488069 (Type II) and
//!   0.03383013 (Type I, t_star = 650) on the 22-failure log.

use serde::{Deserialize, Serialize};

use crate::statistical_tests::{
    cvm_table::critical_value,
    errors::{GofError, GofResult},
    validation::{validate_confidence, validate_times},
};

/// Result of a Cramér–von Mises goodness-of-fit test.
///
/// Fields
/// ------
/// - `statistic`: the Cramér–von Mises statistic C.
/// - `critical_value`: tabulated critical value at `significance`.
/// - `significance`: `1 − confidence`.
/// - `sample_size`: M used in the statistic and table lookup.
/// - `reject`: `statistic > critical_value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CvmOutcome {
    pub statistic: f64,
    pub critical_value: f64,
    pub significance: f64,
    pub sample_size: usize,
    pub reject: bool,
}

impl CvmOutcome {
    /// Run the test and compare against the critical value.
    ///
    /// Parameters
    /// ----------
    /// - `times`: `&[f64]`
    ///   Ordered exact failure times.
    /// - `beta`: `f64`
    ///   Shape point estimate β̂.
    /// - `t_star`: `Option<f64>`
    ///   Termination time for Type I tests; ignored when `type2` is true.
    /// - `type2`: `bool`
    ///   `true` for failure-terminated tests.
    /// - `confidence`: `f64`
    ///   Confidence level; significance is `1 − confidence`.
    ///
    /// Errors
    /// ------
    /// - Input errors from [`validate_times`] and [`validate_confidence`].
    /// - `GofError::InvalidTerminationTime` for a missing or early `t_star`.
    pub fn cramer_von_mises(
        times: &[f64], beta: f64, t_star: Option<f64>, type2: bool, confidence: f64,
    ) -> GofResult<Self> {
        validate_confidence(confidence)?;
        let statistic = cramer_von_mises_statistic(times, beta, t_star, type2)?;
        let sample_size = if type2 { times.len() - 1 } else { times.len() };
        let significance = 1.0 - confidence;
        let critical_value = critical_value(sample_size, significance);
        Ok(CvmOutcome {
            statistic,
            critical_value,
            significance,
            sample_size,
            reject: statistic > critical_value,
        })
    }
}

/// Cramér–von Mises statistic for exact failure times.
///
/// See the module docs for the Type I and Type II conventions.
///
/// Errors
/// ------
/// - `GofError::InsufficientData`, `InvalidData`, `UnsortedTimes`,
///   `InvalidShape` from [`validate_times`].
/// - `GofError::InvalidTerminationTime` when `type2` is false and `t_star`
///   is missing or not greater than the last failure time.
pub fn cramer_von_mises_statistic(
    times: &[f64], beta: f64, t_star: Option<f64>, type2: bool,
) -> GofResult<f64> {
    validate_times(times, beta)?;
    let n = times.len();
    let last_time = times[n - 1];

    let (end, beta_bar, m) = if type2 {
        let nf = n as f64;
        (last_time, (nf - 1.0) * beta / nf, nf - 1.0)
    } else {
        match t_star {
            Some(t) if t.is_finite() && t > last_time => (t, beta, n as f64),
            other => {
                return Err(GofError::InvalidTerminationTime {
                    t_star: other.unwrap_or(0.0),
                    last_time,
                });
            }
        }
    };

    let sum: f64 = times
        .iter()
        .enumerate()
        .map(|(j, &t)| {
            let u = (t / end).powf(beta_bar);
            let p = (2.0 * j as f64 - 1.0) / (2.0 * m);
            (u - p).powi(2)
        })
        .sum();
    Ok(sum + 1.0 / (12.0 * m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Reference statistics for Type II and Type I tests.
    // - The `t_star` guard for Type I tests.
    // - Critical-value lookup and the reject decision.
    // -------------------------------------------------------------------------

    const TIMES: [f64; 22] = [
        2.7, 10.3, 12.5, 30.6, 57.0, 61.3, 80.0, 109.5, 125.0, 128.6, 143.8, 167.9, 229.2,
        296.7, 320.6, 328.2, 366.2, 396.7, 421.1, 438.2, 501.2, 620.0,
    ];
    const BETA: f64 = 0.6142103999317297;

    #[test]
    // Purpose
    // -------
    // Verify the statistic on the reference log in both test modes.
    //
    // Given
    // -----
    // - 22 failure times, β̂ = 0.6142104.
    // - Type II, and Type I with t_star = 650.
    //
    // Expect
    // ------
    // - ≈ 0.04488069 and ≈ 0.03383013.
    fn statistic_matches_reference() {
        // Act
        let type2 = cramer_von_mises_statistic(&TIMES, BETA, None, true).unwrap();
        let type1 = cramer_von_mises_statistic(&TIMES, BETA, Some(650.0), false).unwrap();

        // Assert
        assert_relative_eq!(type2, 0.04488068809567748, max_relative = 1e-10);
        assert_relative_eq!(type1, 0.03383012858791218, max_relative = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Ensure Type I tests reject a missing or early termination time.
    //
    // Given
    // -----
    // - `t_star = None` and `t_star = Some(600.0)`.
    //
    // Expect
    // ------
    // - `InvalidTerminationTime` in both cases.
    fn type1_requires_late_termination_time() {
        let missing = cramer_von_mises_statistic(&TIMES, BETA, None, false);
        let early = cramer_von_mises_statistic(&TIMES, BETA, Some(600.0), false);
        assert!(matches!(missing, Err(GofError::InvalidTerminationTime { .. })));
        assert_eq!(
            early,
            Err(GofError::InvalidTerminationTime { t_star: 600.0, last_time: 620.0 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify the full outcome at 90% confidence.
    //
    // Given
    // -----
    // - Type II test on the reference log, confidence 0.9.
    //
    // Expect
    // ------
    // - M = 21, significance 0.1, critical value 0.172, not rejected.
    fn outcome_does_not_reject_reference_fit() {
        // Act
        let out = CvmOutcome::cramer_von_mises(&TIMES, BETA, None, true, 0.9).unwrap();

        // Assert
        assert_eq!(out.sample_size, 21);
        assert_relative_eq!(out.critical_value, 0.172, epsilon = 1e-9);
        assert!(!out.reject);
    }
}
