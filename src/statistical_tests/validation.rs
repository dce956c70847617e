//! statistical_tests::validation — shared input guards for GoF statistics.
//!
//! Purpose
//! -------
//! Centralize basic input validation for the goodness-of-fit routines so
//! checks on sample size, finiteness, ordering, and the shape estimate are
//! written once.
//!
//! Invariants & assumptions
//! ------------------------
//! - Failure-time inputs have length at least 2.
//! - Every time is finite and strictly positive.
//! - Times are non-decreasing.
//! - The shape estimate β is finite and strictly positive.
//! - Confidence lies in (0, 1).
//!
//! Conventions
//! -----------
//! - This module only validates; it performs no I/O and allocates nothing
//!   beyond error construction.

use crate::statistical_tests::errors::{GofError, GofResult};

/// Validate ordered failure times and a shape estimate.
///
/// Parameters
/// ----------
/// - `times`: `&[f64]`
///   Cumulative failure times (or interval right edges) in time order.
/// - `beta`: `f64`
///   Shape point estimate.
///
/// Errors
/// ------
/// - `GofError::InsufficientData(n)` when `times.len() < 2`.
/// - `GofError::InvalidData(value)` for a non-finite or non-positive time.
/// - `GofError::UnsortedTimes(index)` when `times[index] < times[index-1]`.
/// - `GofError::InvalidShape(beta)` when β is non-finite or `<= 0`.
///
/// Examples
/// --------
/// ```rust
/// # use rust_growth::statistical_tests::validation::validate_times;
/// # use rust_growth::statistical_tests::errors::GofError;
/// assert!(validate_times(&[1.0, 2.0, 3.0], 0.6).is_ok());
/// assert_eq!(validate_times(&[2.0, 1.0], 0.6), Err(GofError::UnsortedTimes(1)));
/// ```
pub fn validate_times(times: &[f64], beta: f64) -> GofResult<()> {
    if times.len() < 2 {
        return Err(GofError::InsufficientData(times.len()));
    }
    for (i, &t) in times.iter().enumerate() {
        if !t.is_finite() || t <= 0.0 {
            return Err(GofError::InvalidData(t));
        }
        if i > 0 && t < times[i - 1] {
            return Err(GofError::UnsortedTimes(i));
        }
    }
    if !beta.is_finite() || beta <= 0.0 {
        return Err(GofError::InvalidShape(beta));
    }
    Ok(())
}

/// Reject confidence levels outside (0, 1).
pub fn validate_confidence(confidence: f64) -> GofResult<()> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(GofError::InvalidConfidence(confidence));
    }
    Ok(())
}

/// Validate interval counts against their edges: equal lengths, every count
/// finite and non-negative.
pub fn validate_counts(times: &[f64], counts: &[f64]) -> GofResult<()> {
    if times.len() != counts.len() {
        return Err(GofError::LengthMismatch { times: times.len(), counts: counts.len() });
    }
    if let Some(&bad) = counts.iter().find(|c| !c.is_finite() || **c < 0.0) {
        return Err(GofError::InvalidData(bad));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover every error branch of the validators and a simple
    // success path.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure each failure mode of `validate_times` maps to its variant.
    //
    // Given
    // -----
    // - One time; a zero time; a decreasing pair; a NaN shape.
    //
    // Expect
    // ------
    // - `InsufficientData(1)`, `InvalidData(0.0)`, `UnsortedTimes(1)`,
    //   `InvalidShape(NaN)`.
    fn validate_times_reports_each_violation() {
        // Act
        let short = validate_times(&[1.0], 0.5);
        let zero = validate_times(&[0.0, 1.0], 0.5);
        let unsorted = validate_times(&[3.0, 2.0], 0.5);
        let shape = validate_times(&[1.0, 2.0], f64::NAN);

        // Assert
        assert_eq!(short, Err(GofError::InsufficientData(1)));
        assert_eq!(zero, Err(GofError::InvalidData(0.0)));
        assert_eq!(unsorted, Err(GofError::UnsortedTimes(1)));
        assert!(matches!(shape, Err(GofError::InvalidShape(b)) if b.is_nan()));
    }

    #[test]
    // Purpose
    // -------
    // Verify the confidence and count validators.
    //
    // Given
    // -----
    // - Confidence 1.0; mismatched lengths; a negative count.
    //
    // Expect
    // ------
    // - `InvalidConfidence`, `LengthMismatch`, `InvalidData`.
    fn validate_confidence_and_counts() {
        assert_eq!(validate_confidence(1.0), Err(GofError::InvalidConfidence(1.0)));
        assert!(validate_confidence(0.9).is_ok());
        assert_eq!(
            validate_counts(&[1.0, 2.0], &[1.0]),
            Err(GofError::LengthMismatch { times: 2, counts: 1 })
        );
        assert_eq!(validate_counts(&[1.0], &[-1.0]), Err(GofError::InvalidData(-1.0)));
    }
}
