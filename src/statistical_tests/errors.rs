//! statistical_tests::errors — error types for goodness-of-fit tests.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for the Crow-AMSAA
//! goodness-of-fit routines (Cramér–von Mises and chi-square), together with
//! a conversion layer to Python exceptions for PyO3-based bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`GofResult`] and [`GofError`] as the canonical result and error
//!   types for the test statistics and their validation helpers.
//! - Attach human-readable `Display` messages that embed the offending
//!   value or index.
//! - Implement `From<GofError> for PyErr` mapping to `ValueError`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Test routines validate inputs up front and return [`GofResult<T>`]
//!   instead of panicking.
//! - `GofError` values are small and cheap to clone.
//!
//! Testing notes
//! -------------
//! - Unit tests verify that `Display` messages embed their payloads.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type GofResult<T> = Result<T, GofError>;

/// GofError — error conditions for the growth goodness-of-fit tests.
///
/// Variants
/// --------
/// - `InsufficientData(found)`
///   Fewer than two failure times (or intervals) were supplied.
/// - `InvalidData(value)`
///   A time or count is non-finite or non-positive.
/// - `UnsortedTimes(index)`
///   Failure times decrease at `index`.
/// - `InvalidShape(beta)`
///   The shape estimate is non-finite or non-positive.
/// - `InvalidTerminationTime { t_star, last_time }`
///   A time-terminated test needs `t_star > last_time`.
/// - `InvalidConfidence(c)`
///   The confidence level is outside (0, 1).
/// - `LengthMismatch { times, counts }`
///   Interval edges and counts differ in length.
/// - `ZeroExpected(interval)`
///   The fitted expected count of an interval is zero.
/// - `Distribution(text)`
///   A `statrs` distribution could not be built.
#[derive(Debug, Clone, PartialEq)]
pub enum GofError {
    //------ Input validation errors ------
    InsufficientData(usize),
    InvalidData(f64),
    UnsortedTimes(usize),
    InvalidShape(f64),
    InvalidTerminationTime { t_star: f64, last_time: f64 },
    InvalidConfidence(f64),
    LengthMismatch { times: usize, counts: usize },

    //------ Computation errors ------
    ZeroExpected(usize),
    Distribution(String),
}

impl std::error::Error for GofError {}

impl std::fmt::Display for GofError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GofError::InsufficientData(found) => {
                write!(f, "Need at least 2 failure times for a goodness-of-fit test, found {found}.")
            }
            GofError::InvalidData(value) => {
                write!(f, "Invalid data value: {value}. Must be finite and positive.")
            }
            GofError::UnsortedTimes(index) => {
                write!(f, "Failure times must be non-decreasing; violated at index {index}.")
            }
            GofError::InvalidShape(beta) => {
                write!(f, "Invalid shape estimate: {beta}. Must be finite and positive.")
            }
            GofError::InvalidTerminationTime { t_star, last_time } => write!(
                f,
                "Invalid termination time {t_star}: must exceed the last failure time {last_time}."
            ),
            GofError::InvalidConfidence(c) => {
                write!(f, "Invalid confidence {c}. Must satisfy 0 < c < 1.")
            }
            GofError::LengthMismatch { times, counts } => {
                write!(f, "Got {times} interval edges but {counts} counts.")
            }
            GofError::ZeroExpected(interval) => {
                write!(f, "Expected failure count is zero in interval {interval}.")
            }
            GofError::Distribution(text) => write!(f, "Distribution error: {text}"),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<GofError> for PyErr {
    fn from(err: GofError) -> PyErr {
        PyValueError::new_err(format!("GofError: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Embedding of payload values into `Display` messages.
    //
    // They intentionally DO NOT cover:
    // - The `From<GofError> for PyErr` conversion, which needs the Python C
    //   API.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `InvalidTerminationTime` reports both times.
    //
    // Given
    // -----
    // - t_star = 600, last_time = 620.
    //
    // Expect
    // ------
    // - The message contains "600" and "620".
    fn invalid_termination_time_includes_both_times() {
        // Arrange
        let err = GofError::InvalidTerminationTime { t_star: 600.0, last_time: 620.0 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("600") && msg.contains("620"), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that `UnsortedTimes` reports the index.
    //
    // Given
    // -----
    // - `GofError::UnsortedTimes(7)`.
    //
    // Expect
    // ------
    // - The message contains "7".
    fn unsorted_times_includes_index() {
        let msg = GofError::UnsortedTimes(7).to_string();
        assert!(msg.contains('7'), "Got: {msg}");
    }
}
