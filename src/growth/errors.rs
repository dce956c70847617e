//! growth::errors — error types for Crow-AMSAA estimation.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the failure-record
//! store, the session/configuration layer, the Crow-AMSAA estimator, and the
//! mean-value calculator. Estimation cannot produce a meaningful number from
//! missing or malformed data, so every failure here is a hard error.
//!
//! Key behaviors
//! -------------
//! - [`GrowthError`] enumerates input, configuration, convergence, and
//!   ordering failures with enough payload for logging.
//! - `From<argmin::core::Error>` maps solver failures from the grouped-data
//!   root finder into [`GrowthError`] variants.
//! - With `python-bindings`, `From<GrowthError> for PyErr` raises
//!   `ValueError` carrying the `Display` message.
//!
//! Invariants & assumptions
//! ------------------------
//! - Errors are small and cloneable; no variant owns record data.
//! - `NonConvergence` is only produced by iterative solves whose iteration
//!   count is capped by `RootSolverOptions`.
//!
//! Testing notes
//! -------------
//! - Unit tests check that `Display` messages embed their payloads and that
//!   argmin errors are mapped onto the matching variant.

use argmin::core::{ArgminError, Error};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::statistical_tests::errors::GofError;

pub type GrowthResult<T> = Result<T, GrowthError>;

/// GrowthError — failures raised while loading records or estimating the
/// Crow-AMSAA model.
///
/// Variants
/// --------
/// - `InsufficientData { found }`
///   Fewer than two failure records (or too few failures for the requested
///   bounds) were supplied.
/// - `NonConvergence { iterations, reason }`
///   The grouped-data shape equation could not be solved within the cap.
/// - `NotEstimated`
///   A downstream calculation ran before `beta_hat` was populated.
/// - `GoodnessOfFit(GofError)`
///   A goodness-of-fit test rejected its inputs.
/// - Configuration variants (`InvalidConfidence`, `InvalidPhaseCount`, ...)
///   Reject malformed options or records at construction time.
/// - Solver variants (`InvalidParameter`, `PotentialBug`, ...)
///   Mirror `argmin::core::ArgminError` so callers see the cause.
#[derive(Debug, Clone, PartialEq)]
pub enum GrowthError {
    // ---- Data ----
    InsufficientData {
        found: usize,
    },
    NonFiniteTime {
        index: usize,
        value: f64,
    },
    NonPositiveTime {
        index: usize,
        value: f64,
    },
    ZeroCount {
        index: usize,
    },
    InvalidInterval {
        index: usize,
        left: f64,
        right: f64,
    },
    UnorderedRecords {
        index: usize,
        unit_id: u32,
    },

    // ---- Configuration ----
    InvalidConfidence {
        value: f64,
    },
    InvalidPhaseCount {
        n_phases: usize,
    },
    InvalidTerminationTime {
        value: f64,
        last_time: f64,
    },
    InvalidSolverOptions {
        reason: &'static str,
    },
    InvalidBoundsMethod {
        name: String,
    },

    // ---- Estimation ----
    NotEstimated,
    NonConvergence {
        iterations: u64,
        reason: String,
    },
    DegenerateEstimate {
        beta: f64,
    },
    GoodnessOfFit(GofError),

    // ---- Argmin ----
    InvalidParameter {
        text: String,
    },
    NotImplemented {
        text: String,
    },
    NotInitialized {
        text: String,
    },
    ConditionViolated {
        text: String,
    },
    PotentialBug {
        text: String,
    },
    BackendError {
        text: String,
    },
}

impl std::error::Error for GrowthError {}

impl std::fmt::Display for GrowthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Data ----
            GrowthError::InsufficientData { found } => {
                write!(f, "Insufficient data: need at least 2 failure records, found {found}")
            }
            GrowthError::NonFiniteTime { index, value } => {
                write!(f, "Non-finite time at record {index}: {value}")
            }
            GrowthError::NonPositiveTime { index, value } => {
                write!(f, "Invalid time at record {index}: {value}, must be > 0")
            }
            GrowthError::ZeroCount { index } => {
                write!(f, "Record {index} has a failure count of zero")
            }
            GrowthError::InvalidInterval { index, left, right } => {
                write!(
                    f,
                    "Invalid interval at record {index}: right time {right} must exceed left time {left}"
                )
            }
            GrowthError::UnorderedRecords { index, unit_id } => {
                write!(
                    f,
                    "Record {index} for unit {unit_id} is not ordered by right time"
                )
            }

            // ---- Configuration ----
            GrowthError::InvalidConfidence { value } => {
                write!(f, "Invalid confidence {value}: must satisfy 0 < c < 1")
            }
            GrowthError::InvalidPhaseCount { n_phases } => {
                write!(f, "Invalid number of phases {n_phases}: must be at least 1")
            }
            GrowthError::InvalidTerminationTime { value, last_time } => {
                write!(
                    f,
                    "Invalid termination time {value}: must be 0 or exceed the last failure time {last_time}"
                )
            }
            GrowthError::InvalidSolverOptions { reason } => {
                write!(f, "Invalid root solver options: {reason}")
            }
            GrowthError::InvalidBoundsMethod { name } => {
                write!(f, "Invalid bounds method '{name}': valid options are 'crow' or 'fisher'")
            }

            // ---- Estimation ----
            GrowthError::NotEstimated => {
                write!(f, "Crow-AMSAA parameters have not been estimated yet")
            }
            GrowthError::NonConvergence { iterations, reason } => {
                write!(f, "Shape parameter did not converge after {iterations} iterations: {reason}")
            }
            GrowthError::DegenerateEstimate { beta } => {
                write!(f, "Degenerate shape estimate {beta}: must be finite and > 0")
            }
            GrowthError::GoodnessOfFit(err) => write!(f, "Goodness-of-fit test failed: {err}"),

            // ---- Argmin ----
            GrowthError::InvalidParameter { text } => write!(f, "Invalid parameter: {text}"),
            GrowthError::NotImplemented { text } => write!(f, "Not implemented: {text}"),
            GrowthError::NotInitialized { text } => write!(f, "Not initialized: {text}"),
            GrowthError::ConditionViolated { text } => write!(f, "Condition violated: {text}"),
            GrowthError::PotentialBug { text } => write!(f, "Potential bug: {text}"),
            GrowthError::BackendError { text } => write!(f, "Backend error: {text}"),
        }
    }
}

impl From<Error> for GrowthError {
    fn from(original_err: Error) -> Self {
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => GrowthError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => GrowthError::NotImplemented { text },
                ArgminError::NotInitialized { text } => GrowthError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => GrowthError::ConditionViolated { text },
                ArgminError::PotentialBug { text } => GrowthError::PotentialBug { text },
                other => GrowthError::BackendError { text: other.to_string() },
            },
            Err(err) => GrowthError::BackendError { text: err.to_string() },
        }
    }
}

impl From<GofError> for GrowthError {
    fn from(err: GofError) -> Self {
        GrowthError::GoodnessOfFit(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<GrowthError> for PyErr {
    fn from(err: GrowthError) -> PyErr {
        PyValueError::new_err(format!("GrowthError: {err}"))
    }
}
