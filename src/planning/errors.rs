//! planning::errors — error and degeneracy types for growth test planning.
//!
//! Purpose
//! -------
//! Planner and curve routines meet two kinds of trouble. Some inputs make a
//! formula meaningless (wrong array lengths, a zero divisor with no agreed
//! substitute); those are hard [`PlanError`]s. Others have a documented
//! substitute value, such as a management strategy of 100.0 when the fix
//! effectiveness is zero; those succeed with an [`Outcome`] whose
//! `recovered` list names each [`Degeneracy`] that was papered over.
//!
//! Key behaviors
//! -------------
//! - [`PlanError`] / [`PlanResult`] for hard failures.
//! - [`Outcome<T>`] for values that may carry recovered degeneracies.
//! - `From<argmin::core::Error>` for the growth-rate back-solve.
//! - With `python-bindings`, `From<PlanError> for PyErr` raises
//!   `ValueError`.

use argmin::core::{ArgminError, Error};
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};
use serde::{Deserialize, Serialize};

pub type PlanResult<T> = Result<T, PlanError>;

/// Program-level plan fields that curve synthesis may fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanField {
    FirstPhaseMtbf,
    MtbfGoal,
    TotalTestTime,
    FirstPhaseTestTime,
    AverageGrowthRate,
}

impl std::fmt::Display for PlanField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PlanField::FirstPhaseMtbf => "first-phase MTBF",
            PlanField::MtbfGoal => "goal MTBF",
            PlanField::TotalTestTime => "total test time",
            PlanField::FirstPhaseTestTime => "first-phase test time",
            PlanField::AverageGrowthRate => "average growth rate",
        };
        f.write_str(name)
    }
}

/// A zero or out-of-range input met by a planner formula.
///
/// `phase: None` refers to the program-level form of a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Degeneracy {
    ZeroTestTime { phase: usize },
    ZeroInitialMtbf { phase: Option<usize> },
    ZeroFinalMtbf { phase: Option<usize> },
    ZeroAverageMtbf { phase: usize },
    EqualMtbf { phase: Option<usize> },
    InvalidGrowthRate { phase: Option<usize>, value: f64 },
    ZeroFef { phase: Option<usize> },
    ZeroGrowthPotential,
    GrowthPotentialUndefined { ms_fef: f64 },
    NoExpectedFailures { phase: usize },
    Remediated { field: PlanField, value: f64 },
}

impl std::fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scope = |phase: &Option<usize>| match phase {
            Some(p) => format!("phase {p}"),
            None => "program".to_string(),
        };
        match self {
            Degeneracy::ZeroTestTime { phase } => write!(f, "phase {phase} has zero test time"),
            Degeneracy::ZeroInitialMtbf { phase } => {
                write!(f, "{} initial MTBF is zero", scope(phase))
            }
            Degeneracy::ZeroFinalMtbf { phase } => {
                write!(f, "{} final MTBF is zero", scope(phase))
            }
            Degeneracy::ZeroAverageMtbf { phase } => {
                write!(f, "phase {phase} average MTBF is zero")
            }
            Degeneracy::EqualMtbf { phase } => {
                write!(f, "{} initial and final MTBF are equal", scope(phase))
            }
            Degeneracy::InvalidGrowthRate { phase, value } => {
                write!(f, "{} growth rate {value} must lie in (0, 1)", scope(phase))
            }
            Degeneracy::ZeroFef { phase } => {
                write!(f, "{} fix effectiveness factor is zero", scope(phase))
            }
            Degeneracy::ZeroGrowthPotential => write!(f, "growth potential MTBF is zero"),
            Degeneracy::GrowthPotentialUndefined { ms_fef } => {
                write!(f, "ms * fef = {ms_fef} leaves the growth potential undefined")
            }
            Degeneracy::NoExpectedFailures { phase } => {
                write!(f, "phase {phase} has no expected failures")
            }
            Degeneracy::Remediated { field, value } => {
                write!(f, "{field} was missing and set to {value}")
            }
        }
    }
}

/// A computed value plus the degeneracies recovered while computing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<T> {
    pub value: T,
    pub recovered: Vec<Degeneracy>,
}

impl<T> Outcome<T> {
    /// A value computed without substitutions.
    pub fn clean(value: T) -> Self {
        Outcome { value, recovered: Vec::new() }
    }

    /// A substitute value standing in for a degenerate calculation.
    pub fn recovered(value: T, degeneracy: Degeneracy) -> Self {
        Outcome { value, recovered: vec![degeneracy] }
    }

    /// `true` when no substitution was needed.
    pub fn is_clean(&self) -> bool {
        self.recovered.is_empty()
    }
}

/// PlanError — hard failures of planner and curve routines.
///
/// Variants
/// --------
/// - `InvalidPhaseCount { n_phases }`: a plan needs at least one phase.
/// - `LengthMismatch { field, expected, found }`: a per-phase array does
///   not have `n_phases` entries.
/// - `PhaseOutOfRange { phase, n_phases }`: a phase index past the end.
/// - `DegenerateInput(Degeneracy)`: a zero divisor with no documented
///   substitute.
/// - `InvalidParameter { text }`, `Solver { text }`: root-solver failures.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    InvalidPhaseCount { n_phases: usize },
    LengthMismatch { field: &'static str, expected: usize, found: usize },
    PhaseOutOfRange { phase: usize, n_phases: usize },
    DegenerateInput(Degeneracy),
    InvalidParameter { text: String },
    Solver { text: String },
}

impl std::error::Error for PlanError {}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::InvalidPhaseCount { n_phases } => {
                write!(f, "Invalid number of phases {n_phases}: must be at least 1")
            }
            PlanError::LengthMismatch { field, expected, found } => {
                write!(f, "Plan field '{field}' has {found} entries, expected {expected}")
            }
            PlanError::PhaseOutOfRange { phase, n_phases } => {
                write!(f, "Phase {phase} is out of range for a plan with {n_phases} phases")
            }
            PlanError::DegenerateInput(d) => write!(f, "Degenerate plan input: {d}"),
            PlanError::InvalidParameter { text } => write!(f, "Invalid parameter: {text}"),
            PlanError::Solver { text } => write!(f, "Root solver error: {text}"),
        }
    }
}

impl From<Error> for PlanError {
    fn from(original_err: Error) -> Self {
        match original_err.downcast() {
            Ok(ArgminError::InvalidParameter { text }) => PlanError::InvalidParameter { text },
            Ok(other) => PlanError::Solver { text: other.to_string() },
            Err(err) => PlanError::Solver { text: err.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<PlanError> for PyErr {
    fn from(err: PlanError) -> PyErr {
        PyValueError::new_err(format!("PlanError: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover `Display` payloads and the `Outcome` helpers.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that a degenerate-input error names the phase.
    //
    // Given
    // -----
    // - `PlanError::DegenerateInput(ZeroTestTime { phase: 3 })`.
    //
    // Expect
    // ------
    // - The message contains "phase 3".
    fn degenerate_input_display_names_phase() {
        // Arrange
        let err = PlanError::DegenerateInput(Degeneracy::ZeroTestTime { phase: 3 });

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("phase 3"), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Verify `Outcome::clean` and `Outcome::recovered`.
    //
    // Given
    // -----
    // - A clean value and a value recovered from `ZeroGrowthPotential`.
    //
    // Expect
    // ------
    // - Only the first reports `is_clean`.
    fn outcome_reports_recovery() {
        let clean = Outcome::clean(1.0);
        let rec = Outcome::recovered(100.0, Degeneracy::ZeroGrowthPotential);
        assert!(clean.is_clean());
        assert!(!rec.is_clean());
        assert_eq!(rec.recovered, vec![Degeneracy::ZeroGrowthPotential]);
    }
}
