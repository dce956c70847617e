//! Configuration for reliability growth analyses.
//!
//! Purpose
//! -------
//! Collect the user-facing knobs of a growth analysis run (grouping flag,
//! confidence level, phase count, termination time, bound method) and the
//! numerical settings of the grouped-data root solver in validated,
//! serializable option structs.
//!
//! Key behaviors
//! -------------
//! - [`GrowthOptions`] is the session configuration; `new` validates and
//!   `validate` re-checks values that arrived through deserialization.
//! - [`BoundsMethod`] selects Crow chi-square bounds or Fisher-matrix bounds
//!   and parses case-insensitively from strings.
//! - [`RootSolverOptions`] caps iterations and bracket expansions for the
//!   grouped-data shape solve.
//!
//! Conventions
//! -----------
//! - `test_termination_time == 0.0` means the test was failure terminated
//!   (Type II); a positive value means time terminated (Type I).
//! - Confidence is a fraction in (0, 1); percentages are not accepted.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::growth::errors::{GrowthError, GrowthResult};

/// Confidence-bound construction for the Crow-AMSAA parameters.
///
/// - `Crow`: chi-square bounds (default).
/// - `Fisher`: log-normal bounds from the inverse observed information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundsMethod {
    #[default]
    Crow,
    Fisher,
}

impl FromStr for BoundsMethod {
    type Err = GrowthError;

    /// Parse `"crow"` or `"fisher"` in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "crow" => Ok(BoundsMethod::Crow),
            "fisher" => Ok(BoundsMethod::Fisher),
            _ => Err(GrowthError::InvalidBoundsMethod { name: s.to_string() }),
        }
    }
}

/// Settings for the grouped-data shape root solve.
///
/// Fields
/// ------
/// - `tol`: absolute tolerance passed to Brent's method.
/// - `max_iters`: iteration cap; hitting it is reported as non-convergence.
/// - `max_bracket_expansions`: how many times the initial bracket may be
///   widened while searching for a sign change.
/// - `verbose`: attach a terminal observer when `obs_slog` is enabled.
///
/// Default: `tol = 1e-10`, `max_iters = 100`, `max_bracket_expansions = 60`,
/// `verbose = false`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootSolverOptions {
    pub tol: f64,
    pub max_iters: u64,
    pub max_bracket_expansions: usize,
    pub verbose: bool,
}

impl RootSolverOptions {
    pub fn new(
        tol: f64, max_iters: u64, max_bracket_expansions: usize, verbose: bool,
    ) -> GrowthResult<Self> {
        let opts = RootSolverOptions { tol, max_iters, max_bracket_expansions, verbose };
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> GrowthResult<()> {
        if !self.tol.is_finite() || self.tol <= 0.0 {
            return Err(GrowthError::InvalidSolverOptions { reason: "tol must be finite and > 0" });
        }
        if self.max_iters == 0 {
            return Err(GrowthError::InvalidSolverOptions { reason: "max_iters must be > 0" });
        }
        Ok(())
    }
}

impl Default for RootSolverOptions {
    fn default() -> Self {
        RootSolverOptions { tol: 1e-10, max_iters: 100, max_bracket_expansions: 60, verbose: false }
    }
}

/// `GrowthOptions` — validated configuration of one growth analysis run.
///
/// Purpose
/// -------
/// Hold the inputs of a `GrowthSession` that do not come from the failure
/// log itself.
///
/// Fields
/// ------
/// - `grouped`: `bool`
///   Treat records as interval-grouped counts instead of exact times.
/// - `confidence`: `f64`
///   Two-sided confidence level, `0 < c < 1`.
/// - `n_phases`: `usize`
///   Number of test phases, `>= 1`.
/// - `test_termination_time`: `f64`
///   `0.0` for failure-terminated tests, otherwise the Type I end time.
/// - `bounds`: [`BoundsMethod`]
///   Bound construction for α̂ and β̂.
/// - `solver`: [`RootSolverOptions`]
///   Grouped-data root solver settings.
///
/// Invariants
/// ----------
/// - All of the above constraints hold after `new` or a successful
///   `validate`.
///
/// Notes
/// -----
/// - Deserialized options bypass `new`; call `validate` before use.
///   `GrowthSession::new` does this automatically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthOptions {
    pub grouped: bool,
    pub confidence: f64,
    pub n_phases: usize,
    pub test_termination_time: f64,
    #[serde(default)]
    pub bounds: BoundsMethod,
    #[serde(default)]
    pub solver: RootSolverOptions,
}

impl GrowthOptions {
    /// Build validated options with the default bound method and solver.
    ///
    /// Errors
    /// ------
    /// - `GrowthError::InvalidConfidence` if `confidence` is not in (0, 1).
    /// - `GrowthError::InvalidPhaseCount` if `n_phases == 0`.
    /// - `GrowthError::InvalidTerminationTime` if the termination time is
    ///   negative or non-finite.
    pub fn new(
        grouped: bool, confidence: f64, n_phases: usize, test_termination_time: f64,
    ) -> GrowthResult<Self> {
        let opts = GrowthOptions {
            grouped,
            confidence,
            n_phases,
            test_termination_time,
            bounds: BoundsMethod::default(),
            solver: RootSolverOptions::default(),
        };
        opts.validate()?;
        Ok(opts)
    }

    /// Replace the bound method.
    pub fn with_bounds(mut self, bounds: BoundsMethod) -> Self {
        self.bounds = bounds;
        self
    }

    /// Replace the root solver settings.
    pub fn with_solver(mut self, solver: RootSolverOptions) -> Self {
        self.solver = solver;
        self
    }

    pub fn validate(&self) -> GrowthResult<()> {
        validate_confidence(self.confidence)?;
        if self.n_phases == 0 {
            return Err(GrowthError::InvalidPhaseCount { n_phases: self.n_phases });
        }
        if !self.test_termination_time.is_finite() || self.test_termination_time < 0.0 {
            return Err(GrowthError::InvalidTerminationTime {
                value: self.test_termination_time,
                last_time: 0.0,
            });
        }
        self.solver.validate()
    }

    /// `true` when the test was time terminated (Type I).
    pub fn time_terminated(&self) -> bool {
        self.test_termination_time > 0.0
    }
}

impl Default for GrowthOptions {
    fn default() -> Self {
        GrowthOptions {
            grouped: false,
            confidence: 0.75,
            n_phases: 1,
            test_termination_time: 0.0,
            bounds: BoundsMethod::Crow,
            solver: RootSolverOptions::default(),
        }
    }
}

/// Reject confidence levels outside the open interval (0, 1).
pub fn validate_confidence(confidence: f64) -> GrowthResult<()> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(GrowthError::InvalidConfidence { value: confidence });
    }
    Ok(())
}
