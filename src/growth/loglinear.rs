//! growth::loglinear — Cox-Lewis log-linear NHPP fit.
//!
//! Purpose
//! -------
//! Fit the log-linear intensity λ(t) = exp(γ₀ + γ₁ t) to exact failure
//! times. It is the alternative to the power law when the failure rate is
//! expected to change exponentially rather than as a power of test time;
//! γ₁ < 0 means reliability is growing.
//!
//! Key behaviors
//! -------------
//! - γ̂₁ is the root of the likelihood equation
//!   h(γ₁) = S + N/γ₁ − N T / (1 − e^(−γ₁T)), S = Σ tᵢ, solved with
//!   argmin's `BrentRoot` after a symmetric bracket search around 0.
//! - γ̂₀ = ln(N γ̂₁ / (K (e^(γ̂₁T) − 1))), so that K units are expected to
//!   show exactly N failures by T.
//!
//! Invariants & assumptions
//! ------------------------
//! - T is the termination time for time-terminated tests and the last
//!   failure time otherwise.
//! - h is decreasing with h(−∞) = S > 0 and h(+∞) = S − N T, so a root
//!   exists whenever some failure precedes T.
//! - At γ₁ = 0 the equation is evaluated through its limit S − N T/2.

use argmin::core::{CostFunction, Error, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::brent::BrentRoot;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::growth::{
    bounds::Termination,
    errors::{GrowthError, GrowthResult},
    options::RootSolverOptions,
    records::FailureRecordStore,
};

/// Below this |γ₁ T| the slope equation and the mean function use their
/// γ₁ → 0 limits.
const FLAT_SLOPE: f64 = 1e-8;

/// Likelihood equation for the log-linear slope γ₁.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogLinearSlopeEquation {
    sum_times: f64,
    n_failures: f64,
    end_time: f64,
}

impl LogLinearSlopeEquation {
    pub fn new(sum_times: f64, n_failures: f64, end_time: f64) -> Self {
        LogLinearSlopeEquation { sum_times, n_failures, end_time }
    }

    /// h(γ₁) at `gamma1`.
    pub fn eval(&self, gamma1: f64) -> f64 {
        let (s, n, t) = (self.sum_times, self.n_failures, self.end_time);
        if (gamma1 * t).abs() < FLAT_SLOPE {
            return s - 0.5 * n * t;
        }
        // 1 − e^(−γ₁T) without cancellation near 0.
        let window = -(-gamma1 * t).exp_m1();
        s + n / gamma1 - n * t / window
    }
}

impl CostFunction for LogLinearSlopeEquation {
    type Param = f64;
    type Output = f64;

    fn cost(&self, gamma1: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.eval(*gamma1))
    }
}

/// Fitted log-linear model.
///
/// Fields
/// ------
/// - `gamma0`, `gamma1`: per-unit intercept and slope of ln λ(t).
/// - `n_failures`: total failures N.
/// - `end_time`: the observation end T used in the fit.
/// - `n_units`: distinct test units K.
/// - `termination`: failure or time terminated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogLinearFit {
    pub gamma0: f64,
    pub gamma1: f64,
    pub n_failures: f64,
    pub end_time: f64,
    pub n_units: usize,
    pub termination: Termination,
}

impl LogLinearFit {
    /// Fit γ₀ and γ₁ to the exact failure times in `store`.
    ///
    /// Parameters
    /// ----------
    /// - `store`: `&FailureRecordStore`
    ///   Exact failure times; counts weight repeated times.
    /// - `test_termination_time`: `f64`
    ///   `0.0` for failure-terminated tests, otherwise the Type I end time.
    /// - `opts`: [`RootSolverOptions`]
    ///   Tolerance, iteration cap and bracket-expansion cap of the γ₁ solve.
    ///
    /// Errors
    /// ------
    /// - `GrowthError::InsufficientData` for fewer than two records.
    /// - `GrowthError::InvalidTerminationTime` if a positive termination time
    ///   does not exceed the last failure.
    /// - `GrowthError::NonConvergence` when γ₁ cannot be bracketed or the
    ///   solve stops on its iteration cap.
    pub fn from_store(
        store: &FailureRecordStore, test_termination_time: f64, opts: &RootSolverOptions,
    ) -> GrowthResult<Self> {
        if store.len() < 2 {
            return Err(GrowthError::InsufficientData { found: store.len() });
        }
        opts.validate()?;
        let last_time = store.last_time().ok_or(GrowthError::InsufficientData { found: 0 })?;
        let termination = Termination::from_termination_time(test_termination_time);
        let end_time = match termination {
            Termination::Time if test_termination_time <= last_time => {
                return Err(GrowthError::InvalidTerminationTime {
                    value: test_termination_time,
                    last_time,
                });
            }
            Termination::Time => test_termination_time,
            Termination::Failure => last_time,
        };

        let n = store.total_failures() as f64;
        let k = store.n_units() as f64;
        let sum_times: f64 =
            store.pooled().iter().map(|r| f64::from(r.count) * r.right_time).sum();

        let equation = LogLinearSlopeEquation::new(sum_times, n, end_time);
        let gamma1 = solve_slope(equation, opts)?;
        let gamma0 = if (gamma1 * end_time).abs() < FLAT_SLOPE {
            (n / (k * end_time)).ln()
        } else {
            (n * gamma1 / (k * (gamma1 * end_time).exp_m1())).ln()
        };

        debug!(gamma0, gamma1, n_failures = n, end_time, n_units = store.n_units(), "log-linear fit");
        Ok(LogLinearFit {
            gamma0,
            gamma1,
            n_failures: n,
            end_time,
            n_units: store.n_units(),
            termination,
        })
    }

    /// Per-unit failure intensity exp(γ₀ + γ₁ t).
    pub fn intensity(&self, t: f64) -> f64 {
        (self.gamma0 + self.gamma1 * t).exp()
    }

    /// Per-unit instantaneous MTBF 1 / λ(t).
    pub fn instantaneous_mtbf(&self, t: f64) -> f64 {
        1.0 / self.intensity(t)
    }

    /// Per-unit expected failures by `t`: e^γ₀ (e^(γ₁t) − 1) / γ₁.
    pub fn expected_failures(&self, t: f64) -> f64 {
        if (self.gamma1 * t).abs() < FLAT_SLOPE {
            self.gamma0.exp() * t
        } else {
            self.gamma0.exp() * (self.gamma1 * t).exp_m1() / self.gamma1
        }
    }

    /// Per-unit cumulative MTBF t / E[N(t)].
    pub fn cumulative_mtbf(&self, t: f64) -> f64 {
        t / self.expected_failures(t)
    }

    /// `true` when the fitted intensity decreases over time.
    pub fn is_improving(&self) -> bool {
        self.gamma1 < 0.0
    }
}

// ---- Helper Methods ----

fn solve_slope(equation: LogLinearSlopeEquation, opts: &RootSolverOptions) -> GrowthResult<f64> {
    let (lo, hi) = bracket_slope(&equation, opts.max_bracket_expansions)?;
    let solver = BrentRoot::new(lo, hi, opts.tol);

    let executor = Executor::new(equation, solver)
        .configure(|state| state.param((lo + hi) / 2.0).max_iters(opts.max_iters));
    #[cfg(feature = "obs_slog")]
    let executor = if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        executor.add_observer(observer, argmin::core::observers::ObserverMode::Always)
    } else {
        executor
    };

    let result = executor.run()?.state().clone();
    let iterations = result.get_iter();
    let status = result.get_termination_status().clone();
    if let TerminationStatus::NotTerminated
    | TerminationStatus::Terminated(TerminationReason::MaxItersReached) = status
    {
        return Err(GrowthError::NonConvergence { iterations, reason: format!("{status:?}") });
    }
    let gamma1 = result.get_param().copied().ok_or_else(|| GrowthError::NotInitialized {
        text: "root solver returned no parameter".to_string(),
    })?;
    debug!(gamma1, iterations, bracket_lo = lo, bracket_hi = hi, "log-linear slope solve finished");
    Ok(gamma1)
}

/// Widen `[−1/T, 1/T]` by doubling until h changes sign.
fn bracket_slope(
    equation: &LogLinearSlopeEquation, max_expansions: usize,
) -> GrowthResult<(f64, f64)> {
    let mut half_width = 1.0 / equation.end_time;
    for _ in 0..=max_expansions {
        let (lo, hi) = (-half_width, half_width);
        let (h_lo, h_hi) = (equation.eval(lo), equation.eval(hi));
        if h_lo.is_finite() && h_hi.is_finite() && h_lo * h_hi <= 0.0 {
            return Ok((lo, hi));
        }
        half_width *= 2.0;
    }
    Err(GrowthError::NonConvergence {
        iterations: max_expansions as u64,
        reason: format!("no sign change of the log-linear slope equation within ±{half_width:e}"),
    })
}
