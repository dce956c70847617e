//! growth::grouped — shape-parameter root solve for interval-grouped data.
//!
//! Purpose
//! -------
//! Solve the Crow-AMSAA maximum-likelihood equation for β when failures are
//! only known as counts per interval. The equation has no closed form, so it
//! is handed to `argmin`'s Brent root finder through a small
//! [`CostFunction`] adapter.
//!
//! Key behaviors
//! -------------
//! - [`GroupedShapeEquation`] evaluates
//!   g(β) = Σ fᵢ [(tᵢ^β ln tᵢ − tᵢ₋₁^β ln tᵢ₋₁)/(tᵢ^β − tᵢ₋₁^β) − ln T]
//!   in a scaled form that avoids overflow of tᵢ^β.
//! - [`solve_grouped_shape`] brackets the root by geometric expansion
//!   around a starting guess, then runs `BrentRoot` with the iteration cap
//!   from [`RootSolverOptions`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Interval edges are strictly increasing and positive; duplicate edges
//!   are merged by [`GroupedShapeEquation::new`].
//! - t₀ = 0 with the convention 0·ln 0 = 0.
//!
//! Conventions
//! -----------
//! - Failing to bracket a sign change, or stopping on the iteration cap, is
//!   reported as `GrowthError::NonConvergence`.
//! - With the `obs_slog` feature and `verbose = true`, a terminal observer is
//!   attached to the executor.

use argmin::core::{CostFunction, Error, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::brent::BrentRoot;
use tracing::debug;

use crate::growth::errors::{GrowthError, GrowthResult};
use crate::growth::options::RootSolverOptions;

/// Grouped-data likelihood equation g(β) = 0 over merged interval edges.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedShapeEquation {
    edges: Vec<f64>,
    counts: Vec<f64>,
    ln_end: f64,
}

impl GroupedShapeEquation {
    /// Build the equation from right edges and counts in time order.
    ///
    /// Equal consecutive edges (several units closing an interval at the same
    /// time) are merged into one interval with the summed count.
    pub fn new(edges: &[f64], counts: &[f64]) -> GrowthResult<Self> {
        if edges.len() != counts.len() {
            return Err(GrowthError::InvalidParameter {
                text: format!(
                    "edges and counts must have equal length, got {} and {}",
                    edges.len(),
                    counts.len()
                ),
            });
        }
        let mut merged_edges: Vec<f64> = Vec::with_capacity(edges.len());
        let mut merged_counts: Vec<f64> = Vec::with_capacity(counts.len());
        for (&t, &f) in edges.iter().zip(counts) {
            match merged_edges.last() {
                Some(&prev) if prev == t => {
                    if let Some(last) = merged_counts.last_mut() {
                        *last += f;
                    }
                }
                _ => {
                    merged_edges.push(t);
                    merged_counts.push(f);
                }
            }
        }
        let ln_end = match merged_edges.last() {
            Some(&t_end) => t_end.ln(),
            None => return Err(GrowthError::InsufficientData { found: 0 }),
        };
        Ok(GroupedShapeEquation { edges: merged_edges, counts: merged_counts, ln_end })
    }

    /// Number of distinct intervals after merging.
    pub fn n_intervals(&self) -> usize {
        self.edges.len()
    }

    /// Closed-form exact-data estimate computed from the right edges. Used
    /// as the centre of the initial bracket.
    pub fn starting_guess(&self) -> f64 {
        let n: f64 = self.counts.iter().sum();
        let weighted_ln: f64 =
            self.edges.iter().zip(&self.counts).map(|(t, f)| f * t.ln()).sum();
        n / (n * self.ln_end - weighted_ln)
    }

    /// g(β) at `beta`.
    pub fn eval(&self, beta: f64) -> f64 {
        let mut prev = 0.0_f64;
        let mut total = 0.0;
        for (&t, &f) in self.edges.iter().zip(&self.counts) {
            let ln_t = t.ln();
            let term = if prev > 0.0 {
                // Divide through by t^β: r = (prev/t)^β lies in (0, 1).
                let r = (prev / t).powf(beta);
                (ln_t - r * prev.ln()) / (1.0 - r)
            } else {
                ln_t
            };
            total += f * (term - self.ln_end);
            prev = t;
        }
        total
    }
}

impl CostFunction for GroupedShapeEquation {
    type Param = f64;
    type Output = f64;

    fn cost(&self, beta: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.eval(*beta))
    }
}

/// Solve g(β) = 0 for grouped data.
///
/// Parameters
/// ----------
/// - `equation`: [`GroupedShapeEquation`]
///   The interval equation to solve; consumed by the executor.
/// - `opts`: [`RootSolverOptions`]
///   Tolerance, iteration cap, bracket-expansion cap, and verbosity.
///
/// Returns
/// -------
/// `GrowthResult<f64>`
///   The root β̂ > 0.
///
/// Errors
/// ------
/// - `GrowthError::NonConvergence` if no sign change is found within
///   `max_bracket_expansions`, or Brent's method stops on `max_iters`.
/// - Solver errors from `argmin` via `From<argmin::core::Error>`.
pub fn solve_grouped_shape(
    equation: GroupedShapeEquation, opts: &RootSolverOptions,
) -> GrowthResult<f64> {
    let (lo, hi) = bracket_root(&equation, opts.max_bracket_expansions)?;
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
    match status {
        TerminationStatus::NotTerminated
        | TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
            return Err(GrowthError::NonConvergence { iterations, reason: format!("{status:?}") });
        }
        _ => {}
    }
    let beta = result.get_param().copied().ok_or_else(|| GrowthError::NotInitialized {
        text: "root solver returned no parameter".to_string(),
    })?;
    if !beta.is_finite() || beta <= 0.0 {
        return Err(GrowthError::DegenerateEstimate { beta });
    }

    debug!(beta, iterations, bracket_lo = lo, bracket_hi = hi, "grouped shape solve finished");
    Ok(beta)
}

// ---- Helper Methods ----

/// Widen `[guess/2, 2·guess]` geometrically until g changes sign.
fn bracket_root(
    equation: &GroupedShapeEquation, max_expansions: usize,
) -> GrowthResult<(f64, f64)> {
    let guess = equation.starting_guess();
    let centre = if guess.is_finite() && guess > 0.0 { guess } else { 1.0 };
    let mut lo = centre / 2.0;
    let mut hi = centre * 2.0;

    for _ in 0..=max_expansions {
        let g_lo = equation.eval(lo);
        let g_hi = equation.eval(hi);
        if g_lo.is_finite() && g_hi.is_finite() && g_lo * g_hi <= 0.0 {
            return Ok((lo, hi));
        }
        lo /= 2.0;
        hi *= 2.0;
    }
    Err(GrowthError::NonConvergence {
        iterations: max_expansions as u64,
        reason: format!("no sign change of the grouped shape equation in [{lo:e}, {hi:e}]"),
    })
}
