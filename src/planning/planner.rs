//! planning::planner — MIL-HDBK-189 solve functions for a growth test plan.
//!
//! Purpose
//! -------
//! Fill in one unknown field of a [`GrowthPlan`] from the others using the
//! planning-model (idealized Crow-AMSAA) relations. Each `calculate_*`
//! function works either on the whole program (`phase = None`) or on one
//! phase, writes its result into the plan, and returns it.
//!
//! Key behaviors
//! -------------
//! - Hard failures (bad lengths, a phase index past the end, a zero divisor
//!   with no agreed substitute) are `Err(PlanError)`.
//! - Inputs with an agreed substitute return `Ok(Outcome)` whose
//!   `recovered` list names the degeneracy, and emit a `tracing::warn!`.
//!   The substitute is written into the plan like any other result.
//! - The pure formula helpers (`program_*`, `minimum_first_phase_time`) are
//!   shared with the curve synthesizer.
//!
//! Invariants & assumptions
//! ------------------------
//! - M1 = `mtbf_initial[0]`, t1 = `test_time[0]`, Tp = cumulative test time
//!   through phase p, ttt = [`GrowthPlan::total_time`], program α =
//!   [`GrowthPlan::program_growth_rate`].
//! - Phase 0 follows the flat first-phase relation MTBF_f = MTBF_i / (1 − α);
//!   later phases follow MTBF_f = MTBF_i (Tp / Tp−1)^α.
//! - Final-MTBF solves chain their result into the next phase's initial MTBF.
//!
//! Conventions
//! -----------
//! - Repeated calls on a consistent plan return the same values.

use tracing::{debug, warn};

use crate::planning::{
    errors::{Degeneracy, Outcome, PlanError, PlanResult},
    plan::GrowthPlan,
};

/// Management strategy reported when FEF or the growth potential is zero.
pub const MS_SENTINEL: f64 = 100.0;

// ---- Pure program-level relations ------------------------------------------

/// M_f = M1 (ttt/t1)^α / (1 − α).
pub fn program_final_mtbf(m1: f64, alpha: f64, ttt: f64, t1: f64) -> f64 {
    m1 * (ttt / t1).powf(alpha) / (1.0 - alpha)
}

/// Inverse of [`program_final_mtbf`], evaluated in log space.
pub fn program_initial_mtbf(mf: f64, alpha: f64, ttt: f64, t1: f64) -> f64 {
    (mf.ln() - alpha * (ttt.ln() - t1.ln()) + (1.0 - alpha).ln()).exp()
}

/// Test time needed to grow from `m1` to `mf`: t1 (mf (1 − α)/M1)^(1/α).
pub fn program_total_time(m1: f64, mf: f64, alpha: f64, t1: f64) -> f64 {
    t1 * (mf * (1.0 - alpha) / m1).powf(1.0 / alpha)
}

/// Shortest first phase that still reaches `mf` within `ttt`.
pub fn minimum_first_phase_time(m1: f64, mf: f64, alpha: f64, ttt: f64) -> f64 {
    ttt / (mf * (1.0 - alpha) / m1).powf(1.0 / alpha)
}

/// Closed-form growth rate: −L − 1 + √((1 + L)² + 2 ln(mf/mi)), L = ln(ttt/t1).
pub fn program_growth_rate(mi: f64, mf: f64, ttt: f64, t1: f64) -> f64 {
    let l = (ttt / t1).ln();
    -l - 1.0 + ((1.0 + l).powi(2) + 2.0 * (mf / mi).ln()).sqrt()
}

// ---- Guards -----------------------------------------------------------------

fn check_optional_phase(plan: &GrowthPlan, phase: Option<usize>) -> PlanResult<()> {
    match phase {
        Some(p) => plan.check_phase(p),
        None => plan.validate(),
    }
}

fn require_positive(value: f64, degeneracy: Degeneracy) -> PlanResult<f64> {
    if value > 0.0 { Ok(value) } else { Err(PlanError::DegenerateInput(degeneracy)) }
}

fn require_rate(value: f64, phase: Option<usize>) -> PlanResult<f64> {
    if (0.0..1.0).contains(&value) {
        Ok(value)
    } else {
        Err(PlanError::DegenerateInput(Degeneracy::InvalidGrowthRate { phase, value }))
    }
}

fn require_nonzero_rate(value: f64, phase: Option<usize>) -> PlanResult<f64> {
    let alpha = require_rate(value, phase)?;
    if alpha > 0.0 {
        Ok(alpha)
    } else {
        Err(PlanError::DegenerateInput(Degeneracy::InvalidGrowthRate { phase, value }))
    }
}

/// Cumulative time before `phase` (phase ≥ 1), which must be positive.
fn prior_time(plan: &GrowthPlan, phase: usize) -> PlanResult<f64> {
    require_positive(
        plan.cumulative_time(phase - 1),
        Degeneracy::ZeroTestTime { phase: phase - 1 },
    )
}

/// t1 and ttt for program-level solves.
fn program_times(plan: &GrowthPlan) -> PlanResult<(f64, f64)> {
    let t1 = require_positive(plan.test_time[0], Degeneracy::ZeroTestTime { phase: 0 })?;
    let ttt = require_positive(plan.total_time(), Degeneracy::ZeroTestTime { phase: 0 })?;
    Ok((t1, ttt))
}

fn recovered(value: f64, degeneracy: Degeneracy) -> Outcome<f64> {
    warn!(%degeneracy, value, "degenerate planning input, substitute used");
    Outcome::recovered(value, degeneracy)
}

// ---- Solve functions ----------------------------------------------------------

/// Final MTBF for the program or one phase.
///
/// Parameters
/// ----------
/// - `plan`: `&mut GrowthPlan`
///   Reads initial MTBF, growth rate and test times; writes `mtbf_final`
///   (the last phase for `None`) and, for a phase before the last,
///   `mtbf_initial[phase + 1]`.
/// - `phase`: `Option<usize>`
///   `None` for the program-level relation.
///
/// Errors
/// ------
/// - `DegenerateInput` for a zero initial MTBF, zero test time, or a growth
///   rate outside [0, 1).
pub fn calculate_final_mtbf(plan: &mut GrowthPlan, phase: Option<usize>) -> PlanResult<Outcome<f64>> {
    check_optional_phase(plan, phase)?;
    let mf = match phase {
        None => {
            let m1 =
                require_positive(plan.mtbf_initial[0], Degeneracy::ZeroInitialMtbf { phase: None })?;
            let alpha = require_rate(plan.program_growth_rate(), None)?;
            let (t1, ttt) = program_times(plan)?;
            let mf = program_final_mtbf(m1, alpha, ttt, t1);
            let last = plan.last_phase();
            plan.mtbf_final[last] = mf;
            mf
        }
        Some(p) => {
            let mi = require_positive(
                plan.mtbf_initial[p],
                Degeneracy::ZeroInitialMtbf { phase: Some(p) },
            )?;
            let alpha = require_rate(plan.growth_rate[p], Some(p))?;
            let mf = if p == 0 {
                mi / (1.0 - alpha)
            } else {
                let before = prior_time(plan, p)?;
                mi * (plan.cumulative_time(p) / before).powf(alpha)
            };
            plan.mtbf_final[p] = mf;
            if p + 1 < plan.n_phases {
                plan.mtbf_initial[p + 1] = mf;
            }
            mf
        }
    };
    debug!(?phase, mtbf_final = mf, "final MTBF solved");
    Ok(Outcome::clean(mf))
}

/// Initial MTBF for the program or one phase, the inverse of
/// [`calculate_final_mtbf`].
///
/// The program form reads the last phase's final MTBF, falling back to
/// `mtbf_goal`, and writes `mtbf_initial[0]`.
///
/// Errors
/// ------
/// - `DegenerateInput(ZeroTestTime)` when the phase has no test time.
/// - `DegenerateInput(ZeroFinalMtbf)` when the final MTBF is zero.
pub fn calculate_initial_mtbf(
    plan: &mut GrowthPlan, phase: Option<usize>,
) -> PlanResult<Outcome<f64>> {
    check_optional_phase(plan, phase)?;
    let mi = match phase {
        None => {
            let mf = require_positive(
                plan.program_final_mtbf(),
                Degeneracy::ZeroFinalMtbf { phase: None },
            )?;
            let alpha = require_rate(plan.program_growth_rate(), None)?;
            let (t1, ttt) = program_times(plan)?;
            let mi = program_initial_mtbf(mf, alpha, ttt, t1);
            plan.mtbf_initial[0] = mi;
            mi
        }
        Some(p) => {
            require_positive(plan.test_time[p], Degeneracy::ZeroTestTime { phase: p })?;
            let mf = require_positive(
                plan.mtbf_final[p],
                Degeneracy::ZeroFinalMtbf { phase: Some(p) },
            )?;
            let alpha = require_rate(plan.growth_rate[p], Some(p))?;
            let mi = if p == 0 {
                mf * (1.0 - alpha)
            } else {
                let before = prior_time(plan, p)?;
                mf / (plan.cumulative_time(p) / before).powf(alpha)
            };
            plan.mtbf_initial[p] = mi;
            mi
        }
    };
    debug!(?phase, mtbf_initial = mi, "initial MTBF solved");
    Ok(Outcome::clean(mi))
}

/// Expected failures and average MTBF of `phase`.
///
/// n_failures[p] = (t1/M1)(Tp/t1)^(1 − αp) − Σ_{k<p} n_failures[k] and
/// mtbf_average[p] = test_time[p] / n_failures[p]. Phase 0 reports the
/// midpoint of its initial and final MTBF when both are known.
///
/// Errors
/// ------
/// - `DegenerateInput` when M1 or t1 is zero, or the phase expects no
///   failures (for example, zero test time).
pub fn calculate_average_mtbf(plan: &mut GrowthPlan, phase: usize) -> PlanResult<Outcome<f64>> {
    plan.check_phase(phase)?;
    let m1 =
        require_positive(plan.mtbf_initial[0], Degeneracy::ZeroInitialMtbf { phase: Some(0) })?;
    let t1 = require_positive(plan.test_time[0], Degeneracy::ZeroTestTime { phase: 0 })?;

    let earlier: f64 = plan.n_failures[..phase].iter().sum();
    let expected = (t1 / m1) * (plan.cumulative_time(phase) / t1).powf(1.0 - plan.growth_rate[phase]);
    let n_failures = require_positive(
        expected - earlier,
        Degeneracy::NoExpectedFailures { phase },
    )?;

    let (mi, mf) = (plan.mtbf_initial[phase], plan.mtbf_final[phase]);
    let average = if phase == 0 && mi > 0.0 && mf > 0.0 {
        0.5 * (mi + mf)
    } else {
        plan.test_time[phase] / n_failures
    };
    plan.n_failures[phase] = n_failures;
    plan.mtbf_average[phase] = average;
    debug!(phase, n_failures, mtbf_average = average, "average MTBF solved");
    Ok(Outcome::clean(average))
}

/// Test time for the program or one phase.
///
/// The program form writes `total_test_time`; a phase form writes
/// `test_time[phase]`. Phase 0 has no time dependence in its MTBF relation
/// and delegates to [`calculate_minimum_first_phase_time`].
///
/// Recovered
/// ---------
/// - Equal initial and final MTBF: `0.0` with `EqualMtbf`.
///
/// Errors
/// ------
/// - `DegenerateInput` for zero MTBFs, zero prior time, or a growth rate
///   that is zero or outside [0, 1).
pub fn calculate_total_time(plan: &mut GrowthPlan, phase: Option<usize>) -> PlanResult<Outcome<f64>> {
    check_optional_phase(plan, phase)?;
    match phase {
        Some(0) => calculate_minimum_first_phase_time(plan),
        None => {
            let m1 =
                require_positive(plan.mtbf_initial[0], Degeneracy::ZeroInitialMtbf { phase: None })?;
            let mf = require_positive(
                plan.program_final_mtbf(),
                Degeneracy::ZeroFinalMtbf { phase: None },
            )?;
            let outcome = if m1 == mf {
                recovered(0.0, Degeneracy::EqualMtbf { phase: None })
            } else {
                let alpha = require_nonzero_rate(plan.program_growth_rate(), None)?;
                let t1 = require_positive(plan.test_time[0], Degeneracy::ZeroTestTime { phase: 0 })?;
                Outcome::clean(program_total_time(m1, mf, alpha, t1))
            };
            plan.total_test_time = outcome.value;
            debug!(total_test_time = outcome.value, "program test time solved");
            Ok(outcome)
        }
        Some(p) => {
            let mi = require_positive(
                plan.mtbf_initial[p],
                Degeneracy::ZeroInitialMtbf { phase: Some(p) },
            )?;
            let mf = require_positive(
                plan.mtbf_final[p],
                Degeneracy::ZeroFinalMtbf { phase: Some(p) },
            )?;
            let outcome = if mi == mf {
                recovered(0.0, Degeneracy::EqualMtbf { phase: Some(p) })
            } else {
                let alpha = require_nonzero_rate(plan.growth_rate[p], Some(p))?;
                let before = prior_time(plan, p)?;
                Outcome::clean(before * (mf / mi).powf(1.0 / alpha) - before)
            };
            plan.test_time[p] = outcome.value;
            debug!(phase = p, test_time = outcome.value, "phase test time solved");
            Ok(outcome)
        }
    }
}

/// Growth rate for the program or one phase.
///
/// The program form writes `average_growth_rate` using the closed-form
/// solution of the program relation; phase 0 uses the same form with
/// ttt = t1, and later phases use ln(mf/mi) / ln(Tp/Tp−1).
///
/// Errors
/// ------
/// - `DegenerateInput` for zero MTBFs or zero test times.
pub fn calculate_growth_rate(plan: &mut GrowthPlan, phase: Option<usize>) -> PlanResult<Outcome<f64>> {
    check_optional_phase(plan, phase)?;
    let rate = match phase {
        None => {
            let mi =
                require_positive(plan.mtbf_initial[0], Degeneracy::ZeroInitialMtbf { phase: None })?;
            let mf = require_positive(
                plan.program_final_mtbf(),
                Degeneracy::ZeroFinalMtbf { phase: None },
            )?;
            let (t1, ttt) = program_times(plan)?;
            let rate = program_growth_rate(mi, mf, ttt, t1);
            plan.average_growth_rate = rate;
            rate
        }
        Some(p) => {
            let mi = require_positive(
                plan.mtbf_initial[p],
                Degeneracy::ZeroInitialMtbf { phase: Some(p) },
            )?;
            let mf = require_positive(
                plan.mtbf_final[p],
                Degeneracy::ZeroFinalMtbf { phase: Some(p) },
            )?;
            let rate = if p == 0 {
                program_growth_rate(mi, mf, 1.0, 1.0)
            } else {
                require_positive(plan.test_time[p], Degeneracy::ZeroTestTime { phase: p })?;
                let before = prior_time(plan, p)?;
                (mf / mi).ln() / (plan.cumulative_time(p) / before).ln()
            };
            plan.growth_rate[p] = rate;
            rate
        }
    };
    debug!(?phase, growth_rate = rate, "growth rate solved");
    Ok(Outcome::clean(rate))
}

/// Minimum first-phase test time, written to `test_time[0]`.
///
/// Recovered
/// ---------
/// - `mtbf_initial[0] == 0`: `0.0` with `ZeroInitialMtbf`.
///
/// Errors
/// ------
/// - `DegenerateInput` when ttt, the final MTBF, or the growth rate is
///   unusable.
pub fn calculate_minimum_first_phase_time(plan: &mut GrowthPlan) -> PlanResult<Outcome<f64>> {
    plan.validate()?;
    let outcome = if plan.mtbf_initial[0] <= 0.0 {
        recovered(0.0, Degeneracy::ZeroInitialMtbf { phase: Some(0) })
    } else {
        let mf = require_positive(
            plan.program_final_mtbf(),
            Degeneracy::ZeroFinalMtbf { phase: None },
        )?;
        let alpha = require_nonzero_rate(plan.program_growth_rate(), None)?;
        let ttt = require_positive(plan.total_time(), Degeneracy::ZeroTestTime { phase: 0 })?;
        Outcome::clean(minimum_first_phase_time(plan.mtbf_initial[0], mf, alpha, ttt))
    };
    plan.test_time[0] = outcome.value;
    debug!(test_time = outcome.value, "minimum first-phase time solved");
    Ok(outcome)
}

/// Management strategy for the program (`average_ms`) or one phase.
///
/// ms = (1 − MTBF_i / MTBF_gp) / FEF, with the program form using
/// `mtbf_initial[0]` and `average_fef`.
///
/// Recovered
/// ---------
/// - Zero FEF or zero growth potential: [`MS_SENTINEL`].
pub fn calculate_management_strategy(
    plan: &mut GrowthPlan, phase: Option<usize>,
) -> PlanResult<Outcome<f64>> {
    check_optional_phase(plan, phase)?;
    let (mi, fef) = match phase {
        None => (plan.mtbf_initial[0], plan.average_fef),
        Some(p) => (plan.mtbf_initial[p], plan.fef[p]),
    };
    let outcome = if fef <= 0.0 {
        recovered(MS_SENTINEL, Degeneracy::ZeroFef { phase })
    } else if plan.mtbf_goal_program <= 0.0 {
        recovered(MS_SENTINEL, Degeneracy::ZeroGrowthPotential)
    } else {
        Outcome::clean((1.0 - mi / plan.mtbf_goal_program) / fef)
    };
    match phase {
        None => plan.average_ms = outcome.value,
        Some(p) => plan.management_strategy[p] = outcome.value,
    }
    debug!(?phase, management_strategy = outcome.value, "management strategy solved");
    Ok(outcome)
}

/// Probability of observing at least one B-mode failure in `phase`:
/// 1 − exp(−test_time · ms / MTBF_i), written to
/// `probability_of_detection[phase]`.
///
/// Recovered
/// ---------
/// - Zero initial MTBF: `0.0` with `ZeroInitialMtbf`.
pub fn calculate_probability(plan: &mut GrowthPlan, phase: usize) -> PlanResult<Outcome<f64>> {
    plan.check_phase(phase)?;
    let mi = plan.mtbf_initial[phase];
    let outcome = if mi <= 0.0 {
        recovered(0.0, Degeneracy::ZeroInitialMtbf { phase: Some(phase) })
    } else {
        let ms = plan.management_strategy[phase];
        Outcome::clean(1.0 - (-plan.test_time[phase] * ms / mi).exp())
    };
    plan.probability_of_detection[phase] = outcome.value;
    Ok(outcome)
}

/// Growth potential MTBF_gp = MTBF_i / (1 − ms · FEF), written to
/// `mtbf_goal_program`.
///
/// Recovered
/// ---------
/// - ms · FEF = 0 or ≥ 1: `mtbf_initial[0]` with `GrowthPotentialUndefined`.
pub fn calculate_growth_potential(plan: &mut GrowthPlan) -> PlanResult<Outcome<f64>> {
    plan.validate()?;
    let mi = plan.mtbf_initial[0];
    let ms_fef = plan.average_ms * plan.average_fef;
    let outcome = if ms_fef <= 0.0 || ms_fef >= 1.0 {
        recovered(mi, Degeneracy::GrowthPotentialUndefined { ms_fef })
    } else {
        Outcome::clean(mi / (1.0 - ms_fef))
    };
    plan.mtbf_goal_program = outcome.value;
    debug!(mtbf_goal_program = outcome.value, "growth potential solved");
    Ok(outcome)
}
