//! planning::curves — idealized and planned growth curves for plotting.
//!
//! Purpose
//! -------
//! Turn a [`GrowthPlan`] into the sequences a plotting layer draws, indexed
//! by elapsed test time unit:
//! - the idealized Crow-AMSAA curve over the whole program,
//! - the planned step curve of per-phase average MTBF,
//! and fill the per-phase planned growth fields those curves rely on.
//!
//! Key behaviors
//! -------------
//! - [`calculate_idealized_growth_curve`] is flat at M1 during the first
//!   phase, NaN at each phase boundary, and M1 (t/t1)^α / (1 − α) after.
//!   Missing program inputs (M1, goal MTBF, total time, first-phase time,
//!   growth rate) are solved from the others, written back to the plan,
//!   and reported as `Degeneracy::Remediated`.
//! - [`create_planned_values`] repeats each phase's average MTBF and closes
//!   the phase with one NaN.
//! - [`calculate_planned_growth_curve`] fills missing per-phase final MTBFs
//!   and growth rates, then recomputes expected failures and average MTBFs.
//!
//! Invariants & assumptions
//! ------------------------
//! - NaN marks the instant of a phase transition so that plots break the
//!   line there; callers must not treat it as an error.
//! - With `mtbf = false` every value is the reciprocal (failure intensity);
//!   NaN stays NaN.
//! - A missing growth rate comes from the closed form
//!   −L − 1 + √((1 + L)² + 2 ln(MTBF_g/M1)), L = ln(ttt/t1). When that falls
//!   outside (0, 1), (ttt/t1)^g + (MTBF_g/M1)(g − 1) = 0 is solved with
//!   argmin's `BrentRoot`.
//! - Remediated ttt and t1 are rounded up to whole time units. Phase
//!   boundaries are floored, so a fractional boundary still lands on NaN.

use argmin::core::{CostFunction, Error, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::brent::BrentRoot;
use tracing::{debug, warn};

use crate::growth::options::RootSolverOptions;
use crate::planning::{
    errors::{Degeneracy, Outcome, PlanError, PlanField, PlanResult},
    plan::GrowthPlan,
    planner::{
        calculate_average_mtbf, calculate_final_mtbf, calculate_growth_rate,
        minimum_first_phase_time, program_final_mtbf, program_growth_rate, program_initial_mtbf,
        program_total_time,
    },
};

/// Program growth-rate equation (ttt/t1)^g + (MTBF_g/M1)(g − 1).
#[derive(Debug, Clone, Copy, PartialEq)]
struct GrowthRateEquation {
    time_ratio: f64,
    mtbf_ratio: f64,
}

impl GrowthRateEquation {
    fn eval(&self, g: f64) -> f64 {
        self.time_ratio.powf(g) + self.mtbf_ratio * (g - 1.0)
    }
}

impl CostFunction for GrowthRateEquation {
    type Param = f64;
    type Output = f64;

    fn cost(&self, g: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.eval(*g))
    }
}

/// Back-solve the program growth rate from M1, the goal MTBF, ttt and t1.
///
/// Errors
/// ------
/// - `DegenerateInput(InvalidGrowthRate)` when the equation has no sign
///   change on [0, 1].
fn solve_growth_rate(m1: f64, goal: f64, ttt: f64, t1: f64) -> PlanResult<f64> {
    let equation = GrowthRateEquation { time_ratio: ttt / t1, mtbf_ratio: goal / m1 };
    let (lo, hi) = (0.0, 1.0);
    let product = equation.eval(lo) * equation.eval(hi);
    if product.is_nan() || product > 0.0 {
        return Err(missing(Degeneracy::InvalidGrowthRate { phase: None, value: f64::NAN }));
    }

    let opts = RootSolverOptions::default();
    let solver = BrentRoot::new(lo, hi, opts.tol);
    let result = Executor::new(equation, solver)
        .configure(|state| state.param(0.5 * (lo + hi)).max_iters(opts.max_iters))
        .run()?
        .state()
        .clone();
    let status = result.get_termination_status().clone();
    if let TerminationStatus::NotTerminated
    | TerminationStatus::Terminated(TerminationReason::MaxItersReached) = status
    {
        return Err(PlanError::Solver { text: format!("growth-rate solve stopped: {status:?}") });
    }
    let rate = result
        .get_param()
        .copied()
        .ok_or_else(|| PlanError::Solver { text: "root solver returned no parameter".to_string() })?;
    debug!(rate, iterations = result.get_iter(), "growth-rate back-solve finished");
    Ok(rate)
}

fn missing(degeneracy: Degeneracy) -> PlanError {
    PlanError::DegenerateInput(degeneracy)
}

fn is_rate(alpha: f64) -> bool {
    alpha > 0.0 && alpha < 1.0
}

fn remediate(recovered: &mut Vec<Degeneracy>, field: PlanField, value: f64) {
    let degeneracy = Degeneracy::Remediated { field, value };
    warn!(%degeneracy, "idealized curve input remediated");
    recovered.push(degeneracy);
}

/// Resolved program inputs of the idealized curve.
#[derive(Debug, Clone, Copy, PartialEq)]
struct IdealizedInputs {
    m1: f64,
    alpha: f64,
    ttt: f64,
    t1: f64,
}

/// Resolve M1, goal MTBF, ttt, t1 and α in that order, solving each missing
/// one from the rest and writing it back.
///
/// - M1: `mtbf_average[0]`, else solved from the goal, else the first-phase
///   midpoint (mi + mf)/2.
/// - Goal: `mtbf_goal`, else projected from M1, else the last final MTBF.
/// - ttt: `total_test_time`, else ceil of the time to reach the goal, else
///   the sum of phase times.
/// - t1: `test_time[0]`, else ceil of the minimum first-phase time.
/// - α: the program rate, else the closed form, else a root solve.
fn resolve_inputs(
    plan: &mut GrowthPlan, recovered: &mut Vec<Degeneracy>,
) -> PlanResult<IdealizedInputs> {
    let mut ttt = plan.total_test_time;
    let mut t1 = plan.test_time[0];
    let mut alpha = plan.program_growth_rate();

    let (mi0, mf0) = (plan.mtbf_initial[0], plan.mtbf_final[0]);
    let m1 = if plan.mtbf_average[0] > 0.0 {
        plan.mtbf_average[0]
    } else {
        let m1 = if plan.mtbf_goal > 0.0 && ttt > 0.0 && t1 > 0.0 && is_rate(alpha) {
            program_initial_mtbf(plan.mtbf_goal, alpha, ttt, t1)
        } else if mi0 > 0.0 && mf0 > 0.0 {
            0.5 * (mi0 + mf0)
        } else {
            return Err(missing(Degeneracy::ZeroAverageMtbf { phase: 0 }));
        };
        plan.mtbf_average[0] = m1;
        remediate(recovered, PlanField::FirstPhaseMtbf, m1);
        m1
    };

    let last_final = plan.mtbf_final[plan.last_phase()];
    let goal = if plan.mtbf_goal > 0.0 {
        plan.mtbf_goal
    } else {
        let goal = if ttt > 0.0 && t1 > 0.0 && is_rate(alpha) {
            program_final_mtbf(m1, alpha, ttt, t1)
        } else if last_final > 0.0 {
            last_final
        } else {
            return Err(missing(Degeneracy::ZeroFinalMtbf { phase: None }));
        };
        plan.mtbf_goal = goal;
        remediate(recovered, PlanField::MtbfGoal, goal);
        goal
    };

    if ttt <= 0.0 {
        let summed: f64 = plan.test_time.iter().sum();
        ttt = if t1 > 0.0 && is_rate(alpha) {
            program_total_time(m1, goal, alpha, t1).ceil()
        } else if summed > 0.0 {
            summed
        } else {
            return Err(missing(Degeneracy::ZeroTestTime { phase: 0 }));
        };
        plan.total_test_time = ttt;
        remediate(recovered, PlanField::TotalTestTime, ttt);
    }

    if t1 <= 0.0 {
        if !is_rate(alpha) {
            return Err(missing(Degeneracy::InvalidGrowthRate { phase: None, value: alpha }));
        }
        t1 = minimum_first_phase_time(m1, goal, alpha, ttt).ceil();
        plan.test_time[0] = t1;
        remediate(recovered, PlanField::FirstPhaseTestTime, t1);
    }

    if !(ttt.is_finite() && t1.is_finite() && ttt > 0.0 && t1 > 0.0) {
        return Err(missing(Degeneracy::ZeroTestTime { phase: 0 }));
    }

    if !is_rate(alpha) {
        alpha = program_growth_rate(m1, goal, ttt, t1);
        if !is_rate(alpha) {
            debug!(alpha, "closed-form growth rate out of range, solving numerically");
            alpha = solve_growth_rate(m1, goal, ttt, t1)?;
        }
        if !is_rate(alpha) {
            return Err(missing(Degeneracy::InvalidGrowthRate { phase: None, value: alpha }));
        }
        plan.average_growth_rate = alpha;
        remediate(recovered, PlanField::AverageGrowthRate, alpha);
    }

    Ok(IdealizedInputs { m1, alpha, ttt, t1 })
}

/// Idealized Crow-AMSAA growth curve over integer times in [0, ttt).
///
/// Parameters
/// ----------
/// - `plan`: `&mut GrowthPlan`
///   Source of the program inputs; remediated values are written back.
/// - `mtbf`: `bool`
///   `true` for MTBF, `false` for failure intensity.
///
/// Returns
/// -------
/// `PlanResult<Outcome<Vec<f64>>>`
///   One value per time unit; `recovered` lists every remediated input.
///
/// Errors
/// ------
/// - `DegenerateInput` when too many inputs are missing to solve for the
///   rest.
/// - `Solver` when the growth-rate back-solve fails.
pub fn calculate_idealized_growth_curve(
    plan: &mut GrowthPlan, mtbf: bool,
) -> PlanResult<Outcome<Vec<f64>>> {
    plan.validate()?;
    let mut recovered = Vec::new();
    let IdealizedInputs { m1, alpha, ttt, t1 } = resolve_inputs(plan, &mut recovered)?;

    let boundaries: Vec<f64> = plan.phase_boundaries().iter().map(|b| b.floor()).collect();
    let n_points = ttt.floor() as usize;
    let values = (0..n_points)
        .map(|i| {
            let t = i as f64;
            let value = if boundaries.contains(&t) {
                f64::NAN
            } else if t < t1 {
                m1
            } else {
                m1 * (t / t1).powf(alpha) / (1.0 - alpha)
            };
            if mtbf { value } else { 1.0 / value }
        })
        .collect::<Vec<_>>();

    debug!(m1, alpha, ttt, t1, n_points, remediated = recovered.len(), "idealized curve built");
    Ok(Outcome { value: values, recovered })
}

/// Planned step curve: per phase, `ceil(test_time − 1)` copies of the
/// phase's average MTBF (or its reciprocal) followed by one NaN.
///
/// Errors
/// ------
/// - `DegenerateInput(ZeroAverageMtbf)` for a phase with no average MTBF.
pub fn create_planned_values(plan: &GrowthPlan, mtbf: bool) -> PlanResult<Vec<f64>> {
    plan.validate()?;
    let mut values = Vec::new();
    for (phase, (&time, &average)) in plan.test_time.iter().zip(&plan.mtbf_average).enumerate() {
        if average <= 0.0 {
            return Err(missing(Degeneracy::ZeroAverageMtbf { phase }));
        }
        let level = if mtbf { average } else { 1.0 / average };
        let steps = (time - 1.0).ceil().max(0.0) as usize;
        values.extend(std::iter::repeat(level).take(steps));
        values.push(f64::NAN);
    }
    Ok(values)
}

/// Fill the planned growth fields phase by phase.
///
/// For each phase: chain a missing initial MTBF from the previous final
/// MTBF, solve a missing final MTBF from the growth rate or a missing growth
/// rate from the MTBFs. Expected failures and average MTBFs are always
/// recomputed, so a second call leaves a solved plan unchanged.
///
/// Errors
/// ------
/// - Any error from the underlying planner solves.
pub fn calculate_planned_growth_curve(plan: &mut GrowthPlan) -> PlanResult<()> {
    plan.validate()?;
    for p in 0..plan.n_phases {
        if p > 0 && plan.mtbf_initial[p] <= 0.0 {
            plan.mtbf_initial[p] = plan.mtbf_final[p - 1];
        }
        if plan.mtbf_final[p] <= 0.0 {
            calculate_final_mtbf(plan, Some(p))?;
        } else if plan.growth_rate[p] <= 0.0 {
            calculate_growth_rate(plan, Some(p))?;
        }
        if p + 1 < plan.n_phases && plan.mtbf_initial[p + 1] <= 0.0 {
            plan.mtbf_initial[p + 1] = plan.mtbf_final[p];
        }
    }
    for p in 0..plan.n_phases {
        calculate_average_mtbf(plan, p)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Idealized curve values, NaN boundaries and reciprocals.
    // - Remediation of each program input, with rounding of solved times.
    // - Planned step values.
    // - Planned growth curve fill-in and idempotence.
    // -------------------------------------------------------------------------

    fn scenario_plan() -> GrowthPlan {
        let mut plan = GrowthPlan::new(5).unwrap();
        plan.test_time = vec![1000.0, 1500.0, 2500.0, 2000.0, 3000.0];
        plan.mtbf_initial = vec![45.0; 5];
        plan.mtbf_final = vec![55.0; 5];
        plan.mtbf_average = vec![50.0, 73.0, 87.0, 98.0, 106.0];
        plan.average_growth_rate = 0.23;
        plan.total_test_time = 10_000.0;
        plan.mtbf_goal = 110.0;
        plan
    }

    #[test]
    // Purpose
    // -------
    // Verify idealized curve values around the phase boundaries.
    //
    // Given
    // -----
    // - M1 = 50, t1 = 1000, α = 0.23, ttt = 10000.
    //
    // Expect
    // ------
    // - 10000 points; 50 at t = 999; NaN at 1000, 2500, 5000, 7000.
    // - Hand values at 1001, 2499, 2501 and 9999.
    fn idealized_curve_matches_hand_values() {
        // Arrange
        let mut plan = scenario_plan();

        // Act
        let curve = calculate_idealized_growth_curve(&mut plan, true).unwrap();
        let v = &curve.value;

        // Assert
        assert!(curve.is_clean());
        assert_eq!(v.len(), 10_000);
        assert_eq!(v[0], 50.0);
        assert_eq!(v[999], 50.0);
        for b in [1000, 2500, 5000, 7000] {
            assert!(v[b].is_nan(), "expected NaN at {b}");
        }
        assert_relative_eq!(v[1001], 64.94999425339016, max_relative = 1e-12);
        assert_relative_eq!(v[2499], 80.16144146227631, max_relative = 1e-12);
        assert_relative_eq!(v[2501], 80.17619252534828, max_relative = 1e-12);
        assert_relative_eq!(v[9999], 110.27302541258796, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify the failure-intensity form is the reciprocal.
    //
    // Given
    // -----
    // - The scenario plan with `mtbf = false`.
    //
    // Expect
    // ------
    // - 1/50 before t1, NaN at boundaries.
    fn idealized_curve_intensity_is_reciprocal() {
        // Arrange
        let mut plan = scenario_plan();

        // Act
        let v = calculate_idealized_growth_curve(&mut plan, false).unwrap().value;

        // Assert
        assert_relative_eq!(v[10], 0.02, max_relative = 1e-12);
        assert!(v[2500].is_nan());
        assert_relative_eq!(v[1001], 1.0 / 64.94999425339016, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a missing growth rate comes from the closed form.
    //
    // Given
    // -----
    // - The scenario plan with every growth rate zero.
    //
    // Expect
    // ------
    // - α ≈ 0.2306829 written back and reported.
    // - Curve values 65.0076965 at 1001 and 110.5446089 at 9999.
    fn missing_growth_rate_uses_closed_form() {
        // Arrange
        let mut plan = scenario_plan();
        plan.average_growth_rate = 0.0;

        // Act
        let curve = calculate_idealized_growth_curve(&mut plan, true).unwrap();
        let v = &curve.value;

        // Assert
        assert_relative_eq!(plan.average_growth_rate, 0.2306829, epsilon = 1e-7);
        assert!(matches!(
            curve.recovered.as_slice(),
            [Degeneracy::Remediated { field: PlanField::AverageGrowthRate, .. }]
        ));
        assert_relative_eq!(v[1001], 65.0076965, epsilon = 1e-6);
        assert_relative_eq!(v[9999], 110.5446089, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Ensure the numeric solve backs up an out-of-range closed form.
    //
    // Given
    // -----
    // - M1 = 50, goal 60, ttt/t1 = 10: the closed form is ≈ 0.055 and in
    //   range, so it is used directly.
    // - The same times with goal 45 < M1: neither path gives a rate in
    //   (0, 1).
    //
    // Expect
    // ------
    // - The first resolves to the closed form; the second fails with
    //   `InvalidGrowthRate`.
    fn growth_rate_without_root_is_rejected() {
        // Arrange
        let mut growing = scenario_plan();
        growing.average_growth_rate = 0.0;
        growing.mtbf_goal = 60.0;
        let mut shrinking = growing.clone();
        shrinking.mtbf_goal = 45.0;

        // Act
        calculate_idealized_growth_curve(&mut growing, true).unwrap();
        let err = calculate_idealized_growth_curve(&mut shrinking, true);

        // Assert
        assert_relative_eq!(
            growing.average_growth_rate,
            program_growth_rate(50.0, 60.0, 10_000.0, 1000.0),
            max_relative = 1e-15
        );
        assert!(matches!(
            err,
            Err(PlanError::DegenerateInput(Degeneracy::InvalidGrowthRate { phase: None, .. }))
        ));
    }

    #[test]
    // Purpose
    // -------
    // Ensure a missing M1 is solved from the goal before the midpoint is
    // tried.
    //
    // Given
    // -----
    // - The scenario plan with `mtbf_average[0] = 0` (midpoint 50 available).
    //
    // Expect
    // ------
    // - M1 = 110 · 0.77 / 10^0.23 ≈ 49.8750576, written back and reported.
    // - Curve value 64.7876941 at 1001 and 109.9974699 at 9999.
    fn missing_first_phase_mtbf_is_solved_from_goal() {
        // Arrange
        let mut plan = scenario_plan();
        plan.mtbf_average[0] = 0.0;

        // Act
        let curve = calculate_idealized_growth_curve(&mut plan, true).unwrap();
        let v = &curve.value;

        // Assert
        assert_relative_eq!(plan.mtbf_average[0], 49.8750576, epsilon = 1e-7);
        assert_eq!(v[0], plan.mtbf_average[0]);
        assert_eq!(
            curve.recovered,
            vec![Degeneracy::Remediated {
                field: PlanField::FirstPhaseMtbf,
                value: plan.mtbf_average[0]
            }]
        );
        assert_relative_eq!(v[1001], 64.7876941, epsilon = 1e-6);
        assert_relative_eq!(v[9999], 109.9974699, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Ensure the first-phase midpoint fallback is reported.
    //
    // Given
    // -----
    // - No `mtbf_average[0]` and no growth rate, so M1 cannot be solved
    //   from the goal; mi = 45, mf = 55.
    //
    // Expect
    // ------
    // - M1 = 50 reported first, then the closed-form α.
    // - Without the phase MTBFs the call fails with `ZeroAverageMtbf`.
    fn first_phase_midpoint_is_reported() {
        // Arrange
        let mut plan = scenario_plan();
        plan.mtbf_average[0] = 0.0;
        plan.average_growth_rate = 0.0;
        let mut bare = plan.clone();
        bare.mtbf_initial[0] = 0.0;

        // Act
        let curve = calculate_idealized_growth_curve(&mut plan, true).unwrap();
        let err = calculate_idealized_growth_curve(&mut bare, true);

        // Assert
        assert_eq!(plan.mtbf_average[0], 50.0);
        assert!(matches!(
            curve.recovered.as_slice(),
            [
                Degeneracy::Remediated { field: PlanField::FirstPhaseMtbf, value },
                Degeneracy::Remediated { field: PlanField::AverageGrowthRate, .. },
            ] if *value == 50.0
        ));
        assert_eq!(err, Err(PlanError::DegenerateInput(Degeneracy::ZeroAverageMtbf { phase: 0 })));
    }

    #[test]
    // Purpose
    // -------
    // Ensure a missing goal is projected from M1 rather than copied from the
    // last final MTBF.
    //
    // Given
    // -----
    // - The scenario plan with `mtbf_goal = 0` and `mtbf_final[4] = 110`.
    //
    // Expect
    // ------
    // - Goal = 50 · 10^0.23 / 0.77 ≈ 110.2755618; curve unchanged at 1001.
    fn missing_goal_is_projected_from_first_phase() {
        // Arrange
        let mut plan = scenario_plan();
        plan.mtbf_goal = 0.0;
        plan.mtbf_final[4] = 110.0;

        // Act
        let curve = calculate_idealized_growth_curve(&mut plan, true).unwrap();

        // Assert
        assert_relative_eq!(plan.mtbf_goal, 110.2755618, epsilon = 1e-7);
        assert_eq!(curve.recovered.len(), 1);
        assert_relative_eq!(curve.value[1001], 64.9499943, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a missing total test time is solved and rounded up.
    //
    // Given
    // -----
    // - The scenario plan with `total_test_time = 0`.
    //
    // Expect
    // ------
    // - ttt = ceil(9891.8) = 9892, curve length 9892, 107.3313728 at 8890.
    fn missing_total_time_is_rounded_up() {
        // Arrange
        let mut plan = scenario_plan();
        plan.total_test_time = 0.0;

        // Act
        let curve = calculate_idealized_growth_curve(&mut plan, true).unwrap();

        // Assert
        assert_eq!(plan.total_test_time, 9892.0);
        assert_eq!(curve.value.len(), 9892);
        assert_eq!(
            curve.recovered,
            vec![Degeneracy::Remediated { field: PlanField::TotalTestTime, value: 9892.0 }]
        );
        assert_relative_eq!(curve.value[8890], 107.3313728, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a missing first-phase time is rounded up and its boundary is
    // NaN.
    //
    // Given
    // -----
    // - The scenario plan with `test_time[0] = 0`.
    //
    // Expect
    // ------
    // - t1 = ceil(1010.94) = 1011; 50 at 1010, NaN at 1011.
    // - 64.9498319 at 1012 and 109.9959067 at 9999.
    fn missing_first_phase_time_is_rounded_up() {
        // Arrange
        let mut plan = scenario_plan();
        plan.test_time[0] = 0.0;

        // Act
        let curve = calculate_idealized_growth_curve(&mut plan, true).unwrap();
        let v = &curve.value;

        // Assert
        assert_eq!(plan.test_time[0], 1011.0);
        assert_eq!(v[1010], 50.0);
        assert!(v[1011].is_nan());
        assert_relative_eq!(v[1012], 64.9498319, epsilon = 1e-6);
        assert_relative_eq!(v[9999], 109.9959067, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Verify NaN at boundaries that fall between whole time units.
    //
    // Given
    // -----
    // - First phase of 1000.5 units, so every cumulative boundary is at
    //   n + 0.5.
    //
    // Expect
    // ------
    // - NaN at 1000, 2500, 5000 and 7000; 50 at 999.
    // - The value at 1001 uses t1 = 1000.5.
    fn fractional_boundaries_are_nan() {
        // Arrange
        let mut plan = scenario_plan();
        plan.test_time[0] = 1000.5;
        plan.total_test_time = 10_000.5;

        // Act
        let v = calculate_idealized_growth_curve(&mut plan, true).unwrap().value;

        // Assert
        assert_eq!(v.len(), 10_000);
        assert_eq!(v[999], 50.0);
        for b in [1000, 2500, 5000, 7000] {
            assert!(v[b].is_nan(), "expected NaN at {b}");
        }
        assert_relative_eq!(
            v[1001],
            50.0 * (1001.0f64 / 1000.5).powf(0.23) / 0.77,
            max_relative = 1e-12
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify the planned step values.
    //
    // Given
    // -----
    // - Two phases of 3 and 2.5 time units with averages 10 and 20.
    //
    // Expect
    // ------
    // - [10, 10, NaN, 20, 20, NaN]; a zero average is an error.
    fn planned_values_step_with_nan_closers() {
        // Arrange
        let mut plan = GrowthPlan::new(2).unwrap();
        plan.test_time = vec![3.0, 2.5];
        plan.mtbf_average = vec![10.0, 20.0];

        // Act
        let v = create_planned_values(&plan, true).unwrap();
        let f = create_planned_values(&plan, false).unwrap();
        plan.mtbf_average[1] = 0.0;

        // Assert
        assert_eq!(v.len(), 6);
        assert_eq!(&v[..2], &[10.0, 10.0]);
        assert!(v[2].is_nan() && v[5].is_nan());
        assert_eq!(&v[3..5], &[20.0, 20.0]);
        assert_relative_eq!(f[3], 0.05, max_relative = 1e-12);
        assert_eq!(
            create_planned_values(&plan, true),
            Err(PlanError::DegenerateInput(Degeneracy::ZeroAverageMtbf { phase: 1 }))
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify the planned growth curve fills final MTBFs and averages.
    //
    // Given
    // -----
    // - Five phases at α = 0.23 with only `mtbf_initial[0] = 35.8`.
    //
    // Expect
    // ------
    // - Last final MTBF ≈ 78.9573 and phase 4 average ≈ 75.9476.
    fn planned_growth_curve_fills_plan() {
        // Arrange
        let mut plan = GrowthPlan::new(5).unwrap();
        plan.test_time = vec![1000.0, 1500.0, 2500.0, 2000.0, 3000.0];
        plan.growth_rate = vec![0.23; 5];
        plan.mtbf_initial[0] = 35.8;

        // Act
        calculate_planned_growth_curve(&mut plan).unwrap();

        // Assert
        assert_relative_eq!(plan.mtbf_final[4], 78.95730228328628, max_relative = 1e-12);
        assert_relative_eq!(plan.mtbf_average[4], 75.94762013223114, max_relative = 1e-10);
        assert_relative_eq!(plan.mtbf_initial[3], plan.mtbf_final[2], max_relative = 1e-15);
    }

    proptest! {
        // Purpose
        // -------
        // A second planned-growth-curve pass is a fixed point.
        //
        // Given
        // -----
        // - 1 to 4 phases with random times, rates and M1.
        //
        // Expect
        // ------
        // - The plan after two passes equals the plan after one.
        #[test]
        fn planned_growth_curve_is_idempotent(
            times in prop::collection::vec(50.0f64..2000.0, 1..5),
            rate in 0.05f64..0.6,
            m1 in 5.0f64..200.0,
        ) {
            let mut plan = GrowthPlan::new(times.len()).unwrap();
            plan.test_time = times.clone();
            plan.growth_rate = vec![rate; times.len()];
            plan.mtbf_initial[0] = m1;

            calculate_planned_growth_curve(&mut plan).unwrap();
            let once = plan.clone();
            calculate_planned_growth_curve(&mut plan).unwrap();

            prop_assert_eq!(plan, once);
        }

        // Purpose
        // -------
        // NaN appears exactly at integer phase boundaries.
        //
        // Given
        // -----
        // - 1 to 4 phases of integer length, α in (0.05, 0.6), M1 given.
        //
        // Expect
        // ------
        // - NaN at each boundary below ttt, finite everywhere else.
        #[test]
        fn idealized_curve_nan_only_at_boundaries(
            times in prop::collection::vec(2u32..300, 1..5),
            rate in 0.05f64..0.6,
            m1 in 5.0f64..200.0,
        ) {
            let mut plan = GrowthPlan::new(times.len()).unwrap();
            plan.test_time = times.iter().map(|&t| f64::from(t)).collect();
            plan.mtbf_average[0] = m1;
            plan.average_growth_rate = rate;
            plan.total_test_time = plan.test_time.iter().sum();

            let values = calculate_idealized_growth_curve(&mut plan, true).unwrap().value;
            let boundaries = plan.phase_boundaries();

            for (i, v) in values.iter().enumerate() {
                let at_boundary = boundaries.contains(&(i as f64));
                prop_assert_eq!(v.is_nan(), at_boundary, "index {}", i);
            }
        }
    }
}
