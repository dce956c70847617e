//! planning::feasibility — sanity checks of a growth test plan.
//!
//! Purpose
//! -------
//! Compare a plan against the MIL-HDBK-189C rules of thumb and flag phases
//! whose staffing or calendar makes the planned test time implausible.
//!
//! Key behaviors
//! -------------
//! - Ratios: initial/goal MTBF (`ms_ratio`) and goal/potential MTBF
//!   (`fef_ratio`), each 0 when its denominator is 0.
//! - Per phase, writes test time per unit (`tpu`) and per unit per week
//!   (`tpupw`) into the plan. A phase with no test units or with equal start
//!   and end dates gets 0 and is flagged.
//! - Fills per-phase management strategy and detection probability when
//!   they are out of (0, 1].
//! - Classifies each ratio as low, acceptable or high.
//!
//! Conventions
//! -----------
//! - Flags hold the last offending phase, `None` when every phase passes.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::planning::{
    errors::{Degeneracy, PlanResult},
    plan::GrowthPlan,
    planner::{calculate_management_strategy, calculate_probability},
};

/// Placement of a ratio against its recommended range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assessment {
    Low,
    Acceptable,
    High,
}

impl Assessment {
    fn classify(value: f64, (lo, hi): (f64, f64)) -> Self {
        if value < lo {
            Assessment::Low
        } else if value > hi {
            Assessment::High
        } else {
            Assessment::Acceptable
        }
    }
}

/// Recommended initial/goal MTBF range.
pub const INITIAL_GOAL_RANGE: (f64, f64) = (0.15, 0.47);
/// Recommended goal/growth-potential MTBF range.
pub const GOAL_POTENTIAL_RANGE: (f64, f64) = (0.60, 0.80);
/// Recommended average fix effectiveness range.
pub const FEF_RANGE: (f64, f64) = (0.55, 0.85);
/// Recommended program growth rate range.
pub const GROWTH_RATE_RANGE: (f64, f64) = (0.23, 0.64);

/// Result of [`assess`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityReport {
    /// `mtbf_initial[0] / mtbf_goal`.
    pub ms_ratio: f64,
    /// `mtbf_goal / mtbf_goal_program`.
    pub fef_ratio: f64,
    pub understaffed_phase: Option<usize>,
    pub same_date_phase: Option<usize>,
    pub initial_goal: Assessment,
    pub goal_potential: Assessment,
    pub fef: Assessment,
    pub growth_rate: Assessment,
    /// Substitutes used while filling management strategy and probability.
    pub recovered: Vec<Degeneracy>,
}

impl FeasibilityReport {
    /// `true` when no phase was flagged and every ratio is in range.
    pub fn is_feasible(&self) -> bool {
        self.understaffed_phase.is_none()
            && self.same_date_phase.is_none()
            && [self.initial_goal, self.goal_potential, self.fef, self.growth_rate]
                .iter()
                .all(|a| *a == Assessment::Acceptable)
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

/// Assess `plan`, writing `tpu`, `tpupw`, and any out-of-range management
/// strategy and probability values.
///
/// Errors
/// ------
/// - `PlanError` from plan validation.
pub fn assess(plan: &mut GrowthPlan) -> PlanResult<FeasibilityReport> {
    plan.validate()?;
    let ms_ratio = ratio(plan.mtbf_initial[0], plan.mtbf_goal);
    let fef_ratio = ratio(plan.mtbf_goal, plan.mtbf_goal_program);

    let mut understaffed_phase = None;
    let mut same_date_phase = None;
    let mut recovered = Vec::new();

    for p in 0..plan.n_phases {
        let units = plan.n_test_units[p];
        plan.tpu[p] = if units == 0 {
            understaffed_phase = Some(p);
            0.0
        } else {
            plan.test_time[p] / f64::from(units)
        };

        let days = plan.end_date[p] - plan.start_date[p];
        plan.tpupw[p] = if days == 0 {
            same_date_phase = Some(p);
            0.0
        } else {
            plan.tpu[p] / (days as f64 / 7.0)
        };

        let ms = plan.management_strategy[p];
        if ms <= 0.0 || ms > 1.0 {
            recovered.extend(calculate_management_strategy(plan, Some(p))?.recovered);
        }
        let prob = plan.probability_of_detection[p];
        if prob <= 0.0 || prob > 1.0 {
            recovered.extend(calculate_probability(plan, p)?.recovered);
        }
    }

    if let Some(phase) = understaffed_phase {
        warn!(phase, "phase has no test units");
    }
    if let Some(phase) = same_date_phase {
        warn!(phase, "phase starts and ends on the same date");
    }

    let report = FeasibilityReport {
        ms_ratio,
        fef_ratio,
        understaffed_phase,
        same_date_phase,
        initial_goal: Assessment::classify(ms_ratio, INITIAL_GOAL_RANGE),
        goal_potential: Assessment::classify(fef_ratio, GOAL_POTENTIAL_RANGE),
        fef: Assessment::classify(plan.average_fef, FEF_RANGE),
        growth_rate: Assessment::classify(plan.program_growth_rate(), GROWTH_RATE_RANGE),
        recovered,
    };
    debug!(ms_ratio, fef_ratio, feasible = report.is_feasible(), "plan assessed");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover ratio computation, per-unit time, phase flags,
    // filling of management strategy, and range classification.
    // -------------------------------------------------------------------------

    fn staffed_plan() -> GrowthPlan {
        let mut plan = GrowthPlan::new(5).unwrap();
        plan.test_time = vec![1000.0, 1500.0, 2500.0, 2000.0, 3000.0];
        plan.growth_rate = vec![0.3; 5];
        plan.mtbf_initial = vec![30.0, 40.0, 50.0, 60.0, 70.0];
        plan.mtbf_goal = 100.0;
        plan.mtbf_goal_program = 140.0;
        plan.average_fef = 0.7;
        plan.fef = vec![0.7; 5];
        plan.management_strategy = vec![0.9; 5];
        plan.probability_of_detection = vec![0.95; 5];
        plan.n_test_units = vec![5, 5, 0, 4, 3];
        plan.start_date = vec![0, 70, 140, 210, 280];
        plan.end_date = vec![70, 140, 210, 280, 350];
        plan
    }

    #[test]
    // Purpose
    // -------
    // Verify that a phase with no test units is flagged.
    //
    // Given
    // -----
    // - Units [5, 5, 0, 4, 3] and ten-week phases.
    //
    // Expect
    // ------
    // - Phase 2 flagged, tpu[2] = tpupw[2] = 0, tpu[0] = 200, tpupw[0] = 20.
    fn understaffed_phase_is_flagged() {
        // Arrange
        let mut plan = staffed_plan();

        // Act
        let report = assess(&mut plan).unwrap();

        // Assert
        assert_eq!(report.understaffed_phase, Some(2));
        assert_eq!(report.same_date_phase, None);
        assert_eq!(plan.tpu[2], 0.0);
        assert_eq!(plan.tpupw[2], 0.0);
        assert_relative_eq!(plan.tpu[0], 200.0);
        assert_relative_eq!(plan.tpupw[0], 20.0);
        assert!(!report.is_feasible());
    }

    #[test]
    // Purpose
    // -------
    // Verify the ratios, same-date flag and classification.
    //
    // Given
    // -----
    // - Phase 3 starting and ending on the same day, M1/goal = 0.3,
    //   goal/potential = 100/140.
    //
    // Expect
    // ------
    // - Phase 3 flagged; both ratios acceptable; growth rate 0.3 acceptable.
    fn ratios_and_same_date_flag() {
        // Arrange
        let mut plan = staffed_plan();
        plan.n_test_units[2] = 2;
        plan.end_date[3] = plan.start_date[3];

        // Act
        let report = assess(&mut plan).unwrap();

        // Assert
        assert_eq!(report.same_date_phase, Some(3));
        assert_eq!(report.understaffed_phase, None);
        assert_relative_eq!(report.ms_ratio, 0.3);
        assert_relative_eq!(report.fef_ratio, 100.0 / 140.0);
        assert_eq!(report.initial_goal, Assessment::Acceptable);
        assert_eq!(report.goal_potential, Assessment::Acceptable);
        assert_eq!(report.growth_rate, Assessment::Acceptable);
    }

    #[test]
    // Purpose
    // -------
    // Ensure out-of-range management strategy and probability are filled.
    //
    // Given
    // -----
    // - Phase 1 with ms = 0 and probability = 0; phase 4 with zero FEF and
    //   ms = 0.
    //
    // Expect
    // ------
    // - Phase 1 ms = (1 − 40/140)/0.7 and its probability recomputed.
    // - Phase 4 ms = 100.0 with a `ZeroFef` entry in `recovered`.
    fn fills_out_of_range_strategy_and_probability() {
        // Arrange
        let mut plan = staffed_plan();
        plan.management_strategy[1] = 0.0;
        plan.probability_of_detection[1] = 0.0;
        plan.management_strategy[4] = 0.0;
        plan.fef[4] = 0.0;

        // Act
        let report = assess(&mut plan).unwrap();

        // Assert
        let ms1 = (1.0 - 40.0 / 140.0) / 0.7;
        assert_relative_eq!(plan.management_strategy[1], ms1, max_relative = 1e-12);
        assert_relative_eq!(
            plan.probability_of_detection[1],
            1.0 - (-1500.0 * ms1 / 40.0).exp(),
            max_relative = 1e-12
        );
        assert_eq!(plan.management_strategy[4], 100.0);
        assert_eq!(report.recovered, vec![Degeneracy::ZeroFef { phase: Some(4) }]);
    }

    #[test]
    // Purpose
    // -------
    // Verify zero denominators give zero ratios and low classifications.
    //
    // Given
    // -----
    // - A one-phase plan with no goal and no growth potential.
    //
    // Expect
    // ------
    // - Both ratios 0 and classified `Low`.
    fn zero_denominators_give_zero_ratios() {
        // Arrange
        let mut plan = GrowthPlan::new(1).unwrap();
        plan.mtbf_initial[0] = 10.0;
        plan.n_test_units[0] = 1;
        plan.end_date[0] = 7;

        // Act
        let report = assess(&mut plan).unwrap();

        // Assert
        assert_eq!(report.ms_ratio, 0.0);
        assert_eq!(report.fef_ratio, 0.0);
        assert_eq!(report.initial_goal, Assessment::Low);
        assert_eq!(report.goal_potential, Assessment::Low);
    }
}
