//! planning::plan — the per-phase reliability growth test plan.
//!
//! Purpose
//! -------
//! Hold every input and output of a MIL-HDBK-189 growth test plan in one
//! struct with named, fixed-length per-phase arrays, validated at
//! construction and serializable for a persistence layer.
//!
//! Key behaviors
//! -------------
//! - [`GrowthPlan::new`] builds an all-zero plan for `n_phases` phases.
//! - [`GrowthPlan::validate`] checks the phase count and that every array
//!   has exactly `n_phases` entries.
//! - Small helpers expose the derived quantities the planner formulas need:
//!   cumulative test time, total test time, and the program growth rate.
//!
//! Conventions
//! -----------
//! - A value `<= 0.0` means "not yet known"; planner routines fill such
//!   fields from the others.
//! - Dates are day ordinals (days since a fixed epoch).

use serde::{Deserialize, Serialize};

use crate::planning::errors::{PlanError, PlanResult};

/// `GrowthPlan` — inputs and solved values of a growth test plan.
///
/// Fields
/// ------
/// Per phase (length `n_phases`):
/// - `test_time`, `growth_rate`, `mtbf_initial`, `mtbf_final`,
///   `mtbf_average`, `n_failures`.
/// - `management_strategy`, `fef`, `probability_of_detection`.
/// - `start_date`, `end_date` (day ordinals), `n_test_units`.
/// - `tpu` (test time per unit) and `tpupw` (per unit per week), written by
///   the feasibility assessor.
///
/// Program level:
/// - `total_test_time`, `mtbf_goal`, `mtbf_goal_program` (growth
///   potential), `average_growth_rate`, `average_ms`, `average_fef`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthPlan {
    pub n_phases: usize,

    pub test_time: Vec<f64>,
    pub growth_rate: Vec<f64>,
    pub mtbf_initial: Vec<f64>,
    pub mtbf_final: Vec<f64>,
    pub mtbf_average: Vec<f64>,
    pub n_failures: Vec<f64>,
    pub management_strategy: Vec<f64>,
    pub fef: Vec<f64>,
    pub probability_of_detection: Vec<f64>,
    pub start_date: Vec<i64>,
    pub end_date: Vec<i64>,
    pub n_test_units: Vec<u32>,
    pub tpu: Vec<f64>,
    pub tpupw: Vec<f64>,

    pub total_test_time: f64,
    pub mtbf_goal: f64,
    pub mtbf_goal_program: f64,
    pub average_growth_rate: f64,
    pub average_ms: f64,
    pub average_fef: f64,
}

impl GrowthPlan {
    /// All-zero plan with `n_phases` phases.
    ///
    /// Errors
    /// ------
    /// - `PlanError::InvalidPhaseCount` when `n_phases == 0`.
    pub fn new(n_phases: usize) -> PlanResult<Self> {
        if n_phases == 0 {
            return Err(PlanError::InvalidPhaseCount { n_phases });
        }
        let zeros = vec![0.0; n_phases];
        Ok(GrowthPlan {
            n_phases,
            test_time: zeros.clone(),
            growth_rate: zeros.clone(),
            mtbf_initial: zeros.clone(),
            mtbf_final: zeros.clone(),
            mtbf_average: zeros.clone(),
            n_failures: zeros.clone(),
            management_strategy: zeros.clone(),
            fef: zeros.clone(),
            probability_of_detection: zeros.clone(),
            start_date: vec![0; n_phases],
            end_date: vec![0; n_phases],
            n_test_units: vec![0; n_phases],
            tpu: zeros.clone(),
            tpupw: zeros,
            total_test_time: 0.0,
            mtbf_goal: 0.0,
            mtbf_goal_program: 0.0,
            average_growth_rate: 0.0,
            average_ms: 0.0,
            average_fef: 0.0,
        })
    }

    /// Check the phase count and every per-phase array length.
    pub fn validate(&self) -> PlanResult<()> {
        if self.n_phases == 0 {
            return Err(PlanError::InvalidPhaseCount { n_phases: self.n_phases });
        }
        let lengths = [
            ("test_time", self.test_time.len()),
            ("growth_rate", self.growth_rate.len()),
            ("mtbf_initial", self.mtbf_initial.len()),
            ("mtbf_final", self.mtbf_final.len()),
            ("mtbf_average", self.mtbf_average.len()),
            ("n_failures", self.n_failures.len()),
            ("management_strategy", self.management_strategy.len()),
            ("fef", self.fef.len()),
            ("probability_of_detection", self.probability_of_detection.len()),
            ("start_date", self.start_date.len()),
            ("end_date", self.end_date.len()),
            ("n_test_units", self.n_test_units.len()),
            ("tpu", self.tpu.len()),
            ("tpupw", self.tpupw.len()),
        ];
        for (field, found) in lengths {
            if found != self.n_phases {
                return Err(PlanError::LengthMismatch { field, expected: self.n_phases, found });
            }
        }
        Ok(())
    }

    /// Validate and check that `phase` exists.
    pub fn check_phase(&self, phase: usize) -> PlanResult<()> {
        self.validate()?;
        if phase >= self.n_phases {
            return Err(PlanError::PhaseOutOfRange { phase, n_phases: self.n_phases });
        }
        Ok(())
    }

    pub fn last_phase(&self) -> usize {
        self.n_phases - 1
    }

    /// Test time accumulated through the end of `phase`.
    pub fn cumulative_time(&self, phase: usize) -> f64 {
        self.test_time.iter().take(phase + 1).sum()
    }

    /// Cumulative time at the end of each phase.
    pub fn phase_boundaries(&self) -> Vec<f64> {
        self.test_time
            .iter()
            .scan(0.0, |acc, t| {
                *acc += t;
                Some(*acc)
            })
            .collect()
    }

    /// `total_test_time` when set, else the sum of phase test times.
    pub fn total_time(&self) -> f64 {
        if self.total_test_time > 0.0 { self.total_test_time } else { self.test_time.iter().sum() }
    }

    /// `average_growth_rate` when set, else the test-time-weighted mean of
    /// the phase growth rates (0 when no time is planned).
    pub fn program_growth_rate(&self) -> f64 {
        if self.average_growth_rate > 0.0 {
            return self.average_growth_rate;
        }
        let total: f64 = self.test_time.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.test_time.iter().zip(&self.growth_rate).map(|(t, a)| t * a).sum::<f64>() / total
    }

    /// Final MTBF of the last phase, falling back to the goal MTBF.
    pub fn program_final_mtbf(&self) -> f64 {
        let last = self.mtbf_final[self.last_phase()];
        if last > 0.0 { last } else { self.mtbf_goal }
    }
}
