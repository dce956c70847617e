//! planning — MIL-HDBK-189 reliability growth test planning.
//!
//! Purpose
//! -------
//! Solve, check and plot a multi-phase growth test plan: fill unknown
//! MTBFs, times and growth rates from the known ones, synthesize idealized
//! and planned curves, and assess staffing and rule-of-thumb ratios.
//!
//! Key behaviors
//! -------------
//! - [`GrowthPlan`] holds the validated per-phase arrays.
//! - [`planner`] solve functions mutate the plan in place.
//! - [`curves`] builds plotting sequences with NaN phase markers.
//! - [`feasibility::assess`] produces a [`FeasibilityReport`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs with a documented substitute succeed with an [`Outcome`] that
//!   lists the recovered [`Degeneracy`]; all other failures are
//!   [`PlanError`]s.
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use rust_growth::planning::prelude::*;
//!
//! let mut plan = GrowthPlan::new(2).unwrap();
//! plan.test_time = vec![1000.0, 3000.0];
//! plan.total_test_time = 4000.0;
//! plan.growth_rate = vec![0.3, 0.3];
//! plan.mtbf_initial[0] = 40.0;
//! calculate_planned_growth_curve(&mut plan).unwrap();
//! let curve = calculate_idealized_growth_curve(&mut plan, true).unwrap();
//! assert_eq!(curve.value.len(), 4000);
//! ```

pub mod curves;
pub mod errors;
pub mod feasibility;
pub mod plan;
pub mod planner;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::curves::{
    calculate_idealized_growth_curve, calculate_planned_growth_curve, create_planned_values,
};
pub use self::errors::{Degeneracy, Outcome, PlanError, PlanField, PlanResult};
pub use self::feasibility::{Assessment, FeasibilityReport, assess};
pub use self::plan::GrowthPlan;
pub use self::planner::{
    calculate_average_mtbf, calculate_final_mtbf, calculate_growth_potential,
    calculate_growth_rate, calculate_initial_mtbf, calculate_management_strategy,
    calculate_minimum_first_phase_time, calculate_probability, calculate_total_time,
};

pub mod prelude {
    pub use super::curves::{
        calculate_idealized_growth_curve, calculate_planned_growth_curve, create_planned_values,
    };
    pub use super::errors::{Degeneracy, Outcome, PlanError, PlanResult};
    pub use super::feasibility::{FeasibilityReport, assess};
    pub use super::plan::GrowthPlan;
    pub use super::planner::*;
}
