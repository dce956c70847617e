//! growth — Crow-AMSAA reliability growth estimation.
//!
//! Purpose
//! -------
//! Fit the power-law NHPP (Crow-AMSAA) model to test failure logs and derive
//! the quantities a growth analysis reports: bounded scale and shape
//! estimates, cumulative and instantaneous mean curves, goodness-of-fit
//! results, and the observed growth rate. A Duane log-log regression and a
//! Cox-Lewis log-linear model are available as alternative fits.
//!
//! Key behaviors
//! -------------
//! - [`FailureRecordStore`] validates raw failure records once.
//! - [`CrowAmsaaEstimator`] fits exact or grouped data with Crow or Fisher
//!   bounds.
//! - [`fit_power_law`] returns bounded (α, β) by maximum likelihood or
//!   Duane regression.
//! - [`LogLinearFit`] fits λ(t) = exp(γ₀ + γ₁ t).
//! - [`MeanValueCalculator`] evaluates bounded curves at failure times.
//! - [`GrowthSession`] runs the steps in dependency order and keeps the
//!   results together.
//!
//! Invariants & assumptions
//! ------------------------
//! - Estimation and mean-value routines report hard errors via
//!   [`GrowthResult`]; they never substitute default values.
//! - Iterative solves are capped by [`RootSolverOptions`].
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use rust_growth::growth::prelude::*;
//!
//! let times = [2.7, 10.3, 12.5, 30.6, 57.0, 61.3, 80.0, 109.5];
//! let store = FailureRecordStore::new(
//!     times.iter().map(|&t| FailureRecord::exact(1, t)).collect(),
//! )
//! .unwrap();
//! let mut session = GrowthSession::new(GrowthOptions::default()).unwrap();
//! session.run(&store).unwrap();
//! assert!(session.beta_hat().is_some());
//! ```

pub mod bounds;
pub mod duane;
pub mod errors;
pub mod estimator;
pub mod grouped;
pub mod loglinear;
pub mod mean_values;
pub mod options;
pub mod power_law;
pub mod records;
pub mod session;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::bounds::{Bounded, Termination};
pub use self::duane::DuaneFit;
pub use self::errors::{GrowthError, GrowthResult};
pub use self::estimator::{CrowAmsaaEstimator, CrowAmsaaFit, estimate};
pub use self::loglinear::LogLinearFit;
pub use self::mean_values::{MeanValueCalculator, MeanValues};
pub use self::options::{BoundsMethod, GrowthOptions, RootSolverOptions};
pub use self::power_law::{FitMethod, PowerLawFit, fit_power_law};
pub use self::records::{FailureRecord, FailureRecordStore};
pub use self::session::GrowthSession;

pub mod prelude {
    pub use super::bounds::{Bounded, Termination};
    pub use super::duane::DuaneFit;
    pub use super::errors::{GrowthError, GrowthResult};
    pub use super::estimator::{CrowAmsaaEstimator, CrowAmsaaFit};
    pub use super::loglinear::LogLinearFit;
    pub use super::mean_values::{MeanValueCalculator, MeanValues};
    pub use super::options::{BoundsMethod, GrowthOptions, RootSolverOptions};
    pub use super::power_law::{FitMethod, PowerLawFit, fit_power_law};
    pub use super::records::{FailureRecord, FailureRecordStore};
    pub use super::session::GrowthSession;
}
