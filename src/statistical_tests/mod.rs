//! statistical_tests — goodness-of-fit tests for reliability growth models.
//!
//! Purpose
//! -------
//! Collect the statistical tests used to check a fitted Crow-AMSAA model
//! and their shared infrastructure: input validation, a tabulated
//! critical-value source, and a dedicated error type.
//!
//! Key behaviors
//! -------------
//! - Cramér–von Mises test for exact failure times via [`CvmOutcome`] and
//!   [`cramer_von_mises_statistic`], with critical values from
//!   [`cvm_table`].
//! - Chi-square tests for exact and grouped data via [`ChiSquareOutcome`].
//! - Input guards in [`validation`] so each test checks sample size,
//!   finiteness, ordering, and shape in one consistent way.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are plain slices of pooled times and counts; this subtree does
//!   not depend on the record store or session types.
//! - Tests report failures via [`GofResult`] and never panic on invalid
//!   user input.
//!
//! Downstream usage
//! ----------------
//! - `GrowthSession::goodness_of_fit` runs both tests after estimation.
//! - Python bindings rely on `From<GofError> for PyErr` to raise
//!   `ValueError`.
//!
//! Testing notes
//! -------------
//! - Each module carries unit tests against the 22-failure and six-interval
//!   reference data sets.

pub mod chi_square;
pub mod cramer_von_mises;
pub mod cvm_table;
pub mod errors;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::chi_square::ChiSquareOutcome;
pub use self::cramer_von_mises::{CvmOutcome, cramer_von_mises_statistic};
pub use self::errors::{GofError, GofResult};
pub use self::validation::validate_times;

pub mod prelude {
    pub use super::chi_square::ChiSquareOutcome;
    pub use super::cramer_von_mises::{CvmOutcome, cramer_von_mises_statistic};
    pub use super::errors::{GofError, GofResult};
}
