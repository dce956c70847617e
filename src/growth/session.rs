//! growth::session — one growth analysis run: configuration plus results.
//!
//! Purpose
//! -------
//! Tie together the validated [`GrowthOptions`], the Crow-AMSAA fit, the
//! bounded mean curves, and the goodness-of-fit results for a single failure
//! log, and enforce the order in which they may be computed.
//!
//! Key behaviors
//! -------------
//! - [`GrowthSession::estimate`] fits α̂/β̂ and clears any stale downstream
//!   results.
//! - [`GrowthSession::calculate_mean_values`] and
//!   [`GrowthSession::goodness_of_fit`] require a fit and return
//!   `GrowthError::NotEstimated` otherwise.
//! - [`GrowthSession::run`] performs all three steps in order.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every derived field was computed from the same store and options as
//!   the current fit. Re-estimating drops derived results.
//! - The session keeps no reference to the store; callers pass the same
//!   store to each step.
//!
//! Conventions
//! -----------
//! - The Cramér–von Mises test needs exact failure times and is skipped
//!   (left `None`) for grouped data.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::growth::{
    bounds::Bounded,
    errors::{GrowthError, GrowthResult},
    estimator::{CrowAmsaaEstimator, CrowAmsaaFit},
    mean_values::{MeanValueCalculator, MeanValues},
    options::GrowthOptions,
    records::FailureRecordStore,
};
use crate::statistical_tests::{ChiSquareOutcome, CvmOutcome};

/// `GrowthSession` — configuration and derived state of one analysis.
///
/// Fields
/// ------
/// - `options`: validated configuration.
/// - `fit`: α̂ and β̂ with bounds, once estimated.
/// - `mean_values`: bounded mean curves, once computed.
/// - `cramer_vonmises`: Cramér–von Mises outcome (exact data only).
/// - `chi_square`: chi-square outcome.
///
/// Notes
/// -----
/// - Serializable so an orchestrator can persist a finished analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthSession {
    options: GrowthOptions,
    fit: Option<CrowAmsaaFit>,
    mean_values: Option<MeanValues>,
    cramer_vonmises: Option<CvmOutcome>,
    chi_square: Option<ChiSquareOutcome>,
}

impl GrowthSession {
    /// Start a session after validating `options`.
    pub fn new(options: GrowthOptions) -> GrowthResult<Self> {
        options.validate()?;
        Ok(GrowthSession {
            options,
            fit: None,
            mean_values: None,
            cramer_vonmises: None,
            chi_square: None,
        })
    }

    pub fn options(&self) -> &GrowthOptions {
        &self.options
    }

    /// Fit the Crow-AMSAA model to `store`.
    ///
    /// Errors
    /// ------
    /// - Any error from [`CrowAmsaaEstimator::estimate`]. On error the
    ///   previous fit is kept.
    pub fn estimate(&mut self, store: &FailureRecordStore) -> GrowthResult<&CrowAmsaaFit> {
        let fit = CrowAmsaaEstimator::new(self.options)?.estimate(store)?;
        self.mean_values = None;
        self.cramer_vonmises = None;
        self.chi_square = None;
        Ok(self.fit.insert(fit))
    }

    /// Evaluate bounded mean curves at every failure time.
    ///
    /// Errors
    /// ------
    /// - `GrowthError::NotEstimated` if [`estimate`](Self::estimate) has not
    ///   succeeded.
    pub fn calculate_mean_values(
        &mut self, store: &FailureRecordStore,
    ) -> GrowthResult<&MeanValues> {
        let fit = self.fit.as_ref().ok_or(GrowthError::NotEstimated)?;
        let values = MeanValueCalculator::for_fit(fit).compute(store, &fit.alpha, &fit.beta)?;
        Ok(self.mean_values.insert(values))
    }

    /// Run the Cramér–von Mises (exact data) and chi-square tests.
    ///
    /// Errors
    /// ------
    /// - `GrowthError::NotEstimated` before a fit exists.
    /// - `GrowthError::GoodnessOfFit` when a test rejects its inputs.
    pub fn goodness_of_fit(&mut self, store: &FailureRecordStore) -> GrowthResult<()> {
        let fit = self.fit.as_ref().ok_or(GrowthError::NotEstimated)?;
        let confidence = self.options.confidence;
        let time_terminated = self.options.time_terminated();

        if self.options.grouped {
            let (edges, counts) = store.merged_by_time();
            self.cramer_vonmises = None;
            self.chi_square = Some(ChiSquareOutcome::grouped(
                &edges,
                &counts,
                fit.alpha.point,
                fit.beta.point,
                fit.n_units as f64,
                confidence,
            )?);
        } else {
            let t_star = time_terminated.then_some(self.options.test_termination_time);
            self.cramer_vonmises = Some(CvmOutcome::cramer_von_mises(
                &store.times(),
                fit.beta.point,
                t_star,
                !time_terminated,
                confidence,
            )?);
            self.chi_square = Some(ChiSquareOutcome::exact(
                fit.n_failures,
                fit.beta.point,
                confidence,
                time_terminated,
            )?);
        }

        debug!(
            cramer_vonmises = self.cramer_vonmises.map(|c| c.statistic),
            chi_square = self.chi_square.map(|c| c.statistic),
            "goodness of fit"
        );
        Ok(())
    }

    /// Estimate, compute mean values, and run the goodness-of-fit tests.
    pub fn run(&mut self, store: &FailureRecordStore) -> GrowthResult<()> {
        self.estimate(store)?;
        self.calculate_mean_values(store)?;
        self.goodness_of_fit(store)
    }

    /// Observed growth rate `1 − β` as `(1 − β_hi, 1 − β̂, 1 − β_lo)`.
    pub fn assess_growth_rate(&self) -> GrowthResult<Bounded> {
        let beta = self.beta_hat().ok_or(GrowthError::NotEstimated)?;
        Ok(Bounded::new(1.0 - beta.upper, 1.0 - beta.point, 1.0 - beta.lower))
    }

    pub fn fit(&self) -> Option<&CrowAmsaaFit> {
        self.fit.as_ref()
    }

    pub fn alpha_hat(&self) -> Option<Bounded> {
        self.fit.map(|f| f.alpha)
    }

    pub fn beta_hat(&self) -> Option<Bounded> {
        self.fit.map(|f| f.beta)
    }

    pub fn mean_values(&self) -> Option<&MeanValues> {
        self.mean_values.as_ref()
    }

    /// Expected cumulative failures per failure time.
    pub fn cum_mean(&self) -> Option<&[Bounded]> {
        self.mean_values.as_ref().map(|m| m.cum_mean.as_slice())
    }

    /// Failure intensity per failure time.
    pub fn instantaneous_mean(&self) -> Option<&[Bounded]> {
        self.mean_values.as_ref().map(|m| m.instantaneous_mean.as_slice())
    }

    pub fn cramer_vonmises(&self) -> Option<&CvmOutcome> {
        self.cramer_vonmises.as_ref()
    }

    pub fn chi_square(&self) -> Option<&ChiSquareOutcome> {
        self.chi_square.as_ref()
    }
}
