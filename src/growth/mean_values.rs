//! growth::mean_values — cumulative and instantaneous means at failure times.
//!
//! Purpose
//! -------
//! Evaluate the fitted Crow-AMSAA model at every distinct observed failure
//! time, giving the bounded curves that reports and plots consume.
//!
//! Key behaviors
//! -------------
//! - Expected cumulative failures M(t) = K α t^β and failure intensity
//!   λ(t) = K α β t^(β−1) over all K units, so M(t) is directly comparable
//!   with the observed cumulative count. Each bound pairs its own (α, β),
//!   so the lower, point, and upper curves are three separate model
//!   evaluations.
//! - Cumulative MTBF (1/α) t^(1−β) per unit, with Crow chi-square bounds
//!   built from the observed cumulative count over K·t unit-hours.
//! - Instantaneous MTBF per unit, 1/(α β t^(β−1)), with bounds from the
//!   paired (α, β) bounds.
//!
//! Invariants & assumptions
//! ------------------------
//! - Evaluation happens only at recorded times, never on a fixed grid.
//! - Tied failure times collapse to one point carrying the cumulative count
//!   after the tie (see `FailureRecordStore::merged_by_time`).
//! - All returned [`Bounded`] values are ordered.

use serde::{Deserialize, Serialize};

use crate::growth::{
    bounds::{Bounded, Termination, crow_cumulative_intensity_bounds},
    errors::{GrowthError, GrowthResult},
    estimator::CrowAmsaaFit,
    records::FailureRecordStore,
};

/// Bounded model curves, one entry per distinct failure time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanValues {
    pub times: Vec<f64>,
    /// Expected cumulative failures M(t) over all units.
    pub cum_mean: Vec<Bounded>,
    /// Failure intensity λ(t) over all units.
    pub instantaneous_mean: Vec<Bounded>,
    pub cum_mtbf: Vec<Bounded>,
    pub instantaneous_mtbf: Vec<Bounded>,
}

impl MeanValues {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Evaluates fitted Crow-AMSAA curves at the observed failure times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanValueCalculator {
    confidence: f64,
    termination: Termination,
}

impl MeanValueCalculator {
    pub fn new(confidence: f64, termination: Termination) -> Self {
        MeanValueCalculator { confidence, termination }
    }

    /// Calculator matching the confidence and termination of `fit`.
    pub fn for_fit(fit: &CrowAmsaaFit) -> Self {
        MeanValueCalculator { confidence: fit.confidence, termination: fit.termination }
    }

    /// Compute bounded mean curves.
    ///
    /// Parameters
    /// ----------
    /// - `store`: `&FailureRecordStore`
    ///   Source of the evaluation times and cumulative counts.
    /// - `alpha`, `beta`: `&Bounded`
    ///   Scale and shape estimates with their bounds.
    ///
    /// Returns
    /// -------
    /// `GrowthResult<MeanValues>`
    ///   Curves in time order.
    ///
    /// Errors
    /// ------
    /// - `GrowthError::InsufficientData` for an empty store.
    /// - Chi-square quantile errors propagated from the bound helpers.
    pub fn compute(
        &self, store: &FailureRecordStore, alpha: &Bounded, beta: &Bounded,
    ) -> GrowthResult<MeanValues> {
        if store.is_empty() {
            return Err(GrowthError::InsufficientData { found: 0 });
        }
        let k = store.n_units() as f64;
        let (times, counts) = store.merged_by_time();
        let cum_counts: Vec<f64> = counts
            .iter()
            .scan(0.0, |acc, c| {
                *acc += c;
                Some(*acc)
            })
            .collect();

        let mut out = MeanValues {
            times: Vec::with_capacity(times.len()),
            cum_mean: Vec::with_capacity(times.len()),
            instantaneous_mean: Vec::with_capacity(times.len()),
            cum_mtbf: Vec::with_capacity(times.len()),
            instantaneous_mtbf: Vec::with_capacity(times.len()),
        };

        for (&t, &n_t) in times.iter().zip(&cum_counts) {
            let m = |a: f64, b: f64| a * t.powf(b);
            let lam = |a: f64, b: f64| a * b * t.powf(b - 1.0);

            out.cum_mean.push(Bounded::ordered(
                k * m(alpha.lower, beta.lower),
                k * m(alpha.point, beta.point),
                k * m(alpha.upper, beta.upper),
            ));
            // Per-unit intensity; the fleet mean scales it by K.
            let lam_lo = lam(alpha.lower, beta.lower);
            let lam_mid = lam(alpha.point, beta.point);
            let lam_hi = lam(alpha.upper, beta.upper);
            out.instantaneous_mean.push(Bounded::ordered(k * lam_lo, k * lam_mid, k * lam_hi));

            let (int_lo, int_hi) =
                crow_cumulative_intensity_bounds(n_t, k * t, self.confidence, self.termination)?;
            out.cum_mtbf.push(Bounded::ordered(
                1.0 / int_hi,
                t.powf(1.0 - beta.point) / alpha.point,
                1.0 / int_lo,
            ));
            out.instantaneous_mtbf.push(Bounded::ordered(1.0 / lam_hi, 1.0 / lam_mid, 1.0 / lam_lo));
            out.times.push(t);
        }
        Ok(out)
    }
}
