//! growth::duane — Duane postulate fit by log-log least squares.
//!
//! The Duane model says cumulative MTBF grows as a power of test time,
//! m(t) = b t^a. Taking logs gives a straight line, so `a` and `ln b` come
//! from ordinary least squares of ln mᵢ on ln tᵢ with mᵢ = tᵢ / Nᵢ.
//! The instantaneous MTBF follows as b t^a / (1 − a).

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::growth::{
    bounds::Bounded,
    errors::{GrowthError, GrowthResult},
    records::FailureRecordStore,
};

/// Least-squares Duane fit.
///
/// Fields
/// ------
/// - `scale`: b, cumulative MTBF at t = 1.
/// - `shape`: a, the Duane growth rate.
/// - `sigma2`: residual variance SSE / (N − 2).
/// - `se_ln_scale`, `se_shape`: standard errors of ln b and a.
/// - `n`: number of points in the regression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DuaneFit {
    pub scale: f64,
    pub shape: f64,
    pub sigma2: f64,
    pub se_ln_scale: f64,
    pub se_shape: f64,
    pub n: usize,
}

impl DuaneFit {
    /// Fit the Duane line to `(time, cumulative failures)` pairs.
    ///
    /// Errors
    /// ------
    /// - `GrowthError::InsufficientData` for fewer than three points.
    /// - `GrowthError::ConditionViolated` when all times coincide.
    pub fn fit(times: &[f64], cum_failures: &[f64]) -> GrowthResult<Self> {
        let n = times.len().min(cum_failures.len());
        if n < 3 {
            return Err(GrowthError::InsufficientData { found: n });
        }
        let nf = n as f64;
        let ln_t: Vec<f64> = times[..n].iter().map(|t| t.ln()).collect();
        let ln_m: Vec<f64> =
            times[..n].iter().zip(&cum_failures[..n]).map(|(t, c)| (t / c).ln()).collect();

        let sum_t: f64 = ln_t.iter().sum();
        let sum_t2: f64 = ln_t.iter().map(|x| x * x).sum();
        let sum_m: f64 = ln_m.iter().sum();
        let sum_tm: f64 = ln_t.iter().zip(&ln_m).map(|(x, y)| x * y).sum();
        let sxx = sum_t2 - sum_t * sum_t / nf;
        if sxx <= 0.0 {
            return Err(GrowthError::ConditionViolated {
                text: "Duane regression needs at least two distinct times".to_string(),
            });
        }

        let shape = (sum_tm - sum_t * sum_m / nf) / sxx;
        let ln_scale = (sum_m - shape * sum_t) / nf;
        let sse: f64 =
            ln_t.iter().zip(&ln_m).map(|(x, y)| (ln_scale + shape * x - y).powi(2)).sum();
        let sigma2 = sse / (nf - 2.0);
        let sigma = sigma2.sqrt();

        Ok(DuaneFit {
            scale: ln_scale.exp(),
            shape,
            sigma2,
            se_ln_scale: sigma * (sum_t2 / (nf * sxx)).sqrt(),
            se_shape: sigma / sxx.sqrt(),
            n,
        })
    }

    /// Fit to the pooled failure log of `store`.
    pub fn from_store(store: &FailureRecordStore) -> GrowthResult<Self> {
        Self::fit(&store.times(), &store.cumulative_counts())
    }

    /// Cumulative MTBF b t^a.
    pub fn cumulative_mtbf(&self, t: f64) -> f64 {
        self.scale * t.powf(self.shape)
    }

    /// Instantaneous MTBF b t^a / (1 − a).
    pub fn instantaneous_mtbf(&self, t: f64) -> f64 {
        self.cumulative_mtbf(t) / (1.0 - self.shape)
    }

    /// Two-sided Student-t bounds on b (log scale) and a, with N − 2
    /// degrees of freedom.
    pub fn parameter_bounds(&self, confidence: f64) -> GrowthResult<(Bounded, Bounded)> {
        let dist = StudentsT::new(0.0, 1.0, self.n as f64 - 2.0)
            .map_err(|e| GrowthError::InvalidParameter { text: e.to_string() })?;
        let q = dist.inverse_cdf(1.0 - (1.0 - confidence) / 2.0);
        let ln_b = self.scale.ln();
        let scale = Bounded::new(
            (ln_b - q * self.se_ln_scale).exp(),
            self.scale,
            (ln_b + q * self.se_ln_scale).exp(),
        );
        let shape = Bounded::new(
            self.shape - q * self.se_shape,
            self.shape,
            self.shape + q * self.se_shape,
        );
        Ok((scale, shape))
    }
}
