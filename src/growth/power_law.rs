//! growth::power_law — one entry point for power-law parameter estimates.
//!
//! Purpose
//! -------
//! Return bounded (α, β) of the power-law intensity λ(t) = α β t^(β − 1)
//! from either maximum likelihood (Crow-AMSAA) or Duane regression, so
//! callers can switch fitting method without changing what they read back.
//!
//! Key behaviors
//! -------------
//! - `FitMethod::MaximumLikelihood` delegates to [`CrowAmsaaEstimator`];
//!   bounds follow `GrowthOptions::bounds`.
//! - `FitMethod::Regression` maps the Duane line m(t) = b t^a onto the
//!   power law: α = 1/(K b), β = 1 − a, with Student-t bounds on N − 2
//!   degrees of freedom.
//!
//! Conventions
//! -----------
//! - α is per unit in both methods.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::growth::{
    bounds::Bounded,
    duane::DuaneFit,
    errors::{GrowthError, GrowthResult},
    estimator::CrowAmsaaEstimator,
    options::GrowthOptions,
    records::FailureRecordStore,
};

/// How the power-law parameters are estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FitMethod {
    #[default]
    MaximumLikelihood,
    Regression,
}

impl FromStr for FitMethod {
    type Err = GrowthError;

    /// Parse `"mle"` or `"regression"` in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mle" => Ok(FitMethod::MaximumLikelihood),
            "regression" => Ok(FitMethod::Regression),
            _ => Err(GrowthError::InvalidParameter { text: format!("unknown fit method '{s}'") }),
        }
    }
}

/// Bounded power-law parameters and the method that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerLawFit {
    pub method: FitMethod,
    pub alpha: Bounded,
    pub beta: Bounded,
    pub confidence: f64,
}

/// Estimate bounded α and β with `method`.
///
/// Errors
/// ------
/// - Any error of [`CrowAmsaaEstimator::estimate`] for maximum likelihood.
/// - `GrowthError::InsufficientData` / `ConditionViolated` from the Duane
///   regression.
pub fn fit_power_law(
    store: &FailureRecordStore, options: &GrowthOptions, method: FitMethod,
) -> GrowthResult<PowerLawFit> {
    options.validate()?;
    let confidence = options.confidence;
    let (alpha, beta) = match method {
        FitMethod::MaximumLikelihood => {
            let fit = CrowAmsaaEstimator::new(*options)?.estimate(store)?;
            (fit.alpha, fit.beta)
        }
        FitMethod::Regression => {
            let duane = DuaneFit::from_store(store)?;
            let (scale, shape) = duane.parameter_bounds(confidence)?;
            let k = store.n_units() as f64;
            let alpha = Bounded::ordered(
                1.0 / (k * scale.upper),
                1.0 / (k * scale.point),
                1.0 / (k * scale.lower),
            );
            let beta = Bounded::ordered(1.0 - shape.upper, 1.0 - shape.point, 1.0 - shape.lower);
            (alpha, beta)
        }
    };
    debug!(?method, alpha = alpha.point, beta = beta.point, confidence, "power-law fit");
    Ok(PowerLawFit { method, alpha, beta, confidence })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::records::FailureRecord;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement of the MLE path with the estimator.
    // - The Duane-to-power-law mapping and its bounds.
    // - Parsing of method names.
    // -------------------------------------------------------------------------

    const TIMES: [f64; 22] = [
        2.7, 10.3, 12.5, 30.6, 57.0, 61.3, 80.0, 109.5, 125.0, 128.6, 143.8, 167.9, 229.2,
        296.7, 320.6, 328.2, 366.2, 396.7, 421.1, 438.2, 501.2, 620.0,
    ];

    fn reference_store() -> FailureRecordStore {
        FailureRecordStore::new(TIMES.iter().map(|&t| FailureRecord::exact(1, t)).collect())
            .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify the MLE path returns the estimator's bounded parameters.
    //
    // Given
    // -----
    // - The 22-failure reference log at 90% confidence.
    //
    // Expect
    // ------
    // - α and β equal those of `CrowAmsaaEstimator::estimate`.
    fn mle_matches_estimator() {
        // Arrange
        let store = reference_store();
        let options = GrowthOptions::new(false, 0.9, 1, 0.0).unwrap();

        // Act
        let fit = fit_power_law(&store, &options, FitMethod::MaximumLikelihood).unwrap();
        let direct = CrowAmsaaEstimator::new(options).unwrap().estimate(&store).unwrap();

        // Assert
        assert_eq!(fit.method, FitMethod::MaximumLikelihood);
        assert_eq!(fit.alpha, direct.alpha);
        assert_eq!(fit.beta, direct.beta);
    }

    #[test]
    // Purpose
    // -------
    // Verify the regression path maps the Duane line onto (α, β).
    //
    // Given
    // -----
    // - The reference log: Duane a ≈ 0.4253107, b ≈ 1.7440330.
    //
    // Expect
    // ------
    // - α ≈ 1/b ≈ 0.5733836 and β ≈ 1 − a ≈ 0.5746893.
    // - Bounds bracket the points and come from the Duane bounds.
    fn regression_maps_duane_line() {
        // Arrange
        let store = reference_store();
        let options = GrowthOptions::new(false, 0.9, 1, 0.0).unwrap();

        // Act
        let fit = fit_power_law(&store, &options, FitMethod::Regression).unwrap();
        let duane = DuaneFit::from_store(&store).unwrap();
        let (scale, shape) = duane.parameter_bounds(0.9).unwrap();

        // Assert
        assert_relative_eq!(fit.alpha.point, 0.5733836495245613, max_relative = 1e-9);
        assert_relative_eq!(fit.beta.point, 0.5746893432353326, max_relative = 1e-9);
        assert!(fit.alpha.lower < fit.alpha.point && fit.alpha.point < fit.alpha.upper);
        assert!(fit.beta.lower < fit.beta.point && fit.beta.point < fit.beta.upper);
        assert_relative_eq!(fit.alpha.lower, 1.0 / scale.upper, max_relative = 1e-12);
        assert_relative_eq!(fit.beta.upper, 1.0 - shape.lower, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify method names parse case-insensitively.
    //
    // Given
    // -----
    // - "MLE", "Regression" and "ols".
    //
    // Expect
    // ------
    // - The two methods, then `InvalidParameter`.
    fn fit_method_from_str() {
        assert_eq!("MLE".parse::<FitMethod>(), Ok(FitMethod::MaximumLikelihood));
        assert_eq!("Regression".parse::<FitMethod>(), Ok(FitMethod::Regression));
        assert!(matches!("ols".parse::<FitMethod>(), Err(GrowthError::InvalidParameter { .. })));
    }
}
