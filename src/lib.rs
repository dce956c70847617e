//! rust_growth — reliability growth analysis and planning with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! Crow-AMSAA estimation, MIL-HDBK-189 planning, and growth goodness-of-fit
//! tests to Python via the `_rust_growth` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`growth`, `planning`,
//!   `statistical_tests`) as the public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_rust_growth` Python extension.
//! - Register Python submodules (`growth`, `planning`, `statistical_tests`)
//!   under `rust_growth` so that dot-notation imports work.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner Rust modules; this file performs
//!   only FFI glue, input conversion, and error mapping.
//! - Degenerate planning inputs that were substituted are returned to Python
//!   as a list of messages next to the value, never silently dropped.
//!
//! Conventions
//! -----------
//! - Bounded estimates cross the boundary as `(lower, point, upper)` tuples.
//! - Curves cross the boundary as float64 numpy arrays with NaN phase
//!   markers.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   integration tests under `tests/`.

pub mod growth;
pub mod planning;
pub mod statistical_tests;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::PyArray1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    growth::{FailureRecordStore, GrowthError, GrowthSession},
    planning::{
        GrowthPlan, assess, calculate_average_mtbf, calculate_final_mtbf,
        calculate_growth_potential, calculate_growth_rate, calculate_idealized_growth_curve,
        calculate_initial_mtbf, calculate_management_strategy,
        calculate_minimum_first_phase_time, calculate_planned_growth_curve,
        calculate_probability, calculate_total_time, create_planned_values,
    },
    statistical_tests::CvmOutcome,
    utils::{
        extract_f64_vec, extract_failure_store, extract_growth_options, outcome_to_py,
        plan_field_mut, plan_scalar_mut, to_numpy,
    },
};

/// CrowAMSAA — Python-facing Crow-AMSAA analysis of one failure log.
///
/// Purpose
/// -------
/// Hold a validated [`FailureRecordStore`] and a [`GrowthSession`], and run
/// estimation, mean-value and goodness-of-fit steps on request.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `CrowAMSAA(unit_ids, right_times, left_times=None, counts=None,
/// grouped=False, confidence=0.75, test_termination_time=0.0, bounds='crow')`:
/// - `unit_ids`: sequence of `int`, one per record.
/// - `right_times`: array-like of failure (or interval end) times.
/// - `left_times`: interval start times; zeros when omitted.
/// - `counts`: failures per record; ones when omitted.
///
/// Invariants
/// ----------
/// - `store` never changes after construction, so every session step sees
///   the same data.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_growth.growth")]
pub struct CrowAMSAA {
    store: FailureRecordStore,
    session: GrowthSession,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl CrowAMSAA {
    #[new]
    #[pyo3(
        signature = (
            unit_ids,
            right_times,
            left_times = None,
            counts = None,
            grouped = None,
            confidence = None,
            test_termination_time = None,
            bounds = None,
        ),
        text_signature = "(unit_ids, right_times, /, left_times=None, counts=None, grouped=False, \
                          confidence=0.75, test_termination_time=0.0, bounds='crow')"
    )]
    pub fn new<'py>(
        py: Python<'py>, unit_ids: Vec<u32>, right_times: &Bound<'py, PyAny>,
        left_times: Option<&Bound<'py, PyAny>>, counts: Option<Vec<u32>>,
        grouped: Option<bool>, confidence: Option<f64>, test_termination_time: Option<f64>,
        bounds: Option<&str>,
    ) -> PyResult<Self> {
        let store = extract_failure_store(py, unit_ids, right_times, left_times, counts)?;
        let options = extract_growth_options(grouped, confidence, test_termination_time, bounds)?;
        let session = GrowthSession::new(options)?;
        Ok(CrowAMSAA { store, session })
    }

    /// Estimate, compute mean values, and run the goodness-of-fit tests.
    pub fn run(&mut self) -> PyResult<()> {
        Ok(self.session.run(&self.store)?)
    }

    pub fn estimate(&mut self) -> PyResult<()> {
        self.session.estimate(&self.store)?;
        Ok(())
    }

    pub fn calculate_mean_values(&mut self) -> PyResult<()> {
        self.session.calculate_mean_values(&self.store)?;
        Ok(())
    }

    pub fn goodness_of_fit(&mut self) -> PyResult<()> {
        Ok(self.session.goodness_of_fit(&self.store)?)
    }

    /// Observed growth rate `(1 − β_hi, 1 − β̂, 1 − β_lo)`.
    pub fn growth_rate(&self) -> PyResult<(f64, f64, f64)> {
        Ok(self.session.assess_growth_rate()?.as_tuple())
    }

    #[getter]
    pub fn alpha_hat(&self) -> PyResult<(f64, f64, f64)> {
        let alpha = self.session.alpha_hat().ok_or(GrowthError::NotEstimated)?;
        Ok(alpha.as_tuple())
    }

    #[getter]
    pub fn beta_hat(&self) -> PyResult<(f64, f64, f64)> {
        let beta = self.session.beta_hat().ok_or(GrowthError::NotEstimated)?;
        Ok(beta.as_tuple())
    }

    #[getter]
    pub fn times(&self) -> Vec<f64> {
        self.session.mean_values().map(|m| m.times.clone()).unwrap_or_default()
    }

    #[getter]
    pub fn cum_mean(&self) -> Vec<(f64, f64, f64)> {
        self.session
            .cum_mean()
            .map(|v| v.iter().map(|b| b.as_tuple()).collect())
            .unwrap_or_default()
    }

    #[getter]
    pub fn instantaneous_mean(&self) -> Vec<(f64, f64, f64)> {
        self.session
            .instantaneous_mean()
            .map(|v| v.iter().map(|b| b.as_tuple()).collect())
            .unwrap_or_default()
    }

    #[getter]
    pub fn cum_mtbf(&self) -> Vec<(f64, f64, f64)> {
        self.session
            .mean_values()
            .map(|m| m.cum_mtbf.iter().map(|b| b.as_tuple()).collect())
            .unwrap_or_default()
    }

    #[getter]
    pub fn instantaneous_mtbf(&self) -> Vec<(f64, f64, f64)> {
        self.session
            .mean_values()
            .map(|m| m.instantaneous_mtbf.iter().map(|b| b.as_tuple()).collect())
            .unwrap_or_default()
    }

    /// `(statistic, critical_value, reject)` or `None` for grouped data.
    #[getter]
    pub fn cramer_vonmises(&self) -> Option<(f64, f64, bool)> {
        self.session.cramer_vonmises().map(|c| (c.statistic, c.critical_value, c.reject))
    }

    /// `(statistic, (lower, upper), reject)`.
    #[getter]
    pub fn chi_square(&self) -> Option<(f64, (f64, f64), bool)> {
        self.session.chi_square().map(|c| (c.statistic, c.critical_values, c.reject))
    }
}

/// CramerVonMises — standalone Cramér–von Mises test of a power-law NHPP.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_growth.statistical_tests")]
pub struct CramerVonMises {
    inner: CvmOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl CramerVonMises {
    #[new]
    #[pyo3(
        text_signature = "(times, beta, /, t_star=None, confidence=0.9)",
        signature = (times, beta, t_star = None, confidence = 0.9)
    )]
    pub fn new<'py>(
        py: Python<'py>, times: &Bound<'py, PyAny>, beta: f64, t_star: Option<f64>,
        confidence: f64,
    ) -> PyResult<Self> {
        let times = extract_f64_vec(py, times, "times")?;
        let inner = CvmOutcome::cramer_von_mises(&times, beta, t_star, t_star.is_none(), confidence)?;
        Ok(CramerVonMises { inner })
    }

    #[getter]
    pub fn statistic(&self) -> f64 {
        self.inner.statistic
    }

    #[getter]
    pub fn critical_value(&self) -> f64 {
        self.inner.critical_value
    }

    #[getter]
    pub fn reject(&self) -> bool {
        self.inner.reject
    }
}

/// GrowthPlanner — Python-facing MIL-HDBK-189 planning over a [`GrowthPlan`].
///
/// Purpose
/// -------
/// Let Python fill a plan by field name, run the planner solves, and pull
/// curves and a feasibility summary back out.
///
/// Notes
/// -----
/// - Solve methods return `(value, messages)`; `messages` lists every
///   degenerate input that was replaced by its documented substitute.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_growth.planning")]
pub struct GrowthPlanner {
    inner: GrowthPlan,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl GrowthPlanner {
    #[new]
    #[pyo3(text_signature = "(n_phases, /)")]
    pub fn new(n_phases: usize) -> PyResult<Self> {
        Ok(GrowthPlanner { inner: GrowthPlan::new(n_phases)? })
    }

    #[getter]
    pub fn n_phases(&self) -> usize {
        self.inner.n_phases
    }

    /// Read a per-phase float field, e.g. `get("mtbf_final")`.
    pub fn get(&mut self, field: &str) -> PyResult<Vec<f64>> {
        Ok(plan_field_mut(&mut self.inner, field)?.clone())
    }

    /// Replace a per-phase float field; the length must equal `n_phases`.
    pub fn set<'py>(&mut self, py: Python<'py>, field: &str, values: &Bound<'py, PyAny>) -> PyResult<()> {
        let values = extract_f64_vec(py, values, field)?;
        if values.len() != self.inner.n_phases {
            return Err(PyValueError::new_err(format!(
                "{field} needs {} values, got {}",
                self.inner.n_phases,
                values.len()
            )));
        }
        *plan_field_mut(&mut self.inner, field)? = values;
        Ok(())
    }

    pub fn get_scalar(&mut self, field: &str) -> PyResult<f64> {
        Ok(*plan_scalar_mut(&mut self.inner, field)?)
    }

    pub fn set_scalar(&mut self, field: &str, value: f64) -> PyResult<()> {
        *plan_scalar_mut(&mut self.inner, field)? = value;
        Ok(())
    }

    /// Phase calendar as day ordinals and the test units per phase.
    pub fn set_schedule(
        &mut self, start_date: Vec<i64>, end_date: Vec<i64>, n_test_units: Vec<u32>,
    ) -> PyResult<()> {
        let mut plan = self.inner.clone();
        plan.start_date = start_date;
        plan.end_date = end_date;
        plan.n_test_units = n_test_units;
        plan.validate()?;
        self.inner = plan;
        Ok(())
    }

    #[pyo3(signature = (phase = None))]
    pub fn calculate_initial_mtbf(&mut self, phase: Option<usize>) -> PyResult<(f64, Vec<String>)> {
        Ok(outcome_to_py(calculate_initial_mtbf(&mut self.inner, phase)?))
    }

    #[pyo3(signature = (phase = None))]
    pub fn calculate_final_mtbf(&mut self, phase: Option<usize>) -> PyResult<(f64, Vec<String>)> {
        Ok(outcome_to_py(calculate_final_mtbf(&mut self.inner, phase)?))
    }

    pub fn calculate_average_mtbf(&mut self, phase: usize) -> PyResult<(f64, Vec<String>)> {
        Ok(outcome_to_py(calculate_average_mtbf(&mut self.inner, phase)?))
    }

    #[pyo3(signature = (phase = None))]
    pub fn calculate_total_time(&mut self, phase: Option<usize>) -> PyResult<(f64, Vec<String>)> {
        Ok(outcome_to_py(calculate_total_time(&mut self.inner, phase)?))
    }

    #[pyo3(signature = (phase = None))]
    pub fn calculate_growth_rate(&mut self, phase: Option<usize>) -> PyResult<(f64, Vec<String>)> {
        Ok(outcome_to_py(calculate_growth_rate(&mut self.inner, phase)?))
    }

    pub fn calculate_minimum_first_phase_time(&mut self) -> PyResult<(f64, Vec<String>)> {
        Ok(outcome_to_py(calculate_minimum_first_phase_time(&mut self.inner)?))
    }

    #[pyo3(signature = (phase = None))]
    pub fn calculate_management_strategy(
        &mut self, phase: Option<usize>,
    ) -> PyResult<(f64, Vec<String>)> {
        Ok(outcome_to_py(calculate_management_strategy(&mut self.inner, phase)?))
    }

    pub fn calculate_probability(&mut self, phase: usize) -> PyResult<(f64, Vec<String>)> {
        Ok(outcome_to_py(calculate_probability(&mut self.inner, phase)?))
    }

    pub fn calculate_growth_potential(&mut self) -> PyResult<(f64, Vec<String>)> {
        Ok(outcome_to_py(calculate_growth_potential(&mut self.inner)?))
    }

    pub fn calculate_planned_growth_curve(&mut self) -> PyResult<()> {
        Ok(calculate_planned_growth_curve(&mut self.inner)?)
    }

    /// Idealized curve over `[0, ttt)` and the list of remediated inputs.
    #[pyo3(signature = (mtbf = true))]
    pub fn idealized_growth_curve<'py>(
        &mut self, py: Python<'py>, mtbf: bool,
    ) -> PyResult<(Bound<'py, PyArray1<f64>>, Vec<String>)> {
        let (values, messages) =
            outcome_to_py(calculate_idealized_growth_curve(&mut self.inner, mtbf)?);
        Ok((to_numpy(py, values), messages))
    }

    #[pyo3(signature = (mtbf = true))]
    pub fn planned_values<'py>(
        &self, py: Python<'py>, mtbf: bool,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        Ok(to_numpy(py, create_planned_values(&self.inner, mtbf)?))
    }

    /// `(ms_ratio, fef_ratio, understaffed_phase, same_date_phase)`.
    pub fn assess(&mut self) -> PyResult<(f64, f64, Option<usize>, Option<usize>)> {
        let report = assess(&mut self.inner)?;
        Ok((report.ms_ratio, report.fef_ratio, report.understaffed_phase, report.same_date_phase))
    }
}

#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_growth<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let growth_mod = PyModule::new(_py, "growth")?;
    let planning_mod = PyModule::new(_py, "planning")?;
    let statistical_tests_mod = PyModule::new(_py, "statistical_tests")?;
    growth_submodule(m, &growth_mod)?;
    planning_submodule(m, &planning_mod)?;
    statistical_tests_submodule(m, &statistical_tests_mod)?;

    // Register submodules in sys.modules so dotted imports resolve.
    let modules = _py.import("sys")?.getattr("modules")?;
    modules.set_item("rust_growth.growth", growth_mod)?;
    modules.set_item("rust_growth.planning", planning_mod)?;
    modules.set_item("rust_growth.statistical_tests", statistical_tests_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn growth_submodule<'py>(root: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<CrowAMSAA>()?;
    root.add_submodule(m)
}

#[cfg(feature = "python-bindings")]
fn planning_submodule<'py>(root: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<GrowthPlanner>()?;
    root.add_submodule(m)
}

#[cfg(feature = "python-bindings")]
fn statistical_tests_submodule<'py>(
    root: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<CramerVonMises>()?;
    root.add_submodule(m)
}
