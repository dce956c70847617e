//! utils — conversion helpers for the Python bindings.
//!
//! Purpose
//! -------
//! Keep PyO3 argument parsing out of `lib.rs`: array extraction, failure-log
//! assembly, plan field lookup by name, and `Outcome` flattening.
//!
//! Conventions
//! -----------
//! - Every helper returns `PyResult`; core errors convert through their
//!   `From<_> for PyErr` impls.

#[cfg(feature = "python-bindings")]
use std::str::FromStr;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArrayMethods, PyReadonlyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    growth::{BoundsMethod, FailureRecord, FailureRecordStore, GrowthOptions},
    planning::{GrowthPlan, Outcome},
};

/// Borrow or copy a 1-D float64 array from an ndarray, a pandas Series, or a
/// sequence of floats.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy a 1-D float array argument into an owned `Vec`.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vec<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Vec<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!("{name} must be a 1-D contiguous float64 array or sequence"))
    })?;
    Ok(slice.to_vec())
}

/// Owned values as a numpy array.
#[cfg(feature = "python-bindings")]
pub fn to_numpy<'py>(py: Python<'py>, values: Vec<f64>) -> Bound<'py, PyArray1<f64>> {
    Array1::from(values).into_pyarray(py)
}

/// Build a failure store from parallel columns of the test log.
///
/// `left_times` defaults to zeros and `counts` to ones, which describes
/// exact failure times in `right_times`.
#[cfg(feature = "python-bindings")]
pub fn extract_failure_store<'py>(
    py: Python<'py>, unit_ids: Vec<u32>, right_times: &Bound<'py, PyAny>,
    left_times: Option<&Bound<'py, PyAny>>, counts: Option<Vec<u32>>,
) -> PyResult<FailureRecordStore> {
    let right = extract_f64_vec(py, right_times, "right_times")?;
    let n = right.len();
    let left = match left_times {
        Some(raw) => extract_f64_vec(py, raw, "left_times")?,
        None => vec![0.0; n],
    };
    let counts = counts.unwrap_or_else(|| vec![1; n]);
    if unit_ids.len() != n || left.len() != n || counts.len() != n {
        return Err(PyValueError::new_err(format!(
            "unit_ids, left_times, right_times and counts must have equal length \
             (got {}, {}, {n}, {})",
            unit_ids.len(),
            left.len(),
            counts.len()
        )));
    }
    let records = (0..n)
        .map(|i| FailureRecord::interval(unit_ids[i], left[i], right[i], counts[i]))
        .collect();
    Ok(FailureRecordStore::new(records)?)
}

/// Validated growth options from keyword arguments.
#[cfg(feature = "python-bindings")]
pub fn extract_growth_options(
    grouped: Option<bool>, confidence: Option<f64>, test_termination_time: Option<f64>,
    bounds: Option<&str>,
) -> PyResult<GrowthOptions> {
    let bounds = match bounds {
        Some(name) => BoundsMethod::from_str(name)?,
        None => BoundsMethod::default(),
    };
    let opts = GrowthOptions::new(
        grouped.unwrap_or(false),
        confidence.unwrap_or(0.75),
        1,
        test_termination_time.unwrap_or(0.0),
    )?
    .with_bounds(bounds);
    Ok(opts)
}

/// Mutable per-phase float array of `plan` by field name.
#[cfg(feature = "python-bindings")]
pub fn plan_field_mut<'a>(plan: &'a mut GrowthPlan, field: &str) -> PyResult<&'a mut Vec<f64>> {
    let slot = match field {
        "test_time" => &mut plan.test_time,
        "growth_rate" => &mut plan.growth_rate,
        "mtbf_initial" => &mut plan.mtbf_initial,
        "mtbf_final" => &mut plan.mtbf_final,
        "mtbf_average" => &mut plan.mtbf_average,
        "n_failures" => &mut plan.n_failures,
        "management_strategy" => &mut plan.management_strategy,
        "fef" => &mut plan.fef,
        "probability_of_detection" => &mut plan.probability_of_detection,
        "tpu" => &mut plan.tpu,
        "tpupw" => &mut plan.tpupw,
        other => {
            return Err(PyValueError::new_err(format!("unknown per-phase plan field {other:?}")));
        }
    };
    Ok(slot)
}

/// Mutable program-level scalar of `plan` by field name.
#[cfg(feature = "python-bindings")]
pub fn plan_scalar_mut<'a>(plan: &'a mut GrowthPlan, field: &str) -> PyResult<&'a mut f64> {
    let slot = match field {
        "total_test_time" => &mut plan.total_test_time,
        "mtbf_goal" => &mut plan.mtbf_goal,
        "mtbf_goal_program" => &mut plan.mtbf_goal_program,
        "average_growth_rate" => &mut plan.average_growth_rate,
        "average_ms" => &mut plan.average_ms,
        "average_fef" => &mut plan.average_fef,
        other => {
            return Err(PyValueError::new_err(format!("unknown program plan field {other:?}")));
        }
    };
    Ok(slot)
}

/// `(value, messages)` with one message per recovered degeneracy.
#[cfg(feature = "python-bindings")]
pub fn outcome_to_py<T>(outcome: Outcome<T>) -> (T, Vec<String>) {
    let messages = outcome.recovered.iter().map(ToString::to_string).collect();
    (outcome.value, messages)
}
