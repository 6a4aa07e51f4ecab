//! utils — conversion helpers for the Python bindings.
//!
//! Every item here is compiled only with the `python-bindings` feature.
#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::optimization::{
    fminbox::{
        BarrierSchedule, FminboxOptions, InitialMu, InnerOptions, LineSearcher, OuterTolerances,
        Tolerances,
        options::{DEFAULT_BARRIER_DECAY, DEFAULT_OUTER_ITERATIONS},
    },
    types::{DEFAULT_LBFGS_MEM, Theta},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// Accept a contiguous `float64` numpy array, anything with `.to_numpy()`,
/// or a plain sequence of floats.
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

/// Copy a Python vector argument into an owned [`Theta`].
#[cfg(feature = "python-bindings")]
pub fn extract_theta<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<Theta> {
    Ok(extract_f64_array(py, raw)?.as_array().to_owned())
}

/// Build [`FminboxOptions`] from optional keyword arguments.
///
/// `None` keeps the library default. When none of the inner tolerances is
/// given, the default inner [`Tolerances`] are used.
#[cfg(feature = "python-bindings")]
pub fn extract_fminbox_options(
    outer_iterations: Option<usize>, mu0: Option<f64>, mu_factor: Option<f64>,
    outer_tols: (Option<f64>, Option<f64>, Option<f64>),
    inner_tols: (Option<f64>, Option<f64>, Option<usize>), line_searcher: Option<&str>,
    lbfgs_mem: Option<usize>,
) -> PyResult<FminboxOptions> {
    let initial = mu0.map_or_else(InitialMu::default, InitialMu::Fixed);
    let barrier = BarrierSchedule::new(initial, mu_factor.unwrap_or(DEFAULT_BARRIER_DECAY))?;

    let defaults = OuterTolerances::default();
    let (g_abstol, f_reltol, x_abstol) = outer_tols;
    let outer_tols = OuterTolerances::new(
        g_abstol.unwrap_or(defaults.g_abstol),
        f_reltol.unwrap_or(defaults.f_reltol),
        x_abstol.unwrap_or(defaults.x_abstol),
    )?;

    let tols = match inner_tols {
        (None, None, None) => Tolerances::default(),
        (tol_grad, tol_cost, max_iter) => Tolerances::new(tol_grad, tol_cost, max_iter)?,
    };
    let line_searcher = match line_searcher {
        Some(name) => name.parse::<LineSearcher>()?,
        None => LineSearcher::default(),
    };
    let inner =
        InnerOptions::new(tols, line_searcher, lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM), false)?;

    Ok(FminboxOptions::new(
        outer_iterations.unwrap_or(DEFAULT_OUTER_ITERATIONS),
        barrier,
        outer_tols,
        inner,
    )?)
}
