//! rust_fminbox — box-constrained minimization over argmin, with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the Fminbox optimizer to Python through the `_rust_fminbox` extension
//! module. When the `python-bindings` feature is enabled, this module defines
//! the Python-facing function and result class.
//!
//! Key behaviors
//! -------------
//! - Re-export the core `optimization` module as the public crate surface.
//! - Wrap Python callables as an [`Objective`] so the same outer loop runs for
//!   Rust and Python users.
//! - Define the `#[pyfunction]`, `#[pyclass]` and `#[pymodule]` items of the
//!   `_rust_fminbox` extension.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work happens in `optimization::fminbox`; this file performs
//!   only FFI glue, input conversion and error mapping.
//! - Exceptions raised by Python callbacks become
//!   `OptError::CallbackFailed` and then `ValueError` at the boundary.
//!
//! Conventions
//! -----------
//! - `boundary_indices` on the Python result are 1-based, matching the
//!   boundary warning text.
//! - Native Rust code should depend on [`optimization`] directly and can
//!   ignore everything guarded by `python-bindings`.

pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, ToPyArray};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    optimization::{
        errors::{OptError, OptResult},
        fminbox::{FminboxOutcome, InnerMethod, fminbox as run_fminbox},
        objective::traits::Objective,
        types::{Cost, Grad, Theta},
    },
    utils::{extract_f64_array, extract_fminbox_options, extract_theta},
};

/// Objective backed by Python callables `f(x) -> float` and optionally
/// `grad(x) -> array`.
///
/// Without `grad` the gradient is left to finite differences.
#[cfg(feature = "python-bindings")]
struct PyObjective<'py> {
    f: Bound<'py, PyAny>,
    grad: Option<Bound<'py, PyAny>>,
}

#[cfg(feature = "python-bindings")]
fn callback_failed(err: PyErr) -> OptError {
    OptError::CallbackFailed { text: err.to_string() }
}

#[cfg(feature = "python-bindings")]
impl Objective for PyObjective<'_> {
    fn value(&self, x: &Theta) -> OptResult<Cost> {
        let arg = x.to_pyarray(self.f.py());
        self.f.call1((arg,)).and_then(|out| out.extract::<f64>()).map_err(callback_failed)
    }

    fn gradient(&self, x: &Theta) -> OptResult<Grad> {
        let Some(grad) = &self.grad else {
            return Err(OptError::GradientNotImplemented);
        };
        let py = grad.py();
        let out = grad.call1((x.to_pyarray(py),)).map_err(callback_failed)?;
        let arr = extract_f64_array(py, &out).map_err(callback_failed)?;
        Ok(arr.as_array().to_owned())
    }
}

/// FminboxResult — Python-facing view of a finished Fminbox run.
///
/// Fields mirror [`FminboxOutcome`]: `minimizer` (numpy array), `minimum`,
/// `converged`, `iterations`, `summary()` and `boundary_indices`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_fminbox")]
pub struct FminboxResult {
    inner: FminboxOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl FminboxResult {
    #[getter]
    pub fn minimizer<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.minimizer.clone().into_pyarray(py)
    }

    #[getter]
    pub fn minimum(&self) -> f64 {
        self.inner.minimum
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.iterations
    }

    #[getter]
    pub fn f_calls(&self) -> usize {
        self.inner.f_calls
    }

    #[getter]
    pub fn g_calls(&self) -> usize {
        self.inner.g_calls
    }

    #[getter]
    pub fn boundary_indices(&self) -> Vec<usize> {
        self.inner.boundary_indices().to_vec()
    }

    pub fn summary(&self) -> String {
        self.inner.summary()
    }

    fn __repr__(&self) -> String {
        format!(
            "FminboxResult(minimum={:.6e}, converged={}, iterations={})",
            self.inner.minimum, self.inner.converged, self.inner.iterations
        )
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }
}

/// Minimize `f` over `[lower, upper]` from `x0`.
///
/// Parameters
/// ----------
/// - `f`: callable `f(x: ndarray) -> float`.
/// - `lower`, `upper`, `x0`: one-dimensional float arrays or sequences of
///   equal length; bounds may be `±inf`.
/// - `method`: inner method name (`"lbfgs"`, `"bfgs"`, `"cg"`,
///   `"gradient_descent"`, `"nelder_mead"`).
/// - `grad`: optional callable returning `∇f(x)`; finite differences otherwise.
/// - remaining keywords configure the outer and inner loops.
///
/// Raises
/// ------
/// `ValueError` for invalid inputs, out-of-box starts, second-order methods,
/// or errors raised by the callbacks.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    f, lower, upper, x0, method = "lbfgs", grad = None, outer_iterations = None,
    mu0 = None, mu_factor = None, g_abstol = None, f_reltol = None, x_abstol = None,
    tol_grad = None, tol_cost = None, max_iter = None, line_searcher = None, lbfgs_mem = None
))]
#[allow(clippy::too_many_arguments)]
pub fn fminbox<'py>(
    py: Python<'py>, f: Bound<'py, PyAny>, lower: &Bound<'py, PyAny>, upper: &Bound<'py, PyAny>,
    x0: &Bound<'py, PyAny>, method: &str, grad: Option<Bound<'py, PyAny>>,
    outer_iterations: Option<usize>, mu0: Option<f64>, mu_factor: Option<f64>,
    g_abstol: Option<f64>, f_reltol: Option<f64>, x_abstol: Option<f64>, tol_grad: Option<f64>,
    tol_cost: Option<f64>, max_iter: Option<usize>, line_searcher: Option<&str>,
    lbfgs_mem: Option<usize>,
) -> PyResult<FminboxResult> {
    let method: InnerMethod = method.parse()?;
    let opts = extract_fminbox_options(
        outer_iterations,
        mu0,
        mu_factor,
        (g_abstol, f_reltol, x_abstol),
        (tol_grad, tol_cost, max_iter),
        line_searcher,
        lbfgs_mem,
    )?;
    let objective = PyObjective { f, grad };
    let inner = run_fminbox(
        &objective,
        extract_theta(py, lower)?,
        extract_theta(py, upper)?,
        extract_theta(py, x0)?,
        method,
        &opts,
    )?;
    Ok(FminboxResult { inner })
}

#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_fminbox<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<FminboxResult>()?;
    m.add_function(wrap_pyfunction!(fminbox, m)?)?;
    Ok(())
}
