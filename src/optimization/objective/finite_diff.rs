//! objective::finite_diff — finite-difference gradients with error capture.
//!
//! Purpose
//! -------
//! Provide finite-difference gradient approximations for objectives that do
//! not supply an analytic gradient, so the rest of the optimizer can request
//! derivatives without depending directly on the `finitediff` API.
//!
//! Key behaviors
//! -------------
//! - [`fd_gradient`] runs the requested [`FiniteDiffScheme`]. The central
//!   scheme falls back to forward differences when any evaluation fails or
//!   the central gradient is not finite.
//! - [`run_fd_diff`] computes a forward-difference gradient with error
//!   capture and post-hoc validation.
//!
//! Invariants & assumptions
//! ------------------------
//! - `finitediff` closures must return `f64`, so the first error raised by
//!   the objective is parked in a `RefCell` and the closure returns `NaN`.
//!   After differencing the parked error is surfaced as a real error.
//! - Every gradient returned from this module satisfies [`validate_grad`].
use crate::optimization::{
    errors::{OptError, OptResult},
    types::{Grad, Theta},
    validation::validate_grad,
};
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Finite-difference scheme used when no analytic gradient is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FiniteDiffScheme {
    /// Central differences, falling back to forward differences on failure.
    #[default]
    Central,
    /// Forward differences only (half the evaluations of central).
    Forward,
}

/// fd_gradient — finite-difference gradient of a fallible scalar function.
///
/// Parameters
/// ----------
/// - `theta`: point at which the gradient is approximated.
/// - `func`: objective returning `OptResult<f64>`.
/// - `scheme`: [`FiniteDiffScheme::Central`] (with forward fallback) or
///   [`FiniteDiffScheme::Forward`].
///
/// Errors
/// ------
/// - Any error raised by `func` during differencing (first one wins).
/// - [`OptError::InvalidGradient`] when the gradient is non-finite on the
///   final path.
pub fn fd_gradient<G>(theta: &Theta, func: &G, scheme: FiniteDiffScheme) -> OptResult<Grad>
where
    G: Fn(&Theta) -> OptResult<f64>,
{
    let closure_err: RefCell<Option<OptError>> = RefCell::new(None);
    let capturing = |x: &Theta| -> f64 {
        match func(x) {
            Ok(val) => val,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        }
    };
    match scheme {
        FiniteDiffScheme::Forward => run_fd_diff(theta, &capturing, &closure_err),
        FiniteDiffScheme::Central => {
            let central = theta.central_diff(&capturing);
            if closure_err.borrow().is_none() && validate_grad(&central, theta.len()).is_ok() {
                return Ok(central);
            }
            run_fd_diff(theta, &capturing, &closure_err)
        }
    }
}

/// run_fd_diff — forward-difference gradient with error capture and validation.
///
/// Clears `closure_err`, performs `forward_diff`, then returns the captured
/// error if `func` parked one, or the validated gradient otherwise.
///
/// # Errors
/// - The error parked in `closure_err` by `func`.
/// - [`OptError::GradientDimMismatch`] / [`OptError::InvalidGradient`] from
///   [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<OptError>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}
