//! Adapter that wraps a user [`Objective`] for the Fminbox controller.
//!
//! The adapter is the only path through which the controller, the barrier
//! transform and the certifier touch the user's function. It counts value
//! and gradient requests, rejects `NaN` values, validates returned gradients
//! and supplies finite-difference gradients when the objective does not
//! implement one.
use std::cell::Cell;

use crate::optimization::{
    errors::{OptError, OptResult},
    objective::{
        finite_diff::{FiniteDiffScheme, fd_gradient},
        traits::Objective,
    },
    types::{Cost, Grad, Theta},
    validation::validate_grad,
};

/// Counting, validating view over a user [`Objective`].
///
/// - `value` returns `f(x)`; `+∞` passes through, `NaN` becomes
///   [`OptError::NonFiniteCost`].
/// - `gradient` returns the user's gradient after validation, or a
///   central-difference gradient (with forward fallback) when the objective
///   reports [`OptError::GradientNotImplemented`].
#[derive(Debug)]
pub struct ObjectiveAdapter<'a, O: Objective + ?Sized> {
    pub objective: &'a O,
    f_calls: Cell<usize>,
    g_calls: Cell<usize>,
}

impl<'a, O: Objective + ?Sized> ObjectiveAdapter<'a, O> {
    /// Construct a new adapter over a user objective.
    pub fn new(objective: &'a O) -> Self {
        Self { objective, f_calls: Cell::new(0), g_calls: Cell::new(0) }
    }

    /// Evaluate `f(x)`.
    ///
    /// # Errors
    /// - Propagates any `OptError` from the user's `value` via `?`.
    /// - [`OptError::NonFiniteCost`] if the value is `NaN`.
    pub fn value(&self, x: &Theta) -> OptResult<Cost> {
        self.f_calls.set(self.f_calls.get() + 1);
        let output = self.objective.value(x)?;
        if output.is_nan() {
            return Err(OptError::NonFiniteCost { value: output });
        }
        Ok(output)
    }

    /// Evaluate `∇f(x)`.
    ///
    /// Behavior:
    /// - If the objective implements `gradient`, validate and return it.
    /// - On [`OptError::GradientNotImplemented`], finite-difference the
    ///   **value** through [`fd_gradient`] with the central scheme, which
    ///   itself retries with forward differences if needed.
    ///
    /// # Errors
    /// - Propagates user errors from `gradient` (non-`GradientNotImplemented`).
    /// - Propagates any error raised by value evaluations performed during FD.
    /// - Returns validation errors if the gradient has wrong dimension or
    ///   non-finite entries.
    pub fn gradient(&self, x: &Theta) -> OptResult<Grad> {
        self.g_calls.set(self.g_calls.get() + 1);
        let dim = x.len();
        match self.objective.gradient(x) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(g)
            }
            Err(OptError::GradientNotImplemented) => {
                let value = |z: &Theta| -> OptResult<f64> {
                    let v = self.objective.value(z)?;
                    if !v.is_finite() {
                        return Err(OptError::NonFiniteCost { value: v });
                    }
                    Ok(v)
                };
                fd_gradient(x, &value, FiniteDiffScheme::Central)
            }
            Err(e) => Err(e),
        }
    }

    /// Evaluate `f(x)` and `∇f(x)` together.
    pub fn value_and_gradient(&self, x: &Theta) -> OptResult<(Cost, Grad)> {
        Ok((self.value(x)?, self.gradient(x)?))
    }

    /// Number of value requests served so far.
    pub fn f_calls(&self) -> usize {
        self.f_calls.get()
    }

    /// Number of gradient requests served so far.
    pub fn g_calls(&self) -> usize {
        self.g_calls.get()
    }
}
