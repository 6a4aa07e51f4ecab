//! Public objective interface for box-constrained minimization.
//!
//! - [`Objective`]: trait users implement (or obtain from
//!   [`Differentiable`](super::differentiable::Differentiable)) to describe the
//!   function being minimized.
//! - [`ScalarObjective`]: generic form evaluated on `f64` or dual numbers,
//!   used for forward-mode gradients.
//! - [`Differentiation`]: tag describing where gradients come from.
//!
//! Convention: we *minimize* `f(x)`. If an analytic gradient is provided it
//! must be `∇f(x)` with the same length as `x`.
use crate::optimization::{
    errors::{OptError, OptResult},
    objective::dual::Scalar,
    types::{Cost, Grad, Theta},
};

/// User-implemented objective interface.
///
/// Required:
/// - `value(&Theta) -> OptResult<Cost>`: evaluate `f(x)`. May return `+∞`
///   where `f` is undefined; `NaN` is rejected by the adapter.
///
/// Optional:
/// - `gradient(&Theta) -> OptResult<Grad>`: analytic gradient `∇f(x)`.
///   If not implemented, finite differences are used automatically.
/// - `value_and_gradient(&Theta)`: combined evaluation for objectives that
///   share work between the two.
pub trait Objective {
    // Required methods
    fn value(&self, x: &Theta) -> OptResult<Cost>;

    // Optional methods
    fn gradient(&self, _x: &Theta) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }

    fn value_and_gradient(&self, x: &Theta) -> OptResult<(Cost, Grad)> {
        Ok((self.value(x)?, self.gradient(x)?))
    }
}

impl<T: Objective + ?Sized> Objective for &T {
    fn value(&self, x: &Theta) -> OptResult<Cost> {
        (**self).value(x)
    }

    fn gradient(&self, x: &Theta) -> OptResult<Grad> {
        (**self).gradient(x)
    }

    fn value_and_gradient(&self, x: &Theta) -> OptResult<(Cost, Grad)> {
        (**self).value_and_gradient(x)
    }
}

/// Source of gradients for a [`Differentiable`](super::differentiable::Differentiable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Differentiation {
    /// User-supplied gradient (returned or written in place).
    Analytic,
    /// Forward-mode automatic differentiation through dual numbers.
    Forward,
    /// Finite differences.
    Finite,
}

/// Objective written once over any [`Scalar`].
///
/// ```
/// use rust_fminbox::optimization::objective::{Scalar, ScalarObjective};
///
/// struct Shifted;
/// impl ScalarObjective for Shifted {
///     fn eval<S: Scalar>(&self, x: &[S]) -> S {
///         x.iter().map(|&xi| (xi - S::from_f64(2.0)).powi(2)).sum()
///     }
/// }
/// ```
pub trait ScalarObjective {
    fn eval<S: Scalar>(&self, x: &[S]) -> S;
}
