//! objective — how the optimizer sees the user's function.
//!
//! - [`traits`]: the [`Objective`] and [`ScalarObjective`] interfaces.
//! - [`differentiable`]: closure-based objectives with a gradient strategy.
//! - [`dual`]: dual numbers for forward-mode gradients.
//! - [`finite_diff`]: finite-difference gradients with error capture.
//! - [`adapter`]: counting, validating wrapper used by the controller.
pub mod adapter;
pub mod differentiable;
pub mod dual;
pub mod finite_diff;
pub mod traits;

pub use adapter::ObjectiveAdapter;
pub use differentiable::Differentiable;
pub use dual::{Dual, Scalar, forward_gradient};
pub use finite_diff::{FiniteDiffScheme, fd_gradient};
pub use traits::{Differentiation, Objective, ScalarObjective};
