//! fminbox::api — the public entry point.
use crate::optimization::{
    errors::OptResult,
    fminbox::{
        bounds::BoxConstraints, controller::run_outer_loop, methods::InnerMethod,
        options::FminboxOptions, outcome::FminboxOutcome,
    },
    objective::{adapter::ObjectiveAdapter, traits::Objective},
    types::Theta,
};

/// Minimize `objective` over the box `[lower, upper]` starting from `x0`.
///
/// Validation order:
/// 1. `method` must be first-order (`Newton`/`NewtonTrustRegion` are
///    rejected before anything else is looked at).
/// 2. The box must be well-formed.
/// 3. `x0` must lie in the box; boundary coordinates are moved inward and
///    reported once in `FminboxOutcome::boundary_adjustment`.
///
/// Then the outer barrier loop runs and the result is assembled with
/// `minimum == f(minimizer)`.
///
/// # Errors
/// - `OptError::IncompatibleInnerMethod`, `OptError::InvalidBounds`,
///   `OptError::DimensionMismatch`, `OptError::InvalidInitialPoint`,
///   `OptError::InitialPointOutOfBounds` for bad inputs.
/// - Errors raised by the objective or the inner solver.
///
/// Running out of outer iterations is **not** an error: the outcome has
/// `converged == false`.
///
/// ```
/// use ndarray::array;
/// use rust_fminbox::optimization::{
///     fminbox::{FminboxOptions, InnerMethod, fminbox},
///     objective::Differentiable,
/// };
///
/// let f = Differentiable::from_fn(|x: &ndarray::Array1<f64>| (x[0] - 2.0).powi(2));
/// let out = fminbox(
///     &f, array![0.0], array![1.0], array![0.5], InnerMethod::LBFGS,
///     &FminboxOptions::default(),
/// )
/// .unwrap();
/// assert!((out.minimizer[0] - 1.0).abs() < 1e-6);
/// assert_eq!(out.summary(), "Fminbox with L-BFGS");
/// ```
pub fn fminbox<O>(
    objective: &O, lower: Theta, upper: Theta, x0: Theta, method: InnerMethod,
    opts: &FminboxOptions,
) -> OptResult<FminboxOutcome>
where
    O: Objective + ?Sized,
{
    method.ensure_first_order()?;
    let bounds = BoxConstraints::new(lower, upper)?;
    let projection = bounds.validate_and_project(&x0)?;
    let adapter = ObjectiveAdapter::new(objective);
    let run = run_outer_loop(&adapter, &bounds, projection.point, method, opts)?;
    FminboxOutcome::new(&adapter, method, run, projection.adjustment)
}
