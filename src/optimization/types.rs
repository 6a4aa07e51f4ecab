//! types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types and argmin solver aliases used by the
//! objective layer and the Fminbox controller, so the rest of the code stays
//! agnostic to `ndarray` and argmin generics.
//!
//! Conventions
//! -----------
//! - Points and gradients are `ndarray::Array1<f64>`; the inverse Hessian
//!   carried by BFGS is a dense `Array2<f64>`.
//! - Inner solvers always see the *reduced* vector of free coordinates;
//!   fixed coordinates never reach argmin.
//! - The line-search aliases assume argmin's `(Param, Gradient, Float)` forms
//!   as of the pinned argmin version.
use argmin::solver::{
    conjugategradient::{NonlinearConjugateGradient, beta::PolakRibierePlus},
    gradientdescent::SteepestDescent,
    linesearch::{
        BacktrackingLineSearch, HagerZhangLineSearch, MoreThuenteLineSearch,
        condition::ArmijoCondition,
    },
    neldermead::NelderMead,
    quasinewton::{BFGS, LBFGS},
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Point in ℝⁿ (full or reduced, depending on context).
pub type Theta = Array1<f64>;

/// Gradient vector, same shape as [`Theta`].
pub type Grad = Array1<f64>;

/// Dense inverse-Hessian approximation carried by BFGS.
pub type InvHessian = Array2<f64>;

/// Scalar objective value.
pub type Cost = f64;

/// Function-evaluation counters as reported by argmin.
///
/// Maps counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 10;

/// Armijo backtracking, the default line search for barrier subproblems.
pub type BacktrackingLS = BacktrackingLineSearch<Theta, Grad, ArmijoCondition<Cost>, Cost>;

/// Hager–Zhang line search specialized to this crate's numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate's numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// Steepest descent over line search `L`.
pub type GradientDescentSolver<L> = SteepestDescent<L>;

/// Nonlinear conjugate gradient (Polak–Ribière+) over line search `L`.
pub type ConjugateGradientSolver<L> = NonlinearConjugateGradient<Theta, L, PolakRibierePlus, Cost>;

/// L-BFGS over line search `L`.
pub type LbfgsSolver<L> = LBFGS<L, Theta, Grad, Cost>;

/// BFGS over line search `L`.
pub type BfgsSolver<L> = BFGS<L, Cost>;

/// Nelder–Mead simplex search.
pub type NelderMeadSolver = NelderMead<Theta, Cost>;
