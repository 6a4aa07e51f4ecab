//! fminbox — box-constrained minimization by a logarithmic barrier.
//!
//! Purpose
//! -------
//! Minimize a smooth objective `f(x)` subject to `l ≤ x ≤ u` by solving a
//! sequence of unconstrained barrier subproblems
//!
//! ```text
//! φ_μ(x) = f(x) + μ · Σ_i [ −ln(x_i − l_i) − ln(u_i − x_i) ]
//! ```
//!
//! with an argmin inner solver, shrinking `μ` geometrically between
//! subproblems so the iterates approach the constrained minimizer from the
//! interior of the box.
//!
//! Key behaviors
//! -------------
//! - [`fminbox`] is the single entry point. It validates the inner method
//!   and the box, projects the starting point strictly inside, runs the
//!   outer loop in [`controller`] and assembles a [`FminboxOutcome`].
//! - Infinite bounds contribute no barrier term; coordinates with
//!   `l_i == u_i` are fixed and never handed to the inner solver.
//! - Inner methods are the first-order argmin solvers listed in
//!   [`InnerMethod`]; `Newton` and `NewtonTrustRegion` are rejected with
//!   `OptError::IncompatibleInnerMethod`.
//! - The More–Thuente and Hager–Zhang line searches are restricted to the
//!   interior of the box by [`linesearch::InteriorLineSearch`].
//! - [`certify`] classifies a candidate minimizer against the KKT
//!   conditions of the box without running any optimization.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every accepted outer iterate is strictly interior on every free
//!   coordinate; the barrier is `+∞` outside and its gradient undefined.
//! - `μ` is strictly decreasing across outer iterations.
//! - `FminboxOutcome::minimum == f(FminboxOutcome::minimizer)` exactly.
//! - Reaching the outer iteration cap, a stalled inner solve and an
//!   infeasible inner step are reported through `converged == false`, never
//!   as errors.
//!
//! Conventions
//! -----------
//! - Points, bounds and gradients are [`Theta`](crate::optimization::types::Theta)
//!   / [`Grad`](crate::optimization::types::Grad) (`Array1<f64>`).
//! - Boundary diagnostics report **1-based** coordinate indices.
//! - Inner solvers work in reduced coordinates (free coordinates only);
//!   [`BoxConstraints::restrict`] and [`BoxConstraints::embed`] convert.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its own layer; end-to-end runs
//!   live under `tests/`.
pub mod api;
pub mod barrier;
pub mod bounds;
pub mod builders;
pub mod certify;
pub mod controller;
pub mod linesearch;
pub mod methods;
pub mod options;
pub mod outcome;
pub mod run;

pub use self::api::fminbox;
pub use self::barrier::{PenalizedProblem, barrier_gradient, barrier_value};
pub use self::bounds::{BOUNDARY_NUDGE, BoundaryAdjustment, BoxConstraints, Projection};
pub use self::certify::{Certificate, CertifyTolerances, CoordinateStatus, certify};
pub use self::methods::InnerMethod;
pub use self::options::{
    BarrierSchedule, FminboxOptions, InitialMu, InnerOptions, LineSearcher, OuterTolerances,
    Tolerances,
};
pub use self::outcome::{FminboxOutcome, OuterIteration, OuterStatus};
pub use self::run::{InnerOutcome, solve_subproblem};
