//! optimization — objectives, the Fminbox controller, and the error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive layer for box-constrained minimization: callers describe
//! `f` once (closures, a trait impl, or a generic model for forward-mode AD),
//! pick an inner argmin method and obtain a validated minimizer with
//! diagnostics, without touching solver generics.
//!
//! Key behaviors
//! -------------
//! - `objective`: the [`objective::Objective`] interface, closure wrappers,
//!   dual numbers and finite differences.
//! - `fminbox`: log-barrier outer loop, inner-solver wiring, boundary
//!   projection, KKT certification.
//! - `errors`: one enum ([`errors::OptError`]) for configuration, numerical
//!   and backend failures, with alias `OptResult<T>`.
//!
//! Conventions
//! -----------
//! - Everything minimizes `f`; there is no sign flipping anywhere.
//! - Points and gradients are `ndarray` aliases from [`types`].
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw argmin errors.
//! - Only `log` macros are used for diagnostics; installing a logger is left
//!   to the application.
//!
//! Downstream usage
//! ----------------
//! - Most callers import the curated surface via
//!   `optimization::prelude::*` and call `fminbox`.

pub mod errors;
pub mod fminbox;
pub mod objective;
pub mod types;
pub mod validation;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_fminbox::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::fminbox::{
        BarrierSchedule, BoxConstraints, CertifyTolerances, CoordinateStatus, FminboxOptions,
        FminboxOutcome, InitialMu, InnerMethod, InnerOptions, LineSearcher, OuterStatus,
        OuterTolerances, Tolerances, certify, fminbox,
    };
    pub use super::objective::{
        Differentiable, FiniteDiffScheme, Objective, Scalar, ScalarObjective,
    };
    pub use super::types::{Grad, Theta};
}
