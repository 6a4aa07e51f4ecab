//! fminbox::barrier — log-barrier transform exposed as an argmin problem.
//!
//! Purpose
//! -------
//! Turn the box-constrained problem into the unconstrained subproblem
//! `φ_μ(x) = f(x) + μ·B(x)` that inner solvers can minimize, where
//! `B(x) = Σ_i [−ln(x_i − l_i) − ln(u_i − x_i)]` over free coordinates and
//! finite bounds only.
//!
//! Key behaviors
//! -------------
//! - [`barrier_value`] / [`barrier_gradient`] evaluate `B` and `∇B` on full
//!   vectors; fixed coordinates and infinite bounds contribute nothing.
//! - [`PenalizedProblem`] implements `argmin::core::{CostFunction, Gradient}`
//!   over the *reduced* vector of free coordinates. Fixed coordinates are
//!   taken from the anchor point the problem was built at.
//! - Outside the open box the penalized cost is `+∞` and `f` is not called,
//!   so a backtracking line search simply shrinks its step. A gradient
//!   request outside the box fails with [`OptError::OutsideBarrierDomain`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `μ` is finite and strictly positive for the lifetime of the problem.
//! - The anchor point is strictly interior (checked in
//!   [`PenalizedProblem::new`]).
//!
//! Downstream usage
//! ----------------
//! - Built once per outer iteration by the controller and handed to
//!   [`solve_subproblem`](super::run::solve_subproblem).
use crate::optimization::{
    errors::{OptError, OptResult},
    fminbox::bounds::BoxConstraints,
    objective::{adapter::ObjectiveAdapter, traits::Objective},
    types::{Cost, Grad, Theta},
};
use argmin::core::{CostFunction, Error, Gradient};

/// `B(x)`, or `+∞` if any free coordinate is not strictly interior.
pub fn barrier_value(bounds: &BoxConstraints, x: &Theta) -> f64 {
    if !bounds.is_strictly_interior(x) {
        return f64::INFINITY;
    }
    let (lower, upper) = (bounds.lower(), bounds.upper());
    bounds
        .free_indices()
        .iter()
        .map(|&i| {
            let mut term = 0.0;
            if lower[i].is_finite() {
                term -= (x[i] - lower[i]).ln();
            }
            if upper[i].is_finite() {
                term -= (upper[i] - x[i]).ln();
            }
            term
        })
        .sum()
}

/// `∇B(x)` on the full vector (zero on fixed coordinates).
///
/// # Errors
/// [`OptError::OutsideBarrierDomain`] for the first free coordinate that is
/// not strictly inside its bounds.
pub fn barrier_gradient(bounds: &BoxConstraints, x: &Theta) -> OptResult<Grad> {
    ensure_interior(bounds, x)?;
    let (lower, upper) = (bounds.lower(), bounds.upper());
    let mut grad = Grad::zeros(x.len());
    for &i in bounds.free_indices() {
        if lower[i].is_finite() {
            grad[i] -= 1.0 / (x[i] - lower[i]);
        }
        if upper[i].is_finite() {
            grad[i] += 1.0 / (upper[i] - x[i]);
        }
    }
    Ok(grad)
}

fn ensure_interior(bounds: &BoxConstraints, x: &Theta) -> OptResult<()> {
    match bounds.first_non_interior(x) {
        Some(index) => Err(OptError::OutsideBarrierDomain {
            index,
            value: x[index],
            lower: bounds.lower()[index],
            upper: bounds.upper()[index],
        }),
        None => Ok(()),
    }
}

/// Barrier subproblem `φ_μ` over the free coordinates.
#[derive(Debug)]
pub struct PenalizedProblem<'a, O: Objective + ?Sized> {
    adapter: &'a ObjectiveAdapter<'a, O>,
    bounds: &'a BoxConstraints,
    mu: f64,
    anchor: Theta,
}

impl<'a, O: Objective + ?Sized> PenalizedProblem<'a, O> {
    /// Build `φ_μ` anchored at the interior point `x`.
    ///
    /// # Errors
    /// - [`OptError::InvalidBarrierCoefficient`] if `mu` is not finite and
    ///   strictly positive.
    /// - [`OptError::OutsideBarrierDomain`] if `x` is not strictly interior.
    pub fn new(
        adapter: &'a ObjectiveAdapter<'a, O>, bounds: &'a BoxConstraints, mu: f64, x: &Theta,
    ) -> OptResult<Self> {
        if !mu.is_finite() || mu <= 0.0 {
            return Err(OptError::InvalidBarrierCoefficient {
                mu,
                reason: "Barrier coefficient must be finite and strictly positive.",
            });
        }
        ensure_interior(bounds, x)?;
        Ok(Self { adapter, bounds, mu, anchor: x.clone() })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Reduced starting vector for the inner solver.
    pub fn initial_point(&self) -> Theta {
        self.bounds.restrict(&self.anchor)
    }

    /// Lower and upper bounds of the free coordinates.
    pub fn reduced_bounds(&self) -> (Theta, Theta) {
        (self.bounds.restrict(self.bounds.lower()), self.bounds.restrict(self.bounds.upper()))
    }

    /// Full-length point corresponding to reduced coordinates `z`.
    pub fn full_point(&self, z: &Theta) -> Theta {
        self.bounds.embed(&self.anchor, z)
    }

    /// `φ_μ` at reduced coordinates `z`; `+∞` outside the box.
    pub fn penalized_value(&self, z: &Theta) -> OptResult<Cost> {
        let x = self.full_point(z);
        if !self.bounds.is_strictly_interior(&x) {
            return Ok(f64::INFINITY);
        }
        let f = self.adapter.value(&x)?;
        Ok(f + self.mu * barrier_value(self.bounds, &x))
    }

    /// `∇φ_μ` restricted to the free coordinates.
    pub fn penalized_gradient(&self, z: &Theta) -> OptResult<Grad> {
        let x = self.full_point(z);
        let barrier = barrier_gradient(self.bounds, &x)?;
        let grad = self.adapter.gradient(&x)?;
        Ok(self.bounds.restrict(&(grad + barrier * self.mu)))
    }
}

impl<O: Objective + ?Sized> CostFunction for PenalizedProblem<'_, O> {
    type Param = Theta;
    type Output = Cost;

    fn cost(&self, z: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.penalized_value(z)?)
    }
}

impl<O: Objective + ?Sized> Gradient for PenalizedProblem<'_, O> {
    type Param = Theta;
    type Gradient = Grad;

    fn gradient(&self, z: &Self::Param) -> Result<Self::Gradient, Error> {
        Ok(self.penalized_gradient(z)?)
    }
}
