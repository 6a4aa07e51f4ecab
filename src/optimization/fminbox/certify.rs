//! fminbox::certify — first-order optimality report for a box-constrained point.
//!
//! Purpose
//! -------
//! Classify every coordinate of a candidate minimizer against the KKT
//! conditions of the box using the *true* gradient of `f` (no barrier).
//! The certifier only reports; the caller decides what to do with it.
//!
//! Key behaviors
//! -------------
//! - Interior coordinate with `|g_i| < ε_grad` → `InteriorStationary`.
//! - Within `ε_box` of the lower bound with `g_i > 0` → `ActiveLower`.
//! - Within `ε_box` of the upper bound with `g_i < 0` → `ActiveUpper`.
//! - `l_i == u_i` → `Fixed`.
//! - Anything else → `NotStationary`.
use crate::optimization::{
    errors::{OptError, OptResult},
    fminbox::bounds::BoxConstraints,
    objective::{adapter::ObjectiveAdapter, traits::Objective},
    types::{Grad, Theta},
};

/// Tolerances for [`certify`]: `grad` is ε_grad, `boxtol` is ε_box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CertifyTolerances {
    pub grad: f64,
    pub boxtol: f64,
}

impl CertifyTolerances {
    /// # Errors
    /// [`OptError::InvalidCertifyTolerance`] unless both values are finite and
    /// strictly positive.
    pub fn new(grad: f64, boxtol: f64) -> OptResult<Self> {
        for (name, tol) in [("grad", grad), ("boxtol", boxtol)] {
            if !tol.is_finite() || tol <= 0.0 {
                return Err(OptError::InvalidCertifyTolerance {
                    name,
                    tol,
                    reason: "Tolerance must be finite and strictly positive.",
                });
            }
        }
        Ok(Self { grad, boxtol })
    }
}

impl Default for CertifyTolerances {
    fn default() -> Self {
        Self { grad: 1e-6, boxtol: 1e-6 }
    }
}

/// Per-coordinate verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateStatus {
    InteriorStationary,
    ActiveLower,
    ActiveUpper,
    Fixed,
    NotStationary,
}

/// Gradient at the candidate and the status of each coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Certificate {
    pub gradient: Grad,
    pub statuses: Vec<CoordinateStatus>,
}

impl Certificate {
    /// `true` when no coordinate is `NotStationary`.
    pub fn is_stationary(&self) -> bool {
        self.statuses.iter().all(|s| *s != CoordinateStatus::NotStationary)
    }

    /// 0-based indices of `NotStationary` coordinates.
    pub fn violations(&self) -> Vec<usize> {
        self.statuses
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == CoordinateStatus::NotStationary)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Certify first-order optimality of `x` for `objective` on `bounds`.
///
/// The gradient comes from the objective (or finite differences when it
/// implements none).
///
/// # Errors
/// - [`OptError::DimensionMismatch`] if `x` and the box differ in length.
/// - Any error raised while evaluating the gradient.
pub fn certify<O>(
    objective: &O, bounds: &BoxConstraints, x: &Theta, tols: &CertifyTolerances,
) -> OptResult<Certificate>
where
    O: Objective + ?Sized,
{
    if x.len() != bounds.dim() {
        return Err(OptError::DimensionMismatch {
            what: "candidate minimizer",
            expected: bounds.dim(),
            found: x.len(),
        });
    }
    let gradient = ObjectiveAdapter::new(objective).gradient(x)?;
    let (lower, upper) = (bounds.lower(), bounds.upper());
    let statuses = (0..x.len())
        .map(|i| {
            let g = gradient[i];
            if bounds.is_fixed(i) {
                CoordinateStatus::Fixed
            } else if x[i] - lower[i] <= tols.boxtol && g > 0.0 {
                CoordinateStatus::ActiveLower
            } else if upper[i] - x[i] <= tols.boxtol && g < 0.0 {
                CoordinateStatus::ActiveUpper
            } else if g.abs() < tols.grad {
                CoordinateStatus::InteriorStationary
            } else {
                CoordinateStatus::NotStationary
            }
        })
        .collect();
    Ok(Certificate { gradient, statuses })
}
