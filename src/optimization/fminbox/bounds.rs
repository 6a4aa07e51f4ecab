//! fminbox::bounds — the box, its validation and the initial-point projector.
//!
//! Purpose
//! -------
//! Own the per-coordinate bounds `[l, u]`, check the caller's initial point
//! against them once, and provide the coordinate bookkeeping (free vs fixed)
//! that the barrier and the controller rely on.
//!
//! Key behaviors
//! -------------
//! - [`BoxConstraints::new`] rejects mismatched lengths, `NaN` bounds and
//!   `l > u`. Infinite bounds are accepted; `l == u` marks a fixed coordinate.
//! - [`BoxConstraints::validate_and_project`] rejects initial points outside
//!   the box and nudges points lying exactly on a bound into the interior,
//!   reporting every moved coordinate in a single [`BoundaryAdjustment`].
//! - [`BoxConstraints::restrict`] / [`BoxConstraints::embed`] convert between
//!   full vectors and the reduced vector of free coordinates seen by inner
//!   solvers.
//!
//! Invariants & assumptions
//! ------------------------
//! - After projection every free coordinate satisfies `l < x < u` and every
//!   fixed coordinate equals its bound.
//! - Indices in [`BoundaryAdjustment`] are 1-based and ascending.
use crate::optimization::{
    errors::{OptError, OptResult},
    types::{Grad, Theta},
};
use ndarray::Axis;
use std::fmt;

/// Fraction of the box width used to move a boundary coordinate inward.
pub const BOUNDARY_NUDGE: f64 = 0.01;

/// Diagnostic listing coordinates moved off the boundary (1-based, ascending).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryAdjustment {
    pub indices: Vec<usize>,
}

impl fmt::Display for BoundaryAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Initial position cannot be on the boundary of the box. Moving elements to the interior. Element indices affected: {:?}",
            self.indices
        )
    }
}

/// Result of validating and projecting an initial point.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub point: Theta,
    pub adjustment: Option<BoundaryAdjustment>,
}

/// Validated per-coordinate bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxConstraints {
    lower: Theta,
    upper: Theta,
    free: Vec<usize>,
}

impl BoxConstraints {
    /// Build a validated box.
    ///
    /// # Errors
    /// - [`OptError::DimensionMismatch`] if `lower` and `upper` differ in length.
    /// - [`OptError::InvalidBounds`] for a `NaN` bound, `lower > upper`, a
    ///   lower bound of `+∞` or an upper bound of `−∞`.
    pub fn new(lower: Theta, upper: Theta) -> OptResult<Self> {
        if lower.len() != upper.len() {
            return Err(OptError::DimensionMismatch {
                what: "upper bounds",
                expected: lower.len(),
                found: upper.len(),
            });
        }
        let mut free = Vec::with_capacity(lower.len());
        for (index, (&l, &u)) in lower.iter().zip(upper.iter()).enumerate() {
            let reason = if l.is_nan() || u.is_nan() {
                Some("Bounds must not be NaN.")
            } else if l > u {
                Some("Lower bound exceeds upper bound.")
            } else if l == f64::INFINITY || u == f64::NEG_INFINITY {
                Some("Bounds must leave a non-empty set of finite values.")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(OptError::InvalidBounds { index, lower: l, upper: u, reason });
            }
            if l < u {
                free.push(index);
            }
        }
        Ok(Self { lower, upper, free })
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &Theta {
        &self.lower
    }

    pub fn upper(&self) -> &Theta {
        &self.upper
    }

    /// Indices (0-based) of coordinates with `l < u`.
    pub fn free_indices(&self) -> &[usize] {
        &self.free
    }

    pub fn is_fixed(&self, index: usize) -> bool {
        self.lower[index] == self.upper[index]
    }

    /// First free coordinate of `x` that is not strictly inside `(l, u)`.
    pub fn first_non_interior(&self, x: &Theta) -> Option<usize> {
        self.free.iter().copied().find(|&i| {
            let xi = x[i];
            !(xi.is_finite() && self.lower[i] < xi && xi < self.upper[i])
        })
    }

    /// `true` if every free coordinate lies strictly inside its bounds.
    pub fn is_strictly_interior(&self, x: &Theta) -> bool {
        x.len() == self.dim() && self.first_non_interior(x).is_none()
    }

    /// Extract the free coordinates of a full vector.
    pub fn restrict(&self, x: &Theta) -> Theta {
        x.select(Axis(0), &self.free)
    }

    /// Write reduced coordinates `z` into a copy of the full vector `anchor`.
    pub fn embed(&self, anchor: &Theta, z: &Theta) -> Theta {
        let mut full = anchor.clone();
        for (k, &i) in self.free.iter().enumerate() {
            full[i] = z[k];
        }
        full
    }

    /// `‖x − clamp(x − g, l, u)‖∞`, zero exactly at a KKT point of the box.
    pub fn projected_gradient_norm(&self, x: &Theta, g: &Grad) -> f64 {
        let mut norm: f64 = 0.0;
        for i in 0..x.len() {
            let projected = (x[i] - g[i]).max(self.lower[i]).min(self.upper[i]);
            norm = norm.max((x[i] - projected).abs());
        }
        norm
    }

    /// Validate `x0` against the box and move boundary coordinates inward.
    ///
    /// Parameters
    /// ----------
    /// - `x0`: caller's initial point, same length as the box.
    ///
    /// Returns
    /// -------
    /// [`Projection`] with the strictly interior starting point and, if any
    /// coordinate was moved, one [`BoundaryAdjustment`]. The adjustment is
    /// also emitted once through `log::warn!`.
    ///
    /// A free coordinate on `l` moves to `l + 0.01·(u − l)`; on `u` it moves
    /// to `u − 0.01·(u − l)`. When the opposite bound is infinite the width
    /// is replaced by `max(|bound|, 1)`.
    ///
    /// Errors
    /// ------
    /// - [`OptError::DimensionMismatch`] if `x0` has the wrong length.
    /// - [`OptError::InvalidInitialPoint`] for a non-finite coordinate.
    /// - [`OptError::InitialPointOutOfBounds`] for the first coordinate
    ///   outside `[l, u]`. Never clamped.
    pub fn validate_and_project(&self, x0: &Theta) -> OptResult<Projection> {
        if x0.len() != self.dim() {
            return Err(OptError::DimensionMismatch {
                what: "initial point",
                expected: self.dim(),
                found: x0.len(),
            });
        }
        for (index, &value) in x0.iter().enumerate() {
            if !value.is_finite() {
                return Err(OptError::InvalidInitialPoint { index, value });
            }
            let (lower, upper) = (self.lower[index], self.upper[index]);
            if value < lower || value > upper {
                return Err(OptError::InitialPointOutOfBounds { index, value, lower, upper });
            }
        }

        let mut point = x0.clone();
        let mut moved = Vec::new();
        for &i in &self.free {
            let (l, u) = (self.lower[i], self.upper[i]);
            if point[i] == l {
                let width = if u.is_finite() { u - l } else { l.abs().max(1.0) };
                point[i] = l + BOUNDARY_NUDGE * width;
                moved.push(i + 1);
            } else if point[i] == u {
                let width = if l.is_finite() { u - l } else { u.abs().max(1.0) };
                point[i] = u - BOUNDARY_NUDGE * width;
                moved.push(i + 1);
            }
        }

        let adjustment = if moved.is_empty() {
            None
        } else {
            let adjustment = BoundaryAdjustment { indices: moved };
            log::warn!("{adjustment}");
            Some(adjustment)
        };
        Ok(Projection { point, adjustment })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Box validation (lengths, NaN, inverted and degenerate bounds).
    // - Initial-point rejection and boundary projection, including infinite
    //   opposite bounds and fixed coordinates.
    // - Reduced/full coordinate conversion and the projected-gradient norm.
    // -------------------------------------------------------------------------

    #[test]
    fn new_rejects_inverted_and_nan_bounds() {
        assert!(matches!(
            BoxConstraints::new(array![0.0, 2.0], array![1.0, 1.0]),
            Err(OptError::InvalidBounds { index: 1, .. })
        ));
        assert!(matches!(
            BoxConstraints::new(array![f64::NAN], array![1.0]),
            Err(OptError::InvalidBounds { index: 0, .. })
        ));
        assert!(matches!(
            BoxConstraints::new(array![0.0], array![1.0, 2.0]),
            Err(OptError::DimensionMismatch { expected: 1, found: 2, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // A point strictly outside the box is an error and is never clamped.
    //
    // Given
    // -----
    // - Box [0, 1]², x0 = (0.5, 1.5).
    //
    // Expect
    // ------
    // - `InitialPointOutOfBounds` naming index 1.
    fn out_of_bounds_point_is_rejected() {
        // Arrange
        let bx = BoxConstraints::new(array![0.0, 0.0], array![1.0, 1.0]).unwrap();

        // Act
        let err = bx.validate_and_project(&array![0.5, 1.5]).unwrap_err();

        // Assert
        assert_eq!(
            err,
            OptError::InitialPointOutOfBounds { index: 1, value: 1.5, lower: 0.0, upper: 1.0 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Boundary coordinates are nudged inward and reported once with 1-based
    // ascending indices.
    //
    // Given
    // -----
    // - Box [0, 10] × [−1, 1] × [2, 4], x0 = (10, 0, 2).
    //
    // Expect
    // ------
    // - x = (9.9, 0, 2.02) and indices [1, 3].
    fn boundary_coordinates_are_nudged_and_reported() {
        // Arrange
        let bx =
            BoxConstraints::new(array![0.0, -1.0, 2.0], array![10.0, 1.0, 4.0]).unwrap();

        // Act
        let proj = bx.validate_and_project(&array![10.0, 0.0, 2.0]).unwrap();

        // Assert
        assert_relative_eq!(proj.point[0], 9.9, epsilon = 1e-12);
        assert_eq!(proj.point[1], 0.0);
        assert_relative_eq!(proj.point[2], 2.02, epsilon = 1e-12);
        assert_eq!(proj.adjustment, Some(BoundaryAdjustment { indices: vec![1, 3] }));
        assert!(bx.is_strictly_interior(&proj.point));
    }

    #[test]
    fn nudge_uses_bound_magnitude_when_opposite_bound_is_infinite() {
        let bx = BoxConstraints::new(array![5.0, f64::NEG_INFINITY, 0.0], array![
            f64::INFINITY,
            -200.0,
            f64::INFINITY
        ])
        .unwrap();

        let proj = bx.validate_and_project(&array![5.0, -200.0, 0.0]).unwrap();

        assert_relative_eq!(proj.point[0], 5.05, epsilon = 1e-12);
        assert_relative_eq!(proj.point[1], -202.0, epsilon = 1e-12);
        assert_relative_eq!(proj.point[2], 0.01, epsilon = 1e-12);
    }

    #[test]
    fn interior_point_is_unchanged_and_fixed_coordinates_are_not_reported() {
        let bx = BoxConstraints::new(array![0.0, 3.0], array![1.0, 3.0]).unwrap();

        let proj = bx.validate_and_project(&array![0.25, 3.0]).unwrap();

        assert_eq!(proj.point, array![0.25, 3.0]);
        assert_eq!(proj.adjustment, None);
        assert_eq!(bx.free_indices(), &[0]);
        assert!(bx.is_fixed(1));
    }

    #[test]
    fn restrict_and_embed_are_inverse_on_free_coordinates() {
        let bx = BoxConstraints::new(array![0.0, 1.0, 0.0], array![1.0, 1.0, 1.0]).unwrap();
        let anchor = array![0.5, 1.0, 0.5];

        let z = bx.restrict(&anchor);
        let full = bx.embed(&anchor, &array![0.2, 0.7]);

        assert_eq!(z, array![0.5, 0.5]);
        assert_eq!(full, array![0.2, 1.0, 0.7]);
    }

    #[test]
    fn projected_gradient_norm_vanishes_at_active_bound() {
        let bx = BoxConstraints::new(array![0.0, 0.0], array![1.0, 1.0]).unwrap();

        // At x = (0, 0.5) with g = (3, 0): pushing against the lower bound is stationary.
        let at_kkt = bx.projected_gradient_norm(&array![0.0, 0.5], &array![3.0, 0.0]);
        let off_kkt = bx.projected_gradient_norm(&array![0.5, 0.5], &array![0.2, -0.1]);

        assert_eq!(at_kkt, 0.0);
        assert_relative_eq!(off_kkt, 0.2, epsilon = 1e-15);
    }
}
