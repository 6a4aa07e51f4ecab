//! fminbox::builders — inner-solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for the argmin solvers used on barrier
//! subproblems. These helpers hide argmin's generic wiring and apply
//! crate-level options (tolerances, memory size) so that the runner can
//! request a configured solver without touching argmin-specific types.
//!
//! Key behaviors
//! -------------
//! - Build each line search ([`build_backtracking`], [`build_more_thuente`],
//!   [`build_hager_zhang`]) and each solver over a generic line search `L`.
//!   The two interpolating searches come wrapped in an
//!   [`InteriorLineSearch`] for the subproblem's reduced bounds.
//! - Apply optional gradient and cost-change tolerances from
//!   [`InnerOptions`] via shared configuration helpers.
//! - Build an initial Nelder–Mead simplex that stays strictly inside the box.
//!
//! Invariants & assumptions
//! ------------------------
//! - All solvers operate on the reduced vector of free coordinates.
//! - Any invalid tolerance passed into argmin's `with_tolerance_*` setters
//!   is surfaced as an [`OptError`](crate::optimization::errors::OptError)
//!   through the crate's `From<Error>` implementation.
//!
//! Conventions
//! -----------
//! - The builders do **not** set an initial parameter vector or
//!   `max_iters`; these are runtime concerns applied by
//!   [`solve_subproblem`](super::run::solve_subproblem).
use argmin::solver::{
    conjugategradient::beta::PolakRibierePlus, linesearch::condition::ArmijoCondition,
};

use crate::optimization::{
    errors::OptResult,
    fminbox::{linesearch::InteriorLineSearch, options::InnerOptions},
    types::{
        BacktrackingLS, BfgsSolver, ConjugateGradientSolver, GradientDescentSolver, HagerZhangLS,
        LbfgsSolver, MoreThuenteLS, NelderMeadSolver, Theta,
    },
};

/// Armijo sufficient-decrease constant.
pub const ARMIJO_C: f64 = 1e-4;

/// Step contraction factor of the backtracking line search.
pub const BACKTRACKING_RHO: f64 = 0.5;

/// Cosine threshold at which nonlinear CG restarts along −∇φ.
pub const CG_RESTART_ORTHOGONALITY: f64 = 0.1;

/// Relative size of the Nelder–Mead simplex edges.
pub const SIMPLEX_STEP: f64 = 0.05;

/// Simplex edge used for a coordinate that is exactly zero.
pub const SIMPLEX_ZERO_STEP: f64 = 0.00025;

pub fn build_backtracking() -> OptResult<BacktrackingLS> {
    let condition = ArmijoCondition::new(ARMIJO_C)?;
    Ok(BacktrackingLS::new(condition).rho(BACKTRACKING_RHO)?)
}

pub fn build_more_thuente(lower: Theta, upper: Theta) -> InteriorLineSearch<MoreThuenteLS> {
    InteriorLineSearch::new(MoreThuenteLS::new(), lower, upper)
}

pub fn build_hager_zhang(lower: Theta, upper: Theta) -> InteriorLineSearch<HagerZhangLS> {
    InteriorLineSearch::new(HagerZhangLS::new(), lower, upper)
}

/// Steepest descent. argmin exposes no tolerances for it, so only
/// `max_iter` stops an inner run.
pub fn build_gradient_descent<L>(linesearch: L) -> GradientDescentSolver<L> {
    GradientDescentSolver::new(linesearch)
}

/// Polak–Ribière+ nonlinear CG, restarted every `dim` iterations and when
/// successive gradients lose orthogonality.
pub fn build_conjugate_gradient<L>(linesearch: L, dim: usize) -> ConjugateGradientSolver<L> {
    ConjugateGradientSolver::new(linesearch, PolakRibierePlus::new())
        .restart_iters(dim.max(1) as u64)
        .restart_orthogonality(CG_RESTART_ORTHOGONALITY)
}

pub fn build_lbfgs<L>(linesearch: L, opts: &InnerOptions) -> OptResult<LbfgsSolver<L>> {
    let lbfgs = LbfgsSolver::new(linesearch, opts.lbfgs_mem);
    configure_lbfgs(lbfgs, opts)
}

pub fn build_bfgs<L>(linesearch: L, opts: &InnerOptions) -> OptResult<BfgsSolver<L>> {
    configure_bfgs(BfgsSolver::new(linesearch), opts)
}

/// Nelder–Mead over an interior simplex around `z0`.
///
/// `tol_cost`, when given, becomes the simplex standard-deviation tolerance.
pub fn build_nelder_mead(
    z0: &Theta, lower: &Theta, upper: &Theta, opts: &InnerOptions,
) -> OptResult<NelderMeadSolver> {
    let mut solver = NelderMeadSolver::new(interior_simplex(z0, lower, upper));
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_sd_tolerance(c)?;
    }
    Ok(solver)
}

pub fn configure_lbfgs<L>(
    mut solver: LbfgsSolver<L>, opts: &InnerOptions,
) -> OptResult<LbfgsSolver<L>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

pub fn configure_bfgs<L>(
    mut solver: BfgsSolver<L>, opts: &InnerOptions,
) -> OptResult<BfgsSolver<L>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// Initial simplex with `z0` as first vertex and one perturbed vertex per
/// coordinate.
///
/// Each edge is 5% of the coordinate (or [`SIMPLEX_ZERO_STEP`] at zero). The
/// edge points away from the nearer bound when the preferred direction has
/// too little room, and never covers more than half of the remaining room,
/// so every vertex is strictly inside `(lower, upper)`.
pub fn interior_simplex(z0: &Theta, lower: &Theta, upper: &Theta) -> Vec<Theta> {
    let mut vertices = Vec::with_capacity(z0.len() + 1);
    vertices.push(z0.clone());
    for i in 0..z0.len() {
        let step = if z0[i] == 0.0 { SIMPLEX_ZERO_STEP } else { SIMPLEX_STEP * z0[i] };
        let up = upper[i] - z0[i];
        let down = z0[i] - lower[i];
        let (mut sign, mut room) = if step >= 0.0 { (1.0, up) } else { (-1.0, down) };
        let other = if sign > 0.0 { down } else { up };
        if room < 2.0 * step.abs() && other > room {
            sign = -sign;
            room = other;
        }
        let mut vertex = z0.clone();
        vertex[i] += sign * step.abs().min(0.5 * room);
        vertices.push(vertex);
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::fminbox::options::{LineSearcher, Tolerances};
    use ndarray::array;

    fn inner_opts(tol_cost: Option<f64>) -> InnerOptions {
        let tols = Tolerances::new(Some(1e-8), tol_cost, Some(50)).expect("Tolerances should be valid");
        InnerOptions::new(tols, LineSearcher::Backtracking, 5, false)
            .expect("InnerOptions should be valid")
    }

    #[test]
    fn line_searches_and_gradient_solvers_build() {
        let opts = inner_opts(Some(1e-12));
        let unit = || (array![0.0, 0.0, 0.0], array![1.0, 1.0, 1.0]);

        assert!(build_backtracking().is_ok());
        let (l, u) = unit();
        assert!(build_lbfgs(build_more_thuente(l, u), &opts).is_ok());
        let (l, u) = unit();
        assert!(build_bfgs(build_hager_zhang(l, u), &opts).is_ok());
        let (l, u) = unit();
        let _gd = build_gradient_descent(build_more_thuente(l, u));
        let (l, u) = unit();
        let _cg = build_conjugate_gradient(build_hager_zhang(l, u), 3);
    }

    #[test]
    fn nelder_mead_builds_with_and_without_sd_tolerance() {
        let z0 = array![0.5, 0.5];
        let (l, u) = (array![0.0, 0.0], array![1.0, 1.0]);

        assert!(build_nelder_mead(&z0, &l, &u, &inner_opts(None)).is_ok());
        assert!(build_nelder_mead(&z0, &l, &u, &inner_opts(Some(1e-10))).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Every simplex vertex must be strictly inside the box, even when the
    // starting point hugs a bound.
    //
    // Given
    // -----
    // - z0 = (0.999, 0.0, −3.0) in (0, 1) × (−1, 1) × (−3.01, 0).
    //
    // Expect
    // ------
    // - n + 1 vertices, the first equal to z0, all strictly interior.
    // - Coordinate 0 moves downward (no room above); coordinate 2 moves up.
    fn interior_simplex_stays_inside_box() {
        // Arrange
        let z0 = array![0.999, 0.0, -3.0];
        let lower = array![0.0, -1.0, -3.01];
        let upper = array![1.0, 1.0, 0.0];

        // Act
        let simplex = interior_simplex(&z0, &lower, &upper);

        // Assert
        assert_eq!(simplex.len(), 4);
        assert_eq!(simplex[0], z0);
        for v in &simplex {
            for i in 0..3 {
                assert!(lower[i] < v[i] && v[i] < upper[i], "vertex {v:?} leaves the box");
            }
        }
        assert!(simplex[1][0] < z0[0]);
        assert!(simplex[3][2] > z0[2]);
        assert!(simplex[2][1] > 0.0);
    }
}
