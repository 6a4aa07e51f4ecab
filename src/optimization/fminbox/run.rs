//! fminbox::run — execute one inner solve on a barrier subproblem.
//!
//! Purpose
//! -------
//! Hand a [`PenalizedProblem`] to the argmin solver selected by
//! [`InnerMethod`], run it from the problem's anchor point and normalize the
//! final solver state into an [`InnerOutcome`].
//!
//! Key behaviors
//! -------------
//! - Every inner solve starts from scratch: no curvature or simplex is
//!   carried over between outer iterations.
//! - Gradient-based methods pick their line search from
//!   [`InnerOptions::line_searcher`]; BFGS starts from an identity inverse
//!   Hessian; Nelder–Mead starts from an interior simplex.
//! - `max_iter` from [`InnerOptions::tols`] caps each run.
//! - With the `obs_slog` feature and `verbose = true`, argmin's slog
//!   observer prints inner progress.
//!
//! Errors
//! ------
//! Errors raised inside cost/gradient callbacks travel through argmin and
//! come back as the original [`OptError`](crate::optimization::errors::OptError).
use crate::optimization::{
    errors::OptResult,
    fminbox::{
        barrier::PenalizedProblem,
        builders::{
            build_backtracking, build_bfgs, build_conjugate_gradient, build_gradient_descent,
            build_hager_zhang, build_lbfgs, build_more_thuente, build_nelder_mead,
        },
        methods::InnerMethod,
        options::{InnerOptions, LineSearcher},
    },
    objective::traits::Objective,
    types::{FnEvalMap, InvHessian, Theta},
    validation::validate_theta_hat,
};
#[cfg(feature = "obs_slog")]
use argmin::core::observers::ObserverMode;
use argmin::core::{Executor, State, TerminationReason};
#[cfg(feature = "obs_slog")]
use argmin_observer_slog::SlogLogger;

/// Normalized result of one inner solve, in reduced coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerOutcome {
    pub best: Theta,
    pub best_cost: f64,
    pub iterations: u64,
    pub converged: bool,
    pub fn_evals: FnEvalMap,
}

/// Runs the executor for `$solver` on `$problem`, applying the shared
/// options, and collects the outcome.
macro_rules! execute {
    ($problem:expr, $solver:expr, $opts:expr, |$state:ident| $init:expr) => {{
        let mut executor = Executor::new($problem, $solver).configure(|$state| $init);
        #[cfg(feature = "obs_slog")]
        {
            if $opts.verbose {
                executor = executor.add_observer(SlogLogger::term_noblock(), ObserverMode::Always);
            }
        }
        if let Some(max_iter) = $opts.tols.max_iter {
            executor = executor.configure(|state| state.max_iters(max_iter as u64));
        }
        collect_outcome(executor.run()?.state())
    }};
}

/// Binds the configured line search to `$ls` and evaluates `$body`.
///
/// `$bounds` are the reduced `(lower, upper)` bounds of the subproblem.
macro_rules! with_line_search {
    ($searcher:expr, $bounds:expr, |$ls:ident| $body:expr) => {
        match $searcher {
            LineSearcher::Backtracking => {
                let $ls = build_backtracking()?;
                $body
            }
            LineSearcher::MoreThuente => {
                let (lower, upper) = $bounds;
                let $ls = build_more_thuente(lower, upper);
                $body
            }
            LineSearcher::HagerZhang => {
                let (lower, upper) = $bounds;
                let $ls = build_hager_zhang(lower, upper);
                $body
            }
        }
    };
}

/// solve_subproblem — minimize `φ_μ` with the chosen inner method.
///
/// Parameters
/// ----------
/// - `problem`: barrier subproblem anchored at the current outer iterate.
/// - `method`: inner optimizer; second-order methods are rejected.
/// - `opts`: tolerances, line search, L-BFGS memory and verbosity.
///
/// Returns
/// -------
/// [`InnerOutcome`] with the best reduced point found, its penalized cost,
/// the iteration count, whether argmin reported solver convergence, and the
/// evaluation counters.
///
/// Errors
/// ------
/// - `OptError::IncompatibleInnerMethod` for `Newton` / `NewtonTrustRegion`.
/// - Any error raised while evaluating the objective or by argmin itself.
pub fn solve_subproblem<O>(
    problem: PenalizedProblem<'_, O>, method: InnerMethod, opts: &InnerOptions,
) -> OptResult<InnerOutcome>
where
    O: Objective + ?Sized,
{
    let z0 = problem.initial_point();
    let dim = z0.len();
    let bounds = problem.reduced_bounds();
    let outcome = match method {
        InnerMethod::GradientDescent => with_line_search!(opts.line_searcher, bounds, |ls| {
            execute!(problem, build_gradient_descent(ls), opts, |state| state.param(z0))
        }),
        InnerMethod::ConjugateGradient => with_line_search!(opts.line_searcher, bounds, |ls| {
            execute!(problem, build_conjugate_gradient(ls, dim), opts, |state| state.param(z0))
        }),
        InnerMethod::LBFGS => with_line_search!(opts.line_searcher, bounds, |ls| {
            execute!(problem, build_lbfgs(ls, opts)?, opts, |state| state.param(z0))
        }),
        InnerMethod::BFGS => with_line_search!(opts.line_searcher, bounds, |ls| {
            execute!(problem, build_bfgs(ls, opts)?, opts, |state| state
                .param(z0)
                .inv_hessian(InvHessian::eye(dim)))
        }),
        InnerMethod::NelderMead => {
            let (lower, upper) = bounds;
            let solver = build_nelder_mead(&z0, &lower, &upper, opts)?;
            execute!(problem, solver, opts, |state| state.param(z0))
        }
        InnerMethod::Newton | InnerMethod::NewtonTrustRegion => Err(method.incompatible()),
    }?;
    log::trace!(
        "inner {}: {} iterations, converged = {}, cost = {:.6e}",
        method.name(),
        outcome.iterations,
        outcome.converged,
        outcome.best_cost
    );
    Ok(outcome)
}

/// Normalize an argmin final state into an [`InnerOutcome`].
///
/// # Errors
/// - `OptError::MissingThetaHat` if the solver recorded no best parameter.
/// - `OptError::InvalidThetaHat` if it is not finite.
pub fn collect_outcome<I>(state: &I) -> OptResult<InnerOutcome>
where
    I: State<Param = Theta, Float = f64>,
{
    let best = validate_theta_hat(state.get_best_param().cloned())?;
    let converged =
        matches!(state.get_termination_reason(), Some(TerminationReason::SolverConverged));
    Ok(InnerOutcome {
        best,
        best_cost: state.get_best_cost(),
        iterations: state.get_iter(),
        converged,
        fn_evals: state.get_func_counts().clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::OptError,
        fminbox::{bounds::BoxConstraints, options::Tolerances},
        objective::{adapter::ObjectiveAdapter, differentiable::Differentiable},
        types::Grad,
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - One inner solve per accepted method on a smooth barrier subproblem.
    // - The interpolating line searches on a subproblem whose unit step
    //   leaves the box.
    // - Rejection of second-order methods at this layer.
    //
    // They intentionally DO NOT cover:
    // - The outer μ schedule (see `fminbox::controller`).
    // -------------------------------------------------------------------------

    fn quadratic() -> Differentiable<'static> {
        Differentiable::with_gradient(
            |x: &Theta| (x[0] - 0.3).powi(2) + (x[1] - 0.6).powi(2),
            |x: &Theta| -> Grad { array![2.0 * (x[0] - 0.3), 2.0 * (x[1] - 0.6)] },
        )
    }

    fn opts(line_searcher: LineSearcher) -> InnerOptions {
        let tols = Tolerances::new(Some(1e-10), None, Some(200)).unwrap();
        InnerOptions::new(tols, line_searcher, 5, false).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Every accepted method decreases the penalized cost from the anchor and
    // stays strictly inside the box.
    //
    // Given
    // -----
    // - f = (x − 0.3)² + (y − 0.6)² on [0, 1]², μ = 1e-3, anchor (0.9, 0.1).
    //
    // Expect
    // ------
    // - `best` is interior and within 0.05 of (0.3, 0.6) for each method.
    fn accepted_methods_solve_a_smooth_subproblem() {
        // Arrange
        let f = quadratic();
        let adapter = ObjectiveAdapter::new(&f);
        let bx = BoxConstraints::new(array![0.0, 0.0], array![1.0, 1.0]).unwrap();
        let methods = [
            InnerMethod::GradientDescent,
            InnerMethod::ConjugateGradient,
            InnerMethod::LBFGS,
            InnerMethod::BFGS,
            InnerMethod::NelderMead,
        ];

        for method in methods {
            // Act
            let problem = PenalizedProblem::new(&adapter, &bx, 1e-3, &array![0.9, 0.1]).unwrap();
            let start_cost = problem.penalized_value(&array![0.9, 0.1]).unwrap();
            let outcome = solve_subproblem(problem, method, &opts(LineSearcher::Backtracking))
                .unwrap_or_else(|e| panic!("{method} failed: {e}"));

            // Assert
            assert!(outcome.best_cost < start_cost, "{method} did not decrease the cost");
            assert!(bx.is_strictly_interior(&outcome.best));
            assert!((outcome.best[0] - 0.3).abs() < 0.05, "{method}: {:?}", outcome.best);
            assert!((outcome.best[1] - 0.6).abs() < 0.05, "{method}: {:?}", outcome.best);
        }
    }

    #[test]
    // Purpose
    // -------
    // More–Thuente and Hager–Zhang inner solves stay strictly inside the box
    // even though the first unit step along −∇φ lands far outside it.
    //
    // Given
    // -----
    // - f = (x − 2)² + (y + 1)² on [0, 1]², μ = 1, anchor (0.5, 0.5).
    //
    // Expect
    // ------
    // - No error, an interior best point and a lower penalized cost.
    fn interpolating_line_searches_stay_inside_the_box() {
        // Arrange
        let f = Differentiable::with_gradient(
            |x: &Theta| (x[0] - 2.0).powi(2) + (x[1] + 1.0).powi(2),
            |x: &Theta| -> Grad { array![2.0 * (x[0] - 2.0), 2.0 * (x[1] + 1.0)] },
        );
        let adapter = ObjectiveAdapter::new(&f);
        let bx = BoxConstraints::new(array![0.0, 0.0], array![1.0, 1.0]).unwrap();
        let cases = [
            (InnerMethod::LBFGS, LineSearcher::MoreThuente),
            (InnerMethod::LBFGS, LineSearcher::HagerZhang),
            (InnerMethod::BFGS, LineSearcher::MoreThuente),
        ];

        for (method, searcher) in cases {
            // Act
            let problem = PenalizedProblem::new(&adapter, &bx, 1.0, &array![0.5, 0.5]).unwrap();
            let start_cost = problem.penalized_value(&array![0.5, 0.5]).unwrap();
            let outcome = solve_subproblem(problem, method, &opts(searcher))
                .unwrap_or_else(|e| panic!("{method} / {searcher:?} failed: {e}"));

            // Assert
            assert!(bx.is_strictly_interior(&outcome.best), "{method} / {searcher:?}");
            assert!(outcome.best_cost < start_cost, "{method} / {searcher:?}");
            assert!(outcome.best[0] > 0.5 && outcome.best[1] < 0.5, "{:?}", outcome.best);
        }
    }

    #[test]
    fn lbfgs_reports_solver_convergence() {
        let f = quadratic();
        let adapter = ObjectiveAdapter::new(&f);
        let bx = BoxConstraints::new(array![0.0, 0.0], array![1.0, 1.0]).unwrap();
        let problem = PenalizedProblem::new(&adapter, &bx, 1e-3, &array![0.5, 0.5]).unwrap();

        let outcome =
            solve_subproblem(problem, InnerMethod::LBFGS, &opts(LineSearcher::Backtracking))
                .unwrap();

        assert!(outcome.converged);
        assert!(outcome.iterations < 200);
        assert!(outcome.fn_evals.values().any(|&c| c > 0));
    }

    #[test]
    fn newton_is_rejected() {
        let f = quadratic();
        let adapter = ObjectiveAdapter::new(&f);
        let bx = BoxConstraints::new(array![0.0, 0.0], array![1.0, 1.0]).unwrap();
        let problem = PenalizedProblem::new(&adapter, &bx, 1.0, &array![0.5, 0.5]).unwrap();

        let err = solve_subproblem(problem, InnerMethod::Newton, &InnerOptions::default())
            .unwrap_err();

        assert!(matches!(err, OptError::IncompatibleInnerMethod { .. }));
    }
}
