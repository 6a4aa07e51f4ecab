//! fminbox::controller — the outer barrier loop.
//!
//! Purpose
//! -------
//! Drive the sequence of barrier subproblems: choose μ₀, solve `φ_μ` from
//! the current iterate with the inner method, accept the candidate, test the
//! outer convergence criteria and shrink μ.
//!
//! Key behaviors
//! -------------
//! - States `Running(μ, x, iter)` → `Converged | MaxIterationsReached |
//!   InfeasibleStep | Stalled`, reported as [`OuterStatus`].
//! - Convergence after each step if
//!   `‖x − clamp(x − ∇f(x), l, u)‖∞ ≤ g_abstol` holds, or if
//!   `|f(x) − f(x_prev)| ≤ f_reltol · |f(x)|` or `‖x − x_prev‖∞ ≤ x_abstol`
//!   holds for a strictly positive `f_reltol` / `x_abstol`. A zero
//!   tolerance switches its criterion off.
//! - A candidate equal to the previous iterate stops the loop with
//!   `Stalled` unless the projected-gradient criterion holds.
//! - A candidate that is not strictly interior stops the loop with
//!   `InfeasibleStep`; the previous iterate is kept and a warning is logged.
//!   The attempted solve still counts towards `inner_iterations`.
//! - Reaching the cap is a normal terminal state, never an error.
//! - With no free coordinate the loop does nothing and reports convergence
//!   after zero iterations.
//!
//! Invariants & assumptions
//! ------------------------
//! - `x` is strictly interior on every free coordinate at the top of each
//!   iteration; fixed coordinates never move.
//! - μ is strictly decreasing across outer iterations.
use crate::optimization::{
    errors::OptResult,
    fminbox::{
        barrier::{PenalizedProblem, barrier_gradient},
        bounds::BoxConstraints,
        methods::InnerMethod,
        options::{BarrierSchedule, DEFAULT_INITIAL_MU, FminboxOptions, InitialMu},
        outcome::{OuterIteration, OuterStatus},
        run::solve_subproblem,
    },
    objective::{adapter::ObjectiveAdapter, traits::Objective},
    types::Theta,
};

/// Final state of the outer loop, before result assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerRun {
    pub x: Theta,
    pub status: OuterStatus,
    pub iterations: usize,
    pub inner_iterations: u64,
    pub initial_mu: Option<f64>,
    pub final_mu: Option<f64>,
    pub trace: Vec<OuterIteration>,
}

/// initial_mu — resolve μ₀ from the barrier schedule at `x`.
///
/// `GradientRatio(factor)` uses `factor · Σ|∇f(x)| / Σ|∇B(x)|` over the free
/// coordinates and falls back to [`DEFAULT_INITIAL_MU`] when that ratio is
/// not finite and strictly positive.
///
/// # Errors
/// Errors raised while evaluating `∇f(x)` or `∇B(x)`.
pub fn initial_mu<O>(
    adapter: &ObjectiveAdapter<'_, O>, bounds: &BoxConstraints, x: &Theta,
    schedule: &BarrierSchedule,
) -> OptResult<f64>
where
    O: Objective + ?Sized,
{
    match schedule.initial {
        InitialMu::Fixed(mu) => Ok(mu),
        InitialMu::GradientRatio(factor) => {
            let g = bounds.restrict(&adapter.gradient(x)?);
            let gb = bounds.restrict(&barrier_gradient(bounds, x)?);
            let ratio = factor * g.mapv(f64::abs).sum() / gb.mapv(f64::abs).sum();
            if ratio.is_finite() && ratio > 0.0 {
                Ok(ratio)
            } else {
                log::debug!("gradient-ratio μ₀ = {ratio} unusable, falling back to {DEFAULT_INITIAL_MU}");
                Ok(DEFAULT_INITIAL_MU)
            }
        }
    }
}

/// run_outer_loop — solve barrier subproblems until convergence or the cap.
///
/// Parameters
/// ----------
/// - `adapter`: counting view of the objective.
/// - `bounds`: validated box.
/// - `x0`: projected, strictly interior starting point.
/// - `method`: inner optimizer (restarted from scratch every iteration).
/// - `opts`: full configuration.
///
/// Errors
/// ------
/// Inner-solver and objective errors propagate unchanged.
pub fn run_outer_loop<O>(
    adapter: &ObjectiveAdapter<'_, O>, bounds: &BoxConstraints, x0: Theta, method: InnerMethod,
    opts: &FminboxOptions,
) -> OptResult<ControllerRun>
where
    O: Objective + ?Sized,
{
    if bounds.free_indices().is_empty() {
        return Ok(ControllerRun {
            x: x0,
            status: OuterStatus::Converged,
            iterations: 0,
            inner_iterations: 0,
            initial_mu: None,
            final_mu: None,
            trace: Vec::new(),
        });
    }

    let tols = &opts.outer_tols;
    let mu0 = initial_mu(adapter, bounds, &x0, &opts.barrier)?;
    let mut mu = mu0;
    let mut x = x0;
    let mut f_prev = adapter.value(&x)?;
    let mut status = OuterStatus::MaxIterationsReached;
    let mut iterations = 0;
    let mut inner_iterations = 0;
    let mut first_mu = None;
    let mut final_mu = None;
    let mut trace = Vec::with_capacity(opts.outer_iterations);

    while iterations < opts.outer_iterations {
        let problem = PenalizedProblem::new(adapter, bounds, mu, &x)?;
        let inner = solve_subproblem(problem, method, &opts.inner)?;
        first_mu = Some(mu0);
        inner_iterations += inner.iterations;

        let candidate = bounds.embed(&x, &inner.best);
        if let Some(index) = bounds.first_non_interior(&candidate) {
            log::warn!(
                "Fminbox inner solve left the interior at index {index} (value {}); keeping the previous iterate",
                candidate[index]
            );
            status = OuterStatus::InfeasibleStep;
            break;
        }

        iterations += 1;
        final_mu = Some(mu);

        let f_new = adapter.value(&candidate)?;
        let g = adapter.gradient(&candidate)?;
        let pg_norm = bounds.projected_gradient_norm(&candidate, &g);
        let dx = (&candidate - &x).iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));
        let df = (f_new - f_prev).abs();

        log::debug!(
            "Fminbox iter {iterations}: mu = {mu:.3e}, f = {f_new:.10e}, |pg| = {pg_norm:.3e}, inner iters = {}",
            inner.iterations
        );
        trace.push(OuterIteration {
            iteration: iterations,
            mu,
            value: f_new,
            projected_grad_norm: pg_norm,
            inner_iterations: inner.iterations,
            inner_converged: inner.converged,
        });

        x = candidate;
        f_prev = f_new;
        if pg_norm <= tols.g_abstol
            || (tols.f_reltol > 0.0 && df <= tols.f_reltol * f_new.abs())
            || (tols.x_abstol > 0.0 && dx <= tols.x_abstol)
        {
            status = OuterStatus::Converged;
            break;
        }
        if dx == 0.0 {
            log::warn!(
                "Fminbox inner solve made no progress at mu = {mu:.3e} (|pg| = {pg_norm:.3e}); stopping"
            );
            status = OuterStatus::Stalled;
            break;
        }
        mu *= opts.barrier.decay;
    }

    Ok(ControllerRun {
        x,
        status,
        iterations,
        inner_iterations,
        initial_mu: first_mu,
        final_mu,
        trace,
    })
}
