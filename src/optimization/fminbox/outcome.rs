//! fminbox::outcome — the result record returned by [`fminbox`](super::api::fminbox).
use crate::optimization::{
    errors::OptResult,
    fminbox::{bounds::BoundaryAdjustment, controller::ControllerRun, methods::InnerMethod},
    objective::{adapter::ObjectiveAdapter, traits::Objective},
    types::Theta,
    validation::{validate_theta_hat, validate_value},
};
use std::fmt;

/// Why the outer loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OuterStatus {
    /// One of the outer convergence criteria was met.
    Converged,
    /// The outer iteration cap was reached. Not an error.
    MaxIterationsReached,
    /// An inner solve returned a point that is not strictly interior; the
    /// previous iterate was kept.
    InfeasibleStep,
    /// An inner solve returned its starting point unchanged while the
    /// projected gradient was still above `g_abstol`.
    Stalled,
}

impl OuterStatus {
    pub fn is_converged(self) -> bool {
        matches!(self, OuterStatus::Converged)
    }
}

/// One record per completed outer iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct OuterIteration {
    pub iteration: usize,
    /// Barrier coefficient used for this iteration's subproblem.
    pub mu: f64,
    /// `f` (without barrier) at the accepted point.
    pub value: f64,
    pub projected_grad_norm: f64,
    pub inner_iterations: u64,
    pub inner_converged: bool,
}

/// Canonical result of an Fminbox run.
///
/// - `minimizer` / `minimum`: best point and `f(minimizer)`, evaluated once
///   more after the loop so the two always agree exactly.
/// - `converged`: `true` iff `status == OuterStatus::Converged`.
/// - `iterations`: completed outer iterations (equals the cap when capped).
/// - `inner_iterations`: sum of argmin iterations over all inner solves.
/// - `f_calls` / `g_calls`: value and gradient requests made on the
///   objective through the adapter.
/// - `initial_mu`: barrier coefficient of the first subproblem (`None` if
///   no subproblem was attempted).
/// - `final_mu`: barrier coefficient of the last accepted step (`None` if no
///   step was accepted).
/// - `boundary_adjustment`: initial-point projection diagnostic, if any.
/// - `trace`: one [`OuterIteration`] per outer iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct FminboxOutcome {
    pub minimizer: Theta,
    pub minimum: f64,
    pub converged: bool,
    pub status: OuterStatus,
    pub iterations: usize,
    pub inner_iterations: u64,
    pub f_calls: usize,
    pub g_calls: usize,
    pub method: InnerMethod,
    pub initial_mu: Option<f64>,
    pub final_mu: Option<f64>,
    pub boundary_adjustment: Option<BoundaryAdjustment>,
    pub trace: Vec<OuterIteration>,
}

impl FminboxOutcome {
    /// Build a validated [`FminboxOutcome`] from the controller's final state.
    ///
    /// Performs:
    /// - `minimizer` check via `validate_theta_hat` (all finite).
    /// - One evaluation of `f` at the minimizer, checked with
    ///   `validate_value`.
    ///
    /// # Errors
    /// - Propagates validation errors and errors from the final evaluation.
    pub fn new<O>(
        adapter: &ObjectiveAdapter<'_, O>, method: InnerMethod, run: ControllerRun,
        boundary_adjustment: Option<BoundaryAdjustment>,
    ) -> OptResult<Self>
    where
        O: Objective + ?Sized,
    {
        let minimizer = validate_theta_hat(Some(run.x))?;
        let minimum = adapter.value(&minimizer)?;
        validate_value(minimum)?;
        Ok(Self {
            minimizer,
            minimum,
            converged: run.status.is_converged(),
            status: run.status,
            iterations: run.iterations,
            inner_iterations: run.inner_iterations,
            f_calls: adapter.f_calls(),
            g_calls: adapter.g_calls(),
            method,
            initial_mu: run.initial_mu,
            final_mu: run.final_mu,
            boundary_adjustment,
            trace: run.trace,
        })
    }

    /// `"Fminbox with <inner-method-name>"`.
    pub fn summary(&self) -> String {
        format!("Fminbox with {}", self.method.name())
    }

    /// 1-based indices moved off the boundary before the first iteration.
    pub fn boundary_indices(&self) -> &[usize] {
        match &self.boundary_adjustment {
            Some(adj) => &adj.indices,
            None => &[],
        }
    }
}

impl fmt::Display for FminboxOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Results of Optimization Algorithm")?;
        writeln!(f, " * Algorithm: {}", self.summary())?;
        writeln!(f, " * Minimizer: {}", self.minimizer)?;
        writeln!(f, " * Minimum: {:.6e}", self.minimum)?;
        writeln!(f, " * Converged: {} ({:?})", self.converged, self.status)?;
        writeln!(f, " * Outer iterations: {}", self.iterations)?;
        writeln!(f, " * Inner iterations: {}", self.inner_iterations)?;
        writeln!(f, " * f(x) calls: {}", self.f_calls)?;
        write!(f, " * ∇f(x) calls: {}", self.g_calls)
    }
}
