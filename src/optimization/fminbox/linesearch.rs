//! fminbox::linesearch — keep interpolating line searches inside the box.
//!
//! Purpose
//! -------
//! More–Thuente and Hager–Zhang request `φ_μ` *and* `∇φ_μ` at their trial
//! steps, and `∇φ_μ` does not exist outside the box. [`InteriorLineSearch`]
//! wraps either search and, before every run, restricts its step interval to
//! the part of the search ray that stays strictly interior.
//!
//! Key behaviors
//! -------------
//! - The far end of the interval is a fraction of the distance to the
//!   nearest bound along the search direction ([`BOUNDARY_FRACTIONS`]).
//!   With no finite bound ahead the wrapped search runs unchanged.
//! - Hager–Zhang also needs `φ'_μ ≥ 0` at the far end of its interval; the
//!   far end is moved towards the bound until the slope turns. The barrier
//!   term makes the slope positive before the wall.
//! - A direction that is not a descent direction yields a zero step instead
//!   of an error, so the outer solver sees no progress and stops on its own
//!   cost tolerance.
//!
//! Invariants & assumptions
//! ------------------------
//! - Works on reduced coordinates: `lower` / `upper` are the reduced bounds
//!   of the subproblem the wrapper was built for.
//! - Search direction and initial step length are forwarded to the wrapped
//!   search unchanged.
use crate::optimization::types::{Grad, HagerZhangLS, MoreThuenteLS, Theta};
use argmin::{
    core::{
        Error, Gradient, IterState, KV, Problem, Solver, State, TerminationReason,
        TerminationStatus,
    },
    solver::linesearch::LineSearch,
};

/// Fractions of the distance to the nearest bound tried, in order, as the
/// largest admissible step.
pub const BOUNDARY_FRACTIONS: [f64; 4] = [0.99, 0.9999, 0.999_999, 0.999_999_99];

type LineState = IterState<Theta, Grad, (), (), (), f64>;

/// A line search whose step interval can be narrowed for a single run.
pub trait StepInterval: Sized {
    /// Whether the far end of the interval must have a non-negative slope.
    const NEEDS_OPPOSITE_SLOPE: bool;

    /// Copy of `self` searching steps in `(0, max_step]`.
    fn within(&self, max_step: f64, initial_step: f64) -> Result<Self, Error>;
}

impl StepInterval for MoreThuenteLS {
    const NEEDS_OPPOSITE_SLOPE: bool = false;

    fn within(&self, max_step: f64, initial_step: f64) -> Result<Self, Error> {
        let min_step = f64::EPSILON.sqrt().min(0.5 * max_step);
        let mut ls = self.clone().with_bounds(min_step, max_step)?;
        ls.initial_step_length(initial_step.min(max_step))?;
        Ok(ls)
    }
}

impl StepInterval for HagerZhangLS {
    const NEEDS_OPPOSITE_SLOPE: bool = true;

    fn within(&self, max_step: f64, initial_step: f64) -> Result<Self, Error> {
        let min_step = f64::EPSILON.min(0.25 * max_step);
        let mut ls = self.clone().with_bounds(min_step, max_step)?;
        ls.initial_step_length(initial_step.min(0.5 * max_step))?;
        Ok(ls)
    }
}

/// Largest `t` such that `x + t·d` is still inside the closed box; `+∞` when
/// no finite bound lies ahead.
pub fn distance_to_boundary(x: &Theta, direction: &Grad, lower: &Theta, upper: &Theta) -> f64 {
    let mut t = f64::INFINITY;
    for i in 0..x.len() {
        let d = direction[i];
        if d > 0.0 {
            t = t.min((upper[i] - x[i]) / d);
        } else if d < 0.0 {
            t = t.min((lower[i] - x[i]) / d);
        }
    }
    t
}

/// Line search `L` restricted to the interior of a box.
#[derive(Debug, Clone)]
pub struct InteriorLineSearch<L> {
    inner: L,
    lower: Theta,
    upper: Theta,
    direction: Option<Grad>,
    initial_step: f64,
}

impl<L> InteriorLineSearch<L> {
    pub fn new(inner: L, lower: Theta, upper: Theta) -> Self {
        Self { inner, lower, upper, direction: None, initial_step: 1.0 }
    }

    fn is_interior(&self, z: &Theta) -> bool {
        z.iter().zip(&self.lower).zip(&self.upper).all(|((v, l), u)| l < v && v < u)
    }
}

impl<L: StepInterval> InteriorLineSearch<L> {
    /// Far end of the step interval for a boundary `distance` away.
    fn interval_end<O>(
        &self, problem: &mut Problem<O>, x: &Theta, direction: &Grad, distance: f64,
    ) -> Result<f64, Error>
    where
        O: Gradient<Param = Theta, Gradient = Grad>,
    {
        let mut end = BOUNDARY_FRACTIONS[0] * distance;
        if !L::NEEDS_OPPOSITE_SLOPE {
            return Ok(end);
        }
        for fraction in BOUNDARY_FRACTIONS {
            let step = fraction * distance;
            let trial = x + &(direction * step);
            if !self.is_interior(&trial) {
                break;
            }
            end = step;
            if problem.gradient(&trial)?.dot(direction) >= 0.0 {
                break;
            }
        }
        Ok(end)
    }
}

impl<L: LineSearch<Grad, f64>> LineSearch<Grad, f64> for InteriorLineSearch<L> {
    fn search_direction(&mut self, direction: Grad) {
        self.direction = Some(direction.clone());
        self.inner.search_direction(direction);
    }

    fn initial_step_length(&mut self, alpha: f64) -> Result<(), Error> {
        self.inner.initial_step_length(alpha)?;
        self.initial_step = alpha;
        Ok(())
    }
}

impl<O, L> Solver<O, LineState> for InteriorLineSearch<L>
where
    O: Gradient<Param = Theta, Gradient = Grad>,
    L: Solver<O, LineState> + StepInterval,
{
    const NAME: &'static str = "Interior line search";

    fn init(
        &mut self, problem: &mut Problem<O>, state: LineState,
    ) -> Result<(LineState, Option<KV>), Error> {
        let (Some(x), Some(direction)) = (state.get_param().cloned(), self.direction.clone())
        else {
            return self.inner.init(problem, state);
        };

        let slope = state.get_gradient().map(|g| g.dot(&direction));
        if let Some(slope) = slope {
            if slope.is_nan() || slope >= 0.0 {
                log::trace!("no descent along the search direction (slope {slope:.3e})");
                let reason = TerminationReason::SolverExit("no descent direction".to_string());
                return Ok((state.terminate_with(reason), None));
            }
        }

        let distance = distance_to_boundary(&x, &direction, &self.lower, &self.upper);
        if distance.is_finite() && distance > 0.0 {
            let max_step = self.interval_end(problem, &x, &direction, distance)?;
            log::trace!("line search step capped at {max_step:.3e} (bound at {distance:.3e})");
            self.inner = self.inner.within(max_step, self.initial_step)?;
        }
        self.inner.init(problem, state)
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, state: LineState,
    ) -> Result<(LineState, Option<KV>), Error> {
        self.inner.next_iter(problem, state)
    }

    fn terminate(&mut self, state: &LineState) -> TerminationStatus {
        self.inner.terminate(state)
    }
}
