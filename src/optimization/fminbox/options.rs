//! fminbox::options — validated configuration for outer and inner loops.
//!
//! Purpose
//! -------
//! Collect every tunable of an Fminbox run into one immutable snapshot
//! ([`FminboxOptions`]) that the controller passes by reference down to the
//! inner-solver builders.
//!
//! Key behaviors
//! -------------
//! - Every struct has a validating `new` returning `OptResult<Self>` and a
//!   `Default` built from the constants in this module.
//! - [`LineSearcher`] parses case-insensitive names via `FromStr`.
//!
//! Conventions
//! -----------
//! - Inner tolerances ([`Tolerances`]) must be strictly positive when given.
//! - Outer tolerances ([`OuterTolerances`]) may be zero, which switches the
//!   corresponding criterion off.
use crate::optimization::{
    errors::{OptError, OptResult},
    types::DEFAULT_LBFGS_MEM,
    validation::{verify_outer_tol, verify_tol_cost, verify_tol_grad},
};
use std::str::FromStr;

/// Default number of outer (barrier) iterations.
pub const DEFAULT_OUTER_ITERATIONS: usize = 20;

/// Default initial barrier coefficient μ₀.
pub const DEFAULT_INITIAL_MU: f64 = 1.0;

/// Default multiplicative barrier decay (`μ ← μ · decay`).
pub const DEFAULT_BARRIER_DECAY: f64 = 0.1;

/// Default projected-gradient tolerance of the outer loop.
pub const DEFAULT_G_ABSTOL: f64 = 1e-8;

/// Default gradient tolerance of each inner solve. Kept below
/// [`DEFAULT_G_ABSTOL`] so an inner solve does not stop at a point the outer
/// test still rejects.
pub const DEFAULT_INNER_TOL_GRAD: f64 = 1e-10;

/// Default iteration cap of each inner solve.
pub const DEFAULT_INNER_MAX_ITER: usize = 1000;

/// Choice of line search used inside gradient-based inner solvers.
///
/// Variants:
/// - `Backtracking`: Armijo backtracking (default). Shrinks the step until
///   the penalized cost decreases, so `+∞` outside the box is handled.
/// - `MoreThuente`: More–Thuente line search.
/// - `HagerZhang`: Hager–Zhang line search.
///
/// The two interpolating searches request gradients at trial points, so
/// their step interval is cut off before the nearest bound on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineSearcher {
    #[default]
    Backtracking,
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    /// Parse a line-search choice from a string (case-insensitive).
    ///
    /// Accepts `"Backtracking"`, `"MoreThuente"` and `"HagerZhang"` in any
    /// case. Any other value returns `OptError::InvalidLineSearch`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "backtracking" => Ok(LineSearcher::Backtracking),
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'Backtracking', 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Numerical tolerances and iteration limits for each inner solve.
///
/// - `tol_grad`: terminate when the gradient norm falls below this threshold
///   (L-BFGS, BFGS).
/// - `tol_cost`: terminate when the change in cost falls below this threshold
///   (L-BFGS, BFGS); standard-deviation tolerance for Nelder–Mead.
/// - `max_iter`: hard cap on the number of inner iterations.
///
/// Any field can be `None` but **at least one** of the three must be provided
/// (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - At least one of `tol_grad`, `tol_cost`, or `max_iter` must be `Some`.
    /// - If provided, tolerances must be **finite and strictly positive**.
    /// - If provided, `max_iter` must be `> 0`.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            tol_grad: Some(DEFAULT_INNER_TOL_GRAD),
            tol_cost: None,
            max_iter: Some(DEFAULT_INNER_MAX_ITER),
        }
    }
}

/// Configuration handed to every inner solve.
///
/// Fields:
/// - `tols: Tolerances`: numerical tolerances and iteration limits.
/// - `line_searcher: LineSearcher`: line search for gradient-based methods.
/// - `lbfgs_mem: usize`: L-BFGS history size (default
///   [`DEFAULT_LBFGS_MEM`]).
/// - `verbose: bool`: if `true`, attaches an observer (behind the `obs_slog`
///   feature) and prints inner progress.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub lbfgs_mem: usize,
    pub verbose: bool,
}

impl InnerOptions {
    /// Create validated inner options.
    ///
    /// # Errors
    /// - [`OptError::InvalidLBFGSMem`] if `lbfgs_mem == 0`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, lbfgs_mem: usize, verbose: bool,
    ) -> OptResult<Self> {
        if lbfgs_mem == 0 {
            return Err(OptError::InvalidLBFGSMem {
                mem: lbfgs_mem,
                reason: "L-BFGS memory must be greater than zero.",
            });
        }
        Ok(Self { tols, line_searcher, lbfgs_mem, verbose })
    }
}

impl Default for InnerOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::default(),
            line_searcher: LineSearcher::default(),
            lbfgs_mem: DEFAULT_LBFGS_MEM,
            verbose: false,
        }
    }
}

/// How the initial barrier coefficient μ₀ is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InitialMu {
    /// Use the given μ₀ directly.
    Fixed(f64),
    /// `factor · Σ|∇f(x₀)| / Σ|∇B(x₀)|`, falling back to
    /// [`DEFAULT_INITIAL_MU`] when the ratio is not finite and positive.
    GradientRatio(f64),
}

impl Default for InitialMu {
    fn default() -> Self {
        InitialMu::Fixed(DEFAULT_INITIAL_MU)
    }
}

/// Barrier schedule: initial coefficient and multiplicative decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrierSchedule {
    pub initial: InitialMu,
    pub decay: f64,
}

impl BarrierSchedule {
    /// Construct a validated schedule.
    ///
    /// # Errors
    /// - [`OptError::InvalidBarrierCoefficient`] if a fixed μ₀ or the ratio
    ///   factor is not finite and strictly positive.
    /// - [`OptError::InvalidBarrierDecay`] unless `0 < decay < 1`.
    pub fn new(initial: InitialMu, decay: f64) -> OptResult<Self> {
        let mu = match initial {
            InitialMu::Fixed(mu) | InitialMu::GradientRatio(mu) => mu,
        };
        if !mu.is_finite() || mu <= 0.0 {
            return Err(OptError::InvalidBarrierCoefficient {
                mu,
                reason: "Barrier coefficient must be finite and strictly positive.",
            });
        }
        if !decay.is_finite() || decay <= 0.0 || decay >= 1.0 {
            return Err(OptError::InvalidBarrierDecay {
                decay,
                reason: "Decay factor must lie strictly between 0 and 1.",
            });
        }
        Ok(Self { initial, decay })
    }
}

impl Default for BarrierSchedule {
    fn default() -> Self {
        Self { initial: InitialMu::default(), decay: DEFAULT_BARRIER_DECAY }
    }
}

/// Outer-loop convergence criteria. Any one satisfied stops the loop.
///
/// - `g_abstol`: `‖x − clamp(x − ∇f(x), l, u)‖∞ ≤ g_abstol`.
/// - `f_reltol`: `|f(x) − f(x_prev)| ≤ f_reltol · |f(x)|`; `0` switches it off.
/// - `x_abstol`: `‖x − x_prev‖∞ ≤ x_abstol`; `0` switches it off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OuterTolerances {
    pub g_abstol: f64,
    pub f_reltol: f64,
    pub x_abstol: f64,
}

impl OuterTolerances {
    /// # Errors
    /// [`OptError::InvalidOuterTolerance`] for negative or non-finite values.
    pub fn new(g_abstol: f64, f_reltol: f64, x_abstol: f64) -> OptResult<Self> {
        verify_outer_tol("g_abstol", g_abstol)?;
        verify_outer_tol("f_reltol", f_reltol)?;
        verify_outer_tol("x_abstol", x_abstol)?;
        Ok(Self { g_abstol, f_reltol, x_abstol })
    }
}

impl Default for OuterTolerances {
    fn default() -> Self {
        Self { g_abstol: DEFAULT_G_ABSTOL, f_reltol: 0.0, x_abstol: 0.0 }
    }
}

/// Complete configuration of one Fminbox call.
///
/// Default:
/// - `outer_iterations`: 20
/// - `barrier`: μ₀ = 1 (fixed), decay 0.1
/// - `outer_tols`: `g_abstol = 1e-8`, `f_reltol = 0`, `x_abstol = 0`
/// - `inner`: `tol_grad = 1e-10`, `max_iter = 1000`, backtracking line
///   search, L-BFGS memory 10
#[derive(Debug, Clone, PartialEq)]
pub struct FminboxOptions {
    pub outer_iterations: usize,
    pub barrier: BarrierSchedule,
    pub outer_tols: OuterTolerances,
    pub inner: InnerOptions,
}

impl FminboxOptions {
    /// # Errors
    /// [`OptError::InvalidOuterIterations`] if `outer_iterations == 0`.
    pub fn new(
        outer_iterations: usize, barrier: BarrierSchedule, outer_tols: OuterTolerances,
        inner: InnerOptions,
    ) -> OptResult<Self> {
        if outer_iterations == 0 {
            return Err(OptError::InvalidOuterIterations {
                outer_iterations,
                reason: "At least one outer iteration is required.",
            });
        }
        Ok(Self { outer_iterations, barrier, outer_tols, inner })
    }
}

impl Default for FminboxOptions {
    fn default() -> Self {
        Self {
            outer_iterations: DEFAULT_OUTER_ITERATIONS,
            barrier: BarrierSchedule::default(),
            outer_tols: OuterTolerances::default(),
            inner: InnerOptions::default(),
        }
    }
}
