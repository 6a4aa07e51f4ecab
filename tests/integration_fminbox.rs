//! Integration tests for the Fminbox optimizer.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path: box validation, start projection, the
//!   barrier outer loop over each accepted argmin inner method, and result
//!   assembly.
//! - Check the returned minimizers against the KKT certifier rather than
//!   against hand-tuned iterates.
//!
//! Coverage
//! --------
//! - `optimization::fminbox::fminbox` with GD, CG, L-BFGS, BFGS and
//!   Nelder–Mead, and with the More–Thuente and Hager–Zhang line searches.
//! - Analytic, finite-difference and forward-mode gradients.
//! - The outer iteration cap, precondition failures and the √x example with
//!   its singular gradient at the lower bound.
//!
//! Exclusions
//! ----------
//! - Boundary diagnostics and their log output (see
//!   `boundary_diagnostics.rs` and `boundary_warning_log.rs`).
//! - Python bindings.
use approx::assert_relative_eq;
use ndarray::{Array1, array};
use rust_fminbox::optimization::{
    errors::OptError,
    fminbox::{
        BarrierSchedule, BoxConstraints, CertifyTolerances, FminboxOptions, InitialMu,
        InnerMethod, InnerOptions, LineSearcher, OuterStatus, OuterTolerances, Tolerances,
        certify, fminbox, options::DEFAULT_G_ABSTOL,
    },
    objective::{Differentiable, Scalar, ScalarObjective},
};
use std::cell::Cell;

/// f(x) = (x₁ − 2)² + (x₂ + 1)² + (x₃ − 0.5)².
///
/// On [0, 1]³ the constrained minimizer is (1, 0, 0.5): x₁ at its upper
/// bound, x₂ at its lower bound, x₃ interior.
fn shifted_quadratic(x: &Array1<f64>) -> f64 {
    (x[0] - 2.0).powi(2) + (x[1] + 1.0).powi(2) + (x[2] - 0.5).powi(2)
}

fn shifted_quadratic_grad(x: &Array1<f64>) -> Array1<f64> {
    array![2.0 * (x[0] - 2.0), 2.0 * (x[1] + 1.0), 2.0 * (x[2] - 0.5)]
}

fn unit_cube() -> (Array1<f64>, Array1<f64>) {
    (Array1::zeros(3), Array1::ones(3))
}

struct Rosenbrock;

impl ScalarObjective for Rosenbrock {
    fn eval<S: Scalar>(&self, x: &[S]) -> S {
        let one = S::from_f64(1.0);
        let hundred = S::from_f64(100.0);
        (one - x[0]).powi(2) + hundred * (x[1] - x[0].powi(2)).powi(2)
    }
}

#[test]
// Purpose
// -------
// Every gradient-based inner method returns a certified minimizer of the
// same box-constrained quadratic.
//
// Given
// -----
// - The shifted quadratic on [0, 1]³ from x0 = (0.5, 0.5, 0.3).
//
// Expect
// ------
// - The result lies in the box, is close to (1, 0, 0.5) and certifies as
//   stationary (ActiveUpper, ActiveLower, InteriorStationary).
fn gradient_methods_reach_certified_minimizer() {
    // Arrange
    let f = Differentiable::with_gradient(shifted_quadratic, shifted_quadratic_grad);
    let (lower, upper) = unit_cube();
    let bounds = BoxConstraints::new(lower.clone(), upper.clone()).unwrap();
    let tols = CertifyTolerances::new(1e-3, 1e-3).unwrap();
    let methods = [
        InnerMethod::GradientDescent,
        InnerMethod::ConjugateGradient,
        InnerMethod::LBFGS,
        InnerMethod::BFGS,
    ];

    for method in methods {
        // Act
        let out = fminbox(
            &f,
            lower.clone(),
            upper.clone(),
            array![0.5, 0.5, 0.3],
            method,
            &FminboxOptions::default(),
        )
        .unwrap_or_else(|e| panic!("{method} failed: {e}"));

        // Assert
        for (i, &xi) in out.minimizer.iter().enumerate() {
            assert!((0.0..=1.0).contains(&xi), "{method}: x[{i}] = {xi}");
        }
        assert!((out.minimizer[0] - 1.0).abs() < 1e-3, "{method}: {}", out.minimizer);
        assert!(out.minimizer[1].abs() < 1e-3, "{method}: {}", out.minimizer);
        assert!((out.minimizer[2] - 0.5).abs() < 1e-4, "{method}: {}", out.minimizer);

        let cert = certify(&f, &bounds, &out.minimizer, &tols).unwrap();
        assert!(cert.is_stationary(), "{method}: violations at {:?}", cert.violations());
        assert_eq!(out.summary(), format!("Fminbox with {}", method.name()));
    }
}

#[test]
fn nelder_mead_stays_in_box_and_approaches_minimizer() {
    let f = Differentiable::from_fn(shifted_quadratic);
    let (lower, upper) = unit_cube();

    let out = fminbox(
        &f,
        lower,
        upper,
        array![0.5, 0.5, 0.3],
        InnerMethod::NelderMead,
        &FminboxOptions::default(),
    )
    .unwrap();

    assert!(out.minimizer.iter().all(|&xi| xi > 0.0 && xi < 1.0));
    assert!((out.minimizer[0] - 1.0).abs() < 1e-2, "{}", out.minimizer);
    assert!(out.minimizer[1].abs() < 1e-2, "{}", out.minimizer);
    assert!((out.minimizer[2] - 0.5).abs() < 1e-2, "{}", out.minimizer);
    assert_eq!(out.summary(), "Fminbox with Nelder-Mead");
}

#[test]
// Purpose
// -------
// The interpolating line searches reach the same certified minimizer as the
// default backtracking search and are reported as converged only when the
// projected gradient is small.
//
// Given
// -----
// - f(x) = (x₁ − 2)² + (x₂ + 1)² on [0, 1]² from x0 = (0.5, 0.5).
// - L-BFGS and BFGS with More–Thuente, L-BFGS with Hager–Zhang.
//
// Expect
// ------
// - Every run returns `Ok` with a minimizer near (1, 0) that certifies as
//   stationary.
// - L-BFGS with More–Thuente reports `Converged`; whenever a run reports
//   `converged`, its last projected gradient norm is within `g_abstol`.
fn interpolating_line_searches_reach_certified_minimizer() {
    // Arrange
    let f = Differentiable::with_gradient(
        |x: &Array1<f64>| (x[0] - 2.0).powi(2) + (x[1] + 1.0).powi(2),
        |x: &Array1<f64>| array![2.0 * (x[0] - 2.0), 2.0 * (x[1] + 1.0)],
    );
    let (lower, upper) = (Array1::zeros(2), Array1::ones(2));
    let bounds = BoxConstraints::new(lower.clone(), upper.clone()).unwrap();
    let tols = CertifyTolerances::new(1e-3, 1e-3).unwrap();
    let cases = [
        (InnerMethod::LBFGS, LineSearcher::MoreThuente),
        (InnerMethod::BFGS, LineSearcher::MoreThuente),
        (InnerMethod::LBFGS, LineSearcher::HagerZhang),
    ];

    for (method, searcher) in cases {
        let opts = FminboxOptions::new(
            30,
            BarrierSchedule::default(),
            OuterTolerances::default(),
            InnerOptions::new(Tolerances::default(), searcher, 10, false).unwrap(),
        )
        .unwrap();

        // Act
        let out = fminbox(&f, lower.clone(), upper.clone(), array![0.5, 0.5], method, &opts)
            .unwrap_or_else(|e| panic!("{method}/{searcher:?} failed: {e}"));

        // Assert
        assert!((out.minimizer[0] - 1.0).abs() < 1e-3, "{method}/{searcher:?}: {}", out.minimizer);
        assert!(out.minimizer[1].abs() < 1e-3, "{method}/{searcher:?}: {}", out.minimizer);
        let cert = certify(&f, &bounds, &out.minimizer, &tols).unwrap();
        assert!(cert.is_stationary(), "{method}/{searcher:?}: {:?}", cert.violations());
        if out.converged {
            let last = out.trace.last().unwrap();
            assert!(last.projected_grad_norm <= DEFAULT_G_ABSTOL, "{method}/{searcher:?}");
        }
    }
}

#[test]
fn more_thuente_with_lbfgs_reports_converged() {
    let f = Differentiable::with_gradient(shifted_quadratic, shifted_quadratic_grad);
    let (lower, upper) = unit_cube();
    let opts = FminboxOptions::new(
        30,
        BarrierSchedule::default(),
        OuterTolerances::default(),
        InnerOptions::new(Tolerances::default(), LineSearcher::MoreThuente, 10, false).unwrap(),
    )
    .unwrap();

    let out = fminbox(&f, lower, upper, array![0.5, 0.5, 0.3], InnerMethod::LBFGS, &opts).unwrap();

    assert!(out.converged);
    assert_eq!(out.status, OuterStatus::Converged);
    assert!((out.minimizer[0] - 1.0).abs() < 1e-3, "{}", out.minimizer);
    assert!(out.minimizer[1].abs() < 1e-3, "{}", out.minimizer);
    assert!((out.minimizer[2] - 0.5).abs() < 1e-4, "{}", out.minimizer);
}

#[test]
fn finite_difference_gradients_match_analytic_run() {
    let analytic = Differentiable::with_gradient(shifted_quadratic, shifted_quadratic_grad);
    let numeric = Differentiable::from_fn(shifted_quadratic);
    let (lower, upper) = unit_cube();
    let opts = FminboxOptions::default();

    let a = fminbox(
        &analytic,
        lower.clone(),
        upper.clone(),
        array![0.5, 0.5, 0.3],
        InnerMethod::BFGS,
        &opts,
    )
    .unwrap();
    let n =
        fminbox(&numeric, lower, upper, array![0.5, 0.5, 0.3], InnerMethod::BFGS, &opts).unwrap();

    for i in 0..3 {
        assert!(
            (a.minimizer[i] - n.minimizer[i]).abs() < 1e-4,
            "{} vs {}",
            a.minimizer,
            n.minimizer
        );
    }
}

#[test]
// Purpose
// -------
// Forward-mode gradients drive the outer loop to the constrained Rosenbrock
// minimizer.
//
// Given
// -----
// - Rosenbrock on [−2, 0.5] × [−2, 2] from (−1.2, 1), L-BFGS.
//
// Expect
// ------
// - x* ≈ (0.5, 0.25) with f(x*) ≈ 0.25.
fn forward_mode_rosenbrock_hits_active_upper_bound() {
    // Arrange
    let f = Differentiable::forward(Rosenbrock);

    // Act
    let out = fminbox(
        &f,
        array![-2.0, -2.0],
        array![0.5, 2.0],
        array![-1.2, 1.0],
        InnerMethod::LBFGS,
        &FminboxOptions::default(),
    )
    .unwrap();

    // Assert
    assert_relative_eq!(out.minimizer[0], 0.5, epsilon = 1e-4);
    assert_relative_eq!(out.minimizer[1], 0.25, epsilon = 1e-3);
    assert_relative_eq!(out.minimum, 0.25, epsilon = 1e-4);
    assert!(out.minimizer[0] < 0.5);
}

#[test]
// Purpose
// -------
// f(x) = √x on [0, 10] is minimized at the lower bound, where ∇f is
// singular; the barrier keeps every evaluated point strictly positive.
//
// Given
// -----
// - x0 = 1.0, analytic gradient 1 / (2√x), L-BFGS.
//
// Expect
// ------
// - Terminates with 0 < x* < 1e-3.
// - `minimum` equals √(x*) exactly.
fn sqrt_objective_approaches_lower_bound() {
    // Arrange
    let f = Differentiable::with_gradient(
        |x: &Array1<f64>| x[0].sqrt(),
        |x: &Array1<f64>| array![0.5 / x[0].sqrt()],
    );

    // Act
    let out = fminbox(
        &f,
        array![0.0],
        array![10.0],
        array![1.0],
        InnerMethod::LBFGS,
        &FminboxOptions::default(),
    )
    .unwrap();

    // Assert
    assert!(out.minimizer[0] > 0.0 && out.minimizer[0] < 1e-3, "{}", out.minimizer);
    assert_eq!(out.minimum, out.minimizer[0].sqrt());
}

#[test]
// Purpose
// -------
// A small outer cap is a normal terminal state and the reported minimum is
// the objective at the reported minimizer.
//
// Given
// -----
// - The shifted quadratic with `outer_iterations = 2`.
//
// Expect
// ------
// - `iterations == 2`, `converged == false`, `minimum == f(minimizer)`.
fn outer_cap_reports_exact_iteration_count() {
    // Arrange
    let f = Differentiable::with_gradient(shifted_quadratic, shifted_quadratic_grad);
    let (lower, upper) = unit_cube();
    let opts = FminboxOptions::new(
        2,
        BarrierSchedule::default(),
        OuterTolerances::default(),
        InnerOptions::default(),
    )
    .unwrap();

    // Act
    let out = fminbox(&f, lower, upper, array![0.5, 0.5, 0.3], InnerMethod::LBFGS, &opts).unwrap();

    // Assert
    assert_eq!(out.iterations, 2);
    assert!(!out.converged);
    assert_eq!(out.status, OuterStatus::MaxIterationsReached);
    assert_eq!(out.minimum, shifted_quadratic(&out.minimizer));
    assert_eq!(out.trace.len(), 2);
    assert_eq!(out.final_mu, Some(0.1));
}

#[test]
fn gradient_ratio_schedule_still_converges() {
    let f = Differentiable::with_gradient(shifted_quadratic, shifted_quadratic_grad);
    let (lower, upper) = unit_cube();
    let opts = FminboxOptions::new(
        30,
        BarrierSchedule::new(InitialMu::GradientRatio(1e-3), 0.2).unwrap(),
        OuterTolerances::default(),
        InnerOptions::new(Tolerances::default(), Default::default(), 5, false).unwrap(),
    )
    .unwrap();

    let out = fminbox(&f, lower, upper, array![0.5, 0.5, 0.3], InnerMethod::LBFGS, &opts).unwrap();

    assert!((out.minimizer[0] - 1.0).abs() < 1e-3);
    assert!(out.minimizer[1].abs() < 1e-3);
    assert!(out.initial_mu.is_some());
}

#[test]
fn second_order_methods_are_rejected_before_any_evaluation() {
    let calls = Cell::new(0_usize);
    let f = Differentiable::from_fn(|x: &Array1<f64>| {
        calls.set(calls.get() + 1);
        shifted_quadratic(x)
    });
    let (lower, upper) = unit_cube();

    for method in [InnerMethod::Newton, InnerMethod::NewtonTrustRegion] {
        // Out-of-box start: method validation runs first.
        let err = fminbox(
            &f,
            lower.clone(),
            upper.clone(),
            array![5.0, 0.5, 0.5],
            method,
            &FminboxOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, OptError::IncompatibleInnerMethod { .. }), "{err}");
        assert!(err.is_precondition());
    }
    assert_eq!(calls.get(), 0);
}

#[test]
fn out_of_bounds_start_fails_before_any_evaluation() {
    let calls = Cell::new(0_usize);
    let f = Differentiable::from_fn(|x: &Array1<f64>| {
        calls.set(calls.get() + 1);
        shifted_quadratic(x)
    });
    let (lower, upper) = unit_cube();

    let err = fminbox(
        &f,
        lower,
        upper,
        array![0.5, -0.25, 0.5],
        InnerMethod::LBFGS,
        &FminboxOptions::default(),
    )
    .unwrap_err();

    match err {
        OptError::InitialPointOutOfBounds { index, value, lower, upper } => {
            assert_eq!(index, 1);
            assert_eq!(value, -0.25);
            assert_eq!((lower, upper), (0.0, 1.0));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(calls.get(), 0);
}

#[test]
fn fixed_coordinates_never_move() {
    let f = Differentiable::with_gradient(shifted_quadratic, shifted_quadratic_grad);

    let out = fminbox(
        &f,
        array![0.0, 0.25, 0.0],
        array![1.0, 0.25, 1.0],
        array![0.5, 0.25, 0.3],
        InnerMethod::LBFGS,
        &FminboxOptions::default(),
    )
    .unwrap();

    assert_eq!(out.minimizer[1], 0.25);
    assert!((out.minimizer[0] - 1.0).abs() < 1e-3);
    assert!((out.minimizer[2] - 0.5).abs() < 1e-4);
}

#[test]
fn unbounded_directions_behave_like_unconstrained_solve() {
    let f = Differentiable::with_gradient(shifted_quadratic, shifted_quadratic_grad);
    let inf = f64::INFINITY;

    let out = fminbox(
        &f,
        array![-inf, -inf, 0.0],
        array![inf, inf, 1.0],
        array![0.0, 0.0, 0.3],
        InnerMethod::LBFGS,
        &FminboxOptions::default(),
    )
    .unwrap();

    assert_relative_eq!(out.minimizer[0], 2.0, epsilon = 1e-5);
    assert_relative_eq!(out.minimizer[1], -1.0, epsilon = 1e-5);
    assert_relative_eq!(out.minimizer[2], 0.5, epsilon = 1e-5);
}
