//! objective::differentiable — closure-based objectives with a gradient strategy.
//!
//! Purpose
//! -------
//! Give callers a one-line way to turn plain Rust closures (or a generic
//! [`ScalarObjective`]) into an [`Objective`] without writing a trait impl.
//!
//! Key behaviors
//! -------------
//! - [`Differentiable::from_fn`] / [`Differentiable::finite`]: value only,
//!   gradients by finite differences.
//! - [`Differentiable::with_gradient`]: value plus a gradient that returns a
//!   new vector.
//! - [`Differentiable::with_gradient_inplace`]: value plus a gradient that
//!   writes into a provided buffer; the object owns the scratch buffer.
//! - [`Differentiable::forward`]: value and exact gradient from a
//!   [`ScalarObjective`] via dual numbers.
//!
//! Invariants & assumptions
//! ------------------------
//! - The in-place scratch buffer is resized to `x.len()` before each call,
//!   so the user closure always sees a buffer of the right length.
//! - Single-threaded: the scratch buffer lives in a `RefCell`.
use crate::optimization::{
    errors::OptResult,
    objective::{
        dual::forward_gradient,
        finite_diff::{FiniteDiffScheme, fd_gradient},
        traits::{Differentiation, Objective, ScalarObjective},
    },
    types::{Cost, Grad, Theta},
};
use std::{cell::RefCell, fmt, rc::Rc};

type ValueFn<'a> = Box<dyn Fn(&Theta) -> Cost + 'a>;
type GradFn<'a> = Box<dyn Fn(&Theta) -> Grad + 'a>;
type GradInPlaceFn<'a> = Box<dyn Fn(&mut Grad, &Theta) + 'a>;

enum GradientStrategy<'a> {
    Analytic(GradFn<'a>),
    InPlace { grad: GradInPlaceFn<'a>, scratch: RefCell<Grad> },
    Forward(GradFn<'a>),
    Finite(FiniteDiffScheme),
}

/// Value callable paired with a gradient strategy.
pub struct Differentiable<'a> {
    value: ValueFn<'a>,
    gradient: GradientStrategy<'a>,
}

impl<'a> Differentiable<'a> {
    /// Value only; gradients by central differences (forward fallback).
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Theta) -> Cost + 'a,
    {
        Self::finite(f, FiniteDiffScheme::Central)
    }

    /// Value only; gradients by the requested finite-difference scheme.
    pub fn finite<F>(f: F, scheme: FiniteDiffScheme) -> Self
    where
        F: Fn(&Theta) -> Cost + 'a,
    {
        Self { value: Box::new(f), gradient: GradientStrategy::Finite(scheme) }
    }

    /// Value plus an analytic gradient returning a fresh vector.
    pub fn with_gradient<F, G>(f: F, g: G) -> Self
    where
        F: Fn(&Theta) -> Cost + 'a,
        G: Fn(&Theta) -> Grad + 'a,
    {
        Self { value: Box::new(f), gradient: GradientStrategy::Analytic(Box::new(g)) }
    }

    /// Value plus an analytic gradient written into `out`.
    pub fn with_gradient_inplace<F, G>(f: F, g: G) -> Self
    where
        F: Fn(&Theta) -> Cost + 'a,
        G: Fn(&mut Grad, &Theta) + 'a,
    {
        Self {
            value: Box::new(f),
            gradient: GradientStrategy::InPlace {
                grad: Box::new(g),
                scratch: RefCell::new(Grad::zeros(0)),
            },
        }
    }

    /// Value and exact gradient of a generic model via forward-mode AD.
    pub fn forward<M>(model: M) -> Self
    where
        M: ScalarObjective + 'a,
    {
        let model = Rc::new(model);
        let value_model = Rc::clone(&model);
        Self {
            value: Box::new(move |x: &Theta| value_model.eval::<f64>(&x.to_vec())),
            gradient: GradientStrategy::Forward(Box::new(move |x: &Theta| {
                forward_gradient(x, |z| model.eval(z))
            })),
        }
    }

    /// Where gradients of this objective come from.
    pub fn differentiation(&self) -> Differentiation {
        match self.gradient {
            GradientStrategy::Analytic(_) | GradientStrategy::InPlace { .. } => {
                Differentiation::Analytic
            }
            GradientStrategy::Forward(_) => Differentiation::Forward,
            GradientStrategy::Finite(_) => Differentiation::Finite,
        }
    }
}

impl Objective for Differentiable<'_> {
    fn value(&self, x: &Theta) -> OptResult<Cost> {
        Ok((self.value)(x))
    }

    fn gradient(&self, x: &Theta) -> OptResult<Grad> {
        match &self.gradient {
            GradientStrategy::Analytic(g) | GradientStrategy::Forward(g) => Ok(g(x)),
            GradientStrategy::InPlace { grad, scratch } => {
                let mut buf = scratch.borrow_mut();
                if buf.len() != x.len() {
                    *buf = Grad::zeros(x.len());
                }
                grad(&mut *buf, x);
                Ok(buf.clone())
            }
            GradientStrategy::Finite(scheme) => {
                fd_gradient(x, &|z: &Theta| Ok((self.value)(z)), *scheme)
            }
        }
    }
}

impl fmt::Debug for Differentiable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Differentiable").field("differentiation", &self.differentiation()).finish()
    }
}
