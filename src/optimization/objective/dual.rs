//! objective::dual — forward-mode dual numbers and the [`Scalar`] abstraction.
//!
//! Purpose
//! -------
//! Let users write an objective once, generically over [`Scalar`], and reuse
//! it both for plain `f64` evaluation and for exact forward-mode gradients
//! through [`Dual`].
//!
//! Key behaviors
//! -------------
//! - [`Dual`] carries a primal value `val` and one tangent `dot`. Arithmetic
//!   and elementary functions propagate the tangent by the chain rule.
//! - [`Scalar`] is implemented for `f64` and [`Dual`].
//! - [`forward_gradient`] seeds one coordinate per pass, so an n-dimensional
//!   gradient costs n evaluations of the generic objective.
//!
//! Invariants & assumptions
//! ------------------------
//! - `max_s` is non-smooth and passes the derivative of the winning branch.
//! - `abs` uses `signum(val)` as derivative, which is `±1` at `0.0`.
use crate::optimization::types::{Grad, Theta};
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Dual number `val + dot·ε` with `ε² = 0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Dual {
    pub val: f64,
    pub dot: f64,
}

impl Dual {
    #[inline]
    pub fn new(val: f64, dot: f64) -> Self {
        Self { val, dot }
    }

    /// A constant (zero tangent).
    #[inline]
    pub fn constant(val: f64) -> Self {
        Self { val, dot: 0.0 }
    }

    /// An independent variable (unit tangent).
    #[inline]
    pub fn var(val: f64) -> Self {
        Self { val, dot: 1.0 }
    }

    #[inline]
    pub fn ln(self) -> Self {
        Self { val: self.val.ln(), dot: self.dot / self.val }
    }

    #[inline]
    pub fn exp(self) -> Self {
        let e = self.val.exp();
        Self { val: e, dot: self.dot * e }
    }

    #[inline]
    pub fn powf(self, n: f64) -> Self {
        Self { val: self.val.powf(n), dot: self.dot * n * self.val.powf(n - 1.0) }
    }

    #[inline]
    pub fn powi(self, n: i32) -> Self {
        Self { val: self.val.powi(n), dot: self.dot * f64::from(n) * self.val.powi(n - 1) }
    }

    #[inline]
    pub fn sqrt(self) -> Self {
        let s = self.val.sqrt();
        Self { val: s, dot: self.dot / (2.0 * s) }
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self { val: self.val.abs(), dot: self.dot * self.val.signum() }
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        if self.val >= other.val { self } else { other }
    }
}

impl Add for Dual {
    type Output = Dual;
    #[inline]
    fn add(self, rhs: Dual) -> Dual {
        Dual { val: self.val + rhs.val, dot: self.dot + rhs.dot }
    }
}

impl Sub for Dual {
    type Output = Dual;
    #[inline]
    fn sub(self, rhs: Dual) -> Dual {
        Dual { val: self.val - rhs.val, dot: self.dot - rhs.dot }
    }
}

impl Mul for Dual {
    type Output = Dual;
    #[inline]
    fn mul(self, rhs: Dual) -> Dual {
        Dual { val: self.val * rhs.val, dot: self.dot * rhs.val + self.val * rhs.dot }
    }
}

impl Div for Dual {
    type Output = Dual;
    #[inline]
    fn div(self, rhs: Dual) -> Dual {
        Dual {
            val: self.val / rhs.val,
            dot: (self.dot * rhs.val - self.val * rhs.dot) / (rhs.val * rhs.val),
        }
    }
}

impl Neg for Dual {
    type Output = Dual;
    #[inline]
    fn neg(self) -> Dual {
        Dual { val: -self.val, dot: -self.dot }
    }
}

impl Sum for Dual {
    fn sum<I: Iterator<Item = Dual>>(iter: I) -> Dual {
        iter.fold(Dual::constant(0.0), |acc, x| acc + x)
    }
}

/// A scalar type an objective can be written against.
///
/// Implemented for `f64` (plain evaluation) and [`Dual`] (forward mode).
pub trait Scalar:
    Copy
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Sum
    + PartialOrd
    + Sized
{
    /// Wrap an `f64` constant (derivative = 0 for AD types).
    fn from_f64(v: f64) -> Self;

    /// Extract the primal value.
    fn value(&self) -> f64;

    fn ln(self) -> Self;

    fn exp(self) -> Self;

    fn powf(self, n: f64) -> Self;

    fn powi(self, n: i32) -> Self;

    fn sqrt(self) -> Self;

    fn abs(self) -> Self;

    /// Maximum of two values (passes derivative of the winner).
    fn max_s(self, other: Self) -> Self;
}

impl Scalar for f64 {
    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn value(&self) -> f64 {
        *self
    }

    #[inline]
    fn ln(self) -> Self {
        f64::ln(self)
    }

    #[inline]
    fn exp(self) -> Self {
        f64::exp(self)
    }

    #[inline]
    fn powf(self, n: f64) -> Self {
        f64::powf(self, n)
    }

    #[inline]
    fn powi(self, n: i32) -> Self {
        f64::powi(self, n)
    }

    #[inline]
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }

    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline]
    fn max_s(self, other: Self) -> Self {
        f64::max(self, other)
    }
}

impl Scalar for Dual {
    #[inline]
    fn from_f64(v: f64) -> Self {
        Dual::constant(v)
    }

    #[inline]
    fn value(&self) -> f64 {
        self.val
    }

    #[inline]
    fn ln(self) -> Self {
        Dual::ln(self)
    }

    #[inline]
    fn exp(self) -> Self {
        Dual::exp(self)
    }

    #[inline]
    fn powf(self, n: f64) -> Self {
        Dual::powf(self, n)
    }

    #[inline]
    fn powi(self, n: i32) -> Self {
        Dual::powi(self, n)
    }

    #[inline]
    fn sqrt(self) -> Self {
        Dual::sqrt(self)
    }

    #[inline]
    fn abs(self) -> Self {
        Dual::abs(self)
    }

    #[inline]
    fn max_s(self, other: Self) -> Self {
        Dual::max(self, other)
    }
}

/// Exact gradient of a generic scalar function by forward-mode sweeps.
///
/// `eval` is called once per coordinate with that coordinate seeded as
/// [`Dual::var`] and every other coordinate as [`Dual::constant`].
pub fn forward_gradient<F>(x: &Theta, eval: F) -> Grad
where
    F: Fn(&[Dual]) -> Dual,
{
    let mut seeded: Vec<Dual> = x.iter().map(|&v| Dual::constant(v)).collect();
    let mut grad = Grad::zeros(x.len());
    for i in 0..x.len() {
        seeded[i].dot = 1.0;
        grad[i] = eval(&seeded).dot;
        seeded[i].dot = 0.0;
    }
    grad
}
