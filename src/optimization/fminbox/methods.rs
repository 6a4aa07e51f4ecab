//! fminbox::methods — the closed set of inner optimizers.
use crate::optimization::errors::{OptError, OptResult};
use std::{fmt, str::FromStr};

/// Inner optimizer used to solve each barrier subproblem.
///
/// The first five variants are accepted. `Newton` and `NewtonTrustRegion`
/// exist so callers can name them, and are always rejected by
/// [`InnerMethod::ensure_first_order`]: the barrier reformulation only
/// supplies first-order information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InnerMethod {
    GradientDescent,
    ConjugateGradient,
    #[default]
    LBFGS,
    BFGS,
    NelderMead,
    Newton,
    NewtonTrustRegion,
}

impl InnerMethod {
    /// Human-readable method name, used in `summary()`.
    pub fn name(&self) -> &'static str {
        match self {
            InnerMethod::GradientDescent => "Gradient Descent",
            InnerMethod::ConjugateGradient => "Conjugate Gradient",
            InnerMethod::LBFGS => "L-BFGS",
            InnerMethod::BFGS => "BFGS",
            InnerMethod::NelderMead => "Nelder-Mead",
            InnerMethod::Newton => "Newton's Method",
            InnerMethod::NewtonTrustRegion => "Newton's Method (Trust Region)",
        }
    }

    /// Reject methods that need second-order information.
    ///
    /// # Errors
    /// [`OptError::IncompatibleInnerMethod`] for `Newton` and
    /// `NewtonTrustRegion`.
    pub fn ensure_first_order(&self) -> OptResult<()> {
        match self {
            InnerMethod::GradientDescent
            | InnerMethod::ConjugateGradient
            | InnerMethod::LBFGS
            | InnerMethod::BFGS
            | InnerMethod::NelderMead => Ok(()),
            InnerMethod::Newton | InnerMethod::NewtonTrustRegion => Err(self.incompatible()),
        }
    }

    pub(crate) fn incompatible(&self) -> OptError {
        OptError::IncompatibleInnerMethod {
            method: self.name(),
            reason: "Newton's Method is not supported as an inner optimizer; use a first-order method.",
        }
    }
}

impl fmt::Display for InnerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InnerMethod {
    type Err = OptError;

    /// Parse a method name (case-insensitive; spaces, `-` and `_` ignored).
    ///
    /// Accepts e.g. `"lbfgs"`, `"L-BFGS"`, `"bfgs"`, `"gradient_descent"`,
    /// `"cg"`, `"nelder-mead"`, `"newton"`, `"newton_trust_region"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String =
            s.chars().filter(|c| !matches!(c, ' ' | '-' | '_')).collect::<String>().to_lowercase();
        match key.as_str() {
            "gradientdescent" | "gd" => Ok(InnerMethod::GradientDescent),
            "conjugategradient" | "cg" => Ok(InnerMethod::ConjugateGradient),
            "lbfgs" => Ok(InnerMethod::LBFGS),
            "bfgs" => Ok(InnerMethod::BFGS),
            "neldermead" | "nm" => Ok(InnerMethod::NelderMead),
            "newton" => Ok(InnerMethod::Newton),
            "newtontrustregion" => Ok(InnerMethod::NewtonTrustRegion),
            _ => Err(OptError::InvalidInnerMethod {
                name: s.to_string(),
                reason: "Valid options are GradientDescent, ConjugateGradient, LBFGS, BFGS, NelderMead, Newton or NewtonTrustRegion.",
            }),
        }
    }
}
