//! errors — unified error surface for box-constrained optimization.
//!
//! Every fallible entry point in [`crate::optimization`] returns
//! [`OptResult<T>`]. Variants are grouped by origin: precondition violations
//! detected before any iteration runs, configuration mistakes caught by the
//! validating constructors, numerical failures raised while evaluating the
//! objective or the barrier, and wrappers around `argmin` backend errors.
//!
//! Non-convergence is deliberately absent: a capped or stalled run is a
//! regular [`FminboxOutcome`](crate::optimization::fminbox::FminboxOutcome)
//! with `converged == false`.
use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptError {
    // ---- Preconditions ----
    /// Initial point lies strictly outside the box.
    #[error(
        "Initial point is outside the box at index {index}: {value} not in [{lower}, {upper}]"
    )]
    InitialPointOutOfBounds { index: usize, value: f64, lower: f64, upper: f64 },

    /// Inner method cannot be used with the barrier reformulation.
    #[error("Inner method '{method}' is not supported by Fminbox: {reason}")]
    IncompatibleInnerMethod { method: &'static str, reason: &'static str },

    /// Vector lengths disagree.
    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch { what: &'static str, expected: usize, found: usize },

    /// Lower bound exceeds upper bound, or a bound is NaN.
    #[error("Invalid bounds at index {index}: [{lower}, {upper}]: {reason}")]
    InvalidBounds { index: usize, lower: f64, upper: f64, reason: &'static str },

    /// Initial point contains a non-finite coordinate.
    #[error("Invalid initial point at index {index}: {value}, must be finite")]
    InvalidInitialPoint { index: usize, value: f64 },

    // ---- Gradient ----
    /// Implies that FD should be used
    #[error("Gradient not implemented")]
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    #[error("Gradient dimension mismatch: expected {expected}, found {found}")]
    GradientDimMismatch { expected: usize, found: usize },

    /// Gradient elements need to be finite
    #[error("Invalid gradient at index {index}: {value}: {reason}")]
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- Options ----
    /// Gradient tolerance needs to be positive and finite.
    #[error("Invalid gradient tolerance {tol}: {reason}")]
    InvalidTolGrad { tol: f64, reason: &'static str },

    /// Cost change tolerance needs to be positive and finite.
    #[error("Invalid cost function change tolerance {tol}: {reason}")]
    InvalidTolCost { tol: f64, reason: &'static str },

    /// Maximum iterations needs to be positive.
    #[error("Invalid maximum iterations {max_iter}: {reason}")]
    InvalidMaxIter { max_iter: usize, reason: &'static str },

    /// At least one tolerance must be provided.
    #[error("No tolerances provided")]
    NoTolerancesProvided,

    /// Invalid line searcher name.
    #[error("Invalid line searcher '{name}': {reason}")]
    InvalidLineSearch { name: String, reason: &'static str },

    /// Invalid inner method name.
    #[error("Invalid inner method '{name}': {reason}")]
    InvalidInnerMethod { name: String, reason: &'static str },

    /// lbfgs_mem needs to be at least 1.
    #[error("Invalid L-BFGS memory {mem}: {reason}")]
    InvalidLBFGSMem { mem: usize, reason: &'static str },

    /// Outer iteration cap needs to be at least 1.
    #[error("Invalid outer iterations {outer_iterations}: {reason}")]
    InvalidOuterIterations { outer_iterations: usize, reason: &'static str },

    /// Barrier decay factor must lie in (0, 1).
    #[error("Invalid barrier decay factor {decay}: {reason}")]
    InvalidBarrierDecay { decay: f64, reason: &'static str },

    /// Barrier coefficient must be finite and strictly positive.
    #[error("Invalid barrier coefficient {mu}: {reason}")]
    InvalidBarrierCoefficient { mu: f64, reason: &'static str },

    /// Outer convergence tolerances must be finite and non-negative.
    #[error("Invalid outer tolerance {name} = {tol}: {reason}")]
    InvalidOuterTolerance { name: &'static str, tol: f64, reason: &'static str },

    /// Certification tolerances must be finite and strictly positive.
    #[error("Invalid certification tolerance {name} = {tol}: {reason}")]
    InvalidCertifyTolerance { name: &'static str, tol: f64, reason: &'static str },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    #[error("Non-finite cost value: {value}")]
    NonFiniteCost { value: f64 },

    /// Barrier evaluated at a point that is not strictly inside the box.
    #[error("Point outside the barrier domain at index {index}: {value} not in ({lower}, {upper})")]
    OutsideBarrierDomain { index: usize, value: f64, lower: f64, upper: f64 },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    #[error("Invalid minimizer at index {index}: {value}: {reason}")]
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    /// Theta hat is missing
    #[error("Missing minimizer: inner solver returned no best parameter")]
    MissingThetaHat,

    // ---- Callbacks ----
    /// A foreign objective callback (e.g. a Python callable) failed.
    #[error("Objective callback failed: {text}")]
    CallbackFailed { text: String },

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    #[error("Invalid parameter: {text}")]
    InvalidParameter { text: String },
    /// Wrapper for argmin::NotImplemented
    #[error("Not implemented: {text}")]
    NotImplemented { text: String },
    /// Wrapper for argmin::NotInitialized
    #[error("Not initialized: {text}")]
    NotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated
    #[error("Condition violated: {text}")]
    ConditionViolated { text: String },
    /// Wrapper for argmin::CheckPointNotFound
    #[error("Checkpoint not found: {text}")]
    CheckPointNotFound { text: String },
    /// Wrapper for argmin::PotentialBug
    #[error("Potential bug: {text}")]
    PotentialBug { text: String },
    /// Wrapper for argmin::ImpossibleError
    #[error("Impossible error: {text}")]
    ImpossibleError { text: String },
    /// Wrapper for other argmin::Error types
    #[error("Backend error: {text}")]
    BackendError { text: String },

    // ---- Fallback ----
    #[error("Unknown error")]
    UnknownError,
}

impl OptError {
    /// `true` for errors raised before any outer iteration because the
    /// caller's inputs violate a precondition.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            OptError::InitialPointOutOfBounds { .. }
                | OptError::IncompatibleInnerMethod { .. }
                | OptError::DimensionMismatch { .. }
                | OptError::InvalidBounds { .. }
                | OptError::InvalidInitialPoint { .. }
        )
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Errors raised by our own cost/gradient callbacks travel through
        // argmin boxed as `OptError`; hand them back unchanged.
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<OptError> for pyo3::PyErr {
    fn from(err: OptError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
