//! Error types for the infobandit library.

use thiserror::Error;

/// Result type alias for bandit operations.
pub type Result<T> = std::result::Result<T, BanditError>;

/// Errors that can occur while building bandits, updating beliefs or running experiments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BanditError {
    /// No arms are available in the bandit.
    #[error("no arms available")]
    NoArmsAvailable,

    /// An arm index outside of `[0, n_arms)` was used.
    #[error("arm {arm} out of range for a bandit with {n_arms} arms")]
    ArmOutOfRange { arm: usize, n_arms: usize },

    /// Invalid parameter value, detected at construction time.
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// A Bayesian update where the observed outcome has zero likelihood under
    /// every candidate parameter.
    #[error("degenerate posterior: outcome {outcome} on arm {arm} is impossible under every candidate")]
    DegeneratePosterior { arm: usize, outcome: usize },

    /// Numerical computation error.
    #[error("numerical error: {message}")]
    NumericalError { message: String },

    /// Two policies were registered under the same label.
    #[error("policy label '{label}' is already registered")]
    DuplicatePolicy { label: String },

    /// A trial failed; the whole experiment is aborted.
    #[error("trial {trial} of policy '{label}' failed: {source}")]
    TrialFailed {
        label: String,
        trial: usize,
        #[source]
        source: Box<BanditError>,
    },
}

impl BanditError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        BanditError::InvalidParameter {
            message: message.into(),
        }
    }
}
