//! Error types for interval branch-and-bound minimization.
//!
//! Run termination is reported through [`Termination`]; everything that stops a
//! run from producing a result is a [`MinimizeError`].

use std::fmt;

use thiserror::Error;

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// Every surviving box was refined down to the requested precision.
    PrecisionReached,
    /// The whole root box was discarded against the starting bound, so no
    /// candidate survived.
    Pruned,
}

impl Termination {
    /// Returns true if at least one candidate box survived.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::PrecisionReached)
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrecisionReached => write!(f, "All candidate boxes refined to precision"),
            Self::Pruned => write!(f, "Root box pruned against the starting bound"),
        }
    }
}

/// Errors that can occur while setting up or running a minimization.
#[derive(Error, Debug)]
pub enum MinimizeError {
    #[error("Invalid precision {0}: must be finite and > 0")]
    InvalidPrecision(f64),

    #[error("Invalid interval [{lo}, {hi}]: bounds must be ordered and not NaN")]
    InvalidInterval { lo: f64, hi: f64 },

    #[error("Unknown function '{name}'; possible choices: {}", available.join(" "))]
    UnknownFunction { name: String, available: Vec<String> },

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Worker for quadrant {quadrant} failed: {reason}")]
    WorkerFailed { quadrant: usize, reason: String },

    #[error("Could not build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type alias for minimization operations.
pub type Result<T> = std::result::Result<T, MinimizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termination_success() {
        assert!(Termination::PrecisionReached.is_success());
        assert!(!Termination::Pruned.is_success());
    }

    #[test]
    fn test_unknown_function_lists_choices() {
        let err = MinimizeError::UnknownFunction {
            name: "rosen".into(),
            available: vec!["beale".into(), "booth".into()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown function 'rosen'; possible choices: beale booth"
        );
    }

    #[test]
    fn test_invalid_precision_message() {
        let err = MinimizeError::InvalidPrecision(-0.5);
        assert!(err.to_string().contains("-0.5"));
    }
}
