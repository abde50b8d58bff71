//! Error type shared across the crate.

use thiserror::Error;

/// Alias for a `Result` with the crate error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned at the public API boundary.
///
/// Degenerate-but-valid scientific configurations (zero lifetime, zero span,
/// zero visits) are clamped by the simulation routines and never reach this
/// type; only out-of-range or non-finite parameters fail fast.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied parameter is outside its valid range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Too few observations to estimate a period.
    #[error("period estimation requires at least {required} points, got {actual}")]
    TooFewPoints {
        /// Minimum number of points the estimator needs.
        required: usize,
        /// Number of points actually supplied.
        actual: usize,
    },

    /// The flux series carries no variance to fit a period against.
    #[error("flux series is constant, there is no periodic signal to fit")]
    ConstantFlux,
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
