//! Error types for the climbing simulation.

use thiserror::Error;

/// Errors raised by path, registry and expedition operations.
///
/// Movement itself never produces an error for a step count: out-of-range
/// moves clamp at the start or summit instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClimbError {
    /// Unknown climber or segment id.
    #[error("not found: {0}")]
    NotFound(String),
    /// Structurally invalid mutation, such as removing the only segment.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// Argument outside the accepted range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ClimbError {
    /// Shorthand for a [`ClimbError::NotFound`] naming the missing thing.
    #[must_use]
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }
}

/// Result type for fallible simulation operations.
pub type ClimbResult<T> = Result<T, ClimbError>;
