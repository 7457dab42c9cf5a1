use thiserror::Error;

use crate::engine::DomainId;

/// Errors which indicate a mistake in the model itself, as opposed to a branch of the search
/// which has no solution.
///
/// These are reported when a constraint is constructed or imposed and are not recoverable by
/// backtracking.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("illegal argument: {0}")]
    IllegalArgument(String),
    #[error("expected {expected} elements but got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// A constraint over 0/1 variables received a variable with other values in its domain.
    #[error("variable {0} does not have a 0/1 domain")]
    NonBooleanVariable(DomainId),
    /// Intermediate values of the constraint do not fit in a 32-bit integer.
    #[error("{0} can overflow for the initial domains of its variables")]
    Overflow(String),
}
