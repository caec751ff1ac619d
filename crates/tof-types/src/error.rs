//! Error types for value-type construction and validation.

use thiserror::Error;

/// Errors raised while constructing or validating core value types.
#[derive(Debug, Error)]
pub enum TypeError {
    /// Domain has too few samples to derive a step size.
    #[error("time domain needs more than one sample, got {0}")]
    InvalidDomain(usize),

    /// Periodic extension requested on a domain with negative coordinates.
    #[error("periodic extension requires a non-negative domain, minimum coordinate is {0}")]
    UnsupportedDomain(f64),

    /// Batch-parameter broadcasting rule violated.
    #[error("batch parameter must have size 1 or {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Signal has the wrong rank for the chosen operation.
    #[error("expected a {expected}-dimensional signal, got {actual} dimensions")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Result type for value-type operations.
pub type TypeResult<T> = Result<T, TypeError>;
