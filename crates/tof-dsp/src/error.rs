//! Error types for DSP operations.

use thiserror::Error;
use tof_types::TypeError;

/// Errors that can occur during DSP operations.
///
/// All of these are precondition violations detected at call entry; none are
/// recoverable internally and none produce partial results.
#[derive(Debug, Error)]
pub enum DspError {
    /// Invalid domain, tensor shape, or parameter broadcast.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// Requested window support exceeds the buffer length.
    #[error("window length {window_len} exceeds buffer length {n}")]
    InvalidWindowLength { window_len: usize, n: usize },

    /// Window name not in the recognized set.
    #[error("unsupported smoothing window kind: {0}")]
    UnsupportedWindowKind(String),

    /// Window duty cycle outside the open interval (0, 1).
    #[error("window duty cycle must be in (0, 1), got {0}")]
    InvalidWindowDuty(f64),

    /// Input length mismatch.
    #[error("input length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Insufficient data for operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Numerical instability detected.
    #[error("numerical instability: {0}")]
    NumericalInstability(String),
}

/// Result type for DSP operations.
pub type DspResult<T> = Result<T, DspError>;
