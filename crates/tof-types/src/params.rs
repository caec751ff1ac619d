//! Scalar-or-batch pulse parameters.
//!
//! Pulse synthesis takes a batch of K parameter sets where any individual
//! parameter may instead be a single value shared by every batch element.
//! [`Param`] makes that rule explicit: a `Scalar` broadcasts to any batch
//! size, a `Batch` must match it exactly. Validation happens once at call
//! entry via [`Param::broadcast`].

use crate::error::{TypeError, TypeResult};
use serde::{Deserialize, Serialize};

/// A pulse parameter that is either one shared value or one value per batch
/// element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Param {
    /// A single value, broadcast to every batch element.
    Scalar(f64),
    /// One value per batch element.
    Batch(Vec<f64>),
}

impl Param {
    /// Number of values carried.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Param::Scalar(_) => 1,
            Param::Batch(v) => v.len(),
        }
    }

    /// Whether the parameter carries no values (an empty batch).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve to exactly `k` values.
    ///
    /// A scalar repeats `k` times; a batch must already have `k` elements.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::ShapeMismatch`] when the batch size is neither 1
    /// nor `k`.
    pub fn broadcast(&self, k: usize) -> TypeResult<Vec<f64>> {
        match self {
            Param::Scalar(v) => Ok(vec![*v; k]),
            Param::Batch(v) if v.len() == k => Ok(v.clone()),
            Param::Batch(v) if v.len() == 1 => Ok(vec![v[0]; k]),
            Param::Batch(v) => Err(TypeError::ShapeMismatch {
                expected: k,
                actual: v.len(),
            }),
        }
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Param::Scalar(v)
    }
}

impl From<Vec<f64>> for Param {
    fn from(v: Vec<f64>) -> Self {
        Param::Batch(v)
    }
}

/// Sampled Gaussian pulse parameters: per-pulse mean and width.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaussianParams {
    /// Pulse means, in domain coordinates.
    pub mu: Vec<f64>,

    /// Pulse widths, in domain coordinates.
    pub sigma: Vec<f64>,
}

/// Sampled exponentially-modified-Gaussian pulse parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpGaussianParams {
    /// Pulse means, in domain coordinates.
    pub mu: Vec<f64>,

    /// Gaussian widths, in domain coordinates.
    pub sigma: Vec<f64>,

    /// Exponential decay rates, reciprocal domain coordinates.
    pub exp_lambda: Vec<f64>,
}
