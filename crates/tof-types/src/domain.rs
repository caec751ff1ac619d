//! Uniform 1-D sample domains.
//!
//! A [`TimeDomain`] is an ordered sequence of sample coordinates with a
//! constant step. For a domain with `n` samples, the coordinates are:
//!
//! ```text
//! t[i] = t[0] + i * dt,  for i = 0, 1, ..., n-1
//! ```
//!
//! The period `tau` is `t[n-1] + dt`, one step past the last sample. Circular
//! operations treat the domain as a single period of an infinite periodic
//! signal, so `tau` (not `t[n-1]`) is the wraparound length.

use crate::error::{TypeError, TypeResult};
use serde::{Deserialize, Serialize};

/// A uniformly-spaced 1-D sample domain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeDomain {
    samples: Vec<f64>,
    dt: f64,
    tau: f64,
}

impl TimeDomain {
    /// Create a domain from explicit sample coordinates.
    ///
    /// The coordinates are assumed uniformly spaced and sorted ascending;
    /// `dt` is derived from the first two samples and `tau` is one step past
    /// the last sample.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::InvalidDomain`] when fewer than two samples are
    /// supplied.
    pub fn new(samples: Vec<f64>) -> TypeResult<Self> {
        let n = samples.len();
        if n <= 1 {
            return Err(TypeError::InvalidDomain(n));
        }
        let dt = samples[1] - samples[0];
        let tau = samples[n - 1] + dt;
        Ok(Self { samples, dt, tau })
    }

    /// Create the canonical integer domain `[0, 1, ..., n-1]`.
    pub fn uniform(n: usize) -> TypeResult<Self> {
        if n <= 1 {
            return Err(TypeError::InvalidDomain(n));
        }
        Self::new((0..n).map(|i| i as f64).collect())
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// A validated domain always has at least two samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Step between consecutive samples.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Period of the domain: one step past the last sample.
    #[inline]
    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Sample coordinates.
    #[inline]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Extend the domain periodically in both directions.
    ///
    /// Produces a sequence three times as long: one copy shifted left by
    /// `max + dt`, the original, and one copy shifted right by `max + dt`.
    /// Summing pulse evaluations over the three segments realizes periodic
    /// wraparound. For `[0, 1, 2, 3]` the extension is
    /// `[-4, -3, -2, -1, 0, 1, 2, 3, 4, 5, 6, 7]`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::UnsupportedDomain`] when the domain contains
    /// negative coordinates.
    pub fn extended(&self) -> TypeResult<Vec<f64>> {
        let min = self.samples.iter().cloned().fold(f64::INFINITY, f64::min);
        if min < 0.0 {
            return Err(TypeError::UnsupportedDomain(min));
        }
        let max = self.samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let offset = max + self.dt;

        let mut extended = Vec::with_capacity(3 * self.samples.len());
        extended.extend(self.samples.iter().map(|t| t - offset));
        extended.extend_from_slice(&self.samples);
        extended.extend(self.samples.iter().map(|t| t + offset));
        Ok(extended)
    }
}
