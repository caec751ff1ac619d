//! Batched signal tensors.
//!
//! A [`SignalTensor`] is an n-dimensional array stored row-major, where one
//! designated axis (first or last) is the signal axis and every other axis is
//! an independent batch dimension. Batched operations flatten the batch axes
//! into a single one with [`SignalTensor::vectorize`], process each lane, and
//! restore the original shape with [`SignalTensor::unvectorize`].

use crate::error::{TypeError, TypeResult};
use serde::{Deserialize, Serialize};

/// Which axis of a tensor carries the signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// The signal runs along the first axis; trailing axes are batch axes.
    First,
    /// The signal runs along the last axis; leading axes are batch axes.
    Last,
}

/// An n-dimensional numeric array, stored row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignalTensor {
    /// Flat element storage.
    pub data: Vec<f64>,

    /// Extent of each axis.
    pub shape: Vec<usize>,
}

impl SignalTensor {
    /// Create a tensor from flat data and a shape.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::ShapeMismatch`] when the shape does not account
    /// for every element.
    pub fn new(data: Vec<f64>, shape: Vec<usize>) -> TypeResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(TypeError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    /// Create a 1-D tensor from a vector.
    pub fn from_vec(data: Vec<f64>) -> Self {
        let shape = vec![data.len()];
        Self { data, shape }
    }

    /// Create a zero-valued tensor of the given shape.
    pub fn zeros(shape: Vec<usize>) -> Self {
        let len = shape.iter().product();
        Self {
            data: vec![0.0; len],
            shape,
        }
    }

    /// Number of axes.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the tensor holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Length of the signal axis.
    #[inline]
    pub fn signal_len(&self, axis: Axis) -> usize {
        match axis {
            Axis::First => self.shape.first().copied().unwrap_or(0),
            Axis::Last => self.shape.last().copied().unwrap_or(0),
        }
    }

    /// Number of independent signal lanes (product of batch axes).
    #[inline]
    pub fn num_lanes(&self, axis: Axis) -> usize {
        let n = self.signal_len(axis);
        if n == 0 {
            0
        } else {
            self.data.len() / n
        }
    }

    /// Flatten all batch axes into one, leaving the signal axis intact.
    ///
    /// For `Axis::Last` the result has shape `[lanes, n]`; for `Axis::First`
    /// it has shape `[n, lanes]`. This is a pure reshape: element order is
    /// unchanged.
    pub fn vectorize(&self, axis: Axis) -> SignalTensor {
        let n = self.signal_len(axis);
        let lanes = self.num_lanes(axis);
        let shape = match axis {
            Axis::First => vec![n, lanes],
            Axis::Last => vec![lanes, n],
        };
        SignalTensor {
            data: self.data.clone(),
            shape,
        }
    }

    /// Restore a shape produced by [`SignalTensor::vectorize`].
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::ShapeMismatch`] when the target shape does not
    /// account for every element.
    pub fn unvectorize(self, shape: Vec<usize>) -> TypeResult<SignalTensor> {
        SignalTensor::new(self.data, shape)
    }

    /// Borrow row `i` of a last-axis-vectorized tensor.
    ///
    /// Rows are the contiguous chunks of length `shape[last]`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.signal_len(Axis::Last);
        &self.data[i * n..(i + 1) * n]
    }

    /// Mutably borrow row `i` of a last-axis-vectorized tensor.
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        let n = self.signal_len(Axis::Last);
        &mut self.data[i * n..(i + 1) * n]
    }

    /// Iterate over the contiguous last-axis rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        let n = self.signal_len(Axis::Last).max(1);
        self.data.chunks_exact(n)
    }
}
