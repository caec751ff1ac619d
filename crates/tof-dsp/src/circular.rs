//! Circular convolution and correlation.
//!
//! Both transforms treat their inputs as one period of an infinite periodic
//! signal and are computed through the convolution theorem: forward FFT,
//! elementwise product, inverse FFT. The output length always equals the
//! input length N.
//!
//! [`CircularConvolver`] pre-computes the kernel spectrum once for repeated
//! application against many signals of the same length, dispatching the batch
//! to Rayon when it is large enough to pay for it.

use crate::error::{DspError, DspResult};
use crate::fft::FftEngine;
use num_complex::Complex64;
use rayon::prelude::*;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use std::sync::Arc;
use tof_types::{Axis, SignalTensor, TypeError};

/// Batches below this many lanes are processed sequentially.
const PARALLEL_LANE_THRESHOLD: usize = 4;

/// Circular convolution of two equal-length signals.
///
/// Computed as `irfft(rfft(v1) * rfft(v2), n)`.
///
/// # Errors
///
/// Returns [`DspError::LengthMismatch`] when the inputs differ in length and
/// [`DspError::InsufficientData`] when they are empty.
pub fn circular_conv(v1: &[f64], v2: &[f64]) -> DspResult<Vec<f64>> {
    let n = v1.len();
    if v2.len() != n {
        return Err(DspError::LengthMismatch {
            expected: n,
            actual: v2.len(),
        });
    }

    let mut engine = FftEngine::new();
    let f1 = engine.rfft(v1)?;
    let f2 = engine.rfft(v2)?;

    let product: Vec<Complex64> = f1.iter().zip(f2.iter()).map(|(a, b)| a * b).collect();
    engine.irfft(&product, n)
}

/// Circular correlation of two equal-length signals.
///
/// Computed as `re(ifft(conj(fft(v1)) * fft(v2)))`. The zero-lag output
/// equals the inner product of the two signals.
///
/// # Errors
///
/// Returns [`DspError::LengthMismatch`] when the inputs differ in length and
/// [`DspError::InsufficientData`] when they are empty.
pub fn circular_corr(v1: &[f64], v2: &[f64]) -> DspResult<Vec<f64>> {
    let n = v1.len();
    if v2.len() != n {
        return Err(DspError::LengthMismatch {
            expected: n,
            actual: v2.len(),
        });
    }
    if n == 0 {
        return Err(DspError::InsufficientData { needed: 1, got: 0 });
    }

    let mut engine = FftEngine::new();
    let mut f1: Vec<Complex64> = v1.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    let mut f2: Vec<Complex64> = v2.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    engine.fft_inplace(&mut f1);
    engine.fft_inplace(&mut f2);

    let mut product: Vec<Complex64> = f1
        .iter()
        .zip(f2.iter())
        .map(|(a, b)| a.conj() * b)
        .collect();
    engine.ifft_inplace(&mut product);

    Ok(product.iter().map(|c| c.re).collect())
}

/// Circular convolution engine with a pre-computed kernel spectrum.
///
/// All signals must have the same length as the kernel; the transform is
/// periodic, so there is no padding and no transient.
pub struct CircularConvolver {
    /// Kernel spectrum, N/2 + 1 bins.
    kernel_fft: Vec<Complex64>,

    /// Signal length N.
    n: usize,

    /// Cached real FFT plans.
    r2c: Arc<dyn RealToComplex<f64>>,
    c2r: Arc<dyn ComplexToReal<f64>>,
}

impl CircularConvolver {
    /// Create a convolver for a fixed kernel.
    pub fn new(kernel: &[f64]) -> DspResult<Self> {
        let n = kernel.len();
        if n == 0 {
            return Err(DspError::InsufficientData { needed: 1, got: 0 });
        }

        let mut planner = RealFftPlanner::new();
        let r2c = planner.plan_fft_forward(n);
        let c2r = planner.plan_fft_inverse(n);

        let mut input = kernel.to_vec();
        let mut kernel_fft = r2c.make_output_vec();
        r2c.process(&mut input, &mut kernel_fft)
            .map_err(|e| DspError::NumericalInstability(e.to_string()))?;

        tracing::debug!("CircularConvolver: n={}, spectrum bins={}", n, kernel_fft.len());

        Ok(Self {
            kernel_fft,
            n,
            r2c,
            c2r,
        })
    }

    /// Signal length the convolver operates at.
    #[inline]
    pub fn signal_len(&self) -> usize {
        self.n
    }

    /// Circularly convolve one signal with the kernel.
    pub fn convolve(&self, signal: &[f64]) -> DspResult<Vec<f64>> {
        if signal.len() != self.n {
            return Err(DspError::LengthMismatch {
                expected: self.n,
                actual: signal.len(),
            });
        }

        let mut input = signal.to_vec();
        let mut spectrum = self.r2c.make_output_vec();
        self.r2c
            .process(&mut input, &mut spectrum)
            .map_err(|e| DspError::NumericalInstability(e.to_string()))?;

        for (s, k) in spectrum.iter_mut().zip(self.kernel_fft.iter()) {
            *s *= *k;
        }

        // Keep the DC and Nyquist bins real for the inverse transform.
        spectrum[0].im = 0.0;
        if self.n % 2 == 0 {
            if let Some(last) = spectrum.last_mut() {
                last.im = 0.0;
            }
        }

        let mut output = self.c2r.make_output_vec();
        self.c2r
            .process(&mut spectrum, &mut output)
            .map_err(|e| DspError::NumericalInstability(e.to_string()))?;

        let scale = 1.0 / self.n as f64;
        for x in output.iter_mut() {
            *x *= scale;
        }
        Ok(output)
    }

    /// Circularly convolve every lane of a tensor with the kernel.
    ///
    /// Lanes run along the chosen signal axis and are independent, so large
    /// batches are processed in parallel. First-axis lanes are strided and
    /// gathered into contiguous buffers before transforming.
    pub fn convolve_rows(&self, signals: &SignalTensor, axis: Axis) -> DspResult<SignalTensor> {
        if signals.signal_len(axis) != self.n {
            return Err(DspError::LengthMismatch {
                expected: self.n,
                actual: signals.signal_len(axis),
            });
        }
        let lanes = signals.num_lanes(axis);

        let rows: Vec<Vec<f64>> = if lanes < PARALLEL_LANE_THRESHOLD {
            (0..lanes)
                .map(|j| self.convolve(&lane_to_vec(signals, axis, j)))
                .collect::<DspResult<_>>()?
        } else {
            tracing::debug!("CircularConvolver: dispatching {} lanes to rayon", lanes);
            (0..lanes)
                .into_par_iter()
                .map(|j| self.convolve(&lane_to_vec(signals, axis, j)))
                .collect::<DspResult<_>>()?
        };

        lanes_to_tensor(rows, signals.shape.clone(), axis)
    }
}

/// Copy lane `j` along the signal axis into a contiguous buffer.
///
/// Last-axis lanes are the contiguous row chunks; first-axis lanes are
/// strided columns of the row-major layout.
fn lane_to_vec(t: &SignalTensor, axis: Axis, j: usize) -> Vec<f64> {
    let n = t.signal_len(axis);
    match axis {
        Axis::Last => t.data[j * n..(j + 1) * n].to_vec(),
        Axis::First => {
            let lanes = t.num_lanes(axis);
            (0..n).map(|i| t.data[i * lanes + j]).collect()
        }
    }
}

/// Reassemble per-lane outputs into a tensor of the given shape.
fn lanes_to_tensor(rows: Vec<Vec<f64>>, shape: Vec<usize>, axis: Axis) -> DspResult<SignalTensor> {
    match axis {
        Axis::Last => {
            let data: Vec<f64> = rows.into_iter().flatten().collect();
            Ok(SignalTensor::new(data, shape)?)
        }
        Axis::First => {
            let lanes = rows.len();
            let mut out = SignalTensor::zeros(shape);
            for (j, row) in rows.iter().enumerate() {
                for (i, &v) in row.iter().enumerate() {
                    out.data[i * lanes + j] = v;
                }
            }
            Ok(out)
        }
    }
}

/// Validate the lane-broadcast rule: lane counts must match or either be 1.
fn broadcast_lanes(ra: usize, rb: usize) -> DspResult<usize> {
    if ra == rb || rb == 1 {
        Ok(ra)
    } else if ra == 1 {
        Ok(rb)
    } else {
        Err(TypeError::ShapeMismatch {
            expected: ra,
            actual: rb,
        }
        .into())
    }
}

/// Batched circular convolution along the chosen signal axis.
///
/// The two tensors must share the signal length N; their batch lanes must
/// match or either side must have a single lane, which broadcasts against
/// the other. The output takes the shape of the broadcasted side.
pub fn circular_conv_batch(
    a: &SignalTensor,
    b: &SignalTensor,
    axis: Axis,
) -> DspResult<SignalTensor> {
    let n = a.signal_len(axis);
    if b.signal_len(axis) != n {
        return Err(DspError::LengthMismatch {
            expected: n,
            actual: b.signal_len(axis),
        });
    }

    let (ra, rb) = (a.num_lanes(axis), b.num_lanes(axis));
    let lanes = broadcast_lanes(ra, rb)?;

    // Single-lane sides reduce to a shared-kernel convolver.
    if rb == 1 {
        let convolver = CircularConvolver::new(&lane_to_vec(b, axis, 0))?;
        return convolver.convolve_rows(a, axis);
    }
    if ra == 1 {
        let convolver = CircularConvolver::new(&lane_to_vec(a, axis, 0))?;
        return convolver.convolve_rows(b, axis);
    }

    let pair = |i: usize| circular_conv(&lane_to_vec(a, axis, i), &lane_to_vec(b, axis, i));
    let rows: Vec<Vec<f64>> = if lanes < PARALLEL_LANE_THRESHOLD {
        (0..lanes).map(pair).collect::<DspResult<_>>()?
    } else {
        (0..lanes).into_par_iter().map(pair).collect::<DspResult<_>>()?
    };

    lanes_to_tensor(rows, a.shape.clone(), axis)
}

/// Batched circular correlation along the chosen signal axis.
///
/// Same broadcast rule as [`circular_conv_batch`].
pub fn circular_corr_batch(
    a: &SignalTensor,
    b: &SignalTensor,
    axis: Axis,
) -> DspResult<SignalTensor> {
    let n = a.signal_len(axis);
    if b.signal_len(axis) != n {
        return Err(DspError::LengthMismatch {
            expected: n,
            actual: b.signal_len(axis),
        });
    }

    let (ra, rb) = (a.num_lanes(axis), b.num_lanes(axis));
    let lanes = broadcast_lanes(ra, rb)?;

    let pair = |i: usize| {
        let row_a = lane_to_vec(a, axis, if ra == 1 { 0 } else { i });
        let row_b = lane_to_vec(b, axis, if rb == 1 { 0 } else { i });
        circular_corr(&row_a, &row_b)
    };

    let rows: Vec<Vec<f64>> = if lanes < PARALLEL_LANE_THRESHOLD {
        (0..lanes).map(pair).collect::<DspResult<_>>()?
    } else {
        (0..lanes).into_par_iter().map(pair).collect::<DspResult<_>>()?
    };

    let shape = if ra >= rb { a.shape.clone() } else { b.shape.clone() };
    lanes_to_tensor(rows, shape, axis)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// O(n^2) reference for validating the FFT path.
    fn direct_circular_conv(v1: &[f64], v2: &[f64]) -> Vec<f64> {
        let n = v1.len();
        let mut out = vec![0.0; n];
        for i in 0..n {
            for j in 0..n {
                out[i] += v1[j] * v2[(i + n - j) % n];
            }
        }
        out
    }

    #[test]
    fn test_impulse_is_identity() {
        let v: Vec<f64> = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0];
        let mut delta = vec![0.0; v.len()];
        delta[0] = 1.0;

        let result = circular_conv(&delta, &v).unwrap();
        for (r, x) in result.iter().zip(v.iter()) {
            assert!((r - x).abs() < 1e-10);
        }
    }

    #[test]
    fn test_conv_matches_direct() {
        let v1: Vec<f64> = (0..11).map(|i| (i as f64 * 0.7).sin()).collect();
        let v2: Vec<f64> = (0..11).map(|i| (-(i as f64) * 0.3).exp()).collect();

        let fft = circular_conv(&v1, &v2).unwrap();
        let direct = direct_circular_conv(&v1, &v2);

        assert_eq!(fft.len(), 11);
        for (f, d) in fft.iter().zip(direct.iter()) {
            assert!((f - d).abs() < 1e-10);
        }
    }

    #[test]
    fn test_zero_lag_autocorrelation_is_energy() {
        let v: Vec<f64> = vec![1.0, -2.0, 3.0, 0.5, -1.5];
        let energy: f64 = v.iter().map(|x| x * x).sum();

        let corr = circular_corr(&v, &v).unwrap();
        assert!((corr[0] - energy).abs() < 1e-10);
    }

    #[test]
    fn test_corr_detects_shift() {
        // Correlating a signal against a rolled copy peaks at the shift lag.
        let v: Vec<f64> = vec![0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let mut shifted = v.clone();
        shifted.rotate_right(3);

        let corr = circular_corr(&v, &shifted).unwrap();
        let peak = corr
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        assert_eq!(peak, 3);
    }

    #[test]
    fn test_length_mismatch() {
        let result = circular_conv(&[1.0, 2.0, 3.0], &[1.0, 2.0]);
        assert!(matches!(
            result,
            Err(DspError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_convolver_matches_one_shot() {
        let kernel: Vec<f64> = (0..9).map(|i| (-(i as f64) * 0.5).exp()).collect();
        let signal: Vec<f64> = (0..9).map(|i| (i as f64 * 1.1).cos()).collect();

        let convolver = CircularConvolver::new(&kernel).unwrap();
        let engine_out = convolver.convolve(&signal).unwrap();
        let one_shot = circular_conv(&signal, &kernel).unwrap();

        for (e, o) in engine_out.iter().zip(one_shot.iter()) {
            assert!((e - o).abs() < 1e-10);
        }
    }

    #[test]
    fn test_batch_broadcast_single_kernel() {
        let n = 8;
        let kernel = {
            let mut k = vec![0.0; n];
            k[0] = 1.0;
            SignalTensor::from_vec(k)
        };
        let batch = SignalTensor::new((0..3 * n).map(|i| i as f64).collect(), vec![3, n]).unwrap();

        let result = circular_conv_batch(&batch, &kernel, Axis::Last).unwrap();
        assert_eq!(result.shape, vec![3, n]);
        for (r, x) in result.data.iter().zip(batch.data.iter()) {
            assert!((r - x).abs() < 1e-9);
        }
    }

    #[test]
    fn test_batch_lane_mismatch() {
        let a = SignalTensor::zeros(vec![3, 8]);
        let b = SignalTensor::zeros(vec![2, 8]);
        assert!(matches!(
            circular_conv_batch(&a, &b, Axis::Last),
            Err(DspError::Type(TypeError::ShapeMismatch { .. }))
        ));
    }

    #[test]
    fn test_batch_first_axis_matches_per_column() {
        let n = 8;
        let lanes = 3;
        // Shape [n, lanes]: each column is an independent signal.
        let data: Vec<f64> = (0..n * lanes).map(|i| ((i * 5 % 11) as f64).cos()).collect();
        let x = SignalTensor::new(data.clone(), vec![n, lanes]).unwrap();
        let kernel: Vec<f64> = (0..n).map(|i| (-(i as f64) * 0.3).exp()).collect();

        let out =
            circular_conv_batch(&x, &SignalTensor::from_vec(kernel.clone()), Axis::First).unwrap();
        assert_eq!(out.shape, vec![n, lanes]);

        for j in 0..lanes {
            let column: Vec<f64> = (0..n).map(|i| data[i * lanes + j]).collect();
            let single = circular_conv(&column, &kernel).unwrap();
            for i in 0..n {
                assert!((out.data[i * lanes + j] - single[i]).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_corr_batch_first_axis_zero_lag_energy() {
        let n = 8;
        let lanes = 5; // above the parallel threshold
        let data: Vec<f64> = (0..n * lanes).map(|i| ((i * 3 % 7) as f64) - 3.0).collect();
        let x = SignalTensor::new(data.clone(), vec![n, lanes]).unwrap();

        let out = circular_corr_batch(&x, &x, Axis::First).unwrap();
        assert_eq!(out.shape, vec![n, lanes]);

        // Zero-lag autocorrelation of each column equals its energy.
        for j in 0..lanes {
            let energy: f64 = (0..n).map(|i| data[i * lanes + j].powi(2)).sum();
            assert!((out.data[j] - energy).abs() < 1e-9);
        }
    }

    #[test]
    fn test_parallel_batch_matches_sequential() {
        let n = 16;
        let lanes = 12; // above the parallel threshold
        let data: Vec<f64> = (0..lanes * n).map(|i| ((i * 7 % 13) as f64).sin()).collect();
        let batch = SignalTensor::new(data, vec![lanes, n]).unwrap();
        let kernel: Vec<f64> = (0..n).map(|i| (-(i as f64) * 0.4).exp()).collect();

        let convolver = CircularConvolver::new(&kernel).unwrap();
        let parallel = convolver.convolve_rows(&batch, Axis::Last).unwrap();

        for i in 0..lanes {
            let single = circular_conv(batch.row(i), &kernel).unwrap();
            for (p, s) in parallel.row(i).iter().zip(single.iter()) {
                assert!((p - s).abs() < 1e-10);
            }
        }
    }
}
