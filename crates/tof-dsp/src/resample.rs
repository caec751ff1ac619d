//! Band-limited resampling via frequency-domain zero-padding/truncation.
//!
//! Equivalent to classical sinc interpolation for uniformly sampled periodic
//! signals: the spectrum is padded (upsampling) or truncated (downsampling)
//! and inverse-transformed at the target length. No ratio constraint is
//! imposed; any target length is valid.

use crate::error::{DspError, DspResult};
use crate::fft::FftEngine;
use num_complex::Complex64;
use tof_types::{Axis, SignalTensor};

/// Resample one lane to `target_n` samples.
///
/// The retained Nyquist bin is halved when upsampling from an even length
/// and doubled when downsampling to an even length, so that the real part
/// of the folded spectrum is preserved.
fn resample_lane(engine: &mut FftEngine, x: &[f64], target_n: usize) -> DspResult<Vec<f64>> {
    let n = x.len();
    let spectrum = engine.rfft(x)?;

    let nf_out = target_n / 2 + 1;
    let mut out_spec = vec![Complex64::new(0.0, 0.0); nf_out];

    let n_min = n.min(target_n);
    let nyq = n_min / 2 + 1;
    out_spec[..nyq].copy_from_slice(&spectrum[..nyq]);

    if n_min % 2 == 0 {
        if target_n < n {
            out_spec[n_min / 2] *= 2.0;
        } else if target_n > n {
            out_spec[n_min / 2] *= 0.5;
        }
    }

    let mut y = engine.irfft(&out_spec, target_n)?;
    let scale = target_n as f64 / n as f64;
    for v in y.iter_mut() {
        *v *= scale;
    }
    Ok(y)
}

/// Resample a signal to `target_n` samples along the chosen axis using
/// band-limited (sinc) interpolation.
///
/// Each lane along the non-signal axes is resampled independently; the
/// output shape equals the input shape with the signal axis replaced by
/// `target_n`.
///
/// # Errors
///
/// Returns [`DspError::InsufficientData`] when the signal axis or the target
/// length is empty.
pub fn sinc_interp(
    signal: &SignalTensor,
    target_n: usize,
    axis: Axis,
) -> DspResult<SignalTensor> {
    let n = signal.signal_len(axis);
    if n == 0 {
        return Err(DspError::InsufficientData { needed: 1, got: 0 });
    }
    if target_n == 0 {
        return Err(DspError::InsufficientData { needed: 1, got: 0 });
    }

    let lanes = signal.num_lanes(axis);
    tracing::debug!("sinc_interp: {} -> {} samples, {} lanes", n, target_n, lanes);

    let mut out_shape = signal.shape.clone();
    match axis {
        Axis::First => out_shape[0] = target_n,
        Axis::Last => *out_shape.last_mut().expect("validated non-empty shape") = target_n,
    }

    let mut engine = FftEngine::new();
    let mut output = SignalTensor::zeros(out_shape);

    match axis {
        Axis::Last => {
            for (i, row) in signal.vectorize(Axis::Last).rows().enumerate() {
                let resampled = resample_lane(&mut engine, row, target_n)?;
                output.data[i * target_n..(i + 1) * target_n].copy_from_slice(&resampled);
            }
        }
        Axis::First => {
            // Lanes are strided columns of the [n, lanes] layout.
            let mut lane_buf = vec![0.0; n];
            for j in 0..lanes {
                for i in 0..n {
                    lane_buf[i] = signal.data[i * lanes + j];
                }
                let resampled = resample_lane(&mut engine, &lane_buf, target_n)?;
                for (i, &v) in resampled.iter().enumerate() {
                    output.data[i * lanes + j] = v;
                }
            }
        }
    }

    Ok(output)
}
