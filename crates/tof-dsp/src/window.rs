//! Smoothing windows and their circular application.
//!
//! A smoothing window is a finite-support kernel of length `window_len`
//! embedded in a length-N buffer, circularly rolled so its peak sits at
//! index 0 (zero-phase for circular convolution) and L1-normalized to sum
//! to 1. [`smooth`] and [`smooth_tensor`] apply it through the circular
//! convolution primitives.

use crate::circular::{circular_conv, CircularConvolver};
use crate::error::{DspError, DspResult};
use std::f64::consts::PI;
use std::str::FromStr;
use tof_types::{Axis, SignalTensor, TypeError};

/// Smoothing-window shapes.
///
/// A closed enumeration: window selection is a compile-time concern, never
/// dispatched through strings at evaluation time. Use [`WindowKind::from_str`]
/// at configuration boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowKind {
    /// Moving average: `window_len` equal weights.
    Flat,

    /// Unit impulse at index 0; smoothing with it is the identity.
    Impulse,

    /// Hanning (raised cosine) window.
    Hanning,

    /// Hamming window.
    Hamming,

    /// Bartlett (triangular) window.
    Bartlett,

    /// Blackman window.
    Blackman,
}

impl WindowKind {
    /// All recognized window names.
    pub const ALL: [WindowKind; 6] = [
        WindowKind::Flat,
        WindowKind::Impulse,
        WindowKind::Hanning,
        WindowKind::Hamming,
        WindowKind::Bartlett,
        WindowKind::Blackman,
    ];

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            WindowKind::Flat => "flat",
            WindowKind::Impulse => "impulse",
            WindowKind::Hanning => "hanning",
            WindowKind::Hamming => "hamming",
            WindowKind::Bartlett => "bartlett",
            WindowKind::Blackman => "blackman",
        }
    }
}

impl FromStr for WindowKind {
    type Err = DspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WindowKind::ALL
            .iter()
            .find(|k| k.name() == s)
            .copied()
            .ok_or_else(|| DspError::UnsupportedWindowKind(s.to_string()))
    }
}

/// Evaluate a symmetric finite window shape of length `m`, peak at center.
fn window_shape(kind: WindowKind, m: usize) -> Vec<f64> {
    if m == 0 {
        return Vec::new();
    }
    if m == 1 {
        return vec![1.0];
    }

    let denom = (m - 1) as f64;
    let mut shape = Vec::with_capacity(m);

    match kind {
        WindowKind::Flat => shape.resize(m, 1.0),

        // Impulse ignores the support length entirely.
        WindowKind::Impulse => {
            shape.resize(m, 0.0);
            shape[0] = 1.0;
        }

        WindowKind::Hanning => {
            for i in 0..m {
                let x = i as f64 / denom;
                shape.push(0.5 - 0.5 * (2.0 * PI * x).cos());
            }
        }

        WindowKind::Hamming => {
            for i in 0..m {
                let x = i as f64 / denom;
                shape.push(0.54 - 0.46 * (2.0 * PI * x).cos());
            }
        }

        WindowKind::Bartlett => {
            let half = denom / 2.0;
            for i in 0..m {
                shape.push((half - (i as f64 - half).abs()) / half);
            }
        }

        WindowKind::Blackman => {
            for i in 0..m {
                let x = i as f64 / denom;
                shape.push(0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos());
            }
        }
    }

    shape
}

/// Build a normalized length-`n` smoothing window with support `window_len`.
///
/// The window shape fills the first `window_len` samples of a zero buffer
/// (impulse sets only index 0), the peak is circularly rolled to index 0,
/// and the buffer is divided by its sum.
///
/// # Errors
///
/// Returns [`DspError::InvalidWindowLength`] when `window_len > n`.
pub fn smoothing_window(n: usize, window_len: usize, kind: WindowKind) -> DspResult<Vec<f64>> {
    if n < window_len {
        return Err(DspError::InvalidWindowLength { window_len, n });
    }

    let mut w = vec![0.0; n];
    match kind {
        WindowKind::Impulse => {
            if !w.is_empty() {
                w[0] = 1.0;
            }
        }
        kind => {
            let shape = window_shape(kind, window_len);
            w[..window_len].copy_from_slice(&shape);
        }
    }

    // Roll the peak to index 0 so circular convolution is zero-phase.
    let shift = argmax(&w);
    w.rotate_left(shift);

    let sum: f64 = w.iter().sum();
    for x in w.iter_mut() {
        *x /= sum;
    }
    Ok(w)
}

/// Index of the first maximum value.
fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    let mut best_val = f64::NEG_INFINITY;
    for (i, &x) in v.iter().enumerate() {
        if x > best_val {
            best = i;
            best_val = x;
        }
    }
    best
}

/// Smooth a 1-D signal by circular convolution with a window.
///
/// Window support below 3 samples is a degenerate case and returns the input
/// unchanged. The convolution output is divided by the window sum even
/// though the window is already normalized at construction; downstream
/// calibration data bakes in both divisions, so the compounding must be
/// kept.
///
/// # Errors
///
/// Returns [`TypeError::DimensionMismatch`] for tensors of rank other than 1
/// and propagates window-construction errors.
pub fn smooth(x: &SignalTensor, window_len: usize, kind: WindowKind) -> DspResult<SignalTensor> {
    if x.ndim() != 1 {
        return Err(TypeError::DimensionMismatch {
            expected: 1,
            actual: x.ndim(),
        }
        .into());
    }
    if window_len < 3 {
        return Ok(x.clone());
    }

    let n = x.len();
    let w = smoothing_window(n, window_len, kind)?;
    let w_sum: f64 = w.iter().sum();

    let mut y = circular_conv(&x.data, &w)?;
    for v in y.iter_mut() {
        *v /= w_sum;
    }
    Ok(SignalTensor::from_vec(y))
}

/// Smooth every last-axis lane of a tensor with a shared window.
///
/// The window support is `trunc(window_duty * n)` samples where `n` is the
/// signal-axis length. Applies the same double normalization as [`smooth`].
///
/// # Errors
///
/// Returns [`DspError::InvalidWindowDuty`] when `window_duty` is outside the
/// open interval (0, 1).
pub fn smooth_tensor(
    x: &SignalTensor,
    window_duty: f64,
    kind: WindowKind,
) -> DspResult<SignalTensor> {
    if !(window_duty > 0.0 && window_duty < 1.0) {
        return Err(DspError::InvalidWindowDuty(window_duty));
    }

    let n = x.signal_len(Axis::Last);
    let window_len = (window_duty * n as f64) as usize;
    tracing::debug!(
        "smooth_tensor: n={}, window_len={}, kind={}",
        n,
        window_len,
        kind.name()
    );

    let w = smoothing_window(n, window_len, kind)?;
    let w_sum: f64 = w.iter().sum();

    let convolver = CircularConvolver::new(&w)?;
    let mut y = convolver.convolve_rows(&x.vectorize(Axis::Last), Axis::Last)?;
    for v in y.data.iter_mut() {
        *v /= w_sum;
    }
    Ok(y.unvectorize(x.shape.clone())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_window_reference_values() {
        let w = smoothing_window(10, 3, WindowKind::Flat).unwrap();
        let third = 1.0 / 3.0;
        let expected = [third, third, third, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        for (a, b) in w.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_window_normalized_with_peak_at_zero() {
        for kind in [
            WindowKind::Flat,
            WindowKind::Impulse,
            WindowKind::Hanning,
            WindowKind::Hamming,
            WindowKind::Bartlett,
            WindowKind::Blackman,
        ] {
            let w = smoothing_window(64, 11, kind).unwrap();
            let sum: f64 = w.iter().sum();
            assert!((sum - 1.0).abs() < 1e-10, "{:?} sum = {}", kind, sum);
            assert_eq!(argmax(&w), 0, "{:?} peak not rolled to index 0", kind);
        }
    }

    #[test]
    fn test_window_length_validation() {
        assert!(matches!(
            smoothing_window(5, 6, WindowKind::Hanning),
            Err(DspError::InvalidWindowLength { window_len: 6, n: 5 })
        ));
    }

    #[test]
    fn test_window_kind_parsing() {
        assert_eq!(WindowKind::from_str("hanning").unwrap(), WindowKind::Hanning);
        assert_eq!(WindowKind::from_str("flat").unwrap(), WindowKind::Flat);
        let err = WindowKind::from_str("kaiser").unwrap_err();
        assert!(matches!(err, DspError::UnsupportedWindowKind(_)));
        assert_eq!(err.to_string(), "unsupported smoothing window kind: kaiser");
    }

    #[test]
    fn test_degenerate_window_support_is_nan() {
        // Regression pin: a support-2 Hanning shape evaluates to all zeros,
        // so the sum normalization produces an all-NaN kernel instead of an
        // error. Callers are expected to guard support < 3 themselves.
        let w = smoothing_window(10, 2, WindowKind::Hanning).unwrap();
        assert_eq!(w.len(), 10);
        assert!(w.iter().all(|x| x.is_nan()));
    }

    #[test]
    fn test_impulse_window_is_identity_kernel() {
        let w = smoothing_window(16, 5, WindowKind::Impulse).unwrap();
        assert!((w[0] - 1.0).abs() < 1e-12);
        assert!(w[1..].iter().all(|&x| x.abs() < 1e-12));
    }

    #[test]
    fn test_smooth_short_window_is_identity() {
        let x = SignalTensor::from_vec(vec![1.0, 5.0, -2.0, 4.0]);
        let y = smooth(&x, 2, WindowKind::Hanning).unwrap();
        assert_eq!(y, x);
    }

    #[test]
    fn test_smooth_rejects_batched_input() {
        let x = SignalTensor::zeros(vec![2, 8]);
        assert!(matches!(
            smooth(&x, 3, WindowKind::Flat),
            Err(DspError::Type(TypeError::DimensionMismatch {
                expected: 1,
                actual: 2
            }))
        ));
    }

    #[test]
    fn test_smooth_preserves_constant_signal() {
        let x = SignalTensor::from_vec(vec![1.0; 32]);
        let y = smooth(&x, 7, WindowKind::Hanning).unwrap();
        for v in y.data.iter() {
            assert!((v - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_smooth_double_normalization_pinned() {
        // Regression pin: the output is conv(x, w) / sum(w) with w already
        // normalized. Both divisions are load-bearing for calibrated data.
        let x = SignalTensor::from_vec((0..16).map(|i| (i as f64 * 0.9).sin()).collect());
        let w = smoothing_window(16, 5, WindowKind::Hamming).unwrap();
        let w_sum: f64 = w.iter().sum();

        let mut expected = circular_conv(&x.data, &w).unwrap();
        for v in expected.iter_mut() {
            *v /= w_sum;
        }

        let y = smooth(&x, 5, WindowKind::Hamming).unwrap();
        for (a, b) in y.data.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_smooth_tensor_shape_and_duty() {
        let x = SignalTensor::new((0..40).map(|i| (i as f64).cos()).collect(), vec![2, 20]).unwrap();

        let y = smooth_tensor(&x, 0.25, WindowKind::Hanning).unwrap();
        assert_eq!(y.shape, vec![2, 20]);

        assert!(matches!(
            smooth_tensor(&x, 1.0, WindowKind::Hanning),
            Err(DspError::InvalidWindowDuty(_))
        ));
        assert!(matches!(
            smooth_tensor(&x, 0.0, WindowKind::Hanning),
            Err(DspError::InvalidWindowDuty(_))
        ));
    }

    #[test]
    fn test_smooth_tensor_matches_per_row_smooth() {
        let n = 20;
        let duty = 0.25;
        let window_len = (duty * n as f64) as usize;
        let data: Vec<f64> = (0..2 * n).map(|i| ((i % n) as f64 * 0.31).sin()).collect();
        let x = SignalTensor::new(data, vec![2, n]).unwrap();

        let batched = smooth_tensor(&x, duty, WindowKind::Blackman).unwrap();
        for i in 0..2 {
            let row = SignalTensor::from_vec(x.row(i).to_vec());
            let single = smooth(&row, window_len, WindowKind::Blackman).unwrap();
            for (a, b) in batched.row(i).iter().zip(single.data.iter()) {
                assert!((a - b).abs() < 1e-10);
            }
        }
    }
}
