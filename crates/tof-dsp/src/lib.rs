//! # tof-dsp
//!
//! Circular signal-processing core for ToF-Kernel time-of-flight imaging.
//!
//! This crate provides the numerical primitives for periodic 1-D signals:
//!
//! - **FFT/IFFT**: Fourier transforms for frequency-domain operations
//! - **Circular Convolution/Correlation**: FFT-based periodic transforms
//! - **Smoothing Windows**: normalized zero-phase kernels and their application
//! - **Circulant Matrices**: full shift-matrix expansion of a kernel
//! - **Resampling**: band-limited sinc interpolation along an axis
//! - **Pulse Synthesis**: Gaussian and exponentially-modified-Gaussian pulses
//!   with periodic wraparound, plus randomized parameter sampling

pub mod circulant;
pub mod circular;
pub mod error;
pub mod fft;
pub mod pulse;
pub mod resample;
pub mod window;

pub use circulant::{circulant_cols, circulant_rows, ShiftDirection};
pub use circular::{
    circular_conv, circular_conv_batch, circular_corr, circular_corr_batch, CircularConvolver,
};
pub use error::{DspError, DspResult};
pub use fft::FftEngine;
pub use pulse::{
    expgaussian_pulse_conv, expgaussian_pulse_erfc, gaussian_pulse, normalize_signal,
    random_expgaussian_pulse_params, random_gaussian_pulse_params, standardize_signal,
};
pub use resample::sinc_interp;
pub use window::{smooth, smooth_tensor, smoothing_window, WindowKind};
