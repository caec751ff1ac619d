//! FFT/IFFT operations using rustfft.
//!
//! A high-level wrapper around rustfft and realfft with planner caching and
//! convenience methods for real and complex transforms. Circular operations
//! run at the caller's domain length N, which is not generally a power of
//! two, so plans are created for arbitrary lengths.
//!
//! Inverse transforms are normalized by 1/N, so `ifft(fft(x)) == x` and
//! `irfft(rfft(x), n) == x`.

use crate::error::{DspError, DspResult};
use num_complex::Complex64;
use realfft::RealFftPlanner;
use rustfft::FftPlanner;

/// FFT engine with cached planners.
pub struct FftEngine {
    /// Complex FFT planner.
    complex_planner: FftPlanner<f64>,

    /// Real FFT planner.
    real_planner: RealFftPlanner<f64>,
}

impl FftEngine {
    /// Create a new FFT engine.
    pub fn new() -> Self {
        Self {
            complex_planner: FftPlanner::new(),
            real_planner: RealFftPlanner::new(),
        }
    }

    /// Perform forward FFT on complex data in-place.
    pub fn fft_inplace(&mut self, data: &mut [Complex64]) {
        let fft = self.complex_planner.plan_fft_forward(data.len());
        fft.process(data);
    }

    /// Perform inverse FFT on complex data in-place, normalized by 1/N.
    pub fn ifft_inplace(&mut self, data: &mut [Complex64]) {
        let len = data.len();
        let fft = self.complex_planner.plan_fft_inverse(len);
        fft.process(data);

        let scale = 1.0 / len.max(1) as f64;
        for x in data.iter_mut() {
            *x *= scale;
        }
    }

    /// Perform forward FFT on complex data, returning a new buffer.
    pub fn fft(&mut self, data: &[Complex64]) -> Vec<Complex64> {
        let mut result = data.to_vec();
        self.fft_inplace(&mut result);
        result
    }

    /// Perform inverse FFT on complex data, returning a new buffer.
    pub fn ifft(&mut self, data: &[Complex64]) -> Vec<Complex64> {
        let mut result = data.to_vec();
        self.ifft_inplace(&mut result);
        result
    }

    /// Perform forward real-to-complex FFT.
    ///
    /// Input: N real samples.
    /// Output: N/2 + 1 complex samples (Hermitian symmetry exploited).
    pub fn rfft(&mut self, data: &[f64]) -> DspResult<Vec<Complex64>> {
        let len = data.len();
        if len == 0 {
            return Err(DspError::InsufficientData { needed: 1, got: 0 });
        }

        let r2c = self.real_planner.plan_fft_forward(len);
        let mut input = data.to_vec();
        let mut output = r2c.make_output_vec();

        r2c.process(&mut input, &mut output)
            .map_err(|e| DspError::NumericalInstability(e.to_string()))?;

        Ok(output)
    }

    /// Perform inverse complex-to-real FFT, normalized by 1/N.
    ///
    /// Input: N/2 + 1 complex samples.
    /// Output: N real samples.
    pub fn irfft(&mut self, data: &[Complex64], output_len: usize) -> DspResult<Vec<f64>> {
        if output_len == 0 {
            return Err(DspError::InsufficientData { needed: 1, got: 0 });
        }

        let expected_input_len = output_len / 2 + 1;
        if data.len() != expected_input_len {
            return Err(DspError::LengthMismatch {
                expected: expected_input_len,
                actual: data.len(),
            });
        }

        let c2r = self.real_planner.plan_fft_inverse(output_len);
        let mut input = data.to_vec();

        // The DC bin (and the Nyquist bin for even lengths) of a real
        // signal's spectrum is real; drop any residual imaginary part so
        // the inverse transform accepts constructed spectra.
        input[0].im = 0.0;
        if output_len % 2 == 0 {
            if let Some(last) = input.last_mut() {
                last.im = 0.0;
            }
        }

        let mut output = c2r.make_output_vec();

        c2r.process(&mut input, &mut output)
            .map_err(|e| DspError::NumericalInstability(e.to_string()))?;

        let scale = 1.0 / output_len as f64;
        for x in output.iter_mut() {
            *x *= scale;
        }

        Ok(output)
    }
}

impl Default for FftEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_fft_ifft_roundtrip() {
        let mut engine = FftEngine::new();

        let n = 48; // deliberately not a power of 2
        let signal: Vec<Complex64> = (0..n)
            .map(|i| {
                let t = i as f64 / n as f64;
                Complex64::new((2.0 * PI * 3.0 * t).sin(), 0.0)
            })
            .collect();

        let spectrum = engine.fft(&signal);
        let recovered = engine.ifft(&spectrum);

        for (orig, rec) in signal.iter().zip(recovered.iter()) {
            assert!((orig.re - rec.re).abs() < 1e-10);
            assert!((orig.im - rec.im).abs() < 1e-10);
        }
    }

    #[test]
    fn test_rfft_irfft_roundtrip_odd_length() {
        let mut engine = FftEngine::new();

        let n = 25;
        let signal: Vec<f64> = (0..n)
            .map(|i| {
                let t = i as f64 / n as f64;
                (2.0 * PI * 4.0 * t).sin() + 0.5
            })
            .collect();

        let spectrum = engine.rfft(&signal).unwrap();
        assert_eq!(spectrum.len(), n / 2 + 1);

        let recovered = engine.irfft(&spectrum, n).unwrap();
        for (orig, rec) in signal.iter().zip(recovered.iter()) {
            assert!((orig - rec).abs() < 1e-10);
        }
    }

    #[test]
    fn test_irfft_length_contract() {
        let mut engine = FftEngine::new();
        let spectrum = vec![Complex64::new(1.0, 0.0); 4];

        let result = engine.irfft(&spectrum, 10);
        assert!(matches!(
            result,
            Err(DspError::LengthMismatch {
                expected: 6,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_rfft_empty_input() {
        let mut engine = FftEngine::new();
        assert!(matches!(
            engine.rfft(&[]),
            Err(DspError::InsufficientData { needed: 1, got: 0 })
        ));
    }
}
