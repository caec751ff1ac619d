//! Gaussian and exponentially-modified-Gaussian pulse synthesis.
//!
//! Pulses are generated over a [`TimeDomain`] in batches of K parameter
//! sets and L1-normalized per batch row. The circular variants realize
//! periodic wraparound by evaluating over the 3N extended domain and folding
//! the three segments together, so a pulse centered near one boundary
//! reappears at the other.
//!
//! The EMG pulse comes in two formulations: a closed-form complementary-
//! error-function expression (non-wraparound) and a convolution of the
//! periodic Gaussian with an exponential-decay kernel (circularly correct).

use crate::circular::circular_conv_batch;
use crate::error::DspResult;
use rand::Rng;
use tof_types::{Axis, ExpGaussianParams, GaussianParams, Param, SignalTensor, TimeDomain};

/// L1-normalize each last-axis lane: every lane sums to 1.
pub fn normalize_signal(x: &SignalTensor) -> SignalTensor {
    let mut out = x.clone();
    normalize_rows(&mut out);
    out
}

/// Min-max standardize each last-axis lane into [0, 1].
pub fn standardize_signal(x: &SignalTensor) -> SignalTensor {
    let n = x.signal_len(Axis::Last);
    let mut out = x.clone();
    for lane in out.data.chunks_exact_mut(n.max(1)) {
        let min = lane.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = lane.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;
        for v in lane.iter_mut() {
            *v = (*v - min) / span;
        }
    }
    out
}

fn normalize_rows(x: &mut SignalTensor) {
    let n = x.signal_len(Axis::Last);
    for lane in x.data.chunks_exact_mut(n.max(1)) {
        let sum: f64 = lane.iter().sum();
        for v in lane.iter_mut() {
            *v /= sum;
        }
    }
}

/// Collapse a `[1, n]` batch to a 1-D tensor: single pulses come back as
/// plain signals.
fn squeeze(x: SignalTensor) -> SignalTensor {
    if x.ndim() > 1 && x.num_lanes(Axis::Last) == 1 {
        SignalTensor::from_vec(x.data)
    } else {
        x
    }
}

/// Generate K normalized Gaussian pulses over a domain.
///
/// `mu` sets the batch size K; `width` must carry either one value (shared)
/// or K values. With `circular` set, each pulse is evaluated over the
/// periodically extended domain and the three segments are folded together,
/// producing correct wraparound at the boundaries; otherwise pulses near a
/// boundary are simply truncated.
///
/// Each output row sums to 1. A K=1 batch is returned as a 1-D tensor.
///
/// # Errors
///
/// Returns `ShapeMismatch` when `width` has size other than 1 or K, and
/// `UnsupportedDomain` for a circular request on a negative domain.
pub fn gaussian_pulse(
    domain: &TimeDomain,
    mu: &Param,
    width: &Param,
    circular: bool,
) -> DspResult<SignalTensor> {
    let k = mu.len();
    let mus = mu.broadcast(k)?;
    let widths = width.broadcast(k)?;
    let n = domain.len();

    let mut data = Vec::with_capacity(k * n);
    if circular {
        let ext = domain.extended()?;
        for i in 0..k {
            let mut row = vec![0.0; n];
            for (j, &t) in ext.iter().enumerate() {
                let z = (t - mus[i]) / widths[i];
                row[j % n] += (-(z * z)).exp();
            }
            data.extend_from_slice(&row);
        }
    } else {
        for i in 0..k {
            for &t in domain.samples() {
                let z = (t - mus[i]) / widths[i];
                data.push((-(z * z)).exp());
            }
        }
    }

    let mut out = SignalTensor::new(data, vec![k, n])?;
    normalize_rows(&mut out);
    Ok(squeeze(out))
}

/// Closed-form exponentially-modified-Gaussian pulses via erfc.
///
/// Computes, per batch element,
/// `lambda * exp(0.5 * lambda * (lambda * sigma^2 + 2 * (mu - t)))
///  * erfc((mu - t + lambda * sigma^2) / sigma)`
/// and L1-normalizes each row. This analytic form does not wrap around the
/// domain boundaries; use [`expgaussian_pulse_conv`] when circular
/// correctness matters.
///
/// With `exp_lambda` absent this degenerates to the circular
/// [`gaussian_pulse`].
pub fn expgaussian_pulse_erfc(
    domain: &TimeDomain,
    mu: &Param,
    sigma: &Param,
    exp_lambda: Option<&Param>,
) -> DspResult<SignalTensor> {
    let Some(lambda) = exp_lambda else {
        return gaussian_pulse(domain, mu, sigma, true);
    };

    let k = mu.len();
    let mus = mu.broadcast(k)?;
    let sigmas = sigma.broadcast(k)?;
    let lambdas = lambda.broadcast(k)?;
    let n = domain.len();

    let mut data = Vec::with_capacity(k * n);
    for i in 0..k {
        let sigma_sq = sigmas[i] * sigmas[i];
        let lambda_sigma_sq = lambdas[i] * sigma_sq;
        for &t in domain.samples() {
            let mu_minus_t = mus[i] - t;
            let gain = lambdas[i] * (0.5 * lambdas[i] * (lambda_sigma_sq + 2.0 * mu_minus_t)).exp();
            let erfc_input = (mu_minus_t + lambda_sigma_sq) / sigmas[i];
            data.push(gain * libm::erfc(erfc_input));
        }
    }

    let mut out = SignalTensor::new(data, vec![k, n])?;
    normalize_rows(&mut out);
    Ok(squeeze(out))
}

/// Convolution-form exponentially-modified-Gaussian pulses.
///
/// Builds the periodic Gaussian pulse and circularly convolves it with a
/// per-batch exponential-decay kernel `exp(-lambda * t)`, then
/// L1-normalizes. Because both factors are treated as periodic, this is the
/// circularly correct EMG construction.
///
/// With `exp_lambda` absent the Gaussian pulse is returned unchanged.
pub fn expgaussian_pulse_conv(
    domain: &TimeDomain,
    mu: &Param,
    sigma: &Param,
    exp_lambda: Option<&Param>,
) -> DspResult<SignalTensor> {
    let gauss = gaussian_pulse(domain, mu, sigma, true)?;
    let Some(lambda) = exp_lambda else {
        return Ok(gauss);
    };

    let kl = lambda.len();
    let lambdas = lambda.broadcast(kl)?;
    let n = domain.len();

    let mut decay = Vec::with_capacity(kl * n);
    for i in 0..kl {
        for &t in domain.samples() {
            decay.push((-lambdas[i] * t).exp());
        }
    }
    let decay = squeeze(SignalTensor::new(decay, vec![kl, n])?);

    let mut out = circular_conv_batch(&decay, &gauss, Axis::Last)?;
    normalize_rows(&mut out);
    Ok(squeeze(out))
}

/// Sample `n_samples` random Gaussian pulse parameter sets.
///
/// `mu` is uniform over `[0, tau)`; `sigma` is `dt` times an integer drawn
/// uniformly from `[min, max)`, defaulting to `(1, 10)`.
pub fn random_gaussian_pulse_params<R: Rng + ?Sized>(
    domain: &TimeDomain,
    min_max_sigma: Option<(u64, u64)>,
    n_samples: usize,
    rng: &mut R,
) -> GaussianParams {
    let (lo, hi) = min_max_sigma.unwrap_or((1, 10));
    let mu = (0..n_samples).map(|_| domain.tau() * rng.gen::<f64>()).collect();
    let sigma = (0..n_samples)
        .map(|_| domain.dt() * rng.gen_range(lo..hi) as f64)
        .collect();
    GaussianParams { mu, sigma }
}

/// Sample `n_samples` random exponentially-modified-Gaussian parameter sets.
///
/// Extends [`random_gaussian_pulse_params`] with
/// `exp_lambda = 1 / (dt * randint[min, max))`, defaulting to `(1, 50)`.
pub fn random_expgaussian_pulse_params<R: Rng + ?Sized>(
    domain: &TimeDomain,
    min_max_sigma: Option<(u64, u64)>,
    min_max_lambda: Option<(u64, u64)>,
    n_samples: usize,
    rng: &mut R,
) -> ExpGaussianParams {
    let GaussianParams { mu, sigma } =
        random_gaussian_pulse_params(domain, min_max_sigma, n_samples, rng);
    let (lo, hi) = min_max_lambda.unwrap_or((1, 50));
    let exp_lambda = (0..n_samples)
        .map(|_| 1.0 / (domain.dt() * rng.gen_range(lo..hi) as f64))
        .collect();
    ExpGaussianParams {
        mu,
        sigma,
        exp_lambda,
    }
}
