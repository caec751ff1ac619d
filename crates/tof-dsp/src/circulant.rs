//! Circulant matrix construction.
//!
//! A circulant matrix expands an N-length kernel into the N×N linear map
//! whose application is circular convolution: each row (or column) is the
//! kernel circularly shifted one step further. Cost is O(N²); intended for
//! small kernels and for validating the FFT-based primitives against an
//! explicit matrix form.

/// Direction the kernel is shifted while filling successive rows/columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftDirection {
    /// Shift by +1 per step (elements move toward higher indices).
    Forward,
    /// Shift by -1 per step (elements move toward lower indices).
    Backward,
}

impl ShiftDirection {
    #[inline]
    fn step(self) -> isize {
        match self {
            ShiftDirection::Forward => 1,
            ShiftDirection::Backward => -1,
        }
    }
}

/// Circular shift of `f` by `shift` positions toward higher indices.
#[inline]
fn roll(f: &[f64], shift: isize) -> Vec<f64> {
    let n = f.len() as isize;
    let mut out = vec![0.0; f.len()];
    for (j, &v) in f.iter().enumerate() {
        let k = (j as isize + shift).rem_euclid(n) as usize;
        out[k] = v;
    }
    out
}

/// Build the circulant matrix whose row `i` is `roll(f, i * direction)`.
///
/// Row 0 is the kernel itself.
pub fn circulant_rows(f: &[f64], direction: ShiftDirection) -> Vec<Vec<f64>> {
    let step = direction.step();
    (0..f.len())
        .map(|i| roll(f, i as isize * step))
        .collect()
}

/// Build the circulant matrix whose column `i` is `roll(f, i * direction)`.
///
/// This is the transpose of [`circulant_rows`] for the same arguments.
pub fn circulant_cols(f: &[f64], direction: ShiftDirection) -> Vec<Vec<f64>> {
    let n = f.len();
    let step = direction.step();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        let col = roll(f, i as isize * step);
        for j in 0..n {
            matrix[j][i] = col[j];
        }
    }
    matrix
}
