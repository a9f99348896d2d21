//! FFT-based linear convolution, correlation, and autocorrelation (spec
//! §4.7): convenience free functions built on a power-of-two-sized
//! [`Plan`], allocating freely (unlike the rest of the crate's hot paths).
//!
//! Grounded directly on `original_source`'s `kfr::convolve`/`correlate`/
//! `autocorrelate` (`include/kfr/dft/convolution.hpp`): zero-pad both
//! inputs to `next_power_of_two(len1 + len2 - 1)`, forward-DFT each
//! (correlation reverses the second input first), pointwise multiply,
//! inverse-DFT, divide by the FFT size, take the real part, and truncate.

use crate::plan::{Order, Plan};
use crate::stage::Direction;
use crate::{next_power_of_two, Num};
use num_complex::Complex;
use num_traits::{One, Zero};

fn padded_complex<T: Num>(x: &[T], size: usize) -> Vec<T> {
    let mut out = vec![T::zero(); size * 2];
    for (i, &v) in x.iter().enumerate() {
        out[i * 2] = v;
    }
    out
}

fn pointwise_mul<T: Num>(a: &mut [T], b: &[T]) {
    for (ca, cb) in a.chunks_exact_mut(2).zip(b.chunks_exact(2)) {
        let pa = Complex::new(ca[0], ca[1]);
        let pb = Complex::new(cb[0], cb[1]);
        let prod = pa * pb;
        ca[0] = prod.re;
        ca[1] = prod.im;
    }
}

/// Shared plumbing for `convolve`/`correlate`: zero-pad `a` and `b` (`b`
/// already reversed by the caller for correlation) to the convolution
/// size, forward-DFT both, multiply pointwise, inverse-DFT, and return the
/// real part truncated to `len_a + len_b - 1`.
fn fft_convolve_real<T: Num>(a: &[T], b: &[T]) -> Vec<T> {
    let out_len = a.len() + b.len() - 1;
    let size = next_power_of_two(out_len);
    let plan = Plan::<T>::new(size, Order::Normal, false).expect("convolution FFT size is always valid");
    let mut scratch = vec![T::zero(); plan.temp_size()];

    let mut fa = padded_complex(a, size);
    let mut fb = padded_complex(b, size);
    plan.execute_in_place(Direction::Forward, &mut fa, if plan.temp_size() > 0 { Some(&mut scratch) } else { None });
    plan.execute_in_place(Direction::Forward, &mut fb, if plan.temp_size() > 0 { Some(&mut scratch) } else { None });

    pointwise_mul(&mut fa, &fb);
    plan.execute_in_place(Direction::Inverse, &mut fa, if plan.temp_size() > 0 { Some(&mut scratch) } else { None });

    let inv_size = T::one() / T::from(size).unwrap();
    (0..out_len).map(|i| fa[i * 2] * inv_size).collect()
}

/// Linear convolution of `a` and `b`: `result[n] = sum_k a[k] * b[n-k]`,
/// length `a.len() + b.len() - 1`.
pub fn convolve<T: Num>(a: &[T], b: &[T]) -> Vec<T> {
    fft_convolve_real(a, b)
}

/// Cross-correlation of `a` and `b`: convolution of `a` with the
/// time-reversed `b`.
pub fn correlate<T: Num>(a: &[T], b: &[T]) -> Vec<T> {
    let reversed: Vec<T> = b.iter().rev().copied().collect();
    fft_convolve_real(a, &reversed)
}

/// Autocorrelation of `a`: the second (non-negative-lag) half of
/// `correlate(a, a)`.
pub fn autocorrelate<T: Num>(a: &[T]) -> Vec<T> {
    let full = correlate(a, a);
    full[full.len() / 2..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convolution_matches_literal_scenario() {
        // spec §8 literal scenario.
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [0.25, 0.5, 1.0, -2.0, 1.5];
        let expect = [0.25, 1.0, 2.75, 2.5, 3.75, 3.5, 1.5, -4.0, 7.5];
        let got = convolve(&a, &b);
        assert_eq!(got.len(), expect.len());
        for (g, e) in got.iter().zip(expect.iter()) {
            assert!((g - e).abs() < 1e-4, "got {g} want {e}");
        }
    }

    #[test]
    fn correlation_matches_literal_scenario() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [0.25, 0.5, 1.0, -2.0, 1.5];
        let expect = [1.5, 1.0, 1.5, 2.5, 3.75, -4.0, 7.75, 3.5, 1.25];
        let got = correlate(&a, &b);
        assert_eq!(got.len(), expect.len());
        for (g, e) in got.iter().zip(expect.iter()) {
            assert!((g - e).abs() < 1e-4, "got {g} want {e}");
        }
    }

    #[test]
    fn convolution_with_unit_impulse_is_identity() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let impulse = [1.0, 0.0, 0.0];
        let got = convolve(&a, &impulse);
        assert_eq!(got.len(), 6);
        for (i, &v) in a.iter().enumerate() {
            assert!((got[i] - v).abs() < 1e-9);
        }
    }

    #[test]
    fn autocorrelation_peaks_at_zero_lag() {
        let a = [1.0, -0.5, 2.0, 0.3, -1.2];
        let ac = autocorrelate(&a);
        let energy: f64 = a.iter().map(|v| v * v).sum();
        assert!((ac[0] - energy).abs() < 1e-6);
        for &v in &ac[1..] {
            assert!(v <= ac[0] + 1e-6);
        }
    }
}
