//! DCT-II (forward) / DCT-III (inverse) built on top of a real DFT plan
//! (spec §3.1 and §4.9 supplements).
//!
//! The reflection-and-rotate algorithm is the standard "DCT via a half-size
//! real FFT" identity; `original_source`'s `dct_plan` body wasn't retrieved
//! into the pack, so the per-bin reconstruction formula below is derived
//! directly rather than transcribed — see `DESIGN.md` for the derivation.
//! The forward direction follows the textbook identity directly. The
//! inverse direction needed an algebraic derivation (each DCT-II bin only
//! carries the real part of a rotated spectrum bin, so reconstructing the
//! bin's imaginary part for the inverse transform requires pairing `X[k]`
//! with `X[n-k]`): working through the real/imaginary components by hand
//! gives `Y[k] = 0.5 * exp(+iθ_k) * (X[k] - i*X[n-k])` for `k` in
//! `1..=N/2`, and `Y[0] = X[0]` (the `k=0` case degenerates since `X[n-0]`
//! is the same bin as `X[0]`, not a distinct partner).

use crate::error::{PlanError, Result};
use crate::realplan::{PackFormat, RealPlan};
use crate::Num;
use num_complex::Complex;
use num_traits::Zero;

pub struct DctPlan<T> {
    n: usize,
    inner: RealPlan<T>,
    /// `exp(-i * pi * k / (2n))` for `k` in `0..n`.
    twiddles: Vec<Complex<T>>,
}

impl<T: Num> DctPlan<T> {
    pub fn new(n: usize) -> Result<Self> {
        if n % 2 != 0 {
            return Err(PlanError::OddRealSize(n));
        }
        let inner = RealPlan::new(n, PackFormat::Ccs, false)?;
        let two_n = T::from(2 * n).unwrap();
        let twiddles = (0..n)
            .map(|k| {
                let theta = T::PI() * T::from(k).unwrap() / two_n;
                Complex::new(theta.cos(), -theta.sin())
            })
            .collect();
        Ok(Self { n, inner, twiddles })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    /// Scratch, in `T` units, a caller must supply to [`DctPlan::execute_forward`]/
    /// [`DctPlan::execute_inverse`]: the inner real plan's own scratch, plus a
    /// length-`n` permuted-signal buffer, plus the half-spectrum buffer.
    pub fn temp_size(&self) -> usize {
        self.inner.temp_size() + self.n + (self.n / 2 + 1) * 2
    }

    fn split_scratch<'a>(&self, scratch: &'a mut [T]) -> (&'a mut [T], &'a mut [T], &'a mut [T]) {
        let half_complex_len = (self.n / 2 + 1) * 2;
        let (inner_scratch, rest) = scratch.split_at_mut(self.inner.temp_size());
        let (y, freq) = rest.split_at_mut(self.n);
        (inner_scratch, y, &mut freq[..half_complex_len])
    }

    /// Forward DCT-II: `input` and `out` both hold `n` real samples.
    pub fn execute_forward(&self, out: &mut [T], input: &[T], scratch: &mut [T]) {
        debug_assert_eq!(input.len(), self.n);
        debug_assert_eq!(out.len(), self.n);
        debug_assert!(scratch.len() >= self.temp_size());

        let n = self.n;
        let half = n / 2;
        let (inner_scratch, y, freq) = self.split_scratch(scratch);

        for j in 0..half {
            y[j] = input[2 * j];
            y[n - 1 - j] = input[2 * j + 1];
        }
        self.inner.execute_forward(freq, y, inner_scratch);

        let two = T::one() + T::one();
        for k in 0..n {
            let yk = if k <= half {
                Complex::new(freq[2 * k], freq[2 * k + 1])
            } else {
                Complex::new(freq[2 * (n - k)], -freq[2 * (n - k) + 1])
            };
            out[k] = (yk * self.twiddles[k]).re * two;
        }
        out[0] /= two;
    }

    /// Inverse DCT-III: `input` and `out` both hold `n` real samples;
    /// `out` is unscaled (caller divides by `n` for an orthonormal round
    /// trip, matching the complex and real plans' convention).
    pub fn execute_inverse(&self, out: &mut [T], input: &[T], scratch: &mut [T]) {
        debug_assert_eq!(input.len(), self.n);
        debug_assert_eq!(out.len(), self.n);
        debug_assert!(scratch.len() >= self.temp_size());

        let n = self.n;
        let half = n / 2;
        let (inner_scratch, y, freq) = self.split_scratch(scratch);

        freq[0] = input[0];
        freq[1] = T::zero();
        let half_t = T::from(0.5).unwrap();
        for k in 1..=half {
            let w = self.twiddles[k].conj();
            let val = w * Complex::new(input[k], -input[n - k]) * half_t;
            freq[2 * k] = val.re;
            freq[2 * k + 1] = val.im;
        }

        self.inner.execute_inverse(y, freq, inner_scratch);

        for j in 0..half {
            out[2 * j] = y[j];
            out[2 * j + 1] = y[n - 1 - j];
        }
    }
}
