//! Real-FFT packing/unpacking stage: folds the length-`N/2` complex
//! transform of a reinterpreted real buffer into the half-spectrum ("CCs")
//! or packed ("Perm") format, and back.
//!
//! The *shape* of this stage — a small table of "twist" coefficients
//! derived once at construction, a loop folding symmetric bin pairs, and a
//! separate DC/Nyquist fixup — is grounded on the teacher's
//! `kernel/realfft.rs::RealFFTPrePostProcessKernel`. The exact per-bin
//! formulas, however, follow spec §4.1 and §6.3 verbatim (the teacher's
//! A/B coefficient-table framing computes something equivalent but not
//! textually traceable to CCs/Perm, since the teacher never implemented
//! real FFTs beyond a stub — `setup.rs` has `unimplemented!()` on the real
//! path). This is therefore new code built from the specification rather
//! than transcribed from a working teacher implementation, noted per the
//! grounding policy.

use crate::{Num, PackFormat};
use num_complex::Complex;
use num_traits::{FloatConst, Zero};

/// The `rtwiddle[k] = exp(-i*pi*(k + N/4) / (N/2))` table for `k` in
/// `[0, N/4]` inclusive, keyed by the *real* transform length `n`.
#[derive(Debug, Clone)]
pub struct RealPackTable<T> {
    rtwiddle: Vec<Complex<T>>,
}

impl<T: Num> RealPackTable<T> {
    pub fn new(n: usize) -> Self {
        debug_assert!(n % 2 == 0);
        let half = n / 2;
        let quarter = half / 2;
        let n_t = T::from(n).unwrap();
        let four = T::from(4).unwrap();
        let two = T::from(2).unwrap();
        let rtwiddle = (0..=quarter)
            .map(|k| {
                let angle = -T::PI() * (T::from(k).unwrap() + n_t / four) / (n_t / two);
                Complex::new(angle.cos(), angle.sin())
            })
            .collect();
        Self { rtwiddle }
    }
}

/// Forward repack: `x` is the length-`n/2` complex output of the inner
/// complex plan (run on the reinterpreted real input); `y` receives the
/// packed spectrum (`n/2 + 1` complex bins for CCs, `n/2` for Perm).
pub fn pack_forward<T: Num>(n: usize, table: &RealPackTable<T>, format: PackFormat, x: &[Complex<T>], y: &mut [Complex<T>]) {
    let half = n / 2;
    let quarter = half / 2;
    debug_assert_eq!(x.len(), half);

    let one_half = T::from(0.5).unwrap();

    for k in 1..=quarter {
        let fpk = x[k];
        let fpnk = x[half - k].conj();
        let f1k = fpk + fpnk;
        let f2k = (fpk - fpnk) * table.rtwiddle[k];
        y[k] = (f1k + f2k) * one_half;
        y[half - k] = ((f1k - f2k) * one_half).conj();
    }
    if half % 2 == 0 {
        y[quarter] = y[quarter].conj();
    }

    let dc = x[0];
    match format {
        PackFormat::Ccs => {
            y[0] = Complex::new(dc.re + dc.im, T::zero());
            y[half] = Complex::new(dc.re - dc.im, T::zero());
        }
        PackFormat::Perm => {
            y[0] = Complex::new(dc.re + dc.im, dc.re - dc.im);
        }
    }
}

/// Inverse repack: the algebraic inverse of [`pack_forward`]. `y` holds the
/// packed spectrum; `x` receives the length-`n/2` complex buffer to feed
/// into the inner complex plan's inverse transform.
pub fn pack_inverse<T: Num>(n: usize, table: &RealPackTable<T>, format: PackFormat, y: &[Complex<T>], x: &mut [Complex<T>]) {
    let half = n / 2;
    let quarter = half / 2;

    let mut y_center_fixed = if half % 2 == 0 { Some(y[quarter].conj()) } else { None };

    let one_half = T::from(0.5).unwrap();
    for k in 1..=quarter {
        let yk = if half % 2 == 0 && k == quarter {
            y_center_fixed.take().unwrap()
        } else {
            y[k]
        };
        let ynk = if half % 2 == 0 && k == quarter {
            yk
        } else {
            y[half - k]
        };

        let f1k = yk + ynk.conj();
        let f2k = yk - ynk.conj();
        let fpk = (f1k + f2k * table.rtwiddle[k].conj()) * one_half;
        let fpnk = (f1k - f2k * table.rtwiddle[k].conj()) * one_half;

        x[k] = fpk;
        x[half - k] = fpnk.conj();
    }

    let dc = match format {
        PackFormat::Ccs => Complex::new((y[0].re + y[half].re) * one_half, (y[0].re - y[half].re) * one_half),
        PackFormat::Perm => Complex::new((y[0].re + y[0].im) * one_half, (y[0].re - y[0].im) * one_half),
    };
    x[0] = dc;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_half_complex(n: usize, real: &[f64]) -> Vec<Complex<f64>> {
        // Direct O(n^2) half-spectrum reference: X[k] = sum_j real[j] * exp(-2pi i k j / n)
        (0..=n / 2)
            .map(|k| {
                let mut acc = Complex::new(0.0, 0.0);
                for (j, &r) in real.iter().enumerate() {
                    let angle = -2.0 * std::f64::consts::PI * (k as f64) * (j as f64) / n as f64;
                    acc += Complex::new(r, 0.0) * Complex::new(angle.cos(), angle.sin());
                }
                acc
            })
            .collect()
    }

    // Builds the length-n/2 complex sequence the repack stage consumes:
    // the DFT of the real samples reinterpreted as n/2 complex pairs.
    fn complex_view_dft(n: usize, real: &[f64]) -> Vec<Complex<f64>> {
        let half = n / 2;
        let pairs: Vec<Complex<f64>> = (0..half).map(|i| Complex::new(real[2 * i], real[2 * i + 1])).collect();
        (0..half)
            .map(|k| {
                let mut acc = Complex::new(0.0, 0.0);
                for (j, &p) in pairs.iter().enumerate() {
                    let angle = -2.0 * std::f64::consts::PI * (k as f64) * (j as f64) / half as f64;
                    acc += p * Complex::new(angle.cos(), angle.sin());
                }
                acc
            })
            .collect()
    }

    #[test]
    fn forward_ccs_matches_half_spectrum_reference() {
        let n = 8;
        let real: Vec<f64> = (0..n).map(|i| (i as f64) * 0.5 - 1.0).collect();
        let x = complex_view_dft(n, &real);
        let table = RealPackTable::<f64>::new(n);
        let mut y = vec![Complex::new(0.0, 0.0); n / 2 + 1];
        pack_forward(n, &table, PackFormat::Ccs, &x, &mut y);

        let expect = naive_half_complex(n, &real);
        for k in 0..=n / 2 {
            assert!((y[k] - expect[k]).norm() < 1e-9, "bin {k}: got {:?} want {:?}", y[k], expect[k]);
        }
    }

    #[test]
    fn dc_and_nyquist_are_real() {
        let n = 8;
        let real: Vec<f64> = vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let x = complex_view_dft(n, &real);
        let table = RealPackTable::<f64>::new(n);
        let mut y = vec![Complex::new(0.0, 0.0); n / 2 + 1];
        pack_forward(n, &table, PackFormat::Ccs, &x, &mut y);
        assert!(y[0].im.abs() < 1e-12);
        assert!(y[n / 2].im.abs() < 1e-12);
        for bin in &y {
            assert!((bin.re - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn forward_then_inverse_round_trips_ccs() {
        let n = 16;
        let real: Vec<f64> = (0..n).map(|i| ((i * 7 + 3) % 11) as f64 - 5.0).collect();
        let x = complex_view_dft(n, &real);
        let table = RealPackTable::<f64>::new(n);
        let mut y = vec![Complex::new(0.0, 0.0); n / 2 + 1];
        pack_forward(n, &table, PackFormat::Ccs, &x, &mut y);
        let mut x2 = vec![Complex::new(0.0, 0.0); n / 2];
        pack_inverse(n, &table, PackFormat::Ccs, &y, &mut x2);
        for k in 0..n / 2 {
            assert!((x[k] - x2[k]).norm() < 1e-9, "bin {k}: got {:?} want {:?}", x2[k], x[k]);
        }
    }

    #[test]
    fn forward_then_inverse_round_trips_perm() {
        let n = 16;
        let real: Vec<f64> = (0..n).map(|i| ((i * 3 + 1) % 13) as f64).collect();
        let x = complex_view_dft(n, &real);
        let table = RealPackTable::<f64>::new(n);
        let mut y = vec![Complex::new(0.0, 0.0); n / 2];
        pack_forward(n, &table, PackFormat::Perm, &x, &mut y);
        let mut x2 = vec![Complex::new(0.0, 0.0); n / 2];
        pack_inverse(n, &table, PackFormat::Perm, &y, &mut x2);
        for k in 0..n / 2 {
            assert!((x[k] - x2[k]).norm() < 1e-9, "bin {k}: got {:?} want {:?}", x2[k], x[k]);
        }
    }
}
