//! Radix-`r` decimation-in-frequency butterfly.
//!
//! Ground truth: teacher's `kernel/generic.rs::GenericDifKernel`. The
//! teacher baked the transform direction into the kernel at construction
//! time (a fresh `Setup` per `Options::inverse`); here the same
//! `twiddle_delta`/`coef_delta` values are precomputed once in the
//! *forward* sign convention and conjugated at call time when `inverse` is
//! set, so a single stage serves both directions (spec §3: "stages[forward],
//! stages[inverse] ... typically they are the same list executed with a
//! direction flag").
//!
//! This single algebraic form is correct for any `radix >= 2` (including
//! 2, 3, 4 ... 10); spec §9's Design Notes explicitly say not to replicate
//! the teacher's macro-heavy per-radix specialization table, so unlike the
//! teacher (whose `kernel/generic2.rs` hand-unrolls radix 2 and 4 for
//! speed) this crate uses one generic combine for every radix the plan
//! builder chooses; no separate small-size specialization module exists.
//!
//! All angles are computed once, by the plan builder, never inside these
//! functions — spec §6.1: "The core library MUST NOT call math functions
//! of the host language runtime directly inside hot paths."

use crate::{complex_from_slice, write_complex, Num};
use num_complex::Complex;
use num_iter::range_step;
use num_traits::{FloatConst, One, Zero};

/// Precomputed per-stage deltas a radix-`r` DIF pass needs. Stored in the
/// forward sign convention; `effective` conjugates them for the inverse
/// direction.
#[derive(Debug, Clone, Copy)]
pub struct RadixDeltas<T> {
    pub twiddle_delta: Complex<T>,
    pub coef_delta: Complex<T>,
}

impl<T: Num> RadixDeltas<T> {
    pub fn new(size: usize, radix: usize, unit: usize) -> Self {
        let two = T::from(2).unwrap();
        let twiddle_delta = Complex::new(
            T::zero(),
            -two * T::PI() * T::from(size / radix / unit).unwrap() / T::from(size).unwrap(),
        )
        .exp();
        let coef_delta = Complex::new(T::zero(), -two * T::PI() / T::from(radix).unwrap()).exp();
        Self {
            twiddle_delta,
            coef_delta,
        }
    }

    #[inline]
    pub fn effective(&self, inverse: bool) -> (Complex<T>, Complex<T>) {
        if inverse {
            (self.twiddle_delta.conj(), self.coef_delta.conj())
        } else {
            (self.twiddle_delta, self.coef_delta)
        }
    }
}

/// Generic radix-`r` DIF butterfly, algebraically correct for any `r >= 2`.
/// `data` holds `size` interleaved complex samples; `work_area` must have
/// room for `radix` complex samples (`radix * 2` elements of `T`).
pub fn radix_dif_butterfly<T: Num>(
    size: usize,
    radix: usize,
    unit: usize,
    deltas: &RadixDeltas<T>,
    inverse: bool,
    data: &mut [T],
    work_area: &mut [T],
) {
    debug_assert_eq!(data.len(), size * 2);
    debug_assert!(work_area.len() >= radix * 2);

    let (twiddle_delta, coef_delta) = deltas.effective(inverse);
    let wa = &mut work_area[0..radix * 2];

    for x in range_step(0, size, unit * radix) {
        let mut twiddle_1: Complex<T> = Complex::one();
        for y in 0..unit {
            for z in 0..radix {
                let c = complex_from_slice(&data[(x + y + z * unit) * 2..]);
                wa[z * 2] = c.re;
                wa[z * 2 + 1] = c.im;
            }
            let mut twiddle_2 = Complex::one();
            let mut coef_1 = Complex::one();
            for z in 0..radix {
                let mut acc: Complex<T> = Complex::zero();
                let mut coef_2 = twiddle_2;
                for w in 0..radix {
                    acc = acc + coef_2 * complex_from_slice(&wa[w * 2..]);
                    coef_2 = coef_2 * coef_1;
                }
                write_complex(&mut data[(x + y + z * unit) * 2..], acc);
                twiddle_2 = twiddle_2 * twiddle_1;
                coef_1 = coef_1 * coef_delta;
            }
            twiddle_1 = twiddle_1 * twiddle_delta;
        }
    }
}
