//! The radix-factorization helper plan construction drives itself from.
//!
//! Grounded on the teacher's `setup.rs::factorize`/`factorize_radix2`
//! (generalized here to the full `{2..=10}` radix set spec §4.1 names).
//!
//! This module used to also own a precomputed `TwiddleTable` type; the
//! radix stage (`kernel::radix::RadixDeltas`) instead derives its twiddles
//! incrementally at construction time, following the teacher's own
//! `GenericDifKernel`, so that table was never read by anything and has
//! been removed. The `twiddle` reference function below survives only as
//! the shared naive-DFT oracle several modules' test suites check against.

/// Allowed fixed radices, largest first — plan construction strips from the
/// top of this list down, per spec §4.1 step 2 ("greedily strip radices
/// from the *largest* allowed radix downward").
pub const RADICES: [usize; 9] = [10, 9, 8, 7, 6, 5, 4, 3, 2];

/// Factorizes `n` into the radix set `{2,3,4,5,6,7,8,9,10}`, largest radix
/// first, greedily. Returns `(radices, remainder)`; `remainder == 1` iff
/// `n` factors completely into the small radix set. A `remainder > 1` is
/// the "residual factor" spec §4.1/§9 talks about switching to Bluestein
/// for.
pub fn factorize_small_radix(mut n: usize) -> (Vec<usize>, usize) {
    let mut radices = Vec::new();
    'outer: while n > 1 {
        for &r in RADICES.iter() {
            if n % r == 0 {
                radices.push(r);
                n /= r;
                continue 'outer;
            }
        }
        break;
    }
    (radices, n)
}

/// A single exact twiddle factor `exp(direction * 2*pi*i*k/n)`.
///
/// The four cardinal angles (`k/n` a multiple of 1/4) are special-cased to
/// exact `+-1`/`0` components, per spec §4.1: "the four cardinal positions
/// (0, N/4, N/2, 3N/4) are written as exact +-1/0 to avoid drift."
///
/// Test-only: the radix stage computes its own twiddles incrementally
/// (`kernel::radix::RadixDeltas`) rather than through this function; it is
/// kept solely as the shared naive-DFT reference several modules' test
/// suites use, so it (and the `Complex`/`num_traits` imports it needs) are
/// gated out of non-test builds entirely rather than left as unused
/// production surface.
#[cfg(test)]
pub fn twiddle<T: crate::Num>(k: i64, n: usize, inverse: bool) -> num_complex::Complex<T> {
    use num_complex::Complex;
    use num_traits::{FloatConst, One, Zero};

    let n = n as i64;
    debug_assert!(n > 0);
    // Normalize k into [0, n).
    let k = ((k % n) + n) % n;
    let quarter = n / 4;
    let has_quarter = n % 4 == 0;
    if has_quarter {
        if k == 0 {
            return Complex::new(T::one(), T::zero());
        } else if k == quarter {
            return if inverse {
                Complex::new(T::zero(), T::one())
            } else {
                Complex::new(T::zero(), -T::one())
            };
        } else if k == quarter * 2 {
            return Complex::new(-T::one(), T::zero());
        } else if k == quarter * 3 {
            return if inverse {
                Complex::new(T::zero(), -T::one())
            } else {
                Complex::new(T::zero(), T::one())
            };
        }
    } else if k == 0 {
        return Complex::new(T::one(), T::zero());
    } else if n % 2 == 0 && k == n / 2 {
        return Complex::new(-T::one(), T::zero());
    }
    let sign = if inverse { T::one() } else { -T::one() };
    let angle = sign * T::from(2).unwrap() * T::PI() * T::from(k).unwrap() / T::from(n).unwrap();
    Complex::new(angle.cos(), angle.sin())
}
