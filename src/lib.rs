//! dft-engine
//! ==========
//!
//! A planner-and-executor for the discrete Fourier transform: mixed-radix
//! decomposition with Bluestein fallback for awkward lengths, real-packed
//! transforms, N-dimensional transforms built on a transpose primitive,
//! FFT-based convolution/correlation, and an overlap-save streaming filter.
//!
//! The crate is generic over the sample element type `T` (`f32` or `f64`)
//! via the [`Num`] trait, following the same pattern as most of the small
//! FFT libraries in the Rust ecosystem: one code path, monomorphized per
//! precision.
//!
//! A [`Plan`] is built once for a given transform length and reused across
//! many [`Plan::execute`] calls; it never allocates after construction.
//! Plans are read-only after construction and may be shared across threads
//! as long as each caller supplies its own scratch buffer (see the
//! concurrency notes on [`Plan::execute`]).

mod error;
mod twiddle;
mod stage;
mod kernel;
mod bluestein;
mod plan;
mod realplan;
mod transpose;
mod planmd;
mod convolve;
mod streaming;
mod cache;
mod dct;

use num_complex::Complex;
use std::fmt::Debug;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

pub use error::PlanError;
pub use plan::{Disposition, Order, Plan, Progressive};
pub use realplan::{PackFormat, RealPlan};
pub use planmd::{PlanMd, RealPlanMd};
pub use convolve::{autocorrelate, convolve, correlate};
pub use streaming::ConvolveFilter;
pub use cache::DftCache;
pub use dct::DctPlan;
pub use stage::Direction;

/// Bound satisfied by the sample element types the engine supports (`f32`, `f64`).
///
/// This mirrors the bound the teacher library (`yfft::Num`) settled on: just
/// enough `num_traits`/`std::ops` surface to do complex arithmetic and
/// transcendental twiddle-factor generation generically over precision.
pub trait Num:
    Clone
    + Copy
    + Debug
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + num_traits::Float
    + num_traits::FloatConst
    + num_traits::Zero
    + num_traits::One
    + Send
    + Sync
    + 'static
{
}

impl<T> Num for T where
    T: Clone
        + Copy
        + Debug
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
        + num_traits::Float
        + num_traits::FloatConst
        + num_traits::Zero
        + num_traits::One
        + Send
        + Sync
        + 'static
{
}

/// Reads a complex sample out of an interleaved `(re, im)` pair at `x[0..2]`.
#[inline]
pub(crate) fn complex_from_slice<T: Num>(x: &[T]) -> Complex<T> {
    Complex::new(x[0], x[1])
}

/// Writes a complex sample into an interleaved `(re, im)` pair at `x[0..2]`.
#[inline]
pub(crate) fn write_complex<T: Num>(x: &mut [T], c: Complex<T>) {
    x[0] = c.re;
    x[1] = c.im;
}

/// Multiplies `c` by `i` (rotate by +90 degrees) without a full complex multiply.
#[inline]
pub(crate) fn mul_pos_i<T: Num>(c: Complex<T>) -> Complex<T> {
    Complex::new(-c.im, c.re)
}

/// Multiplies `c` by `-i` (rotate by -90 degrees) without a full complex multiply.
#[inline]
pub(crate) fn mul_neg_i<T: Num>(c: Complex<T>) -> Complex<T> {
    Complex::new(c.im, -c.re)
}

/// The smallest power of two `>= x`.
pub(crate) fn next_power_of_two(x: usize) -> usize {
    if x <= 1 {
        1
    } else {
        1usize << (usize::BITS - (x - 1).leading_zeros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_pow2() {
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(2), 2);
        assert_eq!(next_power_of_two(3), 4);
        assert_eq!(next_power_of_two(17), 32);
        assert_eq!(next_power_of_two(1024), 1024);
    }

    #[test]
    fn rotation_helpers() {
        let c = Complex::new(1.0f64, 2.0);
        assert_eq!(mul_pos_i(c), Complex::new(-2.0, 1.0));
        assert_eq!(mul_neg_i(c), Complex::new(2.0, -1.0));
    }
}
