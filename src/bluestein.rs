//! Bluestein's algorithm (the "arblen" stage): expresses an arbitrary-length
//! DFT as a convolution computable by a power-of-two FFT, for lengths that
//! do not factor completely into the `{2..=10}` radix set.
//!
//! Grounded on the teacher's reference, `original_source`'s
//! `dft_arblen_stage_impl` (`include/kfr/dft/impl/dft-impl.hpp`): the chirp
//! table spans `2N-1` samples centered at index `N-1`, the inner plan is a
//! power-of-two plan of size `next_pow2(N) * 2` built with reordering
//! skipped (`dft_order::internal`), and `ichirpp_` is precomputed once, at
//! construction time, as the forward transform of the zero-padded
//! reciprocal chirp. Spec §4.1's "Bluestein stage" numbered steps 1-5 match
//! this implementation exactly; see there for the prose description.

use crate::error::Result;
use crate::plan::{Order, Plan};
use crate::stage::Direction;
use crate::{next_power_of_two, Num};
use num_complex::Complex;
use num_traits::{FloatConst, One, Zero};

pub struct BluesteinStage<T> {
    size: usize,
    fft_size: usize,
    /// `chirp[i] = exp(-i*pi*(i - (size-1))^2 / size)` for `i` in `0..2*size-1`,
    /// i.e. indexed so `chirp[size - 1 + k]` is the chirp for lag `k`.
    chirp: Vec<Complex<T>>,
    /// Forward DFT of the zero-padded reciprocal chirp, precomputed once.
    ichirp_fft: Vec<Complex<T>>,
    inner: Plan<T>,
    inv_fft_size: T,
}

impl<T: Num> BluesteinStage<T> {
    pub fn new(size: usize) -> Result<Self> {
        debug_assert!(size >= 2);
        let fft_size = next_power_of_two(size) * 2;
        let inner = Plan::new(fft_size, Order::Internal, false)?;

        let mut chirp = Vec::with_capacity(2 * size - 1);
        for i in 0..2 * size - 1 {
            let k = i as i64 - (size as i64 - 1);
            let n = T::from(size).unwrap();
            let angle = -T::PI() * T::from(k * k).unwrap() / n;
            chirp.push(Complex::new(angle.cos(), angle.sin()));
        }

        // Zero-pad the reciprocal of chirp's first `2*size - 1` samples out
        // to `fft_size` and forward-transform it once, up front.
        let mut ichirpp = vec![Complex::zero(); fft_size];
        for (i, c) in chirp.iter().enumerate() {
            ichirpp[i] = c.conj() / (c.norm_sqr());
        }
        let mut scratch = vec![T::zero(); inner.temp_size()];
        let flat_in: Vec<T> = ichirpp.iter().flat_map(|c| [c.re, c.im]).collect();
        let mut flat_out = vec![T::zero(); fft_size * 2];
        inner.execute(
            Direction::Forward,
            &mut flat_out,
            &flat_in,
            if inner.temp_size() > 0 { Some(&mut scratch) } else { None },
        );
        let ichirp_fft: Vec<Complex<T>> = flat_out.chunks_exact(2).map(|c| Complex::new(c[0], c[1])).collect();

        Ok(Self {
            size,
            fft_size,
            chirp,
            ichirp_fft,
            inner,
            inv_fft_size: T::one() / T::from(fft_size).unwrap(),
        })
    }

    /// Elements of `T` the plan driver must hand this stage via its shared
    /// work area; the Bluestein stage instead keeps its own two `fft_size`
    /// complex-sample scratch buffers (`xp`/`xp_fft`), since they must
    /// persist across the two inner-plan calls within one `execute` and
    /// cannot be the same transient `work_area` a radix pass borrows for a
    /// single butterfly group. Reported here as zero; the actual buffers
    /// live on `self` as the teacher's `xp`/`xp_fft` fields do.
    pub fn own_work_size(&self) -> usize {
        self.inner.temp_size() + self.fft_size * 2 * 2
    }

    pub fn execute(&self, direction: Direction, out: &mut [T], input: &[T], work: &mut [T]) {
        let n = self.size;
        debug_assert_eq!(out.len(), n * 2);
        debug_assert_eq!(input.len(), n * 2);

        let (inner_scratch, rest) = work.split_at_mut(self.inner.temp_size());
        let (xp_flat, xp_fft_flat) = rest.split_at_mut(self.fft_size * 2);

        let inverse = direction.is_inverse();
        for k in 0..n {
            let c = Complex::new(input[k * 2], input[k * 2 + 1]);
            let chirp = self.chirp[n - 1 + k];
            let chirp = if inverse { chirp.conj() } else { chirp };
            let prod = c * chirp;
            xp_flat[k * 2] = prod.re;
            xp_flat[k * 2 + 1] = prod.im;
        }
        for v in xp_flat[n * 2..].iter_mut() {
            *v = T::zero();
        }

        self.inner.execute(
            Direction::Forward,
            xp_fft_flat,
            xp_flat,
            if self.inner.temp_size() > 0 { Some(inner_scratch) } else { None },
        );

        for k in 0..self.fft_size {
            let xp_fft = Complex::new(xp_fft_flat[k * 2], xp_fft_flat[k * 2 + 1]);
            let factor = if inverse {
                self.ichirp_fft[k].conj()
            } else {
                self.ichirp_fft[k]
            };
            let prod = xp_fft * factor;
            xp_fft_flat[k * 2] = prod.re;
            xp_fft_flat[k * 2 + 1] = prod.im;
        }

        self.inner.execute(
            Direction::Inverse,
            xp_flat,
            xp_fft_flat,
            if self.inner.temp_size() > 0 { Some(inner_scratch) } else { None },
        );

        for k in 0..n {
            let v = Complex::new(xp_flat[(n - 1 + k) * 2], xp_flat[(n - 1 + k) * 2 + 1]);
            let chirp = self.chirp[n - 1 + k];
            let chirp = if inverse { chirp.conj() } else { chirp };
            let result = v * chirp * self.inv_fft_size;
            out[k * 2] = result.re;
            out[k * 2 + 1] = result.im;
        }
    }
}
