//! 1D real DFT plan (spec §3 "Plan (1D real, even N)", §4.4 "Real plan —
//! execute"): a length-`N/2` complex plan plus the repack stage from
//! `kernel::realpack`.
//!
//! The teacher's own real-FFT path (`setup.rs`'s `Setup::new` with
//! `DataFormat::Real*`) is an `unimplemented!()` stub — see
//! `kernel/realpack.rs`'s module docs — so this is built directly from
//! spec §4.4/§6.3 on top of the already-grounded complex [`Plan`] and
//! [`kernel::realpack`] primitives, following the same ownership shape
//! (an owned inner plan, an owned twiddle table, read-only after
//! construction) as the complex plan.

use crate::error::{PlanError, Result};
use crate::kernel::realpack::{pack_forward, pack_inverse, RealPackTable};
use crate::plan::{Order, Plan};
use crate::stage::Direction;
use crate::Num;
use num_complex::Complex;
use num_traits::Zero;

/// The two real-spectrum packing conventions spec §6.3 defines bit-exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackFormat {
    /// `N/2 + 1` complex bins; DC and Nyquist each occupy their own
    /// (real-valued) bin.
    Ccs,
    /// `N/2` complex bins; DC and Nyquist share bin 0 (`Y[0].re = DC`,
    /// `Y[0].im = Nyquist`).
    Perm,
}

pub struct RealPlan<T> {
    size: usize,
    format: PackFormat,
    inner: Plan<T>,
    table: RealPackTable<T>,
}

impl<T: Num> RealPlan<T> {
    pub fn new(size: usize, format: PackFormat, progressive_optimized: bool) -> Result<Self> {
        if size % 2 != 0 {
            return Err(PlanError::OddRealSize(size));
        }
        let inner = Plan::new(size / 2, Order::Normal, progressive_optimized)?;
        let table = RealPackTable::new(size);
        Ok(Self {
            size,
            format,
            inner,
            table,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn format(&self) -> PackFormat {
        self.format
    }

    /// Number of complex bins the packed spectrum occupies: `N/2+1` for
    /// CCs, `N/2` for Perm (spec §3).
    pub fn complex_size(&self) -> usize {
        match self.format {
            PackFormat::Ccs => self.size / 2 + 1,
            PackFormat::Perm => self.size / 2,
        }
    }

    /// Scratch, in `T` units, a caller must supply to [`RealPlan::execute`].
    /// Reuses the inner complex plan's scratch plus one length-`N/2`
    /// complex bounce buffer the repack stage reads/writes through (the
    /// repack stage is defined in terms of a separate source and
    /// destination; see `kernel::realpack`).
    pub fn temp_size(&self) -> usize {
        self.inner.temp_size() + self.size
    }

    /// Forward: `input` holds `size` real samples; `out` receives
    /// `complex_size() * 2` interleaved complex values.
    pub fn execute_forward(&self, out: &mut [T], input: &[T], scratch: &mut [T]) {
        debug_assert_eq!(input.len(), self.size);
        debug_assert_eq!(out.len(), self.complex_size() * 2);
        debug_assert!(scratch.len() >= self.temp_size());

        let half = self.size / 2;
        let (inner_scratch, bounce) = scratch.split_at_mut(self.inner.temp_size());
        let mut complex_out = vec![Complex::new(T::zero(), T::zero()); half];

        self.inner.execute(
            Direction::Forward,
            bounce,
            input,
            if self.inner.temp_size() > 0 { Some(inner_scratch) } else { None },
        );
        for (k, c) in complex_out.iter_mut().enumerate() {
            *c = Complex::new(bounce[k * 2], bounce[k * 2 + 1]);
        }

        let mut packed = vec![Complex::new(T::zero(), T::zero()); self.complex_size()];
        pack_forward(self.size, &self.table, self.format, &complex_out, &mut packed);
        for (k, c) in packed.iter().enumerate() {
            out[k * 2] = c.re;
            out[k * 2 + 1] = c.im;
        }
    }

    /// Inverse: `input` holds `complex_size() * 2` interleaved complex
    /// values; `out` receives `size` real samples, unscaled (the caller
    /// divides by `size` for an orthonormal round trip, matching the
    /// complex plan's convention).
    pub fn execute_inverse(&self, out: &mut [T], input: &[T], scratch: &mut [T]) {
        debug_assert_eq!(input.len(), self.complex_size() * 2);
        debug_assert_eq!(out.len(), self.size);
        debug_assert!(scratch.len() >= self.temp_size());

        let half = self.size / 2;
        let packed: Vec<Complex<T>> = input.chunks_exact(2).map(|c| Complex::new(c[0], c[1])).collect();
        let mut unpacked = vec![Complex::new(T::zero(), T::zero()); half];
        pack_inverse(self.size, &self.table, self.format, &packed, &mut unpacked);

        let (inner_scratch, bounce) = scratch.split_at_mut(self.inner.temp_size());
        for (k, c) in unpacked.iter().enumerate() {
            bounce[k * 2] = c.re;
            bounce[k * 2 + 1] = c.im;
        }
        self.inner.execute_in_place(
            Direction::Inverse,
            bounce,
            if self.inner.temp_size() > 0 { Some(inner_scratch) } else { None },
        );
        out.copy_from_slice(bounce);
    }
}
