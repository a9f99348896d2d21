//! The closed `Stage` enum plan construction builds and execution dispatches
//! over.
//!
//! Grounded on spec §9's "Stage polymorphism without inheritance": the
//! teacher's `setup.rs` pushes `Box<dyn Kernel<T>>` trait objects into a
//! `Vec`, one heap allocation per stage. Here each stage is a plain enum
//! variant holding only small scalars and an owned table, dispatched with a
//! `match` instead of a vtable call. The real-repack stage from spec §4.1
//! is *not* one of these variants: spec §3 describes the real plan as "a
//! length-N/2 complex plan plus a final repack stage" layered on top, not a
//! member of the complex plan's own stage list, so it is implemented
//! directly in `realplan.rs` instead of folded in here.

use crate::bluestein::BluesteinStage;
use crate::kernel::bitreverse::apply_permutation;
use crate::kernel::radix::{radix_dif_butterfly, RadixDeltas};
use crate::Num;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

impl Direction {
    #[inline]
    pub fn is_inverse(self) -> bool {
        matches!(self, Direction::Inverse)
    }
}

/// One algorithmic pass over an N-complex-sample buffer.
pub enum Stage<T> {
    /// A radix-`r` DIF butterfly pass operating on the full `size`-element
    /// transform at the given `unit` (group stride). Spec §9's separate
    /// `Radix(r)`/`Final(r)` variants are merged here: the generic DIF
    /// combine (`kernel::radix::radix_dif_butterfly`) needs no distinct
    /// code path for the last pass in the chain, since the per-stage
    /// twiddle deltas already collapse to the identity once `unit` reaches
    /// `size / radix`.
    Radix {
        radix: usize,
        unit: usize,
        size: usize,
        deltas: RadixDeltas<T>,
    },
    /// Bit-reversal (power-of-two N) or digit-reversal (mixed-radix N)
    /// reorder, folded into one variant since both are the same
    /// precomputed-index-permutation operation (spec §4.1 "Reorder stage").
    Reorder { indices: Vec<usize> },
    /// Bluestein's algorithm (spec §4.1 "Bluestein stage").
    Bluestein(Box<BluesteinStage<T>>),
}

impl<T: Num> Stage<T> {
    /// Whether this stage may write its output aliased with its input.
    pub fn can_inplace(&self) -> bool {
        match self {
            Stage::Radix { .. } => true,
            Stage::Reorder { .. } => false,
            Stage::Bluestein(_) => false,
        }
    }

    /// The per-call scratch (in `T` units, i.e. `2 *` complex samples) this
    /// stage needs from the *front* portion of the plan's shared work area
    /// — distinct from the full-size `scratch_complex` tail the plan
    /// reserves for non-inplace stages to bounce through.
    pub fn own_work_size(&self) -> usize {
        match self {
            Stage::Radix { radix, .. } => radix * 2,
            Stage::Reorder { .. } => 0,
            Stage::Bluestein(b) => b.own_work_size(),
        }
    }

    /// Runs a `can_inplace` stage in place on `data`. Panics (via the
    /// `Stage::Reorder`/`Stage::Bluestein` arms never being reached here) if
    /// called on a non-inplace stage; the plan driver only calls this for
    /// stages whose `can_inplace()` is true.
    pub fn execute_inplace(&self, direction: Direction, data: &mut [T], work: &mut [T]) {
        match self {
            Stage::Radix {
                radix,
                unit,
                size,
                deltas,
            } => {
                radix_dif_butterfly(*size, *radix, *unit, deltas, direction.is_inverse(), data, work);
            }
            Stage::Reorder { .. } | Stage::Bluestein(_) => {
                unreachable!("non-inplace stage dispatched through execute_inplace")
            }
        }
    }

    /// Runs a non-inplace stage, reading from `src` and writing into `dst`
    /// — always genuinely separate buffers (the plan's disposition
    /// bookkeeping guarantees this, which is what lets these stages avoid
    /// any extra temporary copy of their own).
    pub fn execute_across(&self, direction: Direction, dst: &mut [T], src: &[T], work: &mut [T]) {
        match self {
            Stage::Radix { .. } => unreachable!("in-place stage dispatched through execute_across"),
            Stage::Reorder { indices } => apply_permutation(indices, dst, src),
            Stage::Bluestein(b) => b.execute(direction, dst, src, work),
        }
    }
}
