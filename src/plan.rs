//! The 1D complex DFT plan: stage-list construction, disposition
//! bookkeeping, and the (progressive or single-shot) execution driver.
//!
//! Grounded on the teacher's `setup.rs` (the `Setup::new` factorization
//! loop that picks a radix chain and appends a reorder kernel) for plan
//! *construction*, and on `lib.rs`'s top-level `Transformer::transform`
//! for the execution driver shape — reworked around a `Vec<Stage<T>>`
//! instead of `Vec<Box<dyn Kernel<T>>>` per spec §9.

use crate::error::{PlanError, Result};
use crate::kernel::bitreverse::digit_reversal_permutation;
use crate::kernel::radix::RadixDeltas;
use crate::stage::{Direction, Stage};
use crate::twiddle::factorize_small_radix;
use crate::Num;
use log::{debug, trace};

/// Largest transform length this crate accepts (spec §6.4: `size > 2^24` is
/// a construction-time logic error).
pub const MAX_SIZE: usize = 1 << 24;

/// Whether the final reorder stage runs (`Normal`) or is skipped, leaving
/// the output in digit-reversed order (`Internal`) — spec §6.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Normal,
    Internal,
}

/// Per-stage routing state: `disposition[k]` is `true` iff the data lives
/// in the plan's scratch buffer immediately *before* stage `k` runs;
/// `disposition[stages.len()]` is the location immediately *after* the
/// last stage. Computed once at construction (spec §4.1's "compute
/// dispositions" step) and replayed identically on every `execute` call.
///
/// This plan always normalizes an out-of-place request into a single
/// initial copy followed by in-place execution (see [`Plan::execute`]),
/// so — unlike spec §3's `disposition[forward|inverse][inplace|outofplace]`
/// — one table covers every call; see `DESIGN.md` for why.
pub type Disposition = Vec<bool>;

pub struct Plan<T> {
    size: usize,
    stages: Vec<Stage<T>>,
    disposition: Disposition,
    temp_size: usize,
    arblen: bool,
}

impl<T: Num> Plan<T> {
    pub fn new(size: usize, order: Order, progressive_optimized: bool) -> Result<Self> {
        if size == 0 {
            return Err(PlanError::ZeroSize);
        }
        if size > MAX_SIZE {
            return Err(PlanError::SizeTooLarge(size));
        }
        if size == 1 {
            // A length-1 transform is the identity; represent it as a
            // single trivial radix-1 pass so the stage list is never empty.
            let deltas = RadixDeltas::new(1, 1, 1);
            let stages = vec![Stage::Radix {
                radix: 1,
                unit: 1,
                size: 1,
                deltas,
            }];
            let disposition = build_disposition(&stages);
            return Ok(Self {
                size,
                disposition,
                temp_size: own_work_max(&stages),
                stages,
                arblen: false,
            });
        }

        let (radices, remainder) = factorize_small_radix(size);
        let (stages, arblen) = if remainder == 1 {
            debug!("dft plan size={size}: mixed-radix chain {radices:?}");
            (build_radix_chain(size, &radices, order), false)
        } else {
            debug!("dft plan size={size}: residual factor {remainder} after {radices:?}, using Bluestein");
            let bstage = crate::bluestein::BluesteinStage::new(size)?;
            (vec![Stage::Bluestein(Box::new(bstage))], true)
        };
        let _ = progressive_optimized; // see SPEC_FULL.md §9: currently a no-op, no kernel fusion to skip yet.

        let disposition = build_disposition(&stages);
        let needs_scratch_complex = disposition.iter().any(|&b| b);
        let temp_size = own_work_max(&stages) + if needs_scratch_complex { size * 2 } else { 0 };

        Ok(Self {
            size,
            stages,
            disposition,
            temp_size,
            arblen,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn temp_size(&self) -> usize {
        self.temp_size
    }

    pub fn arblen(&self) -> bool {
        self.arblen
    }

    /// Runs the full forward or inverse transform. `out` receives the
    /// result; `input` is read but left untouched only when it is not the
    /// same buffer as `out`. `scratch` must be at least [`Plan::temp_size`]
    /// elements, and may be omitted only when `temp_size() == 0`.
    pub fn execute(&self, direction: Direction, out: &mut [T], input: &[T], scratch: Option<&mut [T]>) {
        debug_assert_eq!(out.len(), self.size * 2);
        debug_assert_eq!(input.len(), self.size * 2);
        if out.as_ptr() != input.as_ptr() {
            out.copy_from_slice(input);
        }
        self.execute_in_place(direction, out, scratch);
    }

    /// Runs the transform in place on `data` directly, without the
    /// aliasing-detection copy [`Plan::execute`] performs first. Exposed
    /// crate-internally for composite plans (the real plan's repack->inner
    /// sequence, Bluestein's internal plan reuse) that already know their
    /// buffer is a private bounce area and want to skip the redundant copy.
    pub(crate) fn execute_in_place(&self, direction: Direction, data: &mut [T], scratch: Option<&mut [T]>) {
        let n2 = self.size * 2;
        let needs_scratch_complex = self.disposition.iter().any(|&b| b);
        debug_assert!(!needs_scratch_complex || scratch.as_ref().map_or(0, |s| s.len()) >= self.temp_size);

        let scratch_storage: &mut [T] = scratch.unwrap_or(&mut []);
        let split_at = if needs_scratch_complex { scratch_storage.len() - n2 } else { scratch_storage.len() };
        let (work_area, scratch_tail) = scratch_storage.split_at_mut(split_at);
        let mut scratch_complex: Option<&mut [T]> = if needs_scratch_complex { Some(scratch_tail) } else { None };

        for (k, stage) in self.stages.iter().enumerate() {
            let before_in_scratch = self.disposition[k];
            let own_work = stage.own_work_size();
            let work = &mut work_area[..own_work];
            if stage.can_inplace() {
                if before_in_scratch {
                    data.copy_from_slice(scratch_complex.as_ref().expect("scratch reserved"));
                }
                stage.execute_inplace(direction, data, work);
            } else if before_in_scratch {
                stage.execute_across(direction, data, scratch_complex.as_ref().expect("scratch reserved"), work);
            } else {
                stage.execute_across(direction, scratch_complex.as_mut().expect("scratch reserved"), data, work);
            }
        }

        if let Some(after_last) = self.disposition.last().copied() {
            if after_last {
                data.copy_from_slice(scratch_complex.as_ref().expect("scratch reserved"));
            }
        }
    }

    /// Begins a progressive (step-at-a-time) execution. See
    /// [`Progressive::step`].
    pub fn progressive_start<'a>(&'a self, direction: Direction, data: &'a mut [T], scratch: Option<&'a mut [T]>) -> Progressive<'a, T> {
        debug_assert_eq!(data.len(), self.size * 2);
        Progressive {
            plan: self,
            direction,
            data,
            scratch,
            step: 0,
        }
    }

    pub fn progressive_total_steps(&self) -> usize {
        self.stages.len()
    }
}

/// Borrowed, step-at-a-time execution state (spec §4.3). Owns no plan
/// state of its own; borrows the plan immutably and the caller's buffers
/// mutably, and is dropped when the caller is done (or simply abandoned
/// early — there is no cancellation API beyond "stop calling `step`").
pub struct Progressive<'a, T> {
    plan: &'a Plan<T>,
    direction: Direction,
    data: &'a mut [T],
    scratch: Option<&'a mut [T]>,
    step: usize,
}

impl<'a, T: Num> Progressive<'a, T> {
    /// Runs the next stage. Returns `true` if another step remains.
    pub fn step(&mut self) -> bool {
        if self.step >= self.plan.stages.len() {
            return false;
        }
        // A single stage's worth of work is just a one-stage slice of the
        // same in-place driver `execute_in_place` runs; reusing the full
        // driver here would re-run every earlier stage, so instead we
        // replay just this stage's disposition transition directly.
        let n2 = self.plan.size * 2;
        let needs_scratch_complex = self.plan.disposition.iter().any(|&b| b);
        let scratch_len = self.scratch.as_ref().map_or(0, |s| s.len());
        debug_assert!(!needs_scratch_complex || scratch_len >= self.plan.temp_size);

        let stage = &self.plan.stages[self.step];
        let before_in_scratch = self.plan.disposition[self.step];
        let own_work = stage.own_work_size();

        if let Some(scratch) = self.scratch.as_deref_mut() {
            let split_at = scratch.len().saturating_sub(n2);
            let (work_area, scratch_complex) = scratch.split_at_mut(split_at);
            let work = &mut work_area[..own_work.min(work_area.len())];
            if stage.can_inplace() {
                if before_in_scratch {
                    self.data.copy_from_slice(scratch_complex);
                }
                stage.execute_inplace(self.direction, self.data, work);
            } else if before_in_scratch {
                stage.execute_across(self.direction, self.data, scratch_complex, work);
            } else {
                stage.execute_across(self.direction, scratch_complex, self.data, work);
            }
        } else {
            debug_assert!(stage.can_inplace());
            stage.execute_inplace(self.direction, self.data, &mut []);
        }

        self.step += 1;
        trace!("progressive step {}/{}", self.step, self.plan.stages.len());

        if self.step == self.plan.stages.len() {
            if let Some(after_last) = self.plan.disposition.last().copied() {
                if after_last {
                    if let Some(scratch) = self.scratch.as_deref() {
                        let split_at = scratch.len().saturating_sub(n2);
                        self.data.copy_from_slice(&scratch[split_at..]);
                    }
                }
            }
            false
        } else {
            true
        }
    }
}

fn own_work_max<T: Num>(stages: &[Stage<T>]) -> usize {
    stages.iter().map(Stage::own_work_size).max().unwrap_or(0)
}

fn build_disposition<T: Num>(stages: &[Stage<T>]) -> Disposition {
    let mut loc = Vec::with_capacity(stages.len() + 1);
    loc.push(false);
    for stage in stages {
        let before = *loc.last().unwrap();
        let after = if stage.can_inplace() { false } else { !before };
        loc.push(after);
    }
    loc
}

fn build_radix_chain<T: Num>(size: usize, radices: &[usize], order: Order) -> Vec<Stage<T>> {
    let mut stages = Vec::with_capacity(radices.len() + 1);
    let mut unit = 1usize;
    for &radix in radices {
        let deltas = RadixDeltas::new(size, radix, unit);
        stages.push(Stage::Radix {
            radix,
            unit,
            size,
            deltas,
        });
        unit *= radix;
    }
    if radices.len() > 1 && matches!(order, Order::Normal) {
        let indices = digit_reversal_permutation(radices);
        stages.push(Stage::Reorder { indices });
    }
    stages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twiddle::twiddle;
    use num_complex::Complex;

    fn naive_dft(x: &[Complex<f64>], inverse: bool) -> Vec<Complex<f64>> {
        let n = x.len();
        (0..n)
            .map(|k| {
                let mut acc = Complex::new(0.0, 0.0);
                for (j, xj) in x.iter().enumerate() {
                    acc = acc + xj * twiddle::<f64>((j * k) as i64, n, inverse);
                }
                acc
            })
            .collect()
    }

    fn to_interleaved(c: &[Complex<f64>]) -> Vec<f64> {
        c.iter().flat_map(|c| [c.re, c.im]).collect()
    }

    fn check_forward(n: usize) {
        let input: Vec<Complex<f64>> = (0..n)
            .map(|i| Complex::new((i as f64) * 0.7 - 1.3, (i as f64) * 0.2))
            .collect();
        let plan = Plan::<f64>::new(n, Order::Normal, false).unwrap();
        let data = to_interleaved(&input);
        let mut out = vec![0.0; n * 2];
        let mut scratch = vec![0.0; plan.temp_size()];
        plan.execute(
            Direction::Forward,
            &mut out,
            &data,
            if plan.temp_size() > 0 { Some(&mut scratch) } else { None },
        );
        let expect = naive_dft(&input, false);
        for k in 0..n {
            assert!((out[k * 2] - expect[k].re).abs() < 1e-6, "n={n} re[{k}]");
            assert!((out[k * 2 + 1] - expect[k].im).abs() < 1e-6, "n={n} im[{k}]");
        }
    }

    #[test]
    fn forward_matches_naive_dft_for_small_sizes() {
        for n in 2..40 {
            check_forward(n);
        }
    }

    #[test]
    fn forward_matches_naive_dft_for_power_of_two() {
        for &n in &[4usize, 8, 16, 32, 64, 128, 256] {
            check_forward(n);
        }
    }

    #[test]
    fn in_place_and_out_of_place_agree() {
        let n = 12;
        let plan = Plan::<f64>::new(n, Order::Normal, false).unwrap();
        let input: Vec<f64> = (0..n * 2).map(|i| i as f64 * 0.3).collect();
        let mut out_of_place = vec![0.0; n * 2];
        let mut scratch = vec![0.0; plan.temp_size()];
        plan.execute(Direction::Forward, &mut out_of_place, &input, Some(&mut scratch));

        let mut in_place = input.clone();
        let mut scratch2 = vec![0.0; plan.temp_size()];
        let in_place_ptr_copy = in_place.clone();
        plan.execute(Direction::Forward, &mut in_place, &in_place_ptr_copy, Some(&mut scratch2));

        for i in 0..n * 2 {
            assert!((out_of_place[i] - in_place[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn progressive_matches_single_shot() {
        let n = 30;
        let plan = Plan::<f64>::new(n, Order::Normal, false).unwrap();
        let input: Vec<f64> = (0..n * 2).map(|i| (i as f64 * 1.1).sin()).collect();

        let mut single = input.clone();
        let mut scratch = vec![0.0; plan.temp_size()];
        plan.execute(
            Direction::Forward,
            &mut single.clone(),
            &input,
            if plan.temp_size() > 0 { Some(&mut scratch) } else { None },
        );
        let mut single_out = vec![0.0; n * 2];
        plan.execute(
            Direction::Forward,
            &mut single_out,
            &input,
            if plan.temp_size() > 0 { Some(&mut scratch) } else { None },
        );

        let mut progressive_data = input.clone();
        let mut scratch2 = vec![0.0; plan.temp_size()];
        {
            let mut prog = plan.progressive_start(
                Direction::Forward,
                &mut progressive_data,
                if plan.temp_size() > 0 { Some(&mut scratch2) } else { None },
            );
            let mut steps = 0;
            while prog.step() {
                steps += 1;
            }
            assert_eq!(steps + 1, plan.progressive_total_steps());
        }

        for i in 0..n * 2 {
            assert!((single_out[i] - progressive_data[i]).abs() < 1e-9, "index {i}");
        }
    }
}
