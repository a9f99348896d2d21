//! Overlap-save streaming convolution filter (spec §3 "Convolve filter
//! state", §4.8): owns a fixed-size real plan, a rolling ring of
//! frequency-domain history segments, an overlap buffer, and an
//! input-position counter.
//!
//! Grounded directly on `original_source`'s `kfr::convolve_filter`
//! (`include/kfr/dft/convolution.hpp`, reviewed in full in `DESIGN.md`):
//! `block_size` segments, `Perm`-packed frequency domain, a `premul`
//! accumulator recomputed once per block (not once per sample) summing
//! every history segment except the freshest, and the classic
//! overlap-save tail handoff (`overlap <- scratch[block_size..]`,
//! `position` stepping backward modulo the segment count).

use crate::realplan::{PackFormat, RealPlan};
use crate::{next_power_of_two, Num};
use num_complex::Complex;
use num_traits::Zero;

pub struct ConvolveFilter<T> {
    fft: RealPlan<T>,
    block_size: usize,
    segments: Vec<Vec<Complex<T>>>,
    ir_segments: Vec<Vec<Complex<T>>>,
    saved_input: Vec<T>,
    overlap: Vec<T>,
    premul: Vec<Complex<T>>,
    cscratch: Vec<Complex<T>>,
    scratch1: Vec<T>,
    scratch2: Vec<T>,
    fft_scratch: Vec<T>,
    freq_flat: Vec<T>,
    position: usize,
    input_position: usize,
}

impl<T: Num> ConvolveFilter<T> {
    /// Builds a filter for an impulse response of `h.len()` samples, using
    /// a requested block size (rounded up to a power of two, spec §4.8).
    pub fn new(h: &[T], requested_block_size: usize) -> Self {
        let block_size = next_power_of_two(requested_block_size.max(1));
        let fft = RealPlan::new(block_size * 2, PackFormat::Perm, false).expect("2*block_size is always even");
        let complex_size = fft.complex_size();
        let k = (h.len() + block_size - 1) / block_size;

        let mut filter = Self {
            fft,
            block_size,
            segments: vec![vec![Complex::zero(); complex_size]; k.max(1)],
            ir_segments: vec![vec![Complex::zero(); complex_size]; k.max(1)],
            saved_input: vec![T::zero(); block_size],
            overlap: vec![T::zero(); block_size],
            premul: vec![Complex::zero(); complex_size],
            cscratch: vec![Complex::zero(); complex_size],
            scratch1: vec![T::zero(); block_size * 2],
            scratch2: vec![T::zero(); block_size * 2],
            fft_scratch: vec![T::zero(); 0],
            freq_flat: vec![T::zero(); complex_size * 2],
            position: 0,
            input_position: 0,
        };
        filter.fft_scratch = vec![T::zero(); filter.fft.temp_size()];
        filter.set_impulse_response(h);
        filter
    }

    /// Number of frequency-domain history segments (`K = ceil(L / B)`).
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// (Re-)computes the frequency-domain impulse-response segments,
    /// scaled by `1 / (2*block_size)` so the inverse transform's missing
    /// normalization is absorbed once here rather than once per processed
    /// block.
    pub fn set_impulse_response(&mut self, h: &[T]) {
        let b = self.block_size;
        let inv_fft_size = T::one() / T::from(2 * b).unwrap();
        let k = self.ir_segments.len();
        for i in 0..k {
            let start = i * b;
            let end = (start + b).min(h.len());
            let mut padded = vec![T::zero(); 2 * b];
            if start < h.len() {
                padded[..end - start].copy_from_slice(&h[start..end]);
            }
            let mut freq = vec![T::zero(); self.fft.complex_size() * 2];
            self.fft.execute_forward(&mut freq, &padded, &mut self.fft_scratch);
            for (c, chunk) in self.ir_segments[i].iter_mut().zip(freq.chunks_exact(2)) {
                *c = Complex::new(chunk[0], chunk[1]) * inv_fft_size;
            }
        }
    }

    /// Resets all rolling state (history segments, saved input, overlap,
    /// position counters) without forgetting the impulse response (spec
    /// §4.8: `reset()` zeros "all segments, saved_input, and overlap").
    pub fn reset(&mut self) {
        for seg in self.segments.iter_mut() {
            seg.iter_mut().for_each(|c| *c = Complex::zero());
        }
        self.saved_input.iter_mut().for_each(|v| *v = T::zero());
        self.overlap.iter_mut().for_each(|v| *v = T::zero());
        self.input_position = 0;
        self.position = 0;
    }

    /// Processes `input.len()` samples of streaming input into `out`
    /// (same length), producing the exact overlap-save linear-convolution
    /// output with zero startup delay (spec §4.8).
    pub fn apply(&mut self, out: &mut [T], input: &[T]) {
        debug_assert_eq!(out.len(), input.len());
        let b = self.block_size;
        let k = self.segments.len();
        let complex_size = self.fft.complex_size();

        let mut processed = 0;
        while processed < input.len() {
            let c = (input.len() - processed).min(b - self.input_position);

            self.saved_input[self.input_position..self.input_position + c]
                .copy_from_slice(&input[processed..processed + c]);

            self.scratch1[..b].copy_from_slice(&self.saved_input);
            for v in self.scratch1[b..].iter_mut() {
                *v = T::zero();
            }
            self.fft.execute_forward(&mut self.freq_flat, &self.scratch1, &mut self.fft_scratch);
            for (slot, chunk) in self.segments[self.position].iter_mut().zip(self.freq_flat.chunks_exact(2)) {
                *slot = Complex::new(chunk[0], chunk[1]);
            }

            if self.input_position == 0 {
                for v in self.premul.iter_mut() {
                    *v = Complex::zero();
                }
                for i in 1..k {
                    let n = (self.position + i) % k;
                    for ((p, &ir), &seg) in self.premul.iter_mut().zip(self.ir_segments[i].iter()).zip(self.segments[n].iter()) {
                        *p += ir * seg;
                    }
                }
            }

            for i in 0..complex_size {
                self.cscratch[i] = self.premul[i] + self.ir_segments[0][i] * self.segments[self.position][i];
            }
            for (i, c) in self.cscratch.iter().enumerate() {
                self.freq_flat[i * 2] = c.re;
                self.freq_flat[i * 2 + 1] = c.im;
            }
            self.fft.execute_inverse(&mut self.scratch2, &self.freq_flat, &mut self.fft_scratch);

            for i in 0..c {
                out[processed + i] = self.scratch2[self.input_position + i] + self.overlap[self.input_position + i];
            }

            self.input_position += c;
            processed += c;

            if self.input_position == b {
                self.input_position = 0;
                self.saved_input.iter_mut().for_each(|v| *v = T::zero());
                self.overlap.copy_from_slice(&self.scratch2[b..2 * b]);
                self.position = if self.position > 0 { self.position - 1 } else { k - 1 };
            }
        }
    }
}
