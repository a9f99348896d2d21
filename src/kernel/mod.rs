//! The portable (non-SIMD) "kernel library" this crate ships with.
//!
//! spec §1 places hand-tuned SIMD butterfly kernels out of scope, to be
//! supplied by an external kernel library; spec §9's Design Notes say to
//! provide "one generic vectorized radix-4 kernel plus specializations for
//! sizes <= 256" rather than replicate the teacher's macro-heavy
//! per-architecture table. This module is that generic path: a radix-`r`
//! DIF butterfly that works algebraically for any `r` (grounded on the
//! teacher's `kernel/generic.rs::GenericDifKernel`), a bit/digit-reversal
//! permutation (grounded on `kernel/bitreversal.rs`), and the real-FFT
//! repack step (grounded on `kernel/realfft.rs`, with the exact formulas
//! from spec §4.1 rather than the teacher's "A/B coefficient table"
//! framing).

pub mod radix;
pub mod bitreverse;
pub mod realpack;
