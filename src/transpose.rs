//! Complex matrix transpose (spec §3 "Transpose primitive", §4.5): the
//! only primitive the multi-dimensional plans need beyond the 1D plan
//! itself.
//!
//! The teacher never implements a multi-dimensional transform (`yfft` is
//! strictly 1D), so there is no teacher transpose kernel to adapt; this is
//! built directly from spec §4.5's description ("an out-of-place 'matrix
//! transpose' when `rows != cols`; when `rows == cols` it is in-place"),
//! using the teacher's own "cache-friendly tiled moves" style (small fixed
//! block granularity, matching the block sizes `kernel/generic.rs` uses
//! for its own inner loops) rather than a naive row/column double loop.
//!
//! Two entry points, not one overloaded-by-aliasing function: spec §4.5
//! allows `out == in` only for the square case, and Rust cannot express
//! "these two slice parameters are sometimes required to alias" without
//! `unsafe`, so the two cases are two distinct signatures instead — callers
//! (`planmd.rs`) already know statically which shape they're in.

use crate::Num;

/// Cache-tile edge length (complex samples) for the blocked transpose.
/// Chosen to match the teacher's `UNIT`-scale inner-loop granularity
/// (`kernel/generic.rs` tiles its butterfly groups in powers of two up to
/// a few dozen elements); 32x32 complex-`f64` tiles are 16 KiB, comfortably
/// inside a 32 KiB L1.
const TILE: usize = 32;

/// Out-of-place transpose of a `rows x cols` row-major matrix of
/// interleaved complex `T` samples into a `cols x rows` one. `out` and
/// `in_` must be distinct buffers.
pub fn transpose<T: Num>(out: &mut [T], in_: &[T], rows: usize, cols: usize) {
    debug_assert_eq!(out.len(), rows * cols * 2);
    debug_assert_eq!(in_.len(), rows * cols * 2);

    let mut r0 = 0;
    while r0 < rows {
        let r1 = (r0 + TILE).min(rows);
        let mut c0 = 0;
        while c0 < cols {
            let c1 = (c0 + TILE).min(cols);
            for r in r0..r1 {
                for c in c0..c1 {
                    let src = (r * cols + c) * 2;
                    let dst = (c * rows + r) * 2;
                    out[dst] = in_[src];
                    out[dst + 1] = in_[src + 1];
                }
            }
            c0 = c1;
        }
        r0 = r1;
    }
}

/// In-place transpose of an `n x n` row-major matrix of interleaved
/// complex `T` samples (spec §4.5's `rows == cols` case).
pub fn transpose_square_in_place<T: Num>(data: &mut [T], n: usize) {
    debug_assert_eq!(data.len(), n * n * 2);

    let mut r0 = 0;
    while r0 < n {
        let r1 = (r0 + TILE).min(n);
        let mut c0 = r0;
        while c0 < n {
            let c1 = (c0 + TILE).min(n);
            for r in r0..r1 {
                let c_start = c0.max(r + 1);
                for c in c_start..c1 {
                    let a = (r * n + c) * 2;
                    let b = (c * n + r) * 2;
                    data.swap(a, b);
                    data.swap(a + 1, b + 1);
                }
            }
            c0 = c1;
        }
        r0 = r1;
    }
}
