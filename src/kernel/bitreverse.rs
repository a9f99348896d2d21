//! Reorder stage: bit-reversal (power-of-two N) / digit-reversal (mixed
//! radix N) permutation applied after the chain of DIF radix passes.
//!
//! Grounded directly on the teacher's `kernel/bitreversal.rs`, which
//! already built its permutation table from an arbitrary list of radices
//! (not just powers of two) — spec §4.1's "mixed-radix: constructed from
//! the sequence of radices used in the plan" is exactly what the teacher's
//! `new_bit_reversal_kernel` does; only the execution-time contract
//! (interleaved `&mut [T]` + a caller-supplied work area, instead of a
//! `Kernel` trait object) changed to fit this crate's `Stage` enum.

use crate::Num;

/// Builds the index permutation for a digit-reversal pass over the given
/// radix sequence (as chosen by the plan's DIF decomposition, in the order
/// the stages were applied). For `radixes == [2; log2(n)]` this reduces to
/// ordinary bit-reversal.
pub fn digit_reversal_permutation(radixes: &[usize]) -> Vec<usize> {
    let len: usize = radixes.iter().product();
    if len <= 1 {
        return vec![0; len];
    }
    let mut indices = vec![0usize; len];
    let mut digits = vec![0usize; radixes.len()];
    let mut factors = vec![0usize; radixes.len()];
    factors[0] = 1;
    for i in 0..radixes.len() - 1 {
        factors[i + 1] = factors[i] * radixes[i];
    }

    let mut cur: usize = 0;
    for i in 0..len {
        indices[cur] = i;
        if i < len - 1 {
            digits[radixes.len() - 1] += 1;
            cur += factors[radixes.len() - 1];
            for k in (0..radixes.len()).rev() {
                if digits[k] < radixes[k] {
                    break;
                }
                digits[k] = 0;
                cur -= factors[k] * radixes[k];
                if k > 0 {
                    digits[k - 1] += 1;
                    cur += factors[k - 1];
                }
            }
        }
    }

    indices
}

/// Ordinary bit-reversal permutation for a power-of-two length, expressed
/// as the `log2n`-digit special case of [`digit_reversal_permutation`].
pub fn bit_reversal_permutation(log2n: u32) -> Vec<usize> {
    digit_reversal_permutation(&vec![2usize; log2n as usize])
}

/// Applies a precomputed permutation, reading from `src` and writing into
/// `dst`. The two buffers are never the same allocation: spec §4.1 "never
/// in-place (`can_inplace = false`)" — this stage always has a genuinely
/// separate source and destination available (the plan's disposition
/// bookkeeping guarantees it), so unlike a textbook in-place bit-reversal
/// swap, no temporary copy is needed at all.
pub fn apply_permutation<T: Num>(indices: &[usize], dst: &mut [T], src: &[T]) {
    let size = indices.len();
    debug_assert_eq!(dst.len(), size * 2);
    debug_assert_eq!(src.len(), size * 2);
    for i in 0..size {
        let from = indices[i];
        dst[i * 2] = src[from * 2];
        dst[i * 2 + 1] = src[from * 2 + 1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_reversal_of_eight() {
        let idx = bit_reversal_permutation(3);
        // index i receives data from the bit-reversal of i (3-bit reversal)
        assert_eq!(idx, vec![0, 4, 2, 6, 1, 5, 3, 7]);
    }

    #[test]
    fn digit_reversal_is_a_permutation() {
        let idx = digit_reversal_permutation(&[4, 3, 5]);
        let mut sorted = idx.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..60).collect::<Vec<_>>());
    }

    #[test]
    fn apply_permutation_round_trips_with_its_inverse() {
        let idx = bit_reversal_permutation(3);
        let original: Vec<f64> = (0..8).flat_map(|i| [i as f64, 0.0]).collect();
        let mut once = vec![0.0; 16];
        apply_permutation(&idx, &mut once, &original);
        let mut twice = vec![0.0; 16];
        // bit-reversal is its own inverse, so applying it again restores the original.
        apply_permutation(&idx, &mut twice, &once);
        assert_eq!(twice, original);
    }
}
