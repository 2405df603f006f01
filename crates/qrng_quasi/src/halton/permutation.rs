//! Digit permutations for scrambled Halton sequences.
//!
//! The RR2 permutation takes the bit-reversal ordering of `0..2^k`, where
//! `k` is the bit length of the largest base, and keeps, for each base `b`,
//! only the reversed values below `b`. All bases share the same scan width;
//! smaller bases simply discard more of it. This fixes which bit-reversal
//! subsequence each base uses, so the scan must not be narrowed per base.
//!
//! Reference: Kocis & Whiten, "Computational Investigations of
//! Low-Discrepancy Sequences", ACM TOMS 23(2), 1997.

/// Number of bits needed to represent `value`, with a minimum of 1.
#[inline]
fn bit_length(value: u32) -> u32 {
    (u32::BITS - value.leading_zeros()).max(1)
}

/// Builds the RR2 digit permutation for each base.
///
/// Entry `d` of table `j` is the permuted value of digit `d` in base
/// `bases[j]`; table `j` has exactly `bases[j]` entries. Coprimality of the
/// bases is the caller's concern.
///
/// # Examples
///
/// ```rust
/// use qrng_quasi::halton::rr2_permutation;
///
/// let tables = rr2_permutation(&[2, 3]);
/// assert_eq!(tables[0], vec![0, 1]);
/// assert_eq!(tables[1], vec![0, 2, 1]);
/// ```
pub fn rr2_permutation(bases: &[u32]) -> Vec<Vec<u32>> {
    let mut tables: Vec<Vec<u32>> = bases
        .iter()
        .map(|&base| Vec::with_capacity(base as usize))
        .collect();

    let Some(&largest) = bases.iter().max() else {
        return tables;
    };
    let max_bits = bit_length(largest);
    let shift = u32::BITS - max_bits;

    for i in 0..(1u64 << max_bits) {
        let reversed = (i as u32).reverse_bits() >> shift;
        for (table, &base) in tables.iter_mut().zip(bases) {
            if reversed < base {
                table.push(reversed);
            }
        }
    }

    tables
}
