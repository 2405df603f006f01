//! Prime utilities for choosing Halton bases.
//!
//! Halton bases only need to be pairwise coprime, but the customary default
//! is the first `d` primes. The generator here is capped at [`MAX_PRIMES`]
//! (the 1000th prime is 7919), far more than any practical Halton dimension.

use crate::types::error::SequenceError;

/// Largest number of primes [`first_n_primes`] will produce.
pub const MAX_PRIMES: usize = 1000;

/// Upper bound of the sieve; the 1000th prime is 7919.
const SIEVE_LIMIT: usize = 7920;

/// Returns the first `n` primes, starting at 2.
///
/// # Errors
///
/// Returns [`SequenceError::OutOfRange`] if `n > MAX_PRIMES`.
///
/// # Examples
///
/// ```rust
/// use qrng_core::math::primes::first_n_primes;
///
/// assert_eq!(first_n_primes(5).unwrap(), vec![2, 3, 5, 7, 11]);
/// assert!(first_n_primes(1001).is_err());
/// ```
pub fn first_n_primes(n: usize) -> Result<Vec<u32>, SequenceError> {
    if n > MAX_PRIMES {
        return Err(SequenceError::out_of_range(
            "n",
            n,
            &format!("at most {} primes are available", MAX_PRIMES),
        ));
    }

    let mut composite = vec![false; SIEVE_LIMIT];
    let mut primes = Vec::with_capacity(n);
    for candidate in 2..SIEVE_LIMIT {
        if primes.len() == n {
            break;
        }
        if composite[candidate] {
            continue;
        }
        primes.push(candidate as u32);
        for multiple in (candidate * candidate..SIEVE_LIMIT).step_by(candidate) {
            composite[multiple] = true;
        }
    }
    Ok(primes)
}

/// Greatest common divisor by Euclid's algorithm.
#[inline]
pub fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Returns true when every pair of `values` is coprime.
///
/// The values need not be prime themselves: `[10, 7]` is accepted,
/// `[10, 7, 5]` is not. Empty and single-element sets are trivially coprime.
///
/// # Examples
///
/// ```rust
/// use qrng_core::math::primes::are_mutually_prime;
///
/// assert!(are_mutually_prime(&[2, 5, 7]));
/// assert!(are_mutually_prime(&[10, 7]));
/// assert!(!are_mutually_prime(&[10, 7, 5]));
/// ```
pub fn are_mutually_prime(values: &[u32]) -> bool {
    first_shared_factor(values).is_none()
}

/// Returns the indices of the first pair of `values` sharing a factor.
pub fn first_shared_factor(values: &[u32]) -> Option<(usize, usize)> {
    for (i, &a) in values.iter().enumerate() {
        for (j, &b) in values.iter().enumerate().skip(i + 1) {
            if gcd(a, b) != 1 {
                return Some((i, j));
            }
        }
    }
    None
}
