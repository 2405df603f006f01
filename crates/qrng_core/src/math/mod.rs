//! Number-theoretic helpers.
//!
//! - [`primes`]: first-N prime generation and mutual-coprimality checks

pub mod primes;
