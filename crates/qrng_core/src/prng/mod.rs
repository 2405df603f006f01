//! # Pseudo-Random Integer Generators
//!
//! Mersenne Twister generators feeding the double transforms in
//! [`crate::transform`]. Both produce the reference MT19937 / MT19937-64
//! streams, implement the workspace integer-sequence contracts, and implement
//! [`rand::RngCore`] so they plug into `rand` distributions.
//!
//! ## State Snapshots
//!
//! Generator state is exported as an explicit value object ([`Mt32State`],
//! [`Mt64State`]) holding the state matrix and read index. Import validates
//! the matrix length and index bounds.
//!
//! ```rust
//! use qrng_core::prng::MersenneTwister32;
//! use qrng_core::traits::IntegerSequence32;
//!
//! let mut mt = MersenneTwister32::new(2024);
//! let snapshot = mt.export_state();
//! let expected = mt.next_u32();
//!
//! let mut restored = MersenneTwister32::from_state(snapshot).unwrap();
//! assert_eq!(restored.next_u32(), expected);
//! ```

mod mt32;
mod mt64;

pub use mt32::{MersenneTwister32, Mt32State};
pub use mt64::{MersenneTwister64, Mt64State};
