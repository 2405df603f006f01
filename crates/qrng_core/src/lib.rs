//! # qrng_core: Foundation for Quasi-Random and Pseudo-Random Sequences
//!
//! ## Foundation Layer Role
//!
//! qrng_core is the bottom layer of the workspace, providing:
//! - Error taxonomy shared by every generator (`types::error`)
//! - Sequence contracts: integer, double and point sequences (`traits`)
//! - Prime utilities used to pick default Halton bases (`math::primes`)
//! - Mersenne Twister integer generators with state snapshots (`prng`)
//! - Affine integer-to-double transforms and the double-to-point adapter (`transform`)
//!
//! The quasi-random engines (Halton, Sobol) live one layer up in `qrng_quasi`.
//!
//! ## Usage Examples
//!
//! ```rust
//! use qrng_core::prng::MersenneTwister64;
//! use qrng_core::traits::{DoubleSequence, PointSequence};
//! use qrng_core::transform::{DoubleSequence64, Interval, PointsFromDoubles};
//!
//! let twister = MersenneTwister64::new(5489);
//! let doubles = DoubleSequence64::new(Interval::ZeroClosedOneOpen, twister);
//! let mut points = PointsFromDoubles::new(doubles, 3);
//!
//! let point = points.next_point();
//! assert_eq!(point.len(), 3);
//! assert!(point.iter().all(|&x| (0.0..1.0).contains(&x)));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for Mersenne Twister state snapshots

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod prng;
pub mod traits;
pub mod transform;
pub mod types;

pub use types::error::{SequenceError, SnapshotError};
