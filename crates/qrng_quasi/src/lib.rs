//! # qrng_quasi: Low-Discrepancy Point Sequences
//!
//! ## Engine Layer Role
//!
//! qrng_quasi builds on `qrng_core` and provides the quasi-random engines:
//! - Halton sequences with per-dimension bases, skip and leap, and optional
//!   RR2 digit scrambling (`halton`)
//! - Sobol sequences driven by Joe & Kuo direction numbers (`sobol`)
//! - The packed varint direction table format, its text counterpart and a
//!   converter between them (`sobol`)
//!
//! Both engines implement [`qrng_core::traits::PointSequence`], so they plug
//! into anything that consumes points from the pseudo-random side as well.
//!
//! ## Usage Examples
//!
//! ```rust
//! use qrng_core::traits::PointSequence;
//! use qrng_quasi::halton::HaltonSequence;
//! use qrng_quasi::sobol::SobolSequence;
//!
//! let mut halton = HaltonSequence::builder(4).scrambled(true).build().unwrap();
//! let mut sobol = SobolSequence::with_default_table(4).unwrap();
//!
//! for (h, s) in halton.points().zip(sobol.points()).take(100) {
//!     assert!(h.iter().chain(&s).all(|&x| (0.0..1.0).contains(&x)));
//! }
//! ```
//!
//! ## Logging
//!
//! Construction and table I/O emit `tracing` events at `debug` level; row
//! decoding emits `trace`. No subscriber is installed here.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for [`sobol::DimensionRow`]

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod halton;
pub mod sobol;
