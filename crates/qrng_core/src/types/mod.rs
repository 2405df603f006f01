//! Core error types.
//!
//! This module provides:
//! - `error`: Structured error types for generator construction, table I/O and
//!   state snapshot restoration
//!
//! # Re-exports
//!
//! - [`SequenceError`], [`SnapshotError`] from `error`

pub mod error;

pub use error::{SequenceError, SnapshotError};
