//! Error types for structured error handling.
//!
//! This module provides:
//! - `SequenceError`: Errors from generator construction and direction table I/O
//! - `SnapshotError`: Errors from restoring a Mersenne Twister state snapshot

use std::fmt;
use thiserror::Error;

/// Categorised sequence errors.
///
/// Every failure is surfaced at the point of detection, which is construction
/// time for almost all generators. None of them are retried; callers are
/// expected to fix the inputs and construct again.
///
/// # Variants
/// - `InvalidArgument`: Inputs that are individually in range but inconsistent
///   (non-coprime bases, mismatched array lengths, malformed table rows)
/// - `OutOfRange`: A numeric argument outside its valid domain
/// - `InvalidState`: A data source that cannot satisfy the request
/// - `Parse`: An unparseable line in a text direction table
/// - `Io`: Underlying reader or writer failure
///
/// # Examples
/// ```
/// use qrng_core::SequenceError;
///
/// let err = SequenceError::out_of_range("dimensions", 0, "must be at least 1");
/// assert_eq!(
///     format!("{}", err),
///     "Argument 'dimensions' out of range (0): must be at least 1"
/// );
/// ```
#[derive(Error, Debug)]
pub enum SequenceError {
    /// Inconsistent input data or parameters.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Numeric argument outside its valid domain.
    #[error("Argument '{name}' out of range ({value}): {reason}")]
    OutOfRange {
        /// Argument name
        name: &'static str,
        /// Value that was supplied
        value: i64,
        /// Description of the valid domain
        reason: String,
    },

    /// Data source cannot satisfy the request.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Unparseable text table line.
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// One-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Reader or writer failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SequenceError {
    /// Convenience constructor for [`SequenceError::OutOfRange`].
    pub fn out_of_range(name: &'static str, value: impl TryInto<i64>, reason: &str) -> Self {
        SequenceError::OutOfRange {
            name,
            value: value.try_into().unwrap_or(i64::MAX),
            reason: reason.to_string(),
        }
    }

    /// Returns true for [`SequenceError::OutOfRange`].
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, SequenceError::OutOfRange { .. })
    }

    /// Returns true for [`SequenceError::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SequenceError::InvalidArgument(_))
    }

    /// Returns true for [`SequenceError::InvalidState`].
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, SequenceError::InvalidState(_))
    }
}

/// Errors from restoring a generator state snapshot.
///
/// # Examples
/// ```
/// use qrng_core::SnapshotError;
///
/// let err = SnapshotError::InvalidLength { expected: 624, got: 10 };
/// assert_eq!(format!("{}", err), "Invalid state matrix length 10: expected 624");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    /// State matrix has the wrong number of words.
    InvalidLength {
        /// Required matrix length
        expected: usize,
        /// Supplied matrix length
        got: usize,
    },
    /// Read index lies beyond the matrix.
    InvalidIndex {
        /// Supplied index
        index: usize,
        /// Largest valid index (inclusive)
        max: usize,
    },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { expected, got } => {
                write!(f, "Invalid state matrix length {}: expected {}", got, expected)
            }
            Self::InvalidIndex { index, max } => {
                write!(f, "Invalid state index {}: must be in range [0, {}]", index, max)
            }
        }
    }
}

impl std::error::Error for SnapshotError {}
