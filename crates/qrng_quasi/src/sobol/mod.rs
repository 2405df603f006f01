//! # Sobol Sequence
//!
//! Each dimension owns 32 direction numbers. Point `n` XORs together the
//! direction numbers selected by the Gray code of `n`; walking `n` upwards
//! flips exactly one Gray-code bit per step, so every coordinate is updated
//! with a single XOR. Coordinates are the 32-bit accumulators divided by
//! `2^32`, giving values in `[0, 1)`.
//!
//! Direction numbers come from a [`DirectionNumbers`] source:
//!
//! - [`PackedDirectionNumbers`]: compact varint table, including the
//!   bundled Joe & Kuo table ([`BUNDLED_TABLE`])
//! - [`TextDirectionNumbers`]: the upstream whitespace text format
//!
//! [`convert_text_to_packed`] turns the latter into the former.
//!
//! ```rust
//! use qrng_core::traits::PointSequence;
//! use qrng_quasi::sobol::SobolSequence;
//!
//! let mut sobol = SobolSequence::with_default_table(3).unwrap();
//! assert_eq!(sobol.next_point(), vec![0.0, 0.0, 0.0]);
//! assert_eq!(sobol.next_point(), vec![0.5, 0.5, 0.5]);
//! assert_eq!(sobol.next_point(), vec![0.75, 0.25, 0.25]);
//! ```
//!
//! Reference: S. Joe and F. Y. Kuo, "Constructing Sobol sequences with
//! better two-dimensional projections", SIAM J. Sci. Comput. 30, 2008.

mod accumulator;
mod codec;
mod cursor;
mod direction;
mod table;
mod text;

pub use accumulator::DimensionAccumulator;
pub use codec::{
    convert_text_to_packed, encode_rows, read_varint, write_varint, PackedRows, PackedTableReader,
};
pub use cursor::GrayCodeCursor;
pub use direction::{
    build_dimension_one, build_from_row, DirectionNumbers, DirectionVector,
    PackedDirectionNumbers, TextDirectionNumbers, DIRECTION_BITS,
};
pub use table::{DimensionRow, BUNDLED_MAX_DIMENSION, BUNDLED_TABLE, BUNDLED_TABLE_TEXT};
pub use text::{parse_text_rows, read_text_table, TextRows};

use qrng_core::traits::PointSequence;
use qrng_core::SequenceError;
use tracing::{debug, trace};

/// Sobol point sequence.
///
/// Direction vectors for every dimension are built at construction. The
/// sequence has period `2^32`: after point `2^32 - 1` it starts again from
/// the origin.
#[derive(Clone, Debug)]
pub struct SobolSequence {
    cursor: GrayCodeCursor,
    accumulators: Vec<DimensionAccumulator>,
}

impl SobolSequence {
    /// Builds a `dimensions`-dimensional sequence from `directions`.
    ///
    /// # Errors
    ///
    /// [`SequenceError::OutOfRange`] if `dimensions == 0` or exceeds the
    /// source's maximum dimension.
    pub fn new<D>(directions: &D, dimensions: usize) -> Result<Self, SequenceError>
    where
        D: DirectionNumbers + ?Sized,
    {
        check_dimensions(dimensions)?;
        let accumulators = (1..=dimensions)
            .map(|d| Ok(DimensionAccumulator::new(d, directions.for_dimension(d)?)))
            .collect::<Result<Vec<_>, SequenceError>>()?;

        debug!(
            dimensions,
            max_dimension = directions.max_dimension(),
            "Sobol sequence constructed"
        );
        Ok(Self {
            cursor: GrayCodeCursor::new(),
            accumulators,
        })
    }

    /// Builds a sequence from the bundled Joe & Kuo table.
    ///
    /// # Errors
    ///
    /// - [`SequenceError::OutOfRange`] if `dimensions == 0`
    /// - [`SequenceError::InvalidState`] if `dimensions` exceeds
    ///   [`BUNDLED_MAX_DIMENSION`]
    pub fn with_default_table(dimensions: usize) -> Result<Self, SequenceError> {
        check_dimensions(dimensions)?;
        let table = PackedDirectionNumbers::bundled(dimensions)?;
        Self::new(&table, dimensions)
    }

    /// Sequence number of the next point.
    #[inline]
    pub fn sequence_number(&self) -> u32 {
        self.cursor.sequence()
    }
}

fn check_dimensions(dimensions: usize) -> Result<(), SequenceError> {
    if dimensions == 0 {
        return Err(SequenceError::out_of_range(
            "dimensions",
            dimensions,
            "must be at least 1",
        ));
    }
    Ok(())
}

impl PointSequence for SobolSequence {
    fn dimensions(&self) -> usize {
        self.accumulators.len()
    }

    fn fill_point(&mut self, out: &mut [f64]) {
        assert_eq!(out.len(), self.accumulators.len(), "point buffer length");
        let bit = self.cursor.current();
        for (value, accumulator) in out.iter_mut().zip(&mut self.accumulators) {
            *value = accumulator.next(bit);
        }
        if bit >= DIRECTION_BITS {
            trace!("Sobol period complete, restarting from the origin");
        }
        self.cursor.advance();
    }
}
