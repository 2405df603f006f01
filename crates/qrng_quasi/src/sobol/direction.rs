//! Direction vectors and the sources that supply them.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use qrng_core::SequenceError;
use tracing::debug;

use super::codec::{PackedTableReader, RowSequencer};
use super::table::{DimensionRow, BUNDLED_TABLE};
use super::text::parse_text_rows;

/// Bits per direction vector, and the bit width of every Sobol integer.
pub const DIRECTION_BITS: usize = 32;

/// Direction numbers `v_0 .. v_31` for one dimension.
pub type DirectionVector = [u32; DIRECTION_BITS];

/// Direction vector of dimension 1: `v_i = 2^(31 - i)`.
pub fn build_dimension_one() -> DirectionVector {
    let mut v = [0u32; DIRECTION_BITS];
    for (i, slot) in v.iter_mut().enumerate() {
        *slot = 1u32 << (31 - i);
    }
    v
}

/// Direction vector for `dimension` from its table row.
///
/// The first `s` entries are the seeds `m_i << (31 - i)`; the rest follow
/// the primitive-polynomial recurrence
///
/// ```text
/// v_i = v_{i-s} ^ (v_{i-s} >> s) ^ XOR_{k=0}^{s-2} ((a >> (s-2-k)) & 1) * v_{i-k-1}
/// ```
///
/// # Panics
///
/// Panics if `row.dimension != dimension`, or if the row is not internally
/// consistent (`len(m) != s` or `s >= 32`). Table sources validate rows
/// when loading, so a mismatch here is a broken table source.
pub fn build_from_row(dimension: usize, row: &DimensionRow) -> DirectionVector {
    assert_eq!(
        row.dimension, dimension,
        "direction table row out of position"
    );
    let s = row.degree;
    assert!(
        s < DIRECTION_BITS && row.initial.len() == s,
        "malformed direction table row for dimension {}",
        dimension
    );

    let mut v = [0u32; DIRECTION_BITS];
    for (i, &m) in row.initial.iter().enumerate() {
        v[i] = m << (31 - i);
    }
    for i in s..DIRECTION_BITS {
        let mut value = v[i - s] ^ (v[i - s] >> s);
        for k in 0..s.saturating_sub(1) {
            if (row.coefficient >> (s - 2 - k)) & 1 == 1 {
                value ^= v[i - k - 1];
            }
        }
        v[i] = value;
    }
    v
}

/// A source of Sobol direction numbers.
///
/// Sources are constructed for a fixed maximum dimension and answer any
/// dimension in `1..=max_dimension`.
pub trait DirectionNumbers {
    /// Highest dimension this source can produce.
    fn max_dimension(&self) -> usize;

    /// Direction vector for the one-based `dimension`.
    ///
    /// # Errors
    ///
    /// [`SequenceError::OutOfRange`] unless `1 <= dimension <= max_dimension()`.
    fn for_dimension(&self, dimension: usize) -> Result<DirectionVector, SequenceError>;
}

impl<T: DirectionNumbers + ?Sized> DirectionNumbers for &T {
    fn max_dimension(&self) -> usize {
        (**self).max_dimension()
    }

    fn for_dimension(&self, dimension: usize) -> Result<DirectionVector, SequenceError> {
        (**self).for_dimension(dimension)
    }
}

/// Rows `2..=max_dimension`, validated and in order.
#[derive(Clone, Debug)]
struct LoadedRows {
    rows: Vec<DimensionRow>,
    max_dimension: usize,
}

impl LoadedRows {
    fn lookup(&self, dimension: usize) -> Result<DirectionVector, SequenceError> {
        if dimension < 1 {
            return Err(SequenceError::out_of_range(
                "dimension",
                dimension,
                "must be at least 1",
            ));
        }
        if dimension > self.max_dimension {
            return Err(SequenceError::out_of_range(
                "dimension",
                dimension,
                &format!("must not exceed the maximum dimension {}", self.max_dimension),
            ));
        }
        if dimension == 1 {
            return Ok(build_dimension_one());
        }
        Ok(build_from_row(dimension, &self.rows[dimension - 2]))
    }
}

/// Direction numbers decoded eagerly from a packed table.
#[derive(Clone, Debug)]
pub struct PackedDirectionNumbers {
    inner: LoadedRows,
}

impl PackedDirectionNumbers {
    /// Decodes dimensions `2..=max_dimension` from a packed table stream.
    ///
    /// # Errors
    ///
    /// - [`SequenceError::InvalidState`] if the table's declared maximum is
    ///   below `max_dimension`, or its header is malformed
    /// - [`SequenceError::Io`] if the stream ends early
    pub fn from_reader<R: Read>(reader: R, max_dimension: usize) -> Result<Self, SequenceError> {
        let rows = PackedTableReader::new(reader)
            .rows(max_dimension)?
            .collect::<Result<Vec<_>, _>>()?;
        debug!(rows = rows.len(), max_dimension, "loaded packed direction numbers");
        Ok(Self {
            inner: LoadedRows {
                rows,
                max_dimension,
            },
        })
    }

    /// Decodes from the bundled table.
    ///
    /// # Errors
    ///
    /// [`SequenceError::InvalidState`] if `max_dimension` exceeds
    /// [`BUNDLED_MAX_DIMENSION`](super::BUNDLED_MAX_DIMENSION).
    pub fn bundled(max_dimension: usize) -> Result<Self, SequenceError> {
        Self::from_reader(BUNDLED_TABLE, max_dimension)
    }

    /// Decodes from a packed table file.
    ///
    /// # Errors
    ///
    /// As [`from_reader`](Self::from_reader), plus [`SequenceError::Io`] if
    /// the file cannot be opened.
    pub fn from_path<P: AsRef<Path>>(path: P, max_dimension: usize) -> Result<Self, SequenceError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), max_dimension)
    }
}

impl DirectionNumbers for PackedDirectionNumbers {
    fn max_dimension(&self) -> usize {
        self.inner.max_dimension
    }

    fn for_dimension(&self, dimension: usize) -> Result<DirectionVector, SequenceError> {
        self.inner.lookup(dimension)
    }
}

/// Direction numbers parsed from a Joe & Kuo text table.
#[derive(Clone, Debug)]
pub struct TextDirectionNumbers {
    inner: LoadedRows,
}

impl TextDirectionNumbers {
    /// Parses and keeps dimensions `2..=max_dimension`.
    ///
    /// Reading stops once the last wanted row is parsed; later lines are
    /// never looked at.
    ///
    /// # Errors
    ///
    /// - [`SequenceError::Parse`] or [`SequenceError::Io`] while reading
    /// - [`SequenceError::InvalidArgument`] if the kept rows are not a
    ///   well-formed table prefix
    /// - [`SequenceError::InvalidState`] if the text holds fewer than
    ///   `max_dimension` dimensions
    pub fn from_reader<R: BufRead>(reader: R, max_dimension: usize) -> Result<Self, SequenceError> {
        let mut read_error = None;
        let lines = reader.lines().map_while(|line| match line {
            Ok(line) => Some(line),
            Err(err) => {
                read_error = Some(err);
                None
            }
        });
        let rows = parse_text_rows(lines)
            .take(max_dimension.saturating_sub(1))
            .collect::<Result<Vec<_>, _>>();
        if let Some(err) = read_error {
            return Err(err.into());
        }
        let rows = rows?;

        let mut sequencer = RowSequencer::new();
        for row in &rows {
            sequencer.accept(row)?;
        }
        let available = sequencer.last_dimension();
        if available < max_dimension {
            return Err(SequenceError::InvalidState(format!(
                "requested dimensions {} exceeds maximum dimensions {} of the table",
                max_dimension, available
            )));
        }

        debug!(rows = rows.len(), max_dimension, "loaded text direction numbers");
        Ok(Self {
            inner: LoadedRows {
                rows,
                max_dimension,
            },
        })
    }

    /// Parses table text held in memory.
    ///
    /// # Errors
    ///
    /// As [`from_reader`](Self::from_reader).
    pub fn from_text(text: &str, max_dimension: usize) -> Result<Self, SequenceError> {
        Self::from_reader(text.as_bytes(), max_dimension)
    }

    /// Parses a text table file.
    ///
    /// # Errors
    ///
    /// As [`from_reader`](Self::from_reader), plus [`SequenceError::Io`] if
    /// the file cannot be opened.
    pub fn from_path<P: AsRef<Path>>(path: P, max_dimension: usize) -> Result<Self, SequenceError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), max_dimension)
    }
}

impl DirectionNumbers for TextDirectionNumbers {
    fn max_dimension(&self) -> usize {
        self.inner.max_dimension
    }

    fn for_dimension(&self, dimension: usize) -> Result<DirectionVector, SequenceError> {
        self.inner.lookup(dimension)
    }
}
