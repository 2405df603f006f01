//! Packed binary direction tables.
//!
//! Every integer is a 7-bit varint: the low seven bits of each byte carry
//! the value, least significant group first, and the high bit marks a
//! continuation byte. The layout is
//!
//! ```text
//! last_dimension
//! boundary_count
//! boundary_1 .. boundary_n      dimensions where the degree s increases
//! for each dimension 2..=last_dimension:
//!     a  m_1 .. m_s
//! ```
//!
//! Degrees are not stored per row. A reader starts at `s = 0` and
//! increments it on reaching each boundary dimension.

use std::io::{self, BufRead, Read, Write};

use qrng_core::SequenceError;
use tracing::{debug, trace};

use super::direction::DIRECTION_BITS;
use super::table::DimensionRow;
use super::text::read_text_table;

/// Longest encoding of a `u32`.
const MAX_VARINT_BYTES: usize = 5;

/// Writes `value` as a 7-bit varint.
pub fn write_varint<W: Write + ?Sized>(writer: &mut W, mut value: u32) -> io::Result<()> {
    let mut buf = [0u8; MAX_VARINT_BYTES];
    let mut len = 0;
    while value >= 0x80 {
        buf[len] = (value as u8) | 0x80;
        value >>= 7;
        len += 1;
    }
    buf[len] = value as u8;
    writer.write_all(&buf[..=len])
}

/// Reads one 7-bit varint.
///
/// # Errors
///
/// - [`SequenceError::Io`] if the stream ends mid-value
/// - [`SequenceError::InvalidState`] if the encoding does not fit a `u32`
pub fn read_varint<R: Read + ?Sized>(reader: &mut R) -> Result<u32, SequenceError> {
    let mut value = 0u32;
    for i in 0..MAX_VARINT_BYTES {
        let mut byte = [0u8; 1];
        reader.read_exact(&mut byte)?;
        let group = u32::from(byte[0] & 0x7f);
        let shift = 7 * i as u32;

        if i == MAX_VARINT_BYTES - 1 && (byte[0] & 0x80 != 0 || group > 0x0f) {
            return Err(SequenceError::InvalidState(
                "malformed varint: value exceeds 32 bits".to_string(),
            ));
        }
        value |= group << shift;
        if byte[0] & 0x80 == 0 {
            return Ok(value);
        }
    }
    unreachable!("varint loop returns on the final byte")
}

fn read_usize<R: Read + ?Sized>(reader: &mut R) -> Result<usize, SequenceError> {
    read_varint(reader).map(|v| v as usize)
}

fn to_u32(value: usize, what: &'static str) -> Result<u32, SequenceError> {
    u32::try_from(value).map_err(|_| SequenceError::out_of_range(what, value, "exceeds u32"))
}

/// Checks that rows arrive in table order.
///
/// Dimensions must start at 2 and rise by one; each row's degree equals
/// the previous degree or exceeds it by one, and `len(m) == s`.
#[derive(Debug)]
pub(crate) struct RowSequencer {
    last_dimension: usize,
    last_degree: usize,
}

impl RowSequencer {
    pub(crate) fn new() -> Self {
        Self {
            last_dimension: 1,
            last_degree: 0,
        }
    }

    /// Validates `row`; returns `true` when its degree opens a new boundary.
    pub(crate) fn accept(&mut self, row: &DimensionRow) -> Result<bool, SequenceError> {
        if row.dimension != self.last_dimension + 1 {
            return Err(SequenceError::InvalidArgument(format!(
                "invalid table: expected dimension {}, found {} (the first dimension must be 2 \
                 and each dimension after it sequential)",
                self.last_dimension + 1,
                row.dimension
            )));
        }
        if row.initial.len() != row.degree {
            return Err(SequenceError::InvalidArgument(format!(
                "invalid table: dimension {} has s = {} but {} initial direction numbers",
                row.dimension,
                row.degree,
                row.initial.len()
            )));
        }
        if row.degree >= DIRECTION_BITS {
            return Err(SequenceError::InvalidArgument(format!(
                "invalid table: dimension {} has degree {} (limit {})",
                row.dimension,
                row.degree,
                DIRECTION_BITS - 1
            )));
        }
        let opens = match row.degree.checked_sub(self.last_degree) {
            Some(0) => false,
            Some(1) => true,
            _ => {
                return Err(SequenceError::InvalidArgument(format!(
                    "invalid table: degree moves from {} to {} at dimension {}",
                    self.last_degree, row.degree, row.dimension
                )))
            }
        };
        self.last_dimension = row.dimension;
        self.last_degree = row.degree;
        Ok(opens)
    }

    pub(crate) fn last_dimension(&self) -> usize {
        self.last_dimension
    }
}

/// Encodes rows into the packed format.
///
/// The header stores the last dimension written. Returns the number of
/// rows encoded.
///
/// # Errors
///
/// - [`SequenceError::InvalidArgument`] if rows are not sequential from 2,
///   if `len(m) != s`, or if the degree does not rise by exactly 0 or 1
/// - [`SequenceError::Io`] on write failure
///
/// # Examples
///
/// ```rust
/// use qrng_quasi::sobol::{encode_rows, DimensionRow, PackedTableReader};
///
/// let rows = vec![
///     DimensionRow::new(2, 1, 0, vec![1]),
///     DimensionRow::new(3, 2, 1, vec![1, 3]),
/// ];
/// let mut packed = Vec::new();
/// encode_rows(rows.clone(), &mut packed).unwrap();
/// assert_eq!(packed, vec![3, 2, 2, 3, 0, 1, 1, 1, 3]);
///
/// let decoded: Vec<DimensionRow> = PackedTableReader::new(packed.as_slice())
///     .rows(3)
///     .unwrap()
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(decoded, rows);
/// ```
pub fn encode_rows<I, W>(rows: I, writer: &mut W) -> Result<usize, SequenceError>
where
    I: IntoIterator<Item = DimensionRow>,
    W: Write + ?Sized,
{
    let mut sequencer = RowSequencer::new();
    let mut boundaries = Vec::new();
    let mut body = Vec::new();
    let mut count = 0usize;

    for row in rows {
        if sequencer.accept(&row)? {
            boundaries.push(to_u32(row.dimension, "dimension")?);
        }
        write_varint(&mut body, row.coefficient)?;
        for &m in &row.initial {
            write_varint(&mut body, m)?;
        }
        count += 1;
    }

    write_varint(writer, to_u32(sequencer.last_dimension(), "dimension")?)?;
    write_varint(writer, to_u32(boundaries.len(), "boundary count")?)?;
    for &boundary in &boundaries {
        write_varint(writer, boundary)?;
    }
    writer.write_all(&body)?;
    writer.flush()?;

    debug!(
        rows = count,
        last_dimension = sequencer.last_dimension(),
        "encoded packed direction table"
    );
    Ok(count)
}

/// Parses a text table and writes it in packed form.
///
/// Returns the number of rows converted.
///
/// # Errors
///
/// Any parse error from the text side, or any encoding error from
/// [`encode_rows`].
pub fn convert_text_to_packed<R, W>(text: R, writer: &mut W) -> Result<usize, SequenceError>
where
    R: BufRead,
    W: Write + ?Sized,
{
    let rows = read_text_table(text)?;
    encode_rows(rows, writer)
}

/// Reader for packed direction tables.
#[derive(Debug)]
pub struct PackedTableReader<R> {
    reader: R,
}

impl<R: Read> PackedTableReader<R> {
    /// Wraps a stream positioned at the start of a packed table.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reads the header and returns a lazy iterator over dimensions
    /// `2..=max_dimension`.
    ///
    /// # Errors
    ///
    /// - [`SequenceError::InvalidState`] if the table's declared last
    ///   dimension is below `max_dimension`, or the boundary list is
    ///   malformed
    /// - [`SequenceError::Io`] if the header is truncated
    pub fn rows(mut self, max_dimension: usize) -> Result<PackedRows<R>, SequenceError> {
        let declared = read_usize(&mut self.reader)?;
        if declared < max_dimension {
            return Err(SequenceError::InvalidState(format!(
                "requested dimensions {} exceeds maximum dimensions {} of the table",
                max_dimension, declared
            )));
        }

        let count = read_usize(&mut self.reader)?;
        if count >= DIRECTION_BITS {
            return Err(SequenceError::InvalidState(format!(
                "table declares {} degree boundaries (limit {})",
                count,
                DIRECTION_BITS - 1
            )));
        }
        let mut boundaries = Vec::with_capacity(count);
        for _ in 0..count {
            let boundary = read_usize(&mut self.reader)?;
            if boundaries.last().map_or(boundary < 2, |&prev| boundary <= prev) {
                return Err(SequenceError::InvalidState(format!(
                    "degree boundaries must be increasing dimensions from 2, found {} after {:?}",
                    boundary, boundaries
                )));
            }
            boundaries.push(boundary);
        }

        debug!(declared, max_dimension, ?boundaries, "read packed table header");
        Ok(PackedRows {
            reader: self.reader,
            boundaries,
            next_boundary: 0,
            degree: 0,
            dimension: 2,
            max_dimension,
            failed: false,
        })
    }
}

/// Lazy iterator over packed table rows; see [`PackedTableReader::rows`].
#[derive(Debug)]
pub struct PackedRows<R> {
    reader: R,
    boundaries: Vec<usize>,
    next_boundary: usize,
    degree: usize,
    dimension: usize,
    max_dimension: usize,
    failed: bool,
}

impl<R: Read> PackedRows<R> {
    fn read_row(&mut self) -> Result<DimensionRow, SequenceError> {
        if self.boundaries.get(self.next_boundary) == Some(&self.dimension) {
            self.degree += 1;
            self.next_boundary += 1;
        }
        let coefficient = read_varint(&mut self.reader)?;
        let initial = (0..self.degree)
            .map(|_| read_varint(&mut self.reader))
            .collect::<Result<Vec<_>, _>>()?;
        trace!(dimension = self.dimension, degree = self.degree, "decoded row");
        Ok(DimensionRow::new(self.dimension, self.degree, coefficient, initial))
    }
}

impl<R: Read> Iterator for PackedRows<R> {
    type Item = Result<DimensionRow, SequenceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.dimension > self.max_dimension {
            return None;
        }
        let row = self.read_row();
        match row {
            Ok(_) => self.dimension += 1,
            Err(_) => self.failed = true,
        }
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = (self.max_dimension + 1).saturating_sub(self.dimension);
        (0, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varint_bytes(value: u32) -> Vec<u8> {
        let mut out = Vec::new();
        write_varint(&mut out, value).unwrap();
        out
    }

    #[test]
    fn test_varint_layout() {
        assert_eq!(varint_bytes(0), vec![0x00]);
        assert_eq!(varint_bytes(127), vec![0x7f]);
        assert_eq!(varint_bytes(128), vec![0x80, 0x01]);
        assert_eq!(varint_bytes(300), vec![0xac, 0x02]);
        assert_eq!(varint_bytes(u32::MAX), vec![0xff, 0xff, 0xff, 0xff, 0x0f]);
    }

    #[test]
    fn test_varint_read_back() {
        for value in [0, 1, 127, 128, 16_383, 16_384, 21_201, u32::MAX] {
            let bytes = varint_bytes(value);
            assert_eq!(read_varint(&mut bytes.as_slice()).unwrap(), value);
        }
    }

    #[test]
    fn test_varint_truncated() {
        let err = read_varint(&mut [0x80u8].as_slice()).unwrap_err();
        assert!(matches!(err, SequenceError::Io(_)));
    }

    #[test]
    fn test_varint_overlong() {
        let bytes = [0xffu8, 0xff, 0xff, 0xff, 0x1f];
        let err = read_varint(&mut bytes.as_slice()).unwrap_err();
        assert!(err.is_invalid_state());

        let bytes = [0x80u8, 0x80, 0x80, 0x80, 0x80, 0x00];
        assert!(read_varint(&mut bytes.as_slice()).unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_sequencer_rejects_gap() {
        let mut seq = RowSequencer::new();
        assert!(seq.accept(&DimensionRow::new(2, 1, 0, vec![1])).unwrap());
        let err = seq.accept(&DimensionRow::new(4, 1, 0, vec![1])).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_sequencer_rejects_first_dimension_other_than_two() {
        let mut seq = RowSequencer::new();
        assert!(seq.accept(&DimensionRow::new(3, 1, 0, vec![1])).is_err());
    }

    #[test]
    fn test_sequencer_rejects_degree_jump() {
        let mut seq = RowSequencer::new();
        seq.accept(&DimensionRow::new(2, 1, 0, vec![1])).unwrap();
        let err = seq
            .accept(&DimensionRow::new(3, 3, 1, vec![1, 3, 1]))
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_empty_table() {
        let mut packed = Vec::new();
        assert_eq!(encode_rows(Vec::new(), &mut packed).unwrap(), 0);
        assert_eq!(packed, vec![1, 0]);

        let rows: Vec<_> = PackedTableReader::new(packed.as_slice())
            .rows(1)
            .unwrap()
            .collect();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_truncated_body_stops_iteration() {
        // Header promises dimensions 2..=3 but the body only holds dimension 2.
        let packed = [3u8, 1, 2, 0, 1];
        let mut rows = PackedTableReader::new(&packed[..]).rows(3).unwrap();
        assert_eq!(rows.next().unwrap().unwrap(), DimensionRow::new(2, 1, 0, vec![1]));
        assert!(matches!(rows.next(), Some(Err(SequenceError::Io(_)))));
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_unordered_boundaries() {
        let packed = [4u8, 2, 3, 2];
        let err = PackedTableReader::new(&packed[..]).rows(4).unwrap_err();
        assert!(err.is_invalid_state());
    }
}
