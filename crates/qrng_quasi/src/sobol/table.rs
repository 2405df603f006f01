//! Direction-number seed rows and the bundled Joe & Kuo table.

/// One row of a Sobol direction-number table.
///
/// Dimension 1 has no row: its direction vector is the fixed bit ladder
/// built by [`build_dimension_one`](super::build_dimension_one).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DimensionRow {
    /// One-based dimension number (at least 2).
    pub dimension: usize,
    /// Degree `s` of the primitive polynomial.
    pub degree: usize,
    /// Interior coefficients `a` of the primitive polynomial, packed as bits.
    pub coefficient: u32,
    /// Initial direction numbers `m_1 .. m_s`.
    pub initial: Vec<u32>,
}

impl DimensionRow {
    /// Creates a row; `initial.len()` should equal `degree`.
    pub fn new(dimension: usize, degree: usize, coefficient: u32, initial: Vec<u32>) -> Self {
        Self {
            dimension,
            degree,
            coefficient,
            initial,
        }
    }
}

/// Packed Joe & Kuo `new-joe-kuo-6` direction table.
///
/// Covers dimensions 2 to [`BUNDLED_MAX_DIMENSION`]. Produced by
/// [`convert_text_to_packed`](super::convert_text_to_packed); replacing the
/// data file with a longer conversion raises the bundled maximum with it.
pub static BUNDLED_TABLE: &[u8] = PACKED_TABLE;

const PACKED_TABLE: &[u8] = include_bytes!("../../data/new-joe-kuo-6.bin");

/// Leading rows of [`BUNDLED_TABLE`] in the upstream whitespace format.
pub static BUNDLED_TABLE_TEXT: &str = include_str!("../../data/new-joe-kuo-6.prefix.txt");

/// Highest dimension available from the bundled table, read from its header.
pub const BUNDLED_MAX_DIMENSION: usize = header_last_dimension(PACKED_TABLE);

/// Decodes the leading varint of a packed table; 0 if it is malformed.
const fn header_last_dimension(bytes: &[u8]) -> usize {
    let mut value = 0usize;
    let mut i = 0;
    while i < bytes.len() && i < 5 {
        value |= ((bytes[i] & 0x7f) as usize) << (7 * i);
        if bytes[i] & 0x80 == 0 {
            return value;
        }
        i += 1;
    }
    0
}
