//! Gray-code cursor over the Sobol sequence number.

/// Tracks the sequence number and the direction bit to flip next.
///
/// The bit for sequence number `n` is the number of trailing one bits of
/// `n`, i.e. the position of its lowest zero bit. Moving from `n` to `n + 1`
/// changes the Gray code of `n` in exactly that bit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GrayCodeCursor {
    seq: u32,
    bit: usize,
}

impl GrayCodeCursor {
    /// Cursor at sequence number 0, whose bit is 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bit to flip when emitting the current point.
    ///
    /// Equals 32 only for sequence number `u32::MAX`, the last point of the
    /// period.
    #[inline]
    pub fn current(&self) -> usize {
        self.bit
    }

    /// Current sequence number.
    #[inline]
    pub fn sequence(&self) -> u32 {
        self.seq
    }

    /// Cursor positioned at sequence number `seq`.
    #[cfg(test)]
    pub(crate) fn at(seq: u32) -> Self {
        Self {
            seq,
            bit: seq.trailing_ones() as usize,
        }
    }

    /// Moves to the next sequence number, wrapping after `u32::MAX`.
    #[inline]
    pub fn advance(&mut self) {
        self.seq = self.seq.wrapping_add(1);
        self.bit = self.seq.trailing_ones() as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_sequence() {
        let mut cursor = GrayCodeCursor::new();
        let mut bits = Vec::new();
        for _ in 0..16 {
            bits.push(cursor.current());
            cursor.advance();
        }
        assert_eq!(bits, vec![0, 1, 0, 2, 0, 1, 0, 3, 0, 1, 0, 2, 0, 1, 0, 4]);
        assert_eq!(cursor.sequence(), 16);
    }

    #[test]
    fn test_wraps_at_end_of_period() {
        let mut cursor = GrayCodeCursor::at(u32::MAX - 1);
        cursor.advance();
        assert_eq!(cursor.sequence(), u32::MAX);
        assert_eq!(cursor.current(), 32);
        cursor.advance();
        assert_eq!(cursor, GrayCodeCursor::new());
    }
}
