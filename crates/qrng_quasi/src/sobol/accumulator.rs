//! Per-dimension Sobol state.

use super::direction::{DirectionVector, DIRECTION_BITS};

const TWO_POW_32: f64 = 4_294_967_296.0;

/// Running XOR of direction numbers for one dimension.
#[derive(Clone, Debug)]
pub struct DimensionAccumulator {
    dimension: usize,
    directions: DirectionVector,
    numerator: u32,
}

impl DimensionAccumulator {
    /// Accumulator for the one-based `dimension`, starting at zero.
    pub fn new(dimension: usize, directions: DirectionVector) -> Self {
        Self {
            dimension,
            directions,
            numerator: 0,
        }
    }

    /// One-based dimension number.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the current coordinate, then flips direction number `bit`.
    ///
    /// A `bit` of 32 or more marks the end of the period; the accumulator
    /// returns to zero instead.
    #[inline]
    pub fn next(&mut self, bit: usize) -> f64 {
        let value = f64::from(self.numerator) / TWO_POW_32;
        self.numerator = match self.directions.get(bit) {
            Some(&v) => self.numerator ^ v,
            None => {
                debug_assert!(bit >= DIRECTION_BITS);
                0
            }
        };
        value
    }
}

#[cfg(test)]
mod tests {
    use super::super::direction::build_dimension_one;
    use super::*;

    #[test]
    fn test_emits_before_flipping() {
        let mut acc = DimensionAccumulator::new(1, build_dimension_one());
        assert_eq!(acc.dimension(), 1);
        assert_eq!(acc.next(0), 0.0);
        assert_eq!(acc.next(1), 0.5);
        assert_eq!(acc.next(0), 0.75);
        assert_eq!(acc.next(2), 0.25);
    }

    #[test]
    fn test_end_of_period_resets() {
        let mut acc = DimensionAccumulator::new(1, build_dimension_one());
        acc.next(0);
        acc.next(32);
        assert_eq!(acc.next(0), 0.0);
    }
}
