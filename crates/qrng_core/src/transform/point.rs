//! Adapter from a scalar double sequence to the point-sequence contract.

use crate::traits::{DoubleSequence, PointSequence};

/// Point sequence drawing `dimensions` consecutive doubles per point.
///
/// Coordinates are filled in dimension order, so point `k` consumes draws
/// `k * dimensions .. (k + 1) * dimensions` of the underlying sequence.
#[derive(Clone, Debug)]
pub struct PointsFromDoubles<D> {
    sequence: D,
    dimensions: usize,
}

impl<D: DoubleSequence> PointsFromDoubles<D> {
    /// Wraps `sequence` as a `dimensions`-dimensional point sequence.
    pub fn new(sequence: D, dimensions: usize) -> Self {
        Self {
            sequence,
            dimensions,
        }
    }
}

impl<D: DoubleSequence> PointSequence for PointsFromDoubles<D> {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn fill_point(&mut self, out: &mut [f64]) {
        assert_eq!(out.len(), self.dimensions, "point buffer length");
        for value in out.iter_mut() {
            *value = self.sequence.next_f64();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Steps(f64);

    impl DoubleSequence for Steps {
        fn next_f64(&mut self) -> f64 {
            self.0 += 0.25;
            self.0
        }
    }

    #[test]
    fn test_draws_in_dimension_order() {
        let mut points = PointsFromDoubles::new(Steps(0.0), 2);
        assert_eq!(points.dimensions(), 2);
        assert_eq!(points.next_point(), vec![0.25, 0.5]);
        assert_eq!(points.next_point(), vec![0.75, 1.0]);
    }

    #[test]
    #[should_panic(expected = "point buffer length")]
    fn test_wrong_buffer_length_panics() {
        let mut points = PointsFromDoubles::new(Steps(0.0), 3);
        let mut buffer = [0.0; 2];
        points.fill_point(&mut buffer);
    }
}
