//! Sequence contracts shared by every generator in the workspace.
//!
//! This module defines:
//! - Raw integer sources (`IntegerSequence32`, `IntegerSequence64`)
//! - Scalar floating-point sources (`DoubleSequence`)
//! - Fixed-dimension point sources (`PointSequence`)
//!
//! All sequences are infinite, stateful and single-threaded: each call
//! advances internal state, so sharing one instance between callers needs
//! external serialisation. Independent instances never share mutable state.

/// Infinite source of 32-bit unsigned integers.
pub trait IntegerSequence32 {
    /// Returns the next value and advances the sequence.
    fn next_u32(&mut self) -> u32;
}

/// Infinite source of 64-bit unsigned integers.
pub trait IntegerSequence64 {
    /// Returns the next value and advances the sequence.
    fn next_u64(&mut self) -> u64;
}

/// Infinite source of `f64` values in a fixed interval.
pub trait DoubleSequence {
    /// Returns the next value and advances the sequence.
    fn next_f64(&mut self) -> f64;
}

impl<T: IntegerSequence32 + ?Sized> IntegerSequence32 for &mut T {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}

impl<T: IntegerSequence64 + ?Sized> IntegerSequence64 for &mut T {
    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }
}

/// Fixed-dimension point sequence in the unit hypercube (or a transformed
/// domain, for the pseudo-random adapter).
///
/// Implemented by the Halton and Sobol engines in `qrng_quasi` and by
/// [`PointsFromDoubles`](crate::transform::PointsFromDoubles).
///
/// # Examples
///
/// ```rust
/// use qrng_core::traits::PointSequence;
///
/// struct Diagonal {
///     step: u32,
/// }
///
/// impl PointSequence for Diagonal {
///     fn dimensions(&self) -> usize {
///         2
///     }
///
///     fn fill_point(&mut self, out: &mut [f64]) {
///         let x = f64::from(self.step) / 16.0;
///         out.iter_mut().for_each(|v| *v = x);
///         self.step = (self.step + 1) % 16;
///     }
/// }
///
/// let mut seq = Diagonal { step: 0 };
/// let first_three: Vec<Vec<f64>> = seq.points().take(3).collect();
/// assert_eq!(first_three[2], vec![0.125, 0.125]);
/// ```
pub trait PointSequence {
    /// Returns the dimensionality of each point. Fixed at construction.
    fn dimensions(&self) -> usize;

    /// Writes the next point into `out` and advances the sequence.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `out.len() != self.dimensions()`.
    fn fill_point(&mut self, out: &mut [f64]);

    /// Returns the next point as a freshly allocated vector.
    fn next_point(&mut self) -> Vec<f64> {
        let mut point = vec![0.0; self.dimensions()];
        self.fill_point(&mut point);
        point
    }

    /// Borrows the sequence as an infinite iterator of points.
    fn points(&mut self) -> Points<'_, Self>
    where
        Self: Sized,
    {
        Points { inner: self }
    }
}

/// Infinite iterator over a [`PointSequence`]; see [`PointSequence::points`].
#[derive(Debug)]
pub struct Points<'a, S> {
    inner: &'a mut S,
}

impl<S: PointSequence> Iterator for Points<'_, S> {
    type Item = Vec<f64>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.inner.next_point())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
