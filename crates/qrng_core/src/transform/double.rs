//! Affine integer-to-double transforms.
//!
//! Every transform has the form `((x >> shift) + delta) * scale`, where `x`
//! is a raw integer from the underlying sequence. The constants are chosen
//! per target [`Interval`] so that the extreme integer values land exactly
//! on (or exactly one resolution step inside) the interval endpoints.

use crate::traits::{DoubleSequence, IntegerSequence32, IntegerSequence64};

/// Target interval for a double transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Interval {
    /// `[0, 1)`
    ZeroClosedOneOpen,
    /// `[0, 1]`
    ZeroOneClosed,
    /// `(0, 1)`
    ZeroOneOpen,
    /// `[-0.5, 0.5]`
    CenteredClosed,
    /// `[a, b]`
    RangeClosed(f64, f64),
    /// `[a, b)`
    RangeClosedOpen(f64, f64),
}

/// Resolution of a transform fed by a 32-bit integer sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Resolution {
    /// One draw per value; 32 bits of randomness.
    #[default]
    Bits32,
    /// Two draws per value (27 + 26 bits); full double precision.
    Bits53,
}

/// Raw integer width seen by the affine map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SourceWidth {
    Native64,
    Raw32,
    Combined53,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Affine {
    shift: u32,
    delta: f64,
    scale: f64,
}

impl Affine {
    fn new(interval: Interval, width: SourceWidth) -> Self {
        let base_shift = match width {
            SourceWidth::Native64 => 11,
            SourceWidth::Raw32 | SourceWidth::Combined53 => 0,
        };
        // Number of representable steps for a half-open unit interval.
        let steps = match width {
            SourceWidth::Raw32 => (1u64 << 32) as f64,
            SourceWidth::Native64 | SourceWidth::Combined53 => (1u64 << 53) as f64,
        };

        match interval {
            Interval::ZeroClosedOneOpen => Self {
                shift: base_shift,
                delta: 0.0,
                scale: 1.0 / steps,
            },
            Interval::ZeroOneClosed => Self {
                shift: base_shift,
                delta: 0.0,
                scale: 1.0 / (steps - 1.0),
            },
            // The half-step offset needs a spare mantissa bit at 53-bit precision.
            Interval::ZeroOneOpen => match width {
                SourceWidth::Raw32 => Self {
                    shift: 0,
                    delta: 0.5,
                    scale: 1.0 / steps,
                },
                SourceWidth::Native64 | SourceWidth::Combined53 => Self {
                    shift: base_shift + 1,
                    delta: 0.5,
                    scale: 2.0 / steps,
                },
            },
            Interval::CenteredClosed => {
                let p = steps - 1.0;
                Self {
                    shift: base_shift,
                    delta: -p / 2.0,
                    scale: 1.0 / p,
                }
            }
            Interval::RangeClosed(a, b) => Self::range(base_shift, steps - 1.0, a, b),
            Interval::RangeClosedOpen(a, b) => Self::range(base_shift, steps, a, b),
        }
    }

    fn range(shift: u32, p: f64, a: f64, b: f64) -> Self {
        let p_adj = p / (b - a);
        Self {
            shift,
            delta: p_adj * a,
            scale: 1.0 / p_adj,
        }
    }

    #[inline]
    fn apply(&self, raw: u64) -> f64 {
        ((raw >> self.shift) as f64 + self.delta) * self.scale
    }
}

/// Doubles from a 64-bit integer sequence at 53-bit precision.
///
/// # Examples
///
/// ```rust
/// use qrng_core::prng::MersenneTwister64;
/// use qrng_core::traits::DoubleSequence;
/// use qrng_core::transform::{DoubleSequence64, Interval};
///
/// let mut seq = DoubleSequence64::new(Interval::RangeClosed(-2.0, 3.0), MersenneTwister64::new(1));
/// let x = seq.next_f64();
/// assert!((-2.0..=3.0).contains(&x));
/// ```
#[derive(Clone, Debug)]
pub struct DoubleSequence64<S> {
    affine: Affine,
    underlying: S,
}

impl<S: IntegerSequence64> DoubleSequence64<S> {
    /// Wraps `underlying`, mapping its output into `interval`.
    pub fn new(interval: Interval, underlying: S) -> Self {
        Self {
            affine: Affine::new(interval, SourceWidth::Native64),
            underlying,
        }
    }

    /// Consumes the transform, returning the integer source.
    pub fn into_inner(self) -> S {
        self.underlying
    }
}

impl<S: IntegerSequence64> DoubleSequence for DoubleSequence64<S> {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        self.affine.apply(self.underlying.next_u64())
    }
}

/// Doubles from a 32-bit integer sequence, at 32-bit or 53-bit resolution.
///
/// At [`Resolution::Bits53`] each value consumes two draws: the top 27 bits
/// of the first and the top 26 bits of the second.
#[derive(Clone, Debug)]
pub struct DoubleSequence32<S> {
    affine: Affine,
    resolution: Resolution,
    underlying: S,
}

impl<S: IntegerSequence32> DoubleSequence32<S> {
    /// Wraps `underlying`, mapping its output into `interval`.
    pub fn new(interval: Interval, resolution: Resolution, underlying: S) -> Self {
        let width = match resolution {
            Resolution::Bits32 => SourceWidth::Raw32,
            Resolution::Bits53 => SourceWidth::Combined53,
        };
        Self {
            affine: Affine::new(interval, width),
            resolution,
            underlying,
        }
    }

    /// The resolution chosen at construction.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Consumes the transform, returning the integer source.
    pub fn into_inner(self) -> S {
        self.underlying
    }
}

impl<S: IntegerSequence32> DoubleSequence for DoubleSequence32<S> {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        let raw = match self.resolution {
            Resolution::Bits32 => u64::from(self.underlying.next_u32()),
            Resolution::Bits53 => {
                let high = u64::from(self.underlying.next_u32() >> 5);
                let low = u64::from(self.underlying.next_u32() >> 6);
                (high << 26) | low
            }
        };
        self.affine.apply(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Replays a fixed list of values.
    struct Fake32 {
        values: Vec<u32>,
        position: usize,
    }

    impl Fake32 {
        fn new(values: &[u32]) -> Self {
            Self {
                values: values.to_vec(),
                position: 0,
            }
        }
    }

    impl IntegerSequence32 for Fake32 {
        fn next_u32(&mut self) -> u32 {
            let value = self.values[self.position];
            self.position += 1;
            value
        }
    }

    struct Fake64 {
        values: Vec<u64>,
        position: usize,
    }

    impl Fake64 {
        fn new(values: &[u64]) -> Self {
            Self {
                values: values.to_vec(),
                position: 0,
            }
        }
    }

    impl IntegerSequence64 for Fake64 {
        fn next_u64(&mut self) -> u64 {
            let value = self.values[self.position];
            self.position += 1;
            value
        }
    }

    const EPS_53: f64 = 1.0 / (1u64 << 53) as f64;
    // Keeps the 53-bit combination from borrowing bits it should discard.
    const MAX_HIGH: u32 = !((1u32 << 5) - 1);
    const MAX_LOW: u32 = !((1u32 << 6) - 1);

    fn seq64(interval: Interval) -> DoubleSequence64<Fake64> {
        DoubleSequence64::new(interval, Fake64::new(&[u64::MIN, u64::MAX]))
    }

    fn seq32(interval: Interval) -> DoubleSequence32<Fake32> {
        DoubleSequence32::new(interval, Resolution::Bits32, Fake32::new(&[u32::MIN, u32::MAX]))
    }

    fn seq53(interval: Interval) -> DoubleSequence32<Fake32> {
        DoubleSequence32::new(
            interval,
            Resolution::Bits53,
            Fake32::new(&[u32::MIN, u32::MIN, MAX_HIGH, MAX_LOW]),
        )
    }

    #[test]
    fn test_zero_closed_one_open() {
        let mut s = seq64(Interval::ZeroClosedOneOpen);
        assert_eq!(s.next_f64(), 0.0);
        assert_eq!(s.next_f64(), 1.0 - EPS_53);

        let mut s = seq32(Interval::ZeroClosedOneOpen);
        assert_eq!(s.next_f64(), 0.0);
        assert_eq!(s.next_f64(), 1.0 - 1.0 / (1u64 << 32) as f64);

        let mut s = seq53(Interval::ZeroClosedOneOpen);
        assert_eq!(s.next_f64(), 0.0);
        assert_eq!(s.next_f64(), 1.0 - EPS_53);
    }

    #[test]
    fn test_zero_one_closed() {
        let mut s = seq64(Interval::ZeroOneClosed);
        assert_eq!(s.next_f64(), 0.0);
        assert_abs_diff_eq!(s.next_f64(), 1.0, epsilon = 1e-15);

        let mut s = seq32(Interval::ZeroOneClosed);
        assert_eq!(s.next_f64(), 0.0);
        assert_abs_diff_eq!(s.next_f64(), 1.0, epsilon = 1e-15);

        let mut s = seq53(Interval::ZeroOneClosed);
        assert_eq!(s.next_f64(), 0.0);
        assert_abs_diff_eq!(s.next_f64(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_zero_one_open() {
        let mut s = seq64(Interval::ZeroOneOpen);
        assert_eq!(s.next_f64(), EPS_53);
        assert_eq!(s.next_f64(), 1.0 - EPS_53);

        let eps_33 = 1.0 / (1u64 << 33) as f64;
        let mut s = seq32(Interval::ZeroOneOpen);
        assert_eq!(s.next_f64(), eps_33);
        assert_eq!(s.next_f64(), 1.0 - eps_33);

        let mut s = seq53(Interval::ZeroOneOpen);
        assert_eq!(s.next_f64(), EPS_53);
        assert_eq!(s.next_f64(), 1.0 - EPS_53);
    }

    #[test]
    fn test_centered_closed() {
        let mut s = seq64(Interval::CenteredClosed);
        assert_abs_diff_eq!(s.next_f64(), -0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(s.next_f64(), 0.5, epsilon = 1e-15);

        let mut s = seq32(Interval::CenteredClosed);
        assert_abs_diff_eq!(s.next_f64(), -0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(s.next_f64(), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_ranges() {
        let mut s = seq64(Interval::RangeClosed(-3.0, 5.0));
        assert_abs_diff_eq!(s.next_f64(), -3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.next_f64(), 5.0, epsilon = 1e-12);

        let mut s = seq32(Interval::RangeClosedOpen(10.0, 20.0));
        assert_abs_diff_eq!(s.next_f64(), 10.0, epsilon = 1e-12);
        let top = s.next_f64();
        assert!(top < 20.0);
        assert_abs_diff_eq!(top, 20.0, epsilon = 1e-8);
    }

    #[test]
    fn test_high_resolution_consumes_two_draws() {
        let mut s = DoubleSequence32::new(
            Interval::ZeroClosedOneOpen,
            Resolution::Bits53,
            Fake32::new(&[1, 2, 3, 4]),
        );
        s.next_f64();
        s.next_f64();
        assert_eq!(s.into_inner().position, 4);
    }
}
