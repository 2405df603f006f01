//! # Halton Sequence
//!
//! The Halton point for step `n` writes `n` in base `b_i` for each dimension
//! `i` and reflects the digits about the radix point (the radical inverse).
//! With pairwise coprime bases the resulting points fill the unit hypercube
//! with low discrepancy.
//!
//! Per-dimension `skip` and `leap` select the index actually expanded:
//! `index = skip + step * leap`. Optional RR2 scrambling replaces every digit
//! through a per-base permutation before reflection, which breaks up the
//! correlation between high dimensions with nearby bases.
//!
//! ```rust
//! use qrng_core::traits::PointSequence;
//! use qrng_quasi::halton::HaltonSequence;
//!
//! let mut halton = HaltonSequence::new(2).unwrap();
//! assert_eq!(halton.next_point(), vec![0.0, 0.0]);
//! assert_eq!(halton.next_point(), vec![1.0 / 2.0, 1.0 / 3.0]);
//! assert_eq!(halton.next_point(), vec![1.0 / 4.0, 2.0 / 3.0]);
//! ```

mod permutation;

pub use permutation::rr2_permutation;

use qrng_core::math::primes::{first_n_primes, first_shared_factor};
use qrng_core::traits::PointSequence;
use qrng_core::SequenceError;
use tracing::debug;

/// Uniform or per-dimension setting for leap and skip.
#[derive(Clone, Debug, PartialEq, Eq)]
enum PerDimension {
    Uniform(u32),
    Each(Vec<u32>),
}

impl PerDimension {
    fn expand(
        &self,
        name: &'static str,
        dimensions: usize,
    ) -> Result<Vec<u32>, SequenceError> {
        match self {
            Self::Uniform(value) => Ok(vec![*value; dimensions]),
            Self::Each(values) if values.len() == dimensions => Ok(values.clone()),
            Self::Each(values) => Err(SequenceError::InvalidArgument(format!(
                "{} has {} entries but the sequence has {} dimensions",
                name,
                values.len(),
                dimensions
            ))),
        }
    }
}

/// Builder for [`HaltonSequence`].
///
/// Every setting has a default; validation happens in [`build`](Self::build).
///
/// | Setting | Default |
/// |---|---|
/// | bases | first `dimensions` primes starting at 2 |
/// | leap | 1 for every dimension |
/// | skip | 0 for every dimension |
/// | scrambled | false (identity digit permutation) |
///
/// # Examples
///
/// ```rust
/// use qrng_quasi::halton::HaltonSequence;
///
/// let halton = HaltonSequence::builder(3)
///     .bases(vec![5, 3, 7])
///     .skips(vec![0, 1, 2])
///     .leaps(vec![1, 2, 3])
///     .build()
///     .expect("valid configuration");
/// assert_eq!(halton.bases(), vec![5, 3, 7]);
/// ```
#[derive(Clone, Debug)]
pub struct HaltonBuilder {
    dimensions: usize,
    bases: Option<Vec<u32>>,
    leaps: PerDimension,
    skips: PerDimension,
    scrambled: bool,
}

impl HaltonBuilder {
    fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            bases: None,
            leaps: PerDimension::Uniform(1),
            skips: PerDimension::Uniform(0),
            scrambled: false,
        }
    }

    /// Sets explicit bases, one per dimension. They must be pairwise coprime.
    #[inline]
    pub fn bases(mut self, bases: Vec<u32>) -> Self {
        self.bases = Some(bases);
        self
    }

    /// Sets the same leap (step multiplier) for every dimension.
    #[inline]
    pub fn leap(mut self, leap: u32) -> Self {
        self.leaps = PerDimension::Uniform(leap);
        self
    }

    /// Sets a leap per dimension.
    #[inline]
    pub fn leaps(mut self, leaps: Vec<u32>) -> Self {
        self.leaps = PerDimension::Each(leaps);
        self
    }

    /// Sets the same skip (initial index offset) for every dimension.
    #[inline]
    pub fn skip(mut self, skip: u32) -> Self {
        self.skips = PerDimension::Uniform(skip);
        self
    }

    /// Sets a skip per dimension.
    #[inline]
    pub fn skips(mut self, skips: Vec<u32>) -> Self {
        self.skips = PerDimension::Each(skips);
        self
    }

    /// Enables or disables RR2 digit scrambling.
    #[inline]
    pub fn scrambled(mut self, scrambled: bool) -> Self {
        self.scrambled = scrambled;
        self
    }

    /// Validates the configuration and builds the sequence.
    ///
    /// # Errors
    ///
    /// - [`SequenceError::OutOfRange`] if `dimensions == 0`, a base is below 2,
    ///   a leap is 0, or default bases would need more than 1000 primes
    /// - [`SequenceError::InvalidArgument`] if explicit bases share a factor or
    ///   any per-dimension list has the wrong length
    pub fn build(self) -> Result<HaltonSequence, SequenceError> {
        let dimensions = self.dimensions;
        if dimensions == 0 {
            return Err(SequenceError::out_of_range(
                "dimensions",
                dimensions,
                "must be at least 1",
            ));
        }

        let bases = match self.bases {
            Some(bases) => {
                validate_bases(&bases, dimensions)?;
                bases
            }
            None => first_n_primes(dimensions)?,
        };

        let leaps = self.leaps.expand("leaps", dimensions)?;
        if let Some(&leap) = leaps.iter().find(|&&leap| leap == 0) {
            return Err(SequenceError::out_of_range("leap", leap, "must be at least 1"));
        }
        let skips = self.skips.expand("skips", dimensions)?;

        // Unscrambled axes use each digit as is.
        let permutations: Vec<Option<Vec<u32>>> = if self.scrambled {
            rr2_permutation(&bases).into_iter().map(Some).collect()
        } else {
            vec![None; dimensions]
        };

        debug!(
            dimensions,
            scrambled = self.scrambled,
            ?bases,
            "Halton sequence constructed"
        );

        let axes = bases
            .into_iter()
            .zip(leaps)
            .zip(skips)
            .zip(permutations)
            .map(|(((base, leap), skip), permutation)| HaltonAxis {
                base,
                leap,
                skip,
                permutation,
            })
            .collect();

        Ok(HaltonSequence {
            axes,
            step: 0,
            scrambled: self.scrambled,
        })
    }
}

fn validate_bases(bases: &[u32], dimensions: usize) -> Result<(), SequenceError> {
    if bases.len() != dimensions {
        return Err(SequenceError::InvalidArgument(format!(
            "bases has {} entries but the sequence has {} dimensions",
            bases.len(),
            dimensions
        )));
    }
    if let Some(&base) = bases.iter().find(|&&base| base < 2) {
        return Err(SequenceError::out_of_range("base", base, "must be at least 2"));
    }
    if let Some((i, j)) = first_shared_factor(bases) {
        return Err(SequenceError::InvalidArgument(format!(
            "bases must be mutually prime, but {} and {} share a factor",
            bases[i], bases[j]
        )));
    }
    Ok(())
}

/// One dimension of a Halton sequence.
#[derive(Clone, Debug)]
struct HaltonAxis {
    base: u32,
    leap: u32,
    skip: u32,
    /// RR2 digit table; `None` is the identity.
    permutation: Option<Vec<u32>>,
}

impl HaltonAxis {
    /// Permuted radical inverse of `skip + step * leap`.
    ///
    /// Accumulates an exact fraction in 128-bit integers and divides once.
    fn coordinate(&self, step: u64) -> f64 {
        let base = u128::from(self.base);
        let mut index = u128::from(self.skip) + u128::from(step) * u128::from(self.leap);
        let mut numerator: u128 = 0;
        let mut denominator: u128 = 1;

        while index != 0 {
            let digit = (index % base) as u32;
            let digit = match &self.permutation {
                Some(table) => table[digit as usize],
                None => digit,
            };
            numerator = numerator * base + u128::from(digit);
            denominator *= base;
            index /= base;
        }

        numerator as f64 / denominator as f64
    }
}

/// Halton point sequence.
///
/// Infinite and stateful: every call to
/// [`next_point`](PointSequence::next_point) advances one shared step
/// counter. There is no rewind; construct a new sequence to start over.
#[derive(Clone, Debug)]
pub struct HaltonSequence {
    axes: Vec<HaltonAxis>,
    step: u64,
    scrambled: bool,
}

impl HaltonSequence {
    /// Unscrambled sequence over the first `dimensions` primes.
    ///
    /// # Errors
    ///
    /// See [`HaltonBuilder::build`].
    pub fn new(dimensions: usize) -> Result<Self, SequenceError> {
        Self::builder(dimensions).build()
    }

    /// Starts a builder for a `dimensions`-dimensional sequence.
    pub fn builder(dimensions: usize) -> HaltonBuilder {
        HaltonBuilder::new(dimensions)
    }

    /// Bases in dimension order.
    pub fn bases(&self) -> Vec<u32> {
        self.axes.iter().map(|axis| axis.base).collect()
    }

    /// Number of points emitted so far.
    #[inline]
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Whether RR2 scrambling is applied.
    #[inline]
    pub fn is_scrambled(&self) -> bool {
        self.scrambled
    }
}

impl PointSequence for HaltonSequence {
    fn dimensions(&self) -> usize {
        self.axes.len()
    }

    fn fill_point(&mut self, out: &mut [f64]) {
        assert_eq!(out.len(), self.axes.len(), "point buffer length");
        for (value, axis) in out.iter_mut().zip(&self.axes) {
            *value = axis.coordinate(self.step);
        }
        self.step += 1;
    }
}
