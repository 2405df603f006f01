//! 32-bit Mersenne Twister (MT19937).

use rand::RngCore;

use crate::traits::IntegerSequence32;
use crate::types::error::SnapshotError;

/// Degree of recurrence (state words).
const N: usize = 624;
/// Middle word offset.
const M: usize = 397;
/// Separation point of one word.
const R: u32 = 31;
/// Twist matrix coefficients.
const A: u32 = 0x9908_B0DF;
/// Seeding multiplier.
const F: u32 = 1_812_433_253;

const LOWER_MASK: u32 = (1 << R) - 1;
const UPPER_MASK: u32 = !LOWER_MASK;

/// Exported MT19937 state: the read index and the 624-word state matrix.
///
/// Passed by value between [`MersenneTwister32::export_state`] and
/// [`MersenneTwister32::from_state`]; both construction and import validate
/// the matrix length and index bounds.
///
/// # Examples
///
/// ```rust
/// use qrng_core::prng::Mt32State;
///
/// assert!(Mt32State::new(0, vec![0; 624]).is_ok());
/// assert!(Mt32State::new(0, vec![0; 10]).is_err());
/// assert!(Mt32State::new(625, vec![0; 624]).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mt32State {
    index: usize,
    matrix: Vec<u32>,
}

impl Mt32State {
    /// Number of words in the state matrix.
    pub const MATRIX_LEN: usize = N;

    /// Creates a snapshot from its parts.
    ///
    /// # Errors
    ///
    /// - [`SnapshotError::InvalidLength`] if `matrix.len() != 624`
    /// - [`SnapshotError::InvalidIndex`] if `index > 624`
    pub fn new(index: usize, matrix: Vec<u32>) -> Result<Self, SnapshotError> {
        let state = Self { index, matrix };
        state.validate()?;
        Ok(state)
    }

    /// Checks matrix length and index bounds.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.matrix.len() != N {
            return Err(SnapshotError::InvalidLength {
                expected: N,
                got: self.matrix.len(),
            });
        }
        if self.index > N {
            return Err(SnapshotError::InvalidIndex {
                index: self.index,
                max: N,
            });
        }
        Ok(())
    }

    /// Index of the next word to temper.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The state matrix.
    #[inline]
    pub fn matrix(&self) -> &[u32] {
        &self.matrix
    }
}

/// MT19937 pseudo-random generator producing 32-bit words.
///
/// # Examples
///
/// ```rust
/// use qrng_core::prng::MersenneTwister32;
/// use qrng_core::traits::IntegerSequence32;
///
/// let mut mt = MersenneTwister32::new(5489);
/// assert_eq!(mt.next_u32(), 3_499_211_612);
/// ```
#[derive(Clone)]
pub struct MersenneTwister32 {
    matrix: Box<[u32; N]>,
    index: usize,
}

impl MersenneTwister32 {
    /// Creates a generator initialised from `seed`.
    pub fn new(seed: u32) -> Self {
        let mut matrix = Box::new([0u32; N]);
        matrix[0] = seed;
        for i in 1..N {
            let prev = matrix[i - 1];
            matrix[i] = F.wrapping_mul(prev ^ (prev >> 30)).wrapping_add(i as u32);
        }
        Self { matrix, index: N }
    }

    /// Restores a generator from a previously exported snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the snapshot fails validation.
    pub fn from_state(state: Mt32State) -> Result<Self, SnapshotError> {
        state.validate()?;
        let mut matrix = Box::new([0u32; N]);
        matrix.copy_from_slice(&state.matrix);
        Ok(Self {
            matrix,
            index: state.index,
        })
    }

    /// Exports the current state; the generator itself is unaffected.
    pub fn export_state(&self) -> Mt32State {
        Mt32State {
            index: self.index,
            matrix: self.matrix.to_vec(),
        }
    }

    fn twist(&mut self) {
        for i in 0..N {
            let x = (self.matrix[i] & UPPER_MASK) | (self.matrix[(i + 1) % N] & LOWER_MASK);
            let mut x_a = x >> 1;
            if x & 1 != 0 {
                x_a ^= A;
            }
            self.matrix[i] = self.matrix[(i + M) % N] ^ x_a;
        }
        self.index = 0;
    }
}

impl std::fmt::Debug for MersenneTwister32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MersenneTwister32")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl IntegerSequence32 for MersenneTwister32 {
    fn next_u32(&mut self) -> u32 {
        if self.index >= N {
            self.twist();
        }

        let mut y = self.matrix[self.index];
        self.index += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9D2C_5680;
        y ^= (y << 15) & 0xEFC6_0000;
        y ^= y >> 18;
        y
    }
}

impl RngCore for MersenneTwister32 {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        IntegerSequence32::next_u32(self)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        let low = u64::from(IntegerSequence32::next_u32(self));
        let high = u64::from(IntegerSequence32::next_u32(self));
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = IntegerSequence32::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
