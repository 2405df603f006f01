//! 64-bit Mersenne Twister (MT19937-64).

use rand::RngCore;

use crate::traits::IntegerSequence64;
use crate::types::error::SnapshotError;

const N: usize = 312;
const M: usize = 156;
const R: u32 = 31;
const A: u64 = 0xB502_6F5A_A966_19E9;
const F: u64 = 6_364_136_223_846_793_005;

const LOWER_MASK: u64 = (1 << R) - 1;
const UPPER_MASK: u64 = !LOWER_MASK;

/// Exported MT19937-64 state: the read index and the 312-word state matrix.
///
/// See [`Mt32State`](super::Mt32State) for the 32-bit counterpart.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mt64State {
    index: usize,
    matrix: Vec<u64>,
}

impl Mt64State {
    /// Number of words in the state matrix.
    pub const MATRIX_LEN: usize = N;

    /// Creates a snapshot from its parts.
    ///
    /// # Errors
    ///
    /// - [`SnapshotError::InvalidLength`] if `matrix.len() != 312`
    /// - [`SnapshotError::InvalidIndex`] if `index > 312`
    pub fn new(index: usize, matrix: Vec<u64>) -> Result<Self, SnapshotError> {
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
    pub fn matrix(&self) -> &[u64] {
        &self.matrix
    }
}

/// MT19937-64 pseudo-random generator producing 64-bit words.
///
/// # Examples
///
/// ```rust
/// use qrng_core::prng::MersenneTwister64;
/// use qrng_core::traits::IntegerSequence64;
///
/// let mut mt = MersenneTwister64::new(5489);
/// assert_eq!(mt.next_u64(), 14_514_284_786_278_117_030);
/// ```
#[derive(Clone)]
pub struct MersenneTwister64 {
    matrix: Box<[u64; N]>,
    index: usize,
}

impl MersenneTwister64 {
    /// Creates a generator initialised from `seed`.
    pub fn new(seed: u64) -> Self {
        let mut matrix = Box::new([0u64; N]);
        matrix[0] = seed;
        for i in 1..N {
            let prev = matrix[i - 1];
            matrix[i] = F.wrapping_mul(prev ^ (prev >> 62)).wrapping_add(i as u64);
        }
        Self { matrix, index: N }
    }

    /// Restores a generator from a previously exported snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the snapshot fails validation.
    pub fn from_state(state: Mt64State) -> Result<Self, SnapshotError> {
        state.validate()?;
        let mut matrix = Box::new([0u64; N]);
        matrix.copy_from_slice(&state.matrix);
        Ok(Self {
            matrix,
            index: state.index,
        })
    }

    /// Exports the current state; the generator itself is unaffected.
    pub fn export_state(&self) -> Mt64State {
        Mt64State {
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

impl std::fmt::Debug for MersenneTwister64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MersenneTwister64")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl IntegerSequence64 for MersenneTwister64 {
    fn next_u64(&mut self) -> u64 {
        if self.index >= N {
            self.twist();
        }

        let mut y = self.matrix[self.index];
        self.index += 1;

        y ^= (y >> 29) & 0x5555_5555_5555_5555;
        y ^= (y << 17) & 0x71D6_7FFF_EDA6_0000;
        y ^= (y << 37) & 0xFFF7_EEE0_0000_0000;
        y ^= y >> 43;
        y
    }
}

impl RngCore for MersenneTwister64 {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        IntegerSequence64::next_u64(self) as u32
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        IntegerSequence64::next_u64(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = IntegerSequence64::next_u64(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
