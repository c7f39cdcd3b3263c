//! Coin-flip level generator.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;

use crate::level_generator::LevelGenerator;

/// The largest number of levels a [`CoinFlip`] generator can address, one per
/// bit of the random word it draws.
const MAX_TOTAL: usize = 64;

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`CoinFlip`] level generator.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum CoinFlipError {
    /// The maximum number of levels must be non-zero.
    #[error("max must be non-zero.")]
    ZeroMax,
    /// A single random word only provides 64 coin flips.
    #[error("max must be at most 64.")]
    MaxTooLarge,
}

/// A level generator promoting a node to the next level with probability
/// exactly `$1/2$`.
///
/// Each draw takes a single random `u64` and counts its trailing one bits, so
/// level `$n$` is drawn with probability `$2^{-(n+1)}$` until the cap at
/// `total - 1` absorbs the remaining mass.
#[derive(Debug, Clone)]
pub struct CoinFlip<R = SmallRng> {
    /// The total number of levels that are assumed to exist.
    total: usize,
    /// The random number generator.
    rng: R,
}

impl CoinFlip {
    /// Create a new coin-flip level generator with `total` number of levels,
    /// seeded from the thread-local generator.
    ///
    /// # Errors
    ///
    /// `total` must be between 1 and 64 inclusive.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::level_generator::{CoinFlip, LevelGenerator};
    ///
    /// let mut generator = CoinFlip::new(63).unwrap();
    /// assert!(generator.level() <= 62);
    /// ```
    #[inline]
    pub fn new(total: usize) -> Result<Self, CoinFlipError> {
        Self::with_rng(total, SmallRng::from_rng(&mut rand::rng()))
    }

    /// Create a new coin-flip level generator whose sequence of levels is
    /// entirely determined by `seed`.
    ///
    /// # Errors
    ///
    /// See [`CoinFlip::new`].
    #[inline]
    pub fn seeded(total: usize, seed: u64) -> Result<Self, CoinFlipError> {
        Self::with_rng(total, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> CoinFlip<R> {
    /// Create a new coin-flip level generator drawing from `rng`.
    ///
    /// # Errors
    ///
    /// See [`CoinFlip::new`].
    #[inline]
    pub fn with_rng(total: usize, rng: R) -> Result<Self, CoinFlipError> {
        match total {
            0 => Err(CoinFlipError::ZeroMax),
            1..=MAX_TOTAL => Ok(CoinFlip { total, rng }),
            _ => Err(CoinFlipError::MaxTooLarge),
        }
    }
}

impl<R: Rng> LevelGenerator for CoinFlip<R> {
    #[inline]
    fn total(&self) -> usize {
        self.total
    }

    #[inline]
    fn level(&mut self) -> usize {
        let flips = self.rng.next_u64().trailing_ones();
        usize::try_from(flips).map_or(self.total - 1, |level| level.min(self.total - 1))
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rand::RngCore;
    use rstest::rstest;

    use super::{CoinFlip, CoinFlipError, LevelGenerator};

    /// A random source that always yields the same word.
    struct Constant(u64);

    impl RngCore for Constant {
        fn next_u32(&mut self) -> u32 {
            (self.0 & 0xffff_ffff) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for (byte, src) in dst.iter_mut().zip(self.0.to_le_bytes().iter().cycle()) {
                *byte = *src;
            }
        }
    }

    #[rstest]
    #[case(0, Some(CoinFlipError::ZeroMax))]
    #[case(1, None)]
    #[case(64, None)]
    #[case(65, Some(CoinFlipError::MaxTooLarge))]
    fn validates_total(#[case] total: usize, #[case] error: Option<CoinFlipError>) {
        assert_eq!(CoinFlip::new(total).err(), error);
    }

    #[rstest]
    #[case(0b0, 0)]
    #[case(0b1, 1)]
    #[case(0b1011, 2)]
    #[case(0b0111_1111, 7)]
    #[case(u64::MAX, 62)]
    fn counts_trailing_ones(#[case] word: u64, #[case] level: usize) -> Result<()> {
        let mut generator = CoinFlip::with_rng(63, Constant(word))?;
        assert_eq!(generator.level(), level);
        Ok(())
    }

    #[test]
    fn halves_per_level() -> Result<()> {
        let samples = 200_000_u32;
        let mut generator = CoinFlip::seeded(63, 0x1234_abcd)?;
        let mut counts = [0_u32; 4];
        for _ in 0..samples {
            if let Some(count) = counts.get_mut(generator.level()) {
                *count += 1;
            }
        }
        let mut expected = 0.5;
        for (level, &count) in counts.iter().enumerate() {
            let observed = f64::from(count) / f64::from(samples);
            assert!(
                (observed - expected).abs() < 0.01,
                "level {level}: observed {observed}, expected {expected}"
            );
            expected /= 2.0;
        }
        Ok(())
    }

    #[test]
    fn single_level_is_always_zero() -> Result<()> {
        let mut generator = CoinFlip::seeded(1, 3)?;
        assert!((0..1000).all(|_| generator.level() == 0));
        Ok(())
    }
}
