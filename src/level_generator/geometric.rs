//! Geometric level generator.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;

use crate::level_generator::{DEFAULT_LEVELS, LevelGenerator};

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`Geometric`] level generator.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum GeometricError {
    /// The maximum number of levels must be non-zero.
    #[error("max must be non-zero.")]
    ZeroMax,
    /// The maximum number of levels must be less than `i32::MAX`.
    #[error("max must be less than i32::MAX.")]
    MaxTooLarge,
    /// The probability `$p$` must be in the range `$(0, 1)$`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
}

/// A level generator using a geometric distribution.
///
/// This distribution assumes that if a node is present at some level `$n$`,
/// then the probability that it is present at level `$n+1$` is some constant
/// `$p \in (0, 1)$`. This produces a geometric distribution, albeit truncated
/// at the maximum number of levels allowed.
///
/// The random source `R` defaults to [`SmallRng`]; any [`Rng`] can be supplied
/// through [`Geometric::with_rng`].
#[derive(Debug, Clone)]
pub struct Geometric<R = SmallRng> {
    /// The total number of levels that are assumed to exist.
    total: usize,
    /// The probability that a node is present in the next level.
    p: f64,
    /// `$p^{\text{total}}$`, the probability mass cut off by the truncation.
    tail: f64,
    /// The random number generator.
    rng: R,
}

impl Geometric {
    /// Create a new geometric level generator with `total` number of levels,
    /// and `p` as the probability that a given node is present in the next
    /// level. The generator is seeded from the thread-local generator.
    ///
    /// # Errors
    ///
    /// `p` must be between 0 and 1 exclusive, and `total` must be greater or
    /// equal to 1 and fit in an `i32`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::level_generator::{Geometric, LevelGenerator};
    ///
    /// let mut generator = Geometric::new(16, 0.25).unwrap();
    /// assert!(generator.level() < 16);
    /// ```
    #[inline]
    pub fn new(total: usize, p: f64) -> Result<Self, GeometricError> {
        Self::with_rng(total, p, SmallRng::from_rng(&mut rand::rng()))
    }

    /// Create a new geometric level generator whose sequence of levels is
    /// entirely determined by `seed`.
    ///
    /// # Errors
    ///
    /// See [`Geometric::new`].
    #[inline]
    pub fn seeded(total: usize, p: f64, seed: u64) -> Result<Self, GeometricError> {
        Self::with_rng(total, p, SmallRng::seed_from_u64(seed))
    }

    /// Build a generator with `$p = 1/2$` for a `total` already known to be
    /// valid.
    pub(crate) fn halving(total: usize) -> Self {
        let total = total.clamp(1, DEFAULT_LEVELS);
        Geometric {
            total,
            p: 0.5,
            tail: 0.5_f64.powi(i32::try_from(total).unwrap_or(i32::MAX)),
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

impl<R: Rng> Geometric<R> {
    /// Create a new geometric level generator drawing from `rng`.
    ///
    /// # Errors
    ///
    /// See [`Geometric::new`].
    #[inline]
    pub fn with_rng(total: usize, p: f64, rng: R) -> Result<Self, GeometricError> {
        if total == 0 {
            return Err(GeometricError::ZeroMax);
        }
        let Ok(exponent) = i32::try_from(total) else {
            return Err(GeometricError::MaxTooLarge);
        };
        if !(0.0 < p && p < 1.0) {
            return Err(GeometricError::InvalidProbability);
        }
        Ok(Geometric {
            total,
            p,
            tail: p.powi(exponent),
            rng,
        })
    }

    /// The probability that a node present at one level is also present at
    /// the next.
    #[must_use]
    #[inline]
    pub fn probability(&self) -> f64 {
        self.p
    }
}

impl Default for Geometric {
    /// A generator over [`DEFAULT_LEVELS`] levels with `$p = 1/2$`.
    #[inline]
    fn default() -> Self {
        Self::halving(DEFAULT_LEVELS)
    }
}

impl<R: Rng> LevelGenerator for Geometric<R> {
    #[inline]
    fn total(&self) -> usize {
        self.total
    }

    /// Generate a level for a new node using a geometric distribution.
    ///
    /// This function generates a random level in the range
    /// `$[0, \text{total})$` by sampling from a uniform distribution and
    /// inverting the cumulative distribution function of the truncated
    /// geometric distribution, for which
    ///
    /// ```math
    /// P(\text{level} \geq n) = \frac{p^n - p^t}{1 - p^t}
    /// ```
    ///
    /// where `$t$` is the total number of levels. Inverting it for `$n$` gives:
    ///
    /// ```math
    /// n = \left\lfloor \log_p\left(1 - (1 - p^t) \cdot u\right) \right\rfloor
    /// ```
    ///
    /// where `$u \in [0, 1)$` is a uniformly distributed random variate.
    #[inline]
    #[expect(clippy::float_arithmetic, reason = "Computing inverse CDF")]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "The logarithm lies in [0, total) so the cast is safe"
    )]
    #[expect(clippy::as_conversions, reason = "No other way to do this")]
    fn level(&mut self) -> usize {
        let u = self.rng.random::<f64>();
        let level = (1.0 - (1.0 - self.tail) * u).log(self.p).floor() as usize;
        level.min(self.total - 1)
    }
}
