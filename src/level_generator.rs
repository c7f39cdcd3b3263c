//! Skiplists use a probabilistic distribution of nodes over the internal
//! levels, whereby the lowest level (level 0) contains all the nodes, and each
//! level `$n > 0$` will contain a random subset of the nodes on level `$n - 1$`.
//!
//! Most commonly, a geometric distribution is used whereby the chance that a
//! node occupies level `$n$` is `$p$` times the chance of occupying level
//! `$n-1$` (with `$0 < p < 1$`).
//!
//! Two generators are provided:
//!
//! - [`Geometric`] for an arbitrary promotion probability `$p$`;
//! - [`CoinFlip`] for `$p = 1/2$` exactly, drawing one random word per level.
//!
//! Both take their random source as a parameter, so a seeded generator yields
//! a reproducible sequence of levels. Custom level generators can be
//! implemented through the [`LevelGenerator`] trait.

pub mod coin_flip;
pub mod geometric;

pub use coin_flip::{CoinFlip, CoinFlipError};
pub use geometric::{Geometric, GeometricError};

/// The number of levels used by the default generators, making the highest
/// level a node can be promoted to `62`.
pub const DEFAULT_LEVELS: usize = 63;

// ////////////////////////////////////////////////////////////////////////////
// Level Generator
// ////////////////////////////////////////////////////////////////////////////

/// Upon the insertion of a new node in the map, the node is replicated to
/// higher levels with a certain probability as determined by a
/// [`LevelGenerator`].
///
/// The level drawn for a key must never depend on the key itself, and each
/// call must be independent of the previous ones.
pub trait LevelGenerator {
    /// The total number of levels that are assumed to exist.
    #[must_use]
    fn total(&self) -> usize;

    /// Generate a random level for a new node in the range `[0, total)`.
    ///
    /// This function should _never_ return a level greater or equal to
    /// [`total`][LevelGenerator::total].
    #[must_use]
    fn level(&mut self) -> usize;
}

impl<G: LevelGenerator + ?Sized> LevelGenerator for &mut G {
    #[inline]
    fn total(&self) -> usize {
        (**self).total()
    }

    #[inline]
    fn level(&mut self) -> usize {
        (**self).level()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{CoinFlip, DEFAULT_LEVELS, Geometric, LevelGenerator};

    /// Draw from a generator through a borrowed handle.
    fn draw(mut generator: impl LevelGenerator, n: usize) -> Vec<usize> {
        (0..n).map(|_| generator.level()).collect()
    }

    #[test]
    fn borrowed_generator_advances_owner() -> anyhow::Result<()> {
        let mut borrowed = CoinFlip::seeded(DEFAULT_LEVELS, 7)?;
        let mut owned = CoinFlip::seeded(DEFAULT_LEVELS, 7)?;

        let first = draw(&mut borrowed, 32);
        let second = draw(&mut borrowed, 32);
        let expected: Vec<usize> = (0..64).map(|_| owned.level()).collect();

        assert_eq!([first, second].concat(), expected);
        assert_eq!((&mut borrowed).total(), DEFAULT_LEVELS);
        Ok(())
    }

    #[test]
    fn default_geometric_levels() {
        assert_eq!(Geometric::default().total(), DEFAULT_LEVELS);
    }
}
