//! A skiplist is a way of storing elements in such a way that elements can be efficiently
//! accessed, inserted and removed, all in `O(log(n))` on average.
//!
//! Conceptually, a skiplist resembles something like:
//!
//! ```text
//! <head> ----------> [2] --------------------------------------------------> [9] ---------->
//! <head> ----------> [2] ------------------------------------[7] ----------> [9] ---------->
//! <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] ->
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] ->
//! ```
//!
//! where each node `[x]` has references to nodes further down the list, allowing the algorithm
//! to effectively skip ahead.
//!
//! This crate provides [`SkipMap`], an ordered map built on such a structure. Besides the usual
//! lookups it answers neighbour queries ([`lower`][SkipMap::lower], [`floor`][SkipMap::floor],
//! [`ceiling`][SkipMap::ceiling], [`higher`][SkipMap::higher]) and visits half-open key ranges in
//! order.
//!
//! All nodes are held in index-addressed arenas, so the map contains no unsafe code. Keys are
//! ordered by a [`Comparator`], either the keys' own [`Ord`] implementation through [`Natural`]
//! or any `Fn(&K, &K) -> Ordering`, and the height of every key is drawn from a
//! [`LevelGenerator`][level_generator::LevelGenerator].
//!
//! ```
//! use skipmap::SkipMap;
//!
//! let mut skipmap = SkipMap::new();
//! for k in [5, 3, 8, 1] {
//!     skipmap.insert(k, k * 10);
//! }
//! assert_eq!(skipmap.get(&3), Some(&30));
//! assert_eq!(skipmap.lower(&5), Some((&3, &30)));
//! assert_eq!(skipmap.ceiling(&6), Some((&8, &80)));
//! assert_eq!(skipmap.remove(&3), Some(30));
//! assert_eq!(skipmap.len(), 3);
//! ```
//!
//! Enabling the `tracing` feature emits trace events whenever the level stack grows or
//! shrinks.

mod arena;
pub mod comparator;
pub mod level_generator;
pub mod skipmap;
mod skipnode;

pub use comparator::{Comparator, Natural};
pub use skipmap::SkipMap;
