//! Orderings used to sort the keys of a [`SkipMap`][crate::SkipMap].
//!
//! The map never relies on `K: Ord` directly; instead it consults a
//! [`Comparator`] supplied at construction. Any `Fn(&K, &K) -> Ordering`
//! closure is a comparator, and [`Natural`] forwards to [`Ord::cmp`].
//!
//! A comparator **must** be well-behaved. Specifically, given some ordering
//! function `f(a, b)`, it must satisfy the following properties:
//!
//! - Be well defined: `f(a, b)` should always return the same value
//! - Be anti-symmetric: `f(a, b) == Greater` iff `f(b, a) == Less` and
//!   `f(a, b) == Equal == f(b, a)`.
//! - Be transitive: If `f(a, b) == Greater` and `f(b, c) == Greater` then
//!   `f(a, c) == Greater`.
//!
//! A comparator breaking these rules, or one whose ordering changes after keys
//! have been inserted, leaves the map in an unspecified (but memory-safe)
//! state: lookups may miss keys and traversals may yield them out of order.

use std::cmp::Ordering;

/// A three-way ordering over keys of type `K`.
pub trait Comparator<K: ?Sized> {
    /// Compare `a` with `b`.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The ordering given by the key's [`Ord`] implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<K: Ord + ?Sized> Comparator<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use pretty_assertions::assert_eq;

    use super::{Comparator, Natural};

    #[test]
    fn natural() {
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
        assert_eq!(Natural.compare(&3.to_string(), &3.to_string()), Ordering::Equal);
    }

    #[test]
    fn closure() {
        let by_len = |a: &String, b: &String| a.len().cmp(&b.len());
        let (abc, ab, de) = (String::from("abc"), String::from("ab"), String::from("de"));
        assert_eq!(by_len.compare(&abc, &de), Ordering::Greater);
        assert_eq!(by_len.compare(&ab, &de), Ordering::Equal);
    }
}
