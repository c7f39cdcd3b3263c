//! `SkipMap` stores key-value pairs, with the keys being unique and always
//! sorted according to the map's [`Comparator`].

use std::{cmp::Ordering, fmt, iter, mem};

use crate::{
    arena::Arena,
    comparator::{Comparator, Natural},
    level_generator::{Geometric, LevelGenerator},
    skipnode::SkipNode,
};

// ////////////////////////////////////////////////////////////////////////////
// SkipMap
// ////////////////////////////////////////////////////////////////////////////

/// The skipmap provides a way of storing key-value pairs such that the keys
/// are always sorted whilst at the same time providing an efficient way to
/// access, insert and remove entries, and to find the neighbours of any key.
///
/// Nodes live in an arena and refer to each other by index. Each key is
/// linked into level 0 and, with geometrically decreasing probability, into
/// the levels above; the number of levels in use grows and shrinks with the
/// tallest key present.
///
/// The ordering of keys is given by `C`, which defaults to the keys' own
/// [`Ord`] implementation. The level of each new key is drawn from `G`.
///
/// Note that mutable references to keys are not available at all as this could
/// result in a node being left out of the proper ordering.
pub struct SkipMap<K, V, C = Natural, G = Geometric> {
    /// Nodes of every level, head nodes included.
    nodes: Arena<SkipNode>,
    /// Key-value pairs, one per stored key.
    entries: Arena<(K, V)>,
    /// Head node of the topmost level.
    head: usize,
    /// Head node of level 0.
    base: usize,
    /// Number of levels currently in use (always at least 1).
    height: usize,
    len: usize,
    level_generator: G,
    compare: C,
}

/// The position of a key on one level: the last node before it, and the node
/// holding it if the key is linked on that level.
#[derive(Clone, Copy, Debug)]
struct Step {
    pred: usize,
    found: Option<usize>,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<K, V> SkipMap<K, V>
where
    K: Ord,
{
    /// Create a new skipmap ordered by `K`'s [`Ord`] implementation, drawing
    /// levels from the default [`Geometric`] generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let mut skipmap: SkipMap<i64, String> = SkipMap::new();
    /// assert!(skipmap.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        SkipMap::with_generator(Natural, Geometric::default())
    }

    /// Constructs a new, empty skipmap sized for the intended capacity.
    /// Storage for `capacity` entries is reserved up front, and the level
    /// generator is capped at `floor(log2(capacity))` levels, ensuring that
    /// only *a few* nodes occupy the highest level.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::with_capacity(100);
    /// skipmap.extend((0..100).map(|x| (x, x)));
    /// assert_eq!(skipmap.len(), 100);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let levels = capacity
            .checked_ilog2()
            .and_then(|bits| usize::try_from(bits).ok())
            .map_or(1, |levels| levels.max(1));
        SkipMap::from_parts(Natural, Geometric::halving(levels), capacity)
    }
}

impl<K, V, F> SkipMap<K, V, F>
where
    F: Fn(&K, &K) -> Ordering,
{
    /// Create a new skipmap using the provided function in order to determine
    /// the ordering of keys within the map.
    ///
    /// The function must define a strict total order and must not change its
    /// behaviour once keys have been inserted; see the
    /// [`comparator`][crate::comparator] module.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// // Largest key first.
    /// let mut skipmap = SkipMap::with_comparator(|a: &u64, b: &u64| b.cmp(a));
    /// skipmap.extend([(1, "one"), (3, "three"), (2, "two")]);
    /// assert_eq!(skipmap.keys().copied().collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    #[inline]
    pub fn with_comparator(compare: F) -> Self {
        SkipMap::with_generator(compare, Geometric::default())
    }
}

impl<K, V, C, G> SkipMap<K, V, C, G>
where
    C: Comparator<K>,
    G: LevelGenerator,
{
    /// Create a new skipmap with both the ordering and the level generator
    /// supplied by the caller. Passing a seeded generator makes the internal
    /// layout of the map reproducible.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::{Natural, SkipMap, level_generator::CoinFlip};
    ///
    /// let generator = CoinFlip::seeded(32, 0x1234_abcd).unwrap();
    /// let mut skipmap = SkipMap::with_generator(Natural, generator);
    /// skipmap.insert("key", 1);
    /// assert_eq!(skipmap.get(&"key"), Some(&1));
    /// ```
    #[inline]
    pub fn with_generator(compare: C, level_generator: G) -> Self {
        SkipMap::from_parts(compare, level_generator, 0)
    }

    fn from_parts(compare: C, level_generator: G, capacity: usize) -> Self {
        let mut nodes = Arena::with_capacity(capacity.saturating_mul(2).saturating_add(1));
        let base = nodes.alloc(SkipNode::head(None));
        SkipMap {
            nodes,
            entries: Arena::with_capacity(capacity),
            head: base,
            base,
            height: 1,
            len: 0,
            level_generator,
            compare,
        }
    }

    /// Insert the key-value pair into the skipmap.
    ///
    /// If the key is already present its value is replaced and the old value
    /// returned; the key itself is left untouched. Either way the key is
    /// relinked to span the freshly drawn number of levels.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    ///
    /// assert_eq!(skipmap.insert(1, "Hello"), None);
    /// assert_eq!(skipmap.insert(2, "World"), None);
    /// assert_eq!(skipmap.insert(1, "Goodbye"), Some("Hello"));
    /// assert_eq!(skipmap.len(), 2);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let level = self
            .level_generator
            .level()
            .min(self.level_generator.total().saturating_sub(1));
        if level >= self.height {
            self.grow(level + 1);
        }

        let trail = self.trail(&key);
        let existing = trail
            .first()
            .and_then(|step| step.found)
            .and_then(|node| self.nodes[node].entry);
        let (entry, previous) = match existing {
            Some(entry) => (entry, Some(mem::replace(&mut self.entries[entry].1, value))),
            None => {
                self.len += 1;
                (self.entries.alloc((key, value)), None)
            }
        };

        // Demote: drop the copies above the drawn level.
        for step in trail.iter().skip(level + 1) {
            if let Some(node) = step.found {
                self.unlink(step.pred, node);
            }
        }

        // Promote: build the column bottom-up, reusing the nodes already there.
        let mut below = None;
        for step in trail.iter().take(level + 1) {
            let node = match step.found {
                Some(node) => node,
                None => {
                    let right = self.nodes[step.pred].right;
                    let node = self.nodes.alloc(SkipNode::new(entry, right, below));
                    self.nodes[step.pred].right = Some(node);
                    node
                }
            };
            below = Some(node);
        }

        self.shrink();
        previous
    }

    /// Push empty levels until `height` levels exist.
    fn grow(&mut self, height: usize) {
        #[cfg(feature = "tracing")]
        tracing::trace!(from = self.height, to = height, "growing level stack");
        while self.height < height {
            self.head = self.nodes.alloc(SkipNode::head(Some(self.head)));
            self.height += 1;
        }
    }
}

impl<K, V, C, G> SkipMap<K, V, C, G> {
    /// Clears the skipmap, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10).map(|x| (x, x)));
    /// skipmap.clear();
    /// assert!(skipmap.is_empty());
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(len = self.len, height = self.height, "clearing skipmap");
        self.nodes.clear();
        self.entries.clear();
        self.base = self.nodes.alloc(SkipNode::head(None));
        self.head = self.base;
        self.height = 1;
        self.len = 0;
    }

    /// Returns the number of elements in the skipmap.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10).map(|x| (x, x)));
    /// assert_eq!(skipmap.len(), 10);
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the skipmap contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// assert!(skipmap.is_empty());
    ///
    /// skipmap.insert(1, "Rust");
    /// assert!(!skipmap.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of levels currently in use.
    ///
    /// This is one more than the highest level any stored key is linked into,
    /// and `1` for an empty skipmap.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Provides a reference to the front element, or `None` if the skipmap is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// assert!(skipmap.front().is_none());
    ///
    /// skipmap.insert(1, "Hello");
    /// skipmap.insert(2, "World");
    /// assert_eq!(skipmap.front(), Some((&1, &"Hello")));
    /// ```
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<(&K, &V)> {
        self.nodes[self.base].right.and_then(|node| self.item(node))
    }

    /// Provides a reference to the back element, or `None` if the skipmap is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// assert!(skipmap.back().is_none());
    ///
    /// skipmap.insert(1, "Hello");
    /// skipmap.insert(2, "World");
    /// assert_eq!(skipmap.back(), Some((&2, &"World")));
    /// ```
    #[inline]
    #[must_use]
    pub fn back(&self) -> Option<(&K, &V)> {
        self.item(self.last_node())
    }

    /// Creates an iterator over the entries of the skipmap, in ascending key
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10).map(|x| (x, x)));
    /// for (k, v) in skipmap.iter() {
    ///     println!("Key: {}, Value: {}", k, v);
    /// }
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            cursor: Cursor {
                nodes: &self.nodes,
                entries: &self.entries,
                node: self.nodes[self.base].right,
            },
            remaining: self.len,
        }
    }

    /// Creates an iterator over the keys of the skipmap.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10).map(|x| (x, x)));
    /// for k in skipmap.keys() {
    ///     println!("Key: {}", k);
    /// }
    /// ```
    #[inline]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    /// Creates an iterator over the values of the skipmap.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10).map(|x| (x, x)));
    /// for v in skipmap.values() {
    ///     println!("Value: {}", v);
    /// }
    /// ```
    #[inline]
    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Calls `visit` on every entry in ascending key order, stopping as soon as
    /// it returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let skipmap: SkipMap<_, _> = (0..10).map(|x| (x, x * x)).collect();
    /// let mut seen = Vec::new();
    /// skipmap.for_each(|&k, &v| {
    ///     seen.push(v);
    ///     k < 3
    /// });
    /// assert_eq!(seen, [0, 1, 4, 9]);
    /// ```
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        for (key, value) in self.iter() {
            if !visit(key, value) {
                return;
            }
        }
    }

    /// The key-value pair stored in `node`, or `None` for a head node.
    fn item(&self, node: usize) -> Option<(&K, &V)> {
        let entry = self.nodes.get(node)?.entry?;
        self.entries.get(entry).map(|(key, value)| (key, value))
    }

    /// The last node on level 0, which is the head if the skipmap is empty.
    fn last_node(&self) -> usize {
        let mut node = self.head;
        loop {
            while let Some(next) = self.nodes[node].right {
                node = next;
            }
            match self.nodes[node].down {
                Some(down) => node = down,
                None => return node,
            }
        }
    }

    /// Unlink `node` from its level, `pred` being the node right before it.
    fn unlink(&mut self, pred: usize, node: usize) {
        debug_assert!(!self.nodes[node].is_head(), "head nodes are never unlinked");
        self.nodes[pred].right = self.nodes[node].right;
        self.nodes.release(node);
    }

    /// Pop every empty level off the top of the stack, always keeping level 0.
    fn shrink(&mut self) {
        #[cfg(feature = "tracing")]
        let before = self.height;
        while self.height > 1 && self.nodes[self.head].right.is_none() {
            let Some(down) = self.nodes[self.head].down else {
                break;
            };
            self.nodes.release(self.head);
            self.head = down;
            self.height -= 1;
        }
        #[cfg(feature = "tracing")]
        {
            if self.height != before {
                tracing::trace!(from = before, to = self.height, "shrinking level stack");
            }
        }
    }
}

impl<K, V, C, G> SkipMap<K, V, C, G>
where
    C: Comparator<K>,
{
    /// Returns a reference to the value corresponding to the key, or `None` if
    /// the key is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// assert!(skipmap.get(&0).is_none());
    /// skipmap.extend((0..10).map(|x| (x, x)));
    /// assert_eq!(skipmap.get(&0), Some(&0));
    /// assert!(skipmap.get(&10).is_none());
    /// ```
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the stored key-value pair matching the key.
    ///
    /// The stored key may differ from `key` when the comparator treats
    /// distinct keys as equal.
    #[inline]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let pred = self.find_last_lt(key);
        self.matching_next(pred, key)
            .and_then(|node| self.item(node))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10).map(|x| (x, x)));
    /// if let Some(x) = skipmap.get_mut(&0) {
    ///     *x = 100;
    /// }
    /// assert_eq!(skipmap.get(&0), Some(&100));
    /// ```
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let pred = self.find_last_lt(key);
        let node = self.matching_next(pred, key)?;
        let entry = self.nodes[node].entry?;
        self.entries.get_mut(entry).map(|(_, value)| value)
    }

    /// Returns true if the key is contained in the skipmap.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10).map(|x| (x, x)));
    /// assert!(skipmap.contains_key(&4));
    /// assert!(!skipmap.contains_key(&15));
    /// ```
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get_key_value(key).is_some()
    }

    /// Returns the entry with the greatest key strictly less than `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let skipmap: SkipMap<_, _> = [(1, 'a'), (3, 'c'), (5, 'e')].into_iter().collect();
    /// assert_eq!(skipmap.lower(&3), Some((&1, &'a')));
    /// assert_eq!(skipmap.lower(&4), Some((&3, &'c')));
    /// assert_eq!(skipmap.lower(&1), None);
    /// ```
    #[doc(alias = "lt")]
    #[inline]
    pub fn lower(&self, key: &K) -> Option<(&K, &V)> {
        self.item(self.find_last_lt(key))
    }

    /// Returns the entry with the least key strictly greater than `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let skipmap: SkipMap<_, _> = [(1, 'a'), (3, 'c'), (5, 'e')].into_iter().collect();
    /// assert_eq!(skipmap.higher(&3), Some((&5, &'e')));
    /// assert_eq!(skipmap.higher(&2), Some((&3, &'c')));
    /// assert_eq!(skipmap.higher(&5), None);
    /// ```
    #[doc(alias = "gt")]
    #[inline]
    pub fn higher(&self, key: &K) -> Option<(&K, &V)> {
        let pred = self.find_last_lt(key);
        let next = match self.matching_next(pred, key) {
            Some(found) => self.nodes[found].right?,
            None => self.nodes[pred].right?,
        };
        self.item(next)
    }

    /// Returns the entry with the greatest key less than or equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let skipmap: SkipMap<_, _> = [(1, 'a'), (3, 'c'), (5, 'e')].into_iter().collect();
    /// assert_eq!(skipmap.floor(&3), Some((&3, &'c')));
    /// assert_eq!(skipmap.floor(&4), Some((&3, &'c')));
    /// assert_eq!(skipmap.floor(&0), None);
    /// ```
    #[doc(alias = "le")]
    #[inline]
    pub fn floor(&self, key: &K) -> Option<(&K, &V)> {
        let pred = self.find_last_lt(key);
        match self.matching_next(pred, key) {
            Some(found) => self.item(found),
            None => self.item(pred),
        }
    }

    /// Returns the entry with the least key greater than or equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let skipmap: SkipMap<_, _> = [(1, 'a'), (3, 'c'), (5, 'e')].into_iter().collect();
    /// assert_eq!(skipmap.ceiling(&3), Some((&3, &'c')));
    /// assert_eq!(skipmap.ceiling(&4), Some((&5, &'e')));
    /// assert_eq!(skipmap.ceiling(&6), None);
    /// ```
    #[doc(alias = "ge")]
    #[inline]
    pub fn ceiling(&self, key: &K) -> Option<(&K, &V)> {
        let pred = self.find_last_lt(key);
        self.nodes[pred].right.and_then(|next| self.item(next))
    }

    /// Removes the key from the skipmap, returning its value if it was
    /// present.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.extend((0..10).map(|x| (x, x)));
    /// assert_eq!(skipmap.remove(&4), Some(4));
    /// assert!(skipmap.remove(&4).is_none()); // No more '4' left
    /// ```
    #[inline]
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes the key from the skipmap, returning the stored key and value if
    /// the key was present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let trail = self.trail(key);
        self.remove_along(&trail)
    }

    /// Removes the first element and returns it, or `None` if the skipmap is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.insert(1, "Hello");
    /// skipmap.insert(2, "World");
    ///
    /// assert_eq!(skipmap.pop_front(), Some((1, "Hello")));
    /// assert_eq!(skipmap.pop_front(), Some((2, "World")));
    /// assert!(skipmap.pop_front().is_none());
    /// ```
    pub fn pop_front(&mut self) -> Option<(K, V)> {
        let (key, _) = self.front()?;
        let trail = self.trail(key);
        self.remove_along(&trail)
    }

    /// Removes the last element and returns it, or `None` if the skipmap is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.insert(1, "Hello");
    /// skipmap.insert(2, "World");
    ///
    /// assert_eq!(skipmap.pop_back(), Some((2, "World")));
    /// assert_eq!(skipmap.pop_back(), Some((1, "Hello")));
    /// assert!(skipmap.pop_back().is_none());
    /// ```
    pub fn pop_back(&mut self) -> Option<(K, V)> {
        let (key, _) = self.back()?;
        let trail = self.trail(key);
        self.remove_along(&trail)
    }

    /// Constructs an iterator over the entries whose keys lie in the half-open
    /// interval `[start, end)`, in ascending key order.
    ///
    /// The iterator is empty if `start` is not less than `end`, or if no key is
    /// at least `start`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let skipmap: SkipMap<_, _> = (0..10).map(|x| (x, x)).collect();
    /// let keys: Vec<_> = skipmap.range(&3, &7).map(|(&k, _)| k).collect();
    /// assert_eq!(keys, [3, 4, 5, 6]);
    /// ```
    pub fn range<'a>(&'a self, start: &K, end: &'a K) -> Range<'a, K, V, C> {
        let pred = self.find_last_lt(start);
        Range {
            cursor: Cursor {
                nodes: &self.nodes,
                entries: &self.entries,
                node: self.nodes[pred].right,
            },
            end,
            compare: &self.compare,
        }
    }

    /// Calls `visit` on every entry whose key lies in the half-open interval
    /// `[start, end)`, in ascending key order, stopping as soon as `visit`
    /// returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipmap::SkipMap;
    ///
    /// let skipmap: SkipMap<_, _> = [(1, 1), (5, 5), (8, 8)].into_iter().collect();
    /// let mut seen = Vec::new();
    /// skipmap.for_each_range(&3, &8, |&k, &v| {
    ///     seen.push((k, v));
    ///     true
    /// });
    /// assert_eq!(seen, [(5, 5)]);
    /// ```
    pub fn for_each_range<F>(&self, start: &K, end: &K, mut visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        for (key, value) in self.range(start, end) {
            if !visit(key, value) {
                return;
            }
        }
    }

    /// Compare the key stored in `node` with `key`; `None` for a head node.
    fn compare_node(&self, node: usize, key: &K) -> Option<Ordering> {
        let (stored, _) = self.item(node)?;
        Some(self.compare.compare(stored, key))
    }

    /// The successor of `node` on its level, if its key is less than `key`.
    fn next_lt(&self, node: usize, key: &K) -> Option<usize> {
        let next = self.nodes[node].right?;
        (self.compare_node(next, key)? == Ordering::Less).then_some(next)
    }

    /// The successor of `node` on its level, if its key equals `key`.
    fn matching_next(&self, node: usize, key: &K) -> Option<usize> {
        let next = self.nodes[node].right?;
        (self.compare_node(next, key)? == Ordering::Equal).then_some(next)
    }

    /// Advance along the level of `node` past every key less than `key`.
    fn seek(&self, mut node: usize, key: &K) -> usize {
        while let Some(next) = self.next_lt(node, key) {
            node = next;
        }
        node
    }

    /// Find the last node on level 0 whose key is strictly less than `key`,
    /// or the level 0 head node if there is none.
    fn find_last_lt(&self, key: &K) -> usize {
        let mut node = self.head;
        loop {
            node = self.seek(node, key);
            match self.nodes[node].down {
                Some(down) => node = down,
                None => return node,
            }
        }
    }

    /// The position of `key` on every level, indexed by level.
    fn trail(&self, key: &K) -> Vec<Step> {
        let mut trail = Vec::with_capacity(self.height);
        let mut level_node = Some(self.head);
        while let Some(node) = level_node {
            let pred = self.seek(node, key);
            trail.push(Step {
                pred,
                found: self.matching_next(pred, key),
            });
            level_node = self.nodes[pred].down;
        }
        trail.reverse();
        trail
    }

    /// Unlink the key found along `trail` from every level it occupies and
    /// release its entry.
    fn remove_along(&mut self, trail: &[Step]) -> Option<(K, V)> {
        let mut entry = None;
        for step in trail {
            if let Some(node) = step.found {
                entry = entry.or(self.nodes[node].entry);
                self.unlink(step.pred, node);
            }
        }
        let removed = entry.and_then(|entry| self.entries.release(entry));
        if removed.is_some() {
            self.len -= 1;
        }
        self.shrink();
        removed
    }
}

// ///////////////////////////////////////////////
// Internal methods
// ///////////////////////////////////////////////

#[cfg(test)]
impl<K, V, C, G> SkipMap<K, V, C, G>
where
    C: Comparator<K>,
{
    /// Checks the integrity of the skipmap.
    fn check(&self) {
        let mut heads = Vec::with_capacity(self.height);
        let mut head = Some(self.head);
        while let Some(node) = head {
            assert!(self.nodes[node].is_head());
            heads.push(node);
            head = self.nodes[node].down;
        }
        assert_eq!(heads.len(), self.height);
        assert_eq!(heads.last(), Some(&self.base));
        if self.is_empty() {
            assert_eq!(self.height, 1);
        } else {
            assert!(self.nodes[self.head].right.is_some());
        }

        let mut linked = 0;
        let mut above: Vec<usize> = Vec::new();
        for (depth, &head) in heads.iter().enumerate() {
            let is_base = depth + 1 == heads.len();
            let mut level = Vec::new();
            let mut prev: Option<&K> = None;
            let mut node = self.nodes[head].right;
            while let Some(current) = node {
                let entry = self.nodes[current].entry.expect("non-head node has an entry");
                let key = &self.entries[entry].0;
                if let Some(prev) = prev {
                    assert_eq!(self.compare.compare(prev, key), Ordering::Less);
                }
                match self.nodes[current].down {
                    Some(down) => {
                        assert!(!is_base);
                        assert_eq!(self.nodes[down].entry, Some(entry));
                    }
                    None => assert!(is_base),
                }
                level.push(entry);
                prev = Some(key);
                node = self.nodes[current].right;
            }
            assert!(above.iter().all(|entry| level.contains(entry)));
            linked += level.len();
            above = level;
        }

        assert_eq!(above.len(), self.len);
        assert_eq!(self.entries.len(), self.len);
        assert_eq!(self.nodes.len(), linked + self.height);
    }

    /// Renders the keys linked on each level, top level first.
    fn structure(&self) -> String
    where
        K: fmt::Debug,
    {
        use std::fmt::Write as _;

        let mut rows = Vec::with_capacity(self.height);
        let mut head = Some(self.head);
        let mut level = self.height;
        while let Some(current) = head {
            level -= 1;
            let mut row = format!("L{level}:");
            let mut node = self.nodes[current].right;
            while let Some(next) = node {
                if let Some((key, _)) = self.item(next) {
                    write!(row, " {key:?}").expect("writing to a String cannot fail");
                }
                node = self.nodes[next].right;
            }
            rows.push(row);
            head = self.nodes[current].down;
        }
        rows.join("\n")
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<K: Ord, V> Default for SkipMap<K, V> {
    #[inline]
    fn default() -> SkipMap<K, V> {
        SkipMap::new()
    }
}

/// This implementation of `PartialEq` only checks that the *entries* are
/// equal and in the same order; it does not check for equivalence of other
/// features (such as the ordering function and the node levels).
impl<AK, AV, AC, AG, BK, BV, BC, BG> PartialEq<SkipMap<BK, BV, BC, BG>> for SkipMap<AK, AV, AC, AG>
where
    AK: PartialEq<BK>,
    AV: PartialEq<BV>,
{
    #[inline]
    fn eq(&self, other: &SkipMap<BK, BV, BC, BG>) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(x, y)| x.0 == y.0 && x.1 == y.1)
    }
}

impl<K, V, C, G> Eq for SkipMap<K, V, C, G>
where
    K: Eq,
    V: Eq,
{
}

impl<K, V, C, G> Extend<(K, V)> for SkipMap<K, V, C, G>
where
    C: Comparator<K>,
    G: LevelGenerator,
{
    #[inline]
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iterable: I) {
        for (key, value) in iterable {
            self.insert(key, value);
        }
    }
}

impl<K, V> iter::FromIterator<(K, V)> for SkipMap<K, V>
where
    K: Ord,
{
    #[inline]
    fn from_iter<I>(iter: I) -> SkipMap<K, V>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut skipmap = SkipMap::new();
        skipmap.extend(iter);
        skipmap
    }
}

impl<K, V, C, G> fmt::Debug for SkipMap<K, V, C, G>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C, G> fmt::Display for SkipMap<K, V, C, G>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;

        for (i, (k, v)) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "({k}, {v})")?;
        }
        write!(f, "]")
    }
}

impl<K, V, C, G> IntoIterator for SkipMap<K, V, C, G> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Consumes the skipmap, yielding its entries in ascending key order.
    fn into_iter(mut self) -> Self::IntoIter {
        let mut items = Vec::with_capacity(self.len);
        let mut node = self.nodes[self.base].right;
        while let Some(current) = node {
            let SkipNode { entry, right, .. } = self.nodes[current];
            if let Some(item) = entry.and_then(|entry| self.entries.release(entry)) {
                items.push(item);
            }
            node = right;
        }
        IntoIter(items.into_iter())
    }
}

impl<'a, K, V, C, G> IntoIterator for &'a SkipMap<K, V, C, G> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ///////////////////////////////////////////////
// Extra structs
// ///////////////////////////////////////////////

/// A position on level 0.
struct Cursor<'a, K, V> {
    nodes: &'a Arena<SkipNode>,
    entries: &'a Arena<(K, V)>,
    node: Option<usize>,
}

impl<'a, K, V> Cursor<'a, K, V> {
    fn peek(&self) -> Option<(&'a K, &'a V)> {
        let entries = self.entries;
        let entry = self.nodes.get(self.node?)?.entry?;
        entries.get(entry).map(|(key, value)| (key, value))
    }

    fn advance(&mut self) {
        self.node = self
            .node
            .and_then(|node| self.nodes.get(node))
            .and_then(|node| node.right);
    }
}

/// An iterator for [`SkipMap`]
pub struct Iter<'a, K, V> {
    cursor: Cursor<'a, K, V>,
    remaining: usize,
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.cursor.peek()?;
        self.cursor.advance();
        self.remaining = self.remaining.saturating_sub(1);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: 'a, V: 'a> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K: 'a, V: 'a> iter::FusedIterator for Iter<'a, K, V> {}

/// Iterator over the entries of a [`SkipMap`] within a half-open key range,
/// created by [`SkipMap::range`].
pub struct Range<'a, K, V, C> {
    cursor: Cursor<'a, K, V>,
    end: &'a K,
    compare: &'a C,
}

impl<'a, K: 'a, V: 'a, C> Iterator for Range<'a, K, V, C>
where
    C: Comparator<K>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.cursor.peek()?;
        if self.compare.compare(key, self.end) != Ordering::Less {
            self.cursor.node = None;
            return None;
        }
        self.cursor.advance();
        Some((key, value))
    }
}

impl<'a, K: 'a, V: 'a, C> iter::FusedIterator for Range<'a, K, V, C> where C: Comparator<K> {}

/// Iterator over a [`SkipMap`]'s keys.
pub struct Keys<'a, K, V>(Iter<'a, K, V>);

impl<'a, K: 'a, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|x| x.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K: 'a, V> ExactSizeIterator for Keys<'a, K, V> {}

/// Iterator over a [`SkipMap`]'s values.
pub struct Values<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V: 'a> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|x| x.1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a, K, V: 'a> ExactSizeIterator for Values<'a, K, V> {}

/// An owning iterator for [`SkipMap`], yielding entries in ascending key
/// order.
pub struct IntoIter<K, V>(std::vec::IntoIter<(K, V)>);

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////
