//! Index-addressed storage for nodes and entries.
//!
//! Slots are handed out as plain `usize` indices and recycled through an
//! intrusive free list, so links between nodes never hold references into the
//! storage itself.

use std::{mem, ops};

/// A single slot of the arena.
#[derive(Debug, Clone)]
enum Slot<T> {
    Occupied(T),
    /// A released slot, holding the index of the next released slot (if any).
    Vacant(Option<usize>),
}

/// A growable store of `T` with stable indices.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    /// Head of the free list.
    next_free: Option<usize>,
    /// Number of occupied slots.
    len: usize,
}

impl<T> Arena<T> {
    /// Create an arena with room for `capacity` values before reallocating.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Arena {
            slots: Vec::with_capacity(capacity),
            next_free: None,
            len: 0,
        }
    }

    /// Number of occupied slots.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Store `value`, reusing a released slot when one is available, and
    /// return its index.
    pub(crate) fn alloc(&mut self, value: T) -> usize {
        self.len += 1;
        if let Some(index) = self.next_free {
            if let Some(slot) = self.slots.get_mut(index) {
                if let Slot::Vacant(next) = *slot {
                    self.next_free = next;
                    *slot = Slot::Occupied(value);
                    return index;
                }
            }
        }
        self.next_free = None;
        self.slots.push(Slot::Occupied(value));
        self.slots.len() - 1
    }

    /// Release the slot at `index`, returning the value it held.
    ///
    /// Returns `None` (and changes nothing) if the slot is already vacant.
    pub(crate) fn release(&mut self, index: usize) -> Option<T> {
        let slot = self.slots.get_mut(index)?;
        match mem::replace(slot, Slot::Vacant(self.next_free)) {
            Slot::Occupied(value) => {
                self.next_free = Some(index);
                self.len -= 1;
                Some(value)
            }
            vacant @ Slot::Vacant(_) => {
                *slot = vacant;
                None
            }
        }
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        match self.slots.get(index)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        match self.slots.get_mut(index)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    /// Drop every value, keeping the allocation.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.next_free = None;
        self.len = 0;
    }
}

impl<T> ops::Index<usize> for Arena<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("arena slot {index} is vacant"),
        }
    }
}

impl<T> ops::IndexMut<usize> for Arena<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("arena slot {index} is vacant"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Arena;

    #[test]
    fn alloc_and_get() {
        let mut arena = Arena::with_capacity(4);
        let a = arena.alloc("a");
        let b = arena.alloc("b");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena[a], "a");
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.get(2), None);
    }

    #[test]
    fn release_recycles_slots() {
        let mut arena = Arena::with_capacity(0);
        let indices: Vec<usize> = (0..4).map(|x| arena.alloc(x)).collect();
        assert_eq!(arena.release(indices[1]), Some(1));
        assert_eq!(arena.release(indices[3]), Some(3));
        assert_eq!(arena.release(indices[3]), None);
        assert_eq!(arena.len(), 2);

        // Most recently released first.
        assert_eq!(arena.alloc(30), indices[3]);
        assert_eq!(arena.alloc(10), indices[1]);
        assert_eq!(arena.alloc(4), 4);
        assert_eq!(arena.len(), 5);
        assert_eq!(arena[indices[1]], 10);
    }

    #[test]
    fn get_mut_and_index_mut() {
        let mut arena = Arena::with_capacity(1);
        let index = arena.alloc(String::from("skip"));
        arena[index].push_str("map");
        if let Some(value) = arena.get_mut(index) {
            value.push('!');
        }
        assert_eq!(arena[index], "skipmap!");
    }

    #[test]
    fn clear() {
        let mut arena = Arena::with_capacity(0);
        let index = arena.alloc(1);
        arena.release(index);
        arena.alloc(2);
        arena.clear();
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.alloc(3), 0);
    }

    #[test]
    #[should_panic(expected = "arena slot 0 is vacant")]
    fn index_vacant_panics() {
        let mut arena = Arena::with_capacity(1);
        let index = arena.alloc(());
        arena.release(index);
        let _unit = arena[index];
    }
}
