//! Append-only storage for modules, wires and cells, keyed by typed ids.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// A typed index into an [`Arena`].
pub trait ArenaId: Copy {
    /// Wraps a raw index.
    fn from_raw(index: u32) -> Self;

    /// The raw index.
    fn as_raw(self) -> u32;
}

/// A `Vec` addressed by typed ids.
///
/// Nothing is ever removed, so an id stays valid and iteration follows
/// insertion order, which is the netlist's declaration order. The JSON form
/// is a plain array; an item's id is its position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arena<I: ArenaId, T> {
    items: Vec<T>,
    #[serde(skip)]
    _marker: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    /// An empty arena.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Appends `item` and returns its id.
    pub fn alloc(&mut self, item: T) -> I {
        let id = I::from_raw(self.items.len() as u32);
        self.items.push(item);
        id
    }

    /// The item at `id`, or `None` for an id from elsewhere.
    pub fn get(&self, id: I) -> Option<&T> {
        self.items.get(id.as_raw() as usize)
    }

    /// Whether `id` is in range.
    pub fn contains(&self, id: I) -> bool {
        (id.as_raw() as usize) < self.items.len()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `(id, item)` pairs in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (I, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (I::from_raw(i as u32), item))
    }

    /// Items in insertion order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.items.iter()
    }
}

impl<I: ArenaId, T: PartialEq> PartialEq for Arena<I, T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    /// Panics on an out-of-range id; ids are only minted by [`Arena::alloc`]
    /// and checked by validation for deserialized designs.
    fn index(&self, id: I) -> &T {
        &self.items[id.as_raw() as usize]
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        &mut self.items[id.as_raw() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{ModuleId, WireId};

    #[test]
    fn alloc_and_index() {
        let mut arena: Arena<ModuleId, String> = Arena::new();
        let id = arena.alloc("hello".to_string());
        assert_eq!(arena[id], "hello");
        arena[id].push('!');
        assert_eq!(arena[id], "hello!");
    }

    #[test]
    fn get_out_of_range() {
        let mut arena: Arena<WireId, u32> = Arena::new();
        let a = arena.alloc(1);
        assert_eq!(arena.get(a), Some(&1));
        assert!(arena.contains(a));
        assert_eq!(arena.get(WireId::from_raw(7)), None);
        assert!(!arena.contains(WireId::from_raw(7)));
    }

    #[test]
    fn iteration_order() {
        let mut arena: Arena<WireId, u32> = Arena::new();
        for v in [30, 10, 20] {
            arena.alloc(v);
        }
        let ids: Vec<u32> = arena.iter().map(|(id, _)| id.as_raw()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(arena.values().copied().collect::<Vec<_>>(), vec![30, 10, 20]);
        assert_eq!(arena.values().next_back(), Some(&20));
    }

    #[test]
    fn serializes_as_sequence() {
        let mut arena: Arena<ModuleId, u32> = Arena::new();
        arena.alloc(1);
        arena.alloc(2);
        let json = serde_json::to_string(&arena).unwrap();
        assert_eq!(json, "[1,2]");
        let back: Arena<ModuleId, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[ModuleId::from_raw(1)], 2);
    }
}
