use indexmap::IndexMap;

use crate::types::{EntityKey, Rect};

/// Ground-truth store of entity rects.
///
/// Iteration follows insertion order. Overwriting an existing id keeps its
/// slot; removing an id shifts later entries down so the relative order of the
/// survivors never changes. Every scan in the world walks this order, which is
/// what makes tie-breaks between equal times of impact reproducible.
#[derive(Clone, Debug)]
pub struct EntityTable<K> {
    rects: IndexMap<K, Rect>,
}

impl<K> Default for EntityTable<K> {
    fn default() -> Self {
        Self { rects: IndexMap::new() }
    }
}

impl<K: EntityKey> EntityTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; returns the previous rect if `id` was present.
    pub fn insert(&mut self, id: K, rect: Rect) -> Option<Rect> {
        self.rects.insert(id, rect)
    }

    pub fn remove(&mut self, id: &K) -> Option<Rect> {
        self.rects.shift_remove(id)
    }

    pub fn get(&self, id: &K) -> Option<Rect> {
        self.rects.get(id).copied()
    }

    /// Overwrite the rect of an existing id. Returns false if `id` is unknown.
    pub fn set(&mut self, id: &K, rect: Rect) -> bool {
        match self.rects.get_mut(id) {
            Some(slot) => {
                *slot = rect;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &K) -> bool {
        self.rects.contains_key(id)
    }

    /// Position of `id` in iteration order.
    pub fn index_of(&self, id: &K) -> Option<usize> {
        self.rects.get_index_of(id)
    }

    pub fn get_index(&self, index: usize) -> Option<(&K, &Rect)> {
        self.rects.get_index(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Rect)> + '_ {
        self.rects.iter()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }
}
