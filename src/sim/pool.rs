//! Entity pools
//!
//! Each pool owns its entities outright and hands out `EntityId` handles.
//! Ids come from one counter on the game state and are never reused, so a
//! stale handle simply misses instead of aliasing a newer entity.

use serde::{Deserialize, Serialize};

/// Stable handle to a pooled entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Anything stored in an `EntityPool`
pub trait Entity {
    fn id(&self) -> EntityId;
}

/// Live entities of one kind, kept sorted by id for deterministic iteration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPool<T> {
    items: Vec<T>,
}

impl<T> Default for EntityPool<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> EntityPool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, returning its handle
    pub fn insert(&mut self, item: T) -> EntityId {
        let id = item.id();
        match self.items.last() {
            // Fresh ids are always the largest, so this is the common path
            Some(last) if last.id() >= id => {
                let pos = self.items.partition_point(|e| e.id() < id);
                debug_assert!(self.items.get(pos).is_none_or(|e| e.id() != id));
                self.items.insert(pos, item);
            }
            _ => self.items.push(item),
        }
        id
    }

    /// Remove and return an entity; `None` if it is already gone
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let pos = self.position(id)?;
        Some(self.items.remove(pos))
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.position(id).map(|pos| &self.items[pos])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        let pos = self.position(id)?;
        Some(&mut self.items[pos])
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.items.iter().map(Entity::id).collect()
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.items.binary_search_by_key(&id, |e| e.id()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Dummy(u32);

    impl Entity for Dummy {
        fn id(&self) -> EntityId {
            EntityId(self.0)
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut pool = EntityPool::new();
        pool.insert(Dummy(1));
        pool.insert(Dummy(2));
        assert_eq!(pool.len(), 2);
        assert!(pool.contains(EntityId(2)));
        assert_eq!(pool.get(EntityId(1)), Some(&Dummy(1)));
    }

    #[test]
    fn test_double_remove_is_none() {
        let mut pool = EntityPool::new();
        let id = pool.insert(Dummy(7));
        assert_eq!(pool.remove(id), Some(Dummy(7)));
        assert_eq!(pool.remove(id), None);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_out_of_order_insert_stays_sorted() {
        let mut pool = EntityPool::new();
        pool.insert(Dummy(5));
        pool.insert(Dummy(2));
        pool.insert(Dummy(9));
        assert_eq!(pool.ids(), vec![EntityId(2), EntityId(5), EntityId(9)]);
        assert!(pool.get_mut(EntityId(5)).is_some());
    }
}
