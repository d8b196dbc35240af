//! Sparse-set component storage
//!
//! One [`ComponentStorage`] exists per component type. Values live packed in
//! a dense `Vec` next to the entity that owns each slot; a sparse map from
//! entity to dense index gives O(1) lookup. Removal swaps the last element
//! into the hole, so dense order is stable only until the next removal.

use super::{Component, Entity};
use slotmap::SecondaryMap;
use std::any::Any;

/// Packed storage for every instance of one component type
pub struct ComponentStorage<T: Component> {
    dense: Vec<T>,
    owners: Vec<Entity>,
    sparse: SecondaryMap<Entity, usize>,
}

impl<T: Component> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ComponentStorage<T> {
    /// Create an empty storage
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            owners: Vec::new(),
            sparse: SecondaryMap::new(),
        }
    }

    /// Insert a component, returning the value it replaced
    pub fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        if let Some(&index) = self.sparse.get(entity) {
            return Some(std::mem::replace(&mut self.dense[index], component));
        }

        self.sparse.insert(entity, self.dense.len());
        self.dense.push(component);
        self.owners.push(entity);
        None
    }

    /// Remove the component owned by `entity`
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let index = self.sparse.remove(entity)?;
        let value = self.dense.swap_remove(index);
        self.owners.swap_remove(index);

        // The former last element now sits at `index`
        if let Some(&moved) = self.owners.get(index) {
            if let Some(slot) = self.sparse.get_mut(moved) {
                *slot = index;
            }
        }

        Some(value)
    }

    /// Component owned by `entity`
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.sparse.get(entity).map(|&index| &self.dense[index])
    }

    /// Mutable component owned by `entity`
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let index = *self.sparse.get(entity)?;
        Some(&mut self.dense[index])
    }

    /// Whether `entity` owns a component here
    pub fn contains(&self, entity: Entity) -> bool {
        self.sparse.contains_key(entity)
    }

    /// Number of stored components
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Whether the storage is empty
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Owning entities in dense order
    pub fn entities(&self) -> &[Entity] {
        &self.owners
    }

    /// Iterate `(entity, component)` pairs in dense order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.owners.iter().copied().zip(self.dense.iter())
    }

    /// Iterate `(entity, component)` pairs mutably in dense order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
        self.owners.iter().copied().zip(self.dense.iter_mut())
    }
}

/// Type-erased view of a [`ComponentStorage`] so the world can hold one map
/// of storages and strip an entity from all of them on destruction.
pub trait ErasedStorage: Send + Sync {
    /// Drop the component owned by `entity`, if any
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Whether `entity` owns a component here
    fn contains_entity(&self, entity: Entity) -> bool;

    /// Number of stored components
    fn component_count(&self) -> usize;

    /// Name of the stored component type
    fn component_name(&self) -> &'static str;

    /// Downcast support
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedStorage for ComponentStorage<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn component_count(&self) -> usize {
        self.len()
    }

    fn component_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
