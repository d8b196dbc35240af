//! ECS World implementation
//!
//! The world owns entity identifiers and one [`ComponentStorage`] per
//! component type. Structural changes (`create`, `destroy`, `attach`,
//! `detach`) take `&mut self`, so the borrow checker rejects them while a
//! view borrowed from the same world is alive.

use super::query::{Query, View};
use super::storage::{ComponentStorage, ErasedStorage};
use super::{Component, Entity};
use slotmap::SlotMap;
use std::any::TypeId;
use std::collections::HashMap;
use thiserror::Error;

/// Registry errors. These indicate a lifecycle bug in the caller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcsError {
    /// Entity was never created by this world or has already been destroyed
    #[error("Unknown or destroyed entity: {0:?}")]
    UnknownEntity(Entity),
}

/// ECS World containing all entities and components
#[derive(Default)]
pub struct World {
    entities: SlotMap<Entity, ()>,
    storages: HashMap<TypeId, Box<dyn ErasedStorage>>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity with no components
    pub fn create(&mut self) -> Entity {
        let entity = self.entities.insert(());
        log::trace!("Created entity {entity:?}");
        entity
    }

    /// Destroy an entity and drop every component attached to it
    pub fn destroy(&mut self, entity: Entity) -> Result<(), EcsError> {
        if self.entities.remove(entity).is_none() {
            return Err(EcsError::UnknownEntity(entity));
        }

        let removed = self
            .storages
            .values_mut()
            .map(|storage| storage.remove_entity(entity))
            .filter(|&removed| removed)
            .count();
        log::trace!("Destroyed entity {entity:?} ({removed} components)");
        Ok(())
    }

    /// Whether `entity` is currently live
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Iterate live entities
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.keys()
    }

    /// Attach `component` to `entity`, returning the value it replaced
    pub fn attach<C: Component>(&mut self, entity: Entity, component: C) -> Result<Option<C>, EcsError> {
        self.ensure_alive(entity)?;
        Ok(self.storage_or_insert::<C>().insert(entity, component))
    }

    /// Detach and return component `C` from `entity`.
    ///
    /// `Ok(None)` means the entity is live but had no `C`.
    pub fn detach<C: Component>(&mut self, entity: Entity) -> Result<Option<C>, EcsError> {
        self.ensure_alive(entity)?;
        Ok(self.storage_mut::<C>().and_then(|storage| storage.remove(entity)))
    }

    /// Component `C` of `entity`, or `None` if absent or the entity is dead
    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.storage::<C>()?.get(entity)
    }

    /// Mutable component `C` of `entity`, or `None` if absent or the entity is dead
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.storage_mut::<C>()?.get_mut(entity)
    }

    /// Whether `entity` has a `C`
    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.storage::<C>().is_some_and(|storage| storage.contains(entity))
    }

    /// Lazy view over every entity holding all component types in `Q`.
    ///
    /// `Q` is a tuple of component types, e.g. `(Position, Scale)`.
    pub fn view<Q: Query>(&self) -> View<'_, Q> {
        View::new(self)
    }

    /// Lazy mutable iteration over every `(entity, &mut C)` pair
    pub fn view_mut<C: Component>(&mut self) -> impl Iterator<Item = (Entity, &mut C)> + '_ {
        self.storage_mut::<C>()
            .into_iter()
            .flat_map(|storage| storage.iter_mut())
    }

    /// Typed storage for `C`, if any instance was ever attached
    pub fn storage<C: Component>(&self) -> Option<&ComponentStorage<C>> {
        self.storages
            .get(&TypeId::of::<C>())
            .and_then(|storage| storage.as_any().downcast_ref())
    }

    /// Mutable typed storage for `C`
    pub fn storage_mut<C: Component>(&mut self) -> Option<&mut ComponentStorage<C>> {
        self.storages
            .get_mut(&TypeId::of::<C>())
            .and_then(|storage| storage.as_any_mut().downcast_mut())
    }

    /// Count of stored components per type name, for diagnostics
    pub fn component_counts(&self) -> Vec<(&'static str, usize)> {
        let mut counts: Vec<_> = self
            .storages
            .values()
            .map(|storage| (storage.component_name(), storage.component_count()))
            .collect();
        counts.sort_unstable();
        counts
    }

    fn ensure_alive(&self, entity: Entity) -> Result<(), EcsError> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::UnknownEntity(entity))
        }
    }

    fn storage_or_insert<C: Component>(&mut self) -> &mut ComponentStorage<C> {
        self.storages
            .entry(TypeId::of::<C>())
            .or_insert_with(|| Box::new(ComponentStorage::<C>::new()))
            .as_any_mut()
            .downcast_mut()
            .expect("storage registered under TypeId::of::<C>() holds C")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(i32);
    impl Component for Health {}

    #[derive(Debug, PartialEq)]
    struct Name(&'static str);
    impl Component for Name {}

    #[test]
    fn test_attach_get_and_replace() {
        let mut world = World::new();
        let e = world.create();

        assert_eq!(world.attach(e, Health(10)), Ok(None));
        assert_eq!(world.attach(e, Health(5)), Ok(Some(Health(10))));
        assert_eq!(world.get::<Health>(e), Some(&Health(5)));
        assert!(world.get::<Name>(e).is_none());

        world.get_mut::<Health>(e).unwrap().0 += 1;
        assert_eq!(world.get::<Health>(e), Some(&Health(6)));
    }

    #[test]
    fn test_detach() {
        let mut world = World::new();
        let e = world.create();
        world.attach(e, Health(1)).unwrap();

        assert_eq!(world.detach::<Health>(e), Ok(Some(Health(1))));
        assert_eq!(world.detach::<Health>(e), Ok(None));
        assert_eq!(world.detach::<Name>(e), Ok(None));
        assert!(!world.has::<Health>(e));
    }

    #[test]
    fn test_destroy_is_fail_fast() {
        let mut world = World::new();
        let e = world.create();
        world.attach(e, Name("box")).unwrap();

        assert_eq!(world.destroy(e), Ok(()));
        assert_eq!(world.destroy(e), Err(EcsError::UnknownEntity(e)));
        assert_eq!(world.attach(e, Health(1)), Err(EcsError::UnknownEntity(e)));
        assert_eq!(world.detach::<Name>(e), Err(EcsError::UnknownEntity(e)));
        assert!(world.get::<Name>(e).is_none());
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_null_entity_is_unknown() {
        let mut world = World::new();
        assert_eq!(
            world.destroy(Entity::default()),
            Err(EcsError::UnknownEntity(Entity::default()))
        );
    }

    #[test]
    fn test_component_counts() {
        let mut world = World::new();
        let a = world.create();
        let b = world.create();
        world.attach(a, Health(1)).unwrap();
        world.attach(b, Health(2)).unwrap();
        world.attach(b, Name("b")).unwrap();

        let counts = world.component_counts();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), 3);
    }
}
