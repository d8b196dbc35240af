//! Query system for component access
//!
//! A [`Query`] is a tuple of component types. [`View`] walks the owners of
//! the smallest storage named by the query and keeps the entities that also
//! own every other type, so the result is the intersection of component
//! presence. Views borrow the world immutably; they can be iterated any
//! number of times and yield nothing when a queried type was never attached.

use super::{Component, Entity, World};
use std::marker::PhantomData;

/// A set of component types fetched together
pub trait Query {
    /// Borrowed components yielded per matching entity
    type Item<'w>;

    /// Owners of the smallest storage in the set, or `None` if any storage
    /// is missing (no entity can match)
    fn candidates(world: &World) -> Option<&[Entity]>;

    /// Fetch every component in the set for `entity`
    fn fetch(world: &World, entity: Entity) -> Option<Self::Item<'_>>;
}

macro_rules! impl_query {
    ($($name:ident),+) => {
        impl<$($name: Component),+> Query for ($($name,)+) {
            type Item<'w> = ($(&'w $name,)+);

            fn candidates(world: &World) -> Option<&[Entity]> {
                let mut smallest: Option<&[Entity]> = None;
                $(
                    let owners = world.storage::<$name>()?.entities();
                    if smallest.map_or(true, |current| owners.len() < current.len()) {
                        smallest = Some(owners);
                    }
                )+
                smallest
            }

            fn fetch(world: &World, entity: Entity) -> Option<Self::Item<'_>> {
                Some(($(world.get::<$name>(entity)?,)+))
            }
        }
    };
}

impl_query!(A);
impl_query!(A, B);
impl_query!(A, B, C);
impl_query!(A, B, C, D);
impl_query!(A, B, C, D, E);
impl_query!(A, B, C, D, E, F);

/// Lazy, restartable view over entities matching `Q`
pub struct View<'w, Q: Query> {
    world: &'w World,
    _query: PhantomData<fn() -> Q>,
}

impl<Q: Query> Clone for View<'_, Q> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Q: Query> Copy for View<'_, Q> {}

impl<'w, Q: Query> View<'w, Q> {
    pub(super) const fn new(world: &'w World) -> Self {
        Self {
            world,
            _query: PhantomData,
        }
    }

    /// Start a fresh pass over the matching entities
    pub fn iter(&self) -> ViewIter<'w, Q> {
        ViewIter {
            world: self.world,
            candidates: Q::candidates(self.world).unwrap_or_default().iter(),
            _query: PhantomData,
        }
    }

    /// Matching entities only
    pub fn entities(&self) -> impl Iterator<Item = Entity> + 'w
    where
        Q: 'w,
    {
        self.iter().map(|(entity, _)| entity)
    }

    /// Number of matching entities (walks the view)
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Whether no entity matches
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Components of `entity` if it matches the view
    pub fn get(&self, entity: Entity) -> Option<Q::Item<'w>> {
        Q::fetch(self.world, entity)
    }
}

impl<'w, Q: Query> IntoIterator for View<'w, Q> {
    type Item = (Entity, Q::Item<'w>);
    type IntoIter = ViewIter<'w, Q>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'w, Q: Query> IntoIterator for &View<'w, Q> {
    type Item = (Entity, Q::Item<'w>);
    type IntoIter = ViewIter<'w, Q>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator produced by [`View::iter`]
pub struct ViewIter<'w, Q: Query> {
    world: &'w World,
    candidates: std::slice::Iter<'w, Entity>,
    _query: PhantomData<fn() -> Q>,
}

impl<'w, Q: Query> Iterator for ViewIter<'w, Q> {
    type Item = (Entity, Q::Item<'w>);

    fn next(&mut self) -> Option<Self::Item> {
        let world = self.world;
        self.candidates
            .by_ref()
            .find_map(|&entity| Q::fetch(world, entity).map(|item| (entity, item)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.candidates.len()))
    }
}
