//! Entity-Component-System implementation
//!
//! Entities are generational ids, components live in one sparse-set storage
//! per type, and systems are passes over views of the world.

pub mod world;
pub mod entity;
pub mod component;
pub mod storage;
pub mod system;
pub mod query;
pub mod components;
pub mod systems;

#[cfg(test)]
mod tests;

pub use world::{EcsError, World};
pub use entity::Entity;
pub use component::Component;
pub use storage::ComponentStorage;
pub use system::System;
pub use query::{Query, View, ViewIter};
