//! Component trait

/// Marker trait for data that can be attached to an entity.
///
/// A world stores at most one value of each component type per entity.
pub trait Component: 'static + Send + Sync {}
