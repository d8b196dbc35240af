//! ECS Components module
//!
//! Plain data records. An entity is renderable when it owns all of
//! [`Identity`], [`Position`], [`Orientation`], [`Scale`] and [`Drawable`].

pub mod identity;
pub mod transform;
pub mod camera;
pub mod drawable;

pub use identity::Identity;
pub use transform::{Orientation, Position, Scale, TransformFactory};
pub use camera::{Camera, Viewport};
pub use drawable::{Drawable, DrawableFactory};

/// Component set a render pass requires
pub type Renderable = (Identity, Position, Orientation, Scale, Drawable);
