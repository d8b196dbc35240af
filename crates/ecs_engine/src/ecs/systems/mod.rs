//! ECS Systems module
//!
//! Each system is one pass over a view of the world. Systems keep no state
//! between calls; per-call inputs (drag delta, hue step, projection) are
//! parameters supplied by the frame driver.

pub mod input_rotation;
pub mod release_color;
pub mod simulation;
pub mod rendering_system;

pub use input_rotation::input_rotation_system;
pub use release_color::{hue_cycle_period, release_color_system, DEFAULT_HUE_STEP_DEGREES};
pub use simulation::{AnimationSystem, PhysicsSystem};
pub use rendering_system::{build_draw_request, render_system, LightingParameters};
