//! System trait for per-frame extension points
//!
//! Event-driven systems (input rotation, release color, render) are plain
//! functions in [`systems`](super::systems) because each takes different
//! per-call parameters. Time-driven work that runs on every redraw tick
//! implements [`System`] and is registered with the frame driver.

use super::World;

/// A pass over the world run once per rendered frame, before rendering
pub trait System {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Run the system
    fn run(&mut self, world: &mut World, delta_time: f32);
}
