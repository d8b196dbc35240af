//! Animation and physics extension points
//!
//! Both run on every redraw tick before the render pass and currently
//! mutate nothing; they mark where time-driven updates slot into the frame.

use crate::debug_print;
use crate::ecs::{System, World};

/// Per-frame animation hook
#[derive(Debug, Default)]
pub struct AnimationSystem;

impl System for AnimationSystem {
    fn name(&self) -> &'static str {
        "animation"
    }

    fn run(&mut self, _world: &mut World, _delta_time: f32) {
        debug_print!("Animating..");
    }
}

/// Per-frame physics hook
#[derive(Debug, Default)]
pub struct PhysicsSystem;

impl System for PhysicsSystem {
    fn name(&self) -> &'static str {
        "physics"
    }

    fn run(&mut self, _world: &mut World, _delta_time: f32) {
        debug_print!("Simulating..");
    }
}
