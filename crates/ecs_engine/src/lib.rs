//! # ECS Engine
//!
//! Entity-component-system core for an interactive rendering loop.
//!
//! ## Features
//!
//! - **ECS Architecture**: generational entities, sparse-set component storage, lazy multi-component views
//! - **Systems**: pointer-drag rotation, release color cycling, per-frame hooks and a render pass
//! - **Backend Contract**: opaque GPU handles released when their last owner drops
//! - **Asset Management**: named meshes and shaders behind a stateful resource manager
//! - **Configuration**: TOML/RON engine and scene configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ecs_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     ecs_engine::foundation::logging::init();
//!     let config = EngineConfig::load_or_default("config/cube.toml")?;
//!     let mut driver = FrameDriver::from_config(&config, RecordingBackend::new())?;
//!
//!     driver.handle_event(InputEvent::press(MouseButton::Left, 100.0, 100.0))?;
//!     driver.handle_event(InputEvent::drag(MouseButtons::LEFT, 110.0, 100.0))?;
//!     driver.handle_event(InputEvent::Redraw)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod debug;
pub mod ecs;
pub mod assets;
pub mod render;
pub mod input;
pub mod config;
pub mod scene;

mod engine;

pub use engine::{
    CameraConfig, ColorConfig, EngineConfig, EngineError, FrameDriver, FrameResponse, FrameStats, InputConfig,
    LightConfig, WindowConfig,
};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::Config,
        ecs::{
            components::{Camera, Drawable, Identity, Orientation, Position, Renderable, Scale, Viewport},
            Component, Entity, System, World,
        },
        foundation::{
            color::Color4,
            math::{Mat4, Quat, Vec2, Vec3},
        },
        input::{InputEvent, MouseButton, MouseButtons},
        render::{GraphicsBackend, RecordingBackend},
        scene::{EntityConfig, SceneConfig},
        EngineConfig, EngineError, FrameDriver, FrameResponse,
    };
}
