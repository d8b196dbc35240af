//! Frame driver
//!
//! Owns the [`World`], the graphics backend and the pointer-drag state, and
//! turns windowing events into system invocations:
//!
//! - primary press records the drag origin
//! - a move with the primary button held rotates every entity and requests a redraw
//! - primary release cycles the color of every entity and requests a redraw
//! - resize updates the camera and the projection
//! - a redraw tick runs the frame systems and the render pass
//!
//! All work happens on the thread that calls [`FrameDriver::handle_event`].

use crate::assets::{GpuResources, ResourceError};
use crate::config::{Config, ConfigError};
use crate::ecs::components::{Camera, Viewport};
use crate::ecs::systems::{
    input_rotation_system, release_color_system, render_system, AnimationSystem, LightingParameters, PhysicsSystem,
    DEFAULT_HUE_STEP_DEGREES,
};
use crate::ecs::{EcsError, Entity, System, World};
use crate::foundation::color::Color4;
use crate::foundation::math::{Mat4, Point2, Vec2, Vec3};
use crate::foundation::time::FrameTimer;
use crate::input::InputEvent;
use crate::render::{ClearTargets, GraphicsBackend, RenderError};
use crate::scene::{build_scene, SceneConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window configuration
    pub window: WindowConfig,
    /// Pointer input
    pub input: InputConfig,
    /// Release color cycling
    pub color: ColorConfig,
    /// Camera and projection
    pub camera: CameraConfig,
    /// Scene light
    pub light: LightConfig,
    /// Entities to spawn
    pub scene: SceneConfig,
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Reject values the frame driver cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid {
                field,
                reason: reason.into(),
            })
        }

        if self.window.width == 0 || self.window.height == 0 {
            return invalid("window", format!("size {}x{} is empty", self.window.width, self.window.height));
        }
        if !(self.input.sensitivity.is_finite() && self.input.sensitivity > 0.0) {
            return invalid("input.sensitivity", format!("{} is not positive", self.input.sensitivity));
        }
        if !self.color.hue_step_degrees.is_finite() {
            return invalid("color.hue_step_degrees", "must be finite");
        }
        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return invalid("camera.fov_degrees", format!("{} is outside (0, 180)", self.camera.fov_degrees));
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            return invalid(
                "camera.near",
                format!("near {} / far {} must satisfy 0 < near < far", self.camera.near, self.camera.far),
            );
        }
        Ok(())
    }

    /// Lighting parameters for the render pass
    pub fn lighting(&self) -> LightingParameters {
        LightingParameters {
            light_position: Vec3::from(self.light.position),
            light_color: self.light.color,
            ambient_value: self.light.ambient_value,
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial framebuffer width
    pub width: u32,
    /// Initial framebuffer height
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Cube".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Pointer input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Multiplier applied to the normalized drag delta
    pub sensitivity: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { sensitivity: 3.0 }
    }
}

/// Color cycling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Hue advance per primary release
    pub hue_step_degrees: f32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            hue_step_degrees: DEFAULT_HUE_STEP_DEGREES,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
    /// Distance the scene is pushed back along -Z
    pub view_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 35.0,
            near: 0.01,
            far: 100.0,
            view_distance: 10.0,
        }
    }
}

/// Light configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// World-space position
    pub position: [f32; 3],
    /// Light color
    pub color: Color4,
    /// HSV value of the ambient term
    pub ambient_value: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        let lighting = LightingParameters::default();
        Self {
            position: lighting.light_position.into(),
            color: lighting.light_color,
            ambient_value: lighting.ambient_value,
        }
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Entity bookkeeping failed
    #[error("ECS error: {0}")]
    Ecs(#[from] EcsError),

    /// Backend rejected a frame or draw
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Mesh or shader could not be resolved
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The camera entity is gone
    #[error("Scene has no camera")]
    NoCamera,
}

/// What the windowing layer should do after an event
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameResponse {
    /// Schedule a redraw tick
    pub redraw_requested: bool,
    /// Rotation delta fed to the input-rotation system, if any
    pub drag_delta: Option<Vec2>,
    /// Draws submitted, if this event rendered a frame
    pub draws: Option<usize>,
}

impl FrameResponse {
    fn redraw() -> Self {
        Self {
            redraw_requested: true,
            ..Self::default()
        }
    }
}

/// Counters over the driver's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames rendered
    pub frames: u64,
    /// Draw requests submitted
    pub draws: u64,
    /// Drag moves applied
    pub rotations: u64,
    /// Primary releases applied
    pub recolors: u64,
}

/// Dispatches windowing events to systems
pub struct FrameDriver<B: GraphicsBackend> {
    world: World,
    backend: B,
    resources: GpuResources,
    camera: Entity,
    viewport: Viewport,
    projection: Mat4,
    view_distance: f32,
    sensitivity: f32,
    hue_step: f32,
    lighting: LightingParameters,
    drag_origin: Option<Point2>,
    frame_systems: Vec<Box<dyn System>>,
    timer: FrameTimer,
    stats: FrameStats,
}

impl<B: GraphicsBackend + 'static> FrameDriver<B> {
    /// Validate `config`, build its scene on `backend` and return a driver
    pub fn from_config(config: &EngineConfig, mut backend: B) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!("Initializing frame driver for '{}'", config.window.title);

        let mut world = World::new();
        let mut resources = GpuResources::new();
        let scene = build_scene(&mut world, &mut resources, &mut backend, config)?;
        Self::new(world, backend, resources, scene.camera, config)
    }
}

impl<B: GraphicsBackend> FrameDriver<B> {
    /// Wrap an already populated world. `camera` must carry a [`Camera`].
    pub fn new(
        world: World,
        backend: B,
        resources: GpuResources,
        camera: Entity,
        config: &EngineConfig,
    ) -> Result<Self, EngineError> {
        let viewport = world.get::<Camera>(camera).ok_or(EngineError::NoCamera)?.viewport;

        let mut driver = Self {
            world,
            backend,
            resources,
            camera,
            viewport,
            projection: Mat4::identity(),
            view_distance: config.camera.view_distance,
            sensitivity: config.input.sensitivity,
            hue_step: config.color.hue_step_degrees,
            lighting: config.lighting(),
            drag_origin: None,
            frame_systems: vec![Box::new(AnimationSystem), Box::new(PhysicsSystem)],
            timer: FrameTimer::new(),
            stats: FrameStats::default(),
        };
        driver.update_projection()?;
        Ok(driver)
    }

    /// Dispatch one windowing event
    pub fn handle_event(&mut self, event: InputEvent) -> Result<FrameResponse, EngineError> {
        log::debug!("Dispatching {event:?}");
        match event {
            InputEvent::PointerPressed { button, x, y } => {
                if button.is_primary() {
                    self.drag_origin = Some(Point2::new(x, y));
                }
                Ok(FrameResponse::default())
            }
            InputEvent::PointerMoved { buttons, x, y } => {
                if !buttons.primary() {
                    return Ok(FrameResponse::default());
                }
                Ok(self.drag_to(Point2::new(x, y)))
            }
            InputEvent::PointerReleased { button, .. } => {
                if !button.is_primary() || self.drag_origin.take().is_none() {
                    return Ok(FrameResponse::default());
                }
                release_color_system(&mut self.world, self.hue_step);
                self.stats.recolors += 1;
                Ok(FrameResponse::redraw())
            }
            InputEvent::Resized { width, height } => {
                self.resize(Viewport::new(width, height))?;
                Ok(FrameResponse::redraw())
            }
            InputEvent::Redraw => {
                let draws = self.draw_frame()?;
                Ok(FrameResponse {
                    draws: Some(draws),
                    ..FrameResponse::default()
                })
            }
        }
    }

    fn drag_to(&mut self, position: Point2) -> FrameResponse {
        let Some(origin) = self.drag_origin else {
            return FrameResponse::default();
        };
        if self.viewport.is_empty() {
            return FrameResponse::default();
        }

        let delta = (position - origin).component_div(&self.viewport.size()) * self.sensitivity;
        input_rotation_system(&mut self.world, delta);
        self.drag_origin = Some(position);
        self.stats.rotations += 1;

        FrameResponse {
            drag_delta: Some(delta),
            ..FrameResponse::redraw()
        }
    }

    /// Update the camera for a new framebuffer size
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), EngineError> {
        let camera = self.world.get_mut::<Camera>(self.camera).ok_or(EngineError::NoCamera)?;
        camera.resize(viewport);
        self.viewport = viewport;
        log::info!("Viewport resized to {}x{}", viewport.width, viewport.height);
        self.update_projection()
    }

    fn update_projection(&mut self) -> Result<(), EngineError> {
        let camera = self.world.get::<Camera>(self.camera).ok_or(EngineError::NoCamera)?;
        let view = Mat4::new_translation(&Vec3::new(0.0, 0.0, -self.view_distance));
        self.projection = camera.projection() * view;
        Ok(())
    }

    /// Run the frame systems and render one frame. Returns the number of draws.
    pub fn draw_frame(&mut self) -> Result<usize, EngineError> {
        let delta_time = self.timer.tick();
        for system in &mut self.frame_systems {
            log::trace!("Running system '{}'", system.name());
            system.run(&mut self.world, delta_time);
        }

        self.backend.begin_frame(ClearTargets::COLOR | ClearTargets::DEPTH)?;
        let draws = render_system(&self.world, &mut self.backend, &self.projection, &self.lighting)?;
        self.backend.end_frame()?;

        self.stats.frames += 1;
        self.stats.draws += draws as u64;
        Ok(draws)
    }

    /// Append a system run on every redraw tick, after the built-in ones
    pub fn add_frame_system(&mut self, system: impl System + 'static) {
        self.frame_systems.push(Box::new(system));
    }

    /// Names of the frame systems in run order
    pub fn frame_system_names(&self) -> Vec<&'static str> {
        self.frame_systems.iter().map(|system| system.name()).collect()
    }

    /// Get the ECS world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Get the graphics backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Get mutable access to the graphics backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Get the mesh and shader managers
    pub fn resources(&self) -> &GpuResources {
        &self.resources
    }

    /// Camera entity
    pub fn camera(&self) -> Entity {
        self.camera
    }

    /// Current viewport
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Projection times view translation
    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// Position recorded by the last primary press or drag move
    pub fn drag_origin(&self) -> Option<Point2> {
        self.drag_origin
    }

    /// Lifetime counters
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Tear down the driver, keeping the world and backend
    pub fn into_parts(self) -> (World, B) {
        (self.world, self.backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::{self, BufferSink};
    use crate::ecs::components::{Drawable, Orientation};
    use crate::foundation::math::{axis_angle, world_up, Quat};
    use crate::input::{MouseButton, MouseButtons};
    use crate::render::RecordingBackend;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::sync::Once;

    /// Records this module's log lines per test thread
    struct CaptureLogger;

    thread_local! {
        static CAPTURED: RefCell<Vec<(log::Level, String)>> = RefCell::new(Vec::new());
    }

    impl log::Log for CaptureLogger {
        fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            if record.target() == module_path!().trim_end_matches("::tests") {
                CAPTURED.with(|lines| lines.borrow_mut().push((record.level(), record.args().to_string())));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger;

    fn capture_logs() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = log::set_logger(&LOGGER);
            log::set_max_level(log::LevelFilter::Trace);
        });
        CAPTURED.with(|lines| lines.borrow_mut().clear());
    }

    fn captured() -> Vec<(log::Level, String)> {
        CAPTURED.with(|lines| lines.borrow().clone())
    }

    fn driver() -> FrameDriver<RecordingBackend> {
        FrameDriver::from_config(&EngineConfig::default(), RecordingBackend::new()).unwrap()
    }

    fn box_entity(driver: &FrameDriver<RecordingBackend>) -> Entity {
        driver.world().view::<(Orientation,)>().entities().next().unwrap()
    }

    fn assert_same_rotation(a: &Quat, b: &Quat) {
        for axis in [Vec3::x(), Vec3::y(), Vec3::z()] {
            assert_relative_eq!(a * axis, b * axis, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_drag_delta_is_normalized_and_scaled() {
        let mut driver = driver();
        let e = box_entity(&driver);
        let before = driver.world().get::<Orientation>(e).unwrap().0;

        driver.handle_event(InputEvent::press(MouseButton::Left, 100.0, 100.0)).unwrap();
        let response = driver.handle_event(InputEvent::drag(MouseButtons::LEFT, 110.0, 100.0)).unwrap();

        let delta = response.drag_delta.unwrap();
        assert_relative_eq!(delta.x, 0.0375, epsilon = 1e-6);
        assert_relative_eq!(delta.y, 0.0, epsilon = 1e-6);
        assert!(response.redraw_requested);
        assert_eq!(driver.drag_origin(), Some(Point2::new(110.0, 100.0)));

        let after = driver.world().get::<Orientation>(e).unwrap().0;
        assert_same_rotation(&after, &(axis_angle(&world_up(), 0.0375) * before));
    }

    #[test]
    fn test_move_without_press_or_button_is_ignored() {
        let mut driver = driver();
        let e = box_entity(&driver);
        let before = *driver.world().get::<Orientation>(e).unwrap();

        let response = driver.handle_event(InputEvent::drag(MouseButtons::LEFT, 50.0, 50.0)).unwrap();
        assert_eq!(response, FrameResponse::default());

        driver.handle_event(InputEvent::press(MouseButton::Left, 10.0, 10.0)).unwrap();
        let response = driver.handle_event(InputEvent::drag(MouseButtons::RIGHT, 50.0, 50.0)).unwrap();
        assert!(!response.redraw_requested);

        assert_eq!(driver.world().get::<Orientation>(e), Some(&before));
        assert_eq!(driver.stats().rotations, 0);
    }

    #[test]
    fn test_primary_release_cycles_hue() {
        let mut driver = driver();
        let e = box_entity(&driver);
        let hue = driver.world().get::<Drawable>(e).unwrap().color.hue();

        driver.handle_event(InputEvent::press(MouseButton::Left, 0.0, 0.0)).unwrap();
        let response = driver.handle_event(InputEvent::release(MouseButton::Left, 0.0, 0.0)).unwrap();
        assert!(response.redraw_requested);
        assert_eq!(driver.drag_origin(), None);

        let recolored = driver.world().get::<Drawable>(e).unwrap().color;
        assert_relative_eq!(recolored.hue(), hue + DEFAULT_HUE_STEP_DEGREES, epsilon = 1e-3);
        assert_eq!(driver.stats().recolors, 1);
    }

    #[test]
    fn test_secondary_release_is_ignored() {
        let mut driver = driver();
        let e = box_entity(&driver);
        let color = driver.world().get::<Drawable>(e).unwrap().color;

        driver.handle_event(InputEvent::press(MouseButton::Right, 0.0, 0.0)).unwrap();
        let response = driver.handle_event(InputEvent::release(MouseButton::Right, 0.0, 0.0)).unwrap();

        assert!(!response.redraw_requested);
        assert_eq!(driver.world().get::<Drawable>(e).unwrap().color, color);
    }

    #[test]
    fn test_resize_updates_camera_and_projection() {
        let mut driver = driver();
        let before = *driver.projection();

        let response = driver.handle_event(InputEvent::Resized { width: 1600, height: 600 }).unwrap();
        assert!(response.redraw_requested);

        let camera = driver.world().get::<Camera>(driver.camera()).unwrap();
        assert_relative_eq!(camera.aspect_ratio, 1600.0 / 600.0);
        assert_eq!(driver.viewport(), Viewport::new(1600, 600));
        assert_ne!(*driver.projection(), before);
    }

    #[test]
    fn test_redraw_runs_systems_then_renders() {
        let mut driver = driver();
        let sink = BufferSink::new();
        let _guard = debug::redirect(sink.clone());

        let response = driver.handle_event(InputEvent::Redraw).unwrap();

        assert_eq!(response.draws, Some(1));
        assert_eq!(sink.lines(), vec!["Animating..", "Simulating..", "Rendering.."]);
        let frame = driver.backend().last_frame().unwrap();
        assert_eq!(frame.cleared, ClearTargets::COLOR | ClearTargets::DEPTH);
        assert_eq!(frame.draws[0].projection, *driver.projection());
        assert_eq!(driver.stats().frames, 1);
    }

    #[test]
    fn test_dispatch_logged_at_debug_and_resize_at_info() {
        let mut driver = driver();
        capture_logs();

        driver.handle_event(InputEvent::press(MouseButton::Left, 1.0, 2.0)).unwrap();
        driver.handle_event(InputEvent::Resized { width: 1024, height: 768 }).unwrap();

        let lines = captured();
        assert!(lines
            .iter()
            .any(|(level, line)| *level == log::Level::Debug && line.starts_with("Dispatching PointerPressed")));
        assert!(lines
            .iter()
            .any(|(level, line)| *level == log::Level::Debug && line.starts_with("Dispatching Resized")));
        assert!(lines.contains(&(log::Level::Info, "Viewport resized to 1024x768".to_string())));
    }

    #[test]
    fn test_destroyed_camera_reports_error() {
        let mut driver = driver();
        let camera = driver.camera();
        driver.world_mut().destroy(camera).unwrap();

        let err = driver.handle_event(InputEvent::Resized { width: 10, height: 10 }).unwrap_err();
        assert!(matches!(err, EngineError::NoCamera));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.camera.near = 0.0;
        let err = FrameDriver::from_config(&config, RecordingBackend::new()).err().unwrap();
        assert!(matches!(err, EngineError::Config(ConfigError::Invalid { field: "camera.near", .. })));
    }

    #[test]
    fn test_config_parses_partial_toml() {
        let text = r#"
            [input]
            sensitivity = 2.0

            [[scene.entities]]
            name = "Left"
            position = [-2.0, 0.0, 0.0]
            color = { r = 1.0, g = 0.0, b = 0.0 }
        "#;
        let config = EngineConfig::from_str_as(text, crate::config::ConfigFormat::Toml).unwrap();

        assert_eq!(config.input.sensitivity, 2.0);
        assert_eq!(config.window, WindowConfig::default());
        assert_eq!(config.scene.entities.len(), 1);
        assert_eq!(config.scene.entities[0].name, "Left");
        assert_eq!(config.scene.entities[0].mesh, "cube");
        assert_eq!(config.scene.entities[0].color.a, 1.0);
        config.validate().unwrap();
    }
}
