//! Scene construction from configuration
//!
//! Spawns one renderable entity per [`EntityConfig`] plus a camera entity.
//! Mesh and shader names are resolved through [`GpuResources`]; only
//! `Final` resources end up in a [`Drawable`].

use crate::assets::GpuResources;
use crate::ecs::components::{Camera, Drawable, Identity, TransformFactory, Viewport};
use crate::ecs::{Entity, World};
use crate::engine::{EngineConfig, EngineError};
use crate::foundation::color::Color4;
use crate::foundation::math::Vec3;
use crate::render::GraphicsBackend;
use serde::{Deserialize, Serialize};

/// One renderable entity in the scene file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Display name
    pub name: String,
    /// World position
    pub position: [f32; 3],
    /// Rotation axis (need not be normalized)
    pub rotation_axis: [f32; 3],
    /// Rotation about `rotation_axis` in degrees
    pub rotation_degrees: f32,
    /// Scale factors
    pub scale: [f32; 3],
    /// Surface color
    pub color: Color4,
    /// Mesh resource name
    pub mesh: String,
    /// Shader resource name
    pub shader: String,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            name: "Box".to_string(),
            position: [0.0, 0.0, 0.0],
            rotation_axis: [0.0, 1.0, 0.0],
            rotation_degrees: 30.0,
            scale: [1.0, 1.0, 1.0],
            color: Color4::rgb(0.4, 0.2, 0.9),
            mesh: "cube".to_string(),
            shader: "phong".to_string(),
        }
    }
}

/// Entities to spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Renderable entities
    pub entities: Vec<EntityConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            entities: vec![EntityConfig::default()],
        }
    }
}

/// Entities created by [`build_scene`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    /// Camera entity
    pub camera: Entity,
    /// Renderable entities in config order
    pub entities: Vec<Entity>,
}

/// Spawn one renderable entity
pub fn spawn_entity(
    world: &mut World,
    resources: &mut GpuResources,
    backend: &mut (dyn GraphicsBackend + 'static),
    config: &EntityConfig,
) -> Result<Entity, EngineError> {
    let (mesh, shader) = resources.resolve(&config.mesh, &config.shader, backend)?;
    let (position, orientation, scale) = TransformFactory::from_axis_angle(
        Vec3::from(config.position),
        Vec3::from(config.rotation_axis),
        config.rotation_degrees,
        Vec3::from(config.scale),
    );

    let entity = world.create();
    world.attach(entity, Identity::new(config.name.clone()))?;
    world.attach(entity, position)?;
    world.attach(entity, orientation)?;
    world.attach(entity, scale)?;
    world.attach(entity, Drawable::new(mesh, shader, config.color))?;
    log::debug!("Spawned '{}' as {entity:?}", config.name);
    Ok(entity)
}

/// Spawn the camera entity described by `config`
pub fn spawn_camera(world: &mut World, config: &EngineConfig) -> Result<Entity, EngineError> {
    let viewport = Viewport::new(config.window.width, config.window.height);
    let camera = world.create();
    world.attach(camera, Identity::new("Camera"))?;
    world.attach(
        camera,
        Camera::new(config.camera.fov_degrees, config.camera.near, config.camera.far, viewport),
    )?;
    Ok(camera)
}

/// Spawn the camera and every configured entity
pub fn build_scene(
    world: &mut World,
    resources: &mut GpuResources,
    backend: &mut (dyn GraphicsBackend + 'static),
    config: &EngineConfig,
) -> Result<Scene, EngineError> {
    let camera = spawn_camera(world, config)?;
    let entities = config
        .scene
        .entities
        .iter()
        .map(|entity| spawn_entity(world, resources, backend, entity))
        .collect::<Result<Vec<_>, _>>()?;

    log::info!("Scene built: {} entities plus camera", entities.len());
    Ok(Scene { camera, entities })
}
