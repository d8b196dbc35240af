//! Headless cube replay
//!
//! Loads the engine configuration, builds the scene on a recording backend and
//! replays a recorded input session through the frame driver. Every event that
//! asks for a redraw is followed by a redraw tick, the way a windowing layer
//! would schedule one.
//!
//! Usage: `cube_replay [config.toml] [session.ron]`

use ecs_engine::config::Config;
use ecs_engine::debug::{self, LogSink};
use ecs_engine::ecs::components::{Drawable, Identity, Orientation};
use ecs_engine::input::InputEvent;
use ecs_engine::render::{GraphicsBackend, RecordingBackend};
use ecs_engine::{EngineConfig, EngineError, FrameDriver};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Failed to read session {path}: {source}")]
    SessionIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse session {path}: {reason}")]
    SessionParse { path: PathBuf, reason: String },
}

fn default_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn load_session(path: &Path) -> Result<Vec<InputEvent>, AppError> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::SessionIo {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&text).map_err(|e| AppError::SessionParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn replay(driver: &mut FrameDriver<RecordingBackend>, events: Vec<InputEvent>) -> Result<(), AppError> {
    for event in events {
        let response = driver.handle_event(event)?;
        if let Some(delta) = response.drag_delta {
            log::info!("Drag rotated scene by ({:.4}, {:.4})", delta.x, delta.y);
        }
        if response.redraw_requested {
            driver.handle_event(InputEvent::Redraw)?;
        }
    }
    Ok(())
}

fn report(driver: &FrameDriver<RecordingBackend>) {
    let world = driver.world();
    for (entity, (identity, orientation, drawable)) in world.view::<(Identity, Orientation, Drawable)>() {
        let color = drawable.color;
        log::info!(
            "{identity} ({entity:?}): rotation {:.1} deg, hue {:.1} deg, rgba [{:.3}, {:.3}, {:.3}, {:.3}]",
            orientation.0.angle().to_degrees(),
            color.hue(),
            color.r,
            color.g,
            color.b,
            color.a,
        );
    }

    let stats = driver.stats();
    log::info!(
        "{} frames, {} draws, {} drag moves, {} color changes",
        stats.frames,
        stats.draws,
        stats.rotations,
        stats.recolors
    );
    for (component, count) in world.component_counts() {
        log::debug!("{component}: {count}");
    }
}

fn run() -> Result<(), AppError> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().map_or_else(|| default_path("config/cube.toml"), PathBuf::from);
    let session_path = args.next().map_or_else(|| default_path("sessions/drag.ron"), PathBuf::from);

    let config = EngineConfig::load_or_default(&config_path).map_err(EngineError::from)?;
    let events = load_session(&session_path)?;
    log::info!("Replaying {} events from {}", events.len(), session_path.display());

    let mut driver = FrameDriver::from_config(&config, RecordingBackend::new())?;
    {
        let _debug = debug::redirect(LogSink);
        replay(&mut driver, events)?;
    }
    report(&driver);

    let (world, mut backend) = driver.into_parts();
    drop(world);
    let released = backend.collect_released();
    log::info!(
        "Released {released} GPU resources on shutdown ({} meshes, {} shaders still live)",
        backend.live_meshes(),
        backend.live_shaders()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting cube replay");
    if let Err(e) = run() {
        log::error!("Cube replay failed: {e}");
        std::process::exit(1);
    }
    log::info!("Cube replay completed successfully");
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecs_engine::input::MouseButtons;

    #[test]
    fn test_shipped_session_loads() {
        let events = load_session(&default_path("sessions/drag.ron")).unwrap();
        assert_eq!(events.len(), 12);
        assert_eq!(events[2], InputEvent::drag(MouseButtons::LEFT, 110.0, 100.0));
        assert_eq!(events[6], InputEvent::drag(MouseButtons::empty(), 200.0, 200.0));
    }

    #[test]
    fn test_shipped_session_replays() {
        let config = EngineConfig::load_from_file(default_path("config/cube.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());

        let events = load_session(&default_path("sessions/drag.ron")).unwrap();
        let mut driver = FrameDriver::from_config(&config, RecordingBackend::new()).unwrap();
        replay(&mut driver, events).unwrap();

        let stats = driver.stats();
        assert_eq!(stats.frames, 7);
        assert_eq!(stats.draws, 7);
        assert_eq!(stats.rotations, 3);
        assert_eq!(stats.recolors, 2);
    }
}
