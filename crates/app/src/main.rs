//! Glowdraw - headless host for the drawing engine
//!
//! Wires a [`DrawingSession`] to the software renderer, replays a scripted
//! drawing and writes the GLB model and PNG image exports to disk.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use drawing::{Camera, DrawingSession, ExportBlob, GroundPlane, SurfaceMapper, Viewport};
use tracing::{error, info};

mod config;
mod demo;
mod error;
mod render;

use config::AppConfig;
use error::AppError;
use render::SoftwareRenderer;

fn main() -> ExitCode {
    let config = AppConfig::from_env();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig) -> Result<(), AppError> {
    info!(
        "Starting glowdraw at {}x{}, exporting to {}",
        config.width,
        config.height,
        config.output_dir.display()
    );

    let draw_config = config.load_draw_config()?;
    let viewport = Viewport::new(config.width, config.height);
    let camera = Camera::default().with_aspect(viewport.aspect());
    let mapper = SurfaceMapper::new(
        GroundPlane::from_config(&draw_config.surface),
        camera,
        viewport,
    );
    let mut session = DrawingSession::new(draw_config, mapper)?;
    let mut renderer = SoftwareRenderer::new(camera, viewport);

    demo::replay(&mut session, &mut renderer, viewport, &demo::script());
    info!(
        "Scene shows {} segment(s) and {} particle(s)",
        renderer.segment_count(),
        renderer.particle_count()
    );

    let model = session.export_model()?;
    let image = session.export_image(&mut renderer)?;

    fs::create_dir_all(&config.output_dir).map_err(|source| AppError::Io {
        path: config.output_dir.clone(),
        source,
    })?;
    for blob in [model, image] {
        save(&config.output_dir, &blob)?;
    }
    Ok(())
}

fn save(dir: &Path, blob: &ExportBlob) -> Result<(), AppError> {
    let path = dir.join(&blob.filename);
    fs::write(&path, &blob.bytes).map_err(|source| AppError::Io {
        path: path.clone(),
        source,
    })?;
    info!(
        "Saved {} ({}, {} bytes)",
        path.display(),
        blob.mime_type,
        blob.bytes.len()
    );
    Ok(())
}
