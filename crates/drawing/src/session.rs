//! Drawing session
//!
//! [`DrawingSession`] is the single owned state object that pointer events
//! and frame ticks are routed through. It ties the stroke store, surface
//! mapping, particle simulation, display geometry and exports together.

use glam::Vec2;
use glowdraw_config::DrawConfig;
use tracing::{debug, info, warn};

use crate::export::{self, ExportBlob, ExportError, GLB_MIME_TYPE, PNG_MIME_TYPE};
use crate::mesh::{MeshSynthesizer, SegmentMesh, StrokeGeometry, bake_for_export};
use crate::particles::{ParticleBuffer, ParticleSystem};
use crate::raycast::{Camera, Viewport};
use crate::scene::{CursorMarker, FrameCapture, Renderable, SceneMount};
use crate::store::StrokeStore;
use crate::surface::SurfaceMapper;
use crate::types::{ColorParseError, Point, Rgb, ToolMode};

const ERASER_CURSOR_OPACITY: f32 = 0.4;
const DRAW_CURSOR_OPACITY: f32 = 0.7;

/// Interactive drawing state driven by host input and frame callbacks
#[derive(Debug)]
pub struct DrawingSession {
    config: DrawConfig,
    store: StrokeStore,
    mapper: SurfaceMapper,
    particles: ParticleSystem,
    synthesizer: MeshSynthesizer,
    /// Display geometry for the store revision in `geometry_revision`
    geometry: StrokeGeometry,
    geometry_revision: Option<u64>,
    cursor: CursorMarker,
    camera_enabled: bool,
    lines_visible: bool,
}

impl DrawingSession {
    pub fn new(config: DrawConfig, mapper: SurfaceMapper) -> Result<Self, ColorParseError> {
        let particles = ParticleSystem::new(config.particles.clone());
        Self::with_particles(config, mapper, particles)
    }

    /// Like [`new`](Self::new) with deterministic particle spawns
    pub fn with_seed(
        config: DrawConfig,
        mapper: SurfaceMapper,
        seed: u64,
    ) -> Result<Self, ColorParseError> {
        let particles = ParticleSystem::with_seed(config.particles.clone(), seed);
        Self::with_particles(config, mapper, particles)
    }

    fn with_particles(
        config: DrawConfig,
        mapper: SurfaceMapper,
        particles: ParticleSystem,
    ) -> Result<Self, ColorParseError> {
        let store = StrokeStore::from_config(&config)?;
        let synthesizer = MeshSynthesizer::new(config.segments.clone(), &config.surface);
        let cursor = CursorMarker {
            position: Point::new(0.0, config.surface.hover_height, 0.0),
            color: store.color(),
            ..CursorMarker::default()
        };

        Ok(Self {
            config,
            store,
            mapper,
            particles,
            synthesizer,
            geometry: StrokeGeometry::default(),
            geometry_revision: None,
            cursor,
            camera_enabled: false,
            lines_visible: true,
        })
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    pub fn store(&self) -> &StrokeStore {
        &self.store
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn cursor(&self) -> &CursorMarker {
        &self.cursor
    }

    pub fn camera(&self) -> &Camera {
        self.mapper.camera()
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.mapper.set_camera(camera);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.mapper.set_viewport(viewport);
    }

    // Input -------------------------------------------------------------

    /// Pointer pressed at `pixel`.
    ///
    /// Returns true if a stroke (or eraser drag) began.
    pub fn pointer_down(&mut self, pixel: Vec2) -> bool {
        self.track_cursor(pixel);
        let Some(point) = self.mapper.map(pixel, self.camera_enabled) else {
            return false;
        };
        self.store.begin_stroke(point);
        true
    }

    /// Pointer moved to `pixel`.
    ///
    /// Returns true if the point was handed to the store.
    pub fn pointer_move(&mut self, pixel: Vec2) -> bool {
        self.track_cursor(pixel);
        if !self.store.is_drawing() {
            return false;
        }
        let Some(point) = self.mapper.map(pixel, self.camera_enabled) else {
            return false;
        };
        self.store.extend_stroke(point);
        true
    }

    /// Pointer released. Not gated by the camera toggle.
    pub fn pointer_up(&mut self) -> bool {
        if !self.store.is_drawing() {
            return false;
        }
        self.store.finish_stroke();
        true
    }

    /// Pointer left the surface; finishes the stroke exactly like a release
    pub fn pointer_leave(&mut self) -> bool {
        self.pointer_up()
    }

    fn track_cursor(&mut self, pixel: Vec2) {
        if let Some(hit) = self.mapper.locate(pixel) {
            self.cursor.position = Point::new(hit.x, self.config.surface.hover_height, hit.z);
        }
    }

    // Signals -----------------------------------------------------------

    /// Flip between camera manipulation and drawing input
    pub fn toggle_camera(&mut self) -> bool {
        self.camera_enabled = !self.camera_enabled;
        debug!("Camera manipulation enabled: {}", self.camera_enabled);
        self.camera_enabled
    }

    pub fn camera_enabled(&self) -> bool {
        self.camera_enabled
    }

    pub fn toggle_eraser(&mut self) -> ToolMode {
        let mode = self.store.toggle_eraser();
        debug!("Tool mode: {:?}", mode);
        mode
    }

    /// Set the color for future strokes
    pub fn set_color(&mut self, color: Rgb) {
        self.store.set_color(color);
    }

    /// Set the color for future strokes from a `#rrggbb` string
    pub fn set_color_hex(&mut self, hex: &str) -> Result<(), ColorParseError> {
        self.set_color(Rgb::from_hex(hex)?);
        Ok(())
    }

    /// Show or hide stroke display geometry. Stroke data is untouched.
    pub fn toggle_lines_visible(&mut self) -> bool {
        self.lines_visible = !self.lines_visible;
        debug!("Strokes visible: {}", self.lines_visible);
        self.lines_visible
    }

    pub fn lines_visible(&self) -> bool {
        self.lines_visible
    }

    pub fn undo(&mut self) -> bool {
        self.store.undo()
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn clear_all(&mut self) {
        self.store.clear_all();
    }

    // Frame -------------------------------------------------------------

    /// Advance one rendered frame and hand the results to `scene`
    pub fn frame(&mut self, scene: &mut dyn SceneMount) {
        let emitting = self.store.is_drawing() && !self.store.is_erasing();
        let emitter = emitting.then(|| self.cursor.position.to_vec3());
        self.particles.tick(emitter, self.store.color());

        self.refresh_geometry();
        self.style_cursor();

        let strokes = self.lines_visible.then_some(&self.geometry);
        scene.attach(Renderable::Strokes(strokes));
        scene.attach(Renderable::Particles(self.particles.buffer()));
        scene.attach(Renderable::Cursor(&self.cursor));
    }

    /// Particle buffer from the last frame
    pub fn particle_buffer(&self) -> &ParticleBuffer {
        self.particles.buffer()
    }

    fn style_cursor(&mut self) {
        if self.store.is_erasing() {
            self.cursor.color = Rgb::RED;
            self.cursor.opacity = ERASER_CURSOR_OPACITY;
        } else {
            self.cursor.color = self.store.color();
            self.cursor.opacity = DRAW_CURSOR_OPACITY;
        }
        self.cursor.visible = !self.store.is_drawing();
    }

    fn refresh_geometry(&mut self) {
        let revision = self.store.revision();
        if self.geometry_revision != Some(revision) {
            self.geometry = self.synthesizer.synthesize(self.store.strokes());
            self.geometry_revision = Some(revision);
        }
    }

    /// Display geometry for the current strokes, regardless of visibility
    pub fn geometry(&mut self) -> &StrokeGeometry {
        self.refresh_geometry();
        &self.geometry
    }

    /// Every current stroke display mesh
    pub fn meshes(&mut self) -> &[SegmentMesh] {
        self.geometry().meshes()
    }

    // Export ------------------------------------------------------------

    /// Export every stroke as a GLB model
    pub fn export_model(&mut self) -> Result<ExportBlob, ExportError> {
        let meshes = self.meshes();
        if meshes.is_empty() {
            warn!("Nothing to export");
            return Err(ExportError::NothingToExport);
        }
        let baked = bake_for_export(meshes);
        let bytes = export::write_glb(&baked)?;

        info!(
            "Exported {} mesh(es) to {}",
            baked.len(),
            self.config.export.model_filename
        );
        Ok(ExportBlob {
            filename: self.config.export.model_filename.clone(),
            mime_type: GLB_MIME_TYPE,
            bytes,
        })
    }

    /// Capture the current frame from `capture` and encode it as PNG
    pub fn export_image(&self, capture: &mut dyn FrameCapture) -> Result<ExportBlob, ExportError> {
        let frame = export::capture_scaled(capture, &self.config.export)?;
        let bytes = export::encode_png(&frame)?;

        info!(
            "Exported {}x{} image to {}",
            frame.width(),
            frame.height(),
            self.config.export.image_filename
        );
        Ok(ExportBlob {
            filename: self.config.export.image_filename.clone(),
            mime_type: PNG_MIME_TYPE,
            bytes,
        })
    }
}
