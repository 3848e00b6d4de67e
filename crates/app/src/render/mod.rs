//! Headless software renderer
//!
//! Implements both sides of the engine's rendering boundary:
//! - [`SceneMount`]: keeps a world-space copy of whatever the session attaches
//! - [`FrameCapture`]: rasterizes that copy at any requested size
//!
//! Glow (stroke segments and particles) is blended additively over a dark
//! ground; the cursor marker is alpha-blended on top.

mod surface;

use drawing::{
    Camera, CursorMarker, ExportError, FrameCapture, Renderable, SceneMount, StrokeGeometry,
    Viewport,
};
use glam::{Vec2, Vec3};
use image::RgbaImage;
use tracing::debug;

pub use surface::FrameSurface;

const GROUND_COLOR: [f32; 4] = [0.067, 0.067, 0.067, 1.0];
const SEGMENT_RADIUS: f32 = 0.03;
const PARTICLE_SIZE: f32 = 0.05;
const PARTICLE_OPACITY: f32 = 0.8;
const CURSOR_RADIUS: f32 = 0.08;
/// Keeps thin features visible at small render sizes
const MIN_PIXEL_RADIUS: f32 = 1.5;

/// One segment in world space
#[derive(Debug, Clone, Copy, PartialEq)]
struct WorldSegment {
    start: Vec3,
    end: Vec3,
    color: [f32; 3],
}

/// Software stand-in for a GPU scene graph
pub struct SoftwareRenderer {
    camera: Camera,
    viewport: Viewport,
    mounted: bool,
    segments: Vec<WorldSegment>,
    particles: Vec<([f32; 3], [f32; 3])>,
    cursor: Option<CursorMarker>,
}

impl SoftwareRenderer {
    pub fn new(camera: Camera, viewport: Viewport) -> Self {
        Self {
            camera,
            viewport,
            mounted: false,
            segments: Vec::new(),
            particles: Vec::new(),
            cursor: None,
        }
    }

    /// Number of stroke segments currently shown
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    fn mount_strokes(&mut self, geometry: Option<&StrokeGeometry>) {
        self.segments.clear();
        let Some(geometry) = geometry else {
            return;
        };
        for mesh in geometry.meshes() {
            let start = mesh.transform.transform_point3(Vec3::new(0.0, -0.5, 0.0));
            let end = mesh.transform.transform_point3(Vec3::new(0.0, 0.5, 0.0));
            let color = mesh
                .material
                .emissive
                .scale(mesh.material.emissive_intensity)
                .to_array();
            self.segments.push(WorldSegment { start, end, color });
        }
    }

    /// Project a world point to pixels on a `width` x `height` target
    fn to_pixel(&self, point: Vec3, width: u32, height: u32) -> Option<Vec2> {
        let ndc = self.camera.project(point)?;
        Some(Viewport::new(width, height).to_pixel(ndc.truncate()))
    }

    /// Pixel size of a world-space radius around `at`
    fn pixel_radius(&self, at: Vec3, radius: f32, width: u32, height: u32) -> f32 {
        let center = self.to_pixel(at, width, height);
        let edge = self.to_pixel(at + Vec3::new(radius, 0.0, 0.0), width, height);
        match (center, edge) {
            (Some(c), Some(e)) => c.distance(e).max(MIN_PIXEL_RADIUS),
            _ => MIN_PIXEL_RADIUS,
        }
    }

    fn rasterize(&self, width: u32, height: u32) -> FrameSurface {
        let mut surface = FrameSurface::new(width, height);
        surface.clear(GROUND_COLOR);

        for segment in &self.segments {
            let (Some(a), Some(b)) = (
                self.to_pixel(segment.start, width, height),
                self.to_pixel(segment.end, width, height),
            ) else {
                continue;
            };
            let radius = self.pixel_radius(segment.start, SEGMENT_RADIUS, width, height);
            // Core plus a wide faint halo
            surface.add_line(a.to_array(), b.to_array(), radius, segment.color, 1.0);
            surface.add_line(a.to_array(), b.to_array(), radius * 3.0, segment.color, 0.15);
        }

        for (position, color) in &self.particles {
            let position = Vec3::from_array(*position);
            let Some(p) = self.to_pixel(position, width, height) else {
                continue;
            };
            let radius = self.pixel_radius(position, PARTICLE_SIZE / 2.0, width, height);
            surface.add_disc(p.x, p.y, radius, *color, PARTICLE_OPACITY);
        }

        if let Some(cursor) = self.cursor.filter(|c| c.visible) {
            let at = cursor.position.to_vec3();
            if let Some(p) = self.to_pixel(at, width, height) {
                let radius = self.pixel_radius(at, CURSOR_RADIUS, width, height);
                surface.blend_disc(p.x, p.y, radius, cursor.color.to_array(), cursor.opacity);
            }
        }

        surface
    }
}

impl SceneMount for SoftwareRenderer {
    fn attach(&mut self, renderable: Renderable<'_>) {
        self.mounted = true;
        match renderable {
            Renderable::Strokes(geometry) => self.mount_strokes(geometry),
            Renderable::Particles(buffer) => {
                self.particles.clear();
                self.particles.extend(
                    buffer
                        .positions()
                        .iter()
                        .copied()
                        .zip(buffer.colors().iter().copied()),
                );
            }
            Renderable::Cursor(cursor) => self.cursor = Some(*cursor),
        }
    }
}

impl FrameCapture for SoftwareRenderer {
    fn viewport(&self) -> Option<(u32, u32)> {
        self.mounted
            .then_some((self.viewport.width, self.viewport.height))
    }

    fn capture(&mut self, width: u32, height: u32) -> Result<RgbaImage, ExportError> {
        if !self.mounted {
            return Err(ExportError::RendererUnavailable);
        }
        debug!(
            "Rasterizing {} segment(s), {} particle(s) at {}x{}",
            self.segments.len(),
            self.particles.len(),
            width,
            height
        );
        Ok(self.rasterize(width, height).to_image())
    }
}
