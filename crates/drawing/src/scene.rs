//! Rendering boundary
//!
//! The engine never talks to a rendering library directly. Hosts implement
//! [`SceneMount`] to receive display geometry and [`FrameCapture`] to hand
//! back rendered frames for image export.

use image::RgbaImage;

use crate::export::ExportError;
use crate::mesh::StrokeGeometry;
use crate::particles::ParticleBuffer;
use crate::types::{Point, Rgb};

/// Hover marker that follows the pointer over the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorMarker {
    pub position: Point,
    pub color: Rgb,
    pub opacity: f32,
    pub visible: bool,
}

impl Default for CursorMarker {
    fn default() -> Self {
        Self {
            position: Point::new(0.0, 0.01, 0.0),
            color: Rgb::WHITE,
            opacity: 0.7,
            visible: true,
        }
    }
}

/// Something the host should show this frame
#[derive(Debug, Clone, Copy)]
pub enum Renderable<'a> {
    /// Stroke segments and line overlay; `None` while strokes are hidden
    Strokes(Option<&'a StrokeGeometry>),
    Particles(&'a ParticleBuffer),
    Cursor(&'a CursorMarker),
}

/// Scene-graph mount point supplied by the host
pub trait SceneMount {
    fn attach(&mut self, renderable: Renderable<'_>);
}

/// Frame source for image export
pub trait FrameCapture {
    /// Current render size in pixels, or `None` if nothing is mounted yet
    fn viewport(&self) -> Option<(u32, u32)>;

    /// Render the current scene at the given size.
    ///
    /// Implementations restore their own render size afterwards.
    fn capture(&mut self, width: u32, height: u32) -> Result<RgbaImage, ExportError>;
}
