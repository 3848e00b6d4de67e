//! One-way export of the drawing
//!
//! - [`glb`] - binary glTF model of every stroke segment
//! - [`png`] - upscaled still image of the current frame
//!
//! Exports are synchronous and all-or-nothing: on a missing precondition
//! they fail without side effects.

pub mod glb;
pub mod png;

use thiserror::Error;

pub use glb::write_glb;
pub use png::{capture_scaled, encode_png};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export")]
    NothingToExport,

    #[error("Renderer not available")]
    RendererUnavailable,

    #[error("Export not supported: {0}")]
    Unsupported(String),

    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to serialize model: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Model too large for GLB: {0} bytes")]
    TooLarge(usize),
}

/// Encoded export ready for the host to save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBlob {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

pub const GLB_MIME_TYPE: &str = "model/gltf-binary";
pub const PNG_MIME_TYPE: &str = "image/png";
