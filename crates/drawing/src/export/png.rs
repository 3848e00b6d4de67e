//! Still image export

use glowdraw_config::ExportConfig;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use tracing::info;

use crate::scene::FrameCapture;

use super::ExportError;

/// Encode an RGBA frame as PNG bytes
pub fn encode_png(frame: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(ExportError::Unsupported(format!(
            "cannot encode a {}x{} frame",
            frame.width(),
            frame.height()
        )));
    }
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        frame.as_raw(),
        frame.width(),
        frame.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// Capture the current frame upscaled per `config`.
///
/// The scale is `min(max_image_scale, max_image_dimension / longest side)`.
pub fn capture_scaled(
    capture: &mut dyn FrameCapture,
    config: &ExportConfig,
) -> Result<RgbaImage, ExportError> {
    let (width, height) = capture.viewport().ok_or(ExportError::RendererUnavailable)?;
    let scale = config.image_scale(width, height);
    let scaled = |side: u32| ((side as f32 * scale).round() as u32).max(1);
    let (target_w, target_h) = (scaled(width), scaled(height));

    info!(
        "Capturing {}x{} frame at {:.2}x ({}x{})",
        width, height, scale, target_w, target_h
    );
    capture.capture(target_w, target_h)
}
