//! Shared configuration for glowdraw
//!
//! This crate provides the single source of truth for the drawing engine's
//! tunables: stroke sampling, eraser size, particle behavior, segment
//! geometry and export limits. Both the engine and the host binary read
//! from here.

use serde::{Deserialize, Serialize};

/// Minimum planar distance between two retained stroke points (world units)
pub const DEFAULT_SAMPLING_THRESHOLD: f32 = 0.05;

/// Offset applied to a single-point stroke when it is finalized
pub const DEFAULT_TAP_NUDGE: f32 = 0.01;

/// Default eraser radius (world units)
pub const DEFAULT_ERASER_RADIUS: f32 = 0.15;

/// Default brush color
pub const DEFAULT_COLOR: &str = "#ffffff";

/// Maximum number of live particles
pub const DEFAULT_PARTICLE_CAPACITY: usize = 5000;

/// Side length of the square drawing plane (world units)
pub const DEFAULT_SURFACE_SIZE: f32 = 20.0;

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Points closer than this (planar) to the previous point are dropped
    pub sampling_threshold: f32,
    /// X offset of the synthesized second point of a tap
    pub tap_nudge: f32,
    /// Radius used by the eraser
    pub eraser_radius: f32,
    /// Brush color at startup, as `#rrggbb`
    pub initial_color: String,
    pub particles: ParticleConfig,
    pub segments: SegmentConfig,
    pub surface: SurfaceConfig,
    pub export: ExportConfig,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            sampling_threshold: DEFAULT_SAMPLING_THRESHOLD,
            tap_nudge: DEFAULT_TAP_NUDGE,
            eraser_radius: DEFAULT_ERASER_RADIUS,
            initial_color: DEFAULT_COLOR.to_string(),
            particles: ParticleConfig::default(),
            segments: SegmentConfig::default(),
            surface: SurfaceConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// Glow particle spawn and lifetime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Ring capacity; the oldest particle is evicted on overflow
    pub capacity: usize,
    /// Particles spawned per frame while drawing
    pub spawn_per_frame: usize,
    /// Life lost per frame (life starts at 1.0)
    pub life_decay: f32,
    /// Fraction of spawned particles tinted with the stroke color
    pub colored_fraction: f32,
    /// Full width of the horizontal spawn jitter
    pub spawn_jitter: f32,
    /// Lowest spawn height above the plane
    pub spawn_height_min: f32,
    /// Random extra spawn height
    pub spawn_height_range: f32,
    /// Lowest upward speed
    pub speed_min: f32,
    /// Random extra upward speed
    pub speed_range: f32,
    /// Horizontal velocity as a fraction of the upward speed
    pub lateral_spread: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_PARTICLE_CAPACITY,
            spawn_per_frame: 25,
            life_decay: 0.012,
            colored_fraction: 0.4,
            spawn_jitter: 0.1,
            spawn_height_min: 0.05,
            spawn_height_range: 0.15,
            speed_min: 0.08,
            speed_range: 0.12,
            lateral_spread: 0.5,
        }
    }
}

/// Cylinder segment geometry used to display strokes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    pub radius: f32,
    /// Number of sides around the cylinder
    pub radial_segments: u32,
    /// Height of segment centers above the plane
    pub height: f32,
    pub emissive_intensity: f32,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            radius: 0.03,
            radial_segments: 8,
            height: 0.02,
            emissive_intensity: 2.0,
        }
    }
}

/// Drawing plane settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Side length of the square ground plane, centered on the origin
    pub size: f32,
    /// Height of the cursor marker and thin line overlay
    pub hover_height: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SURFACE_SIZE,
            hover_height: 0.01,
        }
    }
}

/// Export limits and file naming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Upper bound on the image upscale factor
    pub max_image_scale: f32,
    /// Upper bound on the longest side of an exported image, in pixels
    pub max_image_dimension: u32,
    pub model_filename: String,
    pub image_filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_image_scale: 2.0,
            max_image_dimension: 4096,
            model_filename: "drawing.glb".to_string(),
            image_filename: "drawing.png".to_string(),
        }
    }
}

impl ExportConfig {
    /// Upscale factor for an image capture of the given viewport
    pub fn image_scale(&self, width: u32, height: u32) -> f32 {
        let longest = width.max(height).max(1) as f32;
        self.max_image_scale
            .min(self.max_image_dimension as f32 / longest)
    }
}
