use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A position in world space (y is up)
#[derive(
    Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable,
)]
#[repr(C)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance on the ground plane, ignoring the up axis
    pub fn planar_distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl From<Vec3> for Point {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Point> for Vec3 {
    fn from(p: Point) -> Self {
        p.to_vec3()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Color must start with '#': {0}")]
    MissingHash(String),
    #[error("Color must have 6 hex digits: {0}")]
    InvalidLength(String),
    #[error("Invalid hex digits in color: {0}")]
    InvalidDigits(String),
}

/// Linear RGB color with unit-range channels
#[derive(
    Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable,
)]
#[repr(C)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::from_u32(0xffffff);
    pub const RED: Rgb = Rgb::from_u32(0xff0000);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value
    pub const fn from_u32(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Parse a `#rrggbb` string
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        if digits.len() != 6 {
            return Err(ColorParseError::InvalidLength(s.to_string()));
        }
        let packed = u32::from_str_radix(digits, 16)
            .map_err(|_| ColorParseError::InvalidDigits(s.to_string()))?;
        Ok(Self::from_u32(packed))
    }

    pub fn to_hex(self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Swatches offered by the color picker
pub const PALETTE: [Rgb; 16] = [
    Rgb::from_u32(0xe60000), // vivid red
    Rgb::from_u32(0xff4500), // orange red
    Rgb::from_u32(0xff9900), // bright orange
    Rgb::from_u32(0xffeb00), // vivid yellow
    Rgb::from_u32(0xa3ff00), // lime green
    Rgb::from_u32(0x00b300), // vivid green
    Rgb::from_u32(0x00cccc), // vivid cyan
    Rgb::from_u32(0x0066ff), // vivid blue
    Rgb::from_u32(0x9933ff), // bright purple
    Rgb::from_u32(0xcc00cc), // vivid magenta
    Rgb::from_u32(0xff66cc), // pink
    Rgb::from_u32(0xffcc99), // peach
    Rgb::from_u32(0xf2f2f2), // soft white
    Rgb::from_u32(0xcccccc), // light gray
    Rgb::from_u32(0x666666), // medium gray
    Rgb::from_u32(0x333333), // dark gray
];

/// What a pointer drag does on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum ToolMode {
    #[default]
    Draw = 0,
    Erase = 1,
}

/// One continuous user-drawn path
///
/// The color is fixed at creation. Points are kept in drawing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    points: Vec<Point>,
    color: Rgb,
}

impl Stroke {
    /// Start a stroke from its first point
    pub fn new(start: Point, color: Rgb) -> Self {
        Self {
            points: vec![start],
            color,
        }
    }

    /// Build a stroke from an existing point list
    pub fn from_points(points: Vec<Point>, color: Rgb) -> Self {
        Self { points, color }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_point(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Consecutive point pairs, in drawing order
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    pub(crate) fn push(&mut self, point: Point) {
        self.points.push(point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_distance_ignores_up_axis() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(3.0, 100.0, 4.0);
        assert!((a.planar_distance(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_color_from_hex() {
        let c = Rgb::from_hex("#ff8000").unwrap();
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.to_hex(), "#ff8000");
    }

    #[test]
    fn test_color_from_hex_errors() {
        assert_eq!(
            Rgb::from_hex("ffffff"),
            Err(ColorParseError::MissingHash("ffffff".into()))
        );
        assert_eq!(
            Rgb::from_hex("#fff"),
            Err(ColorParseError::InvalidLength("#fff".into()))
        );
        assert_eq!(
            "#gggggg".parse::<Rgb>(),
            Err(ColorParseError::InvalidDigits("#gggggg".into()))
        );
    }

    #[test]
    fn test_palette_round_trips_through_hex() {
        assert_eq!(PALETTE[0].to_hex(), "#e60000");
        assert_eq!(PALETTE[15].to_hex(), "#333333");
    }

    #[test]
    fn test_stroke_segments() {
        let mut stroke = Stroke::new(Point::new(0.0, 0.0, 0.0), Rgb::WHITE);
        assert_eq!(stroke.segments().count(), 0);
        stroke.push(Point::new(1.0, 0.0, 0.0));
        stroke.push(Point::new(2.0, 0.0, 0.0));
        let segments: Vec<_> = stroke.segments().collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].0, Point::new(1.0, 0.0, 0.0));
    }
}
