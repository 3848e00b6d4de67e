//! CPU frame surface with linear float pixels

use image::{Rgba, RgbaImage};

/// RGBA float framebuffer. Channels may exceed 1.0 until conversion.
pub struct FrameSurface {
    pub width: u32,
    pub height: u32,
    pixels: Vec<[f32; 4]>,
}

impl FrameSurface {
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![[0.0, 0.0, 0.0, 1.0]; pixel_count],
        }
    }

    pub fn clear(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    #[cfg(test)]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        self.index(x as i32, y as i32).map(|i| self.pixels[i])
    }

    /// Additive blend, used for emissive glow
    #[inline]
    pub fn add_pixel(&mut self, x: i32, y: i32, color: [f32; 3], weight: f32) {
        let Some(index) = self.index(x, y) else {
            return;
        };
        let dst = &mut self.pixels[index];
        dst[0] += color[0] * weight;
        dst[1] += color[1] * weight;
        dst[2] += color[2] * weight;
    }

    /// Standard alpha compositing: out = src * alpha + dst * (1 - alpha)
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: [f32; 3], alpha: f32) {
        let Some(index) = self.index(x, y) else {
            return;
        };
        let dst = self.pixels[index];
        let inv = 1.0 - alpha;
        self.pixels[index] = [
            color[0] * alpha + dst[0] * inv,
            color[1] * alpha + dst[1] * inv,
            color[2] * alpha + dst[2] * inv,
            1.0,
        ];
    }

    /// Additive disc with a soft falloff toward the rim
    pub fn add_disc(&mut self, cx: f32, cy: f32, radius: f32, color: [f32; 3], weight: f32) {
        let radius = radius.max(0.5);
        let (x0, x1) = ((cx - radius).floor() as i32, (cx + radius).ceil() as i32);
        let (y0, y1) = ((cy - radius).floor() as i32, (cy + radius).ceil() as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt() / radius;
                if d <= 1.0 {
                    self.add_pixel(x, y, color, weight * (1.0 - d * d));
                }
            }
        }
    }

    /// Alpha-blended solid disc
    pub fn blend_disc(&mut self, cx: f32, cy: f32, radius: f32, color: [f32; 3], alpha: f32) {
        let radius = radius.max(0.5);
        let (x0, x1) = ((cx - radius).floor() as i32, (cx + radius).ceil() as i32);
        let (y0, y1) = ((cy - radius).floor() as i32, (cy + radius).ceil() as i32);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    self.blend_pixel(x, y, color, alpha);
                }
            }
        }
    }

    /// Additive thick line from `a` to `b`, stamped as discs along its length
    pub fn add_line(&mut self, a: [f32; 2], b: [f32; 2], radius: f32, color: [f32; 3], weight: f32) {
        let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
        let length = (dx * dx + dy * dy).sqrt();
        let step = (radius * 0.5).max(0.5);
        let steps = (length / step).ceil().max(1.0) as u32;
        // Spread the weight so long and short lines glow alike
        let stamp_weight = weight * step / (2.0 * radius.max(0.5)).max(step);
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.add_disc(a[0] + dx * t, a[1] + dy * t, radius, color, stamp_weight);
        }
    }

    /// Clamp to 8-bit RGBA
    pub fn to_image(&self) -> RgbaImage {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let p = self.pixels[(y as usize) * (self.width as usize) + (x as usize)];
            Rgba([channel(p[0]), channel(p[1]), channel(p[2]), channel(p[3])])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface_is_opaque_black() {
        let surface = FrameSurface::new(4, 3);
        assert_eq!(surface.get_pixel(3, 2), Some([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(surface.get_pixel(4, 0), None);
    }

    #[test]
    fn test_add_pixel_accumulates() {
        let mut surface = FrameSurface::new(2, 2);
        surface.add_pixel(1, 1, [1.0, 0.5, 0.0], 0.5);
        surface.add_pixel(1, 1, [1.0, 0.5, 0.0], 0.5);
        assert_eq!(surface.get_pixel(1, 1), Some([1.0, 0.5, 0.0, 1.0]));
        // Out of bounds is ignored
        surface.add_pixel(-1, 5, [1.0; 3], 1.0);
    }

    #[test]
    fn test_blend_pixel() {
        let mut surface = FrameSurface::new(1, 1);
        surface.clear([1.0, 1.0, 1.0, 1.0]);
        surface.blend_pixel(0, 0, [0.0, 0.0, 0.0], 0.25);
        let p = surface.get_pixel(0, 0).unwrap();
        assert!((p[0] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_disc_covers_center_only() {
        let mut surface = FrameSurface::new(20, 20);
        surface.add_disc(10.0, 10.0, 3.0, [1.0, 0.0, 0.0], 1.0);
        assert!(surface.get_pixel(10, 10).unwrap()[0] > 0.5);
        assert_eq!(surface.get_pixel(0, 0).unwrap()[0], 0.0);
        assert_eq!(surface.get_pixel(10, 15).unwrap()[0], 0.0);
    }

    #[test]
    fn test_line_reaches_both_ends() {
        let mut surface = FrameSurface::new(40, 10);
        surface.add_line([5.0, 5.0], [35.0, 5.0], 2.0, [0.0, 1.0, 0.0], 1.0);
        assert!(surface.get_pixel(5, 5).unwrap()[1] > 0.0);
        assert!(surface.get_pixel(20, 5).unwrap()[1] > 0.0);
        assert!(surface.get_pixel(34, 5).unwrap()[1] > 0.0);
        assert_eq!(surface.get_pixel(20, 0).unwrap()[1], 0.0);
    }

    #[test]
    fn test_to_image_clamps() {
        let mut surface = FrameSurface::new(1, 1);
        surface.add_pixel(0, 0, [3.0, 0.5, 0.0], 1.0);
        let image = surface.to_image();
        assert_eq!(image.get_pixel(0, 0), &Rgba([255, 128, 0, 255]));
    }
}
