//! Pointer-to-surface mapping
//!
//! Pointer positions are turned into points on the drawing plane by casting
//! a camera ray. The ray caster is injected so the engine does not depend on
//! a particular rendering library; [`GroundPlane`] is the built-in caster for
//! the flat, square drawing surface.

use glam::{Vec2, Vec3};
use glowdraw_config::SurfaceConfig;

use crate::raycast::{Camera, Viewport, ray_triangle_intersection};
use crate::types::Point;

/// Maps a pointer in normalized device coordinates to a point on a surface
pub trait RayCaster {
    fn cast_ray(&self, pointer: Vec2, camera: &Camera) -> Option<Point>;
}

impl<F> RayCaster for F
where
    F: Fn(Vec2, &Camera) -> Option<Point>,
{
    fn cast_ray(&self, pointer: Vec2, camera: &Camera) -> Option<Point> {
        self(pointer, camera)
    }
}

/// Square plane lying on y = `height`, centered on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    pub size: f32,
    pub height: f32,
}

impl Default for GroundPlane {
    fn default() -> Self {
        Self::from_config(&SurfaceConfig::default())
    }
}

impl GroundPlane {
    pub fn new(size: f32) -> Self {
        Self { size, height: 0.0 }
    }

    pub fn from_config(config: &SurfaceConfig) -> Self {
        Self::new(config.size)
    }

    /// The plane as two triangles
    pub fn triangles(&self) -> [[Vec3; 3]; 2] {
        let h = self.size / 2.0;
        let y = self.height;
        let a = Vec3::new(-h, y, -h);
        let b = Vec3::new(h, y, -h);
        let c = Vec3::new(h, y, h);
        let d = Vec3::new(-h, y, h);
        [[a, d, c], [a, c, b]]
    }
}

impl RayCaster for GroundPlane {
    fn cast_ray(&self, pointer: Vec2, camera: &Camera) -> Option<Point> {
        let ray = camera.ray(pointer);
        self.triangles()
            .iter()
            .filter_map(|[v0, v1, v2]| ray_triangle_intersection(&ray, *v0, *v1, *v2))
            .min_by(|a, b| a.t.total_cmp(&b.t))
            .map(|hit| Point::from(ray.at(hit.t)))
    }
}

/// Converts raw pointer pixels into surface points.
///
/// Mapping is disabled while camera manipulation owns the pointer.
pub struct SurfaceMapper {
    caster: Box<dyn RayCaster>,
    camera: Camera,
    viewport: Viewport,
}

impl std::fmt::Debug for SurfaceMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceMapper")
            .field("camera", &self.camera)
            .field("viewport", &self.viewport)
            .finish()
    }
}

impl SurfaceMapper {
    pub fn new(caster: impl RayCaster + 'static, camera: Camera, viewport: Viewport) -> Self {
        Self {
            caster: Box::new(caster),
            camera,
            viewport,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Replace the camera, e.g. after the host orbited it
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Resize the viewport and keep the camera aspect in step
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.aspect = viewport.aspect();
    }

    /// Surface point under a pixel position, or `None` on a miss
    pub fn locate(&self, pixel: Vec2) -> Option<Point> {
        let ndc = self.viewport.to_ndc(pixel);
        self.caster.cast_ray(ndc, &self.camera)
    }

    /// Like [`locate`](Self::locate), but returns `None` while the camera is enabled
    pub fn map(&self, pixel: Vec2, camera_enabled: bool) -> Option<Point> {
        if camera_enabled {
            return None;
        }
        self.locate(pixel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> SurfaceMapper {
        let viewport = Viewport::new(800, 600);
        SurfaceMapper::new(
            GroundPlane::default(),
            Camera::default().with_aspect(viewport.aspect()),
            viewport,
        )
    }

    #[test]
    fn test_center_pixel_hits_origin() {
        let hit = mapper().locate(Vec2::new(400.0, 300.0)).unwrap();
        assert!(hit.to_vec3().length() < 1e-3);
    }

    #[test]
    fn test_hit_lies_on_plane() {
        let hit = mapper().locate(Vec2::new(120.0, 500.0)).unwrap();
        assert!(hit.y.abs() < 1e-4);
        assert!(hit.x < 0.0);
        // Screen bottom maps to +z for the top-down camera
        assert!(hit.z > 0.0);
    }

    #[test]
    fn test_miss_outside_plane() {
        let small = GroundPlane::new(1.0);
        let viewport = Viewport::new(800, 600);
        let mapper = SurfaceMapper::new(small, Camera::default(), viewport);
        assert!(mapper.locate(Vec2::new(5.0, 5.0)).is_none());
        assert!(mapper.locate(Vec2::new(400.0, 300.0)).is_some());
    }

    #[test]
    fn test_camera_enabled_disables_mapping() {
        let mapper = mapper();
        assert!(mapper.map(Vec2::new(400.0, 300.0), true).is_none());
        assert!(mapper.map(Vec2::new(400.0, 300.0), false).is_some());
    }

    #[test]
    fn test_closure_caster() {
        let viewport = Viewport::new(100, 100);
        let mapper = SurfaceMapper::new(
            |ndc: Vec2, _: &Camera| Some(Point::new(ndc.x, 0.0, ndc.y)),
            Camera::default(),
            viewport,
        );
        assert_eq!(mapper.locate(Vec2::new(100.0, 0.0)), Some(Point::new(1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_ray_parallel_to_plane_misses() {
        let camera = Camera {
            position: Vec3::new(0.0, 0.0, 10.0),
            rotation: glam::Quat::IDENTITY,
            ..Camera::default()
        };
        assert!(GroundPlane::default().cast_ray(Vec2::ZERO, &camera).is_none());
    }
}
