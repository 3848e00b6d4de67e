//! Stroke mesh synthesis
//!
//! Display geometry decomposes each stroke into one cylinder per consecutive
//! point pair plus a thin line overlay. Every segment shares a single
//! unit-height cylinder; the segment's transform scales it to length, turns
//! it to face along the pair and places it at the pair's midpoint.
//!
//! Export geometry is produced from display meshes by baking the world
//! transform into a private copy of the vertices and recomputing normals.

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};
use glowdraw_config::{SegmentConfig, SurfaceConfig};
use tracing::debug;

use crate::types::{Point, Rgb, Stroke};

/// Indexed triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshGeometry {
    /// Closed cylinder around the y axis, centered on the origin.
    ///
    /// Side vertices are duplicated at the seam and caps get their own
    /// vertices so smooth normals stay within each face group.
    pub fn cylinder(radius: f32, height: f32, radial_segments: u32) -> Self {
        let segments = radial_segments.max(3);
        let half = height / 2.0;
        let mut mesh = Self::default();

        // Side: row 0 on top, row 1 on the bottom
        for row in 0..2u32 {
            let y = if row == 0 { half } else { -half };
            for x in 0..=segments {
                let theta = x as f32 / segments as f32 * TAU;
                let (sin, cos) = theta.sin_cos();
                mesh.positions.push([radius * sin, y, radius * cos]);
                mesh.normals.push([sin, 0.0, cos]);
            }
        }
        let stride = segments + 1;
        for x in 0..segments {
            let a = x;
            let b = stride + x;
            let c = stride + x + 1;
            let d = x + 1;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        mesh.push_cap(radius, half, segments, true);
        mesh.push_cap(radius, -half, segments, false);
        mesh
    }

    fn push_cap(&mut self, radius: f32, y: f32, segments: u32, top: bool) {
        let normal = if top { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };

        let center_start = self.positions.len() as u32;
        for _ in 0..segments {
            self.positions.push([0.0, y, 0.0]);
            self.normals.push(normal);
        }

        let ring_start = self.positions.len() as u32;
        for x in 0..=segments {
            let theta = x as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            self.positions.push([radius * sin, y, radius * cos]);
            self.normals.push(normal);
        }

        for x in 0..segments {
            let c = center_start + x;
            let i = ring_start + x;
            if top {
                self.indices.extend_from_slice(&[i, i + 1, c]);
            } else {
                self.indices.extend_from_slice(&[i + 1, i, c]);
            }
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Copy of this mesh with `transform` applied to every position.
    ///
    /// Normals are recomputed from the transformed triangles.
    pub fn transformed(&self, transform: &Mat4) -> Self {
        let positions = self
            .positions
            .iter()
            .map(|&p| transform.transform_point3(Vec3::from_array(p)).to_array())
            .collect();
        let mut mesh = Self {
            positions,
            normals: Vec::new(),
            indices: self.indices.clone(),
        };
        mesh.compute_vertex_normals();
        mesh
    }

    /// Area-weighted smooth normals from the triangle list
    pub fn compute_vertex_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.positions.len()];

        for tri in self.indices.chunks_exact(3) {
            let [ia, ib, ic] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let a = Vec3::from_array(self.positions[ia]);
            let b = Vec3::from_array(self.positions[ib]);
            let c = Vec3::from_array(self.positions[ic]);
            let face = (c - b).cross(a - b);
            accum[ia] += face;
            accum[ib] += face;
            accum[ic] += face;
        }

        self.normals = accum
            .into_iter()
            .map(|n| n.normalize_or_zero().to_array())
            .collect();
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.positions.iter().map(|&p| Vec3::from_array(p));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

/// Surface appearance of a stroke segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Rgb,
    pub emissive: Rgb,
    pub emissive_intensity: f32,
}

/// One displayed cylinder segment
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentMesh {
    /// Shared local geometry
    pub geometry: Arc<MeshGeometry>,
    /// Local-to-world transform
    pub transform: Mat4,
    pub material: Material,
    /// Index of the owning stroke in the collection
    pub stroke: usize,
    /// Index of the segment within its stroke
    pub segment: usize,
}

impl SegmentMesh {
    pub fn name(&self) -> String {
        format!("stroke-{}-segment-{}", self.stroke, self.segment)
    }
}

/// Flat line overlay: two vertices per segment, one color per vertex
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineBuffer {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

impl LineBuffer {
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }
}

/// Everything needed to display the current strokes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeGeometry {
    pub segments: Vec<SegmentMesh>,
    pub lines: LineBuffer,
}

impl StrokeGeometry {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Every display mesh, in stroke then segment order
    pub fn meshes(&self) -> &[SegmentMesh] {
        &self.segments
    }
}

/// A mesh ready for interchange export, with its world transform baked in
#[derive(Debug, Clone, PartialEq)]
pub struct ExportMesh {
    pub name: String,
    pub geometry: MeshGeometry,
    pub material: Material,
}

/// Builds display geometry from strokes
#[derive(Debug, Clone)]
pub struct MeshSynthesizer {
    config: SegmentConfig,
    hover_height: f32,
    unit: Arc<MeshGeometry>,
}

impl Default for MeshSynthesizer {
    fn default() -> Self {
        Self::new(SegmentConfig::default(), &SurfaceConfig::default())
    }
}

impl MeshSynthesizer {
    pub fn new(config: SegmentConfig, surface: &SurfaceConfig) -> Self {
        let unit = Arc::new(MeshGeometry::cylinder(
            config.radius,
            1.0,
            config.radial_segments,
        ));
        Self {
            config,
            hover_height: surface.hover_height,
            unit,
        }
    }

    /// Shared unit-height cylinder used by every segment
    pub fn unit_cylinder(&self) -> &Arc<MeshGeometry> {
        &self.unit
    }

    /// Transform for the segment joining `a` and `b`.
    ///
    /// Only the planar direction is used; the segment sits at the configured
    /// height above the plane.
    pub fn segment_transform(&self, a: &Point, b: &Point) -> Mat4 {
        let delta = Vec3::new(b.x - a.x, 0.0, b.z - a.z);
        let length = delta.length();
        let rotation = if length > f32::EPSILON {
            Quat::from_rotation_arc(Vec3::Y, delta / length)
        } else {
            Quat::IDENTITY
        };
        let center = Vec3::new((a.x + b.x) / 2.0, self.config.height, (a.z + b.z) / 2.0);
        Mat4::from_scale_rotation_translation(Vec3::new(1.0, length, 1.0), rotation, center)
    }

    pub fn material(&self, color: Rgb) -> Material {
        Material {
            color,
            emissive: color,
            emissive_intensity: self.config.emissive_intensity,
        }
    }

    /// Build display geometry for every stroke with at least two points
    pub fn synthesize(&self, strokes: &[Arc<Stroke>]) -> StrokeGeometry {
        let mut geometry = StrokeGeometry::default();

        for (stroke_index, stroke) in strokes.iter().enumerate() {
            if stroke.len() < 2 {
                continue;
            }
            let material = self.material(stroke.color());
            let color = stroke.color().to_array();

            for (segment_index, (a, b)) in stroke.segments().enumerate() {
                geometry.segments.push(SegmentMesh {
                    geometry: Arc::clone(&self.unit),
                    transform: self.segment_transform(&a, &b),
                    material,
                    stroke: stroke_index,
                    segment: segment_index,
                });

                geometry.lines.positions.push([a.x, self.hover_height, a.z]);
                geometry.lines.positions.push([b.x, self.hover_height, b.z]);
                geometry.lines.colors.push(color);
                geometry.lines.colors.push(color);
            }
        }

        debug!(
            "Synthesized {} segment(s) from {} stroke(s)",
            geometry.segments.len(),
            strokes.len()
        );
        geometry
    }
}

/// Bake display meshes into standalone export meshes.
///
/// The display meshes are left untouched.
pub fn bake_for_export(meshes: &[SegmentMesh]) -> Vec<ExportMesh> {
    meshes
        .iter()
        .map(|mesh| ExportMesh {
            name: mesh.name(),
            geometry: mesh.geometry.transformed(&mesh.transform),
            material: mesh.material,
        })
        .collect()
}
