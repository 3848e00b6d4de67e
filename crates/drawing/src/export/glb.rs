//! Binary glTF 2.0 (GLB) writer
//!
//! Layout: 12-byte header, a JSON chunk padded with spaces, and a BIN chunk
//! padded with zeros. Each exported mesh becomes one node under a single
//! root node, with its positions, normals and indices in their own buffer
//! views. Identical materials are shared.

use serde::Serialize;
use tracing::info;

use crate::mesh::{ExportMesh, Material};

use super::ExportError;

const GLB_MAGIC: u32 = 0x4654_6C67;
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

const COMPONENT_FLOAT: u32 = 5126;
const COMPONENT_UNSIGNED_INT: u32 = 5125;
const TARGET_ARRAY_BUFFER: u32 = 34962;
const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;
const MODE_TRIANGLES: u32 = 4;

const EMISSIVE_STRENGTH_EXT: &str = "KHR_materials_emissive_strength";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    asset: Asset,
    scene: usize,
    scenes: Vec<Scene>,
    nodes: Vec<Node>,
    meshes: Vec<Mesh>,
    materials: Vec<GltfMaterial>,
    accessors: Vec<Accessor>,
    buffer_views: Vec<BufferView>,
    buffers: Vec<Buffer>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extensions_used: Vec<&'static str>,
}

#[derive(Serialize)]
struct Asset {
    version: &'static str,
    generator: &'static str,
}

#[derive(Serialize)]
struct Scene {
    nodes: Vec<usize>,
}

#[derive(Serialize)]
struct Node {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mesh: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<usize>,
}

#[derive(Serialize)]
struct Mesh {
    name: String,
    primitives: Vec<Primitive>,
}

#[derive(Serialize)]
struct Primitive {
    attributes: Attributes,
    indices: usize,
    material: usize,
    mode: u32,
}

#[derive(Serialize)]
struct Attributes {
    #[serde(rename = "POSITION")]
    position: usize,
    #[serde(rename = "NORMAL")]
    normal: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GltfMaterial {
    pbr_metallic_roughness: Pbr,
    emissive_factor: [f32; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    extensions: Option<MaterialExtensions>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Pbr {
    base_color_factor: [f32; 4],
    metallic_factor: f32,
    roughness_factor: f32,
}

#[derive(Serialize)]
struct MaterialExtensions {
    #[serde(rename = "KHR_materials_emissive_strength")]
    emissive_strength: EmissiveStrength,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmissiveStrength {
    emissive_strength: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Accessor {
    buffer_view: usize,
    component_type: u32,
    count: usize,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<[f32; 3]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BufferView {
    buffer: usize,
    byte_offset: usize,
    byte_length: usize,
    target: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Buffer {
    byte_length: usize,
}

impl GltfMaterial {
    fn from_material(material: &Material) -> Self {
        let extensions = (material.emissive_intensity != 1.0).then(|| MaterialExtensions {
            emissive_strength: EmissiveStrength {
                emissive_strength: material.emissive_intensity,
            },
        });
        Self {
            pbr_metallic_roughness: Pbr {
                base_color_factor: [material.color.r, material.color.g, material.color.b, 1.0],
                metallic_factor: 0.0,
                roughness_factor: 1.0,
            },
            emissive_factor: material.emissive.to_array(),
            extensions,
        }
    }
}

/// Append `bytes` to the binary buffer as a new buffer view
fn push_view(bin: &mut Vec<u8>, views: &mut Vec<BufferView>, bytes: &[u8], target: u32) -> usize {
    let byte_offset = bin.len();
    bin.extend_from_slice(bytes);
    while bin.len() % 4 != 0 {
        bin.push(0);
    }
    views.push(BufferView {
        buffer: 0,
        byte_offset,
        byte_length: bytes.len(),
        target,
    });
    views.len() - 1
}

fn chunk_len(len: usize) -> Result<u32, ExportError> {
    u32::try_from(len).map_err(|_| ExportError::TooLarge(len))
}

/// Serialize meshes into a GLB byte blob.
///
/// Fails with [`ExportError::NothingToExport`] if there is no geometry.
pub fn write_glb(meshes: &[ExportMesh]) -> Result<Vec<u8>, ExportError> {
    if meshes.iter().all(|m| m.geometry.is_empty()) {
        return Err(ExportError::NothingToExport);
    }

    let mut bin = Vec::new();
    let mut buffer_views = Vec::new();
    let mut accessors = Vec::new();
    let mut gltf_meshes = Vec::new();
    let mut nodes = Vec::new();
    let mut materials: Vec<Material> = Vec::new();

    for mesh in meshes.iter().filter(|m| !m.geometry.is_empty()) {
        let geometry = &mesh.geometry;

        let material = match materials.iter().position(|m| *m == mesh.material) {
            Some(index) => index,
            None => {
                materials.push(mesh.material);
                materials.len() - 1
            }
        };

        let (min, max) = geometry
            .bounds()
            .ok_or(ExportError::NothingToExport)?;

        let view = push_view(
            &mut bin,
            &mut buffer_views,
            bytemuck::cast_slice(&geometry.positions),
            TARGET_ARRAY_BUFFER,
        );
        accessors.push(Accessor {
            buffer_view: view,
            component_type: COMPONENT_FLOAT,
            count: geometry.positions.len(),
            kind: "VEC3",
            min: Some(min.to_array()),
            max: Some(max.to_array()),
        });
        let position = accessors.len() - 1;

        let view = push_view(
            &mut bin,
            &mut buffer_views,
            bytemuck::cast_slice(&geometry.normals),
            TARGET_ARRAY_BUFFER,
        );
        accessors.push(Accessor {
            buffer_view: view,
            component_type: COMPONENT_FLOAT,
            count: geometry.normals.len(),
            kind: "VEC3",
            min: None,
            max: None,
        });
        let normal = accessors.len() - 1;

        let view = push_view(
            &mut bin,
            &mut buffer_views,
            bytemuck::cast_slice(&geometry.indices),
            TARGET_ELEMENT_ARRAY_BUFFER,
        );
        accessors.push(Accessor {
            buffer_view: view,
            component_type: COMPONENT_UNSIGNED_INT,
            count: geometry.indices.len(),
            kind: "SCALAR",
            min: None,
            max: None,
        });
        let indices = accessors.len() - 1;

        gltf_meshes.push(Mesh {
            name: mesh.name.clone(),
            primitives: vec![Primitive {
                attributes: Attributes { position, normal },
                indices,
                material,
                mode: MODE_TRIANGLES,
            }],
        });
        nodes.push(Node {
            name: mesh.name.clone(),
            mesh: Some(gltf_meshes.len() - 1),
            children: Vec::new(),
        });
    }

    let root = nodes.len();
    nodes.push(Node {
        name: "strokes".to_string(),
        mesh: None,
        children: (0..root).collect(),
    });

    let gltf_materials: Vec<GltfMaterial> =
        materials.iter().map(GltfMaterial::from_material).collect();
    let extensions_used = if gltf_materials.iter().any(|m| m.extensions.is_some()) {
        vec![EMISSIVE_STRENGTH_EXT]
    } else {
        Vec::new()
    };

    let document = Document {
        asset: Asset {
            version: "2.0",
            generator: "glowdraw",
        },
        scene: 0,
        scenes: vec![Scene { nodes: vec![root] }],
        nodes,
        meshes: gltf_meshes,
        materials: gltf_materials,
        accessors,
        buffer_views,
        buffers: vec![Buffer {
            byte_length: bin.len(),
        }],
        extensions_used,
    };

    let mut json = serde_json::to_vec(&document)?;
    while json.len() % 4 != 0 {
        json.push(b' ');
    }

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&chunk_len(total)?.to_le_bytes());
    out.extend_from_slice(&chunk_len(json.len())?.to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(&json);
    out.extend_from_slice(&chunk_len(bin.len())?.to_le_bytes());
    out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    out.extend_from_slice(&bin);

    info!(
        "Wrote GLB: {} mesh(es), {} material(s), {} bytes",
        root,
        materials.len(),
        out.len()
    );
    Ok(out)
}
