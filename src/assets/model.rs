//! Binary glTF decoding into flat triangle meshes.

use base64::Engine;
use glam::{Mat3, Mat4, Vec3};
use gltf::Gltf;

use super::LoadError;

const DRACO_EXTENSION: &str = "KHR_draco_mesh_compression";

/// Lit mesh vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Unit world-space normal.
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Vertex buffer layout at shader locations 0 (position) and 1 (normal).
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> =
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
        };
}

/// One triangle primitive with node transforms applied.
#[derive(Debug, Clone)]
pub struct ModelMesh {
    /// Transformed vertices.
    pub vertices: Vec<MeshVertex>,
    /// Triangle list into `vertices`.
    pub indices: Vec<u32>,
    /// Linear RGBA from the primitive's PBR material.
    pub base_color: [f32; 4],
    /// PBR roughness factor.
    pub roughness: f32,
}

/// Every triangle primitive reachable from the document's scene.
#[derive(Debug, Clone, Default)]
pub struct ModelAsset {
    /// One entry per triangle primitive.
    pub meshes: Vec<ModelMesh>,
}

impl ModelAsset {
    /// Total triangles across all meshes.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len() / 3).sum()
    }

    /// All meshes merged into one position/index list, offset by
    /// `translation`.
    pub fn merged_surface(&self, translation: Vec3) -> (Vec<[f32; 3]>, Vec<u32>) {
        let mut positions = Vec::new();
        let mut indices = Vec::new();
        for mesh in &self.meshes {
            let base = positions.len() as u32;
            positions.extend(
                mesh.vertices
                    .iter()
                    .map(|v| (Vec3::from(v.position) + translation).to_array()),
            );
            indices.extend(mesh.indices.iter().map(|i| base + i));
        }
        (positions, indices)
    }
}

/// Decode a glTF or GLB document whose buffers are embedded.
pub fn parse_model(bytes: &[u8]) -> Result<ModelAsset, LoadError> {
    let gltf = match Gltf::from_slice(bytes) {
        Ok(gltf) => gltf,
        Err(e) => {
            // validation also rejects unknown required extensions; name them
            if let Ok(raw) = Gltf::from_slice_without_validation(bytes) {
                reject_required_extensions(&raw)?;
            }
            return Err(LoadError::Parse(e.to_string()));
        }
    };
    reject_required_extensions(&gltf)?;

    let buffers = load_buffers(&gltf)?;
    let mut asset = ModelAsset::default();

    let scene = gltf.default_scene().or_else(|| gltf.scenes().next());
    match scene {
        Some(scene) => {
            for node in scene.nodes() {
                visit_node(&node, Mat4::IDENTITY, &buffers, &mut asset)?;
            }
        }
        None => {
            for mesh in gltf.meshes() {
                append_mesh(&mesh, Mat4::IDENTITY, &buffers, &mut asset)?;
            }
        }
    }

    if asset.meshes.is_empty() {
        return Err(LoadError::MissingGeometry);
    }
    log::info!(
        "model decoded: {} meshes, {} triangles",
        asset.meshes.len(),
        asset.triangle_count()
    );
    Ok(asset)
}

fn reject_required_extensions(gltf: &Gltf) -> Result<(), LoadError> {
    match gltf.extensions_required().find(|ext| *ext == DRACO_EXTENSION) {
        Some(ext) => Err(LoadError::UnsupportedExtension(ext.to_owned())),
        None => Ok(()),
    }
}

fn load_buffers(gltf: &Gltf) -> Result<Vec<Vec<u8>>, LoadError> {
    gltf.buffers()
        .map(|buffer| match buffer.source() {
            gltf::buffer::Source::Bin => gltf
                .blob
                .clone()
                .ok_or_else(|| LoadError::Parse("GLB binary chunk is missing".to_owned())),
            gltf::buffer::Source::Uri(uri) => decode_data_uri(uri),
        })
        .collect()
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>, LoadError> {
    let payload = uri
        .strip_prefix("data:application/octet-stream;base64,")
        .or_else(|| uri.strip_prefix("data:application/gltf-buffer;base64,"))
        .ok_or_else(|| {
            LoadError::Parse(format!("external buffer {uri:?} is not supported"))
        })?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| LoadError::Parse(format!("bad data URI: {e}")))
}

fn visit_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[Vec<u8>],
    asset: &mut ModelAsset,
) -> Result<(), LoadError> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        append_mesh(&mesh, world, buffers, asset)?;
    }
    for child in node.children() {
        visit_node(&child, world, buffers, asset)?;
    }
    Ok(())
}

fn append_mesh(
    mesh: &gltf::Mesh<'_>,
    transform: Mat4,
    buffers: &[Vec<u8>],
    asset: &mut ModelAsset,
) -> Result<(), LoadError> {
    let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "skipping {:?} primitive in mesh {:?}",
                primitive.mode(),
                mesh.name()
            );
            continue;
        }
        let reader = primitive.reader(|b| buffers.get(b.index()).map(Vec::as_slice));
        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let positions: Vec<Vec3> = positions
            .map(|p| transform.transform_point3(Vec3::from(p)))
            .collect();
        if positions.is_empty() {
            continue;
        }

        let indices: Vec<u32> = match reader.read_indices() {
            Some(iter) => iter.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };
        let vertex_count = positions.len() as u32;
        if indices.iter().any(|&i| i >= vertex_count) {
            return Err(LoadError::Parse(format!(
                "mesh {:?} indexes past its {vertex_count} vertices",
                mesh.name()
            )));
        }

        let normals: Vec<Vec3> = match reader.read_normals() {
            Some(iter) => iter
                .map(|n| (normal_matrix * Vec3::from(n)).normalize_or_zero())
                .collect(),
            None => face_weighted_normals(&positions, &indices),
        };
        if normals.len() != positions.len() {
            return Err(LoadError::Parse(format!(
                "mesh {:?} has {} normals for {vertex_count} vertices",
                mesh.name(),
                normals.len()
            )));
        }

        let pbr = primitive.material().pbr_metallic_roughness();
        asset.meshes.push(ModelMesh {
            vertices: positions
                .iter()
                .zip(&normals)
                .map(|(p, n)| MeshVertex {
                    position: p.to_array(),
                    normal: n.to_array(),
                })
                .collect(),
            indices,
            base_color: pbr.base_color_factor(),
            roughness: pbr.roughness_factor(),
        });
    }
    Ok(())
}

/// Vertex normals from area-weighted face normals.
fn face_weighted_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals.iter().map(|n| n.normalize_or(Vec3::Y)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_gltf(extra: &str) -> Vec<u8> {
        let floats: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let data =
            base64::engine::general_purpose::STANDARD.encode(bytemuck::cast_slice(&floats));
        format!(
            r#"{{
              "asset": {{ "version": "2.0" }},
              {extra}
              "scene": 0,
              "scenes": [{{ "nodes": [0] }}],
              "nodes": [{{ "children": [1], "translation": [0, 2, 0] }}, {{ "mesh": 0 }}],
              "meshes": [{{ "primitives": [{{ "attributes": {{ "POSITION": 0 }} }}] }}],
              "buffers": [{{ "byteLength": 36, "uri": "data:application/octet-stream;base64,{data}" }}],
              "bufferViews": [{{ "buffer": 0, "byteLength": 36 }}],
              "accessors": [{{
                "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [0, 0, 0], "max": [1, 1, 0]
              }}]
            }}"#
        )
        .into_bytes()
    }

    #[test]
    fn decodes_embedded_triangle_with_node_transform() {
        let asset = parse_model(&triangle_gltf("")).unwrap();
        assert_eq!(asset.meshes.len(), 1);
        assert_eq!(asset.triangle_count(), 1);

        let mesh = &asset.meshes[0];
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[1].position, [1.0, 2.0, 0.0]);
        // generated normals face +Z for a counter-clockwise XY triangle
        for v in &mesh.vertices {
            assert!((Vec3::from(v.normal) - Vec3::Z).length() < 1e-6);
        }
        assert_eq!(mesh.base_color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn merged_surface_applies_offset() {
        let asset = parse_model(&triangle_gltf("")).unwrap();
        let (positions, indices) = asset.merged_surface(Vec3::new(0.0, -9.0, 0.0));
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(positions[2], [0.0, -6.0, 0.0]);
    }

    #[test]
    fn draco_is_reported_as_unsupported() {
        let bytes = triangle_gltf(
            r#""extensionsUsed": ["KHR_draco_mesh_compression"],
               "extensionsRequired": ["KHR_draco_mesh_compression"],"#,
        );
        match parse_model(&bytes) {
            Err(LoadError::UnsupportedExtension(ext)) => assert_eq!(ext, DRACO_EXTENSION),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn short_normal_accessor_is_rejected() {
        let floats: [f32; 15] = [
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, // positions
            0.0, 0.0, 1.0, 0.0, 0.0, 1.0, // two normals
        ];
        let data =
            base64::engine::general_purpose::STANDARD.encode(bytemuck::cast_slice(&floats));
        let doc = format!(
            r#"{{
              "asset": {{ "version": "2.0" }},
              "meshes": [{{ "primitives": [{{ "attributes": {{ "POSITION": 0, "NORMAL": 1 }} }}] }}],
              "buffers": [{{ "byteLength": 60, "uri": "data:application/octet-stream;base64,{data}" }}],
              "bufferViews": [
                {{ "buffer": 0, "byteLength": 36 }},
                {{ "buffer": 0, "byteOffset": 36, "byteLength": 24 }}
              ],
              "accessors": [
                {{
                  "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                  "min": [0, 0, 0], "max": [1, 1, 0]
                }},
                {{ "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" }}
              ]
            }}"#
        );
        assert!(matches!(parse_model(doc.as_bytes()), Err(LoadError::Parse(_))));
    }

    #[test]
    fn empty_document_has_no_geometry() {
        let result = parse_model(br#"{ "asset": { "version": "2.0" } }"#);
        assert!(matches!(result, Err(LoadError::MissingGeometry)));
    }

    #[test]
    fn face_normals_are_unit_length() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Z];
        let normals = face_weighted_normals(&positions, &[0, 1, 2]);
        for n in normals {
            assert!((n.length() - 1.0).abs() < 1e-6);
            assert!((n - Vec3::NEG_Y).length() < 1e-6);
        }
    }
}
