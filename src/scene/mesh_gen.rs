//! Procedural meshes for static scene geometry.

use std::f32::consts::{PI, TAU};

use crate::assets::MeshVertex;

/// Indexed triangle mesh with normals.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions and normals.
    pub vertices: Vec<MeshVertex>,
    /// Triangle list into `vertices`.
    pub indices: Vec<u32>,
}

impl MeshData {
    fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(corners.map(|position| MeshVertex { position, normal }));
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Axis-aligned box centred on the origin with flat-shaded faces.
pub fn box_mesh([sx, sy, sz]: [f32; 3]) -> MeshData {
    let (x, y, z) = (sx * 0.5, sy * 0.5, sz * 0.5);
    let mut mesh = MeshData::default();
    // counter-clockwise when viewed from outside
    mesh.push_quad([[x, -y, z], [x, -y, -z], [x, y, -z], [x, y, z]], [1.0, 0.0, 0.0]);
    mesh.push_quad([[-x, -y, -z], [-x, -y, z], [-x, y, z], [-x, y, -z]], [-1.0, 0.0, 0.0]);
    mesh.push_quad([[-x, y, z], [x, y, z], [x, y, -z], [-x, y, -z]], [0.0, 1.0, 0.0]);
    mesh.push_quad([[-x, -y, -z], [x, -y, -z], [x, -y, z], [-x, -y, z]], [0.0, -1.0, 0.0]);
    mesh.push_quad([[-x, -y, z], [x, -y, z], [x, y, z], [-x, y, z]], [0.0, 0.0, 1.0]);
    mesh.push_quad([[x, -y, -z], [-x, -y, -z], [-x, y, -z], [x, y, -z]], [0.0, 0.0, -1.0]);
    mesh
}

/// Horizontal plane in XZ facing +Y, `width` along X and `length` along Z.
pub fn ground_plane(width: f32, length: f32) -> MeshData {
    let (x, z) = (width * 0.5, length * 0.5);
    let mut mesh = MeshData::default();
    mesh.push_quad([[-x, 0.0, z], [x, 0.0, z], [x, 0.0, -z], [-x, 0.0, -z]], [0.0, 1.0, 0.0]);
    mesh
}

/// Unit quad in XY from -0.5 to 0.5, facing +Z.
pub fn unit_quad() -> MeshData {
    let mut mesh = MeshData::default();
    mesh.push_quad(
        [[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.5, 0.5, 0.0], [-0.5, 0.5, 0.0]],
        [0.0, 0.0, 1.0],
    );
    mesh
}

/// UV sphere centred on the origin.
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let w = width_segments.max(3);
    let h = height_segments.max(2);
    let mut mesh = MeshData::default();

    for iy in 0..=h {
        let theta = iy as f32 / h as f32 * PI;
        let (sin_t, cos_t) = theta.sin_cos();
        for ix in 0..=w {
            let phi = ix as f32 / w as f32 * TAU;
            let (sin_p, cos_p) = phi.sin_cos();
            let normal = [-cos_p * sin_t, cos_t, sin_p * sin_t];
            mesh.vertices.push(MeshVertex {
                position: normal.map(|c| c * radius),
                normal,
            });
        }
    }

    let row = w + 1;
    for iy in 0..h {
        for ix in 0..w {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn outward(mesh: &MeshData) -> bool {
        mesh.indices.chunks_exact(3).all(|t| {
            let [a, b, c] = [t[0], t[1], t[2]].map(|i| Vec3::from(mesh.vertices[i as usize].position));
            let n = Vec3::from(mesh.vertices[t[0] as usize].normal);
            (b - a).cross(c - a).dot(n) > 0.0
        })
    }

    #[test]
    fn box_has_six_outward_faces() {
        let mesh = box_mesh([200.0, 0.1, 200.0]);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert!(outward(&mesh));
        let top = mesh.vertices.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert!((top - 0.05).abs() < 1e-6);
    }

    #[test]
    fn planes_wind_towards_their_normal() {
        assert!(outward(&ground_plane(20.0, 400.0)));
        assert!(outward(&unit_quad()));
    }

    #[test]
    fn sphere_vertices_on_radius() {
        let mesh = uv_sphere(0.01, 8, 6);
        for v in &mesh.vertices {
            assert!((Vec3::from(v.position).length() - 0.01).abs() < 1e-6);
        }
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        // poles contribute one triangle per segment, other bands two
        assert_eq!(mesh.indices.len(), (8 * 2 + 8 * 2 * 4) * 3);
    }
}
