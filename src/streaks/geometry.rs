//! Base tube mesh shared by every streak instance.

use std::f32::consts::TAU;

/// Segments along the tube axis.
pub const TUBULAR_SEGMENTS: u32 = 25;
/// Segments around the tube.
pub const RADIAL_SEGMENTS: u32 = 8;

/// Tube vertex: unit-radius position plus `(along, around)` texture
/// coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TubeVertex {
    /// Position on the unit tube from `z = 0` to `z = -1`.
    pub position: [f32; 3],
    /// `u` runs 0..1 along the tube, `v` 0..1 around it.
    pub uv: [f32; 2],
}

impl TubeVertex {
    /// Vertex buffer layout at shader locations 0 (position) and 1 (uv).
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> =
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2],
        };
}

/// Indexed open-ended tube along `(0,0,0) → (0,0,-1)` with radius 1.
#[derive(Debug, Clone)]
pub struct TubeMesh {
    /// `(TUBULAR_SEGMENTS + 1) * (RADIAL_SEGMENTS + 1)` vertices; the seam
    /// is duplicated so `v` reaches 1.
    pub vertices: Vec<TubeVertex>,
    /// Triangle list, two triangles per quad.
    pub indices: Vec<u32>,
}

/// Build the streak base tube.
pub fn unit_tube() -> TubeMesh {
    let rings = TUBULAR_SEGMENTS + 1;
    let ring_len = RADIAL_SEGMENTS + 1;

    let mut vertices = Vec::with_capacity((rings * ring_len) as usize);
    for i in 0..rings {
        let u = i as f32 / TUBULAR_SEGMENTS as f32;
        for j in 0..ring_len {
            let v = j as f32 / RADIAL_SEGMENTS as f32;
            let (sin, cos) = (v * TAU).sin_cos();
            vertices.push(TubeVertex {
                position: [cos, sin, -u],
                uv: [u, v],
            });
        }
    }

    let mut indices =
        Vec::with_capacity((TUBULAR_SEGMENTS * RADIAL_SEGMENTS * 6) as usize);
    for i in 1..rings {
        for j in 1..ring_len {
            let a = ring_len * (i - 1) + (j - 1);
            let b = ring_len * i + (j - 1);
            let c = ring_len * i + j;
            let d = ring_len * (i - 1) + j;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    TubeMesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_match_segments() {
        let tube = unit_tube();
        assert_eq!(tube.vertices.len(), 26 * 9);
        assert_eq!(tube.indices.len(), 25 * 8 * 6);
        let n = tube.vertices.len() as u32;
        assert!(tube.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn vertices_lie_on_unit_tube() {
        for v in unit_tube().vertices {
            let [x, y, z] = v.position;
            assert!(((x * x + y * y).sqrt() - 1.0).abs() < 1e-5);
            assert!((-1.0..=0.0).contains(&z));
            // u tracks depth along the axis
            assert!((v.uv[0] + z).abs() < 1e-6);
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
    }
}
