//! Area-lit and emissive meshes: floor slab, road, light panels and the
//! loaded model.

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::assets::{MeshVertex, ModelAsset};
use crate::error::LightwayError;
use crate::gpu::pipeline_helpers::{depth_state, uniform_bind_group, uniform_layout};
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::options::SceneOptions;
use crate::scene::mesh_gen::{box_mesh, ground_plane, unit_quad};
use crate::scene::{AreaLight, MeshData};

/// Surface response of one mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Linear RGBA.
    pub base_color: [f32; 4],
    /// 0 is mirror-like, 1 is fully diffuse.
    pub roughness: f32,
    /// Positive values draw `base_color * emissive` without lighting.
    pub emissive: f32,
}

/// GPU mirror of the WGSL `Material` struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// Model to world.
    pub model: [[f32; 4]; 4],
    /// Linear RGBA.
    pub base_color: [f32; 4],
    /// x: roughness, y: emissive strength.
    pub params: [f32; 4],
}

impl MaterialUniform {
    /// Pack a transform and material, clamping roughness to `[0, 1]`.
    pub fn new(transform: Mat4, material: &Material) -> Self {
        Self {
            model: transform.to_cols_array_2d(),
            base_color: material.base_color,
            params: [material.roughness.clamp(0.0, 1.0), material.emissive, 0.0, 0.0],
        }
    }
}

/// Decorative geometry placed from options.
#[derive(Debug, Clone)]
pub struct StaticMesh {
    /// Debug label for the GPU buffers.
    pub label: &'static str,
    /// Local-space geometry.
    pub mesh: MeshData,
    /// Local to world.
    pub transform: Mat4,
    /// Surface response.
    pub material: Material,
}

/// Floor, road and light panels for the configured scene.
pub fn static_meshes(scene: &SceneOptions, lights: &[AreaLight]) -> Vec<StaticMesh> {
    let mut meshes = Vec::new();

    if scene.floor.enabled {
        meshes.push(StaticMesh {
            label: "Floor",
            mesh: box_mesh(scene.floor.size),
            transform: Mat4::from_translation(Vec3::new(0.0, scene.floor.height, 0.0)),
            material: Material {
                base_color: scene.floor.color.to_linear_rgba(1.0),
                roughness: scene.floor.roughness,
                emissive: 0.0,
            },
        });
    }

    if scene.road.enabled {
        meshes.push(StaticMesh {
            label: "Road",
            mesh: ground_plane(scene.road.width, scene.road.length),
            transform: Mat4::from_translation(Vec3::new(0.0, scene.road.height, 0.0)),
            material: Material {
                base_color: scene.road.color.to_linear_rgba(1.0),
                roughness: 1.0,
                emissive: 1.0,
            },
        });
    }

    for light in lights.iter().filter(|l| l.show_panel) {
        let [r, g, b] = light.color;
        meshes.push(StaticMesh {
            label: "Light Panel",
            mesh: unit_quad(),
            transform: light.panel_transform(),
            material: Material {
                base_color: [r, g, b, 1.0],
                roughness: 1.0,
                emissive: 1.0,
            },
        });
    }

    meshes
}

struct MeshDraw {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
    bind_group: wgpu::BindGroup,
}

/// Draws lit meshes against the globals' area lights.
pub struct MeshRenderer {
    pipeline: wgpu::RenderPipeline,
    material_layout: wgpu::BindGroupLayout,
    static_draws: Vec<MeshDraw>,
    model_draws: Vec<MeshDraw>,
    model_visible: bool,
}

impl MeshRenderer {
    /// Build the lit-mesh pipeline with nothing to draw.
    pub fn new(
        device: &wgpu::Device,
        composer: &mut ShaderComposer,
        format: wgpu::TextureFormat,
        globals_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self, LightwayError> {
        let shader = composer.compose(device, Shader::LitMesh)?;
        let material_layout = uniform_layout(
            device,
            "Material Layout",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Lit Mesh Pipeline Layout"),
            bind_group_layouts: &[globals_layout, &material_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Lit Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_state(true)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            pipeline,
            material_layout,
            static_draws: Vec::new(),
            model_draws: Vec::new(),
            model_visible: true,
        })
    }

    fn upload(
        &self,
        device: &wgpu::Device,
        label: &str,
        vertices: &[MeshVertex],
        indices: &[u32],
        uniform: &MaterialUniform,
    ) -> Option<MeshDraw> {
        if vertices.is_empty() || indices.is_empty() {
            return None;
        }
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertices")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Indices")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Material")),
            contents: bytemuck::bytes_of(uniform),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = uniform_bind_group(
            device,
            &format!("{label} Material Bind Group"),
            &self.material_layout,
            &uniform_buffer,
        );
        Some(MeshDraw {
            vertices: vertex_buffer,
            indices: index_buffer,
            index_count: indices.len() as u32,
            bind_group,
        })
    }

    /// Replace the decorative geometry.
    pub fn set_static(&mut self, device: &wgpu::Device, meshes: &[StaticMesh]) {
        self.static_draws = meshes
            .iter()
            .filter_map(|m| {
                self.upload(
                    device,
                    m.label,
                    &m.mesh.vertices,
                    &m.mesh.indices,
                    &MaterialUniform::new(m.transform, &m.material),
                )
            })
            .collect();
    }

    /// Upload the loaded model, placed by `transform`.
    pub fn set_model(&mut self, device: &wgpu::Device, model: &ModelAsset, transform: Mat4) {
        self.model_draws = model
            .meshes
            .iter()
            .filter_map(|mesh| {
                let material = Material {
                    base_color: mesh.base_color,
                    roughness: mesh.roughness,
                    emissive: 0.0,
                };
                self.upload(
                    device,
                    "Model",
                    &mesh.vertices,
                    &mesh.indices,
                    &MaterialUniform::new(transform, &material),
                )
            })
            .collect();
        log::info!("model uploaded: {} draws", self.model_draws.len());
    }

    /// Hide the solid model, e.g. when particles replace it.
    pub fn set_model_visible(&mut self, visible: bool) {
        self.model_visible = visible;
    }

    /// Record the draws. Group 0 must already hold the globals.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let model = self.model_draws.iter().filter(|_| self.model_visible);
        let mut draws = self.static_draws.iter().chain(model).peekable();
        if draws.peek().is_none() {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        for draw in draws {
            pass.set_bind_group(1, &draw.bind_group, &[]);
            pass.set_vertex_buffer(0, draw.vertices.slice(..));
            pass.set_index_buffer(draw.indices.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..draw.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lights(scene: &SceneOptions) -> Vec<AreaLight> {
        scene.area_lights.iter().map(AreaLight::from_options).collect()
    }

    #[test]
    fn default_scene_has_floor_and_one_panel() {
        let scene = SceneOptions::default();
        let meshes = static_meshes(&scene, &lights(&scene));
        let labels: Vec<_> = meshes.iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["Floor", "Light Panel"]);

        let floor = &meshes[0];
        assert_eq!(floor.transform.w_axis.y, -7.0);
        assert_eq!(floor.material.roughness, 0.1);
        assert_eq!(floor.material.emissive, 0.0);
    }

    #[test]
    fn road_is_optional_and_unlit() {
        let mut scene = SceneOptions::default();
        scene.road.enabled = true;
        scene.floor.enabled = false;
        let meshes = static_meshes(&scene, &[]);
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].label, "Road");
        assert_eq!(meshes[0].transform.w_axis.y, -6.0);
        assert!(meshes[0].material.emissive > 0.0);
    }

    #[test]
    fn material_uniform_layout() {
        assert_eq!(size_of::<MaterialUniform>(), 96);
        let u = MaterialUniform::new(
            Mat4::IDENTITY,
            &Material {
                base_color: [1.0; 4],
                roughness: 3.0,
                emissive: 0.0,
            },
        );
        assert_eq!(u.params[0], 1.0);
    }
}
