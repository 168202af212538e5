//! Instanced glowing spheres scattered over the model surface.

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::assets::MeshVertex;
use crate::error::LightwayError;
use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::gpu::pipeline_helpers::{depth_state, uniform_bind_group, uniform_layout};
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::options::ParticleOptions;
use crate::sampling::{ParticleField, DISTORTION_STRIDE, POSITION_STRIDE};
use crate::scene::mesh_gen::uv_sphere;

const SPHERE_SEGMENTS: (u32, u32) = (8, 6);

/// GPU mirror of the WGSL `ParticleUniform` struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleUniform {
    /// Model to world, matching the hidden solid model.
    pub model: [[f32; 4]; 4],
    /// Linear RGBA glow colour.
    pub color: [f32; 4],
}

const ORIGIN_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: (POSITION_STRIDE * size_of::<f32>()) as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Instance,
    attributes: &wgpu::vertex_attr_array![1 => Float32x3],
};

const DISTORTION_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: (DISTORTION_STRIDE * size_of::<f32>()) as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Instance,
    attributes: &wgpu::vertex_attr_array![2 => Float32x4],
};

/// Sphere positions only; the sphere normal is unused by the shader.
const SPHERE_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: size_of::<MeshVertex>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
};

/// Draws one small sphere per sampled surface point.
pub struct ParticleRenderer {
    pipeline: wgpu::RenderPipeline,
    sphere_vertices: wgpu::Buffer,
    sphere_indices: wgpu::Buffer,
    index_count: u32,
    origins: TypedBuffer<f32>,
    distortions: TypedBuffer<f32>,
    instance_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ParticleRenderer {
    /// Build the pipeline with an empty field.
    pub fn new(
        device: &wgpu::Device,
        composer: &mut ShaderComposer,
        format: wgpu::TextureFormat,
        globals_layout: &wgpu::BindGroupLayout,
        options: &ParticleOptions,
    ) -> Result<Self, LightwayError> {
        let shader = composer.compose(device, Shader::SurfaceParticles)?;

        let sphere = uv_sphere(options.radius, SPHERE_SEGMENTS.0, SPHERE_SEGMENTS.1);
        let sphere_vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Sphere Vertices"),
            contents: bytemuck::cast_slice(&sphere.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let sphere_indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Sphere Indices"),
            contents: bytemuck::cast_slice(&sphere.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Uniform"),
            contents: bytemuck::bytes_of(&ParticleUniform {
                model: Mat4::IDENTITY.to_cols_array_2d(),
                color: options.color.to_linear_rgba(1.0),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let layout = uniform_layout(
            device,
            "Particle Layout",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );
        let bind_group = uniform_bind_group(device, "Particle Bind Group", &layout, &uniform_buffer);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[globals_layout, &layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Particle Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[SPHERE_LAYOUT, ORIGIN_LAYOUT, DISTORTION_LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(depth_state(false)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let usage = wgpu::BufferUsages::VERTEX;
        Ok(Self {
            pipeline,
            sphere_vertices,
            sphere_indices,
            index_count: sphere.indices.len() as u32,
            origins: TypedBuffer::with_capacity(device, "Particle Origins", 0, usage),
            distortions: TypedBuffer::with_capacity(device, "Particle Distortions", 0, usage),
            instance_count: 0,
            uniform_buffer,
            bind_group,
        })
    }

    /// Upload a sampled field, placed by `transform`.
    pub fn set_field(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        field: &ParticleField,
        transform: Mat4,
        options: &ParticleOptions,
    ) {
        let _ = self.origins.write(device, queue, &field.positions);
        let _ = self.distortions.write(device, queue, &field.distortions);
        self.instance_count = field.instance_count();
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&ParticleUniform {
                model: transform.to_cols_array_2d(),
                color: options.color.to_linear_rgba(1.0),
            }),
        );
        log::info!("surface particles: {} instances", self.instance_count);
    }

    /// Stop drawing particles. Buffers are kept for the next field.
    pub fn clear(&mut self) {
        self.instance_count = 0;
        log::debug!("surface particles cleared");
    }

    /// Particles drawn per frame.
    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    /// Record the draw. Group 0 must already hold the globals.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.sphere_vertices.slice(..));
        pass.set_vertex_buffer(1, self.origins.slice());
        pass.set_vertex_buffer(2, self.distortions.slice());
        pass.set_index_buffer(self.sphere_indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..self.instance_count);
    }
}
