//! Instanced light-streak tubes scrolling along the corridor.

use wgpu::util::DeviceExt;

use crate::error::LightwayError;
use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::gpu::pipeline_helpers::{depth_state, uniform_bind_group, uniform_layout};
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::options::StreakOptions;
use crate::streaks::geometry::{unit_tube, TubeVertex};
use crate::streaks::{StreakField, METRICS_STRIDE, OFFSET_STRIDE};

/// GPU mirror of the WGSL `StreakUniform` struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StreakUniform {
    /// Linear RGBA streak colour.
    pub color: [f32; 4],
    /// x, y: alpha fade range; z: speed; w: travel length.
    pub motion: [f32; 4],
}

impl From<&StreakOptions> for StreakUniform {
    fn from(options: &StreakOptions) -> Self {
        Self {
            color: options.color.to_linear_rgba(1.0),
            motion: [
                options.fade_start,
                options.fade_end,
                options.speed,
                options.travel_length,
            ],
        }
    }
}

const OFFSET_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: (OFFSET_STRIDE * size_of::<f32>()) as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Instance,
    attributes: &wgpu::vertex_attr_array![2 => Float32x3],
};

const METRICS_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: (METRICS_STRIDE * size_of::<f32>()) as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Instance,
    attributes: &wgpu::vertex_attr_array![3 => Float32x2],
};

/// Draws every record of a [`StreakField`] as one instanced tube.
pub struct StreakRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    offsets: TypedBuffer<f32>,
    metrics: TypedBuffer<f32>,
    instance_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl StreakRenderer {
    /// Build the pipeline and upload `field`.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        composer: &mut ShaderComposer,
        format: wgpu::TextureFormat,
        globals_layout: &wgpu::BindGroupLayout,
        field: &StreakField,
        options: &StreakOptions,
    ) -> Result<Self, LightwayError> {
        let shader = composer.compose(device, Shader::LightStreaks)?;

        let tube = unit_tube();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Streak Tube Vertices"),
            contents: bytemuck::cast_slice(&tube.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Streak Tube Indices"),
            contents: bytemuck::cast_slice(&tube.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Streak Uniform"),
            contents: bytemuck::bytes_of(&StreakUniform::from(options)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let layout = uniform_layout(
            device,
            "Streak Layout",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );
        let bind_group = uniform_bind_group(device, "Streak Bind Group", &layout, &uniform_buffer);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Streak Pipeline Layout"),
            bind_group_layouts: &[globals_layout, &layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Streak Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[TubeVertex::LAYOUT, OFFSET_LAYOUT, METRICS_LAYOUT],
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
            // tubes are seen from inside and outside
            primitive: wgpu::PrimitiveState {
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_state(false)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let usage = wgpu::BufferUsages::VERTEX;
        let mut offsets = TypedBuffer::with_capacity(device, "Streak Offsets", field.offsets().len(), usage);
        let mut metrics = TypedBuffer::with_capacity(device, "Streak Metrics", field.metrics().len(), usage);
        let _ = offsets.write(device, queue, field.offsets());
        let _ = metrics.write(device, queue, field.metrics());

        log::info!("streak field: {} instances", field.instance_count());
        Ok(Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: tube.indices.len() as u32,
            offsets,
            metrics,
            instance_count: field.instance_count(),
            uniform_buffer,
            bind_group,
        })
    }

    /// Push colour, fade and motion changes.
    pub fn apply_options(&self, queue: &wgpu::Queue, options: &StreakOptions) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&StreakUniform::from(options)),
        );
    }

    /// Replace the instance records.
    pub fn set_field(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, field: &StreakField) {
        let _ = self.offsets.write(device, queue, field.offsets());
        let _ = self.metrics.write(device, queue, field.metrics());
        self.instance_count = field.instance_count();
    }

    /// Instances drawn per frame.
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
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.offsets.slice());
        pass.set_vertex_buffer(2, self.metrics.slice());
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..self.instance_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_packs_motion() {
        let u = StreakUniform::from(&StreakOptions::default());
        assert_eq!(u.motion, [0.0, 0.6, 50.0, 200.0]);
        assert_eq!(u.color[3], 1.0);
        assert_eq!(size_of::<StreakUniform>(), 32);
    }

    #[test]
    fn instance_layouts_match_strides() {
        assert_eq!(OFFSET_LAYOUT.array_stride, 12);
        assert_eq!(METRICS_LAYOUT.array_stride, 8);
    }
}
