//! Loading overlay quad, alpha-blended over the final image.

use wgpu::util::DeviceExt;

use super::screen_pass::ScreenPass;
use crate::error::LightwayError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, uniform_bind_group, uniform_layout,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};

/// GPU mirror of the WGSL `OverlayUniform` struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OverlayUniform {
    /// rgb: tint, a: opacity.
    pub color: [f32; 4],
}

/// Full-screen tinted quad whose alpha follows the overlay opacity.
pub struct OverlayPass {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    opacity: f32,
}

impl OverlayPass {
    /// Starts fully opaque in `color`.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        color: [f32; 3],
    ) -> Result<Self, LightwayError> {
        let device = &context.device;
        let shader = composer.compose(device, Shader::Overlay)?;
        let [r, g, b] = color;
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Uniform"),
            contents: bytemuck::bytes_of(&OverlayUniform {
                color: [r, g, b, 1.0],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let layout = uniform_layout(device, "Overlay Layout", wgpu::ShaderStages::FRAGMENT);
        let bind_group = uniform_bind_group(device, "Overlay Bind Group", &layout, &uniform_buffer);
        let pipeline = create_screen_space_pipeline(
            device,
            "Overlay",
            &shader,
            context.format(),
            Some(wgpu::BlendState::ALPHA_BLENDING),
            &[&layout],
        );

        Ok(Self {
            pipeline,
            bind_group,
            uniform_buffer,
            opacity: 1.0,
        })
    }

    /// Set tint and opacity for the next frame.
    pub fn set_color(&mut self, queue: &wgpu::Queue, color: [f32; 3], opacity: f32) {
        let [r, g, b] = color;
        self.opacity = opacity.clamp(0.0, 1.0);
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&OverlayUniform {
                color: [r, g, b, self.opacity],
            }),
        );
    }
}

impl ScreenPass for OverlayPass {
    fn render(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            ..Default::default()
        });
        // hidden overlay keeps its pass but draws nothing
        if self.opacity <= 0.0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }

    fn resize(&mut self, _context: &RenderContext, _input: &wgpu::TextureView) {}
}
