//! Noise and grid screen effects. Passes the scene through unchanged when
//! both are off.

use wgpu::util::DeviceExt;

use super::screen_pass::ScreenPass;
use crate::error::LightwayError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, filtering_sampler, linear_sampler, texture_2d,
    uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::options::PostProcessingOptions;

/// GPU mirror of the WGSL `EffectParams` struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct EffectParams {
    /// x: enabled, y: opacity, z: elapsed seconds.
    pub noise: [f32; 4],
    /// x: enabled, y: scale, z: line width.
    pub grid: [f32; 4],
    /// xy: target size in pixels.
    pub resolution: [f32; 4],
}

impl EffectParams {
    /// Pack options, time and target size.
    pub fn new(options: &PostProcessingOptions, elapsed: f32, (width, height): (u32, u32)) -> Self {
        let flag = |on: bool| if on { 1.0 } else { 0.0 };
        Self {
            noise: [flag(options.noise_enabled), options.noise_opacity, elapsed, 0.0],
            grid: [
                flag(options.grid_enabled),
                options.grid_scale,
                options.grid_line_width,
                0.0,
            ],
            resolution: [width as f32, height as f32, 0.0, 0.0],
        }
    }
}

/// Samples the scene target and writes the swapchain.
pub struct EffectsPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    params_buffer: wgpu::Buffer,
}

impl EffectsPass {
    /// Build the pass reading from `input`.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        input: &wgpu::TextureView,
    ) -> Result<Self, LightwayError> {
        let device = &context.device;
        let shader = composer.compose(device, Shader::Effects)?;
        let sampler = linear_sampler(device, "Effects Sampler");
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Effect Params"),
            contents: bytemuck::bytes_of(&EffectParams::new(
                &PostProcessingOptions::default(),
                0.0,
                context.size(),
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Effects Bind Group Layout"),
            entries: &[
                texture_2d(0),
                filtering_sampler(1),
                uniform_buffer(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let bind_group =
            Self::create_bind_group(device, &bind_group_layout, input, &sampler, &params_buffer);
        let pipeline = create_screen_space_pipeline(
            device,
            "Effects",
            &shader,
            context.format(),
            None,
            &[&bind_group_layout],
        );

        Ok(Self {
            pipeline,
            bind_group_layout,
            bind_group,
            sampler,
            params_buffer,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        input: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        params: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Effects Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(input),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: params.as_entire_binding(),
                },
            ],
        })
    }

    /// Upload this frame's effect parameters.
    pub fn update(&self, queue: &wgpu::Queue, params: &EffectParams) {
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(params));
    }
}

impl ScreenPass for EffectsPass {
    fn render(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Effects Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            ..Default::default()
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }

    fn resize(&mut self, context: &RenderContext, input: &wgpu::TextureView) {
        self.bind_group = Self::create_bind_group(
            &context.device,
            &self.bind_group_layout,
            input,
            &self.sampler,
            &self.params_buffer,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_both_effects() {
        let p = EffectParams::new(&PostProcessingOptions::default(), 1.0, (800, 600));
        assert_eq!(p.noise[0], 0.0);
        assert_eq!(p.grid[0], 0.0);
        assert_eq!(p.noise[1], 0.01);
        assert_eq!(p.grid[1], 1.5);
        assert_eq!(p.resolution, [800.0, 600.0, 0.0, 0.0]);
        assert_eq!(size_of::<EffectParams>(), 48);
    }
}
