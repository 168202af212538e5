//! Rendering subsystems.
//!
//! [`SceneRenderer`] owns every pipeline: lit meshes, light streaks and
//! surface particles draw into an offscreen scene target, then the
//! post-processing chain writes the swapchain.

pub mod globals;
pub mod mesh;
pub mod particles;
pub mod postprocess;
pub mod streaks;

use glam::Mat4;

use self::globals::{GlobalsBinding, GlobalsUniform};
use self::mesh::{static_meshes, MeshRenderer};
use self::particles::ParticleRenderer;
use self::postprocess::effects::EffectParams;
use self::postprocess::post_process::PostProcessStack;
use self::streaks::StreakRenderer;
use crate::assets::ModelAsset;
use crate::error::LightwayError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::options::Options;
use crate::sampling::ParticleField;
use crate::scene::AreaLight;
use crate::streaks::StreakField;

/// Values that change every frame.
pub struct FrameInputs<'a> {
    /// Camera, time, fog and lights.
    pub globals: &'a GlobalsUniform,
    /// Screen effect parameters.
    pub effects: &'a EffectParams,
    /// Linear RGB tint of the loading overlay.
    pub overlay_color: [f32; 3],
    /// Overlay alpha in `[0, 1]`.
    pub overlay_opacity: f32,
}

/// All GPU pipelines and their resources.
pub struct SceneRenderer {
    globals: GlobalsBinding,
    meshes: MeshRenderer,
    streaks: StreakRenderer,
    particles: ParticleRenderer,
    post: PostProcessStack,
    clear_color: wgpu::Color,
}

impl SceneRenderer {
    /// Compose every shader and build every pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`LightwayError::Shader`] if any shader fails to compose.
    pub fn new(
        context: &RenderContext,
        options: &Options,
        streak_field: &StreakField,
        lights: &[AreaLight],
    ) -> Result<Self, LightwayError> {
        let mut composer = ShaderComposer::new()?;
        let device = &context.device;
        let format = context.format();

        let globals = GlobalsBinding::new(device);
        let mut meshes = MeshRenderer::new(device, &mut composer, format, &globals.layout)?;
        meshes.set_static(device, &static_meshes(&options.scene, lights));
        meshes.set_model_visible(!options.particles.enabled);

        let streaks = StreakRenderer::new(
            device,
            &context.queue,
            &mut composer,
            format,
            &globals.layout,
            streak_field,
            &options.streaks,
        )?;
        let particles = ParticleRenderer::new(
            device,
            &mut composer,
            format,
            &globals.layout,
            &options.particles,
        )?;
        let post = PostProcessStack::new(
            context,
            &mut composer,
            options.loading.color.to_linear(),
        )?;

        let [r, g, b] = options.scene.clear_color.to_linear();
        Ok(Self {
            globals,
            meshes,
            streaks,
            particles,
            post,
            clear_color: wgpu::Color {
                r: f64::from(r),
                g: f64::from(g),
                b: f64::from(b),
                a: 1.0,
            },
        })
    }

    /// Upload the loaded model.
    pub fn set_model(&mut self, device: &wgpu::Device, model: &ModelAsset, transform: Mat4) {
        self.meshes.set_model(device, model, transform);
    }

    /// Upload surface particles and hide the solid model.
    pub fn set_particles(
        &mut self,
        context: &RenderContext,
        field: &ParticleField,
        transform: Mat4,
        options: &Options,
    ) {
        self.particles
            .set_field(&context.device, &context.queue, field, transform, &options.particles);
        self.meshes.set_model_visible(false);
    }

    /// Drop the particle field. Model visibility follows
    /// [`apply_options`](Self::apply_options).
    pub fn clear_particles(&mut self) {
        self.particles.clear();
    }

    /// Push option changes that need no pipeline rebuild.
    pub fn apply_options(&mut self, queue: &wgpu::Queue, options: &Options) {
        self.streaks.apply_options(queue, &options.streaks);
        self.meshes.set_model_visible(!options.particles.enabled);
    }

    /// Replace the streak instance records after regeneration.
    pub fn set_streak_field(&mut self, context: &RenderContext, field: &StreakField) {
        self.streaks.set_field(&context.device, &context.queue, field);
    }

    /// Streak instances drawn per frame.
    pub fn streak_instances(&self) -> u32 {
        self.streaks.instance_count()
    }

    /// Recreate size-dependent targets after the surface was resized.
    pub fn resize(&mut self, context: &RenderContext) {
        self.post.resize(context);
    }

    /// Encode the scene pass and the post-processing chain into `target`.
    pub fn render(
        &mut self,
        context: &RenderContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        frame: &FrameInputs<'_>,
    ) {
        self.globals.write(&context.queue, frame.globals);
        self.post
            .overlay
            .set_color(&context.queue, frame.overlay_color, frame.overlay_opacity);

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.post.color_view(),
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.post.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_bind_group(0, &self.globals.bind_group, &[]);
            // opaque first, then blended geometry
            self.meshes.draw(&mut pass);
            self.streaks.draw(&mut pass);
            self.particles.draw(&mut pass);
        }

        self.post
            .render(encoder, &context.queue, frame.effects, target);
    }
}
