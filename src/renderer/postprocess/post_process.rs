use super::effects::{EffectParams, EffectsPass};
use super::overlay::OverlayPass;
use super::screen_pass::ScreenPass;
use crate::error::LightwayError;
use crate::gpu::pipeline_helpers::{render_target, DEPTH_FORMAT};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;

/// Owns the offscreen scene targets and the screen passes that turn them
/// into the final image.
pub(crate) struct PostProcessStack {
    _color_texture: wgpu::Texture,
    color_view: wgpu::TextureView,
    _depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    pub effects: EffectsPass,
    pub overlay: OverlayPass,
}

impl PostProcessStack {
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        overlay_color: [f32; 3],
    ) -> Result<Self, LightwayError> {
        let (color_texture, color_view) = Self::create_color_target(context);
        let (depth_texture, depth_view) = Self::create_depth_target(context);
        let effects = EffectsPass::new(context, composer, &color_view)?;
        let overlay = OverlayPass::new(context, composer, overlay_color)?;
        Ok(Self {
            _color_texture: color_texture,
            color_view,
            _depth_texture: depth_texture,
            depth_view,
            effects,
            overlay,
        })
    }

    /// Recreate all resolution-dependent resources.
    pub fn resize(&mut self, context: &RenderContext) {
        let (color_texture, color_view) = Self::create_color_target(context);
        let (depth_texture, depth_view) = Self::create_depth_target(context);
        self._color_texture = color_texture;
        self.color_view = color_view;
        self._depth_texture = depth_texture;
        self.depth_view = depth_view;
        self.effects.resize(context, &self.color_view);
        self.overlay.resize(context, &self.color_view);
    }

    /// Run effects → overlay into `final_view`.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        params: &EffectParams,
        final_view: &wgpu::TextureView,
    ) {
        self.effects.update(queue, params);
        self.effects.render(encoder, final_view);
        self.overlay.render(encoder, final_view);
    }

    /// Colour target for the scene pass.
    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    /// Depth target for the scene pass.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    fn create_color_target(context: &RenderContext) -> (wgpu::Texture, wgpu::TextureView) {
        render_target(&context.device, "Scene Color", context.format(), context.size())
    }

    fn create_depth_target(context: &RenderContext) -> (wgpu::Texture, wgpu::TextureView) {
        render_target(&context.device, "Scene Depth", DEPTH_FORMAT, context.size())
    }
}
