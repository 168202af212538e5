//! Shared interface of full-screen passes.

use crate::gpu::render_context::RenderContext;

/// Uniform interface for fullscreen post-processing passes.
pub trait ScreenPass {
    /// Encode GPU commands for this pass, writing `target`.
    fn render(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView);
    /// Recreate resolution-dependent resources. `input` is the freshly
    /// resized scene colour view.
    fn resize(&mut self, context: &RenderContext, input: &wgpu::TextureView);
}
