//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, growable buffers, shared
//! pipeline boilerplate, and WGSL shader composition.

/// Growable GPU buffers for late-arriving geometry.
pub mod dynamic_buffer;
/// Shared wgpu boilerplate helpers for layouts, targets and pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
