use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

use crate::error::LightwayError;

/// Shared WGSL modules, registered in dependency order.
const MODULES: &[(&str, &str)] = &[
    (
        include_str!("../../assets/shaders/modules/globals.wgsl"),
        "modules/globals.wgsl",
    ),
    (
        include_str!("../../assets/shaders/modules/math.wgsl"),
        "modules/math.wgsl",
    ),
    (
        include_str!("../../assets/shaders/modules/fog.wgsl"),
        "modules/fog.wgsl",
    ),
    (
        include_str!("../../assets/shaders/modules/lighting.wgsl"),
        "modules/lighting.wgsl",
    ),
    (
        include_str!("../../assets/shaders/modules/fullscreen.wgsl"),
        "modules/fullscreen.wgsl",
    ),
];

/// Every top-level shader the renderer builds a pipeline from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shader {
    /// Instanced scrolling tube segments.
    LightStreaks,
    /// Area-lit meshes (floor, road, model, light panels).
    LitMesh,
    /// Instanced spheres scattered over the model surface.
    SurfaceParticles,
    /// Noise and grid screen effects.
    Effects,
    /// Full-screen loading overlay.
    Overlay,
}

impl Shader {
    /// All shaders, in pipeline construction order.
    pub const ALL: [Self; 5] = [
        Self::LightStreaks,
        Self::LitMesh,
        Self::SurfaceParticles,
        Self::Effects,
        Self::Overlay,
    ];

    fn source(self) -> &'static str {
        match self {
            Self::LightStreaks => {
                include_str!("../../assets/shaders/raster/light_streaks.wgsl")
            }
            Self::LitMesh => {
                include_str!("../../assets/shaders/raster/lit_mesh.wgsl")
            }
            Self::SurfaceParticles => include_str!(
                "../../assets/shaders/raster/surface_particles.wgsl"
            ),
            Self::Effects => {
                include_str!("../../assets/shaders/screen/effects.wgsl")
            }
            Self::Overlay => {
                include_str!("../../assets/shaders/screen/overlay.wgsl")
            }
        }
    }

    fn file_path(self) -> &'static str {
        match self {
            Self::LightStreaks => "raster/light_streaks.wgsl",
            Self::LitMesh => "raster/lit_mesh.wgsl",
            Self::SurfaceParticles => "raster/surface_particles.wgsl",
            Self::Effects => "screen/effects.wgsl",
            Self::Overlay => "screen/overlay.wgsl",
        }
    }
}

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// The shared modules (`lightway::globals`, `math`, `fog`, `lighting`,
/// `fullscreen`) are registered once at construction. Top-level shaders
/// are composed into `naga::Module` IR directly, skipping a WGSL re-parse
/// inside wgpu.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Register all shared modules.
    ///
    /// # Errors
    ///
    /// Returns [`LightwayError::Shader`] if a module fails to parse.
    pub fn new() -> Result<Self, LightwayError> {
        let mut composer = Composer::default();
        for &(source, file_path) in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source,
                    file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    LightwayError::Shader(format!(
                        "failed to register module '{file_path}': {e}"
                    ))
                })?;
        }
        Ok(Self { composer })
    }

    /// Compose `shader` into a `wgpu::ShaderModule` ready for pipeline
    /// creation.
    ///
    /// # Errors
    ///
    /// Returns [`LightwayError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        shader: Shader,
    ) -> Result<wgpu::ShaderModule, LightwayError> {
        let module = self.compose_naga(shader)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(shader.file_path()),
            source: wgpu::ShaderSource::Naga(Cow::Owned(module)),
        }))
    }

    /// Compose `shader` into naga IR without touching the GPU.
    ///
    /// # Errors
    ///
    /// Returns [`LightwayError::Shader`] if composition fails.
    pub fn compose_naga(
        &mut self,
        shader: Shader,
    ) -> Result<naga::Module, LightwayError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source: shader.source(),
                file_path: shader.file_path(),
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                LightwayError::Shader(format!(
                    "failed to compose '{}': {e}",
                    shader.file_path()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for shader in Shader::ALL {
            let module = composer
                .compose_naga(shader)
                .unwrap_or_else(|e| panic!("{e}"));
            let entry_points: Vec<&str> = module
                .entry_points
                .iter()
                .map(|ep| ep.name.as_str())
                .collect();
            assert!(entry_points.contains(&"vs_main"), "{shader:?}");
            assert!(entry_points.contains(&"fs_main"), "{shader:?}");
        }
    }

    #[test]
    fn composed_modules_validate() {
        let mut composer = ShaderComposer::new().unwrap();
        for shader in Shader::ALL {
            let module = composer.compose_naga(shader).unwrap();
            let mut validator = naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::empty(),
            );
            assert!(validator.validate(&module).is_ok(), "{shader:?}");
        }
    }
}
