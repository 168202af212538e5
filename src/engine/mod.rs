//! Scene bootstrap and per-frame driver.
//!
//! [`SceneEngine`] owns the render surface, the renderer, the orbit camera
//! and the loading overlay. Hosts create it once, forward input and resize
//! events, and call [`SceneEngine::frame`] once per display refresh until
//! their [`StopToken`](crate::StopToken) fires.

mod input;
mod loading;

use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::assets::{LoadTracker, ModelAsset, PendingLoad};
use crate::camera::controller::CameraController;
use crate::error::LightwayError;
use crate::frame_loop::FrameClock;
use crate::gpu::render_context::RenderContext;
use crate::input::InputProcessor;
use crate::options::{Options, ParticleOptions};
use crate::overlay::LoadingOverlay;
use crate::renderer::globals::{Fog, GlobalsUniform};
use crate::renderer::postprocess::effects::EffectParams;
use crate::renderer::{FrameInputs, SceneRenderer};
use crate::scene::AreaLight;
use crate::streaks::{generate_streak_field, StreakField};
use crate::util::frame_timing::FrameTiming;
use crate::viewport::Viewport;

/// Seeded generator, or one seeded from the OS when `seed` is `None`.
fn seeded_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

/// Generate the streak field described by `options`.
fn build_streak_field(options: &Options) -> Result<StreakField, LightwayError> {
    let mut rng = seeded_rng(options.streaks.seed);
    Ok(generate_streak_field(&options.streaks.params(), &mut rng)?)
}

/// Scene fog for the current options.
fn scene_fog(options: &Options) -> Fog {
    let (near, far) = options.fog_range();
    Fog {
        enabled: options.scene.fog.enabled,
        color: options.scene.fog.color.to_linear(),
        near,
        far,
    }
}

/// World transform applied to the loaded model.
fn model_transform(options: &Options) -> Mat4 {
    Mat4::from_translation(Vec3::from_array(options.model.offset))
}

/// Overlay tint in linear RGB.
fn overlay_tint(overlay: &LoadingOverlay, options: &Options) -> [f32; 3] {
    if overlay.is_failed() {
        options.loading.error_color.to_linear()
    } else {
        options.loading.color.to_linear()
    }
}

/// What an options change means for the particle field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParticleUpdate {
    Keep,
    Respawn,
    Clear,
}

fn particle_update(old: &ParticleOptions, new: &ParticleOptions) -> ParticleUpdate {
    let resampled = old.count != new.count || old.seed != new.seed || old.color != new.color;
    match (old.enabled, new.enabled) {
        (true, false) => ParticleUpdate::Clear,
        (false, true) => ParticleUpdate::Respawn,
        (true, true) if resampled => ParticleUpdate::Respawn,
        _ => ParticleUpdate::Keep,
    }
}

/// Owns every runtime piece of the scene.
pub struct SceneEngine {
    context: RenderContext,
    renderer: SceneRenderer,
    camera: CameraController,
    input: InputProcessor,
    overlay: LoadingOverlay,
    tracker: LoadTracker,
    pending_model: Option<PendingLoad<ModelAsset>>,
    model: Option<ModelAsset>,
    lights: Vec<AreaLight>,
    options: Options,
    viewport: Viewport,
    clock: FrameClock,
    frame_timing: FrameTiming,
}

impl SceneEngine {
    /// Build the scene for `target` and start loading the configured
    /// model.
    ///
    /// # Errors
    ///
    /// Returns [`LightwayError`] if GPU initialisation fails, a shader
    /// fails to compose or the streak parameters are invalid.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        viewport: Viewport,
        options: Options,
    ) -> Result<Self, LightwayError> {
        let context = RenderContext::new(target, viewport.physical_size()).await?;

        let streak_field = build_streak_field(&options)?;
        let lights: Vec<AreaLight> = options
            .scene
            .area_lights
            .iter()
            .map(AreaLight::from_options)
            .collect();
        let renderer = SceneRenderer::new(&context, &options, &streak_field, &lights)?;
        log::info!(
            "scene ready: {} streak instances, {} area lights, {}x{} @ {}x",
            renderer.streak_instances(),
            lights.len(),
            viewport.width(),
            viewport.height(),
            viewport.pixel_ratio()
        );

        let camera = CameraController::new(&options.camera, viewport.aspect());
        let overlay = LoadingOverlay::new(options.loading.fade_seconds, options.loading.easing);

        let mut engine = Self {
            context,
            renderer,
            camera,
            input: InputProcessor::new(),
            overlay,
            tracker: LoadTracker::new(),
            pending_model: None,
            model: None,
            lights,
            options,
            viewport,
            clock: FrameClock::new(),
            frame_timing: FrameTiming::new(),
        };
        let path = engine.options.model.path.clone();
        engine.start_model_load(&path);
        Ok(engine)
    }

    /// Current options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The loading overlay state.
    pub fn overlay(&self) -> &LoadingOverlay {
        &self.overlay
    }

    /// Smoothed frame timings.
    pub fn frame_timing(&self) -> &FrameTiming {
        &self.frame_timing
    }

    /// Replace the options, regenerating the streak field when its
    /// generator inputs changed.
    ///
    /// Particles are resampled when they are turned on or their count,
    /// seed or colour changes, and dropped when turned off. Scene layout
    /// (floor, road, lights), particle radius and the loaded model are
    /// fixed at construction.
    ///
    /// # Errors
    ///
    /// Returns [`LightwayError::Streaks`] if the new streak parameters are
    /// invalid; the previous options stay in effect.
    pub fn set_options(&mut self, options: Options) -> Result<(), LightwayError> {
        let regenerate = options.streaks.params() != self.options.streaks.params()
            || options.streaks.seed != self.options.streaks.seed;
        if regenerate {
            let field = build_streak_field(&options)?;
            self.renderer.set_streak_field(&self.context, &field);
            log::debug!("regenerated {} streak instances", field.instance_count());
        }
        let particles = particle_update(&self.options.particles, &options.particles);
        self.camera.apply_options(&options.camera);
        self.renderer.apply_options(&self.context.queue, &options);
        self.options = options;
        match particles {
            ParticleUpdate::Keep => {}
            ParticleUpdate::Respawn => self.spawn_particles(),
            ParticleUpdate::Clear => self.renderer.clear_particles(),
        }
        Ok(())
    }

    /// Apply a new viewport: camera aspect, back-buffer size and
    /// size-dependent render targets.
    pub fn resize(&mut self, viewport: Viewport) {
        let (width, height) = viewport.physical_size();
        self.context.resize(width, height);
        self.camera.set_aspect(viewport.aspect());
        self.renderer.resize(&self.context);
        self.viewport = viewport;
        log::debug!(
            "resized to {}x{} (back-buffer {width}x{height})",
            viewport.width(),
            viewport.height()
        );
    }

    /// Resize from a physical size and scale factor as reported by native
    /// windowing.
    ///
    /// # Errors
    ///
    /// Returns [`LightwayError::ZeroSizedSurface`] for a zero dimension
    /// (e.g. a minimised window); the previous size is kept.
    pub fn resize_physical(
        &mut self,
        width: u32,
        height: u32,
        scale_factor: f64,
    ) -> Result<(), LightwayError> {
        let viewport = Viewport::from_physical(width, height, scale_factor)
            .ok_or(LightwayError::ZeroSizedSurface { width, height })?;
        self.resize(viewport);
        Ok(())
    }

    /// Run one iteration of the render loop.
    pub fn frame(&mut self) {
        self.poll_loads();

        let time = self.clock.tick();
        self.overlay.advance(time.delta);

        match self.render(time.elapsed) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.context.reconfigure();
            }
            Err(e) => log::warn!("skipping frame: {e}"),
        }

        if self.options.debug.log_frame_timing {
            self.frame_timing.end_frame();
        }
    }

    /// Encode and present one frame.
    fn render(&mut self, elapsed: f32) -> Result<(), wgpu::SurfaceError> {
        let globals = GlobalsUniform::new(
            &self.camera.camera,
            elapsed,
            &scene_fog(&self.options),
            &self.lights,
        );
        let effects = EffectParams::new(
            &self.options.post_processing,
            elapsed,
            self.context.size(),
        );
        let inputs = FrameInputs {
            globals: &globals,
            effects: &effects,
            overlay_color: overlay_tint(&self.overlay, &self.options),
            overlay_opacity: self.overlay.opacity(),
        };

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();
        self.renderer
            .render(&self.context, &mut encoder, &view, &inputs);
        self.context.submit(encoder);
        frame.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;
    use crate::assets::LoadEvent;
    use crate::util::color::HexColor;
    use crate::util::easing::EasingFunction;

    #[test]
    fn seeded_rng_is_deterministic() {
        let mut a = seeded_rng(Some(7));
        let mut b = seeded_rng(Some(7));
        for _ in 0..4 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn streak_field_follows_options() {
        let mut options = Options::default();
        options.streaks.seed = Some(1);
        let field = build_streak_field(&options).unwrap();
        assert_eq!(field.offsets().len(), 1500);
        assert_eq!(field.metrics().len(), 1000);
        assert_eq!(build_streak_field(&options).unwrap(), field);

        options.streaks.travel_length = 0.0;
        assert!(matches!(
            build_streak_field(&options),
            Err(LightwayError::Streaks(_))
        ));
    }

    #[test]
    fn fog_spans_travel_length_fractions() {
        let fog = scene_fog(&Options::default());
        assert!(fog.enabled);
        assert_eq!(fog.color, [0.0, 0.0, 0.0]);
        assert!((fog.near - 40.0).abs() < 1e-4);
        assert!((fog.far - 100_000.0).abs() < 1e-1);
    }

    #[test]
    fn model_is_lowered_below_the_floor() {
        let t = model_transform(&Options::default());
        assert_eq!(t.transform_point3(Vec3::ZERO), Vec3::new(0.0, -9.0, 0.0));
    }

    #[test]
    fn particle_toggle_spawns_and_clears() {
        let off = ParticleOptions::default();
        let on = ParticleOptions {
            enabled: true,
            ..ParticleOptions::default()
        };
        assert_eq!(particle_update(&off, &on), ParticleUpdate::Respawn);
        assert_eq!(particle_update(&on, &off), ParticleUpdate::Clear);
        assert_eq!(particle_update(&on, &on), ParticleUpdate::Keep);
        assert_eq!(particle_update(&off, &off), ParticleUpdate::Keep);
    }

    #[test]
    fn particle_field_changes_respawn_while_enabled() {
        let on = ParticleOptions {
            enabled: true,
            ..ParticleOptions::default()
        };
        let recount = ParticleOptions { count: 500, ..on.clone() };
        let reseed = ParticleOptions { seed: Some(3), ..on.clone() };
        let recolor = ParticleOptions {
            color: HexColor(0xff00ff),
            ..on.clone()
        };
        for changed in [&recount, &reseed, &recolor] {
            assert_eq!(particle_update(&on, changed), ParticleUpdate::Respawn);
        }

        // Edits while disabled wait for the next enable.
        let off = ParticleOptions::default();
        let off_recount = ParticleOptions { count: 500, ..off.clone() };
        assert_eq!(particle_update(&off, &off_recount), ParticleUpdate::Keep);
    }

    #[test]
    fn overlay_switches_to_error_tint() {
        let mut options = Options::default();
        options.loading.color = HexColor(0xffffff);
        let mut overlay = LoadingOverlay::new(6.0, EasingFunction::QuadraticOut);
        assert_eq!(overlay_tint(&overlay, &options), [1.0, 1.0, 1.0]);

        overlay.on_event(&LoadEvent::Failed {
            url: "scene.glb".to_owned(),
            message: "missing".to_owned(),
        });
        assert_eq!(
            overlay_tint(&overlay, &options),
            options.loading.error_color.to_linear()
        );
    }
}
