//! Model loading continuation for [`SceneEngine`].

use glam::Vec3;

use super::{model_transform, seeded_rng, SceneEngine};
use crate::assets::{self, LoadError, ModelAsset};
use crate::sampling::{generate_particle_field, SurfaceSampler};

impl SceneEngine {
    /// Track and start loading the model at `source`.
    ///
    /// An empty source loads nothing and lets the overlay fade at once.
    pub fn start_model_load(&mut self, source: &str) {
        if source.is_empty() {
            log::info!("no model configured");
            self.overlay.complete();
            return;
        }
        self.tracker.item_start(source);
        self.pending_model = Some(assets::load_model(source));
    }

    /// Resolve finished loads. Called at the start of every frame.
    pub(super) fn poll_loads(&mut self) {
        let Some(pending) = self.pending_model.as_mut() else {
            return;
        };
        let Some(result) = pending.poll() else {
            return;
        };
        let source = pending.source().to_owned();
        self.pending_model = None;
        match result {
            Ok(model) => self.on_model_loaded(&source, model),
            Err(e) => self.on_model_failed(&source, &e),
        }
    }

    fn on_model_loaded(&mut self, source: &str, model: ModelAsset) {
        log::info!(
            "loaded {source}: {} meshes, {} triangles",
            model.meshes.len(),
            model.triangle_count()
        );
        self.renderer.set_model(
            &self.context.device,
            &model,
            model_transform(&self.options),
        );
        self.model = Some(model);
        if self.options.particles.enabled {
            self.spawn_particles();
        }

        let event = self.tracker.item_end(source);
        self.overlay.on_event(&event);
    }

    fn on_model_failed(&mut self, source: &str, error: &LoadError) {
        log::error!("failed to load {source}: {error}");
        let event = self.tracker.item_error(source, error);
        self.overlay.on_event(&event);
    }

    /// Sample the loaded model's surface into the particle renderer.
    pub(super) fn spawn_particles(&mut self) {
        let Some(model) = &self.model else {
            return;
        };
        let (positions, indices) = model.merged_surface(Vec3::ZERO);
        let Some(sampler) = SurfaceSampler::new(&positions, &indices) else {
            log::warn!("model has no surface area; particles disabled");
            return;
        };
        let mut rng = seeded_rng(self.options.particles.seed);
        let field =
            generate_particle_field(&sampler, self.options.particles.count, &mut rng);
        self.renderer.set_particles(
            &self.context,
            &field,
            model_transform(&self.options),
            &self.options,
        );
    }
}
