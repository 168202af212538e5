//! Scene options with TOML preset support.
//!
//! Every tweakable setting (camera, streak field, static scene, loading
//! overlay, particles, effects, model placement, diagnostics) lives here.
//! Options serialize to/from TOML presets stored in `assets/presets/`.

mod camera;
mod debug;
mod loading;
mod model;
mod particles;
mod post_processing;
mod scene;
mod streaks;

use std::path::Path;

pub use camera::CameraOptions;
pub use debug::DebugOptions;
pub use loading::LoadingOptions;
pub use model::ModelOptions;
pub use particles::ParticleOptions;
pub use post_processing::PostProcessingOptions;
use schemars::JsonSchema;
pub use scene::{
    AreaLightOptions, FloorOptions, FogOptions, RoadOptions, SceneOptions,
};
use serde::{Deserialize, Serialize};
pub use streaks::StreakOptions;

use crate::error::LightwayError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[streaks]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Light-streak field.
    pub streaks: StreakOptions,
    /// Fog, floor, road and area lights.
    pub scene: SceneOptions,
    /// Loading overlay.
    pub loading: LoadingOptions,
    /// Surface particles.
    pub particles: ParticleOptions,
    /// Post-processing effect parameters.
    pub post_processing: PostProcessingOptions,
    /// Model source and placement.
    #[schemars(skip)]
    pub model: ModelOptions,
    /// Diagnostics.
    pub debug: DebugOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, LightwayError> {
        let content = std::fs::read_to_string(path).map_err(LightwayError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, LightwayError> {
        toml::from_str(content)
            .map_err(|e| LightwayError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), LightwayError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LightwayError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(LightwayError::Io)?;
        }
        std::fs::write(path, content).map_err(LightwayError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }

    /// Fog start and end distances for the current travel length.
    pub fn fog_range(&self) -> (f32, f32) {
        let l = self.streaks.travel_length;
        (
            self.scene.fog.near_fraction * l,
            self.scene.fog.far_fraction * l,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::color::HexColor;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r##"
[streaks]
count = 40
color = "#ff0000"
"##;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.streaks.count, 40);
        assert_eq!(opts.streaks.color, HexColor(0xff0000));
        // Everything else should be default
        assert_eq!(opts.streaks.travel_length, 200.0);
        assert_eq!(opts.loading.fade_seconds, 6.0);
        assert_eq!(opts.scene.area_lights.len(), 3);
        assert!(!opts.particles.enabled);
    }

    #[test]
    fn bad_colour_is_a_parse_error() {
        let err = Options::from_toml("[streaks]\ncolor = \"teal\"\n").unwrap_err();
        assert!(matches!(err, LightwayError::OptionsParse(_)));
    }

    #[test]
    fn default_values_match_the_scene() {
        let opts = Options::default();
        assert_eq!(opts.camera.fovy, 75.0);
        assert_eq!(opts.camera.zfar, 10_000.0);
        assert_eq!(opts.streaks.speed, 50.0);
        assert_eq!(opts.model.offset, [0.0, -9.0, 0.0]);
        assert_eq!(opts.fog_range(), (40.0, 100_000.0));
        assert!(!opts.post_processing.any_enabled());
    }

    #[test]
    fn save_then_load_and_list() {
        let dir = std::env::temp_dir().join("lightway-presets-test");
        let mut opts = Options::default();
        opts.particles.enabled = true;
        opts.save(&dir.join("particles.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let loaded = Options::load(&dir.join("particles.toml")).unwrap();
        assert_eq!(loaded, opts);
        assert!(Options::list_presets(&dir).contains(&"particles".to_owned()));
        assert!(!Options::list_presets(&dir).contains(&"notes".to_owned()));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn shipped_presets_parse() {
        let default =
            Options::from_toml(include_str!("../../assets/presets/default.toml"))
                .unwrap();
        assert_eq!(default, Options::default());

        let particles =
            Options::from_toml(include_str!("../../assets/presets/particles.toml"))
                .unwrap();
        assert!(particles.particles.enabled);
        assert!(particles.post_processing.noise_enabled);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        for section in ["camera", "streaks", "scene", "loading", "particles"] {
            assert!(props.contains_key(section), "{section}");
        }
        assert!(props.contains_key("post_processing"));
        assert!(props.contains_key("debug"));
        // Model placement is not exposed
        assert!(!props.contains_key("model"));

        let streaks = &props["streaks"]["properties"];
        assert!(streaks.get("speed").is_some());
        assert!(streaks.get("vertical_scale").is_none());
        assert_eq!(streaks["color"]["pattern"], "^#[0-9a-fA-F]{6}$");
    }
}
