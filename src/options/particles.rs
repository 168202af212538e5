use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::color::HexColor;

/// Glowing particles sampled on the model surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Surface Particles", inline)]
#[serde(default)]
pub struct ParticleOptions {
    /// Replace the solid model with sampled particles.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Particles sampled over the surface.
    #[schemars(title = "Count", range(min = 0, max = 100000))]
    pub count: u32,
    /// Sphere radius of each particle.
    #[schemars(skip)]
    pub radius: f32,
    /// Glow colour.
    #[schemars(title = "Color")]
    pub color: HexColor,
    /// Fixed sampling seed; random when unset.
    #[schemars(skip)]
    pub seed: Option<u64>,
}

impl Default for ParticleOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            count: 20_000,
            radius: 0.01,
            color: HexColor(0xffffff),
            seed: None,
        }
    }
}
