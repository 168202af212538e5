use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Full-screen effects applied after the scene pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Effects", inline)]
#[serde(default)]
pub struct PostProcessingOptions {
    /// Animated film grain.
    #[schemars(title = "Noise")]
    pub noise_enabled: bool,
    /// Grain strength.
    #[schemars(title = "Noise Opacity", range(min = 0.0, max = 1.0), extend("step" = 0.005))]
    pub noise_opacity: f32,
    /// Screen-space grid lines.
    #[schemars(title = "Grid")]
    pub grid_enabled: bool,
    /// Grid cell size in back-buffer pixels.
    #[schemars(title = "Grid Scale", range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    pub grid_scale: f32,
    /// Line width as a fraction of a cell.
    #[schemars(skip)]
    pub grid_line_width: f32,
}

impl Default for PostProcessingOptions {
    fn default() -> Self {
        Self {
            noise_enabled: false,
            noise_opacity: 0.01,
            grid_enabled: false,
            grid_scale: 1.5,
            grid_line_width: 0.0,
        }
    }
}

impl PostProcessingOptions {
    /// Whether any effect changes the image.
    pub fn any_enabled(&self) -> bool {
        self.noise_enabled || self.grid_enabled
    }
}
