use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::color::HexColor;
use crate::util::easing::EasingFunction;

/// Loading overlay appearance and fade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Loading", inline)]
#[serde(default)]
pub struct LoadingOptions {
    /// Fade-out duration once every asset has loaded.
    #[schemars(title = "Fade Duration", range(min = 0.0, max = 20.0), extend("step" = 0.5))]
    pub fade_seconds: f32,
    /// Curve applied to the fade.
    #[schemars(title = "Easing")]
    pub easing: EasingFunction,
    /// Overlay colour while loading.
    #[schemars(title = "Color")]
    pub color: HexColor,
    /// Overlay colour after a load failure.
    #[schemars(title = "Error Color")]
    pub error_color: HexColor,
}

impl Default for LoadingOptions {
    fn default() -> Self {
        Self {
            fade_seconds: 6.0,
            easing: EasingFunction::QuadraticOut,
            color: HexColor::BLACK,
            error_color: HexColor(0x3a0d0d),
        }
    }
}
