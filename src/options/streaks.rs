use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::streaks::StreakParams;
use crate::util::color::HexColor;

/// Light-tunnel streak field and its scrolling shader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Light Streaks", inline)]
#[serde(default)]
pub struct StreakOptions {
    /// Draws per field; two mirrored streaks per draw.
    #[schemars(title = "Count", range(min = 0, max = 5000))]
    pub count: u32,
    /// Length of the scrolling corridor.
    #[schemars(title = "Travel Length", range(min = 1.0, max = 1000.0), extend("step" = 1.0))]
    pub travel_length: f32,
    /// Half distance between the two streak rows.
    #[schemars(title = "Road Width", range(min = 0.0, max = 50.0), extend("step" = 0.5))]
    pub road_width: f32,
    /// Multiplier from streak radius to vertical offset.
    #[schemars(skip)]
    pub vertical_scale: f32,
    /// Scroll speed in world units per second.
    #[schemars(title = "Speed", range(min = 0.0, max = 200.0), extend("step" = 1.0))]
    pub speed: f32,
    /// Streak colour.
    #[schemars(title = "Color")]
    pub color: HexColor,
    /// Tube coordinate where the tail fade starts.
    #[schemars(skip)]
    pub fade_start: f32,
    /// Tube coordinate where the streak reaches full opacity.
    #[schemars(skip)]
    pub fade_end: f32,
    /// Seed for the field; random when absent.
    #[schemars(skip)]
    pub seed: Option<u64>,
}

impl Default for StreakOptions {
    fn default() -> Self {
        Self {
            count: 250,
            travel_length: 200.0,
            road_width: 10.0,
            vertical_scale: 15.0,
            speed: 50.0,
            color: HexColor(0x7affff),
            fade_start: 0.0,
            fade_end: 0.6,
            seed: None,
        }
    }
}

impl StreakOptions {
    /// Generator inputs.
    pub fn params(&self) -> StreakParams {
        StreakParams {
            count: self.count,
            travel_length: self.travel_length,
            road_width: self.road_width,
            vertical_scale: self.vertical_scale,
        }
    }
}
