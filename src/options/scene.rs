use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::color::HexColor;

/// Static scene content: fog, floor, road and area lights.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Scene", inline)]
#[serde(default)]
pub struct SceneOptions {
    /// Background colour behind everything.
    #[schemars(title = "Clear Color")]
    pub clear_color: HexColor,
    /// Distance fog.
    pub fog: FogOptions,
    /// Floor slab under the model.
    pub floor: FloorOptions,
    /// Road plane between the streak rows.
    pub road: RoadOptions,
    /// Rect area lights, at most four are shaded.
    #[schemars(skip)]
    pub area_lights: Vec<AreaLightOptions>,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            clear_color: HexColor::BLACK,
            fog: FogOptions::default(),
            floor: FloorOptions::default(),
            road: RoadOptions::default(),
            area_lights: vec![
                AreaLightOptions {
                    color: HexColor(0xd5fbfd),
                    intensity: 3.0,
                    width: 10.0,
                    height: 10.0,
                    position: [0.0, 0.0, 6.0],
                    target: [0.0, 0.0, 0.0],
                    show_panel: false,
                },
                AreaLightOptions {
                    color: HexColor(0x3a7073),
                    intensity: 30.0,
                    width: 6.0,
                    height: 6.5,
                    position: [0.0, 0.0, -6.0],
                    target: [0.0, 0.0, 0.0],
                    show_panel: true,
                },
                AreaLightOptions {
                    color: HexColor(0x3a7073),
                    intensity: 5.0,
                    width: 50.0,
                    height: 50.0,
                    position: [0.0, 25.0, -5.0],
                    target: [0.0, 0.0, 0.0],
                    show_panel: false,
                },
            ],
        }
    }
}

/// Linear distance fog, with bounds relative to the streak travel length.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Fog", inline)]
#[serde(default)]
pub struct FogOptions {
    /// Apply fog to lit meshes and streaks.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Fog colour, normally the clear colour.
    #[schemars(title = "Color")]
    pub color: HexColor,
    /// Fog starts at `near_fraction * travel_length`.
    #[schemars(title = "Near", range(min = 0.0, max = 5.0), extend("step" = 0.05))]
    pub near_fraction: f32,
    /// Fog is opaque at `far_fraction * travel_length`.
    #[schemars(title = "Far", range(min = 1.0, max = 1000.0), extend("step" = 1.0))]
    pub far_fraction: f32,
}

impl Default for FogOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            color: HexColor::BLACK,
            near_fraction: 0.2,
            far_fraction: 500.0,
        }
    }
}

/// Reflective floor slab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Floor", inline)]
#[serde(default)]
pub struct FloorOptions {
    /// Draw the floor.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Box extents.
    #[schemars(skip)]
    pub size: [f32; 3],
    /// World Y of the slab centre.
    #[schemars(skip)]
    pub height: f32,
    /// Base colour.
    #[schemars(title = "Color")]
    pub color: HexColor,
    /// Lower is shinier.
    #[schemars(title = "Roughness", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub roughness: f32,
}

impl Default for FloorOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            size: [200.0, 0.1, 200.0],
            height: -7.0,
            color: HexColor(0x808080),
            roughness: 0.1,
        }
    }
}

/// Flat unlit road plane between the streak rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Road", inline)]
#[serde(default)]
pub struct RoadOptions {
    /// Draw the road.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Extent across the corridor.
    #[schemars(skip)]
    pub width: f32,
    /// Extent along the corridor.
    #[schemars(skip)]
    pub length: f32,
    /// World Y of the plane.
    #[schemars(skip)]
    pub height: f32,
    /// Unlit surface colour.
    #[schemars(title = "Color")]
    pub color: HexColor,
}

impl Default for RoadOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            width: 20.0,
            length: 400.0,
            height: -6.0,
            color: HexColor(0x101012),
        }
    }
}

/// One rectangular area light.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct AreaLightOptions {
    /// Emitted colour.
    pub color: HexColor,
    /// Radiance multiplier.
    pub intensity: f32,
    /// Rectangle width.
    pub width: f32,
    /// Rectangle height.
    pub height: f32,
    /// Rectangle centre.
    pub position: [f32; 3],
    /// Point the emitting face looks at.
    pub target: [f32; 3],
    /// Draw the light's rectangle as an emissive panel.
    pub show_panel: bool,
}

impl Default for AreaLightOptions {
    fn default() -> Self {
        Self {
            color: HexColor(0xffffff),
            intensity: 1.0,
            width: 1.0,
            height: 1.0,
            position: [0.0, 0.0, 1.0],
            target: [0.0, 0.0, 0.0],
            show_panel: false,
        }
    }
}
