use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which model to load and where to place it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Model", inline)]
#[serde(default)]
pub struct ModelOptions {
    /// File path natively, URL in the browser.
    #[schemars(skip)]
    pub path: String,
    /// World-space translation applied to the whole model.
    #[schemars(skip)]
    pub offset: [f32; 3],
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            path: "assets/models/scene.glb".to_owned(),
            offset: [0.0, -9.0, 0.0],
        }
    }
}
