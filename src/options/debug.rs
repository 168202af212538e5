use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Diagnostic toggles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Debug", inline)]
#[serde(default)]
pub struct DebugOptions {
    /// Log smoothed frame timings.
    #[schemars(title = "Frame Timing")]
    pub log_frame_timing: bool,
    /// Log camera position and direction on every click.
    #[schemars(title = "Log Clicks")]
    pub log_camera_on_click: bool,
}

impl Default for DebugOptions {
    fn default() -> Self {
        Self {
            log_frame_timing: true,
            log_camera_on_click: true,
        }
    }
}
