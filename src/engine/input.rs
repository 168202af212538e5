//! Input handling for [`SceneEngine`].

use super::SceneEngine;
use crate::input::{InputAction, InputEvent};

impl SceneEngine {
    /// Process a platform-agnostic input event.
    ///
    /// Drags and the wheel move the orbit camera; a click logs the camera
    /// state when `debug.log_camera_on_click` is set.
    pub fn handle_input(&mut self, event: InputEvent) {
        match self.input.handle_event(event) {
            Some(InputAction::Camera(command)) => self.camera.apply(command),
            Some(InputAction::Click { position }) => {
                if self.options.debug.log_camera_on_click {
                    log::info!(
                        "click at ({:.0}, {:.0}): camera position {:?}, view direction {:?}",
                        position.x,
                        position.y,
                        self.camera.position(),
                        self.camera.view_direction()
                    );
                }
            }
            None => {}
        }
    }
}
