//! Converts raw platform events into camera gestures.
//!
//! The `InputProcessor` owns all transient input state (cursor tracking,
//! drag detection, held buttons, modifier keys). Left-drag orbits,
//! right-drag (or shift + left-drag) pans, the wheel zooms, and a left
//! press released without dragging is reported as a click.

use glam::Vec2;

use super::event::{InputEvent, MouseButton};
use super::mouse::PointerState;

/// Orbit-control gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    /// Orbit by a drag delta in pixels.
    Rotate {
        /// Cursor movement since the previous event.
        delta: Vec2,
    },
    /// Move the focus point by a drag delta in pixels.
    Pan {
        /// Cursor movement since the previous event.
        delta: Vec2,
    },
    /// Dolly in (positive) or out (negative).
    Zoom {
        /// Wheel amount.
        delta: f32,
    },
}

/// What the engine should do with an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    /// Move the camera.
    Camera(CameraCommand),
    /// Primary click at a screen position.
    Click {
        /// Position in physical pixels.
        position: Vec2,
    },
}

/// Converts raw window events into [`InputAction`]s.
#[derive(Debug, Default)]
pub struct InputProcessor {
    pointer: PointerState,
    left_pressed: bool,
    right_pressed: bool,
    shift_pressed: bool,
}

impl InputProcessor {
    /// Create a processor with nothing held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn mouse_pos(&self) -> Vec2 {
        self.pointer.position()
    }

    /// Process a raw input event and return zero or one actions.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<InputAction> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(x, y),
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed)
            }
            InputEvent::Scroll { delta } => {
                Some(InputAction::Camera(CameraCommand::Zoom { delta }))
            }
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
        }
    }

    fn handle_cursor_moved(&mut self, x: f32, y: f32) -> Option<InputAction> {
        let delta = self.pointer.move_to(Vec2::new(x, y));
        if delta == Vec2::ZERO {
            return None;
        }
        let command = if self.right_pressed || (self.left_pressed && self.shift_pressed) {
            CameraCommand::Pan { delta }
        } else if self.left_pressed {
            CameraCommand::Rotate { delta }
        } else {
            return None;
        };
        Some(InputAction::Camera(command))
    }

    fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
    ) -> Option<InputAction> {
        match button {
            MouseButton::Left => {
                self.left_pressed = pressed;
                if pressed {
                    self.pointer.press();
                    None
                } else if self.pointer.release() {
                    Some(InputAction::Click {
                        position: self.pointer.position(),
                    })
                } else {
                    None
                }
            }
            MouseButton::Right => {
                self.right_pressed = pressed;
                None
            }
            MouseButton::Middle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::CursorMoved { x, y }
    }

    fn button(button: MouseButton, pressed: bool) -> InputEvent {
        InputEvent::MouseButton { button, pressed }
    }

    #[test]
    fn hover_produces_nothing() {
        let mut p = InputProcessor::new();
        assert_eq!(p.handle_event(moved(10.0, 10.0)), None);
        assert_eq!(p.handle_event(moved(20.0, 15.0)), None);
        assert_eq!(p.mouse_pos(), Vec2::new(20.0, 15.0));
    }

    #[test]
    fn left_drag_rotates_without_click() {
        let mut p = InputProcessor::new();
        let _ = p.handle_event(moved(0.0, 0.0));
        let _ = p.handle_event(button(MouseButton::Left, true));
        let action = p.handle_event(moved(12.0, -4.0));
        assert_eq!(
            action,
            Some(InputAction::Camera(CameraCommand::Rotate {
                delta: Vec2::new(12.0, -4.0)
            }))
        );
        assert_eq!(p.handle_event(button(MouseButton::Left, false)), None);
    }

    #[test]
    fn right_drag_and_shift_drag_pan() {
        let mut p = InputProcessor::new();
        let _ = p.handle_event(moved(0.0, 0.0));
        let _ = p.handle_event(button(MouseButton::Right, true));
        assert!(matches!(
            p.handle_event(moved(5.0, 0.0)),
            Some(InputAction::Camera(CameraCommand::Pan { .. }))
        ));
        let _ = p.handle_event(button(MouseButton::Right, false));

        let _ = p.handle_event(InputEvent::ModifiersChanged { shift: true });
        let _ = p.handle_event(button(MouseButton::Left, true));
        assert!(matches!(
            p.handle_event(moved(9.0, 0.0)),
            Some(InputAction::Camera(CameraCommand::Pan { .. }))
        ));
    }

    #[test]
    fn press_release_in_place_is_a_click() {
        let mut p = InputProcessor::new();
        let _ = p.handle_event(moved(40.0, 30.0));
        let _ = p.handle_event(button(MouseButton::Left, true));
        let _ = p.handle_event(moved(41.0, 30.0));
        assert_eq!(
            p.handle_event(button(MouseButton::Left, false)),
            Some(InputAction::Click {
                position: Vec2::new(41.0, 30.0)
            })
        );
    }

    #[test]
    fn scroll_zooms() {
        let mut p = InputProcessor::new();
        assert_eq!(
            p.handle_event(InputEvent::Scroll { delta: 1.5 }),
            Some(InputAction::Camera(CameraCommand::Zoom { delta: 1.5 }))
        );
    }
}
