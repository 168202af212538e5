//! Input handling: platform-agnostic event types, pointer tracking, and
//! the processor that turns raw events into camera gestures.

/// Platform-agnostic input events.
pub mod event;
/// Pointer position and drag tracking.
pub(crate) mod mouse;
/// Converts raw events into camera gestures and clicks.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use processor::{CameraCommand, InputAction, InputProcessor};
