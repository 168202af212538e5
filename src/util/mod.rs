//! Shared utilities: easing curves, colour parsing and frame timing.

pub mod color;
pub mod easing;
pub mod frame_timing;
