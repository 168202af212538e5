//! Post-processing chain.
//!
//! The scene renders into an offscreen colour target. The effects pass
//! (noise and grid) copies it to the swapchain, and the loading overlay is
//! blended on top last.

pub mod effects;
pub mod overlay;
pub(crate) mod post_process;
pub mod screen_pass;
