// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! GPU light-tunnel scene built on wgpu.
//!
//! Lightway renders two mirrored rows of instanced light streaks scrolling
//! through a fogged corridor, a model lit by rect area lights over a
//! reflective floor, and a full-screen loading overlay that fades out once
//! the model has loaded.
//!
//! # Key entry points
//!
//! - [`SceneEngine`] - owns the surface, renderer, camera and overlay and
//!   runs one frame per call to [`SceneEngine::frame`]
//! - [`Viewport`] - immutable size description passed on every resize
//! - [`Options`] - runtime configuration with TOML presets
//! - [`StopToken`] - ends a host's render loop
//! - `Viewer` (feature `viewer`) - standalone winit window
//! - `web::start` (feature `web`, wasm32) - browser entry point
//!
//! # Architecture
//!
//! The model loads off the render thread ([`assets::load_model`]) and is
//! polled once per frame. The scene pass draws lit meshes, streaks and
//! optional surface particles into an offscreen target; an effects pass
//! writes the swapchain and the loading overlay is blended on top.

pub mod assets;
pub mod camera;
pub mod engine;
pub mod error;
pub mod frame_loop;
pub mod gpu;
pub mod input;
pub mod options;
pub mod overlay;
pub mod renderer;
pub mod sampling;
pub mod scene;
pub mod streaks;
pub mod util;
pub mod viewport;

#[cfg(feature = "viewer")]
mod viewer;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub mod web;

pub use engine::SceneEngine;
pub use error::LightwayError;
pub use frame_loop::StopToken;
pub use input::{InputEvent, MouseButton};
pub use options::Options;
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
pub use viewport::Viewport;
