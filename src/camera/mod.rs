//! Camera system for 3D scene viewing.
//!
//! Provides a perspective camera and an orbit controller with rotation,
//! panning and zoom around a focus point.

/// Orbit controller managing rotation, pan and zoom.
pub mod controller;
/// Core camera struct and matrix helpers.
pub mod core;
