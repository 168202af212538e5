//! Crate-level error types.

use std::fmt;

use crate::assets::LoadError;
use crate::gpu::render_context::RenderContextError;
use crate::streaks::StreakFieldError;

/// Errors produced by the lightway crate.
#[derive(Debug)]
pub enum LightwayError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// A WGSL module failed to register or compose.
    Shader(String),
    /// Failed to load or decode a scene asset.
    AssetLoad(LoadError),
    /// Procedural generator rejected its parameters.
    Streaks(StreakFieldError),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// Viewer event-loop or host page failure.
    Viewer(String),
    /// A surface or viewport with a zero dimension was requested.
    ZeroSizedSurface {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

impl fmt::Display for LightwayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::AssetLoad(e) => write!(f, "asset load error: {e}"),
            Self::Streaks(e) => write!(f, "light streak field error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
            Self::ZeroSizedSurface { width, height } => {
                write!(f, "zero-sized surface requested ({width}x{height})")
            }
        }
    }
}

impl std::error::Error for LightwayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::AssetLoad(e) => Some(e),
            Self::Streaks(e) => Some(e),
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for LightwayError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<LoadError> for LightwayError {
    fn from(e: LoadError) -> Self {
        Self::AssetLoad(e)
    }
}

impl From<StreakFieldError> for LightwayError {
    fn from(e: StreakFieldError) -> Self {
        Self::Streaks(e)
    }
}

impl From<std::io::Error> for LightwayError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
