//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the modelview crate.
#[derive(Debug)]
pub enum ViewerError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// The model file was read but could not be turned into a drawable
    /// model (no triangle geometry, missing buffers, ...).
    ModelLoad(String),
    /// glTF parsing or buffer import failure.
    Gltf(gltf::Error),
    /// Texture image decoding failure.
    Image(image::ImageError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop or window failure.
    Viewer(String),
    /// Browser fetch or DOM failure.
    Fetch(String),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            Self::Gltf(e) => write!(f, "glTF error: {e}"),
            Self::Image(e) => write!(f, "image error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
            Self::Fetch(msg) => write!(f, "fetch error: {msg}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Gltf(e) => Some(e),
            Self::Image(e) => Some(e),
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for ViewerError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<gltf::Error> for ViewerError {
    fn from(e: gltf::Error) -> Self {
        Self::Gltf(e)
    }
}

impl From<image::ImageError> for ViewerError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}

impl From<std::io::Error> for ViewerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
