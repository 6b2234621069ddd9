//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, the lighting uniform and
//! the depth attachment.

/// Directional plus ambient lighting uniform and bind group.
pub mod lighting;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Depth texture for the model pass.
pub mod texture;
