//! Camera system for viewing the loaded model.
//!
//! Provides the perspective projection camera, the orbit controls that move
//! it, and the [`CameraControl`] seam the interaction controller drives.

/// Camera-control trait implemented by orbit controls and test doubles.
pub mod control;
/// Core camera struct and GPU uniform types.
pub mod core;
/// Orbit controls with auto-rotation and zoom.
pub mod orbit;

pub use control::CameraControl;
pub use self::core::{Camera, CameraUniform};
pub use orbit::OrbitControls;
