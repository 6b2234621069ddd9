use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera projection and control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Fixed orbit distance from the origin. `None` frames the loaded
    /// model from its bounds instead.
    pub distance: Option<f32>,
    /// Whether the camera starts out auto-rotating (panning enabled).
    pub auto_rotate: bool,
    /// Auto-rotation speed; 2.0 is one orbit per 30 seconds at 60 fps.
    pub auto_rotate_speed: f32,
    /// Radians of manual rotation per pixel of pointer movement.
    pub rotate_sensitivity: f32,
    /// Zoom sensitivity multiplier.
    pub zoom_speed: f32,
    /// Closest allowed orbit distance.
    pub min_distance: f32,
    /// Farthest allowed orbit distance.
    pub max_distance: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 75.0,
            znear: 0.1,
            zfar: 1000.0,
            distance: None,
            auto_rotate: true,
            auto_rotate_speed: 2.0,
            rotate_sensitivity: 0.1,
            zoom_speed: 1.0,
            min_distance: 0.01,
            max_distance: 1000.0,
        }
    }
}

impl CameraOptions {
    /// Reject values the camera cannot work with: non-finite or inverted
    /// distance limits, a non-positive fixed distance, or an unusable
    /// projection.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        if !self.min_distance.is_finite() || self.min_distance < 0.0 {
            return Err(format!(
                "camera.min_distance must be finite and >= 0, got {}",
                self.min_distance
            ));
        }
        if self.max_distance.is_nan() || self.max_distance < self.min_distance
        {
            return Err(format!(
                "camera.max_distance ({}) must be >= camera.min_distance ({})",
                self.max_distance, self.min_distance
            ));
        }
        if let Some(distance) = self.distance {
            if !distance.is_finite() || distance <= 0.0 {
                return Err(format!(
                    "camera.distance must be finite and > 0, got {distance}"
                ));
            }
        }
        if !(self.fovy > 0.0 && self.fovy < 180.0) {
            return Err(format!(
                "camera.fovy must be in (0, 180) degrees, got {}",
                self.fovy
            ));
        }
        if !(self.znear > 0.0 && self.zfar > self.znear) {
            return Err(format!(
                "camera.znear ({}) must be > 0 and < camera.zfar ({})",
                self.znear, self.zfar
            ));
        }
        Ok(())
    }
}
