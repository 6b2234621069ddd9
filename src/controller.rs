//! Panning mode and pointer-drag rotation.
//!
//! The [`InteractionController`] owns the two interaction flags and turns
//! pointer gestures into rotations of a [`CameraControl`]:
//!
//! - while panning is enabled the camera auto-rotates once per frame and
//!   pointer movement is ignored;
//! - while panning is disabled, dragging with any button rotates the camera
//!   by `sensitivity` radians per pixel.
//!
//! A drag in progress also suspends auto-rotation, so the two never fight
//! over the camera in the same frame.

use crate::camera::CameraControl;

/// Radians of rotation per pixel of pointer movement.
pub const DEFAULT_ROTATE_SENSITIVITY: f32 = 0.1;

/// Interaction state machine driving a camera control.
#[derive(Debug, Clone)]
pub struct InteractionController<C> {
    camera: C,
    panning_enabled: bool,
    dragging: bool,
    sensitivity: f32,
}

impl<C: CameraControl> InteractionController<C> {
    /// Panning on, not dragging, default sensitivity.
    #[must_use]
    pub fn new(camera: C) -> Self {
        Self::with_settings(camera, true, DEFAULT_ROTATE_SENSITIVITY)
    }

    /// Explicit initial panning mode and rotate sensitivity.
    ///
    /// The camera's auto-rotate flag is set to match `panning_enabled`.
    #[must_use]
    pub fn with_settings(
        mut camera: C,
        panning_enabled: bool,
        sensitivity: f32,
    ) -> Self {
        camera.set_auto_rotate(panning_enabled);
        Self {
            camera,
            panning_enabled,
            dragging: false,
            sensitivity,
        }
    }

    /// Flip panning mode and mirror it into the camera's auto-rotate flag.
    ///
    /// Returns the new panning state.
    pub fn toggle_panning(&mut self) -> bool {
        self.panning_enabled = !self.panning_enabled;
        self.camera.set_auto_rotate(self.panning_enabled);
        log::debug!(
            "panning {}",
            if self.panning_enabled { "enabled" } else { "disabled" }
        );
        self.panning_enabled
    }

    /// A pointer button went down.
    pub fn on_pointer_down(&mut self) {
        self.dragging = true;
    }

    /// A pointer button was released.
    pub fn on_pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Pointer moved by `(dx, dy)` pixels.
    ///
    /// Rotates the camera left by `-dx * sensitivity` and then up by
    /// `-dy * sensitivity`, but only while dragging with panning disabled.
    /// Returns `true` if the camera was rotated.
    pub fn on_pointer_move(&mut self, dx: f32, dy: f32) -> bool {
        if !self.dragging || self.panning_enabled {
            return false;
        }
        self.camera.rotate_left(-dx * self.sensitivity);
        self.camera.rotate_up(-dy * self.sensitivity);
        true
    }

    /// Pass a zoom gesture through to the camera.
    pub fn on_zoom(&mut self, delta: f32) {
        self.camera.zoom(delta);
    }

    /// Per-frame hook: advance auto-rotation exactly once while panning and
    /// not dragging. Returns `true` if the camera was updated.
    pub fn per_frame_tick(&mut self) -> bool {
        if !self.panning_enabled || self.dragging {
            return false;
        }
        let _ = self.camera.update();
        true
    }

    /// Whether auto-rotation is on.
    #[must_use]
    pub fn panning_enabled(&self) -> bool {
        self.panning_enabled
    }

    /// Whether a pointer button is held.
    #[must_use]
    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// Radians of rotation per pixel.
    #[must_use]
    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// The driven camera control.
    #[must_use]
    pub fn camera(&self) -> &C {
        &self.camera
    }

    /// Mutable access to the driven camera control.
    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitControls;

    #[test]
    fn construction_mirrors_panning_into_auto_rotate() {
        let on = InteractionController::new(OrbitControls::new(1.0));
        assert!(on.camera().auto_rotate());
        let off = InteractionController::with_settings(
            OrbitControls::new(1.0),
            false,
            0.2,
        );
        assert!(!off.camera().auto_rotate());
        assert_eq!(off.sensitivity(), 0.2);
    }

    #[test]
    fn tick_while_dragging_leaves_camera_still() {
        let mut c = InteractionController::new(OrbitControls::new(1.0));
        c.on_pointer_down();
        assert!(!c.per_frame_tick());
        assert_eq!(c.camera().theta(), 0.0);
        c.on_pointer_up();
        assert!(c.per_frame_tick());
        assert!(c.camera().theta() < 0.0);
    }

    #[test]
    fn movement_ignored_while_panning() {
        let mut c = InteractionController::new(OrbitControls::new(1.0));
        c.on_pointer_down();
        assert!(!c.on_pointer_move(50.0, 50.0));
        assert_eq!(c.camera().theta(), 0.0);
    }
}
