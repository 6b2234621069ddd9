//! The viewer's complete interactive vocabulary.
//!
//! Every user-facing operation, whether triggered by a key press, a mouse
//! gesture or the page's toggle button, is represented as a
//! `ViewerCommand`. Controller commands are routed with
//! [`ViewerCommand::apply`]; `Resize` and `Quit` are handled by the window
//! owner.

use glam::Vec2;

use crate::camera::CameraControl;
use crate::controller::InteractionController;

/// A single interactive operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerCommand {
    /// Flip between auto-rotation and manual drag rotation.
    TogglePanning,
    /// A pointer button went down anywhere on the page or window.
    PointerDown,
    /// A pointer button was released.
    PointerUp,
    /// The pointer moved while over the page or window.
    PointerMoved {
        /// Movement since the previous observation, in pixels.
        delta: Vec2,
    },
    /// Scroll-wheel zoom.
    Zoom {
        /// Positive zooms in.
        delta: f32,
    },
    /// The output surface changed size.
    Resize {
        /// New width in physical pixels.
        width: u32,
        /// New height in physical pixels.
        height: u32,
    },
    /// Close the viewer.
    Quit,
}

impl ViewerCommand {
    /// Route a controller command to `controller`.
    ///
    /// Returns `true` if the camera changed. `Resize` and `Quit` are not
    /// controller concerns and return `false` untouched.
    pub fn apply<C: CameraControl>(
        self,
        controller: &mut InteractionController<C>,
    ) -> bool {
        match self {
            Self::TogglePanning => {
                let _ = controller.toggle_panning();
                false
            }
            Self::PointerDown => {
                controller.on_pointer_down();
                false
            }
            Self::PointerUp => {
                controller.on_pointer_up();
                false
            }
            Self::PointerMoved { delta } => {
                controller.on_pointer_move(delta.x, delta.y)
            }
            Self::Zoom { delta } => {
                controller.on_zoom(delta);
                true
            }
            Self::Resize { .. } | Self::Quit => false,
        }
    }

    /// Whether the window owner rather than the controller handles this.
    #[must_use]
    pub fn is_window_command(self) -> bool {
        matches!(self, Self::Resize { .. } | Self::Quit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitControls;

    fn controller() -> InteractionController<OrbitControls> {
        InteractionController::new(OrbitControls::new(10.0))
    }

    #[test]
    fn toggle_flips_panning() {
        let mut c = controller();
        assert!(c.panning_enabled());
        let _ = ViewerCommand::TogglePanning.apply(&mut c);
        assert!(!c.panning_enabled());
    }

    #[test]
    fn drag_sequence_rotates_when_panning_off() {
        let mut c = controller();
        let _ = ViewerCommand::TogglePanning.apply(&mut c);
        let theta = c.camera().theta();
        let _ = ViewerCommand::PointerDown.apply(&mut c);
        assert!(ViewerCommand::PointerMoved {
            delta: Vec2::new(10.0, 0.0)
        }
        .apply(&mut c));
        let _ = ViewerCommand::PointerUp.apply(&mut c);
        assert!(!c.dragging());
        assert!((c.camera().theta() - (theta + 1.0)).abs() < 1e-5);
    }

    #[test]
    fn window_commands_leave_controller_alone() {
        let mut c = controller();
        assert!(!ViewerCommand::Quit.apply(&mut c));
        assert!(!ViewerCommand::Resize {
            width: 10,
            height: 10
        }
        .apply(&mut c));
        assert!(c.panning_enabled());
        assert!(ViewerCommand::Quit.is_window_command());
        assert!(!ViewerCommand::PointerUp.is_window_command());
    }
}
