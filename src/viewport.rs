//! Output surface size tracking.

use crate::camera::Camera;

/// Size of the output surface in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// A viewport of `width × height`; zero dimensions are raised to 1.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Width in physical pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in physical pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width over height.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Resize to exactly `width × height` and update the camera aspect.
    ///
    /// Zero-sized dimensions (a minimised window) are ignored and return
    /// `false`.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        camera: &mut Camera,
    ) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.width = width;
        self.height = height;
        camera.resize(width, height);
        true
    }
}
