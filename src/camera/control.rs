/// The camera-control surface the interaction controller drives.
///
/// Angles are in radians. `update` advances one auto-rotation step; an
/// implementation may treat it as a no-op while `auto_rotate` is off, but
/// callers gate the call themselves rather than rely on that.
pub trait CameraControl {
    /// Whether the camera currently auto-rotates on `update`.
    fn auto_rotate(&self) -> bool;

    /// Enable or disable auto-rotation.
    fn set_auto_rotate(&mut self, enabled: bool);

    /// Advance the camera by one step. Returns `true` if the view changed.
    fn update(&mut self) -> bool;

    /// Orbit horizontally around the target.
    fn rotate_left(&mut self, angle: f32);

    /// Orbit vertically around the target.
    fn rotate_up(&mut self, angle: f32);

    /// Dolly towards (positive) or away from (negative) the target.
    fn zoom(&mut self, _delta: f32) {}
}
