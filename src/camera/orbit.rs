use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::{control::CameraControl, core::Camera};
use crate::model::Aabb;
use crate::options::CameraOptions;

/// Keeps the polar angle away from the poles so `look_at` never degenerates.
const POLAR_EPSILON: f32 = 1e-6;

/// Padding applied to the bounding-sphere fit distance.
const FIT_PADDING: f32 = 1.5;

/// Orbit controls: a camera revolving around a target on a sphere.
///
/// Spherical coordinates follow the usual Y-up convention: `theta` is the
/// azimuth around +Y measured from +Z, `phi` the polar angle from +Y.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    target: Vec3,
    radius: f32,
    theta: f32,
    phi: f32,
    auto_rotate: bool,
    /// Orbits per minute at 60 frames per second are `speed / 2`.
    auto_rotate_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitControls {
    /// Camera at `distance` on +Z looking at the origin.
    #[must_use]
    pub fn new(distance: f32) -> Self {
        Self {
            target: Vec3::ZERO,
            radius: distance,
            theta: 0.0,
            phi: PI / 2.0,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }

    /// Build orbit controls from camera options.
    #[must_use]
    pub fn from_options(options: &CameraOptions) -> Self {
        let mut controls = Self::new(options.distance.unwrap_or(5.0));
        controls.auto_rotate_speed = options.auto_rotate_speed;
        controls.zoom_speed = options.zoom_speed;
        controls.min_distance = options.min_distance;
        controls.max_distance = options.max_distance;
        controls.radius = controls.clamp_radius(controls.radius);
        controls
    }

    /// The point the camera orbits.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Distance from the target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.radius
    }

    /// Azimuth in radians.
    #[must_use]
    pub fn theta(&self) -> f32 {
        self.theta
    }

    /// Polar angle in radians.
    #[must_use]
    pub fn phi(&self) -> f32 {
        self.phi
    }

    /// World-space eye position.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + Vec3::new(
                self.radius * sin_phi * self.theta.sin(),
                self.radius * self.phi.cos(),
                self.radius * sin_phi * self.theta.cos(),
            )
    }

    /// Angle swept by one auto-rotation step.
    #[must_use]
    pub fn auto_rotation_angle(&self) -> f32 {
        TAU / 60.0 / 60.0 * self.auto_rotate_speed
    }

    /// Frame a model with the given bounds.
    ///
    /// With a fixed `distance` the camera keeps orbiting the origin at that
    /// distance; otherwise it centres on the bounds and backs off until the
    /// bounding sphere fits the vertical field of view.
    pub fn fit_to_bounds(
        &mut self,
        bounds: &Aabb,
        fovy_degrees: f32,
        distance: Option<f32>,
    ) {
        if let Some(distance) = distance {
            self.target = Vec3::ZERO;
            self.radius = self.clamp_radius(distance);
            return;
        }

        let radius = bounds.radius();
        self.target = bounds.center();
        if radius <= 0.0 {
            return;
        }
        let half_fov = (fovy_degrees.to_radians() / 2.0).max(POLAR_EPSILON);
        self.radius = self.clamp_radius(radius / half_fov.tan() * FIT_PADDING);
    }

    /// Write the orbit pose into a projection camera.
    pub fn apply_to(&self, camera: &mut Camera) {
        camera.eye = self.eye();
        camera.target = self.target;
        camera.up = Vec3::Y;
    }

    /// NaN limits are ignored; an inverted pair resolves to `max_distance`.
    fn clamp_radius(&self, radius: f32) -> f32 {
        radius.max(self.min_distance).min(self.max_distance)
    }

    fn set_phi(&mut self, phi: f32) {
        self.phi = phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
    }
}

impl CameraControl for OrbitControls {
    fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate = enabled;
    }

    fn update(&mut self) -> bool {
        if !self.auto_rotate {
            return false;
        }
        let angle = self.auto_rotation_angle();
        self.rotate_left(angle);
        angle != 0.0
    }

    fn rotate_left(&mut self, angle: f32) {
        self.theta -= angle;
    }

    fn rotate_up(&mut self, angle: f32) {
        self.set_phi(self.phi - angle);
    }

    fn zoom(&mut self, delta: f32) {
        let scale = 0.95_f32.powf(self.zoom_speed);
        self.radius = self.clamp_radius(self.radius * scale.powf(delta));
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn assert_vec_near(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn starts_on_positive_z() {
        let controls = OrbitControls::new(500.0);
        assert_vec_near(controls.eye(), Vec3::new(0.0, 0.0, 500.0));
        assert!(!controls.auto_rotate());
    }

    #[test]
    fn rotate_left_orbits_around_y() {
        let mut controls = OrbitControls::new(10.0);
        controls.rotate_left(FRAC_PI_2);
        assert_vec_near(controls.eye(), Vec3::new(-10.0, 0.0, 0.0));
    }

    #[test]
    fn rotate_up_clamps_at_the_pole() {
        let mut controls = OrbitControls::new(10.0);
        controls.rotate_up(10.0);
        assert!(controls.phi() > 0.0);
        assert_vec_near(controls.eye(), Vec3::new(0.0, 10.0, 0.0));

        controls.rotate_up(-10.0);
        assert!(controls.phi() < PI);
        assert_vec_near(controls.eye(), Vec3::new(0.0, -10.0, 0.0));
    }

    #[test]
    fn update_only_moves_while_auto_rotating() {
        let mut controls = OrbitControls::new(10.0);
        assert!(!controls.update());
        assert_eq!(controls.theta(), 0.0);

        controls.set_auto_rotate(true);
        assert!(controls.update());
        let step = TAU / 60.0 / 60.0 * 2.0;
        assert!((controls.theta() + step).abs() < 1e-6);
    }

    #[test]
    fn zoom_respects_distance_limits() {
        let options = CameraOptions {
            distance: Some(10.0),
            min_distance: 5.0,
            max_distance: 12.0,
            ..CameraOptions::default()
        };
        let mut controls = OrbitControls::from_options(&options);
        controls.zoom(100.0);
        assert_eq!(controls.distance(), 5.0);
        controls.zoom(-100.0);
        assert_eq!(controls.distance(), 12.0);
    }

    #[test]
    fn fit_without_distance_centres_on_bounds() {
        let mut controls = OrbitControls::new(1.0);
        let bounds = Aabb {
            min: Vec3::new(-1.0, -1.0, -1.0),
            max: Vec3::new(3.0, 1.0, 1.0),
        };
        controls.fit_to_bounds(&bounds, 90.0, None);
        assert_vec_near(controls.target(), Vec3::new(1.0, 0.0, 0.0));
        let expected = 6.0_f32.sqrt() * FIT_PADDING;
        assert!((controls.distance() - expected).abs() < 1e-3);
    }

    #[test]
    fn fit_with_fixed_distance_orbits_origin() {
        let mut controls = OrbitControls::new(1.0);
        let bounds = Aabb {
            min: Vec3::ONE,
            max: Vec3::splat(2.0),
        };
        controls.fit_to_bounds(&bounds, 75.0, Some(25.0));
        assert_eq!(controls.target(), Vec3::ZERO);
        assert_eq!(controls.distance(), 25.0);
    }

    #[test]
    fn inverted_or_nan_limits_do_not_panic() {
        let inverted = CameraOptions {
            distance: Some(30.0),
            min_distance: 50.0,
            max_distance: 10.0,
            ..CameraOptions::default()
        };
        let mut controls = OrbitControls::from_options(&inverted);
        assert_eq!(controls.distance(), 10.0);
        controls.zoom(3.0);
        assert_eq!(controls.distance(), 10.0);

        let nan = CameraOptions {
            distance: Some(30.0),
            min_distance: f32::NAN,
            max_distance: f32::NAN,
            ..CameraOptions::default()
        };
        assert_eq!(OrbitControls::from_options(&nan).distance(), 30.0);
    }

    #[test]
    fn apply_to_copies_pose() {
        let controls = OrbitControls::new(7.0);
        let mut camera =
            Camera::from_options(&CameraOptions::default(), 1.0);
        controls.apply_to(&mut camera);
        assert_vec_near(camera.eye, Vec3::new(0.0, 0.0, 7.0));
        assert_eq!(camera.target, Vec3::ZERO);
        assert_eq!(camera.up, Vec3::Y);
    }
}
