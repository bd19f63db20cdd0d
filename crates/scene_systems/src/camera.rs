//! Perspective camera and the camera update pass.

use scene_math::{Frustum, Mat4, Quat, Vec3};
use tracing::trace;

use crate::collaborators::Camera;

/// A right-handed perspective camera looking from `eye` at `target`.
///
/// An optional orbit speed turns the eye around `target` about `up` each
/// update, which is enough of a controller for demos and turntables.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Camera position.
    pub eye: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Up direction.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport width / height.
    pub aspect: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Orbit speed around `target`, in radians per second.
    pub orbit_speed: f32,
}

impl PerspectiveCamera {
    /// A camera at `eye` looking at `target` with a 60° field of view.
    #[must_use]
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            fov_y: 60f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            orbit_speed: 0.0,
        }
    }

    /// Set the orbit speed in radians per second.
    #[must_use]
    pub fn with_orbit_speed(mut self, radians_per_second: f32) -> Self {
        self.orbit_speed = radians_per_second;
        self
    }

    /// World → view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// View → clip matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// `projection * view`.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Camera for PerspectiveCamera {
    fn view_frustum(&self) -> Frustum {
        Frustum::from_view_projection(&self.view_projection())
    }

    fn update(&mut self, dt: f32) {
        if self.orbit_speed == 0.0 {
            return;
        }
        let turn = Quat::from_axis_angle(self.up.normalize(), self.orbit_speed * dt);
        self.eye = self.target + turn * (self.eye - self.target);
    }
}

/// Advances the camera once per frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct UpdateCameraSystem;

impl UpdateCameraSystem {
    /// Create the system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Run the pass.
    pub fn update(&self, camera: &mut dyn Camera, dt: f32) {
        trace!(dt, "updating camera");
        camera.update(dt);
    }
}
