//! A tiny kinematic physics world for the demo.
//!
//! Bodies move with constant linear and angular velocity under gravity and
//! bounce off the ground plane at `y = 0`. There are no collisions between
//! bodies.

use std::collections::HashMap;

use scene_ecs::BodyHandle;
use scene_math::{Mat4, Quat, Vec3};
use scene_systems::PhysicsWorld;
use tracing::warn;

/// Downward acceleration, in units per second squared.
pub const GRAVITY: f32 = 9.81;

/// State of one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicBody {
    /// World position of the body's center.
    pub position: Vec3,
    /// World orientation.
    pub rotation: Quat,
    /// Linear velocity in units per second.
    pub velocity: Vec3,
    /// Axis scaled by radians per second.
    pub spin: Vec3,
    /// Fraction of vertical speed kept after hitting the ground.
    pub restitution: f32,
    /// Half the body's height; the ground stops it at this altitude.
    pub half_height: f32,
    /// Whether [`GRAVITY`] and the ground plane act on the body.
    pub gravity: bool,
}

impl KinematicBody {
    /// A body at rest at `position`, unaffected by gravity.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            spin: Vec3::ZERO,
            restitution: 0.5,
            half_height: 0.5,
            gravity: false,
        }
    }

    /// Set the initial linear velocity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the spin: rotation axis scaled by radians per second.
    #[must_use]
    pub fn with_spin(mut self, spin: Vec3) -> Self {
        self.spin = spin;
        self
    }

    /// Let gravity and the ground plane act on the body.
    #[must_use]
    pub fn falling(mut self) -> Self {
        self.gravity = true;
        self
    }

    /// The body's world transform.
    #[must_use]
    pub fn pose(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    fn integrate(&mut self, dt: f32) {
        if self.gravity {
            self.velocity.y -= GRAVITY * dt;
        }
        self.position += self.velocity * dt;

        let angle = self.spin.length() * dt;
        if angle > 0.0 {
            let turn = Quat::from_axis_angle(self.spin.normalize(), angle);
            self.rotation = (turn * self.rotation).normalize();
        }

        if self.gravity && self.position.y < self.half_height {
            self.position.y = self.half_height;
            if self.velocity.y < 0.0 {
                self.velocity.y = -self.velocity.y * self.restitution;
            }
        }
    }
}

/// Owns every body and hands out sequential handles.
#[derive(Debug, Default)]
pub struct KinematicWorld {
    bodies: HashMap<BodyHandle, KinematicBody>,
    next: u64,
}

impl KinematicWorld {
    /// Create an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body and return its handle.
    pub fn spawn(&mut self, body: KinematicBody) -> BodyHandle {
        self.next += 1;
        let handle = BodyHandle(self.next);
        self.bodies.insert(handle, body);
        handle
    }

    /// The state of a body, if it exists.
    #[must_use]
    pub fn body(&self, handle: BodyHandle) -> Option<&KinematicBody> {
        self.bodies.get(&handle)
    }

    /// Number of bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Advance every body by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        for body in self.bodies.values_mut() {
            body.integrate(dt);
        }
    }
}

impl PhysicsWorld for KinematicWorld {
    fn body_pose(&self, handle: BodyHandle) -> Mat4 {
        match self.bodies.get(&handle) {
            Some(body) => body.pose(),
            None => {
                warn!(body = handle.raw(), "unknown body, using identity");
                Mat4::IDENTITY
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;

    #[test]
    fn test_constant_velocity() {
        let mut world = KinematicWorld::new();
        let h = world.spawn(KinematicBody::at(Vec3::ZERO).with_velocity(Vec3::new(2.0, 0.0, 0.0)));
        world.step(0.5);
        world.step(0.5);
        assert!(world.body(h).unwrap().position.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn test_spin_rotates_pose() {
        let mut world = KinematicWorld::new();
        let h = world.spawn(KinematicBody::at(Vec3::ZERO).with_spin(Vec3::new(0.0, PI, 0.0)));
        world.step(0.5);
        let turned = world.body_pose(h).transform_vector3(Vec3::X);
        assert!(turned.abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn test_falling_body_stops_at_ground() {
        let mut world = KinematicWorld::new();
        let h = world.spawn(KinematicBody::at(Vec3::new(0.0, 3.0, 0.0)).falling());
        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }
        let body = world.body(h).unwrap();
        assert!(body.position.y >= body.half_height);
        assert!(body.position.y < 3.0);
    }

    #[test]
    fn test_handles_are_sequential() {
        let mut world = KinematicWorld::new();
        let a = world.spawn(KinematicBody::at(Vec3::ZERO));
        let b = world.spawn(KinematicBody::at(Vec3::ONE));
        assert_eq!((a, b), (BodyHandle(1), BodyHandle(2)));
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn test_unknown_body_is_identity() {
        assert_eq!(KinematicWorld::new().body_pose(BodyHandle(9)), Mat4::IDENTITY);
    }
}
