//! Local transform state.
//!
//! [`Transform3D`] holds position, rotation, and scale relative to a parent.
//! The matrix it produces applies scale first, then rotation, then
//! translation. In glam's column-vector convention that is `T * R * S`.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, rotation, and per-axis scale of an entity relative to its parent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform3D {
    /// Translation relative to the parent.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Per-axis scale factor.
    pub scale: Vec3,
}

impl Transform3D {
    /// The identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a new transform from all three parts.
    #[must_use]
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Build a rotation from Euler angles in radians, applied X, then Y, then Z.
    #[must_use]
    pub fn euler_rotation(x: f32, y: f32, z: f32) -> Quat {
        Quat::from_euler(EulerRot::XYZ, x, y, z)
    }

    /// Compute the 4×4 local matrix: scale, then rotation, then translation.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn test_identity_transform() {
        let t = Transform3D::IDENTITY;
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_scale_applies_before_rotation_and_translation() {
        // Scale x by 2, rotate 90° about Z, then move by (10, 0, 0).
        let t = Transform3D::new(
            Vec3::new(10.0, 0.0, 0.0),
            Quat::from_rotation_z(FRAC_PI_2),
            Vec3::new(2.0, 1.0, 1.0),
        );
        let p = t.to_matrix().transform_point3(Vec3::X);
        // (1,0,0) -> scaled (2,0,0) -> rotated (0,2,0) -> translated (10,2,0).
        assert!(p.abs_diff_eq(Vec3::new(10.0, 2.0, 0.0), 1e-5));
    }

    #[test]
    fn test_euler_rotation_matches_axis_rotation() {
        let q = Transform3D::euler_rotation(0.0, FRAC_PI_2, 0.0);
        assert!(q.abs_diff_eq(Quat::from_rotation_y(FRAC_PI_2), 1e-6));
    }
}
