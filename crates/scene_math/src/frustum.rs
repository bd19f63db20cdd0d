//! View frustum and plane tests for culling.
//!
//! Planes are extracted from a view-projection matrix (Gribb/Hartmann). The
//! near plane assumes glam's `[0, 1]` clip-space depth range, which is what
//! `Mat4::perspective_rh` and friends produce.

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::bounds::Aabb;

/// A plane `normal · p + d = 0`. Points with positive distance are in front.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Plane {
    /// Unit normal pointing into the kept half-space.
    pub normal: Vec3,
    /// Signed offset from the origin.
    pub d: f32,
}

impl Plane {
    /// Build a plane from raw `(a, b, c, d)` coefficients, normalising them.
    #[must_use]
    pub fn from_coefficients(v: Vec4) -> Self {
        let normal = v.truncate();
        let len = normal.length();
        if len > 0.0 {
            Self {
                normal: normal / len,
                d: v.w / len,
            }
        } else {
            Self { normal, d: v.w }
        }
    }

    /// Signed distance from the plane to `point`.
    #[must_use]
    pub fn distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.d
    }
}

/// Six inward-facing planes: left, right, bottom, top, near, far.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Frustum {
    /// The bounding planes.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract the frustum planes from a combined `projection * view` matrix.
    #[must_use]
    pub fn from_view_projection(view_projection: &Mat4) -> Self {
        let r0 = view_projection.row(0);
        let r1 = view_projection.row(1);
        let r2 = view_projection.row(2);
        let r3 = view_projection.row(3);
        Self {
            planes: [
                Plane::from_coefficients(r3 + r0),
                Plane::from_coefficients(r3 - r0),
                Plane::from_coefficients(r3 + r1),
                Plane::from_coefficients(r3 - r1),
                Plane::from_coefficients(r2),
                Plane::from_coefficients(r3 - r2),
            ],
        }
    }

    /// Returns `true` if `point` is inside or on every plane.
    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|p| p.distance(point) >= 0.0)
    }

    /// Returns `true` if the box is inside or straddles the frustum.
    ///
    /// Uses the positive-vertex test: a box is rejected only when its corner
    /// furthest along a plane's normal is still behind that plane. This is
    /// conservative near frustum edges.
    #[must_use]
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.planes.iter().all(|plane| {
            let positive = Vec3::select(plane.normal.cmpge(Vec3::ZERO), aabb.max, aabb.min);
            plane.distance(positive) >= 0.0
        })
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn looking_down_negative_z() -> Frustum {
        let proj = Mat4::perspective_rh(FRAC_PI_2, 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        Frustum::from_view_projection(&(proj * view))
    }

    #[test]
    fn test_point_in_front_is_inside() {
        let f = looking_down_negative_z();
        assert!(f.contains_point(Vec3::new(0.0, 0.0, -10.0)));
        assert!(!f.contains_point(Vec3::new(0.0, 0.0, 10.0)));
        assert!(!f.contains_point(Vec3::new(0.0, 0.0, -200.0)));
    }

    #[test]
    fn test_box_in_front_intersects() {
        let f = looking_down_negative_z();
        let b = Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, -10.0), Vec3::ONE);
        assert!(f.intersects_aabb(&b));
    }

    #[test]
    fn test_box_behind_camera_is_culled() {
        let f = looking_down_negative_z();
        let b = Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, 10.0), Vec3::ONE);
        assert!(!f.intersects_aabb(&b));
    }

    #[test]
    fn test_box_far_to_the_side_is_culled() {
        let f = looking_down_negative_z();
        // 90° fov: at depth 10 the half-width is 10.
        let b = Aabb::from_center_half_extents(Vec3::new(50.0, 0.0, -10.0), Vec3::ONE);
        assert!(!f.intersects_aabb(&b));
    }

    #[test]
    fn test_box_straddling_edge_intersects() {
        let f = looking_down_negative_z();
        let b = Aabb::from_center_half_extents(Vec3::new(10.5, 0.0, -10.0), Vec3::ONE);
        assert!(f.intersects_aabb(&b));
    }
}
