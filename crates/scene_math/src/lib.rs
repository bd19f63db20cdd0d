//! # scene_math
//!
//! Math types for the scene ECS core. Re-exports [`glam`] for linear algebra
//! and defines the spatial types the transform and culling passes share:
//!
//! - [`Transform3D`]: position, rotation and scale with a fixed composition order.
//! - [`Aabb`]: axis-aligned bounding boxes and their world-space transform.
//! - [`Frustum`]: six-plane view volume extracted from a view-projection matrix.

pub mod bounds;
pub mod frustum;
pub mod transform;

// Re-export glam types for convenience.
pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

pub use bounds::Aabb;
pub use frustum::{Frustum, Plane};
pub use transform::Transform3D;
