//! Interfaces to the world outside the ECS.
//!
//! The physics engine, camera, material library, and renderer are owned by
//! the application. Systems reach them only through these traits. Small
//! in-memory implementations are provided for tools, demos, and tests.

use std::collections::HashMap;

use scene_ecs::{BodyHandle, MaterialHandle, MeshHandle};
use scene_math::{Aabb, Frustum, Mat4};
use tracing::warn;

/// Source of authoritative body poses.
pub trait PhysicsWorld {
    /// World-space transform of the body.
    fn body_pose(&self, handle: BodyHandle) -> Mat4;
}

/// Source of the view volume used for culling.
pub trait Camera {
    /// The current view frustum.
    fn view_frustum(&self) -> Frustum;

    /// Advance controllers attached to the camera.
    fn update(&mut self, _dt: f32) {}
}

/// Resolves materials by name.
pub trait MaterialLibrary {
    /// The material registered under `name`, if any.
    fn material_by_name(&self, name: &str) -> Option<MaterialHandle>;
}

/// Consumer of visible mesh instances.
pub trait Renderer {
    /// Drop the instances submitted for the previous frame.
    fn clear(&mut self);

    /// Queue one mesh instance for drawing.
    fn add_mesh_instance(
        &mut self,
        mesh: MeshHandle,
        material: MaterialHandle,
        world: Mat4,
        world_bounds: Aabb,
    );
}

/// A body-handle → pose map, for kinematic scenes and tests.
///
/// Unknown handles resolve to the identity pose.
#[derive(Debug, Default, Clone)]
pub struct PoseTable {
    poses: HashMap<BodyHandle, Mat4>,
}

impl PoseTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pose of a body.
    pub fn set_pose(&mut self, handle: BodyHandle, pose: Mat4) {
        self.poses.insert(handle, pose);
    }

    /// Number of bodies with a pose.
    #[must_use]
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Returns `true` if no body has a pose.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

impl PhysicsWorld for PoseTable {
    fn body_pose(&self, handle: BodyHandle) -> Mat4 {
        match self.poses.get(&handle) {
            Some(pose) => *pose,
            None => {
                warn!(body = handle.raw(), "no pose for body, using identity");
                Mat4::IDENTITY
            }
        }
    }
}

/// A name → material map.
#[derive(Debug, Default, Clone)]
pub struct NamedMaterialLibrary {
    materials: HashMap<String, MaterialHandle>,
}

impl NamedMaterialLibrary {
    /// Create an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material, replacing any previous one with the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, handle: MaterialHandle) -> Self {
        self.insert(name, handle);
        self
    }

    /// Register a material, replacing any previous one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, handle: MaterialHandle) {
        self.materials.insert(name.into(), handle);
    }
}

impl MaterialLibrary for NamedMaterialLibrary {
    fn material_by_name(&self, name: &str) -> Option<MaterialHandle> {
        self.materials.get(name).copied()
    }
}

/// One draw instance as submitted by the pre-render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshInstance {
    /// The mesh primitive to draw.
    pub mesh: MeshHandle,
    /// Material to draw it with.
    pub material: MaterialHandle,
    /// Mesh space → world space.
    pub world: Mat4,
    /// The mesh bounds in world space.
    pub world_bounds: Aabb,
}

/// A renderer that only records what it is given.
#[derive(Debug, Default, Clone)]
pub struct InstanceList {
    instances: Vec<MeshInstance>,
    clears: u64,
}

impl InstanceList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Instances submitted since the last clear, in submission order.
    #[must_use]
    pub fn instances(&self) -> &[MeshInstance] {
        &self.instances
    }

    /// How many times the list has been cleared.
    #[must_use]
    pub fn clear_count(&self) -> u64 {
        self.clears
    }
}

impl Renderer for InstanceList {
    fn clear(&mut self) {
        self.instances.clear();
        self.clears += 1;
    }

    fn add_mesh_instance(
        &mut self,
        mesh: MeshHandle,
        material: MaterialHandle,
        world: Mat4,
        world_bounds: Aabb,
    ) {
        self.instances.push(MeshInstance {
            mesh,
            material,
            world,
            world_bounds,
        });
    }
}

#[cfg(test)]
mod tests {
    use scene_math::Vec3;

    use super::*;

    #[test]
    fn test_pose_table_returns_stored_pose() {
        let mut table = PoseTable::new();
        let pose = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        table.set_pose(BodyHandle(1), pose);
        assert_eq!(table.body_pose(BodyHandle(1)), pose);
        assert_eq!(table.body_pose(BodyHandle(2)), Mat4::IDENTITY);
    }

    #[test]
    fn test_material_library_lookup() {
        let lib = NamedMaterialLibrary::new().with("M_Default", MaterialHandle(0));
        assert_eq!(lib.material_by_name("M_Default"), Some(MaterialHandle(0)));
        assert_eq!(lib.material_by_name("M_Missing"), None);
    }

    #[test]
    fn test_instance_list_clear() {
        let mut list = InstanceList::new();
        list.add_mesh_instance(MeshHandle(1), MaterialHandle(1), Mat4::IDENTITY, Aabb::UNIT);
        assert_eq!(list.instances().len(), 1);
        list.clear();
        assert!(list.instances().is_empty());
        assert_eq!(list.clear_count(), 1);
    }
}
