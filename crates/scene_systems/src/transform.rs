//! Physics → transform synchronisation.
//!
//! Physics-driven entities take the physics pose as their local matrix for
//! the frame. The pose overwrites the matrix directly, so an entity's
//! position/rotation/scale fields are not updated by this pass.

use scene_ecs::{EntityId, EntityRegistry, PhysicsBody, RegistryError};
use tracing::trace;

use crate::collaborators::PhysicsWorld;
use crate::error::SystemError;

/// Copies body poses from the physics world into entity transforms.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransformSystem;

impl TransformSystem {
    /// Create the system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Run the pass. Returns the number of entities synced.
    ///
    /// Bodies are queried fresh every frame.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::Registry`] if an indexed entity is missing,
    /// which means the registry was corrupted.
    pub fn update(
        &self,
        registry: &mut EntityRegistry,
        physics: &dyn PhysicsWorld,
        _dt: f32,
    ) -> Result<usize, SystemError> {
        let bodies: Vec<(EntityId, PhysicsBody)> = registry
            .entities_with::<PhysicsBody>()
            .into_iter()
            .filter_map(|id| registry.get_component::<PhysicsBody>(id).map(|b| (id, *b)))
            .collect();

        for &(id, body) in &bodies {
            let pose = physics.body_pose(body.handle);
            registry
                .entity_mut(id)
                .ok_or(RegistryError::UnknownEntity(id))?
                .set_local_matrix(pose);
            trace!(entity = id.id(), body = body.handle.raw(), "synced body pose");
        }

        Ok(bodies.len())
    }
}

#[cfg(test)]
mod tests {
    use scene_ecs::BodyHandle;
    use scene_math::{Mat4, Quat, Vec3};

    use super::*;
    use crate::collaborators::PoseTable;

    #[test]
    fn test_pose_becomes_local_and_global_matrix() {
        let mut reg = EntityRegistry::new();
        let e = reg.create_entity("crate", None).unwrap();
        reg.add_component(e, PhysicsBody::new(BodyHandle(7))).unwrap();

        let mut physics = PoseTable::new();
        physics.set_pose(BodyHandle(7), Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));

        let synced = TransformSystem::new().update(&mut reg, &physics, 1.0 / 60.0).unwrap();
        assert_eq!(synced, 1);

        let translation = reg.global_matrix(e).unwrap().w_axis.truncate();
        assert_eq!(translation, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_entities_without_body_are_untouched() {
        let mut reg = EntityRegistry::new();
        let still = reg.create_entity("still", None).unwrap();
        reg.entity_mut(still).unwrap().set_position(Vec3::new(0.0, 9.0, 0.0));
        let before = reg.entity(still).unwrap().local_matrix();

        let synced = TransformSystem::new().update(&mut reg, &PoseTable::new(), 0.016).unwrap();
        assert_eq!(synced, 0);
        assert_eq!(reg.entity(still).unwrap().local_matrix(), before);
    }

    #[test]
    fn test_pose_replaces_local_state_each_frame() {
        let mut reg = EntityRegistry::new();
        let e = reg.create_entity("ball", None).unwrap();
        reg.entity_mut(e).unwrap().set_position(Vec3::new(100.0, 0.0, 0.0));
        reg.add_component(e, PhysicsBody::new(BodyHandle(1))).unwrap();

        let mut physics = PoseTable::new();
        let system = TransformSystem::new();
        for step in 1..=3 {
            let pose = Mat4::from_rotation_translation(
                Quat::from_rotation_y(0.1 * step as f32),
                Vec3::new(0.0, step as f32, 0.0),
            );
            physics.set_pose(BodyHandle(1), pose);
            system.update(&mut reg, &physics, 0.016).unwrap();
            assert_eq!(reg.global_matrix(e).unwrap(), pose);
        }
    }

    #[test]
    fn test_body_under_parent_composes_with_parent() {
        let mut reg = EntityRegistry::new();
        let parent = reg.create_entity("ship", None).unwrap();
        reg.entity_mut(parent).unwrap().set_position(Vec3::new(10.0, 0.0, 0.0));
        let child = reg.create_entity("turret", Some(parent)).unwrap();
        reg.add_component(child, PhysicsBody::new(BodyHandle(2))).unwrap();

        let mut physics = PoseTable::new();
        physics.set_pose(BodyHandle(2), Mat4::from_translation(Vec3::Y));
        TransformSystem::new().update(&mut reg, &physics, 0.016).unwrap();

        let translation = reg.global_matrix(child).unwrap().w_axis.truncate();
        assert_eq!(translation, Vec3::new(10.0, 1.0, 0.0));
    }
}
