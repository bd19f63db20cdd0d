//! Kind-indexed component storage.
//!
//! One column per [`ComponentKind`]. Each column maps the owning entity to its
//! component and preserves insertion order, so kind queries return owners in
//! the order their components were added. Removal shifts later entries down
//! rather than swapping, keeping that order stable.

use indexmap::{IndexMap, IndexSet};

use crate::component::{ComponentKind, ComponentRef, TagId};
use crate::components::{Material, Model, ModelMesh, Name, PhysicsBody};
use crate::entity::EntityId;

/// Typed columns for every component kind.
#[derive(Debug, Default)]
pub struct ComponentStore {
    pub(crate) names: IndexMap<EntityId, Name>,
    pub(crate) models: IndexMap<EntityId, Model>,
    pub(crate) meshes: IndexMap<EntityId, ModelMesh>,
    pub(crate) materials: IndexMap<EntityId, Material>,
    pub(crate) bodies: IndexMap<EntityId, PhysicsBody>,
    pub(crate) tags: IndexMap<TagId, IndexSet<EntityId>>,
}

impl ComponentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the component of `kind` owned by `entity`.
    #[must_use]
    pub fn get_ref(&self, kind: ComponentKind, entity: EntityId) -> Option<ComponentRef<'_>> {
        match kind {
            ComponentKind::Name => self.names.get(&entity).map(ComponentRef::Name),
            ComponentKind::Model => self.models.get(&entity).map(ComponentRef::Model),
            ComponentKind::ModelMesh => self.meshes.get(&entity).map(ComponentRef::ModelMesh),
            ComponentKind::Material => self.materials.get(&entity).map(ComponentRef::Material),
            ComponentKind::PhysicsBody => self.bodies.get(&entity).map(ComponentRef::PhysicsBody),
            ComponentKind::Tag(tag) => self
                .tags
                .get(&tag)
                .is_some_and(|members| members.contains(&entity))
                .then_some(ComponentRef::Tag(tag)),
        }
    }

    /// Drop the component of `kind` owned by `entity`, whatever its type.
    ///
    /// Returns `true` if a component was removed.
    pub(crate) fn remove_kind(&mut self, kind: ComponentKind, entity: EntityId) -> bool {
        match kind {
            ComponentKind::Name => self.names.shift_remove(&entity).is_some(),
            ComponentKind::Model => self.models.shift_remove(&entity).is_some(),
            ComponentKind::ModelMesh => self.meshes.shift_remove(&entity).is_some(),
            ComponentKind::Material => self.materials.shift_remove(&entity).is_some(),
            ComponentKind::PhysicsBody => self.bodies.shift_remove(&entity).is_some(),
            ComponentKind::Tag(tag) => self
                .tags
                .get_mut(&tag)
                .is_some_and(|members| members.shift_remove(&entity)),
        }
    }

    /// Number of components stored under `kind`.
    #[must_use]
    pub fn count(&self, kind: ComponentKind) -> usize {
        match kind {
            ComponentKind::Name => self.names.len(),
            ComponentKind::Model => self.models.len(),
            ComponentKind::ModelMesh => self.meshes.len(),
            ComponentKind::Material => self.materials.len(),
            ComponentKind::PhysicsBody => self.bodies.len(),
            ComponentKind::Tag(tag) => self.tags.get(&tag).map_or(0, IndexSet::len),
        }
    }
}

#[cfg(test)]
mod tests {
    use scene_math::Aabb;

    use super::*;
    use crate::component::Component;
    use crate::handle::MeshHandle;

    #[test]
    fn test_columns_keep_insertion_order_after_removal() {
        let mut store = ComponentStore::new();
        for raw in [3, 1, 2] {
            ModelMesh::new(MeshHandle(raw), Aabb::UNIT).insert_into(&mut store, EntityId(raw));
        }
        assert!(store.remove_kind(ComponentKind::ModelMesh, EntityId(1)));
        assert_eq!(
            ModelMesh::owners(&store),
            vec![EntityId(3), EntityId(2)]
        );
        assert_eq!(store.count(ComponentKind::ModelMesh), 2);
    }

    #[test]
    fn test_get_ref_reports_kind() {
        let mut store = ComponentStore::new();
        Name::new("crate").insert_into(&mut store, EntityId(1));
        let found = store.get_ref(ComponentKind::Name, EntityId(1));
        assert_eq!(found.map(|c| c.kind()), Some(ComponentKind::Name));
        assert!(store.get_ref(ComponentKind::Material, EntityId(1)).is_none());
    }
}
