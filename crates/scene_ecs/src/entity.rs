//! Entity identifiers and scene-graph nodes.
//!
//! An [`EntityId`] is a lightweight `u64` handle. The [`Entity`] it refers to
//! is a node in the scene graph: a name, a local transform, the cached world
//! matrix, and links to its parent and children. Entities are owned by the
//! [`EntityRegistry`](crate::EntityRegistry); hierarchy links are ids, never
//! owning pointers.

use std::fmt;

use scene_math::{Mat4, Quat, Transform3D, Vec3};
use serde::{Deserialize, Serialize};

use crate::component::ComponentKind;

/// A unique entity identifier.
///
/// Ids are allocated sequentially by the registry and never reused, so a
/// stale id can only ever miss, never alias a newer entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// The null / invalid entity sentinel.
    pub const INVALID: EntityId = EntityId(0);

    /// Create an entity id from a raw `u64`.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Returns `true` if this is a valid (non-zero) id.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates monotonically increasing entity ids. Ids are never recycled.
#[derive(Debug)]
pub struct EntityAllocator {
    next_id: u64,
}

impl EntityAllocator {
    /// Creates a new allocator. Ids start at 1 (0 is reserved for [`EntityId::INVALID`]).
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Allocates a fresh entity id.
    pub fn allocate(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        EntityId(id)
    }

    /// Returns the number of ids allocated so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.next_id - 1
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether an entity's cached global matrix reflects its current local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixState {
    /// The cached global matrix was computed after the last local change.
    Clean,
    /// The local transform or parent changed since the last recompute.
    Dirty,
}

/// A node in the scene graph.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    name: String,
    transform: Transform3D,
    local_matrix: Mat4,
    global_matrix: Mat4,
    state: MatrixState,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    components: Vec<ComponentKind>,
}

impl Entity {
    pub(crate) fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            transform: Transform3D::IDENTITY,
            local_matrix: Mat4::IDENTITY,
            global_matrix: Mat4::IDENTITY,
            state: MatrixState::Dirty,
            parent: None,
            children: Vec::new(),
            components: Vec::new(),
        }
    }

    /// This entity's id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The entity's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position relative to the parent.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Rotation relative to the parent.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    /// Scale relative to the parent.
    #[must_use]
    pub fn scale(&self) -> Vec3 {
        self.transform.scale
    }

    /// Set the local position. Writing the current value changes nothing.
    pub fn set_position(&mut self, position: Vec3) {
        if self.transform.position == position {
            return;
        }
        self.transform.position = position;
        self.rebuild_local_matrix();
    }

    /// Set the local rotation. Writing the current value changes nothing.
    pub fn set_rotation(&mut self, rotation: Quat) {
        if self.transform.rotation == rotation {
            return;
        }
        self.transform.rotation = rotation;
        self.rebuild_local_matrix();
    }

    /// Set the local rotation from Euler angles in radians (X, then Y, then Z).
    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.set_rotation(Transform3D::euler_rotation(x, y, z));
    }

    /// Set the local scale. Writing the current value changes nothing.
    pub fn set_scale(&mut self, scale: Vec3) {
        if self.transform.scale == scale {
            return;
        }
        self.transform.scale = scale;
        self.rebuild_local_matrix();
    }

    /// The local matrix: scale, then rotation, then translation.
    #[must_use]
    pub fn local_matrix(&self) -> Mat4 {
        self.local_matrix
    }

    /// Overwrite the local matrix directly.
    ///
    /// Position, rotation, and scale are left untouched; the next setter call
    /// rebuilds the matrix from them again.
    pub fn set_local_matrix(&mut self, matrix: Mat4) {
        self.local_matrix = matrix;
        self.state = MatrixState::Dirty;
    }

    /// The last computed global matrix.
    ///
    /// This does not recompute. Use
    /// [`EntityRegistry::global_matrix`](crate::EntityRegistry::global_matrix)
    /// for a value that reflects the current hierarchy.
    #[must_use]
    pub fn global_matrix(&self) -> Mat4 {
        self.global_matrix
    }

    /// Current matrix cache state.
    #[must_use]
    pub fn state(&self) -> MatrixState {
        self.state
    }

    /// Returns `true` if the local state changed since the last recompute.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state == MatrixState::Dirty
    }

    /// The parent, if any.
    #[must_use]
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Children in the order they were attached.
    #[must_use]
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Kinds of the components this entity owns, in insertion order.
    #[must_use]
    pub fn component_kinds(&self) -> &[ComponentKind] {
        &self.components
    }

    /// Returns `true` if the entity owns a component of `kind`.
    #[must_use]
    pub fn has_kind(&self, kind: ComponentKind) -> bool {
        self.components.contains(&kind)
    }

    fn rebuild_local_matrix(&mut self) {
        self.local_matrix = self.transform.to_matrix();
        self.state = MatrixState::Dirty;
    }

    // -- Registry-only mutation --

    pub(crate) fn store_global(&mut self, global: Mat4) {
        self.global_matrix = global;
        self.state = MatrixState::Clean;
    }

    pub(crate) fn set_parent_link(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
        self.state = MatrixState::Dirty;
    }

    pub(crate) fn push_child(&mut self, child: EntityId) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: EntityId) {
        self.children.retain(|&c| c != child);
    }

    pub(crate) fn push_kind(&mut self, kind: ComponentKind) {
        self.components.push(kind);
    }

    pub(crate) fn remove_kind(&mut self, kind: ComponentKind) {
        self.components.retain(|&k| k != kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_creation() {
        let e = EntityId::from_raw(42);
        assert_eq!(e.id(), 42);
        assert!(e.is_valid());
        assert_eq!(e.to_string(), "Entity(42)");
    }

    #[test]
    fn test_entity_id_invalid() {
        assert!(!EntityId::INVALID.is_valid());
        assert_eq!(EntityId::INVALID.id(), 0);
    }

    #[test]
    fn test_allocator_produces_sequential_ids() {
        let mut alloc = EntityAllocator::new();
        assert_eq!(alloc.allocate(), EntityId(1));
        assert_eq!(alloc.allocate(), EntityId(2));
        assert_eq!(alloc.allocate(), EntityId(3));
        assert_eq!(alloc.count(), 3);
    }

    #[test]
    fn test_new_entity_has_identity_local_matrix() {
        let e = Entity::new(EntityId(1), "root");
        assert_eq!(e.local_matrix(), Mat4::IDENTITY);
        assert_eq!(e.name(), "root");
        assert!(e.parent().is_none());
        assert!(e.children().is_empty());
    }

    #[test]
    fn test_set_position_rebuilds_local_matrix_and_marks_dirty() {
        let mut e = Entity::new(EntityId(1), "e");
        assert_eq!(e.state(), MatrixState::Dirty);
        e.store_global(Mat4::IDENTITY);
        assert_eq!(e.state(), MatrixState::Clean);

        e.set_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(e.state(), MatrixState::Dirty);
        assert_eq!(e.local_matrix(), Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_writing_current_values_is_a_no_op() {
        let mut e = Entity::new(EntityId(1), "e");
        e.set_position(Vec3::new(1.0, 0.0, 0.0));
        e.store_global(e.local_matrix());
        let local = e.local_matrix();

        e.set_position(Vec3::new(1.0, 0.0, 0.0));
        e.set_rotation(Quat::IDENTITY);
        e.set_scale(Vec3::ONE);

        assert!(!e.is_dirty());
        assert_eq!(e.local_matrix(), local);
        assert_eq!(e.global_matrix(), local);
    }

    #[test]
    fn test_set_local_matrix_keeps_trs_fields() {
        let mut e = Entity::new(EntityId(1), "body");
        let pose = Mat4::from_translation(Vec3::new(4.0, 5.0, 6.0));
        e.set_local_matrix(pose);
        assert_eq!(e.local_matrix(), pose);
        assert_eq!(e.position(), Vec3::ZERO);
        assert!(e.is_dirty());
    }
}
