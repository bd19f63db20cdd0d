//! Concrete component types.

use std::fmt;
use std::marker::PhantomData;

use scene_math::Aabb;
use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentKind, Sealed, TagId, TagType};
use crate::entity::EntityId;
use crate::handle::{BodyHandle, MaterialHandle, MeshHandle, ModelHandle};
use crate::storage::ComponentStore;

/// A display name, shown by tools and logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Name {
    /// The entity's display name.
    pub value: String,
}

impl Name {
    /// Create a new name component.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { value: name.into() }
    }
}

/// The root of a loaded model. Its meshes hang below it as child entities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Model {
    /// Asset handle of the model.
    pub handle: ModelHandle,
    /// Source name or path the model was loaded from.
    pub source: String,
}

/// A renderable mesh primitive and its bounding box in mesh space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ModelMesh {
    /// The mesh primitive.
    pub mesh: MeshHandle,
    /// Bounds in the mesh's local space.
    pub bounds: Aabb,
}

impl ModelMesh {
    /// Create a mesh component.
    #[must_use]
    pub fn new(mesh: MeshHandle, bounds: Aabb) -> Self {
        Self { mesh, bounds }
    }
}

/// A material reference, by library name and resolved GPU handle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Material {
    /// Name the material was resolved from.
    pub name: String,
    /// GPU-resident material.
    pub handle: MaterialHandle,
}

impl Material {
    /// Create a material component.
    #[must_use]
    pub fn new(name: impl Into<String>, handle: MaterialHandle) -> Self {
        Self {
            name: name.into(),
            handle,
        }
    }
}

/// Links an entity to a body simulated by the physics world.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhysicsBody {
    /// The body in the physics world.
    pub handle: BodyHandle,
}

impl PhysicsBody {
    /// Create a physics body component.
    #[must_use]
    pub fn new(handle: BodyHandle) -> Self {
        Self { handle }
    }
}

/// A zero-sized marker component. `Tag<Player>` and `Tag<Enemy>` are
/// different kinds.
pub struct Tag<T: TagType>(PhantomData<T>);

impl<T: TagType> Tag<T> {
    const SHARED: &'static Self = &Tag(PhantomData);

    /// Create the marker.
    #[must_use]
    pub fn new() -> Self {
        Self(PhantomData)
    }

    /// The tag's id.
    #[must_use]
    pub fn id() -> TagId {
        TagId::of::<T>()
    }
}

impl<T: TagType> Default for Tag<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TagType> fmt::Debug for Tag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag<{}>", T::NAME)
    }
}

impl<T: TagType> PartialEq for Tag<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

macro_rules! column_component {
    ($ty:ty, $kind:ident, $column:ident) => {
        impl Sealed for $ty {}

        impl Component for $ty {
            fn kind() -> ComponentKind {
                ComponentKind::$kind
            }

            fn insert_into(self, store: &mut ComponentStore, entity: EntityId) {
                store.$column.insert(entity, self);
            }

            fn take_from(store: &mut ComponentStore, entity: EntityId) -> Option<Self> {
                store.$column.shift_remove(&entity)
            }

            fn get_from(store: &ComponentStore, entity: EntityId) -> Option<&Self> {
                store.$column.get(&entity)
            }

            fn get_mut_from(store: &mut ComponentStore, entity: EntityId) -> Option<&mut Self> {
                store.$column.get_mut(&entity)
            }

            fn owners(store: &ComponentStore) -> Vec<EntityId> {
                store.$column.keys().copied().collect()
            }
        }
    };
}

column_component!(Name, Name, names);
column_component!(Model, Model, models);
column_component!(ModelMesh, ModelMesh, meshes);
column_component!(Material, Material, materials);
column_component!(PhysicsBody, PhysicsBody, bodies);

impl<T: TagType> Sealed for Tag<T> {}

impl<T: TagType> Component for Tag<T> {
    fn kind() -> ComponentKind {
        ComponentKind::Tag(Self::id())
    }

    fn insert_into(self, store: &mut ComponentStore, entity: EntityId) {
        store.tags.entry(Self::id()).or_default().insert(entity);
    }

    fn take_from(store: &mut ComponentStore, entity: EntityId) -> Option<Self> {
        let members = store.tags.get_mut(&Self::id())?;
        members.shift_remove(&entity).then(Self::new)
    }

    fn get_from(store: &ComponentStore, entity: EntityId) -> Option<&Self> {
        store
            .tags
            .get(&Self::id())
            .is_some_and(|members| members.contains(&entity))
            .then_some(Self::SHARED)
    }

    fn get_mut_from(store: &mut ComponentStore, entity: EntityId) -> Option<&mut Self> {
        // Zero-sized: leaking the box allocates nothing.
        Self::stored_on(store, entity).then(|| Box::leak(Box::new(Self::new())))
    }

    fn owners(store: &ComponentStore) -> Vec<EntityId> {
        store
            .tags
            .get(&Self::id())
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }
}
