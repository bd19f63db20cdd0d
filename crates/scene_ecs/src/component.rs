//! The [`Component`] trait and component kinds.
//!
//! The set of component kinds is closed: every component type maps to one
//! [`ComponentKind`] and to one typed column in the
//! [`ComponentStore`]. There is no runtime type registry. Tags are the one
//! open family, parameterised by a marker type implementing [`TagType`].

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::components::{Material, Model, ModelMesh, Name, PhysicsBody};
use crate::entity::EntityId;
use crate::storage::ComponentStore;

/// Identifies a tag family by its marker type. The name is for display.
#[derive(Clone, Copy)]
pub struct TagId {
    type_id: TypeId,
    name: &'static str,
}

impl TagId {
    /// The id for marker type `T`.
    #[must_use]
    pub fn of<T: TagType>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: T::NAME,
        }
    }

    /// The marker's name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.name
    }
}

impl PartialEq for TagId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TagId {}

impl Hash for TagId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TagId").field(&self.name).finish()
    }
}

/// A marker type that can parameterise a [`Tag`](crate::components::Tag).
///
/// ```rust
/// use scene_ecs::TagType;
///
/// struct Player;
///
/// impl TagType for Player {
///     const NAME: &'static str = "Player";
/// }
/// ```
pub trait TagType: 'static {
    /// Display name of the tag, used in logs and errors.
    const NAME: &'static str;
}

/// The kind of a component. An entity holds at most one component per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Display name.
    Name,
    /// Root of a loaded model.
    Model,
    /// A renderable mesh primitive with its local bounds.
    ModelMesh,
    /// Material reference.
    Material,
    /// Rigid body in the physics world.
    PhysicsBody,
    /// Zero-sized marker.
    Tag(TagId),
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("Name"),
            Self::Model => f.write_str("Model"),
            Self::ModelMesh => f.write_str("ModelMesh"),
            Self::Material => f.write_str("Material"),
            Self::PhysicsBody => f.write_str("PhysicsBody"),
            Self::Tag(tag) => write!(f, "Tag<{}>", tag.name()),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

pub(crate) use sealed::Sealed;

/// Data attached to exactly one entity.
///
/// The trait is sealed: the component kinds are the ones this crate defines.
/// Its methods route a typed value to its column in the [`ComponentStore`];
/// callers go through [`EntityRegistry`](crate::EntityRegistry) instead of
/// calling them directly.
pub trait Component: Sealed + Sized + 'static {
    /// The kind this type is stored under.
    fn kind() -> ComponentKind;

    #[doc(hidden)]
    fn insert_into(self, store: &mut ComponentStore, entity: EntityId);

    #[doc(hidden)]
    fn take_from(store: &mut ComponentStore, entity: EntityId) -> Option<Self>;

    #[doc(hidden)]
    fn get_from(store: &ComponentStore, entity: EntityId) -> Option<&Self>;

    #[doc(hidden)]
    fn get_mut_from(store: &mut ComponentStore, entity: EntityId) -> Option<&mut Self>;

    /// Owners of this kind, in insertion order.
    #[doc(hidden)]
    fn owners(store: &ComponentStore) -> Vec<EntityId>;

    #[doc(hidden)]
    fn stored_on(store: &ComponentStore, entity: EntityId) -> bool {
        Self::get_from(store, entity).is_some()
    }
}

/// A borrowed component of any kind, as returned by
/// [`EntityRegistry::all_components`](crate::EntityRegistry::all_components).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComponentRef<'a> {
    /// A display name.
    Name(&'a Name),
    /// A model root.
    Model(&'a Model),
    /// A mesh primitive and its local bounds.
    ModelMesh(&'a ModelMesh),
    /// A material reference.
    Material(&'a Material),
    /// A physics body link.
    PhysicsBody(&'a PhysicsBody),
    /// A marker tag. Tags carry no data, so only the id is given.
    Tag(TagId),
}

impl ComponentRef<'_> {
    /// The kind of the referenced component.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Name(_) => ComponentKind::Name,
            Self::Model(_) => ComponentKind::Model,
            Self::ModelMesh(_) => ComponentKind::ModelMesh,
            Self::Material(_) => ComponentKind::Material,
            Self::PhysicsBody(_) => ComponentKind::PhysicsBody,
            Self::Tag(tag) => ComponentKind::Tag(*tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Player;

    impl TagType for Player {
        const NAME: &'static str = "Player";
    }

    struct Enemy;

    impl TagType for Enemy {
        const NAME: &'static str = "Enemy";
    }

    #[test]
    fn test_tag_ids_differ_between_markers() {
        assert_ne!(TagId::of::<Player>(), TagId::of::<Enemy>());
        assert_eq!(TagId::of::<Player>().name(), "Player");
    }

    mod other {
        pub struct Player;

        impl super::TagType for Player {
            const NAME: &'static str = "Player";
        }
    }

    #[test]
    fn test_same_name_markers_are_distinct_kinds() {
        let ours = TagId::of::<Player>();
        let theirs = TagId::of::<other::Player>();
        assert_ne!(ours, theirs);
        assert_eq!(ours.name(), theirs.name());
        assert_eq!(ours, TagId::of::<Player>());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ComponentKind::ModelMesh.to_string(), "ModelMesh");
        assert_eq!(
            ComponentKind::Tag(TagId::of::<Enemy>()).to_string(),
            "Tag<Enemy>"
        );
    }
}
