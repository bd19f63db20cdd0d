//! Registry error types.

use crate::component::ComponentKind;
use crate::entity::EntityId;

/// Structural errors raised by [`EntityRegistry`](crate::EntityRegistry).
///
/// These indicate a bug in scene-construction code and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The id was never allocated by this registry, or its entity was destroyed.
    #[error("{0} does not exist")]
    UnknownEntity(EntityId),

    /// The entity already owns a component of this kind.
    #[error("{entity} already has a {kind} component")]
    DuplicateComponent {
        entity: EntityId,
        kind: ComponentKind,
    },

    /// The entity owns no component of this kind.
    #[error("{entity} has no {kind} component")]
    MissingComponent {
        entity: EntityId,
        kind: ComponentKind,
    },

    /// The requested parent is the child itself or one of its descendants.
    #[error("cannot parent {child} under {parent}: it would create a cycle")]
    HierarchyCycle { child: EntityId, parent: EntityId },
}
