//! # scene_ecs
//!
//! The "E" and "C" of the scene core: entities arranged in a transform
//! hierarchy, and the components attached to them.
//!
//! This crate provides:
//!
//! - [`EntityId`] and [`EntityAllocator`]: sequential, never-reused ids.
//! - [`Entity`]: a scene-graph node with local transform and cached world matrix.
//! - [`Component`] and [`ComponentKind`]: the closed set of component kinds.
//! - [`components`]: `Name`, `Model`, `ModelMesh`, `Material`, `PhysicsBody`, `Tag<T>`.
//! - [`EntityRegistry`]: creation, parenting, component attach/detach, kind queries.
//! - [`ComponentEvent`]: synchronous notifications for component changes.

pub mod component;
pub mod components;
pub mod entity;
pub mod error;
pub mod events;
pub mod handle;
pub mod registry;
pub mod storage;

pub use component::{Component, ComponentKind, ComponentRef, TagId, TagType};
pub use components::{Material, Model, ModelMesh, Name, PhysicsBody, Tag};
pub use entity::{Entity, EntityAllocator, EntityId, MatrixState};
pub use error::RegistryError;
pub use events::{ComponentEvent, ListenerId};
pub use handle::{BodyHandle, MaterialHandle, MeshHandle, ModelHandle};
pub use registry::EntityRegistry;
pub use storage::ComponentStore;
