//! The entity registry.
//!
//! [`EntityRegistry`] is the only thing that mutates the entity/component
//! graph. It owns every [`Entity`], the kind-indexed [`ComponentStore`], and
//! the component listeners. Every mutating method keeps the entity's kind
//! list and the store in agreement: a component is listed on its entity if
//! and only if it sits in the column for its kind.
//!
//! ## Global matrices
//!
//! [`EntityRegistry::global_matrix`] recomputes top-down along the ancestor
//! chain on every call, refreshing each ancestor's cache on the way. It does
//! not trust a child's cached value when only an ancestor moved. The cost is
//! one matrix multiply per ancestor per query.

use scene_math::Mat4;
use tracing::{debug, trace};

use crate::component::{Component, ComponentKind, ComponentRef};
use crate::entity::{Entity, EntityAllocator, EntityId};
use crate::error::RegistryError;
use crate::events::{ComponentEvent, ListenerId, Listeners};
use crate::storage::ComponentStore;

/// Owner of all entities and components.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    /// Entity id allocator.
    allocator: EntityAllocator,
    /// Every live entity, keyed by id.
    entities: std::collections::HashMap<EntityId, Entity>,
    /// Component columns, one per kind.
    store: ComponentStore,
    /// Component event listeners.
    listeners: Listeners,
}

impl EntityRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Entity lifecycle --

    /// Create an entity, optionally as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownEntity`] if `parent` does not exist.
    pub fn create_entity(
        &mut self,
        name: impl Into<String>,
        parent: Option<EntityId>,
    ) -> Result<EntityId, RegistryError> {
        if let Some(parent) = parent {
            self.require(parent)?;
        }

        let id = self.allocator.allocate();
        let mut entity = Entity::new(id, name);
        if let Some(parent) = parent {
            entity.set_parent_link(Some(parent));
            self.require_mut(parent)?.push_child(id);
        }

        debug!(entity = id.id(), name = entity.name(), parent = ?parent.map(EntityId::id), "created entity");
        self.entities.insert(id, entity);
        Ok(id)
    }

    /// Destroy an entity together with its whole subtree.
    ///
    /// Descendants go first, deepest first. Every component is removed with a
    /// [`ComponentEvent::Removed`] notification. The subtree root is detached
    /// from its parent. Returns the destroyed ids in destruction order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownEntity`] if `id` does not exist.
    pub fn destroy_entity(&mut self, id: EntityId) -> Result<Vec<EntityId>, RegistryError> {
        let parent = self.require(id)?.parent();
        if let Some(parent) = parent {
            self.require_mut(parent)?.remove_child(id);
        }

        let order = self.subtree_post_order(id);
        for &doomed in &order {
            let Some(entity) = self.entities.remove(&doomed) else {
                continue;
            };
            for &kind in entity.component_kinds() {
                self.store.remove_kind(kind, doomed);
                self.listeners.emit(ComponentEvent::Removed {
                    entity: doomed,
                    kind,
                });
            }
        }

        debug!(entity = id.id(), destroyed = order.len(), "destroyed entity subtree");
        Ok(order)
    }

    /// Borrow an entity.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Mutably borrow an entity, e.g. to move it.
    #[must_use]
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns `true` if the entity exists.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// All live entity ids, ascending.
    #[must_use]
    pub fn entity_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Entities without a parent, ascending.
    #[must_use]
    pub fn roots(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.parent().is_none())
            .map(Entity::id)
            .collect();
        ids.sort_unstable();
        ids
    }

    // -- Hierarchy --

    /// Move `child` under `parent`, or make it a root with `None`.
    ///
    /// This is the only way to change parentage. It detaches the child from
    /// its old parent's children, appends it to the new parent's children,
    /// and marks the child dirty. Re-setting the current parent is a no-op.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownEntity`] if either entity does not exist.
    /// - [`RegistryError::HierarchyCycle`] if `parent` is `child` or one of
    ///   its descendants.
    pub fn set_parent(
        &mut self,
        child: EntityId,
        parent: Option<EntityId>,
    ) -> Result<(), RegistryError> {
        let old_parent = self.require(child)?.parent();
        if let Some(parent) = parent {
            self.require(parent)?;
            if self.ancestor_chain(parent)?.contains(&child) {
                return Err(RegistryError::HierarchyCycle { child, parent });
            }
        }
        if old_parent == parent {
            return Ok(());
        }

        if let Some(old) = old_parent {
            self.require_mut(old)?.remove_child(child);
        }
        if let Some(new) = parent {
            self.require_mut(new)?.push_child(child);
        }
        self.require_mut(child)?.set_parent_link(parent);

        trace!(
            entity = child.id(),
            from = ?old_parent.map(EntityId::id),
            to = ?parent.map(EntityId::id),
            "reparented entity"
        );
        Ok(())
    }

    /// The world matrix of `id`, recomputed from the root down.
    ///
    /// Every entity on the path gets its cache refreshed and is marked clean.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownEntity`] if `id` does not exist.
    pub fn global_matrix(&mut self, id: EntityId) -> Result<Mat4, RegistryError> {
        let chain = self.ancestor_chain(id)?;
        let mut global = Mat4::IDENTITY;
        for &ancestor in chain.iter().rev() {
            let entity = self.require_mut(ancestor)?;
            global *= entity.local_matrix();
            entity.store_global(global);
        }
        Ok(global)
    }

    /// `id` followed by its parent, grandparent, and so on up to the root.
    fn ancestor_chain(&self, id: EntityId) -> Result<Vec<EntityId>, RegistryError> {
        let mut chain = vec![id];
        let mut current = self.require(id)?.parent();
        while let Some(parent) = current {
            chain.push(parent);
            current = self.require(parent)?.parent();
        }
        Ok(chain)
    }

    /// The subtree rooted at `id`, children before their parent.
    fn subtree_post_order(&self, id: EntityId) -> Vec<EntityId> {
        let mut order = Vec::new();
        let mut stack = vec![(id, false)];
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                order.push(current);
                continue;
            }
            stack.push((current, true));
            if let Some(entity) = self.entities.get(&current) {
                stack.extend(entity.children().iter().rev().map(|&c| (c, false)));
            }
        }
        order
    }

    // -- Components --

    /// Attach a component.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownEntity`] if the entity does not exist.
    /// - [`RegistryError::DuplicateComponent`] if it already owns a `T`. The
    ///   existing component is left untouched.
    pub fn add_component<T: Component>(
        &mut self,
        id: EntityId,
        component: T,
    ) -> Result<(), RegistryError> {
        let kind = T::kind();
        let entity = self.entities.get_mut(&id).ok_or(RegistryError::UnknownEntity(id))?;
        if entity.has_kind(kind) {
            return Err(RegistryError::DuplicateComponent { entity: id, kind });
        }

        entity.push_kind(kind);
        component.insert_into(&mut self.store, id);

        trace!(entity = id.id(), %kind, "added component");
        self.listeners.emit(ComponentEvent::Added { entity: id, kind });
        Ok(())
    }

    /// Detach and return a component.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownEntity`] if the entity does not exist.
    /// - [`RegistryError::MissingComponent`] if it owns no `T`. Nothing changes.
    pub fn remove_component<T: Component>(&mut self, id: EntityId) -> Result<T, RegistryError> {
        let kind = T::kind();
        let entity = self.entities.get_mut(&id).ok_or(RegistryError::UnknownEntity(id))?;
        if !entity.has_kind(kind) {
            return Err(RegistryError::MissingComponent { entity: id, kind });
        }

        let component = T::take_from(&mut self.store, id)
            .ok_or(RegistryError::MissingComponent { entity: id, kind })?;
        entity.remove_kind(kind);

        trace!(entity = id.id(), %kind, "removed component");
        self.listeners.emit(ComponentEvent::Removed { entity: id, kind });
        Ok(component)
    }

    /// Borrow the `T` on an entity. A missing component is not an error.
    #[must_use]
    pub fn get_component<T: Component>(&self, id: EntityId) -> Option<&T> {
        debug_assert!(self.contains(id), "{id} queried but does not exist");
        T::get_from(&self.store, id)
    }

    /// Returns `true` if the entity owns a `T`.
    #[must_use]
    pub fn has_component<T: Component>(&self, id: EntityId) -> bool {
        T::stored_on(&self.store, id)
    }

    /// Modify a component in place and raise [`ComponentEvent::Changed`].
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownEntity`] if the entity does not exist.
    /// - [`RegistryError::MissingComponent`] if it owns no `T`.
    pub fn update_component<T: Component, R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, RegistryError> {
        self.require(id)?;
        let kind = T::kind();
        let component = T::get_mut_from(&mut self.store, id)
            .ok_or(RegistryError::MissingComponent { entity: id, kind })?;
        let result = f(component);
        self.listeners.emit(ComponentEvent::Changed { entity: id, kind });
        Ok(result)
    }

    /// Every component on an entity, in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownEntity`] if the entity does not exist.
    pub fn all_components(&self, id: EntityId) -> Result<Vec<ComponentRef<'_>>, RegistryError> {
        let entity = self.require(id)?;
        Ok(entity
            .component_kinds()
            .iter()
            .filter_map(|&kind| self.store.get_ref(kind, id))
            .collect())
    }

    // -- Queries --

    /// Entities owning a `T`, each once, in the order their `T` was added.
    #[must_use]
    pub fn entities_with<T: Component>(&self) -> Vec<EntityId> {
        T::owners(&self.store)
    }

    /// Entities owning both an `A` and a `B`, in `A`'s insertion order.
    ///
    /// Each `A` owner is looked up in `B`'s column by key.
    #[must_use]
    pub fn entities_with2<A: Component, B: Component>(&self) -> Vec<EntityId> {
        A::owners(&self.store)
            .into_iter()
            .filter(|&id| B::stored_on(&self.store, id))
            .collect()
    }

    /// Read-only access to the component columns.
    #[must_use]
    pub fn store(&self) -> &ComponentStore {
        &self.store
    }

    // -- Listeners --

    /// Register a listener for component events.
    ///
    /// Listeners run synchronously, in registration order, inside the
    /// mutating call that raised the event.
    pub fn subscribe(&mut self, listener: impl FnMut(&ComponentEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(Box::new(listener))
    }

    /// Remove a listener. Returns `true` if it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // -- Helpers --

    fn require(&self, id: EntityId) -> Result<&Entity, RegistryError> {
        self.entities.get(&id).ok_or(RegistryError::UnknownEntity(id))
    }

    fn require_mut(&mut self, id: EntityId) -> Result<&mut Entity, RegistryError> {
        self.entities.get_mut(&id).ok_or(RegistryError::UnknownEntity(id))
    }
}
