//! Component change notifications.
//!
//! Listeners are plain closures registered on the
//! [`EntityRegistry`](crate::EntityRegistry). They run synchronously, in
//! registration order, before the mutating call returns. A listener only sees
//! the event: the registry is exclusively borrowed while it dispatches, so a
//! listener cannot reach back in and mutate it.

use std::fmt;

use crate::component::ComponentKind;
use crate::entity::EntityId;

/// What happened to a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentEvent {
    /// A component was attached.
    Added {
        entity: EntityId,
        kind: ComponentKind,
    },
    /// A component was detached or its entity destroyed.
    Removed {
        entity: EntityId,
        kind: ComponentKind,
    },
    /// A component was modified in place.
    Changed {
        entity: EntityId,
        kind: ComponentKind,
    },
}

impl ComponentEvent {
    /// The entity the event concerns.
    #[must_use]
    pub fn entity(&self) -> EntityId {
        match *self {
            Self::Added { entity, .. } | Self::Removed { entity, .. } | Self::Changed { entity, .. } => {
                entity
            }
        }
    }

    /// The kind of the affected component.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match *self {
            Self::Added { kind, .. } | Self::Removed { kind, .. } | Self::Changed { kind, .. } => kind,
        }
    }
}

/// Handle returned by [`EntityRegistry::subscribe`](crate::EntityRegistry::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&ComponentEvent)>;

/// Registered listeners in registration order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Callback)>,
}

impl Listeners {
    pub(crate) fn subscribe(&mut self, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn emit(&mut self, event: ComponentEvent) {
        for (_, callback) in &mut self.entries {
            callback(&event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
