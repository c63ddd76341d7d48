//! Actor -> armor stand bindings for open storage views.

use standvault_core::{ActorId, EntityRef, SpatialKey};
use std::collections::HashMap;

/// Open sessions, at most one per actor.
#[derive(Debug, Default)]
pub struct SessionTable {
    bindings: HashMap<ActorId, EntityRef>,
}

impl SessionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `actor` to `entity`, returning the binding it replaced.
    pub fn bind(&mut self, actor: ActorId, entity: EntityRef) -> Option<EntityRef> {
        self.bindings.insert(actor, entity)
    }

    /// Entity the actor's session targets.
    pub fn get(&self, actor: ActorId) -> Option<&EntityRef> {
        self.bindings.get(&actor)
    }

    /// End the actor's session.
    pub fn release(&mut self, actor: ActorId) -> Option<EntityRef> {
        self.bindings.remove(&actor)
    }

    /// End every session targeting `key`. Returns how many were ended.
    pub fn release_entity(&mut self, key: &SpatialKey) -> usize {
        let before = self.bindings.len();
        self.bindings.retain(|_, entity| entity.key != *key);
        before - self.bindings.len()
    }

    /// Number of open sessions.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True when no session is open.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Drop every session.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}
