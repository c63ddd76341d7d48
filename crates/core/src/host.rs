//! Collaborator interface to the host game runtime.
//!
//! The runtime owns entities, players and container UIs. It is reached only
//! through [`Host`]; an adapter layer translates runtime events into calls on
//! the synchronizer and implements this trait on top of the runtime API.

use crate::equipment::{Equipment, EquipmentModel};
use crate::item::ItemStack;
use crate::key::SpatialKey;
use thiserror::Error;

/// Runtime entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// Runtime player identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u128);

/// Entity kinds the core distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// The tracked kind: a posable armor stand.
    ArmorStand,
    /// Anything else.
    Other,
}

/// A live entity as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    /// Runtime id, used for equipment access.
    pub id: EntityId,
    /// Entity kind.
    pub kind: EntityKind,
    /// Persistent identity.
    pub key: SpatialKey,
}

impl EntityRef {
    /// Whether this entity's equipment is persisted.
    pub fn is_tracked(&self) -> bool {
        self.kind == EntityKind::ArmorStand
    }
}

/// Player posture at interaction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Posture {
    /// Normal stance: native armor stand handling applies.
    #[default]
    Standing,
    /// Trigger posture for the storage view.
    Sneaking,
}

/// A container view shown to one actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerView {
    /// Title used to recognize the view in later notifications.
    pub title: String,
    /// Slot contents; the length is the view size.
    pub contents: Vec<Option<ItemStack>>,
}

impl ContainerView {
    /// Empty view of `size` slots.
    pub fn new(title: impl Into<String>, size: usize) -> Self {
        Self {
            title: title.into(),
            contents: vec![None; size],
        }
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        self.contents.len()
    }
}

/// Failures reported by the runtime.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostError {
    /// The entity no longer exists.
    #[error("entity {0:?} no longer exists")]
    EntityGone(EntityId),
    /// The entity has no equipment interface.
    #[error("entity {0:?} has no equipment")]
    NoEquipment(EntityId),
    /// The runtime refused the change.
    #[error("runtime rejected equipment change for {0:?}")]
    Rejected(EntityId),
}

/// Capabilities the core needs from the runtime.
pub trait Host {
    /// Equipment model of the running runtime. Queried once at startup.
    fn equipment_model(&self) -> EquipmentModel;

    /// All live entities in every loaded world.
    fn entities(&self) -> Vec<EntityRef>;

    /// Live equipment, or `None` when the entity has no equipment interface.
    fn equipment(&self, entity: EntityId) -> Option<Equipment>;

    /// Replace an entity's live equipment.
    fn set_equipment(&mut self, entity: EntityId, equipment: Equipment) -> Result<(), HostError>;

    /// Whether the actor holds a permission node.
    fn has_permission(&self, actor: ActorId, permission: &str) -> bool;

    /// Show a container view to the actor, replacing any open one.
    fn open_view(&mut self, actor: ActorId, view: ContainerView);

    /// The actor's currently open view, if any.
    fn current_view(&self, actor: ActorId) -> Option<ContainerView>;

    /// Send a chat message to the actor.
    fn send_message(&mut self, actor: ActorId, message: &str);
}
