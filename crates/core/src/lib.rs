#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod equipment;
pub mod host;
pub mod inventory;
pub mod item;
pub mod key;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use equipment::{
    classify, gather_from_equipment, resolve_hand_slot, split_to_equipment, Equipment,
    EquipmentModel, SlotKind,
};
pub use host::{
    ActorId, ContainerView, EntityId, EntityKind, EntityRef, Host, HostError, Posture,
};
pub use inventory::{Inventory, STORAGE_SLOTS};
pub use item::ItemStack;
pub use key::SpatialKey;

/// Host scheduling turn (20 turns per second => 50 ms per turn).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First turn after the plugin is enabled.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` turns.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}
