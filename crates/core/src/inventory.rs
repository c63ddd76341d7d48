//! Fixed-capacity storage inventory attached to a tracked entity.
//!
//! The persisted inventory always has exactly [`STORAGE_SLOTS`] positions.
//! Empty positions are kept so slot indices survive a save/load cycle.

use crate::item::{normalize, ItemStack};

/// Number of persisted slots per entity.
pub const STORAGE_SLOTS: usize = 27;

/// 27 optional item slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    slots: [Option<ItemStack>; STORAGE_SLOTS],
}

impl Inventory {
    /// Create a new empty inventory.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Build an inventory from view contents.
    ///
    /// Only the first [`STORAGE_SLOTS`] positions are kept; empty host stacks
    /// (air, zero amount) become `None`.
    pub fn from_slots(contents: &[Option<ItemStack>]) -> Self {
        let mut inventory = Self::new();
        for (slot, stack) in contents.iter().take(STORAGE_SLOTS).enumerate() {
            inventory.slots[slot] = normalize(stack.clone());
        }
        inventory
    }

    /// Get an item stack from a slot.
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        if slot >= STORAGE_SLOTS {
            return None;
        }
        self.slots[slot].as_ref()
    }

    /// Set an item stack in a slot. Out-of-range slots are rejected.
    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) -> bool {
        if slot >= STORAGE_SLOTS {
            return false;
        }
        self.slots[slot] = normalize(stack);
        true
    }

    /// Occupied slots in ascending index order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &ItemStack)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, stack)| stack.as_ref().map(|stack| (slot, stack)))
    }

    /// Number of occupied slots.
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Check if the inventory is completely empty.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }

    /// All slots, including empty ones.
    pub fn as_slice(&self) -> &[Option<ItemStack>] {
        &self.slots
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}
