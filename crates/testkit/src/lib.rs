#![warn(missing_docs)]
//! Test surfaces: an in-memory host runtime with an event journal.

mod fake_host;

pub use fake_host::*;

use standvault_core::ItemStack;

/// Single item of `material`.
pub fn item(material: &str) -> ItemStack {
    ItemStack::new(material, 1)
}

/// Empty view contents of `size` slots with the given items placed.
pub fn contents(size: usize, items: &[(usize, &str)]) -> Vec<Option<ItemStack>> {
    let mut slots = vec![None; size];
    for &(slot, material) in items {
        slots[slot] = Some(item(material));
    }
    slots
}
