//! Item stacks as the host hands them to us.

use serde::{Deserialize, Serialize};

/// Material identifier the host uses for "nothing in this slot".
pub const AIR: &str = "AIR";

/// A stack of items in a slot.
///
/// `material` is the host's item-type identifier (`DIAMOND_HELMET`, `STICK`, ...).
/// `meta` carries the host's opaque per-item data (display name, enchantments,
/// damage) and is persisted byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type identifier.
    pub material: String,
    /// Number of items in this stack.
    pub amount: u8,
    /// Optional opaque item metadata.
    pub meta: Option<Vec<u8>>,
}

impl ItemStack {
    /// Create a new item stack.
    pub fn new(material: impl Into<String>, amount: u8) -> Self {
        Self {
            material: material.into(),
            amount,
            meta: None,
        }
    }

    /// Create an item stack with metadata.
    pub fn with_metadata(material: impl Into<String>, amount: u8, meta: Vec<u8>) -> Self {
        Self {
            material: material.into(),
            amount,
            meta: Some(meta),
        }
    }

    /// Item type identifier used for slot classification.
    pub fn material(&self) -> &str {
        &self.material
    }

    /// Air or zero-sized stacks occupy no slot.
    pub fn is_empty(&self) -> bool {
        self.amount == 0 || self.material.eq_ignore_ascii_case(AIR)
    }
}

/// Collapse host "empty" stacks into `None`.
pub fn normalize(stack: Option<ItemStack>) -> Option<ItemStack> {
    stack.filter(|stack| !stack.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_and_zero_amount_are_empty() {
        assert!(ItemStack::new("AIR", 1).is_empty());
        assert!(ItemStack::new("air", 1).is_empty());
        assert!(ItemStack::new("STICK", 0).is_empty());
        assert!(!ItemStack::new("STICK", 1).is_empty());
    }

    #[test]
    fn normalize_drops_empty_stacks() {
        assert_eq!(normalize(Some(ItemStack::new(AIR, 1))), None);
        assert_eq!(normalize(None), None);

        let stick = ItemStack::with_metadata("STICK", 3, vec![1, 2, 3]);
        assert_eq!(normalize(Some(stick.clone())), Some(stick));
    }
}
