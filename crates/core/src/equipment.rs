//! Equipment slots and the conversion between a flat slot grid and a
//! structured equipment set.
//!
//! The grid has no "hand" marker, so hand items are resolved by position:
//! index 4 is the main hand, index 5 the off hand, and a non-armor item seen
//! before any armor piece is treated as the held item.

use crate::inventory::Inventory;
use crate::item::{normalize, ItemStack};
use serde::{Deserialize, Serialize};

/// Grid index of the helmet when packing equipment.
pub const HELMET_SLOT: usize = 0;
/// Grid index of the chestplate.
pub const CHESTPLATE_SLOT: usize = 1;
/// Grid index of the leggings.
pub const LEGGINGS_SLOT: usize = 2;
/// Grid index of the boots.
pub const BOOTS_SLOT: usize = 3;
/// Grid index of the main hand (or the single hand on the legacy model).
pub const MAIN_HAND_SLOT: usize = 4;
/// Grid index of the off hand.
pub const OFF_HAND_SLOT: usize = 5;

/// Semantic role of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    /// Head armor (helmets, heads, skulls).
    Helmet,
    /// Chest armor (chestplates, elytra).
    Chestplate,
    /// Leg armor.
    Leggings,
    /// Foot armor.
    Boots,
    /// Main hand (single hand on the legacy model).
    MainHand,
    /// Off hand (modern model only).
    OffHand,
    /// No equipment role.
    None,
}

impl SlotKind {
    /// True for the four armor roles.
    pub fn is_armor(self) -> bool {
        matches!(
            self,
            SlotKind::Helmet | SlotKind::Chestplate | SlotKind::Leggings | SlotKind::Boots
        )
    }
}

/// Host capability variant, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EquipmentModel {
    /// Separate main hand and off hand.
    #[default]
    Modern,
    /// Single hand slot, no off hand.
    Legacy,
}

impl EquipmentModel {
    /// Whether the model has a distinct off hand.
    pub fn has_off_hand(self) -> bool {
        matches!(self, EquipmentModel::Modern)
    }
}

/// Classify an item type identifier by its armor role.
///
/// Matching is ASCII case-insensitive. Anything that is not armor returns
/// [`SlotKind::None`]; its hand slot is decided by position, see
/// [`resolve_hand_slot`].
pub fn classify(item_type: &str) -> SlotKind {
    let ty = item_type.to_ascii_uppercase();

    if ty.ends_with("_HELMET")
        || ty.contains("_HEAD")
        || matches!(ty.as_str(), "PLAYER_HEAD" | "SKULL" | "SKULL_ITEM")
    {
        SlotKind::Helmet
    } else if ty.ends_with("_CHESTPLATE") || ty == "ELYTRA" {
        SlotKind::Chestplate
    } else if ty.ends_with("_LEGGINGS") {
        SlotKind::Leggings
    } else if ty.ends_with("_BOOTS") {
        SlotKind::Boots
    } else {
        SlotKind::None
    }
}

/// Hand slot for a non-armor item found at grid `index`.
///
/// `armor_assigned` is whether any armor piece has been assigned earlier in
/// the same pass.
pub fn resolve_hand_slot(index: usize, armor_assigned: bool, model: EquipmentModel) -> SlotKind {
    match model {
        EquipmentModel::Modern if index == MAIN_HAND_SLOT => SlotKind::MainHand,
        EquipmentModel::Modern if index == OFF_HAND_SLOT => SlotKind::OffHand,
        EquipmentModel::Legacy if index == MAIN_HAND_SLOT || index == OFF_HAND_SLOT => {
            SlotKind::MainHand
        }
        _ if !armor_assigned => SlotKind::MainHand,
        _ => SlotKind::None,
    }
}

/// Live equipment of a tracked entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    /// Head slot.
    pub helmet: Option<ItemStack>,
    /// Chest slot.
    pub chestplate: Option<ItemStack>,
    /// Legs slot.
    pub leggings: Option<ItemStack>,
    /// Feet slot.
    pub boots: Option<ItemStack>,
    /// Main hand (the only hand on the legacy model).
    pub main_hand: Option<ItemStack>,
    /// Off hand.
    pub off_hand: Option<ItemStack>,
}

impl Equipment {
    /// Create empty equipment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Item in the given role.
    pub fn get(&self, kind: SlotKind) -> Option<&ItemStack> {
        match kind {
            SlotKind::Helmet => self.helmet.as_ref(),
            SlotKind::Chestplate => self.chestplate.as_ref(),
            SlotKind::Leggings => self.leggings.as_ref(),
            SlotKind::Boots => self.boots.as_ref(),
            SlotKind::MainHand => self.main_hand.as_ref(),
            SlotKind::OffHand => self.off_hand.as_ref(),
            SlotKind::None => None,
        }
    }

    /// Put an item in the given role, returning the previous one.
    /// [`SlotKind::None`] discards the item.
    pub fn set(&mut self, kind: SlotKind, stack: Option<ItemStack>) -> Option<ItemStack> {
        let slot = match kind {
            SlotKind::Helmet => &mut self.helmet,
            SlotKind::Chestplate => &mut self.chestplate,
            SlotKind::Leggings => &mut self.leggings,
            SlotKind::Boots => &mut self.boots,
            SlotKind::MainHand => &mut self.main_hand,
            SlotKind::OffHand => &mut self.off_hand,
            SlotKind::None => return None,
        };
        std::mem::replace(slot, normalize(stack))
    }

    /// True if any armor role is filled.
    pub fn has_armor(&self) -> bool {
        self.helmet.is_some()
            || self.chestplate.is_some()
            || self.leggings.is_some()
            || self.boots.is_some()
    }

    /// True if nothing is equipped.
    pub fn is_empty(&self) -> bool {
        !self.has_armor() && self.main_hand.is_none() && self.off_hand.is_none()
    }
}

/// Turn a flat slot grid into equipment.
///
/// Starts from empty equipment and walks the grid in index order. Armor goes
/// to its matching role wherever it sits (last one wins). Non-armor items go
/// through [`resolve_hand_slot`]; items that resolve to no role are dropped
/// from the equipment (they stay in the grid).
pub fn split_to_equipment(slots: &[Option<ItemStack>], model: EquipmentModel) -> Equipment {
    let mut equipment = Equipment::new();

    for (index, stack) in slots.iter().enumerate() {
        let Some(stack) = stack.as_ref().filter(|stack| !stack.is_empty()) else {
            continue;
        };

        let kind = match classify(stack.material()) {
            SlotKind::None => resolve_hand_slot(index, equipment.has_armor(), model),
            armor => armor,
        };
        equipment.set(kind, Some(stack.clone()));
    }

    equipment
}

/// Pack equipment into the conventional grid positions 0..=5.
///
/// The off hand is left out on the legacy model. All other slots are empty.
pub fn gather_from_equipment(equipment: &Equipment, model: EquipmentModel) -> Inventory {
    let mut inventory = Inventory::new();
    inventory.set(HELMET_SLOT, equipment.helmet.clone());
    inventory.set(CHESTPLATE_SLOT, equipment.chestplate.clone());
    inventory.set(LEGGINGS_SLOT, equipment.leggings.clone());
    inventory.set(BOOTS_SLOT, equipment.boots.clone());
    inventory.set(MAIN_HAND_SLOT, equipment.main_hand.clone());
    if model.has_off_hand() {
        inventory.set(OFF_HAND_SLOT, equipment.off_hand.clone());
    }
    inventory
}
