use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use standvault_core::SpatialKey;

/// One row of the `armor_stands` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandRecord {
    /// Monotonic row id.
    pub id: u64,
    /// World name.
    pub world: String,
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
    /// Base64 inventory text; `None` until the first save.
    pub inventory: Option<String>,
    /// When the row was first written.
    pub registered_at: DateTime<Utc>,
}

impl StandRecord {
    pub(crate) fn new(id: u64, key: &SpatialKey, inventory: Option<String>) -> Self {
        Self {
            id,
            world: key.world().to_string(),
            x: key.x(),
            y: key.y(),
            z: key.z(),
            inventory,
            registered_at: Utc::now(),
        }
    }

    /// Whether an inventory has ever been saved for this row.
    pub fn has_inventory(&self) -> bool {
        self.inventory.as_deref().is_some_and(|text| !text.is_empty())
    }
}
