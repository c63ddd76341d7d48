//! Embedded-database store for armor stand inventories.

use crate::codec::{decode_inventory, encode_inventory};
use crate::error::StoreError;
use crate::record::StandRecord;
use standvault_core::{Inventory, SpatialKey};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Name of the table (sled tree) holding one row per armor stand.
pub const TABLE_NAME: &str = "armor_stands";

/// What a save did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// An existing row was updated in place.
    Updated,
    /// No row existed; a new one was inserted.
    Inserted,
}

struct Handle {
    db: sled::Db,
    table: sled::Tree,
}

/// Durable CRUD over armor stand inventories keyed by [`SpatialKey`].
///
/// Public operations never fail: errors are logged and the operation returns
/// its safe default (empty inventory, `false`, or nothing). The `try_*`
/// variants expose the underlying [`StoreError`].
pub struct EquipmentStore {
    handle: Option<Handle>,
}

impl EquipmentStore {
    /// Open (or create) the store at `path`, creating the table if absent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let db = sled::open(path)?;
        info!("Opened armor stand store at {}", path.display());
        Self::from_db(db)
    }

    /// Open a throwaway store that is deleted when dropped.
    pub fn temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    /// A store without a database handle. Every operation behaves as after
    /// [`EquipmentStore::close`].
    pub fn detached() -> Self {
        Self { handle: None }
    }

    fn from_db(db: sled::Db) -> Result<Self, StoreError> {
        let table = db.open_tree(TABLE_NAME)?;
        Ok(Self {
            handle: Some(Handle { db, table }),
        })
    }

    /// Whether the database handle is still open.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    fn handle(&self) -> Result<&Handle, StoreError> {
        self.handle.as_ref().ok_or(StoreError::Closed)
    }

    /// Insert an empty row for `key` unless one exists.
    pub fn register(&self, key: &SpatialKey) {
        if let Err(err) = self.try_register(key) {
            warn!("Failed to register armor stand at {key}: {err}");
        }
    }

    /// Insert an empty row for `key`. Returns `false` when a row already existed.
    pub fn try_register(&self, key: &SpatialKey) -> Result<bool, StoreError> {
        let handle = self.handle()?;
        let storage_key = key.to_storage_key();
        if handle.table.contains_key(&storage_key)? {
            return Ok(false);
        }

        let row = StandRecord::new(handle.db.generate_id()?, key, None);
        let bytes = bincode::serialize(&row)?;
        let swapped = handle
            .table
            .compare_and_swap(&storage_key, None as Option<&[u8]>, Some(bytes))?;
        Ok(swapped.is_ok())
    }

    /// Whether a row exists for `key`.
    pub fn is_registered(&self, key: &SpatialKey) -> bool {
        match self.try_is_registered(key) {
            Ok(found) => found,
            Err(err) => {
                warn!("Failed to look up armor stand at {key}: {err}");
                false
            }
        }
    }

    /// Whether a row exists for `key`.
    pub fn try_is_registered(&self, key: &SpatialKey) -> Result<bool, StoreError> {
        Ok(self.handle()?.table.contains_key(key.to_storage_key())?)
    }

    /// Delete the row for `key`, if any.
    pub fn remove(&self, key: &SpatialKey) {
        if let Err(err) = self.try_remove(key) {
            warn!("Failed to remove armor stand at {key}: {err}");
        }
    }

    /// Delete the row for `key`. Returns whether a row was removed.
    pub fn try_remove(&self, key: &SpatialKey) -> Result<bool, StoreError> {
        Ok(self
            .handle()?
            .table
            .remove(key.to_storage_key())?
            .is_some())
    }

    /// Upsert the inventory for `key`.
    pub fn save(&self, key: &SpatialKey, inventory: &Inventory) {
        if let Err(err) = self.try_save(key, inventory) {
            warn!("Failed to save armor stand inventory at {key}: {err}");
        }
    }

    /// Update the row for `key` in place, or insert one if none exists.
    pub fn try_save(
        &self,
        key: &SpatialKey,
        inventory: &Inventory,
    ) -> Result<SaveOutcome, StoreError> {
        let handle = self.handle()?;
        let text = encode_inventory(inventory)?;
        debug!("Saving inventory: {text}");

        let storage_key = key.to_storage_key();
        let existing = match handle.table.get(&storage_key)? {
            Some(bytes) => match bincode::deserialize::<StandRecord>(&bytes) {
                Ok(row) => Some(row),
                Err(err) => {
                    warn!("Replacing unreadable row for armor stand at {key}: {err}");
                    None
                }
            },
            None => None,
        };

        let (row, outcome) = match existing {
            Some(mut row) => {
                row.inventory = Some(text);
                (row, SaveOutcome::Updated)
            }
            None => (
                StandRecord::new(handle.db.generate_id()?, key, Some(text)),
                SaveOutcome::Inserted,
            ),
        };

        handle
            .table
            .insert(storage_key, bincode::serialize(&row)?)?;
        Ok(outcome)
    }

    /// Stored inventory for `key`, or an empty inventory when nothing usable is stored.
    pub fn load(&self, key: &SpatialKey) -> Inventory {
        match self.try_load(key) {
            Ok(inventory) => inventory,
            Err(err) => {
                warn!("Failed to load armor stand inventory at {key}: {err}");
                Inventory::new()
            }
        }
    }

    /// Stored inventory for `key`; missing rows and unsaved rows are empty.
    pub fn try_load(&self, key: &SpatialKey) -> Result<Inventory, StoreError> {
        let row = match self.try_record(key)? {
            Some(row) if row.has_inventory() => row,
            _ => return Ok(Inventory::new()),
        };
        let text = row.inventory.as_deref().unwrap_or_default();
        debug!("Loading inventory: {text}");
        Ok(decode_inventory(text)?)
    }

    /// Row metadata for `key`.
    pub fn record(&self, key: &SpatialKey) -> Option<StandRecord> {
        match self.try_record(key) {
            Ok(row) => row,
            Err(err) => {
                warn!("Failed to read armor stand row at {key}: {err}");
                None
            }
        }
    }

    /// Row metadata for `key`.
    pub fn try_record(&self, key: &SpatialKey) -> Result<Option<StandRecord>, StoreError> {
        match self.handle()?.table.get(key.to_storage_key())? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Number of rows. Zero when closed.
    pub fn len(&self) -> usize {
        self.handle
            .as_ref()
            .map(|handle| handle.table.len())
            .unwrap_or(0)
    }

    /// True when no rows are stored (or the store is closed).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flush and release the database handle. Later calls are no-ops.
    pub fn close(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        if let Err(err) = handle.db.flush() {
            error!("Failed to flush armor stand store on close: {err}");
        }
        info!("Closed armor stand store");
    }

    #[cfg(test)]
    fn put_row(&self, key: &SpatialKey, row: &StandRecord) {
        let handle = self.handle().unwrap();
        handle
            .table
            .insert(key.to_storage_key(), bincode::serialize(row).unwrap())
            .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use standvault_core::{ItemStack, STORAGE_SLOTS};

    fn key() -> SpatialKey {
        SpatialKey::new("world", 10.5, 64.0, -3.5)
    }

    fn store() -> EquipmentStore {
        EquipmentStore::temporary().expect("temporary store")
    }

    #[test]
    fn register_is_idempotent() {
        let store = store();
        assert!(store.try_register(&key()).unwrap());
        assert!(!store.try_register(&key()).unwrap());
        store.register(&key());
        assert_eq!(store.len(), 1);
        assert!(store.is_registered(&key()));
    }

    #[test]
    fn register_keeps_existing_inventory() {
        let store = store();
        let mut inv = Inventory::new();
        inv.set(0, Some(ItemStack::new("DIAMOND_HELMET", 1)));
        store.save(&key(), &inv);

        store.register(&key());
        assert_eq!(store.load(&key()), inv);
    }

    #[test]
    fn remove_unregistered_is_noop() {
        let store = store();
        assert!(!store.try_remove(&key()).unwrap());
        store.remove(&key());
        assert!(store.is_empty());
    }

    #[test]
    fn remove_deletes_row() {
        let store = store();
        store.register(&key());
        store.remove(&key());
        assert!(!store.is_registered(&key()));
        assert!(store.record(&key()).is_none());
    }

    #[test]
    fn save_inserts_when_unregistered() {
        let store = store();
        let mut inv = Inventory::new();
        inv.set(4, Some(ItemStack::new("STICK", 1)));

        assert_eq!(store.try_save(&key(), &inv).unwrap(), SaveOutcome::Inserted);
        assert_eq!(store.len(), 1);
        assert_eq!(store.load(&key()), inv);
    }

    #[test]
    fn save_updates_registered_row_in_place() {
        let store = store();
        store.register(&key());
        let before = store.record(&key()).unwrap();
        assert!(!before.has_inventory());

        let mut inv = Inventory::new();
        inv.set(1, Some(ItemStack::new("ELYTRA", 1)));
        assert_eq!(store.try_save(&key(), &inv).unwrap(), SaveOutcome::Updated);

        let after = store.record(&key()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(after.id, before.id);
        assert_eq!(after.registered_at, before.registered_at);
        assert!(after.has_inventory());
    }

    #[test]
    fn save_empty_inventory_on_registered_row() {
        let store = store();
        store.register(&key());
        assert_eq!(
            store.try_save(&key(), &Inventory::new()).unwrap(),
            SaveOutcome::Updated
        );
        assert_eq!(store.len(), 1);
        assert!(store.load(&key()).is_empty());
    }

    #[test]
    fn load_missing_or_unsaved_is_empty() {
        let store = store();
        let inv = store.load(&key());
        assert_eq!(inv.as_slice().len(), STORAGE_SLOTS);
        assert!(inv.is_empty());

        store.register(&key());
        assert!(store.load(&key()).is_empty());
    }

    #[test]
    fn corrupt_blob_loads_empty() {
        let store = store();
        let mut row = StandRecord::new(1, &key(), Some("not base64!!".to_string()));
        store.put_row(&key(), &row);
        assert!(store.try_load(&key()).is_err());
        assert!(store.load(&key()).is_empty());

        // Valid base64 around a truncated frame.
        let mut inv = Inventory::new();
        inv.set(3, Some(ItemStack::new("LEATHER_BOOTS", 1)));
        let bytes = crate::codec::encode_bytes(&inv).unwrap();
        row.inventory = Some(STANDARD.encode(&bytes[..bytes.len() - 2]));
        store.put_row(&key(), &row);
        assert!(store.load(&key()).is_empty());

        // The corrupt row is left as is.
        assert_eq!(store.record(&key()).unwrap().inventory, row.inventory);
    }

    #[test]
    fn save_replaces_unreadable_row() {
        let store = store();
        store
            .handle()
            .unwrap()
            .table
            .insert(key().to_storage_key(), vec![0xFF, 0x01])
            .unwrap();
        assert!(store.record(&key()).is_none());

        let mut inv = Inventory::new();
        inv.set(0, Some(ItemStack::new("IRON_HELMET", 1)));
        assert_eq!(store.try_save(&key(), &inv).unwrap(), SaveOutcome::Inserted);
        assert_eq!(store.load(&key()), inv);
    }

    #[test]
    fn keys_differ_by_exact_coordinates() {
        let store = store();
        let a = SpatialKey::new("world", 0.1 + 0.2, 64.0, 0.0);
        let b = SpatialKey::new("world", 0.3, 64.0, 0.0);
        store.register(&a);
        assert!(!store.is_registered(&b));
        store.register(&b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn long_world_names_get_separate_rows() {
        let store = store();
        let prefix = "w".repeat(70_000);
        let a = SpatialKey::new(format!("{prefix}_alpha"), 1.0, 2.0, 3.0);
        let b = SpatialKey::new(format!("{prefix}_beta"), 1.0, 2.0, 3.0);

        let mut inv = Inventory::new();
        inv.set(0, Some(ItemStack::new("IRON_HELMET", 1)));
        store.save(&a, &inv);

        assert!(!store.is_registered(&b));
        assert!(store.load(&b).is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn operations_after_close_degrade() {
        let mut store = store();
        let mut inv = Inventory::new();
        inv.set(0, Some(ItemStack::new("IRON_HELMET", 1)));
        store.save(&key(), &inv);

        store.close();
        assert!(!store.is_open());
        assert!(matches!(store.try_load(&key()), Err(StoreError::Closed)));
        assert!(store.load(&key()).is_empty());
        assert!(!store.is_registered(&key()));
        store.save(&key(), &inv);
        store.register(&key());
        store.remove(&key());
        assert_eq!(store.len(), 0);

        // Closing twice is harmless.
        store.close();
    }

    #[test]
    fn detached_store_is_inert() {
        let store = EquipmentStore::detached();
        store.register(&key());
        assert!(!store.is_registered(&key()));
        assert!(store.load(&key()).is_empty());
    }
}
