#![warn(missing_docs)]
//! Durable armor stand inventory storage.
//!
//! One row per [`SpatialKey`](standvault_core::SpatialKey) in the
//! `armor_stands` table of an embedded database file. Inventories are stored
//! as base64 text of a count + (slot, item) framing.

mod codec;
mod error;
mod record;
mod store;

pub use codec::{decode_bytes, decode_inventory, encode_bytes, encode_inventory, CodecError};
pub use error::StoreError;
pub use record::StandRecord;
pub use store::{EquipmentStore, SaveOutcome, TABLE_NAME};
