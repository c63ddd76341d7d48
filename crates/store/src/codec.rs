//! Slot framing for stored inventories.
//!
//! Binary layout (all integers i32 little-endian):
//!
//! ```text
//! count
//! count x (slot index, item)
//! ```
//!
//! Only occupied slots are written, in ascending slot order. Items are
//! bincode-encoded [`ItemStack`]s. The whole blob is stored as standard
//! base64 text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bincode::Options;
use standvault_core::{Inventory, ItemStack, STORAGE_SLOTS};
use thiserror::Error;
use tracing::debug;

/// Upper bound on a single encoded item.
const MAX_ITEM_BYTES: u64 = 64 * 1024;

/// Errors decoding or encoding a stored inventory.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Text is not valid base64.
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Ran out of bytes while reading a framing integer.
    #[error("truncated while reading {0}")]
    Truncated(&'static str),

    /// Slot count is negative.
    #[error("negative slot count {0}")]
    NegativeCount(i32),

    /// Item bytes failed to encode or decode.
    #[error("item: {0}")]
    Item(#[from] bincode::Error),
}

fn item_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(MAX_ITEM_BYTES)
}

/// Encode an inventory to base64 text.
pub fn encode_inventory(inventory: &Inventory) -> Result<String, CodecError> {
    Ok(STANDARD.encode(encode_bytes(inventory)?))
}

/// Decode base64 text into a 27-slot inventory. Empty text is an empty inventory.
pub fn decode_inventory(text: &str) -> Result<Inventory, CodecError> {
    if text.is_empty() {
        return Ok(Inventory::new());
    }
    let bytes = STANDARD.decode(text)?;
    decode_bytes(&bytes)
}

/// Encode the binary framing of an inventory.
pub fn encode_bytes(inventory: &Inventory) -> Result<Vec<u8>, CodecError> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&(inventory.occupied_count() as i32).to_le_bytes());

    for (slot, stack) in inventory.occupied() {
        bytes.extend_from_slice(&(slot as i32).to_le_bytes());
        item_options().serialize_into(&mut bytes, stack)?;
    }

    Ok(bytes)
}

/// Decode the binary framing into a 27-slot inventory.
///
/// Entries whose slot index falls outside `0..27` are read and skipped.
pub fn decode_bytes(bytes: &[u8]) -> Result<Inventory, CodecError> {
    let mut reader = bytes;
    let count = read_i32(&mut reader, "slot count")?;
    if count < 0 {
        return Err(CodecError::NegativeCount(count));
    }

    let mut inventory = Inventory::new();
    for _ in 0..count {
        let slot = read_i32(&mut reader, "slot index")?;
        let stack: ItemStack = item_options().deserialize_from(&mut reader)?;

        match usize::try_from(slot) {
            Ok(slot) if slot < STORAGE_SLOTS => {
                inventory.set(slot, Some(stack));
            }
            _ => debug!("Ignoring stored item in out-of-range slot {slot}"),
        }
    }

    Ok(inventory)
}

fn read_i32(reader: &mut &[u8], what: &'static str) -> Result<i32, CodecError> {
    if reader.len() < 4 {
        return Err(CodecError::Truncated(what));
    }
    let (head, rest) = reader.split_at(4);
    *reader = rest;
    Ok(i32::from_le_bytes([head[0], head[1], head[2], head[3]]))
}
