use crate::codec::CodecError;
use thiserror::Error;

/// Errors raised inside the store. Public operations log these and fall back
/// to a safe default; the `try_*` variants return them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store handle was closed or never opened.
    #[error("store is closed")]
    Closed,

    /// Embedded database failure.
    #[error("database error: {0}")]
    Database(#[from] sled::Error),

    /// Filesystem failure preparing the database location.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A row could not be encoded or decoded.
    #[error("malformed row: {0}")]
    Row(#[from] bincode::Error),

    /// The stored inventory text could not be decoded.
    #[error("malformed stored inventory: {0}")]
    Codec(#[from] CodecError),
}
