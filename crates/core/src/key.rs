//! Spatial identity of a tracked entity.
//!
//! Tracked entities never move, so the world name plus the exact coordinate is
//! the persistent identity. Coordinates compare by bit pattern: two keys only
//! collide when every coordinate is bit-identical.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// World name + exact 3D coordinate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpatialKey {
    world: String,
    x: f64,
    y: f64,
    z: f64,
}

impl SpatialKey {
    /// Create a key for a location.
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }

    /// World the entity lives in.
    pub fn world(&self) -> &str {
        &self.world
    }

    /// X coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Z coordinate.
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Byte encoding used as the database key.
    ///
    /// Layout: world length (u64 BE), the full world bytes, then x, y, z as
    /// big-endian IEEE-754 bit patterns. Keys of one world sort together.
    pub fn to_storage_key(&self) -> Vec<u8> {
        let world = self.world.as_bytes();
        let mut bytes = Vec::with_capacity(8 + world.len() + 24);
        bytes.extend_from_slice(&(world.len() as u64).to_be_bytes());
        bytes.extend_from_slice(world);
        bytes.extend_from_slice(&self.x.to_bits().to_be_bytes());
        bytes.extend_from_slice(&self.y.to_bits().to_be_bytes());
        bytes.extend_from_slice(&self.z.to_bits().to_be_bytes());
        bytes
    }
}

impl PartialEq for SpatialKey {
    fn eq(&self, other: &Self) -> bool {
        self.world == other.world
            && self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.z.to_bits() == other.z.to_bits()
    }
}

impl Eq for SpatialKey {}

impl Hash for SpatialKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.world.hash(state);
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
        self.z.to_bits().hash(state);
    }
}

impl fmt::Display for SpatialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "World: {}, X: {:.2}, Y: {:.2}, Z: {:.2}",
            self.world, self.x, self.y, self.z
        )
    }
}
