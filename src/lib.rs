#![warn(missing_docs)]
//! Persistent storage views for armor stand equipment.
//!
//! Sneaking players open a 27-slot view on an armor stand. The first rows
//! mirror the stand's armor and hands; edits are applied to the live
//! equipment one turn later and persisted per stand location.

pub mod config;
pub mod logging;
pub mod plugin;
pub mod scheduler;
pub mod session;
pub mod sync;

pub use config::{Config, ConfigError};
pub use plugin::{Plugin, CONFIG_FILE};
pub use scheduler::TurnScheduler;
pub use session::SessionTable;
pub use sync::{InteractRequest, MutationKind, OpenOutcome, SeedSource, Synchronizer};
