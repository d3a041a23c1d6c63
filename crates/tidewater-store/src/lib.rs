//! Storage layer for the Tidewater fishing game.
//!
//! Progress is kept in plain JSON files under one save directory: a main
//! game record and one record per calendar day with catches. The core
//! decides *when* to write; this crate only knows *how*.
//!
//! # Modules
//!
//! - [`records`] -- Serializable record types and day-key helpers
//! - [`save_store`] -- Atomic file reads and writes
//! - [`error`] -- Shared error types

pub mod error;
pub mod records;
pub mod save_store;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use records::{DailySave, GameSave, PlayerRecord, day_key, parse_day_key};
pub use save_store::SaveStore;
