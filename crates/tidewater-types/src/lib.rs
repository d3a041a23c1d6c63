//! Shared type definitions for the Tidewater fishing game.
//!
//! This crate is the single source of truth for the records that flow
//! between the catch engine, the session state, and the save files.
//!
//! # Modules
//!
//! - [`enums`] -- Day periods, screens, gear slots, inventory sort orders
//! - [`structs`] -- Catchable entities and gear

pub mod enums;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{GearSlot, InventorySort, Screen, TimeOfDay};
pub use structs::{Entity, Gear, Loadout};
