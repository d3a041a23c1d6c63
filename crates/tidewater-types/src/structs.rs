//! Core record structs: catchable entities and the player's gear.

use serde::{Deserialize, Serialize};

use crate::enums::TimeOfDay;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A catchable item: an ordinary fish, a legendary creature, or trash.
///
/// Entities are immutable once the catalog is built. Copies of them are
/// stored in the inventory and in the per-day catch log, so the struct is
/// also the on-disk snapshot format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Display name, unique within the catalog.
    pub name: String,
    /// Weight in pounds.
    pub weight: u32,
    /// Selection weight from 1 (rarest) to 10 (most common).
    pub rarity: u32,
    /// Sale value in coins.
    pub value: u32,
    /// Message shown when this entity is landed.
    pub catch_message: String,
    /// Primary color.
    pub color: String,
    /// Body pattern.
    pub pattern: String,
    /// Where the entity is typically found.
    pub habitat: String,
    /// Period when the entity is most active; `None` means no preference.
    pub preferred_time: Option<TimeOfDay>,
    /// Junk rather than a fish.
    pub is_trash: bool,
    /// Mythical creature. Favored by the legendary roll, and still eligible
    /// for the ordinary weighted draw.
    pub is_legendary: bool,
}

impl Entity {
    /// Whether the entity can be drawn during `period`: it either prefers
    /// that period or has no preference at all.
    pub fn is_active_during(&self, period: TimeOfDay) -> bool {
        self.preferred_time.is_none_or(|preferred| preferred == period)
    }

    /// Whether the entity prefers exactly `period`.
    pub fn prefers(&self, period: TimeOfDay) -> bool {
        self.preferred_time == Some(period)
    }
}

// ---------------------------------------------------------------------------
// Gear
// ---------------------------------------------------------------------------

/// One piece of equipment. Strength adds directly to the catch roll.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gear {
    /// Display name.
    pub name: String,
    /// Contribution to the catch roll; always at least 1.
    pub strength: u32,
}

impl Gear {
    /// Create a piece of gear. A strength of 0 is raised to 1.
    pub fn new(name: impl Into<String>, strength: u32) -> Self {
        Self {
            name: name.into(),
            strength: strength.max(1),
        }
    }
}

/// The rod and bait currently equipped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Loadout {
    /// The fishing rod.
    pub rod: Gear,
    /// The bait.
    pub bait: Gear,
}

impl Loadout {
    /// Combined strength of rod and bait.
    pub const fn strength(&self) -> u32 {
        self.rod.strength.saturating_add(self.bait.strength)
    }
}
