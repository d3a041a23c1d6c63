//! Enumeration types shared across the Tidewater workspace.
//!
//! Covers the day periods that modulate catch odds, the screen the player
//! is currently looking at, gear slots, and inventory sort orders.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Time of day
// ---------------------------------------------------------------------------

/// A named period of the day. Each period carries its own catch factor,
/// configured on the day schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    /// Early biters; surface feeders are more active.
    Morning,
    /// Slower fishing in the midday heat; deep-water fish come up.
    Afternoon,
    /// Prime hours; large predators are hunting.
    Evening,
    /// Nocturnal species and most legendary creatures.
    Night,
}

impl TimeOfDay {
    /// Every period, in chronological order starting from morning.
    pub const ALL: [Self; 4] = [Self::Morning, Self::Afternoon, Self::Evening, Self::Night];

    /// Human-readable name of the period.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
            Self::Night => "Night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

/// What the player is currently looking at.
///
/// Background tasks read this under the session lock to avoid resolving an
/// auto-fishing catch while a foreground cast or its result is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Screen {
    /// Main menu.
    #[default]
    Menu,
    /// A foreground cast is in progress.
    Fishing,
    /// The result of the last cast is displayed.
    FishResult,
    /// The auto-fishing status view.
    AutoFishing,
    /// The inventory listing.
    Inventory,
    /// Browsing the per-day catch history.
    History,
}

impl Screen {
    /// Whether a background catch must wait while this screen is shown.
    pub const fn blocks_background_catch(self) -> bool {
        matches!(self, Self::Fishing | Self::FishResult)
    }
}

// ---------------------------------------------------------------------------
// Gear
// ---------------------------------------------------------------------------

/// Which piece of equipment a purchase replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GearSlot {
    /// The fishing rod.
    Rod,
    /// The bait on the hook.
    Bait,
}

impl fmt::Display for GearSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rod => f.write_str("rod"),
            Self::Bait => f.write_str("bait"),
        }
    }
}

// ---------------------------------------------------------------------------
// Inventory ordering
// ---------------------------------------------------------------------------

/// Ordering applied to the grouped inventory summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InventorySort {
    /// Rarest first, then alphabetical.
    #[default]
    Rarity,
    /// Heaviest total weight first.
    Weight,
    /// Most valuable total first.
    Value,
    /// Most caught first.
    Quantity,
}

impl InventorySort {
    /// Parse a sort mode from a short name such as `"weight"` or `"qty"`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "rarity" | "rare" | "name" => Some(Self::Rarity),
            "weight" | "wt" => Some(Self::Weight),
            "value" | "val" => Some(Self::Value),
            "quantity" | "qty" | "count" => Some(Self::Quantity),
            _ => None,
        }
    }
}
