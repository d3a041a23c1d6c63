//! On-disk record types.
//!
//! Two kinds of record are written: one [`GameSave`] holding the player and
//! environment, and one [`DailySave`] per calendar day holding that day's
//! catches. Both are plain JSON documents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tidewater_types::{Entity, Gear};

/// Persisted player state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Coins on hand.
    pub money: u64,
    /// Equipped rod.
    pub rod: Gear,
    /// Equipped bait.
    pub bait: Gear,
    /// Unsold catches in the order they were landed. Totals are not stored;
    /// they are recomputed from this list on load.
    #[serde(default)]
    pub inventory: Vec<Entity>,
}

/// The main save record, one per save directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSave {
    /// Player money, gear, and inventory.
    pub player: PlayerRecord,
    /// Weather factor at the time of saving.
    pub weather_factor: f64,
    /// Last time idle catches were credited.
    pub last_active_time: DateTime<Utc>,
    /// Whether auto-fishing was switched on.
    pub auto_fishing: bool,
    /// When this record was written.
    pub save_time: DateTime<Utc>,
}

/// Everything caught on a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySave {
    /// The local calendar date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Catches in the order they were landed.
    pub fish_caught: Vec<Entity>,
    /// When this record was written.
    pub save_time: DateTime<Utc>,
}

/// Format a date the way day files are named: `YYYY-MM-DD`.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` day key. Returns `None` for anything else.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn day_keys_are_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(day_key(date), "2026-03-07");
        assert_eq!(parse_day_key("2026-03-07"), Some(date));
    }

    #[test]
    fn malformed_day_keys_are_rejected() {
        assert_eq!(parse_day_key("game_state"), None);
        assert_eq!(parse_day_key("2026-13-01"), None);
        assert_eq!(parse_day_key("07-03-2026"), None);
    }

    #[test]
    fn daily_save_date_uses_day_key_format() {
        let record = DailySave {
            date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            fish_caught: Vec::new(),
            save_time: DateTime::<Utc>::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"date\":\"2026-10-18\""));
    }
}
