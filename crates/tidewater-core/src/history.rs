//! Per-day catch log.
//!
//! Each local calendar date maps to the catches landed that day, in order.
//! Days touched since the last successful save are tracked as dirty so only
//! they are rewritten.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use tidewater_types::{Entity, InventorySort};

use crate::inventory::{CatchSummary, summarize};

/// Append-only catch history keyed by local date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatchLog {
    days: BTreeMap<NaiveDate, Vec<Entity>>,
    dirty: BTreeSet<NaiveDate>,
}

/// Aggregate numbers for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    /// The day summarized.
    pub date: NaiveDate,
    /// Number of catches.
    pub catches: u64,
    /// Combined weight.
    pub total_weight: u64,
    /// Combined value.
    pub total_value: u64,
    /// Legendary creatures among the catches.
    pub legendary: u64,
    /// Trash among the catches.
    pub trash: u64,
    /// Per-name breakdown, rarest first.
    pub breakdown: Vec<CatchSummary>,
}

impl CatchLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from stored days. Nothing is marked dirty.
    pub fn from_days(days: impl IntoIterator<Item = (NaiveDate, Vec<Entity>)>) -> Self {
        Self {
            days: days.into_iter().collect(),
            dirty: BTreeSet::new(),
        }
    }

    /// Append a catch to `date` and mark it dirty.
    pub fn record(&mut self, date: NaiveDate, entity: Entity) {
        self.days.entry(date).or_default().push(entity);
        self.dirty.insert(date);
    }

    /// Dates with at least one catch, oldest first.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.days
            .iter()
            .filter(|(_, catches)| !catches.is_empty())
            .map(|(date, _)| *date)
            .collect()
    }

    /// Catches on `date`, in landing order. Empty if none.
    pub fn catches_on(&self, date: NaiveDate) -> &[Entity] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or_default()
    }

    /// Totals and per-name breakdown for `date`.
    pub fn day_summary(&self, date: NaiveDate) -> DaySummary {
        let catches = self.catches_on(date);
        let count = |pred: fn(&Entity) -> bool| {
            catches.iter().filter(|e| pred(e)).fold(0_u64, |n, _| n.saturating_add(1))
        };
        DaySummary {
            date,
            catches: count(|_| true),
            total_weight: catches
                .iter()
                .fold(0_u64, |sum, e| sum.saturating_add(u64::from(e.weight))),
            total_value: catches
                .iter()
                .fold(0_u64, |sum, e| sum.saturating_add(u64::from(e.value))),
            legendary: count(|e| e.is_legendary),
            trash: count(|e| e.is_trash),
            breakdown: summarize(catches, InventorySort::Rarity),
        }
    }

    /// Whether any day awaits saving.
    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Take the set of days awaiting saving, clearing it.
    pub fn take_dirty(&mut self) -> BTreeSet<NaiveDate> {
        std::mem::take(&mut self.dirty)
    }

    /// Put days back on the dirty set after a failed save.
    pub fn mark_dirty(&mut self, dates: impl IntoIterator<Item = NaiveDate>) {
        self.dirty.extend(dates);
    }
}
