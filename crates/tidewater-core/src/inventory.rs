//! The player's unsold catches.
//!
//! Totals are maintained alongside the item list and are never accepted from
//! outside: building an inventory from stored items recomputes them.

use std::collections::BTreeMap;

use serde::Serialize;
use tidewater_types::{Entity, InventorySort};

/// Ordered list of caught entities with running weight and value totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<Entity>,
    total_weight: u64,
    total_value: u64,
}

/// One line of the grouped inventory view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatchSummary {
    /// Entity name.
    pub name: String,
    /// How many are held.
    pub count: u64,
    /// Combined weight.
    pub weight: u64,
    /// Combined value.
    pub value: u64,
    /// Catalog rarity of the entity.
    pub rarity: u32,
}

impl Inventory {
    /// An empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored items, recomputing totals.
    pub fn from_items(items: Vec<Entity>) -> Self {
        let mut inventory = Self {
            items: Vec::with_capacity(items.len()),
            total_weight: 0,
            total_value: 0,
        };
        for item in items {
            inventory.push(item);
        }
        inventory
    }

    /// Append a catch and update totals.
    pub fn push(&mut self, entity: Entity) {
        self.total_weight = self.total_weight.saturating_add(u64::from(entity.weight));
        self.total_value = self.total_value.saturating_add(u64::from(entity.value));
        self.items.push(entity);
    }

    /// Remove everything, returning the value that was held.
    pub fn clear(&mut self) -> u64 {
        let value = self.total_value;
        self.items.clear();
        self.total_weight = 0;
        self.total_value = 0;
        value
    }

    /// Catches in the order they were landed.
    pub fn items(&self) -> &[Entity] {
        &self.items
    }

    /// Number of catches held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is held.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all item weights.
    pub const fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Sum of all item values.
    pub const fn total_value(&self) -> u64 {
        self.total_value
    }

    /// Group items by name and order the groups by `sort`.
    pub fn summarize(&self, sort: InventorySort) -> Vec<CatchSummary> {
        summarize(&self.items, sort)
    }
}

/// Group `items` by name and order the groups by `sort`. Ties fall back to
/// name order so the output is stable.
pub fn summarize(items: &[Entity], sort: InventorySort) -> Vec<CatchSummary> {
    let mut groups: BTreeMap<&str, CatchSummary> = BTreeMap::new();
    for item in items {
        let entry = groups
            .entry(item.name.as_str())
            .or_insert_with(|| CatchSummary {
                name: item.name.clone(),
                count: 0,
                weight: 0,
                value: 0,
                rarity: item.rarity,
            });
        entry.count = entry.count.saturating_add(1);
        entry.weight = entry.weight.saturating_add(u64::from(item.weight));
        entry.value = entry.value.saturating_add(u64::from(item.value));
    }

    let mut rows: Vec<CatchSummary> = groups.into_values().collect();
    match sort {
        InventorySort::Rarity => rows.sort_by(|a, b| a.rarity.cmp(&b.rarity).then_with(|| a.name.cmp(&b.name))),
        InventorySort::Weight => rows.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.name.cmp(&b.name))),
        InventorySort::Value => rows.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name))),
        InventorySort::Quantity => rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name))),
    }
    rows
}
