//! The fixed, read-only list of catchable entities.
//!
//! A [`Catalog`] is built once at startup and shared behind an [`Arc`]. It
//! is validated at construction: it is never empty and every rarity is
//! strictly positive, so weighted selection can never draw from a zero
//! total.

use std::sync::{Arc, LazyLock};

use tidewater_types::{Entity, TimeOfDay};

use crate::standard_catalog;

/// Highest rarity still counted as "rare" by [`Catalog::rare_only`].
pub const RARE_MAX_RARITY: u32 = 2;

/// Structural problems detected while building a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// No entities were supplied.
    #[error("catalog must contain at least one entity")]
    Empty,

    /// An entity has a rarity of zero and could never be drawn.
    #[error("entity {name} has zero rarity")]
    ZeroRarity {
        /// Name of the offending entity.
        name: String,
    },
}

/// Immutable, validated list of entities in stable order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entities: Vec<Entity>,
}

static STANDARD: LazyLock<Arc<Catalog>> = LazyLock::new(|| {
    Arc::new(Catalog {
        entities: standard_catalog::entities(),
    })
});

impl Catalog {
    /// Build a catalog from `entities`, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Empty`] for an empty list and
    /// [`CatalogError::ZeroRarity`] for any entity with rarity 0.
    pub fn new(entities: Vec<Entity>) -> Result<Self, CatalogError> {
        if entities.is_empty() {
            return Err(CatalogError::Empty);
        }
        if let Some(bad) = entities.iter().find(|e| e.rarity == 0) {
            return Err(CatalogError::ZeroRarity {
                name: bad.name.clone(),
            });
        }
        Ok(Self { entities })
    }

    /// The built-in 70-entry catalog, shared process-wide.
    pub fn standard() -> Arc<Self> {
        Arc::clone(&STANDARD)
    }

    /// Every entity: regular fish, then legendary creatures, then trash.
    pub fn all(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of entities. Never zero.
    pub const fn len(&self) -> usize {
        self.entities.len()
    }

    /// Always `false`; provided for API symmetry with [`Catalog::len`].
    pub const fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Legendary creatures only.
    pub fn legendary_only(&self) -> Vec<&Entity> {
        self.entities.iter().filter(|e| e.is_legendary).collect()
    }

    /// Trash items only.
    pub fn trash_only(&self) -> Vec<&Entity> {
        self.entities.iter().filter(|e| e.is_trash).collect()
    }

    /// Entities that prefer `period`, plus all entities with no preference.
    pub fn by_preferred_time(&self, period: TimeOfDay) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|e| e.is_active_during(period))
            .collect()
    }

    /// Non-trash entities with rarity at or below [`RARE_MAX_RARITY`].
    pub fn rare_only(&self) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|e| e.rarity <= RARE_MAX_RARITY && !e.is_trash)
            .collect()
    }

    /// Look an entity up by exact name.
    pub fn find(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, rarity: u32) -> Entity {
        Entity {
            name: name.to_owned(),
            weight: 1,
            rarity,
            value: 1,
            catch_message: String::new(),
            color: String::new(),
            pattern: String::new(),
            habitat: String::new(),
            preferred_time: None,
            is_trash: false,
            is_legendary: false,
        }
    }

    #[test]
    fn standard_table_passes_validation() {
        let built = Catalog::new(standard_catalog::entities());
        assert!(built.is_ok());
        assert_eq!(Catalog::standard().len(), 70);
    }

    #[test]
    fn standard_table_is_ordered_by_category() {
        let catalog = Catalog::standard();
        let all = catalog.all();
        let first_legendary = all.iter().position(|e| e.is_legendary);
        let first_trash = all.iter().position(|e| e.is_trash);
        assert_eq!(first_legendary, Some(50));
        assert_eq!(first_trash, Some(60));
        assert_eq!(catalog.legendary_only().len(), 10);
        assert_eq!(catalog.trash_only().len(), 10);
    }

    #[test]
    fn empty_and_zero_rarity_are_rejected() {
        assert_eq!(Catalog::new(Vec::new()), Err(CatalogError::Empty));
        assert_eq!(
            Catalog::new(vec![named("Ok", 3), named("Ghost", 0)]),
            Err(CatalogError::ZeroRarity {
                name: String::from("Ghost")
            })
        );
    }

    #[test]
    fn time_filter_includes_unpreferring_entities() {
        let catalog = Catalog::standard();
        let night = catalog.by_preferred_time(TimeOfDay::Night);
        assert!(night.iter().any(|e| e.name == "Bullhead"));
        assert!(night.iter().any(|e| e.name == "Old Boot"));
        assert!(!night.iter().any(|e| e.name == "Minnow"));
    }

    #[test]
    fn rare_view_excludes_trash() {
        let catalog = Catalog::standard();
        let rare = catalog.rare_only();
        assert!(rare.iter().all(|e| e.rarity <= 2 && !e.is_trash));
        // Treasure Chest has rarity 2 but is trash.
        assert!(!rare.iter().any(|e| e.name == "Treasure Chest"));
        assert!(rare.iter().any(|e| e.name == "Kraken"));
    }

    #[test]
    fn find_by_name() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.find("Marlin").map(|e| e.weight), Some(180));
        assert!(catalog.find("Unicorn").is_none());
    }
}
