//! The catch model: whether a cast lands anything, and what.
//!
//! A cast rolls `uniform(0, roll_max) + rod + bait`, scaled by the weather
//! factor and the active period's catch factor. At or above the success
//! threshold something is landed, chosen in a fixed order:
//!
//! 1. trash, with a flat probability;
//! 2. a legendary creature, with a small probability boosted by fair
//!    weather and by night;
//! 3. otherwise a weighted draw over the fish active in the current period,
//!    with rarities nudged by weather and time of day.
//!
//! Everything here is a pure function of its inputs and the injected
//! [`RandomSource`].

use serde::Deserialize;
use tidewater_types::{Entity, Loadout, TimeOfDay};
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::environment::Environment;
use crate::random::RandomSource;

/// Tunable constants of the catch model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatchRules {
    /// Upper bound of the random part of the roll.
    #[serde(default = "default_roll_max")]
    pub roll_max: f64,

    /// Minimum scaled roll that lands a catch.
    #[serde(default = "default_success_threshold")]
    pub success_threshold: f64,

    /// Probability that a successful cast lands trash.
    #[serde(default = "default_trash_chance")]
    pub trash_chance: f64,

    /// Base probability of a legendary catch.
    #[serde(default = "default_legendary_base")]
    pub legendary_base: f64,

    /// Added to the legendary probability in fair weather.
    #[serde(default = "default_legendary_weather_bonus")]
    pub legendary_weather_bonus: f64,

    /// Added to the legendary probability at night.
    #[serde(default = "default_legendary_night_bonus")]
    pub legendary_night_bonus: f64,

    /// Weather factor above which conditions count as fair.
    #[serde(default = "default_fair_weather")]
    pub fair_weather: f64,

    /// Weather factor below which conditions count as poor.
    #[serde(default = "default_poor_weather")]
    pub poor_weather: f64,

    /// Rarity bonus for an entity during its preferred period.
    #[serde(default = "default_preferred_time_bonus")]
    pub preferred_time_bonus: u32,
}

impl Default for CatchRules {
    fn default() -> Self {
        Self {
            roll_max: default_roll_max(),
            success_threshold: default_success_threshold(),
            trash_chance: default_trash_chance(),
            legendary_base: default_legendary_base(),
            legendary_weather_bonus: default_legendary_weather_bonus(),
            legendary_night_bonus: default_legendary_night_bonus(),
            fair_weather: default_fair_weather(),
            poor_weather: default_poor_weather(),
            preferred_time_bonus: default_preferred_time_bonus(),
        }
    }
}

const fn default_roll_max() -> f64 {
    10.0
}

const fn default_success_threshold() -> f64 {
    5.0
}

const fn default_trash_chance() -> f64 {
    0.12
}

const fn default_legendary_base() -> f64 {
    0.005
}

const fn default_legendary_weather_bonus() -> f64 {
    0.005
}

const fn default_legendary_night_bonus() -> f64 {
    0.01
}

const fn default_fair_weather() -> f64 {
    1.2
}

const fn default_poor_weather() -> f64 {
    0.8
}

const fn default_preferred_time_bonus() -> u32 {
    3
}

/// Result of one cast.
#[derive(Debug, Clone, PartialEq)]
pub enum CatchOutcome {
    /// Something was landed.
    Caught {
        /// What was caught.
        entity: Entity,
        /// The scaled roll.
        chance: f64,
    },
    /// Nothing bit.
    Missed {
        /// The scaled roll.
        chance: f64,
    },
}

impl CatchOutcome {
    /// The landed entity, if any.
    pub const fn entity(&self) -> Option<&Entity> {
        match self {
            Self::Caught { entity, .. } => Some(entity),
            Self::Missed { .. } => None,
        }
    }

    /// Whether anything was landed.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Caught { .. })
    }

    /// The scaled roll behind this outcome.
    pub const fn chance(&self) -> f64 {
        match self {
            Self::Caught { chance, .. } | Self::Missed { chance } => *chance,
        }
    }
}

/// Scale a raw roll by gear, weather, and time of day.
pub fn catch_chance(roll: f64, loadout: &Loadout, env: &Environment) -> f64 {
    (roll + f64::from(loadout.rod.strength) + f64::from(loadout.bait.strength))
        * env.weather_factor()
        * env.time_factor()
}

/// Run one full cast.
pub fn attempt_catch(
    catalog: &Catalog,
    loadout: &Loadout,
    env: &Environment,
    rules: &CatchRules,
    rng: &mut impl RandomSource,
) -> CatchOutcome {
    let roll = rng.uniform(0.0, rules.roll_max);
    let chance = catch_chance(roll, loadout, env);
    if chance < rules.success_threshold {
        debug!(chance, "cast missed");
        return CatchOutcome::Missed { chance };
    }
    match select_entity(catalog, env, rules, rng) {
        Some(entity) => {
            debug!(chance, entity = %entity.name, "cast landed");
            CatchOutcome::Caught {
                entity: entity.clone(),
                chance,
            }
        }
        None => {
            warn!(chance, "no entity could be selected");
            CatchOutcome::Missed { chance }
        }
    }
}

/// Choose what a successful cast lands.
///
/// Returns `None` only when there is nothing at all to draw from, which a
/// validated catalog rules out.
pub fn select_entity<'a>(
    catalog: &'a Catalog,
    env: &Environment,
    rules: &CatchRules,
    rng: &mut impl RandomSource,
) -> Option<&'a Entity> {
    let period = env.time_of_day();

    if rng.uniform(0.0, 1.0) < rules.trash_chance {
        let trash = catalog.trash_only();
        if !trash.is_empty() {
            return trash.get(rng.index(trash.len())).copied();
        }
    }

    if rng.uniform(0.0, 1.0) < legendary_threshold(env, rules) {
        let legendary = catalog.legendary_only();
        let in_season: Vec<&Entity> = legendary
            .iter()
            .copied()
            .filter(|e| e.is_active_during(period))
            .collect();
        let pool = if in_season.is_empty() {
            legendary
        } else {
            in_season
        };
        if !pool.is_empty() {
            return pool.get(rng.index(pool.len())).copied();
        }
    }

    let mut candidates = catalog.by_preferred_time(period);
    if candidates.is_empty() {
        candidates = catalog.all().iter().collect();
    }
    let weighted: Vec<(&Entity, u32)> = candidates
        .into_iter()
        .map(|e| (e, adjusted_rarity(e, env, rules)))
        .collect();
    let total: u64 = weighted.iter().map(|(_, w)| u64::from(*w)).sum();
    let draw = rng.index(usize::try_from(total).unwrap_or(usize::MAX));
    let draw = u64::try_from(draw).unwrap_or(u64::MAX);
    weighted_pick(&weighted, draw).or_else(|| weighted.first().map(|(e, _)| *e))
}

/// Probability that a successful non-trash cast lands a legendary.
pub fn legendary_threshold(env: &Environment, rules: &CatchRules) -> f64 {
    let mut threshold = rules.legendary_base;
    if env.weather_factor() > rules.fair_weather {
        threshold += rules.legendary_weather_bonus;
    }
    if env.time_of_day() == TimeOfDay::Night {
        threshold += rules.legendary_night_bonus;
    }
    threshold
}

/// Selection weight of `entity` under the current conditions. Never below 1.
pub fn adjusted_rarity(entity: &Entity, env: &Environment, rules: &CatchRules) -> u32 {
    let weather = env.weather_factor();
    let period = env.time_of_day();
    let mut rarity = entity.rarity;

    if weather > rules.fair_weather && entity.rarity <= 2 {
        rarity = rarity.saturating_add(1);
    }
    if weather < rules.poor_weather && entity.rarity >= 8 {
        rarity = rarity.saturating_sub(1);
    }

    if entity.prefers(period) {
        rarity = rarity.saturating_add(rules.preferred_time_bonus);
    } else if period_nudge(entity, period) {
        rarity = rarity.saturating_add(1);
    }

    rarity.max(1)
}

/// Habitat, size, and color affinities for entities outside their
/// preferred period.
fn period_nudge(entity: &Entity, period: TimeOfDay) -> bool {
    match period {
        TimeOfDay::Morning => entity.habitat.to_lowercase().contains("surface"),
        TimeOfDay::Afternoon => entity.habitat.to_lowercase().contains("deep"),
        TimeOfDay::Evening => entity.weight > 20,
        TimeOfDay::Night => {
            let color = entity.color.to_lowercase();
            color.contains("black") || color.contains("dark")
        }
    }
}

/// The first entity whose running weight sum exceeds `draw`.
pub fn weighted_pick<'a>(candidates: &[(&'a Entity, u32)], draw: u64) -> Option<&'a Entity> {
    let mut running: u64 = 0;
    for (entity, weight) in candidates {
        running = running.saturating_add(u64::from(*weight));
        if draw < running {
            return Some(entity);
        }
    }
    None
}
