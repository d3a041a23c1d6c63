//! Offline and idle catch-up.
//!
//! Time elapsed since the last sweep is converted into catches at a fixed
//! rate per minute, scaled by the weather. The fractional remainder becomes
//! one extra catch with matching probability.

use chrono::{DateTime, Utc};
use tidewater_types::Entity;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::random::RandomSource;

/// Milliseconds in a minute, for fractional minute arithmetic.
const MS_PER_MINUTE: f64 = 60_000.0;

/// Catches per minute at neutral weather.
pub const DEFAULT_IDLE_RATE: f64 = 0.3;

/// Credit catches for the time between `last_active` and `now`.
///
/// Less than a minute away (including a clock that went backwards) is a
/// no-op and leaves `last_active` untouched. Otherwise `last_active` moves
/// to `now`, and each catch is a uniform draw from the whole catalog.
pub fn account_for_absence(
    now: DateTime<Utc>,
    last_active: &mut DateTime<Utc>,
    rate: f64,
    weather_factor: f64,
    catalog: &Catalog,
    rng: &mut impl RandomSource,
) -> Vec<Entity> {
    let minutes_away = minutes_between(*last_active, now);
    if minutes_away < 1.0 {
        return Vec::new();
    }

    let expected = (rate * minutes_away * weather_factor).max(0.0);
    let whole = expected.floor();
    let fraction = expected - whole;
    let mut count = float_to_count(whole);
    if fraction > 0.0 && rng.uniform(0.0, 1.0) < fraction {
        count = count.saturating_add(1);
    }

    let all = catalog.all();
    let caught: Vec<Entity> = (0..count)
        .filter_map(|_| all.get(rng.index(all.len())).cloned())
        .collect();

    *last_active = now;
    if caught.is_empty() {
        debug!(minutes_away, "idle sweep found nothing");
    } else {
        info!(minutes_away, catches = caught.len(), "idle catches credited");
    }
    caught
}

/// Fractional minutes from `from` to `to`; negative if `to` is earlier.
#[allow(clippy::cast_precision_loss)]
fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MS_PER_MINUTE
}

/// Convert a non-negative whole float to a count, saturating.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_to_count(whole: f64) -> usize {
    if whole.is_finite() && whole > 0.0 {
        whole as usize
    } else {
        0
    }
}
