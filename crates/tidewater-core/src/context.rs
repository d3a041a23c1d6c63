//! Read-only state shared by every task: configuration, catalog, day
//! schedule, and save store.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, Utc};
use tidewater_store::SaveStore;
use tidewater_types::{Gear, Loadout};

use crate::catalog::Catalog;
use crate::config::{ConfigError, GameConfig};
use crate::environment::{DaySchedule, WeatherRange};

/// Validated, immutable game setup.
#[derive(Debug, Clone)]
pub struct GameContext {
    /// The configuration this context was built from.
    pub config: GameConfig,
    /// Entities that can be caught.
    pub catalog: Arc<Catalog>,
    /// Validated day periods.
    pub schedule: DaySchedule,
    /// Validated weather bounds.
    pub weather_range: WeatherRange,
    /// Where progress is written.
    pub store: SaveStore,
    utc_offset: Option<FixedOffset>,
}

impl GameContext {
    /// Validate `config` and assemble a context.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration fails validation.
    pub fn new(config: GameConfig, catalog: Arc<Catalog>, store: SaveStore) -> Result<Self, ConfigError> {
        config.validate()?;
        let schedule = DaySchedule::new(config.periods.clone())?;
        let weather_range = WeatherRange::new(config.weather.min, config.weather.max)?;
        Ok(Self {
            config,
            catalog,
            schedule,
            weather_range,
            store,
            utc_offset: None,
        })
    }

    /// Use a fixed UTC offset instead of the system time zone for calendar
    /// dates and day periods.
    #[must_use]
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = Some(offset);
        self
    }

    /// Local calendar date of `now`; catches are logged under this date.
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        match self.utc_offset {
            Some(offset) => now.with_timezone(&offset).date_naive(),
            None => now.with_timezone(&Local).date_naive(),
        }
    }

    /// Local wall-clock time of `now`; selects the day period.
    pub fn local_time(&self, now: DateTime<Utc>) -> NaiveTime {
        match self.utc_offset {
            Some(offset) => now.with_timezone(&offset).time(),
            None => now.with_timezone(&Local).time(),
        }
    }

    /// Rod and bait a fresh player starts with.
    pub fn starting_loadout(&self) -> Loadout {
        let player = &self.config.player;
        Loadout {
            rod: Gear::new(player.rod_name.clone(), player.rod_strength),
            bait: Gear::new(player.bait_name.clone(), player.bait_strength),
        }
    }
}
