//! Configuration loading and typed config structures for Tidewater.
//!
//! The configuration lives in `tidewater.yaml` next to the binary by default.
//! Every section and field is optional; anything left out takes the value
//! shown in the section's `Default` impl. A missing file means all defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::catch::CatchRules;
use crate::environment::{DayPeriod, DaySchedule, EnvironmentError, WeatherRange, default_periods};
use crate::idle::DEFAULT_IDLE_RATE;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// Weather bounds or day periods are inconsistent.
    #[error("invalid environment config: {source}")]
    Environment {
        /// The underlying validation error.
        #[from]
        source: EnvironmentError,
    },

    /// Some other value is out of range.
    #[error("invalid config: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration, mirroring `tidewater.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Starting money and gear for a fresh save.
    #[serde(default)]
    pub player: PlayerConfig,

    /// Weather factor bounds.
    #[serde(default)]
    pub weather: WeatherRange,

    /// Catch model constants.
    #[serde(default)]
    pub catch: CatchRules,

    /// Idle catch-up rate.
    #[serde(default)]
    pub idle: IdleConfig,

    /// Background task cadences.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Day periods; must cover every hour exactly once.
    #[serde(default = "default_periods")]
    pub periods: Vec<DayPeriod>,

    /// Where saves are written.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Gear on sale.
    #[serde(default)]
    pub shop: ShopConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            weather: WeatherRange::default(),
            catch: CatchRules::default(),
            idle: IdleConfig::default(),
            schedule: ScheduleConfig::default(),
            periods: default_periods(),
            storage: StorageConfig::default(),
            shop: ShopConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load from `path`, falling back to defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Check every value that could break the catch model or the scheduler.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Environment`] for bad weather bounds or day
    /// periods and [`ConfigError::Invalid`] for anything else.
    pub fn validate(&self) -> Result<(), ConfigError> {
        WeatherRange::new(self.weather.min, self.weather.max)?;
        DaySchedule::new(self.periods.clone())?;

        let probability = |name: &str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(invalid(format!("{name} must be within [0, 1], got {value}")))
            }
        };
        probability("catch.trash_chance", self.catch.trash_chance)?;
        probability("catch.legendary_base", self.catch.legendary_base)?;
        probability("catch.legendary_weather_bonus", self.catch.legendary_weather_bonus)?;
        probability("catch.legendary_night_bonus", self.catch.legendary_night_bonus)?;

        if !self.catch.roll_max.is_finite() || self.catch.roll_max <= 0.0 {
            return Err(invalid("catch.roll_max must be positive"));
        }
        if !self.catch.success_threshold.is_finite() {
            return Err(invalid("catch.success_threshold must be finite"));
        }
        if !self.idle.rate_per_minute.is_finite() || self.idle.rate_per_minute < 0.0 {
            return Err(invalid("idle.rate_per_minute must be zero or positive"));
        }
        self.schedule.validate()?;

        if self.player.rod_strength == 0 || self.player.bait_strength == 0 {
            return Err(invalid("starting gear strength must be at least 1"));
        }
        for item in self.shop.rods.iter().chain(&self.shop.baits) {
            if item.strength == 0 {
                return Err(invalid(format!("shop item {} has zero strength", item.name)));
            }
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.into(),
    }
}

/// Starting state for a new player.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerConfig {
    /// Coins on hand at the start.
    #[serde(default = "default_starting_money")]
    pub starting_money: u64,

    /// Name of the starting rod.
    #[serde(default = "default_rod_name")]
    pub rod_name: String,

    /// Strength of the starting rod.
    #[serde(default = "default_gear_strength")]
    pub rod_strength: u32,

    /// Name of the starting bait.
    #[serde(default = "default_bait_name")]
    pub bait_name: String,

    /// Strength of the starting bait.
    #[serde(default = "default_gear_strength")]
    pub bait_strength: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            starting_money: default_starting_money(),
            rod_name: default_rod_name(),
            rod_strength: default_gear_strength(),
            bait_name: default_bait_name(),
            bait_strength: default_gear_strength(),
        }
    }
}

/// Idle catch-up settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdleConfig {
    /// Catches per minute away at neutral weather.
    #[serde(default = "default_idle_rate")]
    pub rate_per_minute: f64,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            rate_per_minute: default_idle_rate(),
        }
    }
}

/// Cadences of the background tasks, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleConfig {
    /// Idle catch-up sweep.
    #[serde(default = "default_idle_sweep_secs")]
    pub idle_sweep_secs: u64,

    /// Weather redraw.
    #[serde(default = "default_weather_refresh_secs")]
    pub weather_refresh_secs: u64,

    /// Day period recompute.
    #[serde(default = "default_time_refresh_secs")]
    pub time_refresh_secs: u64,

    /// Periodic save.
    #[serde(default = "default_autosave_secs")]
    pub autosave_secs: u64,

    /// Shortest wait between auto-fishing attempts.
    #[serde(default = "default_auto_fish_min_secs")]
    pub auto_fish_min_secs: u64,

    /// Longest wait between auto-fishing attempts.
    #[serde(default = "default_auto_fish_max_secs")]
    pub auto_fish_max_secs: u64,

    /// Shortest wait in fast mode.
    #[serde(default = "default_fast_min_secs")]
    pub fast_auto_fish_min_secs: u64,

    /// Longest wait in fast mode.
    #[serde(default = "default_fast_max_secs")]
    pub fast_auto_fish_max_secs: u64,
}

impl ScheduleConfig {
    /// Idle sweep cadence.
    pub const fn idle_sweep(&self) -> Duration {
        Duration::from_secs(self.idle_sweep_secs)
    }

    /// Weather refresh cadence.
    pub const fn weather_refresh(&self) -> Duration {
        Duration::from_secs(self.weather_refresh_secs)
    }

    /// Day period refresh cadence.
    pub const fn time_refresh(&self) -> Duration {
        Duration::from_secs(self.time_refresh_secs)
    }

    /// Autosave cadence.
    pub const fn autosave(&self) -> Duration {
        Duration::from_secs(self.autosave_secs)
    }

    /// Inclusive bounds, in seconds, of the wait before an auto-fishing
    /// attempt.
    pub const fn auto_fish_bounds(&self, fast: bool) -> (u64, u64) {
        if fast {
            (self.fast_auto_fish_min_secs, self.fast_auto_fish_max_secs)
        } else {
            (self.auto_fish_min_secs, self.auto_fish_max_secs)
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let cadences = [
            ("schedule.idle_sweep_secs", self.idle_sweep_secs),
            ("schedule.weather_refresh_secs", self.weather_refresh_secs),
            ("schedule.time_refresh_secs", self.time_refresh_secs),
            ("schedule.autosave_secs", self.autosave_secs),
        ];
        for (name, secs) in cadences {
            if secs == 0 {
                return Err(invalid(format!("{name} must be at least 1")));
            }
        }
        for fast in [false, true] {
            let (min, max) = self.auto_fish_bounds(fast);
            if min == 0 || min > max {
                return Err(invalid(format!(
                    "auto-fishing wait bounds [{min}, {max}] are invalid"
                )));
            }
        }
        Ok(())
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            idle_sweep_secs: default_idle_sweep_secs(),
            weather_refresh_secs: default_weather_refresh_secs(),
            time_refresh_secs: default_time_refresh_secs(),
            autosave_secs: default_autosave_secs(),
            auto_fish_min_secs: default_auto_fish_min_secs(),
            auto_fish_max_secs: default_auto_fish_max_secs(),
            fast_auto_fish_min_secs: default_fast_min_secs(),
            fast_auto_fish_max_secs: default_fast_max_secs(),
        }
    }
}

/// Save location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `game_state.json` and `days/`.
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
        }
    }
}

/// One piece of gear offered in the shop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopItem {
    /// Display name.
    pub name: String,
    /// Price in coins.
    pub cost: u64,
    /// Strength granted when equipped.
    pub strength: u32,
}

/// Gear available for purchase.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopConfig {
    /// Rods, cheapest first.
    #[serde(default = "default_shop_rods")]
    pub rods: Vec<ShopItem>,

    /// Baits, cheapest first.
    #[serde(default = "default_shop_baits")]
    pub baits: Vec<ShopItem>,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            rods: default_shop_rods(),
            baits: default_shop_baits(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_starting_money() -> u64 {
    50
}

fn default_rod_name() -> String {
    "Basic Rod".to_owned()
}

fn default_bait_name() -> String {
    "Worm".to_owned()
}

const fn default_gear_strength() -> u32 {
    1
}

const fn default_idle_rate() -> f64 {
    DEFAULT_IDLE_RATE
}

const fn default_idle_sweep_secs() -> u64 {
    60
}

const fn default_weather_refresh_secs() -> u64 {
    900
}

const fn default_time_refresh_secs() -> u64 {
    60
}

const fn default_autosave_secs() -> u64 {
    300
}

const fn default_auto_fish_min_secs() -> u64 {
    5
}

const fn default_auto_fish_max_secs() -> u64 {
    300
}

const fn default_fast_min_secs() -> u64 {
    5
}

const fn default_fast_max_secs() -> u64 {
    10
}

fn default_save_dir() -> PathBuf {
    PathBuf::from("saves")
}

fn shop_item(name: &str, cost: u64, strength: u32) -> ShopItem {
    ShopItem {
        name: name.to_owned(),
        cost,
        strength,
    }
}

fn default_shop_rods() -> Vec<ShopItem> {
    vec![
        shop_item("Bamboo Rod", 40, 2),
        shop_item("Fiberglass Rod", 150, 3),
        shop_item("Carbon Rod", 500, 4),
        shop_item("Master Rod", 1500, 6),
    ]
}

fn default_shop_baits() -> Vec<ShopItem> {
    vec![
        shop_item("Cricket", 15, 2),
        shop_item("Spinner Lure", 80, 3),
        shop_item("Golden Lure", 400, 5),
    ]
}

fn default_log_level() -> String {
    "info".to_owned()
}
