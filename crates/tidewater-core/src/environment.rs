//! Weather and time-of-day model.
//!
//! The environment holds two multipliers that scale every catch roll: a
//! weather factor that drifts between configured bounds, and the catch
//! factor of the active [`DayPeriod`]. Both change only through scheduler
//! refreshes (or an explicit load), always under the session lock.

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use tidewater_types::TimeOfDay;
use tracing::debug;

use crate::random::RandomSource;

/// Hours in a day; valid period hours are `0..HOURS_PER_DAY`.
pub const HOURS_PER_DAY: u32 = 24;

/// Errors raised while validating weather bounds or the day schedule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnvironmentError {
    /// Weather bounds are not finite, not positive, or not increasing.
    #[error("invalid weather range [{min}, {max})")]
    InvalidWeatherRange {
        /// Configured lower bound.
        min: f64,
        /// Configured upper bound.
        max: f64,
    },

    /// A period has an out-of-range hour, zero length, or a bad factor.
    #[error("invalid {time_of_day} period: {reason}")]
    InvalidPeriod {
        /// The period at fault.
        time_of_day: TimeOfDay,
        /// What is wrong with it.
        reason: String,
    },

    /// No period covers this hour.
    #[error("no day period covers hour {hour}")]
    CoverageGap {
        /// The uncovered hour.
        hour: u32,
    },

    /// More than one period covers this hour.
    #[error("more than one day period covers hour {hour}")]
    Overlap {
        /// The doubly covered hour.
        hour: u32,
    },
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// Bounds for the weather factor, half-open `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherRange {
    /// Lowest factor (poorest weather).
    pub min: f64,
    /// Upper bound of the factor.
    pub max: f64,
}

impl WeatherRange {
    /// Build a validated range.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError::InvalidWeatherRange`] unless both bounds
    /// are finite, `min > 0`, and `min < max`.
    pub fn new(min: f64, max: f64) -> Result<Self, EnvironmentError> {
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min >= max {
            return Err(EnvironmentError::InvalidWeatherRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Pull `value` back inside the bounds. Non-finite input maps to `min`.
    pub fn clamp(self, value: f64) -> f64 {
        if value.is_finite() {
            value.max(self.min).min(self.max)
        } else {
            self.min
        }
    }
}

impl Default for WeatherRange {
    fn default() -> Self {
        Self { min: 0.7, max: 1.3 }
    }
}

// ---------------------------------------------------------------------------
// Day periods
// ---------------------------------------------------------------------------

/// One named slice of the day and its effect on catch odds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPeriod {
    /// Which period this is.
    pub time_of_day: TimeOfDay,
    /// First hour of the period (inclusive).
    pub start_hour: u32,
    /// Hour at which the period ends (exclusive). Less than `start_hour`
    /// when the period wraps past midnight.
    pub end_hour: u32,
    /// Multiplier applied to every catch roll.
    pub catch_factor: f64,
    /// Short glyph for display.
    #[serde(default)]
    pub icon: String,
    /// One-line description of fishing conditions.
    #[serde(default)]
    pub description: String,
}

impl DayPeriod {
    /// Whether `hour` falls inside this period.
    pub const fn contains_hour(&self, hour: u32) -> bool {
        if self.start_hour > self.end_hour {
            hour >= self.start_hour || hour < self.end_hour
        } else {
            hour >= self.start_hour && hour < self.end_hour
        }
    }

    /// Used when no configured period matches an hour.
    pub fn fallback() -> Self {
        Self {
            time_of_day: TimeOfDay::Afternoon,
            start_hour: 0,
            end_hour: 0,
            catch_factor: 1.0,
            icon: String::new(),
            description: String::from("Ordinary conditions"),
        }
    }

    fn check(&self) -> Result<(), EnvironmentError> {
        let invalid = |reason: &str| EnvironmentError::InvalidPeriod {
            time_of_day: self.time_of_day,
            reason: reason.to_owned(),
        };
        if self.start_hour >= HOURS_PER_DAY || self.end_hour >= HOURS_PER_DAY {
            return Err(invalid("hours must be below 24"));
        }
        if self.start_hour == self.end_hour {
            return Err(invalid("start and end hour are equal"));
        }
        if !self.catch_factor.is_finite() || self.catch_factor <= 0.0 {
            return Err(invalid("catch factor must be positive"));
        }
        Ok(())
    }
}

/// The default four periods: Morning 5-11, Afternoon 11-17, Evening 17-21,
/// and Night 21-5.
pub fn default_periods() -> Vec<DayPeriod> {
    vec![
        DayPeriod {
            time_of_day: TimeOfDay::Morning,
            start_hour: 5,
            end_hour: 11,
            catch_factor: 1.2,
            icon: String::from("🌅"),
            description: String::from("Perfect for early biters"),
        },
        DayPeriod {
            time_of_day: TimeOfDay::Afternoon,
            start_hour: 11,
            end_hour: 17,
            catch_factor: 0.8,
            icon: String::from("☀️"),
            description: String::from("Slower fishing during midday heat"),
        },
        DayPeriod {
            time_of_day: TimeOfDay::Evening,
            start_hour: 17,
            end_hour: 21,
            catch_factor: 1.3,
            icon: String::from("🌇"),
            description: String::from("Prime fishing hours, increased activity"),
        },
        DayPeriod {
            time_of_day: TimeOfDay::Night,
            start_hour: 21,
            end_hour: 5,
            catch_factor: 0.9,
            icon: String::from("🌙"),
            description: String::from("Good for nocturnal species"),
        },
    ]
}

/// A validated set of periods covering every hour exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySchedule {
    periods: Vec<DayPeriod>,
    fallback: DayPeriod,
}

impl DaySchedule {
    /// Validate `periods` and build a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError::InvalidPeriod`] for a malformed period,
    /// [`EnvironmentError::CoverageGap`] for an hour no period covers, and
    /// [`EnvironmentError::Overlap`] for an hour covered twice.
    pub fn new(periods: Vec<DayPeriod>) -> Result<Self, EnvironmentError> {
        for period in &periods {
            period.check()?;
        }
        for hour in 0..HOURS_PER_DAY {
            match periods.iter().filter(|p| p.contains_hour(hour)).count() {
                0 => return Err(EnvironmentError::CoverageGap { hour }),
                1 => {}
                _ => return Err(EnvironmentError::Overlap { hour }),
            }
        }
        Ok(Self {
            periods,
            fallback: DayPeriod::fallback(),
        })
    }

    /// The configured periods in declaration order.
    pub fn periods(&self) -> &[DayPeriod] {
        &self.periods
    }

    /// The period covering `hour`. Hours outside `0..24` get the fallback.
    pub fn period_at(&self, hour: u32) -> &DayPeriod {
        self.periods
            .iter()
            .find(|p| p.contains_hour(hour))
            .unwrap_or(&self.fallback)
    }
}

impl Default for DaySchedule {
    fn default() -> Self {
        Self {
            periods: default_periods(),
            fallback: DayPeriod::fallback(),
        }
    }
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Current weather factor and day period.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    weather_factor: f64,
    period: DayPeriod,
}

/// Read-only copy of the environment for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentView {
    /// Current weather multiplier.
    pub weather_factor: f64,
    /// Active period.
    pub time_of_day: TimeOfDay,
    /// Multiplier of the active period.
    pub catch_factor: f64,
    /// Glyph of the active period.
    pub icon: String,
    /// Description of the active period.
    pub description: String,
}

impl Environment {
    /// Build an environment with an explicit weather factor and period.
    pub const fn new(weather_factor: f64, period: DayPeriod) -> Self {
        Self {
            weather_factor,
            period,
        }
    }

    /// Current weather multiplier.
    pub const fn weather_factor(&self) -> f64 {
        self.weather_factor
    }

    /// The active day period.
    pub const fn period(&self) -> &DayPeriod {
        &self.period
    }

    /// Shorthand for the active period's [`TimeOfDay`].
    pub const fn time_of_day(&self) -> TimeOfDay {
        self.period.time_of_day
    }

    /// Shorthand for the active period's catch factor.
    pub const fn time_factor(&self) -> f64 {
        self.period.catch_factor
    }

    /// Replace the weather factor with a fresh uniform draw from `range`.
    pub fn update_weather(&mut self, range: WeatherRange, rng: &mut impl RandomSource) {
        let drawn = rng.uniform(range.min, range.max);
        self.weather_factor = range.clamp(drawn);
        debug!(weather_factor = self.weather_factor, "weather refreshed");
    }

    /// Set the weather factor, clamped into `range`. Used when restoring a
    /// save whose bounds may differ from the current configuration.
    pub fn set_weather_factor(&mut self, range: WeatherRange, value: f64) {
        self.weather_factor = range.clamp(value);
    }

    /// Select the period for the hour of `now`. Returns `true` if the active
    /// period changed.
    pub fn update_time_of_day(&mut self, schedule: &DaySchedule, now: &impl Timelike) -> bool {
        let next = schedule.period_at(now.hour());
        if *next == self.period {
            return false;
        }
        debug!(
            from = %self.period.time_of_day,
            to = %next.time_of_day,
            "day period changed"
        );
        self.period = next.clone();
        true
    }

    /// Copy of the environment for rendering.
    pub fn view(&self) -> EnvironmentView {
        EnvironmentView {
            weather_factor: self.weather_factor,
            time_of_day: self.period.time_of_day,
            catch_factor: self.period.catch_factor,
            icon: self.period.icon.clone(),
            description: self.period.description.clone(),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(1.0, DayPeriod::fallback())
    }
}
