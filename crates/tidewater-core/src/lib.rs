//! Catch simulation, environment model, and session state for the Tidewater
//! fishing game.
//!
//! The session is one shared [`Session`] behind a [`SessionHandle`]. The
//! console and the background tasks in [`scheduler`] all go through the
//! handle, so every change is a single locked step.
//!
//! # Modules
//!
//! - [`catalog`] -- The fixed set of catchable entities and its queries.
//! - [`catch`] -- Catch odds, entity selection, and [`CatchRules`].
//! - [`config`] -- Configuration loading from `tidewater.yaml` into
//!   strongly-typed structs.
//! - [`context`] -- Validated, read-only setup shared by every task.
//! - [`environment`] -- Weather factor and day periods.
//! - [`history`] -- Per-day catch log.
//! - [`idle`] -- Catch-up credit for time spent away.
//! - [`inventory`] -- Held catches with running totals.
//! - [`random`] -- [`RandomSource`] seam for every random draw.
//! - [`scheduler`] -- Periodic background tasks.
//! - [`session`] -- Player state, the session handle, and persistence.
//! - [`shutdown`] -- One-shot shutdown broadcast.
//!
//! [`Session`]: session::Session
//! [`SessionHandle`]: session::SessionHandle
//! [`CatchRules`]: catch::CatchRules
//! [`RandomSource`]: random::RandomSource

pub mod catalog;
pub mod catch;
pub mod config;
pub mod context;
pub mod environment;
pub mod history;
pub mod idle;
pub mod inventory;
pub mod random;
pub mod scheduler;
pub mod session;
pub mod shutdown;

mod standard_catalog;

// Re-export primary types for convenience.
pub use catalog::Catalog;
pub use catch::{CatchOutcome, CatchRules, attempt_catch};
pub use config::{ConfigError, GameConfig};
pub use context::GameContext;
pub use environment::{DaySchedule, Environment, WeatherRange};
pub use random::{RandomSource, RngSource, ScriptedRandom};
pub use session::{Session, SessionError, SessionHandle, SessionSnapshot};
pub use shutdown::{ShutdownListener, ShutdownSignal};
