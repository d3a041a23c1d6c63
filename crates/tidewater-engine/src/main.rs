//! Console binary for the Tidewater fishing game.
//!
//! Wires configuration, the save store, the shared session, the background
//! scheduler, and the command loop together.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line flags
//! 2. Load configuration from `tidewater.yaml` (defaults if missing)
//! 3. Initialize structured logging (tracing) to stderr
//! 4. Open the save directory and restore the session
//! 5. Recompute the day period and credit time spent away
//! 6. Spawn the background tasks
//! 7. Run the command loop
//! 8. Trigger shutdown, join the tasks, and write a final save

mod command;
mod console;
mod error;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use tidewater_core::scheduler::{self, SchedulerHandle};
use tidewater_core::{Catalog, GameConfig, GameContext, RngSource, SessionHandle, ShutdownSignal};
use tidewater_store::SaveStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Idle fishing in your terminal.
#[derive(Debug, Parser)]
#[command(name = "tidewater", version, about)]
struct Cli {
    /// Fast timing: auto-fishing waits 5 to 10 seconds between casts.
    #[arg(long)]
    test: bool,

    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "tidewater.yaml")]
    config: PathBuf,

    /// Save directory, overriding `storage.save_dir` from the config.
    #[arg(long, value_name = "DIR")]
    save_dir: Option<PathBuf>,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the save directory, or the console
/// fails. Background task failures are logged, never returned.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Parse flags.
    let cli = Cli::parse();

    // 2. Load configuration.
    let mut config = GameConfig::load_or_default(&cli.config)?;
    if let Some(dir) = cli.save_dir {
        config.storage.save_dir = dir;
    }

    // 3. Initialize structured logging.
    init_logging(&config.logging.level);
    info!(
        config = %cli.config.display(),
        save_dir = %config.storage.save_dir.display(),
        fast = cli.test,
        "tidewater starting"
    );

    // 4. Open storage and restore the session.
    let store = SaveStore::open(config.storage.save_dir.clone())?;
    let ctx = Arc::new(GameContext::new(config, Catalog::standard(), store)?);
    let handle = SessionHandle::load(Arc::clone(&ctx), Utc::now());

    // 5. Catch up on the time of day and time spent away.
    if let Err(e) = handle.refresh_time_of_day(Utc::now()).await {
        warn!(error = %e, "day-boundary save failed at startup");
    }
    let mut rng = RngSource::from_entropy();
    match handle.idle_sweep(Utc::now(), &mut rng).await {
        Ok(caught) => {
            info!(catches = caught.len(), "startup catch-up complete");
            console::report_idle(&caught);
        }
        Err(e) => warn!(error = %e, "startup catch-up could not be saved"),
    }

    // 6. Background tasks.
    let shutdown = ShutdownSignal::new();
    let tasks = scheduler::spawn(&handle, &shutdown, cli.test);

    // 7. Command loop.
    let outcome = console::run(&handle, cli.test).await;

    // 8. Shutdown.
    shut_down(&handle, &shutdown, tasks, outcome).await
}

/// Stop the background tasks and write the final save. A failed save is
/// logged; the console's own result is what gets returned.
async fn shut_down(
    handle: &SessionHandle,
    shutdown: &ShutdownSignal,
    tasks: SchedulerHandle,
    outcome: Result<(), EngineError>,
) -> Result<(), EngineError> {
    shutdown.trigger()?;
    let abnormal = tasks.join().await;
    if let Err(e) = handle.save_now(Utc::now()).await {
        warn!(error = %e, "final save failed, progress since the last autosave is lost");
    }
    info!(abnormal_tasks = abnormal, "tidewater stopped");
    outcome
}

/// `RUST_LOG` wins; otherwise the configured level, then `info`.
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;
    use tidewater_core::Session;

    use super::*;

    /// A handle whose save root sits beneath a regular file, so every write
    /// fails.
    fn unsavable_handle() -> SessionHandle {
        let blocker = std::env::temp_dir().join("tidewater-engine-unit-blocker");
        std::fs::write(&blocker, b"").unwrap();
        let store = SaveStore::new(blocker.join("saves"));
        let ctx = Arc::new(GameContext::new(GameConfig::default(), Catalog::standard(), store).unwrap());
        let session = Session::fresh(&ctx, Utc::now());
        SessionHandle::new(ctx, session)
    }

    #[tokio::test]
    async fn failed_final_save_keeps_console_result() {
        let handle = unsavable_handle();
        let shutdown = ShutdownSignal::new();
        let tasks = scheduler::spawn(&handle, &shutdown, true);
        let result = shut_down(&handle, &shutdown, tasks, Ok(())).await;
        assert!(result.is_ok());
        assert!(shutdown.is_triggered());
    }

    #[tokio::test]
    async fn console_error_survives_shutdown() {
        let handle = unsavable_handle();
        let shutdown = ShutdownSignal::new();
        let tasks = scheduler::spawn(&handle, &shutdown, true);
        let console_failure = EngineError::from(std::io::Error::other("stdin closed"));
        let result = shut_down(&handle, &shutdown, tasks, Err(console_failure)).await;
        assert!(matches!(result, Err(EngineError::Io { .. })));
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::try_parse_from(["tidewater", "--test", "--save-dir", "/tmp/tw"]);
        assert!(cli.as_ref().is_ok_and(|c| c.test));
        assert!(cli.is_ok_and(|c| c.save_dir == Some(PathBuf::from("/tmp/tw")) && c.config == PathBuf::from("tidewater.yaml")));
    }
}
