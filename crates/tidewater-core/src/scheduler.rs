//! Background tasks that keep the session moving.
//!
//! Five independent tokio tasks share one [`SessionHandle`]:
//!
//! | Task | Cadence | Effect |
//! |------|---------|--------|
//! | `idle_sweep` | `schedule.idle_sweep_secs` | idle catch-up, persists on catches |
//! | `weather` | `schedule.weather_refresh_secs` | redraws weather, once at startup too |
//! | `time_of_day` | `schedule.time_refresh_secs` | recomputes the period, persists on day rollover |
//! | `autosave` | `schedule.autosave_secs` | persists |
//! | `auto_fish` | random per attempt | one background cast |
//!
//! Each iteration runs through [`isolate`], which logs a returned error or a
//! panic and lets the loop carry on. Every loop also selects on the shared
//! [`ShutdownListener`] and exits as soon as it fires.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use chrono::Utc;
use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::ScheduleConfig;
use crate::random::{RandomSource, RngSource};
use crate::session::{SessionError, SessionHandle};
use crate::shutdown::{ShutdownListener, ShutdownSignal};

/// Running background tasks.
#[derive(Debug)]
pub struct SchedulerHandle {
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl SchedulerHandle {
    /// Names of the spawned tasks, in spawn order.
    pub fn task_names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|(name, _)| *name).collect()
    }

    /// Wait for every task to finish. Returns how many ended abnormally.
    pub async fn join(self) -> usize {
        let mut abnormal: usize = 0;
        for (name, task) in self.tasks {
            match task.await {
                Ok(()) => debug!(task = name, "task joined"),
                Err(e) => {
                    error!(task = name, error = %e, "task ended abnormally");
                    abnormal = abnormal.saturating_add(1);
                }
            }
        }
        abnormal
    }
}

/// Spawn every background task. `fast` shortens the auto-fishing wait.
pub fn spawn(handle: &SessionHandle, shutdown: &ShutdownSignal, fast: bool) -> SchedulerHandle {
    let schedule = handle.context().config.schedule.clone();
    let tasks = vec![
        (
            "idle_sweep",
            tokio::spawn(idle_task(handle.clone(), schedule.idle_sweep(), shutdown.listener())),
        ),
        (
            "weather",
            tokio::spawn(weather_task(handle.clone(), schedule.weather_refresh(), shutdown.listener())),
        ),
        (
            "time_of_day",
            tokio::spawn(time_of_day_task(handle.clone(), schedule.time_refresh(), shutdown.listener())),
        ),
        (
            "autosave",
            tokio::spawn(autosave_task(handle.clone(), schedule.autosave(), shutdown.listener())),
        ),
        (
            "auto_fish",
            tokio::spawn(auto_fish_task(handle.clone(), schedule, fast, shutdown.listener())),
        ),
    ];
    info!(tasks = tasks.len(), fast, "scheduler started");
    SchedulerHandle { tasks }
}

/// Run one task iteration, catching both returned errors and panics.
/// Returns `true` if the iteration completed cleanly.
pub async fn isolate<F>(task: &'static str, iteration: F) -> bool
where
    F: Future<Output = Result<(), SessionError>>,
{
    match AssertUnwindSafe(iteration).catch_unwind().await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!(task, error = %e, "task iteration failed");
            false
        }
        Err(payload) => {
            error!(task, panic = %panic_message(payload.as_ref()), "task iteration panicked");
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("non-string panic payload")
    }
}

/// Random wait before a cast, whole seconds within the configured bounds.
pub fn fishing_duration(fast: bool, schedule: &ScheduleConfig, rng: &mut impl RandomSource) -> Duration {
    let (min, max) = schedule.auto_fish_bounds(fast);
    let span = max.saturating_sub(min);
    let slots = usize::try_from(span).unwrap_or(usize::MAX).saturating_add(1);
    let offset = u64::try_from(rng.index(slots)).unwrap_or(0);
    Duration::from_secs(min.saturating_add(offset))
}

/// First tick one full period from now; late ticks push later ones back.
fn ticker(period: Duration) -> Interval {
    let start = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
    let mut interval = time::interval_at(start, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn idle_task(handle: SessionHandle, period: Duration, mut shutdown: ShutdownListener) {
    let mut rng = RngSource::from_entropy();
    let mut ticker = ticker(period);
    loop {
        tokio::select! {
            biased;
            () = shutdown.triggered() => break,
            _ = ticker.tick() => {
                isolate("idle_sweep", async {
                    let caught = handle.idle_sweep(Utc::now(), &mut rng).await?;
                    if !caught.is_empty() {
                        debug!(catches = caught.len(), "idle sweep landed catches");
                    }
                    Ok(())
                })
                .await;
            }
        }
    }
    debug!(task = "idle_sweep", "task stopped");
}

async fn weather_task(handle: SessionHandle, period: Duration, mut shutdown: ShutdownListener) {
    let mut rng = RngSource::from_entropy();
    let mut ticker = ticker(period);
    let mut first = true;
    loop {
        if !first {
            tokio::select! {
                biased;
                () = shutdown.triggered() => break,
                _ = ticker.tick() => {}
            }
        }
        first = false;
        isolate("weather", async {
            let factor = handle.refresh_weather(&mut rng).await;
            info!(weather_factor = factor, "weather changed");
            Ok(())
        })
        .await;
    }
    debug!(task = "weather", "task stopped");
}

async fn time_of_day_task(handle: SessionHandle, period: Duration, mut shutdown: ShutdownListener) {
    let mut ticker = ticker(period);
    loop {
        tokio::select! {
            biased;
            () = shutdown.triggered() => break,
            _ = ticker.tick() => {
                isolate("time_of_day", async {
                    if handle.refresh_time_of_day(Utc::now()).await? {
                        info!("day-boundary save written");
                    }
                    Ok(())
                })
                .await;
            }
        }
    }
    debug!(task = "time_of_day", "task stopped");
}

async fn autosave_task(handle: SessionHandle, period: Duration, mut shutdown: ShutdownListener) {
    let mut ticker = ticker(period);
    loop {
        tokio::select! {
            biased;
            () = shutdown.triggered() => break,
            _ = ticker.tick() => {
                isolate("autosave", async {
                    handle.save_now(Utc::now()).await?;
                    debug!("autosave written");
                    Ok(())
                })
                .await;
            }
        }
    }
    debug!(task = "autosave", "task stopped");
}

async fn auto_fish_task(
    handle: SessionHandle,
    schedule: ScheduleConfig,
    fast: bool,
    mut shutdown: ShutdownListener,
) {
    let mut rng = RngSource::from_entropy();
    loop {
        let wait = fishing_duration(fast, &schedule, &mut rng);
        tokio::select! {
            biased;
            () = shutdown.triggered() => break,
            () = time::sleep(wait) => {
                isolate("auto_fish", async {
                    handle.auto_fish_attempt(Utc::now(), &mut rng).await?;
                    Ok(())
                })
                .await;
            }
        }
    }
    debug!(task = "auto_fish", "task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    #[test]
    fn fast_mode_waits_five_to_ten_seconds() {
        let schedule = ScheduleConfig::default();
        let mut low = ScriptedRandom::new();
        assert_eq!(fishing_duration(true, &schedule, &mut low), Duration::from_secs(5));
        let mut high = ScriptedRandom::new().with_indices([5]);
        assert_eq!(fishing_duration(true, &schedule, &mut high), Duration::from_secs(10));
        let mut beyond = ScriptedRandom::new().with_indices([99]);
        assert_eq!(fishing_duration(true, &schedule, &mut beyond), Duration::from_secs(10));
    }

    #[test]
    fn normal_mode_spans_five_minutes() {
        let schedule = ScheduleConfig::default();
        let mut top = ScriptedRandom::new().with_indices([295]);
        assert_eq!(fishing_duration(false, &schedule, &mut top), Duration::from_secs(300));
    }

    #[tokio::test]
    async fn isolate_contains_errors_and_panics() {
        assert!(isolate("ok", async { Ok(()) }).await);

        let failed = isolate("err", async {
            Err(SessionError::Purchase {
                source: crate::session::PurchaseError::InvalidStrength,
            })
        })
        .await;
        assert!(!failed);

        let panicked = isolate("boom", async {
            let parts: Vec<u32> = Vec::new();
            if parts.is_empty() {
                std::panic::panic_any("iteration blew up");
            }
            Ok(())
        })
        .await;
        assert!(!panicked);
    }

    #[test]
    fn panic_payloads_are_readable() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(borrowed.as_ref()), "borrowed");
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }
}
