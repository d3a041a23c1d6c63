//! One-shot shutdown broadcast for the background tasks.
//!
//! The signal fires exactly once. Every task holds a [`ShutdownListener`]
//! and selects on [`ShutdownListener::triggered`] next to its timer, so all
//! tasks stop promptly after the trigger.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::info;

/// Errors from the shutdown signal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShutdownError {
    /// The signal was already fired.
    #[error("shutdown already triggered")]
    AlreadyTriggered,
}

/// The shared shutdown signal.
#[derive(Debug)]
pub struct ShutdownSignal {
    fired: AtomicBool,
    tx: watch::Sender<bool>,
}

impl ShutdownSignal {
    /// A signal that has not fired.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            fired: AtomicBool::new(false),
            tx,
        }
    }

    /// Fire the signal.
    ///
    /// # Errors
    ///
    /// Returns [`ShutdownError::AlreadyTriggered`] on every call after the
    /// first.
    pub fn trigger(&self) -> Result<(), ShutdownError> {
        self.fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_already| ShutdownError::AlreadyTriggered)?;
        self.tx.send_replace(true);
        info!("shutdown triggered");
        Ok(())
    }

    /// Whether the signal has fired.
    pub fn is_triggered(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// A new listener. Listeners created after the trigger see it at once.
    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of [`ShutdownSignal`].
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Resolve once the signal fires. Resolves immediately if it already has,
    /// or if the signal itself was dropped.
    pub async fn triggered(&mut self) {
        // A closed channel means the owner is gone, which also means stop.
        let _ = self.rx.wait_for(|fired| *fired).await;
    }

    /// Whether the signal has fired, without waiting.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn second_trigger_is_an_error() {
        let signal = ShutdownSignal::new();
        assert!(!signal.is_triggered());
        assert_eq!(signal.trigger(), Ok(()));
        assert_eq!(signal.trigger(), Err(ShutdownError::AlreadyTriggered));
        assert!(signal.is_triggered());
    }

    #[tokio::test]
    async fn every_listener_wakes() {
        let signal = ShutdownSignal::new();
        let mut first = signal.listener();
        let mut second = signal.listener();
        let waiter = tokio::spawn(async move {
            first.triggered().await;
        });

        assert_eq!(signal.trigger(), Ok(()));
        let joined = tokio::time::timeout(Duration::from_secs(1), waiter).await;
        assert!(matches!(joined, Ok(Ok(()))));
        second.triggered().await;
        assert!(second.is_triggered());
    }

    #[tokio::test]
    async fn late_listener_sees_trigger() {
        let signal = ShutdownSignal::new();
        assert_eq!(signal.trigger(), Ok(()));
        let mut late = signal.listener();
        assert!(late.is_triggered());
        late.triggered().await;
    }

    #[tokio::test]
    async fn dropped_signal_releases_listeners() {
        let signal = ShutdownSignal::new();
        let mut listener = signal.listener();
        drop(signal);
        listener.triggered().await;
    }
}
