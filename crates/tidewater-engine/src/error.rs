//! Error types for the Tidewater binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup, the command loop, and shutdown.

/// Top-level error for the Tidewater binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: tidewater_core::ConfigError,
    },

    /// The save directory could not be prepared.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: tidewater_store::StoreError,
    },

    /// The final save failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: tidewater_core::SessionError,
    },

    /// Reading commands from the terminal failed.
    #[error("console I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The shutdown signal was fired twice.
    #[error("shutdown error: {source}")]
    Shutdown {
        /// The underlying shutdown error.
        #[from]
        source: tidewater_core::shutdown::ShutdownError,
    },
}
