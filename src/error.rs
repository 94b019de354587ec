//! Error types for the desktop watcher.

use thiserror::Error;

/// Main error type for ShowHide Desktop
#[derive(Error, Debug)]
pub enum Error {
    /// The OS refused to register the global pointer hook.
    #[error("Failed to install global mouse hook: {0}")]
    HookInstallation(String),

    /// No desktop icon container could be resolved (e.g. Explorer is restarting).
    #[error("Desktop icons surface is unavailable")]
    SurfaceUnavailable,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("This platform has no desktop icon surface support")]
    UnsupportedPlatform,
}

pub type Result<T> = std::result::Result<T, Error>;
