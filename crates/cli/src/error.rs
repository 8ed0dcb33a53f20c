//! CLI error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The audit database file does not exist.
    ///
    /// This typically means no check has been recorded yet.
    #[error("audit database not found at {path}. Run 'pavefleet check' first")]
    DatabaseNotFound { path: PathBuf },

    /// No data directory could be determined and none was configured.
    #[error("no audit database configured: set audit.database in pavefleet.toml")]
    NoDataDir,

    /// No session was found matching the given prefix.
    #[error("no session found matching '{prefix}'")]
    SessionNotFound { prefix: String },

    /// Multiple sessions match the given prefix.
    ///
    /// The user should provide a longer prefix to disambiguate.
    #[error("multiple sessions match '{prefix}': {matches:?}")]
    AmbiguousSession {
        prefix: String,
        matches: Vec<String>,
    },

    /// Configuration is invalid or missing required fields.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred in the access-control layer.
    #[error(transparent)]
    Access(#[from] access::Error),

    /// An error occurred in the gate layer.
    #[error(transparent)]
    Gate(#[from] gate::Error),

    /// An error occurred in the storage layer.
    #[error(transparent)]
    Storage(#[from] storage::Error),

    /// A calculator rejected its input.
    #[error(transparent)]
    Estimating(#[from] estimating::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
