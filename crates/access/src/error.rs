//! Access-control error types.

use thiserror::Error;

/// Access-control errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A role name did not match any known role.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// A capability name did not match any known capability.
    #[error("unknown capability: {0}")]
    UnknownCapability(String),

    /// A panel name did not match any known dashboard panel.
    #[error("unknown panel: {0}")]
    UnknownPanel(String),

    /// Failed to parse a permission table.
    #[error("failed to parse permission table: {0}")]
    Parse(String),

    /// An I/O error occurred while reading a permission table.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
