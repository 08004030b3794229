//! Error types for the durability layer

use crate::wal::WalConfigError;
use thiserror::Error;

/// Result alias for WAL operations
pub type Result<T> = std::result::Result<T, WalError>;

/// Errors surfaced by the WAL writer, reader and destinations
///
/// Framing invariants (chunk length, block alignment) are maintained by the
/// writer itself and are checked with debug assertions, never reported here.
#[derive(Debug, Error)]
pub enum WalError {
    /// Append, flush or sync against the destination failed, or the reader's
    /// source failed
    #[error("WAL I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rejected configuration
    #[error("invalid WAL configuration: {0}")]
    Config(#[from] WalConfigError),
}

impl WalError {
    /// Underlying I/O error kind, if this is an I/O failure
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            WalError::Io(e) => Some(e.kind()),
            WalError::Config(_) => None,
        }
    }
}
