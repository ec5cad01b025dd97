//! Error types for cmdsync-gate.

use std::path::PathBuf;

use thiserror::Error;

use cmdsync_core::ConfigError;

use crate::transport::{PayloadError, TransportError};

/// All errors that can arise from sync gate operations.
///
/// State *read* failures never surface here; they are recovered internally
/// by resetting to the never-synced state. State *write* failures do.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Invalid configuration input (caller bug).
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error while writing the state file.
    #[error("state file JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Canonical payload production failed for a command.
    #[error("payload error: {0}")]
    Payload(#[from] PayloadError),

    /// The remote sync call failed; persisted state was left untouched.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
