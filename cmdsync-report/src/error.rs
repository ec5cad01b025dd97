//! Error types for cmdsync-report.

use std::path::PathBuf;

use thiserror::Error;

use cmdsync_core::CommandName;

use crate::report::Capability;

/// All errors that can arise from validation and report emission.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A command declares a capability the bot does not have. Raised before
    /// any report is written; a partial report would be misleading.
    #[error("command '{command}' is {capability}, but the bot is not {capability}")]
    Incompatible {
        command: CommandName,
        capability: Capability,
    },

    /// The command set to validate was empty.
    #[error("no commands found to check")]
    NoCommands,

    /// An I/O error while writing the report, with annotated path.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error while writing the report.
    #[error("report JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`ReportError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ReportError {
    ReportError::Io {
        path: path.into(),
        source,
    }
}
