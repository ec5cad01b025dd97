//! Error types for cmdsync-core.

use thiserror::Error;

/// Errors from constructing configuration values.
///
/// These are caller bugs and are never recovered from internally.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A state filename resolved to the empty string after normalisation.
    #[error("state filename must not be empty")]
    EmptyFilename,
}
