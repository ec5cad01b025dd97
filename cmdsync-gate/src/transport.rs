//! Boundary traits: the remote sync transport and the canonical payload
//! producer. Both are async — registration APIs and translation round-trips
//! are network-bound.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use cmdsync_core::{AppCommand, CommandDescriptor, SyncScope};

/// Opaque failure from the remote registration API.
///
/// The gate never inspects this beyond propagating it; retry policy belongs
/// to the caller.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Remote command-registration endpoint.
#[async_trait]
pub trait SyncTransport: Send + Sync {
    /// Push the current command set for `scope` to the remote API and return
    /// the registered commands.
    async fn sync(&self, scope: SyncScope) -> Result<Vec<AppCommand>, TransportError>;
}

/// Canonical payload production failed for one command.
#[derive(Debug, Error)]
#[error("cannot produce payload for '{command}': {message}")]
pub struct PayloadError {
    pub command: String,
    pub message: String,
}

impl PayloadError {
    pub fn new(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            message: message.into(),
        }
    }
}

/// Produces the canonical byte representation of a single command.
///
/// Implementations must be deterministic for a given descriptor and must not
/// depend on the iteration order of the surrounding command set.
#[async_trait]
pub trait PayloadSource: Send + Sync {
    async fn payload(&self, command: &CommandDescriptor) -> Result<Vec<u8>, PayloadError>;
}

/// Built-in payload producer: canonical JSON of the full descriptor.
///
/// Struct fields serialize in declaration order and set-like sub-fields are
/// `BTreeMap`s, so the output is deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPayloadSource;

#[async_trait]
impl PayloadSource for JsonPayloadSource {
    async fn payload(&self, command: &CommandDescriptor) -> Result<Vec<u8>, PayloadError> {
        encode_json(command).map_err(|e| PayloadError::new(command.name.to_string(), e.to_string()))
    }
}

fn encode_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}
