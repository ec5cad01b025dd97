//! Transport wrapper that validates before delegating.
//!
//! Explicit composition instead of method patching: the wrapper holds the
//! inner transport and a snapshot of the command set, runs the capability
//! check, and only then forwards the sync call.

use async_trait::async_trait;

use cmdsync_core::{AppCommand, CommandDescriptor, SyncScope};
use cmdsync_gate::{SyncTransport, TransportError};

use crate::report::TreeChecker;

/// A [`SyncTransport`] that refuses to sync an invalid command set.
#[derive(Debug)]
pub struct CheckedTransport<T> {
    inner: T,
    checker: TreeChecker,
    commands: Vec<CommandDescriptor>,
}

impl<T> CheckedTransport<T> {
    /// Wrap `inner`, validating `commands` before every delegated sync.
    pub fn new(inner: T, checker: TreeChecker, commands: Vec<CommandDescriptor>) -> Self {
        Self {
            inner,
            checker,
            commands,
        }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[async_trait]
impl<T: SyncTransport> SyncTransport for CheckedTransport<T> {
    async fn sync(&self, scope: SyncScope) -> Result<Vec<AppCommand>, TransportError> {
        self.checker
            .check(&self.commands)
            .map_err(|e| TransportError::new(e.to_string()))?;
        self.inner.sync(scope).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
