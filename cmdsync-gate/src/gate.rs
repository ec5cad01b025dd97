//! Sync gate — the two-gate decision engine in front of the transport.
//!
//! Gate order matters: the interval check is cheap and runs first; only when
//! it passes does the change check serialize and hash the command set. The
//! persisted state advances only after the transport call succeeds, so a
//! failed or cancelled sync leaves the next attempt with the same "needs
//! sync" determination.

use chrono::{Duration, Utc};

use cmdsync_core::{AppCommand, CommandDescriptor, SyncScope};

use crate::error::SyncError;
use crate::fingerprint::FingerprintEngine;
use crate::state::StateStore;
use crate::transport::{PayloadSource, SyncTransport};

/// Default minimum interval between syncs, in seconds.
pub const DEFAULT_MINIMAL_SYNC_INTERVAL_SECS: i64 = 300;

/// Throttling policy for a sync gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPolicy {
    /// Minimum time between successful syncs. `None` disables throttling.
    pub minimal_interval: Option<Duration>,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            minimal_interval: Some(Duration::seconds(DEFAULT_MINIMAL_SYNC_INTERVAL_SECS)),
        }
    }
}

impl SyncPolicy {
    /// Always eligible to sync.
    pub fn unthrottled() -> Self {
        Self {
            minimal_interval: None,
        }
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            minimal_interval: Some(interval),
        }
    }
}

/// Change-gated sync driver for one scope.
///
/// One instance serves one [`SyncScope`]; independent scopes get independent
/// gates (and, by default, independent state stores). Methods take
/// `&mut self`, so a single instance cannot race against itself.
#[derive(Debug)]
pub struct SyncGate<T, P> {
    scope: SyncScope,
    store: StateStore,
    policy: SyncPolicy,
    engine: FingerprintEngine,
    transport: T,
    payloads: P,
}

impl<T: SyncTransport, P: PayloadSource> SyncGate<T, P> {
    pub fn new(
        scope: SyncScope,
        store: StateStore,
        policy: SyncPolicy,
        transport: T,
        payloads: P,
    ) -> Self {
        Self {
            scope,
            store,
            policy,
            engine: FingerprintEngine::new(),
            transport,
            payloads,
        }
    }

    pub fn scope(&self) -> SyncScope {
        self.scope
    }

    pub fn policy(&self) -> &SyncPolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: SyncPolicy) {
        self.policy = policy;
    }

    pub fn store(&mut self) -> &mut StateStore {
        &mut self.store
    }

    /// The fingerprint computed by the most recent change-gate evaluation.
    pub fn current_hex(&self) -> Option<&str> {
        self.engine.current_hex()
    }

    /// Interval gate: true when no interval is configured, no prior sync is
    /// recorded, or the interval has elapsed. Never computes a fingerprint.
    pub fn can_sync(&mut self) -> bool {
        let Some(interval) = self.policy.minimal_interval else {
            tracing::debug!("can_sync({}): true, no minimal interval", self.scope);
            return true;
        };
        let Some(last) = self.store.last_synced_at() else {
            tracing::debug!("can_sync({}): true, never synced", self.scope);
            return true;
        };

        let elapsed = Utc::now().signed_duration_since(last);
        let res = elapsed >= interval;
        tracing::debug!(
            "can_sync({}): {res}, last sync {}s ago, minimal interval {}s",
            self.scope,
            elapsed.num_seconds(),
            interval.num_seconds()
        );
        res
    }

    /// Change gate: false when the interval gate fails; otherwise digest the
    /// live command set and compare with the stored fingerprint.
    ///
    /// A stored fingerprint with a different length than the current one
    /// means the state file was tampered with or the hash scheme changed;
    /// that is logged and treated as a definite mismatch, never a failure.
    pub async fn should_sync(&mut self, commands: &[CommandDescriptor]) -> Result<bool, SyncError> {
        if !self.can_sync() {
            return Ok(false);
        }

        let last = self.store.last_fingerprint();
        let current = self.engine.digest(commands, &self.payloads).await?;

        if let Some(last) = &last {
            if last.len() != current.len() {
                tracing::warn!(
                    "stored fingerprint length {} != current length {}; \
                     state file tampering or hash scheme change, forcing a sync",
                    last.len(),
                    current.len()
                );
            }
        }

        let res = last.as_deref() != Some(current.as_str());
        tracing::debug!(
            "should_sync({}): {res}, stored {} vs current {current}",
            self.scope,
            last.as_deref().unwrap_or("<none>")
        );
        Ok(res)
    }

    /// Sync if needed: empty result set without touching the transport when
    /// [`should_sync`](Self::should_sync) says no; otherwise call the
    /// transport and, on success only, persist the fingerprint.
    pub async fn attempt_sync(
        &mut self,
        commands: &[CommandDescriptor],
    ) -> Result<Vec<AppCommand>, SyncError> {
        if !self.should_sync(commands).await? {
            tracing::info!("skipping sync for {}: nothing to do", self.scope);
            return Ok(Vec::new());
        }

        let synced = self
            .transport
            .sync(self.scope)
            .await
            .map_err(SyncError::Transport)?;

        // should_sync just cached the digest; recompute only if a caller
        // went through an unusual path.
        let hex = match self.engine.current_hex() {
            Some(hex) => hex.to_string(),
            None => self.engine.digest(commands, &self.payloads).await?,
        };
        self.store.update(&hex)?;

        tracing::info!("synced {} command(s) for {}", synced.len(), self.scope);
        Ok(synced)
    }

    /// When the last successful sync occurred.
    pub fn last_synced_at(&mut self) -> Option<chrono::DateTime<Utc>> {
        self.store.last_synced_at()
    }

    /// Fingerprint recorded by the last successful sync.
    pub fn last_fingerprint(&mut self) -> Option<String> {
        self.store.last_fingerprint()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
