//! # cmdsync-gate
//!
//! Change-gated sync engine for a remote command-registration API.
//!
//! The gate decides *whether* a sync call is worth making and records the
//! outcome durably, so process restarts do not cause redundant network
//! calls. Two cheap-to-expensive checks run in sequence: a minimum-interval
//! check against the persisted last sync time, then a fingerprint comparison
//! of the live command set against the persisted fingerprint. Only a
//! successful transport call advances the persisted state.
//!
//! Build a [`SyncGate`] from a [`StateStore`], a [`SyncPolicy`], a
//! [`SyncTransport`] and a [`PayloadSource`], then call
//! [`SyncGate::attempt_sync`].

pub mod error;
pub mod fingerprint;
pub mod gate;
pub mod state;
pub mod transport;

pub use error::SyncError;
pub use fingerprint::FingerprintEngine;
pub use gate::{SyncGate, SyncPolicy, DEFAULT_MINIMAL_SYNC_INTERVAL_SECS};
pub use state::{SavedState, StateLocation, StateStore, DEFAULT_STATE_FILENAME};
pub use transport::{JsonPayloadSource, PayloadError, PayloadSource, SyncTransport, TransportError};
