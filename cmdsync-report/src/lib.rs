//! # cmdsync-report
//!
//! Read-only capability validation and reporting for a command set.
//!
//! A [`TreeChecker`] validates each command's declared install/usage flags
//! against a [`BotProfile`] and either fails on the first incompatible
//! command or produces a [`DebugReport`] (JSON file plus human-readable
//! text). [`CheckedTransport`] composes the check in front of any
//! [`cmdsync_gate::SyncTransport`].

pub mod checked;
pub mod error;
pub mod report;

pub use checked::CheckedTransport;
pub use error::ReportError;
pub use report::{BotProfile, Capability, CommandReport, DebugReport, TreeChecker};
