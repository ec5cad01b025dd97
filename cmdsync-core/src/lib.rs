//! # cmdsync-core
//!
//! Domain types shared by the sync gate and the reporter: command
//! descriptors, sync scopes, capability flags, and construction errors.

pub mod error;
pub mod types;

pub use error::ConfigError;
pub use types::{
    AppCommand, CommandDescriptor, CommandKind, CommandName, CommandOption, GuildId,
    InstallTargets, SyncScope, UsageContexts,
};
