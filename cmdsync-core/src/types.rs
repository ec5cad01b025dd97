//! Domain types for command-registration sync.
//!
//! Command descriptors are a closed model: every registrable shape is one of
//! [`CommandKind`]'s variants on a single [`CommandDescriptor`] struct.
//! Capability flags are tri-state — `None` means "inherit the bot default".
//! All types are serializable/deserializable via serde + serde_json.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed canonical command name.
///
/// Sorting for fingerprint purposes compares the raw bytes of this name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommandName(pub String);

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for CommandName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CommandName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed remote group (guild) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuildId(pub u64);

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for GuildId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// Logical scope for a sync run: the global command set, or one guild's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncScope {
    /// Sync the global command set.
    Global,
    /// Sync the command set for a single guild.
    Guild(GuildId),
}

impl SyncScope {
    /// Stable filesystem-safe label for this scope, used to derive
    /// per-scope state filenames.
    pub fn label(&self) -> String {
        match self {
            SyncScope::Global => "global".to_string(),
            SyncScope::Guild(id) => format!("guild_{id}"),
        }
    }
}

impl fmt::Display for SyncScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncScope::Global => write!(f, "global"),
            SyncScope::Guild(id) => write!(f, "guild {id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Capability flags
// ---------------------------------------------------------------------------

/// Where a command may be installed. `None` inherits the bot default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstallTargets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<bool>,
}

/// Where a command may be invoked. `None` inherits the bot default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsageContexts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dm: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_channel: Option<bool>,
}

// ---------------------------------------------------------------------------
// Command model
// ---------------------------------------------------------------------------

/// The shape of a registrable command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    #[default]
    Slash,
    Group,
    ContextMenu,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::Slash => write!(f, "slash"),
            CommandKind::Group => write!(f, "group"),
            CommandKind::ContextMenu => write!(f, "context_menu"),
        }
    }
}

/// A single declared parameter of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

/// Full declarative definition of one command.
///
/// Names are unique within a scope. `name_localizations` is set-like; it is
/// a `BTreeMap` so serialization never depends on insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub name: CommandName,
    pub kind: CommandKind,
    pub description: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
    #[serde(default)]
    pub install: InstallTargets,
    #[serde(default)]
    pub contexts: UsageContexts,
    #[serde(default)]
    pub name_localizations: BTreeMap<String, String>,
}

impl CommandDescriptor {
    /// A slash command with defaults for everything but name and description.
    pub fn slash(name: impl Into<CommandName>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: CommandKind::Slash,
            description: description.into(),
            options: Vec::new(),
            install: InstallTargets::default(),
            contexts: UsageContexts::default(),
            name_localizations: BTreeMap::new(),
        }
    }
}

/// One remotely-registered command as reported back by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCommand {
    pub id: u64,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
