//! Capability validation and report generation.
//!
//! Resolution order for bot-level install flags: explicit flag, then the
//! application's integration config, then the default (not installable).
//! Usage contexts default to usable when unset. Command-level flags default
//! per capability; see [`Capability::command_default`].

use std::path::Path;

use serde::Serialize;

use cmdsync_core::{CommandDescriptor, CommandName, InstallTargets, UsageContexts};

use crate::error::{io_err, ReportError};

/// One validated capability dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    GuildInstallable,
    UserInstallable,
    GuildUsable,
    DmUsable,
    PrivateChannelUsable,
}

impl Capability {
    const ALL: [Capability; 5] = [
        Capability::GuildInstallable,
        Capability::UserInstallable,
        Capability::GuildUsable,
        Capability::DmUsable,
        Capability::PrivateChannelUsable,
    ];

    /// What an unset command-level flag resolves to.
    fn command_default(self) -> bool {
        match self {
            Capability::GuildInstallable => true,
            Capability::UserInstallable => false,
            Capability::GuildUsable => true,
            Capability::DmUsable => true,
            Capability::PrivateChannelUsable => false,
        }
    }

    fn command_flag(self, command: &CommandDescriptor) -> Option<bool> {
        match self {
            Capability::GuildInstallable => command.install.guild,
            Capability::UserInstallable => command.install.user,
            Capability::GuildUsable => command.contexts.guild,
            Capability::DmUsable => command.contexts.dm,
            Capability::PrivateChannelUsable => command.contexts.private_channel,
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::GuildInstallable => write!(f, "guild installable"),
            Capability::UserInstallable => write!(f, "user installable"),
            Capability::GuildUsable => write!(f, "guild usable"),
            Capability::DmUsable => write!(f, "DM usable"),
            Capability::PrivateChannelUsable => write!(f, "private channel usable"),
        }
    }
}

/// Bot-level installability and usability profile.
///
/// Explicit flags are tri-state; `app_*` fields carry the application's
/// integration config, consulted when the explicit flag is unset.
#[derive(Debug, Clone, Default)]
pub struct BotProfile {
    pub installs: InstallTargets,
    pub contexts: UsageContexts,
    pub app_guild_installable: Option<bool>,
    pub app_user_installable: Option<bool>,
}

impl BotProfile {
    fn resolve(&self, capability: Capability) -> bool {
        match capability {
            Capability::GuildInstallable => self
                .installs
                .guild
                .or(self.app_guild_installable)
                .unwrap_or(false),
            Capability::UserInstallable => self
                .installs
                .user
                .or(self.app_user_installable)
                .unwrap_or(false),
            Capability::GuildUsable => self.contexts.guild.unwrap_or(true),
            Capability::DmUsable => self.contexts.dm.unwrap_or(true),
            Capability::PrivateChannelUsable => self.contexts.private_channel.unwrap_or(true),
        }
    }
}

/// Resolved bot-level flags, as written to the JSON report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotReport {
    pub guild_installable: bool,
    pub user_installable: bool,
    pub guild_usable: bool,
    pub dm_usable: bool,
    pub private_channel_usable: bool,
}

/// Resolved per-command flags, as written to the JSON report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandReport {
    pub name: CommandName,
    pub guild_installable: bool,
    pub user_installable: bool,
    pub guild_usable: bool,
    pub dm_usable: bool,
    pub private_channel_usable: bool,
}

/// Full validation report: bot-level flags plus one entry per command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugReport {
    pub bot: BotReport,
    pub commands: Vec<CommandReport>,
}

fn fmt_flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "Unset",
    }
}

impl DebugReport {
    /// Human-readable rendering of the full report.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str("Bot installability and usability:\n");
        out.push_str(&format!(
            "  Commands can be added to a guild: {}\n",
            fmt_flag(Some(self.bot.guild_installable))
        ));
        out.push_str(&format!(
            "  Commands can be added to a user: {}\n",
            fmt_flag(Some(self.bot.user_installable))
        ));
        out.push_str(&format!(
            "  Commands can be used in a guild: {}\n",
            fmt_flag(Some(self.bot.guild_usable))
        ));
        out.push_str(&format!(
            "  Commands can be used in the bot's DM: {}\n",
            fmt_flag(Some(self.bot.dm_usable))
        ));
        out.push_str(&format!(
            "  Commands can be used in a user's or group DM: {}\n",
            fmt_flag(Some(self.bot.private_channel_usable))
        ));
        out.push_str("Commands:\n");
        for cmd in &self.commands {
            out.push_str(&format!("- Command '{}':\n", cmd.name));
            out.push_str(&format!(
                "  Can be added to a guild: {}\n",
                fmt_flag(Some(cmd.guild_installable))
            ));
            out.push_str(&format!(
                "  Can be added to a user: {}\n",
                fmt_flag(Some(cmd.user_installable))
            ));
            out.push_str(&format!(
                "  Can be used in a guild: {}\n",
                fmt_flag(Some(cmd.guild_usable))
            ));
            out.push_str(&format!(
                "  Can be used in the bot's DM: {}\n",
                fmt_flag(Some(cmd.dm_usable))
            ));
            out.push_str(&format!(
                "  Can be used in a user's or group DM: {}\n",
                fmt_flag(Some(cmd.private_channel_usable))
            ));
        }
        out
    }

    /// Write the report as pretty JSON, atomically (`.tmp` + rename).
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(path, e));
        }
        tracing::info!("wrote capability report to {}", path.display());
        Ok(())
    }
}

/// Validates a command set against a bot profile.
#[derive(Debug, Clone, Default)]
pub struct TreeChecker {
    profile: BotProfile,
}

impl TreeChecker {
    pub fn new(profile: BotProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &BotProfile {
        &self.profile
    }

    /// Validate every command and build the report.
    ///
    /// Fails on the first command that declares a capability the bot lacks,
    /// and on an empty command set.
    pub fn check(&self, commands: &[CommandDescriptor]) -> Result<DebugReport, ReportError> {
        if commands.is_empty() {
            return Err(ReportError::NoCommands);
        }

        let mut reports = Vec::with_capacity(commands.len());
        for command in commands {
            reports.push(self.check_command(command)?);
        }

        Ok(DebugReport {
            bot: BotReport {
                guild_installable: self.profile.resolve(Capability::GuildInstallable),
                user_installable: self.profile.resolve(Capability::UserInstallable),
                guild_usable: self.profile.resolve(Capability::GuildUsable),
                dm_usable: self.profile.resolve(Capability::DmUsable),
                private_channel_usable: self.profile.resolve(Capability::PrivateChannelUsable),
            },
            commands: reports,
        })
    }

    fn check_command(&self, command: &CommandDescriptor) -> Result<CommandReport, ReportError> {
        let mut resolved = [false; 5];
        for (slot, capability) in resolved.iter_mut().zip(Capability::ALL) {
            let wants = capability
                .command_flag(command)
                .unwrap_or_else(|| capability.command_default());
            if wants && !self.profile.resolve(capability) {
                return Err(ReportError::Incompatible {
                    command: command.name.clone(),
                    capability,
                });
            }
            *slot = wants;
        }

        let [guild_installable, user_installable, guild_usable, dm_usable, private_channel_usable] =
            resolved;
        Ok(CommandReport {
            name: command.name.clone(),
            guild_installable,
            user_installable,
            guild_usable,
            dm_usable,
            private_channel_usable,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn guild_installable_bot() -> BotProfile {
        BotProfile {
            installs: InstallTargets {
                guild: Some(true),
                user: None,
            },
            ..BotProfile::default()
        }
    }

    #[test]
    fn empty_command_set_is_rejected() {
        let checker = TreeChecker::new(guild_installable_bot());
        assert!(matches!(checker.check(&[]), Err(ReportError::NoCommands)));
    }

    #[test]
    fn compatible_commands_produce_a_full_report() {
        let checker = TreeChecker::new(guild_installable_bot());
        let commands = vec![
            CommandDescriptor::slash("ban", "Ban a member"),
            CommandDescriptor::slash("kick", "Kick a member"),
        ];
        let report = checker.check(&commands).expect("check");
        assert_eq!(report.commands.len(), 2);
        assert!(report.bot.guild_installable);
        assert!(!report.bot.user_installable);
        assert!(report.commands[0].guild_installable, "command default");
    }

    #[test]
    fn first_incompatible_command_fails_the_check() {
        let checker = TreeChecker::new(guild_installable_bot());
        let mut user_cmd = CommandDescriptor::slash("profile", "Show a profile");
        user_cmd.install.user = Some(true);
        let commands = vec![CommandDescriptor::slash("ban", "Ban a member"), user_cmd];

        let err = checker.check(&commands).expect_err("must fail");
        match err {
            ReportError::Incompatible {
                command,
                capability,
            } => {
                assert_eq!(command.to_string(), "profile");
                assert_eq!(capability, Capability::UserInstallable);
            }
            other => panic!("expected incompatible, got {other:?}"),
        }
    }

    #[test]
    fn app_config_fills_in_unset_bot_flags() {
        let profile = BotProfile {
            app_user_installable: Some(true),
            ..BotProfile::default()
        };
        assert!(profile.resolve(Capability::UserInstallable));

        let explicit_off = BotProfile {
            installs: InstallTargets {
                guild: None,
                user: Some(false),
            },
            app_user_installable: Some(true),
            ..BotProfile::default()
        };
        assert!(
            !explicit_off.resolve(Capability::UserInstallable),
            "explicit flag wins over app config"
        );
    }

    #[test]
    fn disabled_context_rejects_commands_inheriting_it() {
        let profile = BotProfile {
            installs: InstallTargets {
                guild: Some(true),
                user: None,
            },
            contexts: UsageContexts {
                guild: None,
                dm: Some(false),
                private_channel: None,
            },
            ..BotProfile::default()
        };
        let checker = TreeChecker::new(profile);

        // DM usability defaults to true at the command level, so a plain
        // command clashes with a DM-disabled bot.
        let err = checker
            .check(&[CommandDescriptor::slash("ban", "Ban a member")])
            .expect_err("must fail");
        assert!(matches!(
            err,
            ReportError::Incompatible {
                capability: Capability::DmUsable,
                ..
            }
        ));

        let mut guild_only = CommandDescriptor::slash("ban", "Ban a member");
        guild_only.contexts.dm = Some(false);
        guild_only.contexts.private_channel = Some(false);
        assert!(checker.check(&[guild_only]).is_ok());
    }

    #[test]
    fn text_report_lists_bot_and_commands() {
        let checker = TreeChecker::new(guild_installable_bot());
        let report = checker
            .check(&[CommandDescriptor::slash("ban", "Ban a member")])
            .expect("check");
        let text = report.render_text();
        assert!(text.starts_with("Bot installability and usability:"));
        assert!(text.contains("- Command 'ban':"));
        assert!(text.contains("Can be added to a guild: Yes"));
        assert!(text.contains("Can be added to a user: No"));
    }

    #[test]
    fn json_report_is_written_atomically() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("reports").join("debug_report.json");

        let checker = TreeChecker::new(guild_installable_bot());
        let report = checker
            .check(&[CommandDescriptor::slash("ban", "Ban a member")])
            .expect("check");
        report.write_json(&path).expect("write");

        assert!(!path.with_extension("json.tmp").exists());
        let raw = std::fs::read_to_string(&path).expect("read");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(value["bot"]["guild_installable"], true);
        assert_eq!(value["commands"][0]["name"], "ban");
    }
}
