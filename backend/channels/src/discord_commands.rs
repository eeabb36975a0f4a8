//! Discord Slash Commands
//!
//! Defines the `/embed send` and `/embed edit` application commands and parses
//! their options.

use anyhow::{Result, anyhow, bail};
use serenity::all::{
    CommandDataOption, CommandDataOptionValue, CommandOptionType, CreateCommand, CreateCommandOption, Permissions,
};

pub const COMMAND_NAME: &str = "embed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedCommand {
    /// Compose a new embed for `channel` (the invoking channel when `None`).
    Send { channel: Option<u64> },
    /// Edit `message_id` in `channel` (the invoking channel when `None`).
    Edit { message_id: u64, channel: Option<u64> },
}

/// The `/embed` command group, usable by administrators only.
pub fn embed_command() -> CreateCommand {
    let channel_option = || {
        CreateCommandOption::new(CommandOptionType::Channel, "channel", "Please enter the channel!").required(false)
    };
    CreateCommand::new(COMMAND_NAME)
        .description("Group of send/edit embed commands!")
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .dm_permission(false)
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "send", "Sends an embed to the channel specified!")
                .add_sub_option(channel_option()),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "edit", "Edits an embed in the channel specified!")
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::String, "message_id", "Please enter the message ID!")
                        .required(true),
                )
                .add_sub_option(channel_option()),
        )
}

impl EmbedCommand {
    pub fn from_options(options: &[CommandDataOption]) -> Result<Self> {
        let sub = options.first().ok_or_else(|| anyhow!("Missing subcommand"))?;
        let CommandDataOptionValue::SubCommand(args) = &sub.value else {
            bail!("Expected a subcommand, got {:?}", sub.value);
        };

        let mut channel = None;
        let mut message = None;
        for arg in args {
            match (arg.name.as_str(), &arg.value) {
                ("channel", CommandDataOptionValue::Channel(id)) => channel = Some(id.get()),
                ("message_id", CommandDataOptionValue::String(raw)) => message = Some(parse_message_target(raw)?),
                _ => {}
            }
        }

        match sub.name.as_str() {
            "send" => Ok(EmbedCommand::Send { channel }),
            "edit" => {
                let (link_channel, message_id) = message.ok_or_else(|| anyhow!("Please enter the message ID!"))?;
                Ok(EmbedCommand::Edit { message_id, channel: channel.or(link_channel) })
            }
            other => bail!("Unknown subcommand {other}"),
        }
    }
}

/// Accepts a bare message id or a message link
/// (`https://discord.com/channels/<guild>/<channel>/<message>`), in which case
/// the channel of the link is returned as well.
pub fn parse_message_target(raw: &str) -> Result<(Option<u64>, u64)> {
    let raw = raw.trim();
    let parse_id = |s: &str| -> Result<u64> {
        match s.parse::<u64>() {
            Ok(id) if id > 0 => Ok(id),
            _ => bail!("{raw:?} is not a valid message ID"),
        }
    };

    if raw.starts_with("http") {
        let parts: Vec<&str> = raw.trim_end_matches('/').rsplitn(3, '/').collect();
        if let [message, channel, _] = parts.as_slice() {
            return Ok((Some(parse_id(channel)?), parse_id(message)?));
        }
        bail!("{raw:?} is not a valid message link");
    }
    Ok((None, parse_id(raw)?))
}
