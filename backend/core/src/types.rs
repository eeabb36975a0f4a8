use std::fmt;

use serde::{Deserialize, Serialize};

use crate::draft::EmbedDraft;

/// The user who invoked a session, as currently displayed to others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: u64,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl UserIdentity {
    pub fn new(id: u64, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            avatar_url: None,
        }
    }

    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }
}

/// A channel a new embed can be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelRef {
    pub guild_id: Option<u64>,
    pub channel_id: u64,
}

/// A message that already exists on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub message_id: u64,
}

impl MessageRef {
    /// Link that jumps straight to the message in the Discord client.
    pub fn jump_url(&self) -> String {
        match self.guild_id {
            Some(guild) => format!(
                "https://discord.com/channels/{}/{}/{}",
                guild, self.channel_id, self.message_id
            ),
            None => format!(
                "https://discord.com/channels/@me/{}/{}",
                self.channel_id, self.message_id
            ),
        }
    }

    pub fn channel(&self) -> ChannelRef {
        ChannelRef {
            guild_id: self.guild_id,
            channel_id: self.channel_id,
        }
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.channel_id, self.message_id)
    }
}

/// Whether a session sends a brand new message or edits one in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionMode {
    NewSend { channel: ChannelRef },
    EditExisting { message: MessageRef },
}

impl SessionMode {
    pub fn is_new(&self) -> bool {
        matches!(self, SessionMode::NewSend { .. })
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::NewSend { channel } => write!(f, "send({})", channel.channel_id),
            SessionMode::EditExisting { message } => write!(f, "edit({})", message),
        }
    }
}

/// A message fetched from the platform, used to seed edit sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingMessage {
    pub reference: MessageRef,
    pub author_id: u64,
    /// First embed of the message, if any.
    pub embed: Option<EmbedDraft>,
}
