//! Embed tool configuration schema, typed for serde YAML/JSON deserialization.
//!
//! Every section is optional in the file; [`crate::defaults`] fills the gaps.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedToolConfig {
    /// Bot connection and command registration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<DiscordConfig>,

    /// Editing session limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionConfig>,

    /// Images shown by the tutorial overlay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutorial: Option<TutorialConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

// ---------------------------------------------------------------------------
// Discord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Register `/embed` in this guild only instead of globally.
    #[serde(
        default,
        deserialize_with = "snowflake",
        skip_serializing_if = "Option::is_none"
    )]
    pub guild_id: Option<u64>,

    /// Any color token the color form accepts, e.g. `#5865F2` or `blurple`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_color: Option<String>,
}

/// Snowflakes arrive as numbers from plain YAML and as strings after `${VAR}`
/// substitution.
fn snowflake<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid snowflake id '{s}'"))),
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Seconds without activity before a session expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_timeout_secs: Option<u64>,

    /// Upper bound on concurrently open sessions; unlimited when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sessions: Option<usize>,
}

// ---------------------------------------------------------------------------
// Tutorial
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorialConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_icon_url: Option<String>,
    /// Falls back to the bot's avatar when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_icon_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for daily-rolling log files; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r##"
discord:
  token: abc
  guildId: 123456789012345678
  defaultColor: "#FF0000"
session:
  idleTimeoutSecs: 60
tutorial:
  imageUrl: https://example.com/i.png
logging:
  level: debug
  json: false
"##;
        let cfg: EmbedToolConfig = serde_yaml::from_str(yaml).unwrap();
        let discord = cfg.discord.unwrap();
        assert_eq!(discord.guild_id, Some(123456789012345678));
        assert_eq!(discord.default_color.as_deref(), Some("#FF0000"));
        assert_eq!(cfg.session.unwrap().idle_timeout_secs, Some(60));
        assert_eq!(
            cfg.tutorial.unwrap().image_url.as_deref(),
            Some("https://example.com/i.png")
        );
        assert_eq!(cfg.logging.unwrap().json, Some(false));
    }

    #[test]
    fn guild_id_accepts_strings() {
        let cfg: DiscordConfig = serde_json::from_value(serde_json::json!({ "guildId": "42" })).unwrap();
        assert_eq!(cfg.guild_id, Some(42));

        let cfg: DiscordConfig = serde_json::from_value(serde_json::json!({ "guildId": "" })).unwrap();
        assert_eq!(cfg.guild_id, None);

        let err = serde_json::from_value::<DiscordConfig>(serde_json::json!({ "guildId": "abc" }));
        assert!(err.is_err());
    }
}
