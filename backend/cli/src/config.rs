//! Turns a prepared [`EmbedToolConfig`] into the runtime settings of each crate.

use std::time::Duration;

use anyhow::{Context, Result};
use embedtool_channels::DiscordSettings;
use embedtool_config::defaults::{DEFAULT_COLOR, DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_LOG_LEVEL};
use embedtool_config::EmbedToolConfig;
use embedtool_core::{parse_color, Rgb, TutorialImages};
use embedtool_logging::LoggerOptions;
use embedtool_session::RegistrySettings;

pub fn logger_options(config: &EmbedToolConfig) -> LoggerOptions {
    let logging = config.logging.clone().unwrap_or_default();
    LoggerOptions {
        level: logging.level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        dir: logging.dir,
        json: logging.json.unwrap_or(true),
    }
}

pub fn default_color(config: &EmbedToolConfig) -> Result<Rgb> {
    let raw = config
        .discord
        .as_ref()
        .and_then(|d| d.default_color.as_deref())
        .unwrap_or(DEFAULT_COLOR);
    parse_color(raw).with_context(|| "discord.defaultColor is not a valid color")
}

pub fn registry_settings(config: &EmbedToolConfig) -> Result<RegistrySettings> {
    let session = config.session.clone().unwrap_or_default();
    Ok(RegistrySettings {
        idle_timeout: Duration::from_secs(session.idle_timeout_secs.unwrap_or(DEFAULT_IDLE_TIMEOUT_SECS)),
        default_color: default_color(config)?,
        max_sessions: session.max_sessions,
    })
}

pub fn tutorial_images(config: &EmbedToolConfig) -> TutorialImages {
    let defaults = TutorialImages::default();
    let tutorial = config.tutorial.clone().unwrap_or_default();
    TutorialImages {
        thumbnail_url: tutorial.thumbnail_url.unwrap_or(defaults.thumbnail_url),
        image_url: tutorial.image_url.unwrap_or(defaults.image_url),
        footer_icon_url: tutorial.footer_icon_url.unwrap_or(defaults.footer_icon_url),
        author_icon_url: tutorial.author_icon_url,
    }
}

pub fn discord_settings(config: &EmbedToolConfig) -> Result<DiscordSettings> {
    let discord = config.discord.clone().unwrap_or_default();
    let token = discord
        .token
        .filter(|t| !t.trim().is_empty())
        .context("No Discord bot token configured (discord.token or DISCORD_TOKEN)")?;
    Ok(DiscordSettings {
        token,
        guild_id: discord.guild_id,
        sessions: registry_settings(config)?,
        tutorial: tutorial_images(config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedtool_config::{apply_all_defaults, DiscordConfig, SessionConfig, TutorialConfig};

    #[test]
    fn settings_follow_the_config() {
        let cfg = apply_all_defaults(EmbedToolConfig {
            discord: Some(DiscordConfig {
                token: Some("tok".into()),
                guild_id: Some(7),
                default_color: Some("red".into()),
            }),
            session: Some(SessionConfig { idle_timeout_secs: Some(60), max_sessions: Some(3) }),
            tutorial: Some(TutorialConfig {
                author_icon_url: Some("https://example.com/me.png".into()),
                ..Default::default()
            }),
            ..Default::default()
        });
        let settings = discord_settings(&cfg).unwrap();
        assert_eq!(settings.token, "tok");
        assert_eq!(settings.guild_id, Some(7));
        assert_eq!(settings.sessions.idle_timeout, Duration::from_secs(60));
        assert_eq!(settings.sessions.max_sessions, Some(3));
        assert_eq!(settings.sessions.default_color, Rgb::new(0xE74C3C));
        assert_eq!(settings.tutorial.author_icon_url.as_deref(), Some("https://example.com/me.png"));
        assert_eq!(settings.tutorial.image_url, TutorialImages::default().image_url);
    }

    #[test]
    fn empty_config_has_no_token() {
        let err = discord_settings(&EmbedToolConfig::default()).unwrap_err();
        assert!(err.to_string().contains("DISCORD_TOKEN"));
        let registry = registry_settings(&EmbedToolConfig::default()).unwrap();
        assert_eq!(registry.idle_timeout, Duration::from_secs(180));
        assert_eq!(registry.default_color, Rgb::new(0x5865F2));
    }

    #[test]
    fn logging_defaults() {
        let opts = logger_options(&EmbedToolConfig::default());
        assert_eq!(opts.level, "info");
        assert!(opts.dir.is_none());
        assert!(opts.json);
    }
}
