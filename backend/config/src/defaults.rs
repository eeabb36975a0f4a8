//! Config defaults: fills every setting the file and environment left unset.

use embedtool_core::TutorialImages;

use crate::schema::{DiscordConfig, EmbedToolConfig, LoggingConfig, SessionConfig, TutorialConfig};

/// Seconds of inactivity before a session expires.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 180;

/// Discord blurple.
pub const DEFAULT_COLOR: &str = "#5865F2";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: EmbedToolConfig) -> EmbedToolConfig {
    let config = apply_discord_defaults(config);
    let config = apply_session_defaults(config);
    let config = apply_tutorial_defaults(config);
    apply_logging_defaults(config)
}

fn apply_discord_defaults(mut config: EmbedToolConfig) -> EmbedToolConfig {
    let discord = config.discord.get_or_insert_with(DiscordConfig::default);
    if discord.default_color.is_none() {
        discord.default_color = Some(DEFAULT_COLOR.to_string());
    }
    config
}

fn apply_session_defaults(mut config: EmbedToolConfig) -> EmbedToolConfig {
    let session = config.session.get_or_insert_with(SessionConfig::default);
    if session.idle_timeout_secs.is_none() {
        session.idle_timeout_secs = Some(DEFAULT_IDLE_TIMEOUT_SECS);
    }
    config
}

/// The author icon is left unset; the adapter falls back to the bot avatar.
fn apply_tutorial_defaults(mut config: EmbedToolConfig) -> EmbedToolConfig {
    let images = TutorialImages::default();
    let tutorial = config.tutorial.get_or_insert_with(TutorialConfig::default);
    tutorial.thumbnail_url.get_or_insert(images.thumbnail_url);
    tutorial.image_url.get_or_insert(images.image_url);
    tutorial.footer_icon_url.get_or_insert(images.footer_icon_url);
    config
}

fn apply_logging_defaults(mut config: EmbedToolConfig) -> EmbedToolConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.json.is_none() {
        logging.json = Some(true);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_an_empty_config() {
        let cfg = apply_all_defaults(EmbedToolConfig::default());
        assert_eq!(cfg.session.unwrap().idle_timeout_secs, Some(180));
        assert_eq!(cfg.discord.unwrap().default_color.as_deref(), Some(DEFAULT_COLOR));
        let tutorial = cfg.tutorial.unwrap();
        assert!(tutorial.thumbnail_url.is_some());
        assert!(tutorial.author_icon_url.is_none());
        assert_eq!(cfg.logging.unwrap().level.as_deref(), Some("info"));
    }

    #[test]
    fn does_not_override_user_values() {
        let cfg = EmbedToolConfig {
            session: Some(SessionConfig { idle_timeout_secs: Some(30), max_sessions: Some(2) }),
            tutorial: Some(TutorialConfig {
                image_url: Some("https://example.com/mine.png".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let cfg = apply_all_defaults(cfg);
        let session = cfg.session.unwrap();
        assert_eq!(session.idle_timeout_secs, Some(30));
        assert_eq!(session.max_sessions, Some(2));
        assert_eq!(cfg.tutorial.unwrap().image_url.as_deref(), Some("https://example.com/mine.png"));
    }
}
