//! Config validation: every problem found in one pass, with the config path it
//! concerns.

use crate::schema::EmbedToolConfig;
use embedtool_core::{optional_url, parse_color};
use thiserror::Error;

/// Idle timeouts shorter than this leave users too little time to fill a form.
const SHORT_TIMEOUT_SECS: u64 = 30;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &EmbedToolConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_discord(config, &mut report);
    validate_session(config, &mut report);
    validate_tutorial(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_discord(config: &EmbedToolConfig, report: &mut ValidationReport) {
    let discord = config.discord.as_ref();

    let token = discord.and_then(|d| d.token.as_deref()).unwrap_or("");
    if token.trim().is_empty() {
        report.error(
            "discord.token",
            "Discord bot token is required; set it in the file or via DISCORD_TOKEN",
        );
    } else if token.chars().any(char::is_whitespace) {
        report.error("discord.token", "Discord bot token must not contain whitespace");
    }

    let Some(discord) = discord else { return };
    if discord.guild_id == Some(0) {
        report.error("discord.guildId", "guildId must be a non-zero snowflake");
    }
    if discord.guild_id.is_none() {
        report.warn(
            "discord.guildId",
            "No guildId set; /embed is registered globally and may take a while to appear",
        );
    }
    if let Some(color) = &discord.default_color {
        if let Err(e) = parse_color(color) {
            report.error("discord.defaultColor", e.to_string());
        }
    }
}

fn validate_session(config: &EmbedToolConfig, report: &mut ValidationReport) {
    let Some(session) = &config.session else { return };
    match session.idle_timeout_secs {
        Some(0) => report.error("session.idleTimeoutSecs", "idleTimeoutSecs must be >= 1"),
        Some(secs) if secs < SHORT_TIMEOUT_SECS => report.warn(
            "session.idleTimeoutSecs",
            format!("Sessions expire after only {secs}s of inactivity"),
        ),
        _ => {}
    }
    if session.max_sessions == Some(0) {
        report.error("session.maxSessions", "maxSessions must be >= 1; omit it for no limit");
    }
}

fn validate_tutorial(config: &EmbedToolConfig, report: &mut ValidationReport) {
    let Some(tutorial) = &config.tutorial else { return };
    let urls = [
        ("thumbnailUrl", &tutorial.thumbnail_url),
        ("imageUrl", &tutorial.image_url),
        ("footerIconUrl", &tutorial.footer_icon_url),
        ("authorIconUrl", &tutorial.author_icon_url),
    ];
    for (key, url) in urls {
        let Some(url) = url else { continue };
        if let Err(e) = optional_url(url, "tutorial image") {
            report.error(format!("tutorial.{key}"), e.to_string());
        }
    }
}

fn validate_logging(config: &EmbedToolConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            report.warn(
                "logging.level",
                format!("Unknown log level '{level}'. Use one of {}", LOG_LEVELS.join(", ")),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;
    use crate::schema::{DiscordConfig, SessionConfig, TutorialConfig};

    fn with_token() -> EmbedToolConfig {
        EmbedToolConfig {
            discord: Some(DiscordConfig {
                token: Some("abc.def.ghi".into()),
                guild_id: Some(1),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_with_token_are_valid() {
        let report = validate(&apply_all_defaults(with_token()));
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);
    }

    #[test]
    fn missing_token_is_error() {
        let report = validate(&apply_all_defaults(EmbedToolConfig::default()));
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "discord.token");
    }

    #[test]
    fn bad_color_and_zero_limits() {
        let mut cfg = with_token();
        cfg.discord.as_mut().unwrap().default_color = Some("notacolor".into());
        cfg.session = Some(SessionConfig { idle_timeout_secs: Some(0), max_sessions: Some(0) });
        let report = validate(&cfg);
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["discord.defaultColor", "session.idleTimeoutSecs", "session.maxSessions"]
        );
    }

    #[test]
    fn short_timeout_and_no_guild_warn() {
        let mut cfg = with_token();
        cfg.discord.as_mut().unwrap().guild_id = None;
        cfg.session = Some(SessionConfig { idle_timeout_secs: Some(10), max_sessions: None });
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn tutorial_urls_must_be_http() {
        let mut cfg = with_token();
        cfg.tutorial = Some(TutorialConfig {
            image_url: Some("ftp://example.com/a.png".into()),
            ..Default::default()
        });
        let report = validate(&cfg);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, "tutorial.imageUrl");
    }
}
