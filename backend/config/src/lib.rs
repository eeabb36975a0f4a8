//! `embedtool-config`: configuration for the embed tool bot.
//!
//! Provides:
//! - Typed config schema (Discord connection, session limits, tutorial images, logging)
//! - Config file location and YAML loading
//! - `${ENV_VAR}` substitution and `DISCORD_TOKEN` / `EMBEDTOOL_GUILD_ID` overrides
//! - Default value application
//! - Validation with a report of errors and warnings
//! - Secret redaction for display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides, collect_referenced_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, load_raw};
pub use redact::{collect_redacted_paths, redact};
pub use schema::{DiscordConfig, EmbedToolConfig, LoggingConfig, SessionConfig, TutorialConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Load a config file and run it through env substitution, overrides, defaults
/// and validation against the process environment.
///
/// Problems are logged; callers decide whether an invalid report is fatal.
pub async fn load_and_prepare(path: &Path) -> Result<(EmbedToolConfig, ValidationReport)> {
    load_and_prepare_with(path, &std::env::vars().collect()).await
}

pub async fn load_and_prepare_with(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<(EmbedToolConfig, ValidationReport)> {
    let value: Value = load_raw(path).await?;
    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;
    let config: EmbedToolConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides(config, env)?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }

    Ok((config, report))
}
