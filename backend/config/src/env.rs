//! `${VAR}` substitution in config values and the environment overrides.
//!
//! Only uppercase `[A-Z_][A-Z0-9_]*` names are substituted; `$${VAR}` is kept
//! as the literal text `${VAR}`.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::{DiscordConfig, EmbedToolConfig};

/// Overrides `discord.token`.
pub const TOKEN_VAR: &str = "DISCORD_TOKEN";
/// Overrides `discord.guildId`.
pub const GUILD_VAR: &str = "EMBEDTOOL_GUILD_ID";

static REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").expect("env reference pattern is valid"));

#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute references from `env`. Unset or empty variables are an error.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    Ok(substitute(value, env, "")?)
}

fn substitute(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value, MissingEnvVarError> {
    match value {
        Value::String(s) => substitute_str(s, env, path).map(Value::String),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| substitute(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, v) in map {
                let child = if path.is_empty() { key.clone() } else { format!("{path}.{key}") };
                out.insert(key.clone(), substitute(v, env, &child)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_str(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String, MissingEnvVarError> {
    if !s.contains("${") {
        return Ok(s.to_string());
    }

    let mut missing = None;
    let out = REFERENCE.replace_all(s, |caps: &Captures| {
        let name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{name}}}");
        }
        match env.get(name) {
            Some(v) if !v.is_empty() => v.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    match missing {
        Some(err) => Err(err),
        None => Ok(out.into_owned()),
    }
}

/// Names of every variable referenced anywhere in the tree, sorted.
pub fn collect_referenced_vars(value: &Value) -> Vec<String> {
    fn walk(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::String(s) => out.extend(
                REFERENCE
                    .captures_iter(s)
                    .filter(|c| c[1].is_empty())
                    .map(|c| c[2].to_string()),
            ),
            Value::Array(items) => items.iter().for_each(|v| walk(v, out)),
            Value::Object(map) => map.values().for_each(|v| walk(v, out)),
            _ => {}
        }
    }

    let mut vars = Vec::new();
    walk(value, &mut vars);
    vars.sort();
    vars.dedup();
    vars
}

/// Apply `DISCORD_TOKEN` and `EMBEDTOOL_GUILD_ID` on top of the file values.
pub fn apply_env_overrides(mut config: EmbedToolConfig, env: &HashMap<String, String>) -> Result<EmbedToolConfig> {
    let token = env.get(TOKEN_VAR).filter(|v| !v.trim().is_empty());
    let guild = env.get(GUILD_VAR).filter(|v| !v.trim().is_empty());
    if token.is_none() && guild.is_none() {
        return Ok(config);
    }

    let discord = config.discord.get_or_insert_with(DiscordConfig::default);
    if let Some(token) = token {
        discord.token = Some(token.trim().to_string());
    }
    if let Some(guild) = guild {
        let id = guild
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{GUILD_VAR} must be a numeric guild id, got '{guild}'"))?;
        discord.guild_id = Some(id);
    }
    Ok(config)
}
