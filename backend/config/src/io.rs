//! Locating and reading the config file.

use crate::schema::EmbedToolConfig;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Points at a config file, overriding the default location.
pub const CONFIG_PATH_VAR: &str = "EMBEDTOOL_CONFIG";

const CONFIG_DIR_NAME: &str = "embedtool";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Default config directory: `<platform config dir>/embedtool`, or
/// `./.embedtool` on platforms without one.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{CONFIG_DIR_NAME}")))
}

/// Resolve the config file path.
/// Priority: explicit `--config` > `$EMBEDTOOL_CONFIG` > [`config_dir`]`/config.yaml`.
pub fn config_file_path(explicit: Option<&Path>) -> PathBuf {
    resolve_config_path(explicit, std::env::var(CONFIG_PATH_VAR).ok())
}

fn resolve_config_path(explicit: Option<&Path>, from_env: Option<String>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match from_env {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
        _ => config_dir().join(CONFIG_FILE_NAME),
    }
}

/// Read the config file as an untyped value tree, before `${VAR}` substitution.
///
/// A missing or empty file yields an empty object; the token may still come
/// from the environment.
pub async fn load_raw(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    let value: Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(value)
}

/// Load and parse the config from disk without env substitution.
pub async fn load_config(path: &Path) -> Result<EmbedToolConfig> {
    let value = load_raw(path).await?;
    serde_json::from_value(value)
        .with_context(|| format!("Invalid config at: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn write_temp(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("embedtool-config-{}.yaml", uuid::Uuid::new_v4()));
        fs::write(&path, contents).await.unwrap();
        path
    }

    #[test]
    fn explicit_path_wins() {
        let explicit = PathBuf::from("/tmp/explicit.yaml");
        let resolved = resolve_config_path(Some(&explicit), Some("/tmp/env.yaml".into()));
        assert_eq!(resolved, explicit);
    }

    #[test]
    fn env_path_beats_default() {
        assert_eq!(
            resolve_config_path(None, Some("/tmp/env.yaml".into())),
            PathBuf::from("/tmp/env.yaml")
        );
        let fallback = resolve_config_path(None, Some("  ".into()));
        assert!(fallback.ends_with("embedtool/config.yaml"));
    }

    #[tokio::test]
    async fn missing_file_is_default() {
        let path = std::env::temp_dir().join(format!("embedtool-missing-{}.yaml", uuid::Uuid::new_v4()));
        assert_eq!(load_config(&path).await.unwrap(), EmbedToolConfig::default());
    }

    #[tokio::test]
    async fn reads_yaml_file() {
        let path = write_temp("session:\n  maxSessions: 4\n").await;
        let cfg = load_config(&path).await.unwrap();
        assert_eq!(cfg.session.unwrap().max_sessions, Some(4));
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn malformed_yaml_names_the_file() {
        let path = write_temp("session: [unclosed\n").await;
        let err = load_config(&path).await.unwrap_err();
        assert!(format!("{err:#}").contains(&path.display().to_string()));
        let _ = fs::remove_file(&path).await;
    }
}
