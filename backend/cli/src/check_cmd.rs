//! `embedtool check-config`: load the config the way `run` would and report
//! every problem without connecting to Discord.

use std::path::Path;

use anyhow::{Context, Result};
use embedtool_config::{collect_redacted_paths, collect_referenced_vars, load_and_prepare, load_raw, redact};

use crate::terminal_output::{heading, note_error, note_info, note_success, note_warn};

/// Returns whether the config is usable.
pub async fn run(path: &Path) -> Result<bool> {
    heading(&format!("\nChecking {}\n", path.display()));
    if !path.exists() {
        note_info("Config file not found; using defaults and environment only");
    }

    let referenced = collect_referenced_vars(&load_raw(path).await?);
    if !referenced.is_empty() {
        note_info(&format!("Environment variables referenced: {}", referenced.join(", ")));
    }

    let (config, report) = load_and_prepare(path).await?;

    for warning in &report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    for error in &report.errors {
        note_error(&format!("{}: {}", error.path, error.message));
    }

    let value = serde_json::to_value(&config).context("Failed to serialize config")?;
    let masked = collect_redacted_paths(&value);
    println!();
    heading("Effective config:");
    print!("{}", serde_yaml::to_string(&redact(&value)).context("Failed to render config")?);
    if !masked.is_empty() {
        note_info(&format!("Masked: {}", masked.join(", ")));
    }

    println!();
    if report.is_valid() {
        note_success("Config is valid.");
    } else {
        note_error(&format!("{} error(s) found; fix them before running the bot.", report.errors.len()));
    }
    Ok(report.is_valid())
}
