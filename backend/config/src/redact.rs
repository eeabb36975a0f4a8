//! Safe-to-print config snapshots: secrets are masked before the config is
//! shown by `check-config` or logged.

use serde_json::Value;

const SENSITIVE_KEYS: &[&str] = &["token", "botToken", "secret", "clientSecret", "password"];

/// Mask every sensitive string in a serialized config.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_sensitive_key(key) && !s.is_empty() => Value::String(mask(s)),
        Value::Array(items) => Value::Array(items.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_recursive(v, k)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Keep a short prefix as a hint for which secret is configured.
fn mask(secret: &str) -> String {
    if secret.chars().count() > 8 {
        format!("{}***", secret.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    }
}

/// Dotted paths of every value [`redact`] masks.
pub fn collect_redacted_paths(value: &Value) -> Vec<String> {
    fn walk(value: &Value, path: &str, out: &mut Vec<String>) {
        match value {
            Value::String(s) if !s.is_empty() => {
                let key = path.rsplit('.').next().unwrap_or("");
                if is_sensitive_key(key) {
                    out.push(path.to_string());
                }
            }
            Value::Object(map) => {
                for (k, v) in map {
                    let child = if path.is_empty() { k.clone() } else { format!("{path}.{k}") };
                    walk(v, &child, out);
                }
            }
            _ => {}
        }
    }

    let mut paths = Vec::new();
    walk(value, "", &mut paths);
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn masks_discord_token() {
        let v = json!({ "discord": { "token": "MTAxMjM0NTY3ODkw.Gabcde.secretpart", "guildId": 42 } });
        let redacted = redact(&v);
        let token = redacted["discord"]["token"].as_str().unwrap();
        assert_eq!(token, "MTAx***");
        assert_eq!(redacted["discord"]["guildId"], 42);
        assert_eq!(collect_redacted_paths(&v), vec!["discord.token".to_string()]);
    }

    #[test]
    fn short_secrets_are_fully_masked() {
        let redacted = redact(&json!({ "password": "hunter2" }));
        assert_eq!(redacted["password"], "***");
    }

    #[test]
    fn passthrough_non_sensitive() {
        let v = json!({ "logging": { "level": "debug" }, "tutorial": { "imageUrl": "https://x/a.png" } });
        assert_eq!(redact(&v), v);
    }
}
