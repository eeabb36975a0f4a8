//! Log Redaction Layer
//!
//! Scrubs bot tokens, bearer tokens and webhook secrets from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static BOT_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[MNO][A-Za-z\d_-]{23,27}\.[A-Za-z\d_-]{6}\.[A-Za-z\d_-]{27,40}").unwrap()
});
static AUTH_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:Bearer|Bot)\s+[A-Za-z0-9\-\._~+/]+=*").unwrap());
static WEBHOOK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(https://(?:canary\.|ptb\.)?discord(?:app)?\.com/api/webhooks/\d+/)[A-Za-z0-9_-]+").unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let mut redacted = WEBHOOK_RE.replace_all(input, "${1}[REDACTED]").to_string();
    redacted = AUTH_HEADER_RE.replace_all(&redacted, "[REDACTED_TOKEN]").to_string();
    redacted = BOT_TOKEN_RE.replace_all(&redacted, "[REDACTED_TOKEN]").to_string();
    redacted
}
