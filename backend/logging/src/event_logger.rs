//! Session Event Logger
//!
//! Lifecycle events of editing sessions, emitted on the `embed_sessions` target
//! so they can be filtered or routed to the NDJSON file on their own.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

pub const SESSION_EVENTS_TARGET: &str = "embed_sessions";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    Opened { mode: String, invoker_id: u64 },
    Activated { control: String },
    Rejected { control: String, error: String },
    Committed { mode: String, jump_url: String },
    DeliveryFailed { mode: String, error: String },
    Cancelled,
    Expired,
}

impl SessionEvent {
    fn is_failure(&self) -> bool {
        matches!(self, SessionEvent::DeliveryFailed { .. })
    }
}

#[derive(Debug, Serialize)]
pub struct SessionEventEntry {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: SessionEvent,
}

pub struct SessionEventLogger;

impl SessionEventLogger {
    /// Emit one session event. Free text (rejection messages, delivery errors)
    /// is redacted first since it may echo user input.
    pub fn log_event(session_id: &str, mut event: SessionEvent) -> SessionEventEntry {
        match &mut event {
            SessionEvent::Rejected { error, .. } | SessionEvent::DeliveryFailed { error, .. } => {
                *error = redact_sensitive_data(error);
            }
            _ => {}
        }

        let entry = SessionEventEntry {
            session_id: session_id.into(),
            timestamp: Utc::now(),
            event,
        };
        let json = serde_json::to_string(&entry).unwrap_or_default();

        if entry.event.is_failure() {
            warn!(target: SESSION_EVENTS_TARGET, event = %json, "Session event");
        } else {
            info!(target: SESSION_EVENTS_TARGET, event = %json, "Session event");
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_text_is_redacted() {
        let entry = SessionEventLogger::log_event(
            "abc",
            SessionEvent::Rejected {
                control: "title".into(),
                error: "Authorization: Bot MTA1NjQ4MjM0NTY3ODkwMTIz.GhIjKl.abcdefghijklmnopqrstuvwxyz0123456".into(),
            },
        );
        match entry.event {
            SessionEvent::Rejected { error, .. } => assert!(error.contains("[REDACTED_TOKEN]")),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn entry_serializes_with_type_tag() {
        let entry = SessionEventLogger::log_event("abc", SessionEvent::Expired);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "expired");
        assert_eq!(json["session_id"], "abc");
    }
}
