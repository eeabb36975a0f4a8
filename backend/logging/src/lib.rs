//! Structured logging for the embed tool.
//!
//! Console output, optional rolling NDJSON files, secret redaction and the
//! `embed_sessions` event stream.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{SessionEvent, SessionEventEntry, SessionEventLogger};
pub use logger::{LoggerOptions, init_logger};
pub use redact::redact_sensitive_data;
