//! Purpose: Define a stable, structured schema for diagnostic notices on stderr.
//! Exports: `Notice`, `NoticeKind`, `notice_json`, `notices_for`.
//! Role: Shared contract helper for surfacing warnings/deprecations outside the result payload.
//! Invariants: Notices are non-fatal and never alter stdout payloads.
//! Invariants: JSON schema is stable once published; fields are additive-only.
use serde_json::{Map, Value, json};

use crate::core::diagnostics::DiagnosticsLog;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NoticeKind {
    Warning,
    Deprecation,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeKind::Warning => "warning",
            NoticeKind::Deprecation => "deprecation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub time: String,
    pub cmd: String,
    pub message: String,
    pub details: Map<String, Value>,
}

pub fn notice_json(notice: &Notice) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(notice.kind.as_str()));
    inner.insert("time".to_string(), json!(notice.time));
    inner.insert("cmd".to_string(), json!(notice.cmd));
    inner.insert("message".to_string(), json!(notice.message));
    inner.insert("details".to_string(), Value::Object(notice.details.clone()));

    let mut outer = Map::new();
    outer.insert("notice".to_string(), Value::Object(inner));
    Value::Object(outer)
}

/// One notice per log entry: warnings first, then deprecations, each in log order.
pub fn notices_for(log: &DiagnosticsLog, cmd: &str, time: &str) -> Vec<Notice> {
    let mut notices = Vec::new();
    for warning in log.warning_entries() {
        let mut details = Map::new();
        if let Some(help_text) = warning.help_text() {
            details.insert("help_text".to_string(), json!(help_text));
        }
        notices.push(Notice {
            kind: NoticeKind::Warning,
            time: time.to_string(),
            cmd: cmd.to_string(),
            message: warning.message().to_string(),
            details,
        });
    }
    for deprecation in log.deprecation_entries() {
        let mut details = deprecation.to_map();
        details.remove("msg");
        if let Some(help_text) = deprecation.help_text() {
            details.insert("help_text".to_string(), json!(help_text));
        }
        notices.push(Notice {
            kind: NoticeKind::Deprecation,
            time: time.to_string(),
            cmd: cmd.to_string(),
            message: deprecation.msg().to_string(),
            details,
        });
    }
    notices
}
