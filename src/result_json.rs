//! Purpose: Merge accumulated diagnostics into a module result payload.
//! Exports: `diagnostics_json`, `finalize_result`.
//! Role: Result-assembly helper shared by the CLI and embedding hosts.
//! Invariants: `warnings`/`deprecations` appear only when the log has entries.
//! Invariants: Diagnostics a module already placed in its result go through the same dedup.

use serde_json::{Map, Value};

use crate::core::diagnostics::{Deprecation, DiagnosticsLog};

pub fn diagnostics_json(log: &DiagnosticsLog) -> Map<String, Value> {
    let mut map = Map::new();
    let warnings = log.warning_messages();
    if !warnings.is_empty() {
        map.insert("warnings".to_string(), Value::from(warnings.to_vec()));
    }
    let deprecations = log.deprecation_messages();
    if !deprecations.is_empty() {
        let values = deprecations
            .iter()
            .cloned()
            .map(Value::Object)
            .collect::<Vec<_>>();
        map.insert("deprecations".to_string(), Value::Array(values));
    }
    map
}

/// Absorb result-embedded diagnostics into `log`, then rewrite both fields from it.
pub fn finalize_result(result: &mut Map<String, Value>, log: &DiagnosticsLog) {
    match result.remove("warnings") {
        Some(Value::Array(items)) => {
            for item in items {
                log.record_warning(warning_text(item));
            }
        }
        Some(Value::Null) | None => {}
        Some(single) => {
            log.record_warning(warning_text(single));
        }
    }
    match result.remove("deprecations") {
        Some(Value::Array(items)) => {
            for item in items {
                log.record_deprecation(deprecation_from_value(item));
            }
        }
        Some(Value::Null) | None => {}
        Some(single) => {
            log.record_deprecation(deprecation_from_value(single));
        }
    }
    result.extend(diagnostics_json(log));
}

fn warning_text(value: Value) -> String {
    match value {
        Value::String(message) => message,
        other => other.to_string(),
    }
}

fn deprecation_from_value(value: Value) -> Deprecation {
    match value {
        Value::String(msg) => Deprecation::new(msg),
        Value::Object(map) if map.get("msg").is_some_and(Value::is_string) => {
            let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
            let mut entry = Deprecation::new(text("msg").unwrap_or_default());
            if let Some(version) = text("version") {
                entry = entry.with_version(version);
            }
            if let Some(date) = text("date") {
                entry = entry.with_date(date);
            }
            if let Some(collection_name) = text("collection_name") {
                entry = entry.with_collection_name(collection_name);
            }
            entry
        }
        Value::Array(pair) if pair.len() == 2 && pair[0].is_string() => {
            let msg = pair[0].as_str().unwrap_or_default();
            let entry = Deprecation::new(msg);
            match &pair[1] {
                Value::String(version) => entry.with_version(version.clone()),
                Value::Null => entry,
                other => entry.with_version(other.to_string()),
            }
        }
        other => Deprecation::new(other.to_string()),
    }
}
