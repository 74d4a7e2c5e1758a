//! Purpose: Accumulate warnings and deprecations for one execution.
//! Exports: `DiagnosticsLog`, `Warning`, `Deprecation`, `SourceRef`.
//! Role: Host-owned execution context; result assembly reads snapshots from it.
//! Invariants: Each sequence is unique by message text and keeps first-insertion order.
//! Invariants: The first occurrence of a message wins; later duplicates never overwrite it.
//! Invariants: Recording never fails; snapshots are detached from later appends.
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value, json};
use tracing::{debug, trace};

/// Opaque handle to the object a diagnostic was raised for.
#[derive(Clone)]
pub struct SourceRef(Arc<dyn Any + Send + Sync>);

impl SourceRef {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SourceRef(..)")
    }
}

#[derive(Clone, Debug)]
pub struct Warning {
    message: String,
    help_text: Option<String>,
    source_ref: Option<SourceRef>,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            help_text: None,
            source_ref: None,
        }
    }

    /// `"{message}: {error}"`, or just the error text when `message` is absent or empty.
    pub fn from_error(message: Option<&str>, error: &dyn fmt::Display) -> Self {
        match message {
            Some(message) if !message.is_empty() => Self::new(format!("{message}: {error}")),
            _ => Self::new(error.to_string()),
        }
    }

    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    pub fn with_source_ref(mut self, source_ref: SourceRef) -> Self {
        self.source_ref = Some(source_ref);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    pub fn source_ref(&self) -> Option<&SourceRef> {
        self.source_ref.as_ref()
    }
}

impl From<&str> for Warning {
    fn from(message: &str) -> Self {
        Warning::new(message)
    }
}

impl From<String> for Warning {
    fn from(message: String) -> Self {
        Warning::new(message)
    }
}

/// A deprecation notice. Set either a version or a date, not both; this is not checked.
#[derive(Clone, Debug)]
pub struct Deprecation {
    msg: String,
    version: Option<String>,
    date: Option<String>,
    collection_name: Option<String>,
    deprecator: Option<SourceRef>,
    help_text: Option<String>,
    source_ref: Option<SourceRef>,
}

impl Deprecation {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            version: None,
            date: None,
            collection_name: None,
            deprecator: None,
            help_text: None,
            source_ref: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// `date` is expected as `YYYY-MM-DD`; the caller validates it.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_collection_name(mut self, collection_name: impl Into<String>) -> Self {
        self.collection_name = Some(collection_name.into());
        self
    }

    /// Opaque handle to the plugin or component that issued the deprecation.
    pub fn with_deprecator(mut self, deprecator: SourceRef) -> Self {
        self.deprecator = Some(deprecator);
        self
    }

    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    pub fn with_source_ref(mut self, source_ref: SourceRef) -> Self {
        self.source_ref = Some(source_ref);
        self
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn collection_name(&self) -> Option<&str> {
        self.collection_name.as_deref()
    }

    pub fn deprecator(&self) -> Option<&SourceRef> {
        self.deprecator.as_ref()
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    pub fn source_ref(&self) -> Option<&SourceRef> {
        self.source_ref.as_ref()
    }

    /// Result-payload shape: `msg` plus whichever optional fields are set.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("msg".to_string(), json!(self.msg));
        if let Some(version) = &self.version {
            map.insert("version".to_string(), json!(version));
        }
        if let Some(date) = &self.date {
            map.insert("date".to_string(), json!(date));
        }
        if let Some(collection_name) = &self.collection_name {
            map.insert("collection_name".to_string(), json!(collection_name));
        }
        map
    }
}

impl From<&str> for Deprecation {
    fn from(msg: &str) -> Self {
        Deprecation::new(msg)
    }
}

impl From<String> for Deprecation {
    fn from(msg: String) -> Self {
        Deprecation::new(msg)
    }
}

#[derive(Debug, Default)]
struct LogState {
    warnings: Vec<Warning>,
    deprecations: Vec<Deprecation>,
}

/// Ordered, deduplicated warnings and deprecations for one execution.
///
/// Hosts running several executions at once keep one log per execution.
#[derive(Debug, Default)]
pub struct DiagnosticsLog {
    state: Mutex<LogState>,
}

impl DiagnosticsLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the warning was new.
    pub fn record_warning(&self, warning: impl Into<Warning>) -> bool {
        let warning = warning.into();
        let mut state = self.state();
        if state
            .warnings
            .iter()
            .any(|existing| existing.message == warning.message)
        {
            trace!(message = %warning.message, "dropped duplicate warning");
            return false;
        }
        debug!(message = %warning.message, "recorded warning");
        state.warnings.push(warning);
        true
    }

    pub fn record_error_as_warning(&self, message: Option<&str>, error: &dyn fmt::Display) -> bool {
        self.record_warning(Warning::from_error(message, error))
    }

    /// Dedup compares `msg` only; version, date and collection are ignored.
    pub fn record_deprecation(&self, deprecation: impl Into<Deprecation>) -> bool {
        let deprecation = deprecation.into();
        let mut state = self.state();
        if state
            .deprecations
            .iter()
            .any(|existing| existing.msg == deprecation.msg)
        {
            trace!(msg = %deprecation.msg, "dropped duplicate deprecation");
            return false;
        }
        debug!(
            msg = %deprecation.msg,
            version = deprecation.version.as_deref(),
            date = deprecation.date.as_deref(),
            collection_name = deprecation.collection_name.as_deref(),
            "recorded deprecation"
        );
        state.deprecations.push(deprecation);
        true
    }

    /// Read-only snapshot of warning messages.
    pub fn warning_messages(&self) -> Arc<[String]> {
        self.state()
            .warnings
            .iter()
            .map(|warning| warning.message.clone())
            .collect()
    }

    /// Read-only snapshot of deprecations in result-payload shape.
    pub fn deprecation_messages(&self) -> Arc<[Map<String, Value>]> {
        self.state()
            .deprecations
            .iter()
            .map(Deprecation::to_map)
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warning_messages().to_vec()
    }

    pub fn deprecations(&self) -> Vec<Map<String, Value>> {
        self.deprecation_messages().to_vec()
    }

    pub fn warning_entries(&self) -> Vec<Warning> {
        self.state().warnings.clone()
    }

    pub fn deprecation_entries(&self) -> Vec<Deprecation> {
        self.state().deprecations.clone()
    }

    pub fn is_empty(&self) -> bool {
        let state = self.state();
        state.warnings.is_empty() && state.deprecations.is_empty()
    }

    // A panic elsewhere must not stop diagnostics from being read or recorded.
    fn state(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
