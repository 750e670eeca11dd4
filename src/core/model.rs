// ConsoleLink - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// =============================================================================
// Log Entry
// =============================================================================

/// A single captured console message.
///
/// Entries are immutable once stored; the store only ever appends new ones or
/// drops all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// The log condition text as delivered by the host.
    pub message: String,

    /// Stack trace or extended detail. Empty when the host sent none.
    pub detail: String,

    /// Normalised severity.
    pub severity: Severity,

    /// Capture time on the host clock.
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    pub fn new(
        message: impl Into<String>,
        detail: impl Into<String>,
        severity: Severity,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            message: message.into(),
            detail: detail.into(),
            severity,
            timestamp,
        }
    }

    /// Whether this entry continues a run started by `previous`.
    ///
    /// Only message and severity are compared; a differing detail does not
    /// break the run.
    pub fn continues_run(&self, previous: &LogEntry) -> bool {
        self.severity == previous.severity && self.message == previous.message
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Normalised severity levels, ordered from most to least severe.
///
/// Each variant is governed by exactly one filter toggle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    #[default]
    Info,
}

impl Severity {
    /// Returns all variants in display order (most severe first).
    pub fn all() -> &'static [Severity] {
        &[Severity::Error, Severity::Warning, Severity::Info]
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Info => "Log",
        }
    }

    /// Markdown block heading label.
    pub fn heading_label(&self) -> &'static str {
        match self {
            Severity::Error => "❌ Error",
            Severity::Warning => "⚠️ Warning",
            Severity::Info => "📋 Log",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Host log type
// =============================================================================

/// Severity vocabulary of the host editor, before normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostLogType {
    Error,
    Assert,
    Warning,
    Log,
    Exception,
}

impl From<HostLogType> for Severity {
    fn from(kind: HostLogType) -> Self {
        match kind {
            HostLogType::Error | HostLogType::Exception | HostLogType::Assert => Severity::Error,
            HostLogType::Warning => Severity::Warning,
            HostLogType::Log => Severity::Info,
        }
    }
}

// =============================================================================
// Severity presence
// =============================================================================

/// Which severity categories currently have at least one stored entry.
///
/// Drives the enabled/disabled state of the filter toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeverityPresence {
    pub errors: bool,
    pub warnings: bool,
    pub logs: bool,
}

impl SeverityPresence {
    /// Mark `severity` as present.
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.errors = true,
            Severity::Warning => self.warnings = true,
            Severity::Info => self.logs = true,
        }
    }

    pub fn has(&self, severity: Severity) -> bool {
        match severity {
            Severity::Error => self.errors,
            Severity::Warning => self.warnings,
            Severity::Info => self.logs,
        }
    }
}

// =============================================================================
// Lifecycle transitions
// =============================================================================

/// Run-mode transitions reported by the host editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostTransition {
    EnteredEditMode,
    ExitingEditMode,
    EnteredPlayMode,
    ExitingPlayMode,
}

impl HostTransition {
    /// Transitions on which the console state is flushed to disk: leaving the
    /// editor for a run, and coming back from one.
    pub fn triggers_save(&self) -> bool {
        matches!(
            self,
            HostTransition::ExitingEditMode | HostTransition::EnteredEditMode
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_types_collapse_into_three_severities() {
        assert_eq!(Severity::from(HostLogType::Error), Severity::Error);
        assert_eq!(Severity::from(HostLogType::Exception), Severity::Error);
        assert_eq!(Severity::from(HostLogType::Assert), Severity::Error);
        assert_eq!(Severity::from(HostLogType::Warning), Severity::Warning);
        assert_eq!(Severity::from(HostLogType::Log), Severity::Info);
    }

    #[test]
    fn test_heading_labels() {
        assert_eq!(Severity::Error.heading_label(), "❌ Error");
        assert_eq!(Severity::Warning.heading_label(), "⚠️ Warning");
        assert_eq!(Severity::Info.heading_label(), "📋 Log");
    }

    #[test]
    fn test_run_continuation_ignores_detail() {
        let ts = Local::now();
        let first = LogEntry::new("boom", "trace a", Severity::Error, ts);
        let second = LogEntry::new("boom", "trace b", Severity::Error, ts);
        let warning = LogEntry::new("boom", "trace a", Severity::Warning, ts);
        assert!(second.continues_run(&first));
        assert!(!warning.continues_run(&first));
    }

    #[test]
    fn test_host_log_type_deserialises_lowercase() {
        let kind: HostLogType = serde_json::from_str("\"exception\"").unwrap();
        assert_eq!(kind, HostLogType::Exception);
        let transition: HostTransition = serde_json::from_str("\"exiting_edit_mode\"").unwrap();
        assert!(transition.triggers_save());
        assert!(!HostTransition::EnteredPlayMode.triggers_save());
    }
}
