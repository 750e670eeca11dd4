// ConsoleLink - core/filter.rs
//
// Severity inclusion toggles.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{LogEntry, Severity};
use serde::{Deserialize, Serialize};

/// One of the three user-facing filter toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterCategory {
    Errors,
    Warnings,
    Logs,
}

impl FilterCategory {
    pub fn all() -> &'static [FilterCategory] {
        &[
            FilterCategory::Errors,
            FilterCategory::Warnings,
            FilterCategory::Logs,
        ]
    }

    /// The severity this toggle governs.
    pub fn severity(&self) -> Severity {
        match self {
            FilterCategory::Errors => Severity::Error,
            FilterCategory::Warnings => Severity::Warning,
            FilterCategory::Logs => Severity::Info,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterCategory::Errors => "Errors",
            FilterCategory::Warnings => "Warnings",
            FilterCategory::Logs => "Logs",
        }
    }
}

/// Which severities are included in the rendered output.
///
/// Passed by value into the renderer on every call; there is no hidden shared
/// filter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub include_errors: bool,
    pub include_warnings: bool,
    pub include_logs: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            include_errors: true,
            include_warnings: true,
            include_logs: true,
        }
    }
}

impl FilterState {
    /// Returns true if `severity` passes the filter.
    pub fn includes(&self, severity: Severity) -> bool {
        match severity {
            Severity::Error => self.include_errors,
            Severity::Warning => self.include_warnings,
            Severity::Info => self.include_logs,
        }
    }

    /// Returns true if `entry` passes the filter.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.includes(entry.severity)
    }

    pub fn get(&self, category: FilterCategory) -> bool {
        self.includes(category.severity())
    }

    pub fn set(&mut self, category: FilterCategory, enabled: bool) {
        match category {
            FilterCategory::Errors => self.include_errors = enabled,
            FilterCategory::Warnings => self.include_warnings = enabled,
            FilterCategory::Logs => self.include_logs = enabled,
        }
    }

    /// Flip a toggle, returning its new value.
    pub fn toggle(&mut self, category: FilterCategory) -> bool {
        let enabled = !self.get(category);
        self.set(category, enabled);
        enabled
    }

    /// Returns true if every toggle is off.
    pub fn is_empty(&self) -> bool {
        !self.include_errors && !self.include_warnings && !self.include_logs
    }

    /// Create a quick-filter for errors only.
    pub fn errors_only() -> Self {
        Self {
            include_errors: true,
            include_warnings: false,
            include_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_includes_everything() {
        let filter = FilterState::default();
        for severity in Severity::all() {
            assert!(filter.includes(*severity));
        }
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_toggles_are_independent() {
        let mut filter = FilterState::default();
        assert!(!filter.toggle(FilterCategory::Warnings));
        assert!(filter.includes(Severity::Error));
        assert!(!filter.includes(Severity::Warning));
        assert!(filter.includes(Severity::Info));

        assert!(filter.toggle(FilterCategory::Warnings));
        assert_eq!(filter, FilterState::default());
    }

    #[test]
    fn test_set_all_off_is_empty() {
        let mut filter = FilterState::default();
        for category in FilterCategory::all() {
            filter.set(*category, false);
        }
        assert!(filter.is_empty());
    }

    #[test]
    fn test_errors_only() {
        let filter = FilterState::errors_only();
        assert!(filter.get(FilterCategory::Errors));
        assert!(!filter.get(FilterCategory::Warnings));
        assert!(!filter.get(FilterCategory::Logs));
    }
}
