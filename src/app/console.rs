// ConsoleLink - app/console.rs
//
// The console session: owns the store, the filter toggles and the export
// sink, and applies host events to them.
//
// Single-threaded by construction: every method takes `&mut self`, and the
// feed readers only hand events over a channel. Any state change (new entry,
// toggle, clear) re-renders and persists the output when auto-save is on;
// explicit saves, lifecycle transitions and shutdown always persist.

use crate::app::export::{ExportSink, SaveOutcome};
use crate::app::feed::HostEvent;
use crate::app::prefs;
use crate::core::filter::{FilterCategory, FilterState};
use crate::core::markdown;
use crate::core::model::{HostLogType, HostTransition, LogEntry, Severity, SeverityPresence};
use crate::core::store::LogStore;
use crate::platform::clipboard::ClipboardWriter;
use crate::util::constants::{CLEAR_CONSOLE_MARKER, NO_ENTRIES_HINT};
use crate::util::error::{ClipboardError, ConsoleLinkError, ExportError};
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// What the host loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console<C: ClipboardWriter> {
    store: LogStore,
    filter: FilterState,
    sink: ExportSink,
    clipboard: C,
    /// Where toggle changes are persisted. `None` keeps them in memory only.
    prefs_path: Option<PathBuf>,
    auto_save: bool,
}

impl<C: ClipboardWriter> Console<C> {
    /// Create an empty console writing to `sink`.
    pub fn new(sink: ExportSink, clipboard: C, filter: FilterState) -> Self {
        Self {
            store: LogStore::new(),
            filter,
            sink,
            clipboard,
            prefs_path: None,
            auto_save: true,
        }
    }

    /// Persist toggle changes to `path`.
    pub fn with_preferences(mut self, path: PathBuf) -> Self {
        self.prefs_path = Some(path);
        self
    }

    pub fn with_auto_save(mut self, auto_save: bool) -> Self {
        self.auto_save = auto_save;
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn entries(&self) -> &[LogEntry] {
        self.store.snapshot()
    }

    pub fn filter(&self) -> FilterState {
        self.filter
    }

    pub fn sink(&self) -> &ExportSink {
        &self.sink
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Which toggles have entries behind them.
    pub fn presence(&self) -> SeverityPresence {
        self.store.presence()
    }

    /// Tooltip for a toggle: empty when the category has entries.
    pub fn toggle_hint(&self, category: FilterCategory) -> &'static str {
        if self.presence().has(category.severity()) {
            ""
        } else {
            NO_ENTRIES_HINT
        }
    }

    /// Current rendered output.
    pub fn rendered(&self) -> String {
        markdown::render(self.store.snapshot(), self.filter)
    }

    // -------------------------------------------------------------------------
    // Host inbound interface
    // -------------------------------------------------------------------------

    /// Receive one host log message, stamped now.
    pub fn on_log_event(
        &mut self,
        message: &str,
        detail: &str,
        kind: HostLogType,
    ) -> Result<SaveOutcome, ExportError> {
        self.on_log_event_at(message, detail, kind, Local::now())
    }

    /// Receive one host log message captured at `timestamp`.
    ///
    /// The clear-console marker at `Log` severity clears the store instead of
    /// being stored.
    pub fn on_log_event_at(
        &mut self,
        message: &str,
        detail: &str,
        kind: HostLogType,
        timestamp: DateTime<Local>,
    ) -> Result<SaveOutcome, ExportError> {
        if kind == HostLogType::Log && message == CLEAR_CONSOLE_MARKER {
            tracing::debug!("Host console cleared");
            return self.clear();
        }

        let severity = Severity::from(kind);
        self.store
            .append(LogEntry::new(message, detail, severity, timestamp));
        tracing::trace!(%severity, entries = self.store.len(), "Entry captured");
        self.state_changed()
    }

    /// Drop all entries.
    pub fn clear(&mut self) -> Result<SaveOutcome, ExportError> {
        let dropped = self.store.len();
        self.store.clear();
        tracing::info!(dropped, "Console cleared");
        self.state_changed()
    }

    // -------------------------------------------------------------------------
    // Filter toggles
    // -------------------------------------------------------------------------

    /// Flip one toggle.
    pub fn toggle(&mut self, category: FilterCategory) -> Result<SaveOutcome, ExportError> {
        let enabled = !self.filter.get(category);
        self.set_filter(category, enabled)
    }

    /// Set one toggle. The new filter is persisted to the preference file.
    pub fn set_filter(
        &mut self,
        category: FilterCategory,
        enabled: bool,
    ) -> Result<SaveOutcome, ExportError> {
        self.filter.set(category, enabled);
        tracing::info!(category = category.label(), enabled, "Filter changed");

        if let Some(path) = &self.prefs_path {
            if let Err(e) = prefs::save(self.filter, path) {
                tracing::warn!(error = %e, "Could not persist filter preferences");
            }
        }
        self.state_changed()
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    /// Re-render and write the output file if it changed.
    pub fn save(&mut self) -> Result<SaveOutcome, ExportError> {
        let content = self.rendered();
        self.sink.persist(&content)
    }

    /// Copy the rendered output to the clipboard.
    pub fn copy_to_clipboard(&mut self) -> Result<bool, ClipboardError> {
        let content = self.rendered();
        self.sink.copy_to(&mut self.clipboard, &content)
    }

    /// React to a run-mode transition.
    pub fn on_transition(&mut self, transition: HostTransition) -> Result<SaveOutcome, ExportError> {
        if transition.triggers_save() {
            tracing::debug!(?transition, "Saving on lifecycle transition");
            self.save()
        } else {
            Ok(SaveOutcome::Unchanged)
        }
    }

    /// Final flush before the host exits.
    pub fn shutdown(&mut self) -> Result<SaveOutcome, ExportError> {
        tracing::info!(entries = self.store.len(), "Console shutting down");
        self.save()
    }

    fn state_changed(&mut self) -> Result<SaveOutcome, ExportError> {
        if self.auto_save {
            self.save()
        } else {
            Ok(SaveOutcome::Deferred)
        }
    }

    // -------------------------------------------------------------------------
    // Event dispatch
    // -------------------------------------------------------------------------

    /// Apply one decoded host event.
    ///
    /// `Quit` performs the shutdown save and asks the caller to stop.
    pub fn apply(&mut self, event: HostEvent) -> Result<Flow, ConsoleLinkError> {
        match event {
            HostEvent::Log {
                message,
                detail,
                severity,
                timestamp,
            } => {
                let detail = detail.unwrap_or_default();
                let timestamp = timestamp.unwrap_or_else(Local::now);
                self.on_log_event_at(&message, &detail, severity, timestamp)?;
            }
            HostEvent::Toggle { category } => {
                self.toggle(category)?;
            }
            HostEvent::SetFilter { category, enabled } => {
                self.set_filter(category, enabled)?;
            }
            HostEvent::Save => {
                let outcome = self.save()?;
                tracing::info!(
                    path = %self.sink.path().display(),
                    written = outcome.wrote(),
                    "Save requested"
                );
            }
            HostEvent::Copy => {
                self.copy_to_clipboard()?;
            }
            HostEvent::Clear => {
                self.clear()?;
            }
            HostEvent::Transition { state } => {
                self.on_transition(state)?;
            }
            HostEvent::Quit => {
                self.shutdown()?;
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::clipboard::MemoryClipboard;
    use crate::util::constants::NO_LOGS_MESSAGE;
    use tempfile::TempDir;

    fn console(dir: &TempDir) -> Console<MemoryClipboard> {
        Console::new(
            ExportSink::new(dir.path().join("out.md")),
            MemoryClipboard::new(),
            FilterState::default(),
        )
    }

    fn output(dir: &TempDir) -> String {
        std::fs::read_to_string(dir.path().join("out.md")).unwrap()
    }

    #[test]
    fn test_new_entry_is_persisted() {
        let dir = TempDir::new().unwrap();
        let mut console = console(&dir);

        let outcome = console
            .on_log_event("Player spawned", "", HostLogType::Log)
            .unwrap();
        assert!(outcome.wrote());
        assert!(output(&dir).contains("Player spawned"));
    }

    #[test]
    fn test_clear_marker_clears_and_is_not_stored() {
        let dir = TempDir::new().unwrap();
        let mut console = console(&dir);
        console.on_log_event("a", "", HostLogType::Error).unwrap();
        console.on_log_event("b", "", HostLogType::Warning).unwrap();

        console
            .on_log_event(CLEAR_CONSOLE_MARKER, "", HostLogType::Log)
            .unwrap();

        assert!(console.entries().is_empty());
        assert_eq!(console.rendered(), NO_LOGS_MESSAGE);
        assert_eq!(output(&dir), NO_LOGS_MESSAGE);
    }

    #[test]
    fn test_clear_marker_at_other_severity_is_stored() {
        let dir = TempDir::new().unwrap();
        let mut console = console(&dir);
        console
            .on_log_event(CLEAR_CONSOLE_MARKER, "", HostLogType::Warning)
            .unwrap();
        assert_eq!(console.entries().len(), 1);
    }

    #[test]
    fn test_save_twice_writes_once() {
        let dir = TempDir::new().unwrap();
        let mut console = console(&dir).with_auto_save(false);
        console.on_log_event("x", "", HostLogType::Log).unwrap();

        assert!(console.save().unwrap().wrote());
        assert_eq!(console.save().unwrap(), SaveOutcome::Unchanged);
        assert_eq!(console.sink().write_count(), 1);
    }

    #[test]
    fn test_auto_save_disabled_defers_writes() {
        let dir = TempDir::new().unwrap();
        let mut console = console(&dir).with_auto_save(false);

        let outcome = console.on_log_event("x", "", HostLogType::Log).unwrap();
        assert_eq!(outcome, SaveOutcome::Deferred);
        assert!(!dir.path().join("out.md").exists());

        console
            .on_transition(HostTransition::ExitingEditMode)
            .unwrap();
        assert!(output(&dir).contains("\nx\n"));
    }

    #[test]
    fn test_only_edit_mode_transitions_save() {
        let dir = TempDir::new().unwrap();
        let mut console = console(&dir).with_auto_save(false);
        console.on_log_event("x", "", HostLogType::Log).unwrap();

        console.on_transition(HostTransition::EnteredPlayMode).unwrap();
        console.on_transition(HostTransition::ExitingPlayMode).unwrap();
        assert_eq!(console.sink().write_count(), 0);

        console.on_transition(HostTransition::EnteredEditMode).unwrap();
        assert_eq!(console.sink().write_count(), 1);
    }

    #[test]
    fn test_toggle_rerenders_and_persists_preferences() {
        let dir = TempDir::new().unwrap();
        let prefs_path = dir.path().join("prefs.json");
        let mut console = console(&dir).with_preferences(prefs_path.clone());
        console.on_log_event("e", "", HostLogType::Error).unwrap();
        console.on_log_event("w", "", HostLogType::Warning).unwrap();

        console.toggle(FilterCategory::Errors).unwrap();

        assert!(!console.filter().include_errors);
        let written = output(&dir);
        assert!(!written.contains("\ne\n"));
        assert!(written.contains("\nw\n"));
        assert_eq!(prefs::load(&prefs_path), Some(console.filter()));
    }

    #[test]
    fn test_copy_uses_rendered_output() {
        let dir = TempDir::new().unwrap();
        let mut console = console(&dir);
        console.on_log_event("copied", "", HostLogType::Log).unwrap();

        assert!(console.copy_to_clipboard().unwrap());
        assert_eq!(console.clipboard().last(), Some(console.rendered().as_str()));
    }

    #[test]
    fn test_presence_and_hints() {
        let dir = TempDir::new().unwrap();
        let mut console = console(&dir);
        console.on_log_event("boom", "", HostLogType::Exception).unwrap();

        assert!(console.presence().errors);
        assert_eq!(console.toggle_hint(FilterCategory::Errors), "");
        assert_eq!(console.toggle_hint(FilterCategory::Logs), NO_ENTRIES_HINT);
    }

    #[test]
    fn test_apply_dispatches_events() {
        let dir = TempDir::new().unwrap();
        let mut console = console(&dir);

        let flow = console
            .apply(HostEvent::Log {
                message: "from feed".to_string(),
                detail: Some("trace".to_string()),
                severity: HostLogType::Assert,
                timestamp: None,
            })
            .unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(console.entries()[0].severity, Severity::Error);
        assert_eq!(console.entries()[0].detail, "trace");

        console
            .apply(HostEvent::SetFilter {
                category: FilterCategory::Errors,
                enabled: false,
            })
            .unwrap();
        assert_eq!(output(&dir), NO_LOGS_MESSAGE);

        console.apply(HostEvent::Copy).unwrap();
        assert_eq!(console.clipboard().last(), Some(NO_LOGS_MESSAGE));

        assert_eq!(console.apply(HostEvent::Quit).unwrap(), Flow::Quit);
    }

    #[test]
    fn test_write_failure_is_reported_and_entry_kept() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "file").unwrap();
        let mut console = Console::new(
            ExportSink::new(blocker.join("out.md")),
            MemoryClipboard::new(),
            FilterState::default(),
        );

        let result = console.on_log_event("kept", "", HostLogType::Log);
        assert!(result.is_err());
        assert_eq!(console.entries().len(), 1);
        assert_eq!(console.sink().last_saved(), "");
    }
}
