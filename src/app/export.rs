// ConsoleLink - app/export.rs
//
// Export sink: persists the rendered Markdown to the output file and copies it
// to the clipboard.
//
// File writes are change-suppressed: content byte-identical to the last
// successful write is skipped, so downstream file watchers only fire on real
// changes. A failed write leaves the cache untouched; the next state change
// retries.

use crate::platform::clipboard::ClipboardWriter;
use crate::platform::fs;
use crate::util::constants::OUTPUT_TEMP_EXTENSION;
use crate::util::error::{ClipboardError, ExportError};
use std::path::{Path, PathBuf};

/// Result of a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The file was rewritten with `bytes` bytes.
    Written { bytes: usize },
    /// Content matched the last write; nothing touched.
    Unchanged,
    /// Auto-save is disabled; the change waits for an explicit save.
    Deferred,
}

impl SaveOutcome {
    pub fn wrote(&self) -> bool {
        matches!(self, SaveOutcome::Written { .. })
    }
}

/// Owner of the output file path and the last-saved cache.
#[derive(Debug)]
pub struct ExportSink {
    path: PathBuf,
    last_saved: String,
    write_count: u64,
}

impl ExportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_saved: String::new(),
            write_count: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Content of the last successful write (empty before the first one).
    pub fn last_saved(&self) -> &str {
        &self.last_saved
    }

    /// Number of successful file writes performed by this sink.
    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    /// Write `content` to the output file unless it equals the last write.
    ///
    /// The parent directory is created on demand and the file is replaced in
    /// full, never appended.
    pub fn persist(&mut self, content: &str) -> Result<SaveOutcome, ExportError> {
        if content == self.last_saved {
            tracing::trace!(path = %self.path.display(), "Output unchanged; skipping write");
            return Ok(SaveOutcome::Unchanged);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ExportError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::replace_file(&self.path, content.as_bytes(), OUTPUT_TEMP_EXTENSION).map_err(|e| {
            ExportError::Io {
                path: self.path.clone(),
                source: e,
            }
        })?;

        self.last_saved = content.to_string();
        self.write_count += 1;

        tracing::debug!(
            path = %self.path.display(),
            bytes = content.len(),
            "Console output written"
        );
        Ok(SaveOutcome::Written {
            bytes: content.len(),
        })
    }

    /// Copy `content` to `clipboard`.
    ///
    /// Returns `Ok(false)` without touching the clipboard when `content` is
    /// empty.
    pub fn copy_to<C: ClipboardWriter + ?Sized>(
        &self,
        clipboard: &mut C,
        content: &str,
    ) -> Result<bool, ClipboardError> {
        if content.is_empty() {
            return Ok(false);
        }
        clipboard.set_text(content)?;
        tracing::info!(bytes = content.len(), "Console output copied to clipboard");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::clipboard::MemoryClipboard;
    use tempfile::TempDir;

    #[test]
    fn test_first_persist_writes_and_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Assets").join("Editor").join("out.md");
        let mut sink = ExportSink::new(&path);

        let outcome = sink.persist("hello").unwrap();
        assert_eq!(outcome, SaveOutcome::Written { bytes: 5 });
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
        assert_eq!(sink.last_saved(), "hello");
        assert_eq!(sink.write_count(), 1);
    }

    #[test]
    fn test_identical_content_is_written_once() {
        let dir = TempDir::new().unwrap();
        let mut sink = ExportSink::new(dir.path().join("out.md"));

        assert!(sink.persist("same").unwrap().wrote());
        assert_eq!(sink.persist("same").unwrap(), SaveOutcome::Unchanged);
        assert_eq!(sink.write_count(), 1);

        assert!(sink.persist("different").unwrap().wrote());
        assert_eq!(sink.write_count(), 2);
    }

    #[test]
    fn test_unchanged_content_does_not_restore_external_edits() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.md");
        let mut sink = ExportSink::new(&path);

        sink.persist("ours").unwrap();
        std::fs::write(&path, "edited elsewhere").unwrap();
        sink.persist("ours").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "edited elsewhere");
    }

    #[test]
    fn test_failed_write_keeps_cache_and_retries() {
        let dir = TempDir::new().unwrap();
        // A regular file where the output directory should be.
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "not a directory").unwrap();
        let mut sink = ExportSink::new(blocker.join("out.md"));

        let err = sink.persist("content").unwrap_err();
        assert!(matches!(err, ExportError::CreateDir { .. }), "got {err:?}");
        assert_eq!(sink.last_saved(), "");
        assert_eq!(sink.write_count(), 0);

        std::fs::remove_file(&blocker).unwrap();
        assert!(sink.persist("content").unwrap().wrote());
        assert_eq!(sink.write_count(), 1);
    }

    #[test]
    fn test_copy_skips_empty_content() {
        let sink = ExportSink::new("unused.md");
        let mut clipboard = MemoryClipboard::new();

        assert!(!sink.copy_to(&mut clipboard, "").unwrap());
        assert!(clipboard.writes.is_empty());

        assert!(sink.copy_to(&mut clipboard, "text").unwrap());
        assert_eq!(clipboard.last(), Some("text"));
    }
}
