// ConsoleLink - platform/clipboard.rs
//
// System clipboard access behind a small trait so the console can be driven
// with a recording double in tests and headless environments.

use crate::util::error::ClipboardError;

/// Destination for "copy to clipboard" requests.
pub trait ClipboardWriter {
    /// Replace the clipboard contents with `text`.
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The platform clipboard, opened lazily on first use.
///
/// On X11 and Wayland the copied text is served by this process, so it is
/// only available to other applications while the process is alive.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(|e| {
                ClipboardError::Unavailable {
                    reason: e.to_string(),
                }
            })?;
            self.inner = Some(clipboard);
        }

        let Some(clipboard) = self.inner.as_mut() else {
            return Err(ClipboardError::Unavailable {
                reason: "clipboard not initialised".to_string(),
            });
        };

        clipboard
            .set_text(text.to_owned())
            .map_err(|e| ClipboardError::Write {
                reason: e.to_string(),
            })?;

        tracing::debug!(bytes = text.len(), "Clipboard updated");
        Ok(())
    }
}

/// Clipboard double that records every write, for tests and for hosts that
/// capture the copied text themselves.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub writes: Vec<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently copied text.
    pub fn last(&self) -> Option<&str> {
        self.writes.last().map(String::as_str)
    }
}

impl ClipboardWriter for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.writes.push(text.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_records_writes() {
        let mut clipboard = MemoryClipboard::new();
        assert!(clipboard.last().is_none());
        clipboard.set_text("one").unwrap();
        clipboard.set_text("two").unwrap();
        assert_eq!(clipboard.writes.len(), 2);
        assert_eq!(clipboard.last(), Some("two"));
    }
}
