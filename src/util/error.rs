// ConsoleLink - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all ConsoleLink operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum ConsoleLinkError {
    /// Markdown file export failed.
    Export(ExportError),

    /// Clipboard write failed.
    Clipboard(ClipboardError),

    /// Host feed could not be read or decoded.
    Feed(FeedError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Filter preferences could not be persisted.
    Prefs(PrefsError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for ConsoleLinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Clipboard(e) => write!(f, "Clipboard error: {e}"),
            Self::Feed(e) => write!(f, "Feed error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Prefs(e) => write!(f, "Preferences error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ConsoleLinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Export(e) => Some(e),
            Self::Clipboard(e) => Some(e),
            Self::Feed(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Prefs(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to writing the Markdown output file.
#[derive(Debug)]
pub enum ExportError {
    /// The output directory could not be created.
    CreateDir { path: PathBuf, source: io::Error },

    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir { path, source } => {
                write!(
                    f,
                    "Cannot create output directory '{}': {source}",
                    path.display()
                )
            }
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for ConsoleLinkError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Clipboard errors
// ---------------------------------------------------------------------------

/// Errors related to the system clipboard.
#[derive(Debug)]
pub enum ClipboardError {
    /// No clipboard is available (headless session, no display server).
    Unavailable { reason: String },

    /// The clipboard rejected the write.
    Write { reason: String },
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => write!(f, "Clipboard unavailable: {reason}"),
            Self::Write { reason } => write!(f, "Clipboard write failed: {reason}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

impl From<ClipboardError> for ConsoleLinkError {
    fn from(e: ClipboardError) -> Self {
        Self::Clipboard(e)
    }
}

// ---------------------------------------------------------------------------
// Feed errors
// ---------------------------------------------------------------------------

/// Errors related to reading and decoding the host event feed.
#[derive(Debug)]
pub enum FeedError {
    /// A feed line looked like JSON but did not decode to a host event.
    Malformed {
        line_number: u64,
        preview: String,
        source: serde_json::Error,
    },

    /// A feed line grew past the partial-line limit before its newline
    /// arrived. The whole line is skipped.
    LineTooLong { line_number: u64, limit: usize },

    /// The feed source could not be opened or read.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed {
                line_number,
                preview,
                source,
            } => write!(
                f,
                "feed line {line_number}: cannot decode '{preview}': {source}"
            ),
            Self::LineTooLong { line_number, limit } => write!(
                f,
                "feed line {line_number}: longer than {limit} bytes, skipped"
            ),
            Self::Io { path, source } => {
                write!(f, "'{}': I/O error: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Malformed { source, .. } => Some(source),
            Self::LineTooLong { .. } => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<FeedError> for ConsoleLinkError {
    fn from(e: FeedError) -> Self {
        Self::Feed(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for ConsoleLinkError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Preference errors
// ---------------------------------------------------------------------------

/// Errors related to persisting the filter preferences.
#[derive(Debug)]
pub enum PrefsError {
    /// The preferences could not be serialised.
    Serialise { source: serde_json::Error },

    /// The data directory could not be created.
    CreateDir { path: PathBuf, source: io::Error },

    /// I/O error writing the preferences file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for PrefsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialise { source } => write!(f, "Cannot serialise preferences: {source}"),
            Self::CreateDir { path, source } => write!(
                f,
                "Cannot create preferences directory '{}': {source}",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "Preferences I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for PrefsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialise { source } => Some(source),
            Self::CreateDir { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<PrefsError> for ConsoleLinkError {
    fn from(e: PrefsError) -> Self {
        Self::Prefs(e)
    }
}

/// Convenience type alias for ConsoleLink results.
pub type Result<T> = std::result::Result<T, ConsoleLinkError>;
