// ConsoleLink - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "ConsoleLink";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "ConsoleLink";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Host protocol
// =============================================================================

/// Message the host emits (at `Log` severity) when its console is cleared.
/// Receiving it empties the store; it is never stored as an entry.
pub const CLEAR_CONSOLE_MARKER: &str = "Clearing console";

// =============================================================================
// Rendering
// =============================================================================

/// Rendered output when no stored entry passes the current filter.
pub const NO_LOGS_MESSAGE: &str = "No logs found for the selected types.";

/// chrono format for block header timestamps (millisecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Hint shown next to a filter toggle whose category has no entries.
pub const NO_ENTRIES_HINT: &str = "No entries of this type";

// =============================================================================
// Output file
// =============================================================================

/// Output directory relative to the project root.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "Assets/src/Editor";

/// Output Markdown file name.
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "UnityEditorConsoleLogs.md";

/// Extension of the sibling temp file used for atomic replacement.
pub const OUTPUT_TEMP_EXTENSION: &str = "md.tmp";

// =============================================================================
// Feed follower limits
// =============================================================================

/// How often the feed follower polls the feed file for new lines (ms).
pub const DEFAULT_FEED_POLL_INTERVAL_MS: u64 = 500;

/// Minimum user-configurable feed poll interval (ms).
pub const MIN_FEED_POLL_INTERVAL_MS: u64 = 100;

/// Maximum user-configurable feed poll interval (ms).
pub const MAX_FEED_POLL_INTERVAL_MS: u64 = 10_000; // 10 s

/// How often the cancel flag is checked within each poll sleep interval (ms).
pub const FEED_CANCEL_CHECK_INTERVAL_MS: u64 = 100;

/// Maximum bytes read from the feed file in one poll tick.
pub const MAX_FEED_READ_BYTES_PER_TICK: usize = 512 * 1_024; // 512 KiB

/// Maximum accumulated size of an incomplete feed line. A feed that never
/// emits a newline past this size has its fragment discarded with a warning.
pub const MAX_FEED_PARTIAL_BYTES: usize = MAX_FEED_READ_BYTES_PER_TICK * 4; // 2 MiB

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a feed line included in debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Filter preference file name (stored in the platform data directory).
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Extension of the sibling temp file used when saving preferences.
pub const PREFERENCES_TEMP_EXTENSION: &str = "json.tmp";
