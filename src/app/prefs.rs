// ConsoleLink - app/prefs.rs
//
// Filter preference persistence: the three include toggles survive restarts.
//
// - Saved atomically (write→temp, rename→final) so a crash during save never
//   corrupts the previous good file.
// - Load errors are silently discarded: a missing, corrupt or incompatible
//   file means all toggles start enabled.
// - The data directory is created on first save.

use crate::core::filter::FilterState;
use crate::platform::fs;
use crate::util::constants::{PREFERENCES_FILE_NAME, PREFERENCES_TEMP_EXTENSION};
use crate::util::error::PrefsError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Version stamp for forward-compatibility checks.
pub const PREFERENCES_VERSION: u32 = 1;

/// On-disk preference snapshot.
#[derive(Debug, Serialize, Deserialize)]
pub struct PreferencesData {
    /// Schema version — must equal `PREFERENCES_VERSION` to be accepted.
    pub version: u32,

    /// Filter toggles.
    #[serde(default)]
    pub filter: PersistedFilter,
}

/// Serialisable form of `FilterState`. Absent flags default to enabled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PersistedFilter {
    #[serde(default = "enabled")]
    pub include_errors: bool,
    #[serde(default = "enabled")]
    pub include_warnings: bool,
    #[serde(default = "enabled")]
    pub include_logs: bool,
}

fn enabled() -> bool {
    true
}

impl Default for PersistedFilter {
    fn default() -> Self {
        FilterState::default().into()
    }
}

impl From<FilterState> for PersistedFilter {
    fn from(f: FilterState) -> Self {
        Self {
            include_errors: f.include_errors,
            include_warnings: f.include_warnings,
            include_logs: f.include_logs,
        }
    }
}

impl From<PersistedFilter> for FilterState {
    fn from(p: PersistedFilter) -> Self {
        Self {
            include_errors: p.include_errors,
            include_warnings: p.include_warnings,
            include_logs: p.include_logs,
        }
    }
}

// =============================================================================
// I/O helpers
// =============================================================================

/// Resolve the preference file path from the platform data directory.
pub fn preferences_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PREFERENCES_FILE_NAME)
}

/// Save `filter` to `path` atomically.
///
/// The caller decides whether to surface the error; a failed save is
/// typically logged and ignored.
pub fn save(filter: FilterState, path: &Path) -> Result<(), PrefsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PrefsError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let data = PreferencesData {
        version: PREFERENCES_VERSION,
        filter: filter.into(),
    };
    let json =
        serde_json::to_string_pretty(&data).map_err(|e| PrefsError::Serialise { source: e })?;

    fs::replace_file(path, json.as_bytes(), PREFERENCES_TEMP_EXTENSION).map_err(|e| {
        PrefsError::Io {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    tracing::debug!(path = %path.display(), ?filter, "Preferences saved");
    Ok(())
}

/// Load the persisted filter from `path`.
///
/// Returns `None` on any error (file not found, JSON parse failure, version
/// mismatch). The caller should treat `None` as "all toggles enabled".
pub fn load(path: &Path) -> Option<FilterState> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %e, "Cannot read preferences");
            }
        })
        .ok()?;

    let data: PreferencesData = serde_json::from_str(&content)
        .map_err(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Preferences file is malformed — using defaults"
            );
        })
        .ok()?;

    if data.version != PREFERENCES_VERSION {
        tracing::warn!(
            found = data.version,
            expected = PREFERENCES_VERSION,
            "Preferences version mismatch — using defaults"
        );
        return None;
    }

    tracing::debug!(path = %path.display(), "Preferences loaded");
    Some(data.filter.into())
}

/// Load the persisted filter, falling back to all toggles enabled.
pub fn load_or_default(path: &Path) -> FilterState {
    load(path).unwrap_or_default()
}
