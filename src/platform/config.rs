// ConsoleLink - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for ConsoleLink data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/consolelink/ or %APPDATA%\ConsoleLink\config\)
    pub config_dir: PathBuf,

    /// Data directory for persisted filter preferences.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[output]` section.
    pub output: OutputSection,
    /// `[feed]` section.
    pub feed: FeedSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[output]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Markdown output path, relative to the project root unless absolute.
    pub file: Option<String>,
    /// Rewrite the output on every state change.
    pub auto_save: Option<bool>,
}

/// `[feed]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FeedSection {
    /// Poll interval when following a feed file (ms).
    pub poll_interval_ms: Option<u64>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Output path override (project-relative unless absolute).
    pub output_file: Option<PathBuf>,
    /// Write the output file on every state change, not only on explicit
    /// saves and lifecycle transitions.
    pub auto_save: bool,
    /// Feed follower poll interval.
    pub feed_poll_interval_ms: u64,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_file: None,
            auto_save: true,
            feed_poll_interval_ms: constants::DEFAULT_FEED_POLL_INTERVAL_MS,
            log_level: None,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Resolve the Markdown output path for `project_root`.
    pub fn output_path(&self, project_root: &Path) -> PathBuf {
        match &self.output_file {
            Some(file) => project_root.join(file),
            None => project_root
                .join(constants::DEFAULT_OUTPUT_SUBDIR)
                .join(constants::DEFAULT_OUTPUT_FILE_NAME),
        }
    }
}

/// Load and validate `config.toml` at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal problems.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults and the error;
/// the application still starts but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<ConfigError>) {
    let mut warnings: Vec<ConfigError> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            warnings.push(ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            });
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            warnings.push(ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            });
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let mut config = AppConfig::default();

    // -- Output --
    if let Some(ref file) = raw.output.file {
        if file.trim().is_empty() {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "[output] file".to_string(),
                value: file.clone(),
                expected: "a non-empty path".to_string(),
            });
        } else {
            config.output_file = Some(PathBuf::from(file));
        }
    }
    if let Some(auto_save) = raw.output.auto_save {
        config.auto_save = auto_save;
    }

    // -- Feed: poll_interval_ms --
    if let Some(ms) = raw.feed.poll_interval_ms {
        if (constants::MIN_FEED_POLL_INTERVAL_MS..=constants::MAX_FEED_POLL_INTERVAL_MS)
            .contains(&ms)
        {
            config.feed_poll_interval_ms = ms;
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "[feed] poll_interval_ms".to_string(),
                value: ms.to_string(),
                expected: format!(
                    "{}-{} (default {})",
                    constants::MIN_FEED_POLL_INTERVAL_MS,
                    constants::MAX_FEED_POLL_INTERVAL_MS,
                    constants::DEFAULT_FEED_POLL_INTERVAL_MS,
                ),
            });
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "[logging] level".to_string(),
                value: level.clone(),
                expected: "error, warn, info, debug, trace".to_string(),
            });
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    (config, warnings)
}
