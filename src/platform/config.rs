// SarifLens - platform/config.rs
//
// Platform-specific configuration, config directory resolution, and
// config.toml loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for SarifLens configuration and data.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/sariflens/ or %APPDATA%\SarifLens\)
    pub config_dir: PathBuf,

    /// Data directory.
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
    /// `[filter]` section.
    pub filter: FilterSection,
    /// `[export]` section.
    pub export: ExportSection,
    /// `[settings]` section.
    pub settings: SettingsSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[filter]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FilterSection {
    /// Maximum filter pattern length in characters.
    pub max_pattern_length: Option<usize>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Refuse to export more than this many rows.
    pub max_rows: Option<usize>,
}

/// `[settings]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct SettingsSection {
    /// View settings file path (empty = platform config directory).
    pub file: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Maximum filter pattern length.
    pub max_filter_pattern_len: usize,
    /// Maximum rows per export.
    pub max_export_rows: usize,
    /// Explicit view settings file, if configured.
    pub settings_file: Option<PathBuf>,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_filter_pattern_len: constants::DEFAULT_MAX_FILTER_PATTERN_LEN,
            max_export_rows: constants::DEFAULT_MAX_EXPORT_ROWS,
            settings_file: None,
            log_level: None,
        }
    }
}

impl AppConfig {
    /// View settings file: the configured path, else the platform default.
    pub fn settings_path(&self, paths: &PlatformPaths) -> PathBuf {
        self.settings_file
            .clone()
            .unwrap_or_else(|| paths.config_dir.join(constants::SETTINGS_FILE_NAME))
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unparseable, returns defaults with a warning.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let (config, mut field_warnings) = validate(raw);
    warnings.append(&mut field_warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings = Vec::new();

    // -- Filter: max_pattern_length --
    if let Some(len) = raw.filter.max_pattern_length {
        if (constants::MIN_MAX_FILTER_PATTERN_LEN..=constants::ABSOLUTE_MAX_FILTER_PATTERN_LEN)
            .contains(&len)
        {
            config.max_filter_pattern_len = len;
        } else {
            warnings.push(format!(
                "[filter] max_pattern_length = {len} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_FILTER_PATTERN_LEN,
                constants::ABSOLUTE_MAX_FILTER_PATTERN_LEN,
                constants::DEFAULT_MAX_FILTER_PATTERN_LEN,
            ));
        }
    }

    // -- Export: max_rows --
    if let Some(rows) = raw.export.max_rows {
        if (1..=constants::ABSOLUTE_MAX_EXPORT_ROWS).contains(&rows) {
            config.max_export_rows = rows;
        } else {
            warnings.push(format!(
                "[export] max_rows = {rows} is out of range (1-{}). Using default ({}).",
                constants::ABSOLUTE_MAX_EXPORT_ROWS,
                constants::DEFAULT_MAX_EXPORT_ROWS,
            ));
        }
    }

    // -- Settings: file --
    if let Some(ref file) = raw.settings.file {
        if !file.is_empty() {
            config.settings_file = Some(PathBuf::from(file));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    (config, warnings)
}
