// SarifLens - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "SarifLens";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "SarifLens";

/// Current library version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Row construction
// =============================================================================

/// Display and tooltip text for a result that carries no physical location.
pub const NO_LOCATION: &str = "No Location";

/// Separator between run id and result id in a row identity.
pub const ROW_ID_SEPARATOR: &str = "_";

// =============================================================================
// Filter limits
// =============================================================================

/// Default maximum length of a filter pattern in characters.
pub const DEFAULT_MAX_FILTER_PATTERN_LEN: usize = 1_024;

/// Smallest configurable maximum filter pattern length.
pub const MIN_MAX_FILTER_PATTERN_LEN: usize = 16;

/// Hard upper bound on filter pattern length.
pub const ABSOLUTE_MAX_FILTER_PATTERN_LEN: usize = 16 * 1_024;

/// Compiled-size cap passed to the regex builder (bytes).
/// Guards against pathological patterns blowing up memory.
pub const FILTER_REGEX_SIZE_LIMIT: usize = 1024 * 1024; // 1 MB

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in config.toml.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Export
// =============================================================================

/// Default maximum number of rows exported in a single operation.
pub const DEFAULT_MAX_EXPORT_ROWS: usize = 1_000_000;

/// Hard upper bound on the export row cap.
pub const ABSOLUTE_MAX_EXPORT_ROWS: usize = 5_000_000;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Persisted view settings file name (stored in the platform config directory).
pub const SETTINGS_FILE_NAME: &str = "view-settings.toml";
