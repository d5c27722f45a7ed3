// SarifLens - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.
//
// None of these escape the engine's public operations for recoverable
// conditions: they are logged and absorbed at the boundary closest to
// their cause. They are returned by the settings store, export functions,
// and host-implemented collaborator traits. The config loader reports
// problems as warnings and never fails.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all SarifLens operations.
#[derive(Debug)]
pub enum SarifLensError {
    /// Filter pattern compilation failed.
    Filter(FilterError),

    /// Persisted view settings could not be read or written.
    Settings(SettingsError),

    /// Revealing a result location in the editor failed.
    Reveal(RevealError),

    /// Export operation failed.
    Export(ExportError),
}

impl fmt::Display for SarifLensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Settings(e) => write!(f, "Settings error: {e}"),
            Self::Reveal(e) => write!(f, "Reveal error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
        }
    }
}

impl std::error::Error for SarifLensError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Filter(e) => Some(e),
            Self::Settings(e) => Some(e),
            Self::Reveal(e) => Some(e),
            Self::Export(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors related to compiling the filter text.
#[derive(Debug)]
pub enum FilterError {
    /// User-provided pattern is not a valid regular expression.
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    /// Pattern exceeds the configured maximum length.
    PatternTooLong { length: usize, max_length: usize },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPattern { pattern, source } => {
                write!(f, "Invalid filter pattern '{pattern}': {source}")
            }
            Self::PatternTooLong { length, max_length } => write!(
                f,
                "Filter pattern is {length} chars, exceeds maximum of {max_length}"
            ),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPattern { source, .. } => Some(source),
            Self::PatternTooLong { .. } => None,
        }
    }
}

impl From<FilterError> for SarifLensError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Settings errors
// ---------------------------------------------------------------------------

/// Errors raised by a settings source when reading or writing view settings.
#[derive(Debug)]
pub enum SettingsError {
    /// I/O error reading or writing the settings file.
    Io { path: PathBuf, source: io::Error },

    /// The settings file is not valid TOML for the expected shape.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// The settings could not be serialised.
    TomlSerialize { source: toml::ser::Error },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Settings I/O error '{}': {source}", path.display())
            }
            Self::TomlParse { path, source } => {
                write!(f, "Failed to parse settings '{}': {source}", path.display())
            }
            Self::TomlSerialize { source } => {
                write!(f, "Failed to serialise settings: {source}")
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::TomlParse { source, .. } => Some(source),
            Self::TomlSerialize { source } => Some(source),
        }
    }
}

impl From<SettingsError> for SarifLensError {
    fn from(e: SettingsError) -> Self {
        Self::Settings(e)
    }
}

// ---------------------------------------------------------------------------
// Reveal errors
// ---------------------------------------------------------------------------

/// Errors from resolving or revealing a result's source location.
#[derive(Debug)]
pub enum RevealError {
    /// The selected row has no physical location to reveal.
    NoLocation { row_id: String },

    /// The location's file could not be found or the user declined to remap it.
    Unresolved { uri: String, reason: String },

    /// The editor refused or failed to open the location.
    Editor { reason: String },
}

impl fmt::Display for RevealError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLocation { row_id } => {
                write!(f, "Result '{row_id}' has no location to reveal")
            }
            Self::Unresolved { uri, reason } => {
                write!(f, "Cannot resolve '{uri}': {reason}")
            }
            Self::Editor { reason } => write!(f, "Editor failed to reveal location: {reason}"),
        }
    }
}

impl std::error::Error for RevealError {}

impl From<RevealError> for SarifLensError {
    fn from(e: RevealError) -> Self {
        Self::Reveal(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Export would exceed maximum row count.
    TooManyRows { count: usize, max: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::TooManyRows { count, max } => write!(
                f,
                "Export of {count} rows exceeds maximum of {max}. \
                 Apply a filter to reduce the result set."
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::TooManyRows { .. } => None,
        }
    }
}

impl From<ExportError> for SarifLensError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

/// Convenience type alias for SarifLens results.
pub type Result<T> = std::result::Result<T, SarifLensError>;
