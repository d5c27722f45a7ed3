// SarifLens - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use serde::{Deserialize, Serialize};

// =============================================================================
// Columns
// =============================================================================

/// Machine key of a row field. The set of keys is fixed; every key names
/// exactly one field of `Row`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ColumnKey {
    Message,
    RuleId,
    RuleName,
    SeverityLevel,
    SarifFile,
    ResultFile,
    ResultStartPos,
    RunId,
    ResultId,
}

impl ColumnKey {
    /// Returns all keys in column display order.
    pub fn all() -> &'static [ColumnKey] {
        &[
            ColumnKey::Message,
            ColumnKey::RuleId,
            ColumnKey::RuleName,
            ColumnKey::SeverityLevel,
            ColumnKey::SarifFile,
            ColumnKey::ResultFile,
            ColumnKey::ResultStartPos,
            ColumnKey::RunId,
            ColumnKey::ResultId,
        ]
    }

    /// Wire name used by the settings source and the UI.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKey::Message => "message",
            ColumnKey::RuleId => "ruleId",
            ColumnKey::RuleName => "ruleName",
            ColumnKey::SeverityLevel => "severityLevel",
            ColumnKey::SarifFile => "sarifFile",
            ColumnKey::ResultFile => "resultFile",
            ColumnKey::ResultStartPos => "resultStartPos",
            ColumnKey::RunId => "runId",
            ColumnKey::ResultId => "resultId",
        }
    }

    /// Parse a wire name. Returns `None` for keys that name no row field.
    pub fn parse(key: &str) -> Option<ColumnKey> {
        ColumnKey::all().iter().copied().find(|k| k.as_str() == key)
    }

    /// Human-readable column title.
    pub fn title(&self) -> &'static str {
        match self {
            ColumnKey::Message => "Message",
            ColumnKey::RuleId => "Rule Id",
            ColumnKey::RuleName => "Rule Name",
            ColumnKey::SeverityLevel => "Severity",
            ColumnKey::SarifFile => "SARIF File",
            ColumnKey::ResultFile => "File",
            ColumnKey::ResultStartPos => "Position",
            ColumnKey::RunId => "Run Id",
            ColumnKey::ResultId => "Result Id",
        }
    }

    /// Tooltip text describing the column.
    pub fn description(&self) -> &'static str {
        match self {
            ColumnKey::Message => "Result message text",
            ColumnKey::RuleId => "Identifier of the rule that produced the result",
            ColumnKey::RuleName => "Name of the rule that produced the result",
            ColumnKey::SeverityLevel => "Severity level of the result",
            ColumnKey::SarifFile => "SARIF log the result was loaded from",
            ColumnKey::ResultFile => "Source file the result points at",
            ColumnKey::ResultStartPos => "Start line and column of the result",
            ColumnKey::RunId => "Run the result belongs to",
            ColumnKey::ResultId => "Index of the result within its run",
        }
    }

    /// Whether this column holds a file whose short display name may collide
    /// across directories. Such columns group by full path (tooltip).
    pub fn is_file(&self) -> bool {
        matches!(self, ColumnKey::SarifFile | ColumnKey::ResultFile)
    }
}

impl std::fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static per-field column metadata plus the current hide flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub key: ColumnKey,
    pub title: &'static str,
    pub description: &'static str,
    pub hide: bool,
}

impl ColumnDescriptor {
    pub fn new(key: ColumnKey, hide: bool) -> Self {
        Self {
            key,
            title: key.title(),
            description: key.description(),
            hide,
        }
    }
}

// =============================================================================
// Severity
// =============================================================================

/// SARIF result levels, ordered from most to least severe.
///
/// The derived `Ord` is the severity rank used for sorting; it is independent
/// of the display strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    #[default]
    Warning,
    Note,
    None,
}

impl Severity {
    /// Returns all variants in rank order (most severe first).
    pub fn all() -> &'static [Severity] {
        &[
            Severity::Error,
            Severity::Warning,
            Severity::Note,
            Severity::None,
        ]
    }

    /// Label as written in SARIF and shown in the table.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::None => "none",
        }
    }

    /// Map a SARIF level string. Unknown or absent levels map to `warning`,
    /// the SARIF default.
    pub fn from_level(level: Option<&str>) -> Severity {
        match level.map(str::trim) {
            Some(raw) => Severity::all()
                .iter()
                .copied()
                .find(|s| s.label().eq_ignore_ascii_case(raw))
                .unwrap_or_default(),
            None => Severity::default(),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Positions and locations
// =============================================================================

/// Zero-based line/column position. Ordered by line, then column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// One-based `(line, column)` display form.
    pub fn display(&self) -> String {
        format!("({}, {})", self.line + 1, self.column + 1)
    }
}

/// Zero-based start/end range within a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// Physical location a result points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultLocation {
    pub uri: String,
    pub range: Range,
}

// =============================================================================
// Cells
// =============================================================================

/// How a cell compares when sorted. Carries the typed key for cells whose
/// display string does not order correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellKind {
    /// Compare by display string: numeric displays first, by value.
    #[default]
    Plain,
    /// Compare by line, then column.
    Position(Position),
    /// Compare by severity rank.
    Severity(Severity),
}

/// One table cell: display string, optional tooltip, and sort kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Cell {
    /// Display string. `None` is an undefined value that sorts first.
    pub value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,

    #[serde(skip)]
    pub kind: CellKind,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn position(pos: Position) -> Self {
        Self {
            value: Some(pos.display()),
            tooltip: None,
            kind: CellKind::Position(pos),
        }
    }

    pub fn severity(severity: Severity) -> Self {
        Self {
            value: Some(severity.label().to_string()),
            tooltip: None,
            kind: CellKind::Severity(severity),
        }
    }

    /// Display string, or "" for an undefined value.
    pub fn display(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Row
// =============================================================================

/// One analysis result rendered as a table record.
///
/// Identity is `runId + "_" + resultId`, held in `id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: String,
    pub message: Cell,
    pub rule_id: Cell,
    pub rule_name: Cell,
    pub severity_level: Cell,
    pub sarif_file: Cell,
    pub result_file: Cell,
    pub result_start_pos: Cell,
    pub run_id: Cell,
    pub result_id: Cell,

    /// Where activating this row should navigate. Not a column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ResultLocation>,
}

impl Row {
    /// Compose a row identity from its run and result ids.
    pub fn make_id(run_id: &str, result_id: &str) -> String {
        format!(
            "{run_id}{}{result_id}",
            crate::util::constants::ROW_ID_SEPARATOR
        )
    }

    /// Borrow the cell for a column.
    pub fn cell(&self, key: ColumnKey) -> &Cell {
        match key {
            ColumnKey::Message => &self.message,
            ColumnKey::RuleId => &self.rule_id,
            ColumnKey::RuleName => &self.rule_name,
            ColumnKey::SeverityLevel => &self.severity_level,
            ColumnKey::SarifFile => &self.sarif_file,
            ColumnKey::ResultFile => &self.result_file,
            ColumnKey::ResultStartPos => &self.result_start_pos,
            ColumnKey::RunId => &self.run_id,
            ColumnKey::ResultId => &self.result_id,
        }
    }
}

// =============================================================================
// View state carried in the projection
// =============================================================================

/// Transient filter settings. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Filter pattern. Empty = no filtering.
    pub text: String,

    pub case_sensitive: bool,

    /// Compile error for the current text, if any. While set, no rows pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Active single-column sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub column: ColumnKey,
    pub ascending: bool,
}

impl SortState {
    pub fn ascending(column: ColumnKey) -> Self {
        Self {
            column,
            ascending: true,
        }
    }
}

// =============================================================================
// Projection (output to the UI)
// =============================================================================

/// Rows sharing one grouping key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Label shown for the group (display value of the group-by field).
    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,

    pub rows: Vec<Row>,
}

/// The filtered, grouped and sorted view materialised for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub columns: Vec<ColumnDescriptor>,
    pub filter_state: FilterState,
    pub group_by: ColumnKey,

    /// `None` when the persisted sort setting was unusable; rows then keep
    /// encounter order.
    pub sort_state: Option<SortState>,

    /// Total rows in the store, not the filtered count.
    pub result_count: usize,

    pub groups: Vec<Group>,
}

impl Projection {
    /// Number of rows across all groups (rows passing the filter).
    pub fn visible_row_count(&self) -> usize {
        self.groups.iter().map(|g| g.rows.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_key_round_trips_wire_name() {
        for key in ColumnKey::all() {
            assert_eq!(ColumnKey::parse(key.as_str()), Some(*key));
            let json = serde_json::to_string(key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
        assert_eq!(ColumnKey::parse("bogus"), None);
    }

    #[test]
    fn test_severity_rank_is_not_alphabetical() {
        assert!(Severity::Error < Severity::Warning);
        assert!(Severity::Warning < Severity::Note);
        assert!(Severity::Note < Severity::None);
        // Alphabetically "note" < "warning", rank says otherwise.
        assert!(Severity::Warning < Severity::Note);
    }

    #[test]
    fn test_severity_from_level() {
        assert_eq!(Severity::from_level(Some("error")), Severity::Error);
        assert_eq!(Severity::from_level(Some("NOTE")), Severity::Note);
        assert_eq!(Severity::from_level(Some("bogus")), Severity::Warning);
        assert_eq!(Severity::from_level(None), Severity::Warning);
    }

    #[test]
    fn test_position_display_is_one_based() {
        assert_eq!(Position::new(0, 0).display(), "(1, 1)");
        assert_eq!(Position::new(1, 4).display(), "(2, 5)");
    }

    #[test]
    fn test_cell_serialises_without_kind() {
        let cell = Cell::position(Position::new(2, 3));
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json, serde_json::json!({ "value": "(3, 4)" }));
    }
}
