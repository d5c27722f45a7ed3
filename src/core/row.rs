// SarifLens - core/row.rs
//
// Conversion of raw upstream analysis results into table rows.
// Core layer: pure logic, no I/O.

use crate::core::model::{Cell, Position, ResultLocation, Row, Severity};
use crate::util::constants::NO_LOCATION;
use serde::Deserialize;

/// A single analysis result as supplied by the upstream feed, before it is
/// shaped into display cells.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultRecord {
    pub run_id: String,
    pub result_id: String,
    pub message: String,
    pub rule_id: Option<String>,
    pub rule_name: Option<String>,

    /// Raw SARIF level string ("error", "warning", "note", "none").
    pub level: Option<String>,

    /// Full path of the SARIF log this result was loaded from.
    pub sarif_path: String,

    /// Primary physical location, if the result has one.
    pub location: Option<ResultLocation>,
}

/// Final path component of a path or URI, accepting either separator.
pub fn short_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(path)
}

impl From<&ResultRecord> for Row {
    fn from(record: &ResultRecord) -> Self {
        let severity = Severity::from_level(record.level.as_deref());

        let (result_file, start) = match &record.location {
            Some(loc) => (
                Cell::text(short_name(&loc.uri)).with_tooltip(loc.uri.clone()),
                loc.range.start,
            ),
            None => (
                Cell::text(NO_LOCATION).with_tooltip(NO_LOCATION),
                Position::default(),
            ),
        };

        Row {
            id: Row::make_id(&record.run_id, &record.result_id),
            message: Cell::text(record.message.clone()),
            rule_id: Cell {
                value: record.rule_id.clone(),
                ..Default::default()
            },
            rule_name: Cell {
                value: record.rule_name.clone(),
                ..Default::default()
            },
            severity_level: Cell::severity(severity),
            sarif_file: Cell::text(short_name(&record.sarif_path))
                .with_tooltip(record.sarif_path.clone()),
            result_file,
            result_start_pos: Cell::position(start),
            run_id: Cell::text(record.run_id.clone()),
            result_id: Cell::text(record.result_id.clone()),
            location: record.location.clone(),
        }
    }
}

impl From<ResultRecord> for Row {
    fn from(record: ResultRecord) -> Self {
        Row::from(&record)
    }
}
