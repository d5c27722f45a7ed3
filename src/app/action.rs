// SarifLens - app/action.rs
//
// UI-originated intents and the outcome of handling them.
//
// Messages arrive from the UI as JSON objects tagged by `command`, e.g.
// `{"command": "filterApply", "text": "overflow"}`.

use crate::core::model::ColumnKey;
use serde::Deserialize;

/// An intent sent by the results list UI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum UserAction {
    /// Show or hide a column. Persisted.
    ColumnToggle { column: ColumnKey },

    /// Replace the filter text. Transient.
    FilterApply { text: String },

    /// Flip filter case sensitivity. Transient.
    FilterCaseToggle,

    /// Group rows by another column. Persisted.
    GroupChange { column: ColumnKey },

    /// Sort by a column; the current sort column flips direction. Persisted.
    SortChange { column: ColumnKey },

    /// Activate a row: reveal its source location in the editor.
    #[serde(rename_all = "camelCase")]
    RowSelect { result_id: String, run_id: String },
}

impl UserAction {
    /// Decode a UI message.
    pub fn from_json(message: &str) -> Result<UserAction, serde_json::Error> {
        serde_json::from_str(message)
    }
}

/// Which path handling an action took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Written through to the settings source; takes effect when the host
    /// reports the settings change.
    Persisted,

    /// Local state changed and a new projection was pushed to the sink.
    Rebuilt,

    /// The editor was asked to reveal the row's location.
    RevealRequested,

    /// Nothing happened (unchanged value, unknown row, or a failure that
    /// was logged and absorbed).
    Ignored,
}
