// SarifLens - core/view.rs
//
// View settings: hidden columns, group-by key, sort-by key/direction.
//
// Values arrive from an external settings source as a raw snapshot (column
// keys as plain strings) and are validated here. Reconciling a snapshot only
// reports what changed; deciding whether to rebuild the projection is the
// caller's job.

use crate::core::model::{ColumnDescriptor, ColumnKey, SortState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Columns hidden when nothing has been persisted.
pub const DEFAULT_HIDDEN_COLUMNS: [ColumnKey; 3] =
    [ColumnKey::SarifFile, ColumnKey::RunId, ColumnKey::ResultId];

/// Group-by key when nothing (or something unusable) has been persisted.
pub const DEFAULT_GROUP_BY: ColumnKey = ColumnKey::ResultFile;

/// Sort when nothing has been persisted.
pub const DEFAULT_SORT: SortState = SortState {
    column: ColumnKey::ResultStartPos,
    ascending: true,
};

// =============================================================================
// Raw snapshot (settings source shape)
// =============================================================================

/// Persisted sort-by value as stored by the settings source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSortBy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ascending: Option<bool>,
}

/// Raw view settings as read from the settings source.
///
/// `None` means "not persisted" and selects the default for that facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<RawSortBy>,
}

impl SettingsSnapshot {
    pub fn set_hidden_columns(&mut self, hidden: &BTreeSet<ColumnKey>) {
        self.hidden_columns = Some(hidden.iter().map(|k| k.as_str().to_string()).collect());
    }

    pub fn set_group_by(&mut self, key: ColumnKey) {
        self.group_by = Some(key.as_str().to_string());
    }

    pub fn set_sort_by(&mut self, sort: SortState) {
        self.sort_by = Some(RawSortBy {
            column: Some(sort.column.as_str().to_string()),
            ascending: Some(sort.ascending),
        });
    }
}

// =============================================================================
// Validation
// =============================================================================

fn parse_hidden(snapshot: &SettingsSnapshot) -> BTreeSet<ColumnKey> {
    match &snapshot.hidden_columns {
        None => DEFAULT_HIDDEN_COLUMNS.iter().copied().collect(),
        Some(keys) => keys
            .iter()
            .filter_map(|raw| {
                let key = ColumnKey::parse(raw);
                if key.is_none() {
                    tracing::warn!(column = %raw, "Ignoring unknown hidden column");
                }
                key
            })
            .collect(),
    }
}

fn parse_group_by(snapshot: &SettingsSnapshot) -> ColumnKey {
    match snapshot.group_by.as_deref() {
        None => DEFAULT_GROUP_BY,
        Some(raw) => ColumnKey::parse(raw).unwrap_or_else(|| {
            tracing::warn!(
                column = %raw,
                fallback = %DEFAULT_GROUP_BY,
                "Unknown group-by column; using default"
            );
            DEFAULT_GROUP_BY
        }),
    }
}

fn parse_sort_by(snapshot: &SettingsSnapshot) -> Option<SortState> {
    let Some(raw) = &snapshot.sort_by else {
        return Some(DEFAULT_SORT);
    };
    let Some(column) = raw.column.as_deref() else {
        tracing::warn!("Sort-by setting has no column; rows keep encounter order");
        return None;
    };
    match ColumnKey::parse(column) {
        Some(column) => Some(SortState {
            column,
            ascending: raw.ascending.unwrap_or(true),
        }),
        None => {
            tracing::warn!(column = %column, "Unknown sort-by column; rows keep encounter order");
            None
        }
    }
}

// =============================================================================
// ViewSettings
// =============================================================================

/// Which facets a reconciliation changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsChanges {
    pub hidden_columns: bool,
    pub group_by: bool,
    pub sort_by: bool,
}

impl SettingsChanges {
    pub fn any(&self) -> bool {
        self.hidden_columns || self.group_by || self.sort_by
    }
}

/// Validated view settings held by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSettings {
    hidden: BTreeSet<ColumnKey>,
    group_by: ColumnKey,
    sort_by: Option<SortState>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::from_snapshot(&SettingsSnapshot::default())
    }
}

impl ViewSettings {
    pub fn from_snapshot(snapshot: &SettingsSnapshot) -> Self {
        Self {
            hidden: parse_hidden(snapshot),
            group_by: parse_group_by(snapshot),
            sort_by: parse_sort_by(snapshot),
        }
    }

    pub fn hidden_columns(&self) -> &BTreeSet<ColumnKey> {
        &self.hidden
    }

    pub fn is_hidden(&self, key: ColumnKey) -> bool {
        self.hidden.contains(&key)
    }

    pub fn group_by(&self) -> ColumnKey {
        self.group_by
    }

    pub fn sort_by(&self) -> Option<SortState> {
        self.sort_by
    }

    /// One descriptor per row field, in display order, with current hide flags.
    pub fn columns(&self) -> Vec<ColumnDescriptor> {
        ColumnKey::all()
            .iter()
            .map(|key| ColumnDescriptor::new(*key, self.is_hidden(*key)))
            .collect()
    }

    /// Adopt the snapshot's hidden columns. Returns true if they changed.
    pub fn reconcile_hidden_columns(&mut self, snapshot: &SettingsSnapshot) -> bool {
        let hidden = parse_hidden(snapshot);
        if hidden == self.hidden {
            return false;
        }
        self.hidden = hidden;
        true
    }

    /// Adopt the snapshot's group-by key. Returns true if it changed.
    pub fn reconcile_group_by(&mut self, snapshot: &SettingsSnapshot) -> bool {
        let group_by = parse_group_by(snapshot);
        if group_by == self.group_by {
            return false;
        }
        self.group_by = group_by;
        true
    }

    /// Adopt the snapshot's sort-by. Returns true if it changed.
    pub fn reconcile_sort_by(&mut self, snapshot: &SettingsSnapshot) -> bool {
        let sort_by = parse_sort_by(snapshot);
        if sort_by == self.sort_by {
            return false;
        }
        self.sort_by = sort_by;
        true
    }

    /// Reconcile every facet against `snapshot`. Never triggers a rebuild.
    pub fn reconcile(&mut self, snapshot: &SettingsSnapshot) -> SettingsChanges {
        SettingsChanges {
            hidden_columns: self.reconcile_hidden_columns(snapshot),
            group_by: self.reconcile_group_by(snapshot),
            sort_by: self.reconcile_sort_by(snapshot),
        }
    }

    /// Hidden set with `key` toggled.
    pub fn toggled_hidden(&self, key: ColumnKey) -> BTreeSet<ColumnKey> {
        let mut hidden = self.hidden.clone();
        if !hidden.remove(&key) {
            hidden.insert(key);
        }
        hidden
    }

    /// Sort after the user picks `column`: same column flips direction,
    /// another column starts ascending.
    pub fn next_sort(&self, column: ColumnKey) -> SortState {
        match self.sort_by {
            Some(current) if current.column == column => SortState {
                column,
                ascending: !current.ascending,
            },
            _ => SortState::ascending(column),
        }
    }
}
