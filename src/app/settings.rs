// SarifLens - app/settings.rs
//
// Settings source seam: read/write access to the three persisted view
// settings (hidden columns, group-by, sort-by).
//
// The engine reads a snapshot at startup and whenever the host reports a
// change, and writes back only for settings-origin user actions. Filter
// text and case sensitivity are transient and never pass through here.

use crate::core::model::{ColumnKey, SortState};
use crate::core::view::SettingsSnapshot;
use crate::util::error::SettingsError;
use std::collections::BTreeSet;

/// External store of persisted view settings.
pub trait SettingsSource {
    /// Current raw values. Unpersisted facets are `None`.
    fn snapshot(&self) -> SettingsSnapshot;

    fn write_hidden_columns(&mut self, hidden: &BTreeSet<ColumnKey>) -> Result<(), SettingsError>;

    fn write_group_by(&mut self, key: ColumnKey) -> Result<(), SettingsError>;

    fn write_sort_by(&mut self, sort: SortState) -> Result<(), SettingsError>;
}

/// In-process settings source for hosts that own persistence themselves.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    snapshot: SettingsSnapshot,
}

impl MemorySettings {
    pub fn new(snapshot: SettingsSnapshot) -> Self {
        Self { snapshot }
    }

    /// Replace the stored values wholesale, as an external writer would.
    pub fn replace(&mut self, snapshot: SettingsSnapshot) {
        self.snapshot = snapshot;
    }
}

impl SettingsSource for MemorySettings {
    fn snapshot(&self) -> SettingsSnapshot {
        self.snapshot.clone()
    }

    fn write_hidden_columns(&mut self, hidden: &BTreeSet<ColumnKey>) -> Result<(), SettingsError> {
        self.snapshot.set_hidden_columns(hidden);
        Ok(())
    }

    fn write_group_by(&mut self, key: ColumnKey) -> Result<(), SettingsError> {
        self.snapshot.set_group_by(key);
        Ok(())
    }

    fn write_sort_by(&mut self, sort: SortState) -> Result<(), SettingsError> {
        self.snapshot.set_sort_by(sort);
        Ok(())
    }
}
