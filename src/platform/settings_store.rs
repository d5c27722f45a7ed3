// SarifLens - platform/settings_store.rs
//
// File-backed settings source: persists hidden columns, group-by and sort-by
// to a TOML file in the platform config directory.
//
// Design principles:
// - Saved atomically (write temp, rename final) so a crash during save never
//   corrupts the previous good file.
// - Load is lenient: a missing file is a first run, a malformed file is
//   logged and treated as "nothing persisted" so the engine starts with
//   defaults rather than failing.
// - The store does not watch the file. The host reloads it (and then calls
//   the engine's settings-change hook) when its own watcher fires.

use crate::app::settings::SettingsSource;
use crate::core::model::{ColumnKey, SortState};
use crate::core::view::SettingsSnapshot;
use crate::util::error::SettingsError;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Read a snapshot from `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_snapshot(path: &Path) -> Result<Option<SettingsSnapshot>, SettingsError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    toml::from_str(&content)
        .map(Some)
        .map_err(|e| SettingsError::TomlParse {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Save `snapshot` to `path` atomically (write temp, rename).
///
/// Creates all parent directories as needed.
pub fn write_snapshot(snapshot: &SettingsSnapshot, path: &Path) -> Result<(), SettingsError> {
    let io_err = |path: &Path, source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let text =
        toml::to_string_pretty(snapshot).map_err(|e| SettingsError::TomlSerialize { source: e })?;

    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, text.as_bytes()).map_err(|e| io_err(tmp.as_path(), e))?;

    std::fs::rename(&tmp, path).map_err(|e| {
        // Clean up the temp file on failure; ignore any secondary error.
        let _ = std::fs::remove_file(&tmp);
        io_err(path, e)
    })?;

    tracing::debug!(path = %path.display(), "View settings saved");
    Ok(())
}

/// TOML file settings source.
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
    snapshot: SettingsSnapshot,
}

impl TomlSettingsStore {
    /// Open the store at `path`, loading whatever is persisted there.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            path: path.into(),
            snapshot: SettingsSnapshot::default(),
        };
        store.reload();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file. Returns true if the in-memory snapshot changed.
    ///
    /// Read or parse failures keep the previous snapshot.
    pub fn reload(&mut self) -> bool {
        let loaded = match read_snapshot(&self.path) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                tracing::debug!(
                    path = %self.path.display(),
                    "No view settings file; using defaults"
                );
                SettingsSnapshot::default()
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "View settings file unreadable; keeping previous settings"
                );
                return false;
            }
        };
        if loaded == self.snapshot {
            return false;
        }
        self.snapshot = loaded;
        true
    }

    fn update<F>(&mut self, apply: F) -> Result<(), SettingsError>
    where
        F: FnOnce(&mut SettingsSnapshot),
    {
        let mut next = self.snapshot.clone();
        apply(&mut next);
        write_snapshot(&next, &self.path)?;
        self.snapshot = next;
        Ok(())
    }
}

impl SettingsSource for TomlSettingsStore {
    fn snapshot(&self) -> SettingsSnapshot {
        self.snapshot.clone()
    }

    fn write_hidden_columns(&mut self, hidden: &BTreeSet<ColumnKey>) -> Result<(), SettingsError> {
        self.update(|s| s.set_hidden_columns(hidden))
    }

    fn write_group_by(&mut self, key: ColumnKey) -> Result<(), SettingsError> {
        self.update(|s| s.set_group_by(key))
    }

    fn write_sort_by(&mut self, sort: SortState) -> Result<(), SettingsError> {
        self.update(|s| s.set_sort_by(sort))
    }
}

// =============================================================================
// Unit tests
// =============================================================================
