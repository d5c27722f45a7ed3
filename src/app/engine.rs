// SarifLens - app/engine.rs
//
// Update coordinator: the facade hosts use to feed results, forward UI
// intents and settings-change notifications, and obtain projections.
//
// Ownership model:
//   - The engine is constructed explicitly by the host and owns the row
//     store, the filter engine and the validated view settings. Nothing else
//     mutates them.
//   - All operations take `&mut self` and run to completion; the host calls
//     them one at a time from its event loop.
//   - The settings source, UI sink and editor are host-provided
//     collaborators. The host also owns settings-change notification: when
//     its watcher fires it calls `on_external_settings_changed`.
//
// Batches never publish by themselves. The host calls `publish` once after a
// batch so the UI never sees a partially applied batch.

use crate::app::action::{ActionOutcome, UserAction};
use crate::app::settings::SettingsSource;
use crate::core::filter::FilterEngine;
use crate::core::model::{FilterState, Projection, Range, ResultLocation, Row};
use crate::core::projection::build_projection;
use crate::core::store::RowStore;
use crate::core::view::ViewSettings;
use crate::util::constants;
use crate::util::error::{RevealError, SettingsError};
use std::sync::mpsc;

// =============================================================================
// Collaborators
// =============================================================================

/// Receives every projection the engine publishes.
pub trait ResultsSink {
    fn set_results_list_data(&mut self, data: &Projection);
}

/// Delivers projections over a channel; a dropped receiver is ignored.
impl ResultsSink for mpsc::Sender<Projection> {
    fn set_results_list_data(&mut self, data: &Projection) {
        if self.send(data.clone()).is_err() {
            tracing::debug!("Projection receiver dropped; discarding update");
        }
    }
}

/// Editor integration used when a row is activated.
pub trait Editor {
    /// Map a result location to the file it refers to on this machine.
    /// Fails if the file moved and the user declined to locate it.
    fn resolve_location(&mut self, location: &ResultLocation)
        -> Result<ResultLocation, RevealError>;

    /// Open `uri` and reveal `range`.
    fn reveal_location(&mut self, uri: &str, range: Range) -> Result<(), RevealError>;
}

/// Tunables taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub max_filter_pattern_len: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_filter_pattern_len: constants::DEFAULT_MAX_FILTER_PATTERN_LEN,
        }
    }
}

// =============================================================================
// ResultsEngine
// =============================================================================

/// Live results table engine.
#[derive(Debug)]
pub struct ResultsEngine<S, U, E> {
    store: RowStore,
    filter: FilterEngine,
    view: ViewSettings,
    settings: S,
    sink: U,
    editor: E,
}

impl<S, U, E> ResultsEngine<S, U, E>
where
    S: SettingsSource,
    U: ResultsSink,
    E: Editor,
{
    /// Create an engine with default options, reading initial view settings
    /// from `settings`.
    pub fn new(settings: S, sink: U, editor: E) -> Self {
        Self::with_options(settings, sink, editor, EngineOptions::default())
    }

    pub fn with_options(settings: S, sink: U, editor: E, options: EngineOptions) -> Self {
        let view = ViewSettings::from_snapshot(&settings.snapshot());
        tracing::info!(
            group_by = %view.group_by(),
            sort = ?view.sort_by(),
            hidden = view.hidden_columns().len(),
            "Results engine created"
        );
        Self {
            store: RowStore::new(),
            filter: FilterEngine::new(options.max_filter_pattern_len),
            view,
            settings,
            sink,
            editor,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    pub fn filter_state(&self) -> &FilterState {
        self.filter.state()
    }

    pub fn view_settings(&self) -> &ViewSettings {
        &self.view
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// Mutable access so the host can reload a file-backed source before
    /// calling `on_external_settings_changed`.
    pub fn settings_mut(&mut self) -> &mut S {
        &mut self.settings
    }

    pub fn sink(&self) -> &U {
        &self.sink
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    // -------------------------------------------------------------------------
    // Inbound feed
    // -------------------------------------------------------------------------

    /// Apply a batch of results from the upstream feed.
    ///
    /// Removal deletes each row from the store and the filter membership;
    /// otherwise each row is upserted and re-tested against the current
    /// filter. Does not publish; call `publish` once after the batch.
    pub fn apply_result_batch<I>(&mut self, rows: I, is_removal: bool)
    where
        I: IntoIterator<Item = Row>,
    {
        let mut applied = 0usize;
        for row in rows {
            if is_removal {
                self.filter.remove_row(&row.id);
                self.store.remove(&row.id);
            } else {
                self.filter.update_row(&row.id, &row);
                self.store.upsert(row.id.clone(), row);
            }
            applied += 1;
        }
        tracing::debug!(
            applied,
            is_removal,
            total = self.store.len(),
            passing = self.filter.membership().len(),
            "Result batch applied"
        );
    }

    // -------------------------------------------------------------------------
    // Projection
    // -------------------------------------------------------------------------

    /// Build the projection from current state.
    pub fn current_projection(&self) -> Projection {
        build_projection(
            &self.store,
            self.filter.membership(),
            self.filter.state(),
            &self.view,
        )
    }

    /// Build the projection and push it to the UI sink.
    pub fn publish(&mut self) -> Projection {
        let projection = self.current_projection();
        tracing::debug!(
            groups = projection.groups.len(),
            visible = projection.visible_row_count(),
            total = projection.result_count,
            "Publishing projection"
        );
        self.sink.set_results_list_data(&projection);
        projection
    }

    // -------------------------------------------------------------------------
    // Settings
    // -------------------------------------------------------------------------

    /// Reconcile view settings with the settings source. Publishes a new
    /// projection if anything changed; returns whether it did.
    pub fn on_external_settings_changed(&mut self) -> bool {
        let snapshot = self.settings.snapshot();
        let changes = self.view.reconcile(&snapshot);
        if !changes.any() {
            tracing::debug!("Settings notification with no view changes");
            return false;
        }
        tracing::info!(
            hidden_columns = changes.hidden_columns,
            group_by = changes.group_by,
            sort_by = changes.sort_by,
            "View settings changed"
        );
        self.publish();
        true
    }

    // -------------------------------------------------------------------------
    // UI intents
    // -------------------------------------------------------------------------

    /// Handle an intent from the UI.
    ///
    /// Column, group and sort changes are written to the settings source and
    /// take effect on the next settings notification. Filter changes apply
    /// immediately. Row selection only talks to the editor.
    pub fn handle_user_action(&mut self, action: UserAction) -> ActionOutcome {
        tracing::debug!(?action, "User action");
        match action {
            UserAction::ColumnToggle { column } => {
                let hidden = self.view.toggled_hidden(column);
                self.write_through("hidden columns", |s| s.write_hidden_columns(&hidden))
            }
            UserAction::GroupChange { column } => {
                self.write_through("group-by", |s| s.write_group_by(column))
            }
            UserAction::SortChange { column } => {
                let sort = self.view.next_sort(column);
                self.write_through("sort-by", |s| s.write_sort_by(sort))
            }
            UserAction::FilterApply { text } => {
                let case_sensitive = self.filter.state().case_sensitive;
                self.set_filter(&text, case_sensitive)
            }
            UserAction::FilterCaseToggle => {
                let state = self.filter.state();
                let (text, case_sensitive) = (state.text.clone(), !state.case_sensitive);
                self.set_filter(&text, case_sensitive)
            }
            UserAction::RowSelect { result_id, run_id } => {
                self.reveal_row(&Row::make_id(&run_id, &result_id))
            }
        }
    }

    fn write_through<F>(&mut self, facet: &'static str, write: F) -> ActionOutcome
    where
        F: FnOnce(&mut S) -> Result<(), SettingsError>,
    {
        match write(&mut self.settings) {
            Ok(()) => ActionOutcome::Persisted,
            Err(e) => {
                tracing::warn!(facet, error = %e, "Failed to persist view setting");
                ActionOutcome::Ignored
            }
        }
    }

    fn set_filter(&mut self, text: &str, case_sensitive: bool) -> ActionOutcome {
        if !self.filter.set_filter(text, case_sensitive, &self.store) {
            return ActionOutcome::Ignored;
        }
        self.publish();
        ActionOutcome::Rebuilt
    }

    /// Ask the editor to reveal a row's location. Failures are logged and
    /// never touch engine state.
    fn reveal_row(&mut self, row_id: &str) -> ActionOutcome {
        let Some(row) = self.store.get(row_id) else {
            tracing::debug!(row_id, "Selected row no longer exists");
            return ActionOutcome::Ignored;
        };
        let Some(location) = row.location.clone() else {
            let e = RevealError::NoLocation {
                row_id: row_id.to_string(),
            };
            tracing::debug!(error = %e, "Nothing to reveal");
            return ActionOutcome::Ignored;
        };

        let revealed = self
            .editor
            .resolve_location(&location)
            .and_then(|resolved| self.editor.reveal_location(&resolved.uri, resolved.range));
        if let Err(e) = revealed {
            tracing::warn!(
                row_id,
                uri = %location.uri,
                error = %e,
                "Could not reveal result location"
            );
        }
        ActionOutcome::RevealRequested
    }
}
