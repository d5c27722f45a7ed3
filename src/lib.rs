// SarifLens - lib.rs
//
// Embedded live results table engine: maintains SARIF result rows and
// derives a filtered, grouped and sorted projection for a results list UI.
//
// Hosts construct a `ResultsEngine` with their own settings source, UI sink
// and editor integration, feed it result batches, and forward UI intents
// and settings-change notifications to it.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;

pub use crate::app::action::{ActionOutcome, UserAction};
pub use crate::app::engine::{Editor, EngineOptions, ResultsEngine, ResultsSink};
pub use crate::app::settings::{MemorySettings, SettingsSource};
pub use crate::core::model::{ColumnKey, Projection, Row, Severity, SortState};
pub use crate::core::row::ResultRecord;
