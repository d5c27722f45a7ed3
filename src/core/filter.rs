// SarifLens - core/filter.rs
//
// Filter engine for result rows.
// The filter text is compiled once into a single regex matcher; a row passes
// if ANY of the searched fields matches (OR-combined).
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{ColumnKey, FilterState, Row};
use crate::core::store::RowStore;
use crate::util::constants;
use crate::util::error::FilterError;
use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;

/// Fields tested by the filter, in test order.
pub const SEARCHED_COLUMNS: [ColumnKey; 6] = [
    ColumnKey::Message,
    ColumnKey::RuleId,
    ColumnKey::RuleName,
    ColumnKey::SeverityLevel,
    ColumnKey::ResultFile,
    ColumnKey::SarifFile,
];

/// Compiled form of the filter text.
#[derive(Debug, Clone)]
enum Matcher {
    /// Empty text: every row passes.
    All,
    /// Compiled pattern tested against each searched field.
    Pattern(Regex),
    /// The text failed to compile: no row passes until it changes.
    Nothing,
}

impl Matcher {
    fn is_match(&self, row: &Row) -> bool {
        match self {
            Matcher::All => true,
            Matcher::Nothing => false,
            Matcher::Pattern(regex) => row_matches(row, regex),
        }
    }
}

/// Returns true if any searched field's display value matches `regex`.
/// Undefined values never match.
pub fn row_matches(row: &Row, regex: &Regex) -> bool {
    SEARCHED_COLUMNS.iter().any(|key| {
        row.cell(*key)
            .value
            .as_deref()
            .is_some_and(|v| regex.is_match(v))
    })
}

/// Compile filter text into a regex.
///
/// Returns `Ok(None)` for empty text (no filtering).
pub fn compile_pattern(
    text: &str,
    case_sensitive: bool,
    max_len: usize,
) -> Result<Option<Regex>, FilterError> {
    if text.is_empty() {
        return Ok(None);
    }
    let length = text.chars().count();
    if length > max_len {
        return Err(FilterError::PatternTooLong {
            length,
            max_length: max_len,
        });
    }
    RegexBuilder::new(text)
        .case_insensitive(!case_sensitive)
        .size_limit(constants::FILTER_REGEX_SIZE_LIMIT)
        .build()
        .map(Some)
        .map_err(|e| FilterError::InvalidPattern {
            pattern: text.to_string(),
            source: e,
        })
}

/// Owns the active filter settings, their compiled matcher, and the set of
/// row ids currently passing.
///
/// Membership never outlives its row: callers route every store removal
/// through `remove_row`.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    state: FilterState,
    matcher: Matcher,
    max_pattern_len: usize,
    membership: BTreeSet<String>,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(constants::DEFAULT_MAX_FILTER_PATTERN_LEN)
    }
}

impl FilterEngine {
    pub fn new(max_pattern_len: usize) -> Self {
        Self {
            state: FilterState::default(),
            matcher: Matcher::All,
            max_pattern_len,
            membership: BTreeSet::new(),
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Row ids currently passing the filter, in stable order.
    pub fn membership(&self) -> &BTreeSet<String> {
        &self.membership
    }

    /// Replace the filter text and case sensitivity.
    ///
    /// When either differs from the current state the matcher is recompiled
    /// and membership fully recomputed over `store`. Returns true if the
    /// state changed. A compile failure is recorded in `FilterState::error`
    /// and leaves no rows passing.
    pub fn set_filter(&mut self, text: &str, case_sensitive: bool, store: &RowStore) -> bool {
        if self.state.text == text && self.state.case_sensitive == case_sensitive {
            return false;
        }

        self.state.text = text.to_string();
        self.state.case_sensitive = case_sensitive;

        match compile_pattern(text, case_sensitive, self.max_pattern_len) {
            Ok(Some(regex)) => {
                self.matcher = Matcher::Pattern(regex);
                self.state.error = None;
            }
            Ok(None) => {
                self.matcher = Matcher::All;
                self.state.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Filter pattern rejected; no rows will match");
                self.matcher = Matcher::Nothing;
                self.state.error = Some(e.to_string());
            }
        }

        tracing::debug!(
            text_len = text.len(),
            case_sensitive,
            valid = self.state.error.is_none(),
            "Filter recompiled"
        );

        self.recompute(store);
        true
    }

    /// Recompute membership from scratch by testing every stored row once.
    pub fn recompute(&mut self, store: &RowStore) {
        let matcher = &self.matcher;
        self.membership = store
            .as_map()
            .par_iter()
            .filter(|(_, row)| matcher.is_match(row))
            .map(|(id, _)| id.clone())
            .collect();

        tracing::debug!(
            passing = self.membership.len(),
            total = store.len(),
            "Filter membership recomputed"
        );
    }

    /// Re-evaluate one upserted row against the current matcher.
    pub fn update_row(&mut self, row_id: &str, row: &Row) {
        if self.matcher.is_match(row) {
            if !self.membership.contains(row_id) {
                self.membership.insert(row_id.to_string());
            }
        } else {
            self.membership.remove(row_id);
        }
    }

    /// Drop a removed row from membership. No-op if absent.
    pub fn remove_row(&mut self, row_id: &str) {
        self.membership.remove(row_id);
    }
}
