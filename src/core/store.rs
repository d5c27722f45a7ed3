// SarifLens - core/store.rs
//
// Keyed table of canonical rows. No filtering or sorting logic.
//
// Backed by a BTreeMap so iteration order is stable across runs; projection
// output therefore never depends on hash seeds.

use crate::core::model::Row;
use std::collections::BTreeMap;

/// Canonical row table keyed by row identity (`runId_resultId`).
#[derive(Debug, Default, Clone)]
pub struct RowStore {
    rows: BTreeMap<String, Row>,
}

impl RowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `row` under `row_id`, replacing any existing row.
    pub fn upsert(&mut self, row_id: impl Into<String>, row: Row) {
        self.rows.insert(row_id.into(), row);
    }

    /// Remove the row under `row_id`. Returns the removed row, if present.
    pub fn remove(&mut self, row_id: &str) -> Option<Row> {
        self.rows.remove(row_id)
    }

    pub fn get(&self, row_id: &str) -> Option<&Row> {
        self.rows.get(row_id)
    }

    pub fn contains(&self, row_id: &str) -> bool {
        self.rows.contains_key(row_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate `(row_id, row)` pairs in stable key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Row)> {
        self.rows.iter()
    }

    /// Underlying map, for parallel iteration by the filter engine.
    pub(crate) fn as_map(&self) -> &BTreeMap<String, Row> {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::row::ResultRecord;

    fn row(run: &str, result: &str, message: &str) -> Row {
        Row::from(ResultRecord {
            run_id: run.to_string(),
            result_id: result.to_string(),
            message: message.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut store = RowStore::new();
        let r = row("1", "1", "a");
        store.upsert(r.id.clone(), r.clone());
        store.upsert(r.id.clone(), r.clone());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("1_1"), Some(&r));
    }

    #[test]
    fn test_upsert_replaces_existing() {
        let mut store = RowStore::new();
        store.upsert("1_1", row("1", "1", "old"));
        store.upsert("1_1", row("1", "1", "new"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("1_1").unwrap().message.display(), "new");
    }

    #[test]
    fn test_remove_is_total() {
        let mut store = RowStore::new();
        store.upsert("1_1", row("1", "1", "a"));
        store.upsert("1_2", row("1", "2", "b"));

        assert!(store.remove("9_9").is_none());
        assert_eq!(store.len(), 2, "removing a missing id is a no-op");

        assert!(store.remove("1_1").is_some());
        assert_eq!(store.len(), 1);
        assert!(!store.contains("1_1"));
        assert!(store.contains("1_2"));
    }

    #[test]
    fn test_iteration_order_is_stable() {
        let mut a = RowStore::new();
        let mut b = RowStore::new();
        for id in ["2", "1", "3"] {
            a.upsert(format!("0_{id}"), row("0", id, id));
        }
        for id in ["3", "2", "1"] {
            b.upsert(format!("0_{id}"), row("0", id, id));
        }
        let ka: Vec<_> = a.iter().map(|(k, _)| k.clone()).collect();
        let kb: Vec<_> = b.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(ka, kb);
    }
}
