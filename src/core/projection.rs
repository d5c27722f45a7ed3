// SarifLens - core/projection.rs
//
// Builds the grouped, sorted projection consumed by the UI.
//
// The builder is a pure function of (row store, filter membership, view
// settings): identical inputs always yield an identical projection. Group
// encounter order comes from the ordered membership set, and both sorts used
// here are stable.

use crate::core::model::{Cell, CellKind, ColumnKey, FilterState, Group, Projection, Row, SortState};
use crate::core::store::RowStore;
use crate::core::view::ViewSettings;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

// =============================================================================
// Cell comparison
// =============================================================================

/// Parse a display string as a number, if it is one.
fn as_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Human-oriented string ordering: letters compare case-insensitively first,
/// lowercase sorts before uppercase on ties, then raw code points.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a
        .cmp(folded_b)
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Order two plain display strings. Numeric displays come first and compare
/// by value; the rest compare by `locale_compare`. Keeping the two tiers apart
/// makes this a total order on mixed columns.
fn compare_plain(a: &str, b: &str) -> Ordering {
    match (as_number(a), as_number(b)) {
        (Some(na), Some(nb)) => na.total_cmp(&nb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => locale_compare(a, b),
    }
}

fn kind_rank(kind: CellKind) -> u8 {
    match kind {
        CellKind::Position(_) => 0,
        CellKind::Severity(_) => 1,
        CellKind::Plain => 2,
    }
}

/// Compare two cells of the same column.
///
/// Undefined values sort before defined ones. Typed cells compare by their
/// position or severity rank; plain cells go through `compare_plain`.
pub fn compare_cells(a: &Cell, b: &Cell) -> Ordering {
    let (av, bv) = match (a.value.as_deref(), b.value.as_deref()) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(av), Some(bv)) => (av, bv),
    };

    match (a.kind, b.kind) {
        (CellKind::Position(pa), CellKind::Position(pb)) => pa.cmp(&pb),
        (CellKind::Severity(sa), CellKind::Severity(sb)) => sa.cmp(&sb),
        (CellKind::Plain, CellKind::Plain) => compare_plain(av, bv),
        (ka, kb) => kind_rank(ka).cmp(&kind_rank(kb)),
    }
}

/// Compare two rows under `sort`. Descending swaps the operands rather than
/// reversing the result, so equal rows keep their relative order.
pub fn compare_rows(a: &Row, b: &Row, sort: SortState) -> Ordering {
    let (first, second) = if sort.ascending { (a, b) } else { (b, a) };
    compare_cells(first.cell(sort.column), second.cell(sort.column))
}

// =============================================================================
// Grouping
// =============================================================================

/// Key used to bucket a row. File columns group by full path (tooltip) so
/// identically named files in different directories stay apart.
pub fn grouping_key(row: &Row, group_by: ColumnKey) -> &str {
    let cell = row.cell(group_by);
    if group_by.is_file() {
        if let Some(tooltip) = cell.tooltip.as_deref() {
            return tooltip;
        }
    }
    cell.display()
}

/// Bucket member rows by grouping key, then order groups by size (largest
/// first, ties in encounter order) and sort rows within each group.
pub fn group_rows<'a, I>(rows: I, group_by: ColumnKey, sort: Option<SortState>) -> Vec<Group>
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for row in rows {
        let key = grouping_key(row, group_by);
        let slot = *index.entry(key).or_insert_with(|| {
            let cell = row.cell(group_by);
            groups.push(Group {
                text: cell.display().to_string(),
                tooltip: cell.tooltip.clone(),
                rows: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].rows.push(row.clone());
    }

    // Stable: equal-sized groups keep encounter order.
    groups.sort_by(|a, b| b.rows.len().cmp(&a.rows.len()));

    if let Some(sort) = sort {
        for group in &mut groups {
            group.rows.sort_by(|a, b| compare_rows(a, b, sort));
        }
    }

    groups
}

// =============================================================================
// Projection
// =============================================================================

/// Build the projection from the store, the ids passing the filter, and the
/// view settings.
///
/// Member ids missing from the store are skipped.
pub fn build_projection(
    store: &RowStore,
    membership: &BTreeSet<String>,
    filter_state: &FilterState,
    view: &ViewSettings,
) -> Projection {
    let rows = membership.iter().filter_map(|id| store.get(id));
    let groups = group_rows(rows, view.group_by(), view.sort_by());

    Projection {
        columns: view.columns(),
        filter_state: filter_state.clone(),
        group_by: view.group_by(),
        sort_state: view.sort_by(),
        result_count: store.len(),
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Position, Range, ResultLocation, Severity};
    use crate::core::row::ResultRecord;
    use crate::core::view::{RawSortBy, SettingsSnapshot};

    fn make_row(id: &str, uri: &str, line: u32, column: u32, level: &str) -> Row {
        Row::from(ResultRecord {
            run_id: "1".to_string(),
            result_id: id.to_string(),
            message: format!("message {id}"),
            rule_id: Some(format!("R{id}")),
            rule_name: None,
            level: Some(level.to_string()),
            sarif_path: "/logs/a.sarif".to_string(),
            location: Some(ResultLocation {
                uri: uri.to_string(),
                range: Range {
                    start: Position::new(line, column),
                    end: Position::new(line, column),
                },
            }),
        })
    }

    fn view(group_by: &str, sort_column: &str, ascending: bool) -> ViewSettings {
        ViewSettings::from_snapshot(&SettingsSnapshot {
            hidden_columns: None,
            group_by: Some(group_by.to_string()),
            sort_by: Some(RawSortBy {
                column: Some(sort_column.to_string()),
                ascending: Some(ascending),
            }),
        })
    }

    fn store_of(rows: Vec<Row>) -> (RowStore, BTreeSet<String>) {
        let mut store = RowStore::new();
        let mut membership = BTreeSet::new();
        for row in rows {
            membership.insert(row.id.clone());
            store.upsert(row.id.clone(), row);
        }
        (store, membership)
    }

    fn ids(group: &Group) -> Vec<&str> {
        group.rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_undefined_sorts_first() {
        let undefined = Cell::default();
        let defined = Cell::text("a");
        assert_eq!(compare_cells(&undefined, &defined), Ordering::Less);
        assert_eq!(compare_cells(&defined, &undefined), Ordering::Greater);
        assert_eq!(compare_cells(&undefined, &Cell::default()), Ordering::Equal);
    }

    #[test]
    fn test_numeric_and_locale_comparison() {
        assert_eq!(compare_cells(&Cell::text("9"), &Cell::text("10")), Ordering::Less);
        assert_eq!(compare_cells(&Cell::text("b"), &Cell::text("A")), Ordering::Greater);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
    }

    #[test]
    fn test_numbers_sort_before_text_in_mixed_column() {
        let cell = |s: &str| Cell::text(s);
        assert_eq!(compare_cells(&cell("10"), &cell("5x")), Ordering::Less);
        assert_eq!(compare_cells(&cell("5x"), &cell("9")), Ordering::Greater);
        assert_eq!(compare_cells(&cell("9"), &cell("10")), Ordering::Less);
    }

    #[test]
    fn test_mixed_column_sort_is_total() {
        let mut cells = Vec::new();
        for k in 0..800u32 {
            cells.push(Cell::text(k.to_string()));
            cells.push(Cell::text(format!("{k}x")));
            if k % 7 == 0 {
                cells.push(Cell::default());
            }
        }
        // Deterministic Fisher-Yates shuffle driven by an LCG.
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for i in (1..cells.len()).rev() {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let j = (seed >> 33) as usize % (i + 1);
            cells.swap(i, j);
        }

        cells.sort_by(compare_cells);

        for pair in cells.windows(2) {
            assert_ne!(
                compare_cells(&pair[0], &pair[1]),
                Ordering::Greater,
                "{:?} sorted before {:?}",
                pair[0].value,
                pair[1].value
            );
        }
        let first_text = cells
            .iter()
            .position(|c| c.value.as_deref().is_some_and(|v| v.ends_with('x')))
            .unwrap();
        assert!(cells[first_text..]
            .iter()
            .all(|c| c.value.as_deref().is_some_and(|v| v.ends_with('x'))));
    }

    #[test]
    fn test_rule_id_sort_over_mixed_values() {
        let rule_ids = ["10", "5x", "9", "100", "1a", "3", "20x", "50", "7b", "8"];
        let rows = rule_ids
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                let mut row = make_row(&format!("{i:02}"), "/x/a.c", 0, 0, "error");
                row.rule_id = Cell::text(*rule);
                row
            })
            .collect();
        let (store, membership) = store_of(rows);

        let projection = build_projection(
            &store,
            &membership,
            &FilterState::default(),
            &view("resultFile", "ruleId", true),
        );
        let order: Vec<_> = projection.groups[0]
            .rows
            .iter()
            .map(|r| r.rule_id.display())
            .collect();
        assert_eq!(
            order,
            vec!["3", "8", "9", "10", "50", "100", "1a", "20x", "5x", "7b"]
        );
    }

    #[test]
    fn test_severity_compares_by_rank() {
        let error = Cell::severity(Severity::Error);
        let note = Cell::severity(Severity::Note);
        let warning = Cell::severity(Severity::Warning);
        assert_eq!(compare_cells(&error, &note), Ordering::Less);
        // "note" < "warning" alphabetically; rank puts warning first.
        assert_eq!(compare_cells(&warning, &note), Ordering::Less);
    }

    #[test]
    fn test_position_sort_direction_reverses() {
        let (store, membership) = store_of(vec![
            make_row("2", "/x/a.c", 1, 8, "error"),
            make_row("1", "/x/a.c", 1, 4, "error"),
        ]);

        let asc = build_projection(
            &store,
            &membership,
            &FilterState::default(),
            &view("resultFile", "resultStartPos", true),
        );
        assert_eq!(ids(&asc.groups[0]), vec!["1_1", "1_2"]);
        assert_eq!(asc.groups[0].rows[0].result_start_pos.display(), "(2, 5)");
        assert_eq!(asc.groups[0].rows[1].result_start_pos.display(), "(2, 9)");

        let desc = build_projection(
            &store,
            &membership,
            &FilterState::default(),
            &view("resultFile", "resultStartPos", false),
        );
        assert_eq!(ids(&desc.groups[0]), vec!["1_2", "1_1"]);
    }

    #[test]
    fn test_descending_keeps_ties_stable() {
        let (store, membership) = store_of(vec![
            make_row("1", "/x/a.c", 0, 0, "error"),
            make_row("2", "/x/a.c", 0, 0, "error"),
            make_row("3", "/x/a.c", 0, 0, "note"),
        ]);
        let desc = build_projection(
            &store,
            &membership,
            &FilterState::default(),
            &view("resultFile", "severityLevel", false),
        );
        assert_eq!(ids(&desc.groups[0]), vec!["1_3", "1_1", "1_2"]);
    }

    #[test]
    fn test_groups_ordered_by_size() {
        let mut rows = Vec::new();
        let mut n = 0;
        for (file, count) in [("/g/three.c", 3), ("/g/one.c", 1), ("/g/five.c", 5)] {
            for _ in 0..count {
                n += 1;
                rows.push(make_row(&format!("{n:02}"), file, 0, 0, "warning"));
            }
        }
        let (store, membership) = store_of(rows);
        let projection = build_projection(
            &store,
            &membership,
            &FilterState::default(),
            &view("resultFile", "resultStartPos", true),
        );
        let sizes: Vec<_> = projection.groups.iter().map(|g| g.rows.len()).collect();
        assert_eq!(sizes, vec![5, 3, 1]);
        assert_eq!(projection.groups[0].text, "five.c");
    }

    #[test]
    fn test_file_grouping_uses_full_path() {
        let (store, membership) = store_of(vec![
            make_row("1", "/x/a.c", 0, 0, "error"),
            make_row("2", "/y/a.c", 0, 0, "warning"),
        ]);
        let projection = build_projection(
            &store,
            &membership,
            &FilterState::default(),
            &view("resultFile", "resultStartPos", true),
        );
        assert_eq!(projection.groups.len(), 2);
        for group in &projection.groups {
            assert_eq!(group.text, "a.c");
            assert_eq!(group.rows.len(), 1);
        }
        let tooltips: BTreeSet<_> = projection
            .groups
            .iter()
            .map(|g| g.tooltip.clone().unwrap())
            .collect();
        assert!(tooltips.contains("/x/a.c") && tooltips.contains("/y/a.c"));
    }

    #[test]
    fn test_non_file_grouping_uses_display() {
        let (store, membership) = store_of(vec![
            make_row("1", "/x/a.c", 0, 0, "error"),
            make_row("2", "/y/b.c", 0, 0, "error"),
            make_row("3", "/y/b.c", 0, 0, "note"),
        ]);
        let projection = build_projection(
            &store,
            &membership,
            &FilterState::default(),
            &view("severityLevel", "resultStartPos", true),
        );
        let labels: Vec<_> = projection.groups.iter().map(|g| g.text.as_str()).collect();
        assert_eq!(labels, vec!["error", "note"]);
    }

    #[test]
    fn test_result_count_is_total_not_filtered() {
        let (store, mut membership) = store_of(vec![
            make_row("1", "/x/a.c", 0, 0, "error"),
            make_row("2", "/x/a.c", 0, 0, "error"),
            make_row("3", "/x/a.c", 0, 0, "error"),
        ]);
        membership.remove("1_2");
        let projection = build_projection(
            &store,
            &membership,
            &FilterState::default(),
            &ViewSettings::default(),
        );
        assert_eq!(projection.result_count, 3);
        assert_eq!(projection.visible_row_count(), 2);
    }

    #[test]
    fn test_no_sort_keeps_encounter_order() {
        let (store, membership) = store_of(vec![
            make_row("1", "/x/a.c", 9, 0, "note"),
            make_row("2", "/x/a.c", 1, 0, "error"),
        ]);
        let unsorted = ViewSettings::from_snapshot(&SettingsSnapshot {
            sort_by: Some(RawSortBy::default()),
            ..Default::default()
        });
        let projection =
            build_projection(&store, &membership, &FilterState::default(), &unsorted);
        assert!(projection.sort_state.is_none());
        assert_eq!(ids(&projection.groups[0]), vec!["1_1", "1_2"]);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let rows = vec![
            make_row("1", "/x/a.c", 0, 0, "error"),
            make_row("2", "/y/b.c", 0, 0, "warning"),
            make_row("3", "/z/c.c", 0, 0, "note"),
        ];
        let (store_a, membership_a) = store_of(rows.clone());
        let (store_b, membership_b) = store_of(rows.into_iter().rev().collect());
        let settings = ViewSettings::default();
        let a = build_projection(&store_a, &membership_a, &FilterState::default(), &settings);
        let b = build_projection(&store_b, &membership_b, &FilterState::default(), &settings);
        assert_eq!(a, b);
    }
}
