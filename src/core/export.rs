// SarifLens - core/export.rs
//
// CSV and JSON export of a projection.
// Core layer: writes to any Write trait object.

use crate::core::model::{ColumnKey, Projection};
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

pub(crate) fn check_row_cap(projection: &Projection, max_rows: usize) -> Result<usize, ExportError> {
    let count = projection.visible_row_count();
    if count > max_rows {
        return Err(ExportError::TooManyRows {
            count,
            max: max_rows,
        });
    }
    Ok(count)
}

/// Export the projection's rows to CSV.
///
/// Columns are the projection's visible columns in display order; rows
/// follow group order, then in-group order. Returns the number of rows
/// written.
pub fn export_csv<W: Write>(
    projection: &Projection,
    writer: W,
    export_path: &Path,
    max_rows: usize,
) -> Result<usize, ExportError> {
    check_row_cap(projection, max_rows)?;

    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    let columns: Vec<ColumnKey> = projection
        .columns
        .iter()
        .filter(|c| !c.hide)
        .map(|c| c.key)
        .collect();

    csv_writer
        .write_record(columns.iter().map(|k| k.title()))
        .map_err(csv_err)?;

    let mut count = 0;
    for row in projection.groups.iter().flat_map(|g| g.rows.iter()) {
        csv_writer
            .write_record(columns.iter().map(|k| row.cell(*k).display()))
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(rows = count, path = %export_path.display(), "CSV export complete");
    Ok(count)
}

/// Export the whole projection (the same document the UI receives) as JSON.
pub fn export_json<W: Write>(
    projection: &Projection,
    writer: W,
    export_path: &Path,
    max_rows: usize,
) -> Result<usize, ExportError> {
    let count = check_row_cap(projection, max_rows)?;
    serde_json::to_writer_pretty(writer, projection).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    tracing::info!(rows = count, path = %export_path.display(), "JSON export complete");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{FilterState, Row};
    use crate::core::projection::build_projection;
    use crate::core::row::ResultRecord;
    use crate::core::store::RowStore;
    use crate::core::view::ViewSettings;
    use std::collections::BTreeSet;

    fn sample_projection() -> Projection {
        let mut store = RowStore::new();
        let mut membership = BTreeSet::new();
        for (id, message) in [("1", "Error one"), ("2", "Error, two")] {
            let row = Row::from(ResultRecord {
                run_id: "0".to_string(),
                result_id: id.to_string(),
                message: message.to_string(),
                level: Some("error".to_string()),
                ..Default::default()
            });
            membership.insert(row.id.clone());
            store.upsert(row.id.clone(), row);
        }
        build_projection(
            &store,
            &membership,
            &FilterState::default(),
            &ViewSettings::default(),
        )
    }

    #[test]
    fn test_csv_export_uses_visible_columns() {
        let projection = sample_projection();
        let mut buf = Vec::new();
        let count = export_csv(&projection, &mut buf, Path::new("out.csv"), 100).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        let header = output.lines().next().unwrap();
        assert!(header.starts_with("Message,Rule Id"));
        assert!(!header.contains("Run Id"), "hidden columns are not exported");
        assert!(output.contains("\"Error, two\""), "fields are CSV-quoted");
    }

    #[test]
    fn test_json_export() {
        let projection = sample_projection();
        let mut buf = Vec::new();
        let count = export_json(&projection, &mut buf, Path::new("out.json"), 100).unwrap();
        assert_eq!(count, 2);

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["resultCount"], 2);
        assert_eq!(value["groupBy"], "resultFile");
    }

    #[test]
    fn test_export_row_cap() {
        let projection = sample_projection();
        let result = export_csv(&projection, Vec::new(), Path::new("out.csv"), 1);
        assert!(matches!(
            result,
            Err(ExportError::TooManyRows { count: 2, max: 1 })
        ));
    }
}
