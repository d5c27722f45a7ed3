// SarifLens - platform/export.rs
//
// Export a projection to a file on disk. The format follows the extension:
// `.json` writes the projection document, anything else is CSV.

use crate::core::export::{check_row_cap, export_csv, export_json};
use crate::core::model::Projection;
use crate::util::error::{ExportError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write `projection` to `path`, returning the number of rows exported.
///
/// The row cap is checked before the file is created, so a refused export
/// leaves nothing behind.
pub fn export_to_file(projection: &Projection, path: &Path, max_rows: usize) -> Result<usize> {
    check_row_cap(projection, max_rows)?;

    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let count = if is_json {
        export_json(projection, &mut writer, path, max_rows)?
    } else {
        export_csv(projection, &mut writer, path, max_rows)?
    };
    writer.flush().map_err(io_err)?;

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
    use crate::util::error::SarifLensError;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn projection(count: usize) -> Projection {
        let mut store = RowStore::new();
        let mut membership = BTreeSet::new();
        for i in 0..count {
            let row = Row::from(ResultRecord {
                run_id: "0".to_string(),
                result_id: i.to_string(),
                message: format!("finding {i}"),
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
    fn test_extension_selects_format() {
        let dir = TempDir::new().unwrap();
        let projection = projection(3);

        let csv_path = dir.path().join("results.csv");
        assert_eq!(export_to_file(&projection, &csv_path, 10).unwrap(), 3);
        let csv = std::fs::read_to_string(&csv_path).unwrap();
        assert!(csv.starts_with("Message,"));
        assert_eq!(csv.lines().count(), 4);

        let json_path = dir.path().join("results.JSON");
        assert_eq!(export_to_file(&projection, &json_path, 10).unwrap(), 3);
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["resultCount"], 3);
    }

    #[test]
    fn test_refused_export_creates_no_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("too-many.csv");
        let err = export_to_file(&projection(5), &path, 2).unwrap_err();
        assert!(matches!(
            err,
            SarifLensError::Export(ExportError::TooManyRows { count: 5, max: 2 })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_path_reports_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = export_to_file(&projection(1), &path, 10).unwrap_err();
        assert!(matches!(err, SarifLensError::Export(ExportError::Io { .. })));
        assert!(err.to_string().starts_with("Export error:"));
    }
}
