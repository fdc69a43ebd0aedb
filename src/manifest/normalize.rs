use std::path::Path;

use crate::error::{ManifestError, Result};
use crate::manifest::columns::Column;
use crate::manifest::reader::RawRow;
use crate::manifest::value::Cell;

/// A manifest row with one typed cell per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub line: u64,
    cells: Vec<Cell>,
}

impl NormalizedRecord {
    pub fn get(&self, column: Column) -> &Cell {
        &self.cells[column.index()]
    }

    /// Look a field up by its column name; `None` for names outside the schema.
    pub fn field(&self, name: &str) -> Option<&Cell> {
        name.parse::<Column>().ok().map(|c| self.get(c))
    }
}

/// Zip a raw row with the column list, coercing each cell.
pub fn normalize(file: &Path, row: RawRow) -> Result<NormalizedRecord> {
    if row.cells.len() != Column::ALL.len() {
        return Err(ManifestError::SchemaMismatch {
            file: file.to_path_buf(),
            line: row.line,
            expected: Column::ALL.len(),
            found: row.cells.len(),
        });
    }

    Ok(NormalizedRecord {
        line: row.line,
        cells: row.cells.iter().map(|raw| Cell::from_raw(raw)).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn raw(cells: &[&str]) -> RawRow {
        RawRow {
            line: 3,
            cells: cells.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn types_each_cell() -> anyhow::Result<()> {
        let rec = normalize(
            Path::new("m.csv"),
            raw(&[
                "h1", "10.0.0.1", "10.0.0.254", "24", "2", "4096", "web:pool", "", "tmpl", "40",
                "", "", "", "2030-05-01",
            ]),
        )?;

        assert_eq!(rec.line, 3);
        assert_eq!(rec.get(Column::Hostname), &Cell::Text("h1".into()));
        assert_eq!(rec.get(Column::Subnet).as_int(), Some(24));
        assert_eq!(rec.get(Column::Memory).as_int(), Some(4096));
        assert_eq!(rec.get(Column::Vapp), &Cell::Text("web:pool".into()));
        assert_eq!(rec.get(Column::Disk0).as_int(), Some(40));
        assert!(rec.get(Column::Disk1).is_empty());
        assert_eq!(rec.field("expires"), Some(&Cell::Text("2030-05-01".into())));
        assert_eq!(rec.field("folder"), None);
        Ok(())
    }

    #[test]
    fn rejects_wrong_cell_count() {
        let err = normalize(Path::new("m.csv"), raw(&["h1", "10.0.0.1"])).unwrap_err();
        match err {
            ManifestError::SchemaMismatch {
                file,
                line,
                expected,
                found,
            } => {
                assert_eq!(file, PathBuf::from("m.csv"));
                assert_eq!(line, 3);
                assert_eq!(expected, 14);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
