// CSV export

use std::io::Write;
use std::path::Path;

use rostermatch_core::Table;

use crate::error::LoadError;

/// Write `table` as comma-delimited CSV with a header row.
pub fn write_table(table: &Table, path: &Path) -> Result<(), LoadError> {
    let file = std::fs::File::create(path).map_err(|e| LoadError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    write_table_to(table, file).map_err(|e| LoadError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Write `table` as CSV to any writer (stdout, a buffer, ...).
pub fn write_table_to<W: Write>(table: &Table, out: W) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new().from_writer(out);
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|c| c.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rostermatch_core::Cell;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn writes_header_and_rows() {
        let mut t = Table::from_rows(&["name", "dob"], &[["Lee, Ann", "2005-01-01"], ["Bob", ""]]).unwrap();
        t.add_column("is_in_reference", vec![Cell::Bool(true), Cell::Bool(false)]).unwrap();

        let mut buf = Vec::new();
        write_table_to(&t, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(
            out,
            "name,dob,is_in_reference\n\"Lee, Ann\",2005-01-01,True\nBob,,False\n"
        );
    }

    #[test]
    fn writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let t = Table::from_rows(&["first_name"], &[["Ann"]]).unwrap();
        write_table(&t, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first_name\nAnn\n");
    }

    #[test]
    fn unwritable_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("out.csv");
        let t = Table::from_rows(&["a"], &[["1"]]).unwrap();
        let err = write_table(&t, &path).unwrap_err();
        assert!(matches!(err, LoadError::Write { .. }));
    }
}
