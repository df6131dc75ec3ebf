use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::{Error, Result};

/// One delimited record, every field kept as text.
pub type Row = Vec<String>;

/// Read every data row of a comma-delimited file. The first line is a header
/// and is discarded. Rows may have differing lengths.
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let csv_err = |source: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_err)?;
        rows.push(record.iter().map(str::to_owned).collect());
    }
    Ok(rows)
}

/// Write rows in order. Nothing is added: callers that want a header pass it
/// as the first row. Records of unequal length are allowed.
pub fn write_rows(path: &Path, rows: &[Row]) -> Result<()> {
    let csv_err = |source: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut wtr = WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;
    for row in rows {
        wtr.write_record(row).map_err(csv_err)?;
    }
    wtr.flush().map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Positional field access. `row_number` is 1-based over data rows and only
/// used for error reporting.
pub fn field<'a>(
    row: &'a [String],
    index: usize,
    row_number: usize,
    name: &'static str,
) -> Result<&'a str> {
    row.get(index)
        .map(String::as_str)
        .ok_or(Error::MissingField {
            row: row_number,
            index,
            name,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_row_is_an_error() {
        let row = vec!["Home".to_string()];
        assert_eq!(field(&row, 0, 1, "name").unwrap(), "Home");
        match field(&row, 1, 1, "address") {
            Err(Error::MissingField { row, index, name }) => {
                assert_eq!((row, index, name), (1, 1, "address"));
            }
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn header_is_skipped_and_quotes_are_honoured() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        std::fs::write(
            &path,
            "name,address\nOffice,\"1 Main St, Springfield\"\nHome,2 Elm St\n",
        )
        .unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["Office".to_string(), "1 Main St, Springfield".to_string()],
                vec!["Home".to_string(), "2 Elm St".to_string()],
            ]
        );
    }

    #[test]
    fn missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_rows(&dir.path().join("nope.csv")),
            Err(Error::Csv { .. })
        ));
    }
}
