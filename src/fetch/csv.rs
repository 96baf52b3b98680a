//! CSV file source

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::config::{ConnectionConfig, EngineFamily};
use crate::error::{ParityError, Result};
use crate::model::{CellValue, ColumnSample};

use super::ColumnFetcher;

/// Reads a column from a CSV file with a header row
///
/// `database` is an optional base directory and `table` the file within it.
pub struct CsvFetcher;

impl CsvFetcher {
    fn resolve_path(conn: &ConnectionConfig, table: &str) -> PathBuf {
        if conn.database.is_empty() {
            PathBuf::from(table)
        } else {
            Path::new(&conn.database).join(table)
        }
    }
}

impl ColumnFetcher for CsvFetcher {
    fn fetch(&self, conn: &ConnectionConfig, table: &str, column: &str) -> Result<ColumnSample> {
        let path = Self::resolve_path(conn, table);
        let file = File::open(&path)
            .map_err(|e| ParityError::fetch(format!("Failed to open {}: {}", path.display(), e)))?;
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let headers = csv_reader
            .headers()
            .map_err(|e| ParityError::fetch(format!("Failed to read CSV headers: {}", e)))?;
        let index = headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == column)
            .ok_or_else(|| {
                ParityError::fetch(format!(
                    "column '{}' not found in {}",
                    column,
                    path.display()
                ))
            })?;

        let mut sample = ColumnSample::new(column);
        for (line_num, result) in csv_reader.records().enumerate() {
            // +2 for 1-indexing and header
            let record = result.map_err(|e| {
                ParityError::fetch(format!("Failed to read CSV row {}: {}", line_num + 2, e))
            })?;
            // Short rows are missing the value
            let value = record
                .get(index)
                .map(CellValue::parse_text)
                .unwrap_or(CellValue::Null);
            sample.push(value);
        }

        Ok(sample)
    }

    fn supports(&self, family: EngineFamily) -> bool {
        family == EngineFamily::Csv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &Path, name: &str, body: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(body.as_bytes()).unwrap();
    }

    #[test]
    fn test_fetch_column_from_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "orders.csv", "id,status\n1,open\n2,\n3,closed\n4\n");

        let conn = ConnectionConfig::new(EngineFamily::Csv)
            .with_database(dir.path().to_string_lossy());
        let sample = CsvFetcher.fetch(&conn, "orders.csv", "status").unwrap();

        assert_eq!(
            sample.values,
            vec![
                CellValue::from("open"),
                CellValue::Null,
                CellValue::from("closed"),
                CellValue::Null,
            ]
        );
    }

    #[test]
    fn test_distinct_raw_text_stays_distinct() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "zips.csv",
            "zip\n00501\n501\n1.0\n1\nTRUE\ntrue\n\" a\"\na\n",
        );

        let conn = ConnectionConfig::new(EngineFamily::Csv)
            .with_database(dir.path().to_string_lossy());
        let sample = CsvFetcher.fetch(&conn, "zips.csv", "zip").unwrap();
        let table = crate::reconcile::reconcile(&sample, &sample);

        assert_eq!(table.len(), 8);
        assert_eq!(sample.values[0], CellValue::from("00501"));
        assert_eq!(sample.values[0].display(), "00501");
        assert_eq!(sample.values[1], CellValue::Int(501));
        assert_eq!(sample.values[6], CellValue::from(" a"));
    }

    #[test]
    fn test_header_with_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "excel.csv", "\u{feff}id,status\n1,open\n");

        let conn = ConnectionConfig::new(EngineFamily::Csv)
            .with_database(dir.path().to_string_lossy());
        let sample = CsvFetcher.fetch(&conn, "excel.csv", "id").unwrap();

        assert_eq!(sample.values, vec![CellValue::Int(1)]);
    }

    #[test]
    fn test_missing_column_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "orders.csv", "id\n1\n");

        let conn = ConnectionConfig::new(EngineFamily::Csv)
            .with_database(dir.path().to_string_lossy());
        let err = CsvFetcher.fetch(&conn, "orders.csv", "status").unwrap_err();

        assert!(err.is_fetch());
        assert!(err.to_string().contains("column 'status' not found"));
    }
}
