//! SQLite database source

use std::fmt::Write as _;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use crate::config::{ConnectionConfig, EngineFamily};
use crate::error::{ParityError, Result};
use crate::model::{CellValue, ColumnSample};

use super::{select_column_sql, ColumnFetcher};

/// Reads a column from a SQLite database file given as `database`
pub struct SqliteFetcher;

fn driver_error(e: rusqlite::Error) -> ParityError {
    ParityError::fetch(e.to_string())
}

/// Convert a SQLite value by its storage class
fn value_from_sqlite(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(i) => CellValue::Int(i),
        ValueRef::Real(f) => CellValue::Float(f),
        ValueRef::Text(bytes) => CellValue::from(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => {
            let mut hex = String::with_capacity(2 + bytes.len() * 2);
            hex.push_str("0x");
            for b in bytes {
                let _ = write!(hex, "{:02x}", b);
            }
            CellValue::from(hex)
        }
    }
}

impl ColumnFetcher for SqliteFetcher {
    fn fetch(&self, conn: &ConnectionConfig, table: &str, column: &str) -> Result<ColumnSample> {
        let db = Connection::open_with_flags(
            &conn.database,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(driver_error)?;

        let sql = select_column_sql(table, column);
        let mut stmt = db.prepare(&sql).map_err(driver_error)?;
        if stmt.column_count() != 1 {
            return Err(ParityError::fetch(format!(
                "query returned {} columns, expected 1: {}",
                stmt.column_count(),
                sql
            )));
        }

        let rows = stmt
            .query_map([], |row| row.get_ref(0).map(value_from_sqlite))
            .map_err(driver_error)?;

        let mut sample = ColumnSample::new(column);
        for value in rows {
            sample.push(value.map_err(driver_error)?);
        }

        Ok(sample)
    }

    fn supports(&self, family: EngineFamily) -> bool {
        family == EngineFamily::Sqlite
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_db(dir: &std::path::Path) -> String {
        let path = dir.join("parity.db");
        let db = Connection::open(&path).unwrap();
        db.execute_batch(
            "CREATE TABLE orders (id INTEGER, status TEXT, amount REAL, payload BLOB);
             INSERT INTO orders VALUES (1, 'open', 1.5, x'0aff');
             INSERT INTO orders VALUES (2, NULL, 2.0, NULL);
             INSERT INTO orders VALUES (3, 'open', NULL, NULL);",
        )
        .unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_fetch_keeps_nulls_and_types() {
        let dir = tempfile::tempdir().unwrap();
        let conn = ConnectionConfig::new(EngineFamily::Sqlite).with_database(seeded_db(dir.path()));

        let status = SqliteFetcher.fetch(&conn, "orders", "status").unwrap();
        assert_eq!(
            status.values,
            vec![CellValue::from("open"), CellValue::Null, CellValue::from("open")]
        );

        let amount = SqliteFetcher.fetch(&conn, "orders", "amount").unwrap();
        assert_eq!(amount.values[1], CellValue::Int(2));

        let payload = SqliteFetcher.fetch(&conn, "orders", "payload").unwrap();
        assert_eq!(payload.values[0], CellValue::from("0x0aff"));
    }

    #[test]
    fn test_bad_table_surfaces_driver_message() {
        let dir = tempfile::tempdir().unwrap();
        let conn = ConnectionConfig::new(EngineFamily::Sqlite).with_database(seeded_db(dir.path()));

        let err = SqliteFetcher.fetch(&conn, "missing", "status").unwrap_err();
        assert!(err.is_fetch());
        assert!(err.to_string().contains("no such table: missing"));
    }

    #[test]
    fn test_multi_column_expression_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let conn = ConnectionConfig::new(EngineFamily::Sqlite).with_database(seeded_db(dir.path()));

        let err = SqliteFetcher.fetch(&conn, "orders", "id, status").unwrap_err();
        assert!(err.to_string().contains("expected 1"));
    }
}
