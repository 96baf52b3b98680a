//! PostgreSQL, MySQL and SQL Server sources over ODBC
//!
//! **Requirements:**
//! - Build with the `odbc` feature
//! - An ODBC driver manager (unixODBC on Linux/macOS) and the driver for the
//!   engine family must be installed:
//!   - PostgreSQL: `psqlODBC` (`PostgreSQL Unicode`)
//!   - MySQL: `MySQL Connector/ODBC` (`MySQL ODBC 8.0 Unicode Driver`)
//!   - SQL Server: `msodbcsql17` (`ODBC Driver 17 for SQL Server`)
//!
//! SQL Server connections without a username use integrated authentication.

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::{ConnectionConfig, EngineFamily};
use crate::error::{ParityError, Result};
use crate::model::{CellValue, ColumnSample};

use super::ColumnFetcher;

/// How the text of an ODBC column is turned into a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(feature = "odbc"), allow(dead_code))]
enum TextKind {
    Int,
    Float,
    Bool,
    Date,
    DateTime,
    /// Kept as text, including decimals so no precision is lost
    Text,
}

/// Upper bound on the bytes read for one text value
#[cfg_attr(not(feature = "odbc"), allow(dead_code))]
const MAX_TEXT_BYTES: usize = 65_536;

/// A value longer than the read buffer would be cut to a shared prefix and
/// miscounted, so it fails the fetch instead.
#[cfg_attr(not(feature = "odbc"), allow(dead_code))]
fn truncation_error(column: &str, indicator: Option<usize>) -> ParityError {
    let size = match indicator {
        Some(len) => format!("{} bytes", len),
        None => "unknown length".to_string(),
    };
    ParityError::fetch(format!(
        "value in column '{}' is longer than the {} byte read buffer ({})",
        column, MAX_TEXT_BYTES, size
    ))
}

fn default_driver(family: EngineFamily) -> &'static str {
    match family {
        EngineFamily::Postgresql => "PostgreSQL Unicode",
        EngineFamily::Mysql => "MySQL ODBC 8.0 Unicode Driver",
        _ => "ODBC Driver 17 for SQL Server",
    }
}

/// Quote an attribute value if it contains characters with meaning in a
/// connection string. `}` is escaped by doubling.
fn odbc_value(s: &str) -> String {
    if s.contains([';', '{', '}', '=']) || s.starts_with(' ') || s.ends_with(' ') {
        format!("{{{}}}", s.replace('}', "}}"))
    } else {
        s.to_string()
    }
}

fn build_connection_string(conn: &ConnectionConfig, password: &str) -> String {
    let family = conn.engine_family;
    let driver = conn
        .odbc_driver
        .as_deref()
        .unwrap_or_else(|| default_driver(family));

    let mut parts = vec![format!("Driver={{{}}}", driver)];

    match family {
        EngineFamily::Mssql => {
            let server = match conn.port {
                Some(port) => format!("{},{}", conn.host, port),
                None => conn.host.clone(),
            };
            parts.push(format!("Server={}", odbc_value(&server)));
            parts.push(format!("Database={}", odbc_value(&conn.database)));
            if conn.username.is_empty() {
                parts.push("Trusted_Connection=yes".to_string());
            } else {
                parts.push(format!("UID={}", odbc_value(&conn.username)));
                parts.push(format!("PWD={}", odbc_value(password)));
            }
        }
        _ => {
            let port = conn.port.unwrap_or(match family {
                EngineFamily::Mysql => 3306,
                _ => 5432,
            });
            parts.push(format!("Server={}", odbc_value(&conn.host)));
            parts.push(format!("Port={}", port));
            parts.push(format!("Database={}", odbc_value(&conn.database)));
            parts.push(format!("Uid={}", odbc_value(&conn.username)));
            parts.push(format!("Pwd={}", odbc_value(password)));
        }
    }

    let mut out = parts.join(";");
    out.push(';');
    out
}

/// ODBC connection string for a connection
pub fn connection_string(conn: &ConnectionConfig) -> String {
    build_connection_string(conn, &conn.password)
}

/// Connection string safe to log
fn redacted_connection_string(conn: &ConnectionConfig) -> String {
    build_connection_string(conn, "***")
}

#[cfg_attr(not(feature = "odbc"), allow(dead_code))]
fn parse_typed_text(text: Option<&str>, kind: TextKind) -> CellValue {
    let Some(text) = text else {
        return CellValue::Null;
    };

    let parsed = match kind {
        TextKind::Int => text.trim().parse::<i64>().ok().map(CellValue::Int),
        TextKind::Float => text.trim().parse::<f64>().ok().map(CellValue::Float),
        TextKind::Bool => match text.trim() {
            "1" => Some(CellValue::Bool(true)),
            "0" => Some(CellValue::Bool(false)),
            other if other.eq_ignore_ascii_case("true") => Some(CellValue::Bool(true)),
            other if other.eq_ignore_ascii_case("false") => Some(CellValue::Bool(false)),
            _ => None,
        },
        TextKind::Date => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .ok()
            .map(CellValue::Date),
        TextKind::DateTime => NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%d %H:%M:%S%.f")
            .ok()
            .map(CellValue::DateTime),
        TextKind::Text => None,
    };

    parsed.unwrap_or_else(|| CellValue::from(text))
}

/// Reads a column through the ODBC driver for the engine family
#[derive(Default)]
pub struct OdbcFetcher;

impl OdbcFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl ColumnFetcher for OdbcFetcher {
    #[cfg(feature = "odbc")]
    fn fetch(&self, conn: &ConnectionConfig, table: &str, column: &str) -> Result<ColumnSample> {
        driver::fetch(conn, table, column)
    }

    #[cfg(not(feature = "odbc"))]
    fn fetch(&self, conn: &ConnectionConfig, _table: &str, _column: &str) -> Result<ColumnSample> {
        tracing::debug!(
            connection = %redacted_connection_string(conn),
            "odbc support not compiled in"
        );
        Err(ParityError::UnsupportedEngine(format!(
            "{} (rebuild with the `odbc` feature)",
            conn.engine_family
        )))
    }

    fn supports(&self, family: EngineFamily) -> bool {
        family.is_odbc()
    }
}

#[cfg(feature = "odbc")]
mod driver {
    use odbc_api::{
        buffers::TextRowSet, ConnectionOptions, Cursor, DataType, Environment, ResultSetMetadata,
    };
    use tracing::debug;

    use super::*;
    use crate::fetch::select_column_sql;

    fn driver_error(context: &str, e: odbc_api::Error) -> ParityError {
        ParityError::fetch(format!("{}: {}", context, e))
    }

    fn text_kind(data_type: DataType) -> TextKind {
        match data_type {
            DataType::Integer | DataType::SmallInt | DataType::BigInt | DataType::TinyInt => {
                TextKind::Int
            }
            DataType::Real | DataType::Double | DataType::Float { .. } => TextKind::Float,
            DataType::Bit => TextKind::Bool,
            DataType::Date => TextKind::Date,
            DataType::Timestamp { .. } => TextKind::DateTime,
            _ => TextKind::Text,
        }
    }

    pub(super) fn fetch(conn: &ConnectionConfig, table: &str, column: &str) -> Result<ColumnSample> {
        let env = Environment::new().map_err(|e| {
            driver_error("Failed to create ODBC environment (is unixODBC installed?)", e)
        })?;

        debug!(connection = %redacted_connection_string(conn), "connecting");
        let connection = env
            .connect_with_connection_string(&connection_string(conn), ConnectionOptions::default())
            .map_err(|e| driver_error(&format!("Failed to connect to {}", conn.engine_family), e))?;

        let sql = select_column_sql(table, column);
        let mut sample = ColumnSample::new(column);

        let Some(mut cursor) = connection
            .execute(&sql, ())
            .map_err(|e| driver_error(&format!("Query failed ({})", sql), e))?
        else {
            return Ok(sample);
        };

        let num_cols = cursor
            .num_result_cols()
            .map_err(|e| driver_error("Failed to get column count", e))?;
        if num_cols != 1 {
            return Err(ParityError::fetch(format!(
                "query returned {} columns, expected 1: {}",
                num_cols, sql
            )));
        }

        let kind = cursor
            .col_data_type(1)
            .map(text_kind)
            .map_err(|e| driver_error("Failed to get column type", e))?;

        let mut buffers = TextRowSet::for_cursor(1000, &mut cursor, Some(MAX_TEXT_BYTES))
            .map_err(|e| driver_error("Failed to create row buffer", e))?;
        let mut row_cursor = cursor
            .bind_buffer(&mut buffers)
            .map_err(|e| driver_error("Failed to bind buffer", e))?;

        while let Some(batch) = row_cursor
            .fetch_with_truncation_check(true)
            .map_err(|e| match e {
                odbc_api::Error::TooLargeValueForBuffer { indicator, .. } => {
                    truncation_error(column, indicator)
                }
                other => driver_error("Failed to fetch rows", other),
            })?
        {
            for row_idx in 0..batch.num_rows() {
                let text = batch
                    .at(0, row_idx)
                    .map(|bytes| String::from_utf8_lossy(bytes).into_owned());
                sample.push(parse_typed_text(text.as_deref(), kind));
            }
        }

        Ok(sample)
    }
}
