//! Fetch layer: read a single column from a data source

mod csv;
mod odbc;
mod sqlite;

use tracing::info;

use crate::config::{ConnectionConfig, EngineFamily};
use crate::error::{ParityError, Result};
use crate::model::ColumnSample;

pub use self::csv::CsvFetcher;
pub use self::odbc::{connection_string, OdbcFetcher};
pub use self::sqlite::SqliteFetcher;

/// Trait for reading one column of one table
pub trait ColumnFetcher: Send + Sync {
    /// Read every value of `column` in `table`, nulls included
    fn fetch(&self, conn: &ConnectionConfig, table: &str, column: &str) -> Result<ColumnSample>;

    /// Check if this fetcher can read from the given engine family
    fn supports(&self, family: EngineFamily) -> bool;
}

/// Factory for choosing a fetcher by engine family
pub struct FetcherFactory {
    fetchers: Vec<Box<dyn ColumnFetcher>>,
}

impl Default for FetcherFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl FetcherFactory {
    /// Create a new factory with all supported fetchers
    pub fn new() -> Self {
        Self {
            fetchers: vec![
                Box::new(CsvFetcher),
                Box::new(SqliteFetcher),
                Box::new(OdbcFetcher::new()),
            ],
        }
    }

    /// Get a fetcher for the given engine family
    pub fn get_fetcher(&self, family: EngineFamily) -> Result<&dyn ColumnFetcher> {
        self.fetchers
            .iter()
            .find(|f| f.supports(family))
            .map(|f| f.as_ref())
            .ok_or_else(|| ParityError::UnsupportedEngine(family.to_string()))
    }

    /// Fetch a column using the appropriate fetcher
    pub fn fetch(&self, conn: &ConnectionConfig, table: &str, column: &str) -> Result<ColumnSample> {
        let fetcher = self.get_fetcher(conn.engine_family)?;
        let sample = fetcher.fetch(conn, table, column)?;
        info!(
            engine = %conn.engine_family,
            table,
            column,
            rows = sample.len(),
            nulls = sample.null_count(),
            "fetched column"
        );
        Ok(sample)
    }
}

/// Fetch a column with the default factory
pub fn fetch(conn: &ConnectionConfig, table: &str, column: &str) -> Result<ColumnSample> {
    FetcherFactory::new().fetch(conn, table, column)
}

/// Query for a single column. Names are passed through untouched; a bad
/// name is reported by the data source.
pub fn select_column_sql(table: &str, column: &str) -> String {
    format!("SELECT {} FROM {}", column, table)
}
