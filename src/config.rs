//! Configuration handling for colparity

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ParityError, Result};
use crate::reconcile::ColumnPair;

/// Output format for parity reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Html,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Order of rows in a comparison table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowOrder {
    /// Source values as first seen, then target-only values
    #[default]
    FirstSeen,
    /// Ascending by value
    Value,
    /// Most frequent source values first
    SourceCountDesc,
}

impl std::str::FromStr for RowOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first-seen" => Ok(RowOrder::FirstSeen),
            "value" => Ok(RowOrder::Value),
            "source-count" | "source-count-desc" => Ok(RowOrder::SourceCountDesc),
            _ => Err(format!("Unknown row order: {}", s)),
        }
    }
}

/// Kind of data source a side is read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineFamily {
    #[default]
    Postgresql,
    Mysql,
    Mssql,
    Sqlite,
    Csv,
}

impl EngineFamily {
    /// Whether this family is reached through ODBC
    pub fn is_odbc(self) -> bool {
        matches!(
            self,
            EngineFamily::Postgresql | EngineFamily::Mysql | EngineFamily::Mssql
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EngineFamily::Postgresql => "postgresql",
            EngineFamily::Mysql => "mysql",
            EngineFamily::Mssql => "mssql",
            EngineFamily::Sqlite => "sqlite",
            EngineFamily::Csv => "csv",
        }
    }
}

impl std::fmt::Display for EngineFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EngineFamily {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Ok(EngineFamily::Postgresql),
            "mysql" => Ok(EngineFamily::Mysql),
            "mssql" | "sqlserver" => Ok(EngineFamily::Mssql),
            "sqlite" => Ok(EngineFamily::Sqlite),
            "csv" => Ok(EngineFamily::Csv),
            _ => Err(format!("Unknown engine family: {}", s)),
        }
    }
}

/// How to reach one data source
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub engine_family: EngineFamily,
    pub host: String,
    pub port: Option<u16>,
    /// Database name; the file path for sqlite, a base directory for csv
    pub database: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Override the ODBC driver name used for the engine family
    pub odbc_driver: Option<String>,
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("engine_family", &self.engine_family)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"***")
            .field("odbc_driver", &self.odbc_driver)
            .finish()
    }
}

impl ConnectionConfig {
    pub fn new(engine_family: EngineFamily) -> Self {
        Self {
            engine_family,
            host: "localhost".to_string(),
            ..Default::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_odbc_driver(mut self, driver: impl Into<String>) -> Self {
        self.odbc_driver = Some(driver.into());
        self
    }
}

/// Connection, table and columns for one side of the comparison
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SideConfig {
    pub connection: ConnectionConfig,
    pub table: String,
    pub columns: Vec<String>,
}

impl SideConfig {
    pub fn new(connection: ConnectionConfig, table: impl Into<String>) -> Self {
        Self {
            connection,
            table: table.into(),
            columns: Vec::new(),
        }
    }

    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    /// Label used in reports, e.g. `postgresql:sales/orders`
    pub fn label(&self) -> String {
        if self.connection.database.is_empty() {
            format!("{}:{}", self.connection.engine_family, self.table)
        } else {
            format!(
                "{}:{}/{}",
                self.connection.engine_family, self.connection.database, self.table
            )
        }
    }
}

/// Configuration for a parity run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SideConfig,
    pub target: SideConfig,
    pub output_format: OutputFormat,
    pub row_order: RowOrder,
    /// Write an xlsx report here
    pub export_path: Option<PathBuf>,
    /// Only show rows whose counts differ
    pub mismatches_only: bool,
    /// Disable colors in terminal output
    pub no_color: bool,
}

impl Config {
    /// Create a new Config for a source and a target
    pub fn new(source: SideConfig, target: SideConfig) -> Self {
        Self {
            source,
            target,
            ..Default::default()
        }
    }

    /// Load a run description from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| ParityError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_row_order(mut self, order: RowOrder) -> Self {
        self.row_order = order;
        self
    }

    pub fn with_export_path(mut self, path: PathBuf) -> Self {
        self.export_path = Some(path);
        self
    }

    pub fn with_mismatches_only(mut self, mismatches_only: bool) -> Self {
        self.mismatches_only = mismatches_only;
        self
    }

    /// Pairs of columns to compare
    ///
    /// Target columns are matched to source columns by position in the
    /// caller's lists. Without target columns each source column is compared
    /// with the target column of the same name.
    pub fn column_pairs(&self) -> Result<Vec<ColumnPair>> {
        let source = &self.source.columns;
        let target = &self.target.columns;

        if source.is_empty() {
            return Err(ParityError::Config("no source column given".into()));
        }
        if self.source.table.is_empty() || self.target.table.is_empty() {
            return Err(ParityError::Config(
                "both a source and a target table are required".into(),
            ));
        }
        if target.is_empty() {
            return Ok(source.iter().map(ColumnPair::same).collect());
        }
        if source.len() != target.len() {
            return Err(ParityError::Config(format!(
                "{} source column(s) but {} target column(s)",
                source.len(),
                target.len()
            )));
        }

        Ok(source
            .iter()
            .zip(target)
            .map(|(s, t)| ColumnPair::new(s, t))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(source: &[&str], target: &[&str]) -> Config {
        let side = |cols: &[&str]| {
            SideConfig::new(ConnectionConfig::new(EngineFamily::Sqlite), "t")
                .with_columns(cols.iter().map(|c| c.to_string()).collect())
        };
        Config::new(side(source), side(target))
    }

    #[test]
    fn test_pairs_by_name_when_target_omitted() {
        let pairs = config(&["a", "b"], &[]).column_pairs().unwrap();
        assert_eq!(pairs, vec![ColumnPair::same("a"), ColumnPair::same("b")]);
    }

    #[test]
    fn test_explicit_pairs() {
        let pairs = config(&["a", "b"], &["x", "y"]).column_pairs().unwrap();
        assert_eq!(pairs[1], ColumnPair::new("b", "y"));
    }

    #[test]
    fn test_pair_errors() {
        assert!(config(&[], &[]).column_pairs().is_err());
        assert!(config(&["a", "b"], &["x"]).column_pairs().is_err());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("PG".parse::<EngineFamily>(), Ok(EngineFamily::Postgresql));
        assert_eq!("sqlserver".parse::<EngineFamily>(), Ok(EngineFamily::Mssql));
        assert!("oracle".parse::<EngineFamily>().is_err());
        assert_eq!("html".parse::<OutputFormat>(), Ok(OutputFormat::Html));
        assert_eq!("source-count".parse::<RowOrder>(), Ok(RowOrder::SourceCountDesc));
    }

    #[test]
    fn test_debug_hides_password() {
        let conn = ConnectionConfig::new(EngineFamily::Mysql).with_credentials("app", "hunter2");
        let debug = format!("{:?}", conn);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("app"));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "source": {
                "connection": {"engine_family": "csv", "database": "/data"},
                "table": "old.csv",
                "columns": ["status"]
            },
            "target": {
                "connection": {"engine_family": "sqlite", "database": "new.db"},
                "table": "orders"
            },
            "row_order": "value"
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.source.connection.engine_family, EngineFamily::Csv);
        assert_eq!(config.row_order, RowOrder::Value);
        assert_eq!(config.output_format, OutputFormat::Terminal);
        assert_eq!(config.column_pairs().unwrap(), vec![ColumnPair::same("status")]);
        assert_eq!(config.target.label(), "sqlite:new.db/orders");
    }
}
