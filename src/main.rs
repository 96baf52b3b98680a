//! colparity - value-count parity check between two table columns

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::Level;

use colparity::config::{
    Config, ConnectionConfig, EngineFamily, OutputFormat, RowOrder, SideConfig,
};
use colparity::output::render_to_stdout;
use colparity::ParityError;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliEngine {
    Postgresql,
    Mysql,
    Mssql,
    Sqlite,
    Csv,
}

impl From<CliEngine> for EngineFamily {
    fn from(e: CliEngine) -> Self {
        match e {
            CliEngine::Postgresql => EngineFamily::Postgresql,
            CliEngine::Mysql => EngineFamily::Mysql,
            CliEngine::Mssql => EngineFamily::Mssql,
            CliEngine::Sqlite => EngineFamily::Sqlite,
            CliEngine::Csv => EngineFamily::Csv,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
    Html,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Html => OutputFormat::Html,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliRowOrder {
    FirstSeen,
    Value,
    SourceCount,
}

impl From<CliRowOrder> for RowOrder {
    fn from(o: CliRowOrder) -> Self {
        match o {
            CliRowOrder::FirstSeen => RowOrder::FirstSeen,
            CliRowOrder::Value => RowOrder::Value,
            CliRowOrder::SourceCount => RowOrder::SourceCountDesc,
        }
    }
}

/// Compare value counts of a column in a source table and a target table
#[derive(Parser, Debug)]
#[command(name = "colparity")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON run file; command-line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source engine family
    #[arg(long, value_enum)]
    source_engine: Option<CliEngine>,

    /// Source host
    #[arg(long)]
    source_host: Option<String>,

    /// Source port (engine default when omitted)
    #[arg(long)]
    source_port: Option<u16>,

    /// Source database name (file path for sqlite, base directory for csv)
    #[arg(long)]
    source_database: Option<String>,

    /// Source username
    #[arg(long)]
    source_user: Option<String>,

    /// Source password
    #[arg(long, env = "COLPARITY_SOURCE_PASSWORD", hide_env_values = true)]
    source_password: Option<String>,

    /// Source table
    #[arg(long)]
    source_table: Option<String>,

    /// Source column(s) to compare (comma-separated)
    #[arg(long, value_delimiter = ',')]
    source_column: Vec<String>,

    /// ODBC driver name for the source
    #[arg(long)]
    source_odbc_driver: Option<String>,

    /// Target engine family
    #[arg(long, value_enum)]
    target_engine: Option<CliEngine>,

    /// Target host
    #[arg(long)]
    target_host: Option<String>,

    /// Target port (engine default when omitted)
    #[arg(long)]
    target_port: Option<u16>,

    /// Target database name (file path for sqlite, base directory for csv)
    #[arg(long)]
    target_database: Option<String>,

    /// Target username
    #[arg(long)]
    target_user: Option<String>,

    /// Target password
    #[arg(long, env = "COLPARITY_TARGET_PASSWORD", hide_env_values = true)]
    target_password: Option<String>,

    /// Target table
    #[arg(long)]
    target_table: Option<String>,

    /// Target column(s), paired in order with the source columns; defaults to the source names
    #[arg(long, value_delimiter = ',')]
    target_column: Vec<String>,

    /// ODBC driver name for the target
    #[arg(long)]
    target_odbc_driver: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Row order in each comparison table
    #[arg(long, value_enum)]
    sort: Option<CliRowOrder>,

    /// Also write the report to this xlsx file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Only show values whose counts differ
    #[arg(long)]
    mismatches_only: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log debug details to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Log line format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

struct SideArgs {
    engine: Option<CliEngine>,
    host: Option<String>,
    port: Option<u16>,
    database: Option<String>,
    user: Option<String>,
    password: Option<String>,
    table: Option<String>,
    columns: Vec<String>,
    odbc_driver: Option<String>,
}

impl SideArgs {
    fn apply(self, side: &mut SideConfig) {
        let conn: &mut ConnectionConfig = &mut side.connection;
        if let Some(engine) = self.engine {
            conn.engine_family = engine.into();
        }
        if let Some(host) = self.host {
            conn.host = host;
        }
        if conn.host.is_empty() {
            conn.host = "localhost".to_string();
        }
        if self.port.is_some() {
            conn.port = self.port;
        }
        if let Some(database) = self.database {
            conn.database = database;
        }
        if let Some(user) = self.user {
            conn.username = user;
        }
        if let Some(password) = self.password {
            conn.password = password;
        }
        if self.odbc_driver.is_some() {
            conn.odbc_driver = self.odbc_driver;
        }
        if let Some(table) = self.table {
            side.table = table;
        }
        if !self.columns.is_empty() {
            side.columns = self.columns;
        }
    }
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("Failed to load run file: {}", path.display()))?,
            None => Config::default(),
        };

        SideArgs {
            engine: self.source_engine,
            host: self.source_host,
            port: self.source_port,
            database: self.source_database,
            user: self.source_user,
            password: self.source_password,
            table: self.source_table,
            columns: self.source_column,
            odbc_driver: self.source_odbc_driver,
        }
        .apply(&mut config.source);

        SideArgs {
            engine: self.target_engine,
            host: self.target_host,
            port: self.target_port,
            database: self.target_database,
            user: self.target_user,
            password: self.target_password,
            table: self.target_table,
            columns: self.target_column,
            odbc_driver: self.target_odbc_driver,
        }
        .apply(&mut config.target);

        if let Some(format) = self.format {
            config.output_format = format.into();
        }
        if let Some(sort) = self.sort {
            config.row_order = sort.into();
        }
        if self.export.is_some() {
            config.export_path = self.export;
        }
        config.mismatches_only |= self.mismatches_only;
        config.no_color |= self.no_color;

        Ok(config)
    }
}

fn setup_logging(verbose: bool, format: LogFormat) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == LogFormat::Json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(all_matched) => {
            if all_matched {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1) // Mismatches found
            }
        }
        Err(e) => {
            match e.downcast_ref::<ParityError>() {
                // Connectivity and query failures are shown as the driver reported them
                Some(fetch_err) if fetch_err.is_fetch() => match fetch_err.side() {
                    Some(side) => eprintln!("Error: {} ({})", fetch_err, side),
                    None => eprintln!("Error: {}", fetch_err),
                },
                _ => eprintln!("Error: validation failed: {:#}", e),
            }
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.log_format);

    let config = cli.into_config()?;
    tracing::debug!(?config, "resolved configuration");

    let report = colparity::run(&config)?;

    render_to_stdout(
        &report,
        config.output_format,
        config.mismatches_only,
        !config.no_color,
    )
    .context("Failed to render report")?;

    Ok(report.all_matched())
}
