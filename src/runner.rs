//! One parity run: fetch both sides, reconcile, export

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::fetch::FetcherFactory;
use crate::output::export_xlsx;
use crate::reconcile::{reconcile_pairs, ParityReport};

/// Run a parity check with the default fetchers
pub fn run(config: &Config) -> Result<ParityReport> {
    run_with(config, &FetcherFactory::new())
}

/// Run a parity check with the given fetchers
///
/// Nothing is returned or exported unless every column pair was fetched and
/// reconciled.
pub fn run_with(config: &Config, factory: &FetcherFactory) -> Result<ParityReport> {
    let pairs = config.column_pairs()?;
    let source = &config.source;
    let target = &config.target;

    info!(
        source = %source.label(),
        target = %target.label(),
        pairs = pairs.len(),
        "starting parity check"
    );

    let sections = reconcile_pairs(
        &pairs,
        config.row_order,
        |column| factory.fetch(&source.connection, &source.table, column),
        |column| factory.fetch(&target.connection, &target.table, column),
    )?;

    let report = ParityReport::new(source.label(), target.label()).with_sections(sections);

    if let Some(path) = &config.export_path {
        export_xlsx(&report, path)?;
    }

    info!(
        mismatched = report.mismatch_count(),
        all_matched = report.all_matched(),
        "parity check finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConnectionConfig, EngineFamily, SideConfig};
    use crate::error::{ParityError, Side};
    use std::path::Path;

    fn csv_side(dir: &Path, file: &str, columns: &[&str]) -> SideConfig {
        SideConfig::new(
            ConnectionConfig::new(EngineFamily::Csv).with_database(dir.to_string_lossy()),
            file,
        )
        .with_columns(columns.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_run_csv_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("old.csv"), "id,status\n1,a\n2,a\n3,b\n").unwrap();
        std::fs::write(dir.path().join("new.csv"), "id,state\n1,a\n2,b\n3,b\n").unwrap();

        let config = Config::new(
            csv_side(dir.path(), "old.csv", &["id", "status"]),
            csv_side(dir.path(), "new.csv", &["id", "state"]),
        )
        .with_export_path(dir.path().join("report.xlsx"));

        let report = run(&config).unwrap();

        assert_eq!(report.sections.len(), 2);
        assert!(report.sections[0].summary.all_matched());
        assert_eq!(report.sections[1].summary.mismatched, 2);
        assert!(!report.all_matched());
        assert!(dir.path().join("report.xlsx").exists());
    }

    #[test]
    fn test_fetch_failure_skips_export() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("old.csv"), "status\na\n").unwrap();

        let config = Config::new(
            csv_side(dir.path(), "old.csv", &["status"]),
            csv_side(dir.path(), "absent.csv", &[]),
        )
        .with_export_path(dir.path().join("report.xlsx"));

        let err = run(&config).unwrap_err();

        assert!(matches!(
            err,
            ParityError::Fetch {
                side: Some(Side::Target),
                ..
            }
        ));
        assert!(!dir.path().join("report.xlsx").exists());
    }
}
