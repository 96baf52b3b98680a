//! JSON output format

use serde::Serialize;
use termcolor::WriteColor;

use crate::error::Result;
use crate::model::CellType;
use crate::reconcile::{ComparisonRow, ComparisonSummary, ParityReport};

use super::{visible_rows, OutputFormatter};

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
    mismatches_only: bool,
}

impl JsonOutput {
    pub fn new(mismatches_only: bool) -> Self {
        Self {
            pretty: true,
            mismatches_only,
        }
    }

    pub fn compact(mismatches_only: bool) -> Self {
        Self {
            pretty: false,
            mismatches_only,
        }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new(false)
    }
}

#[derive(Serialize)]
struct JsonSection<'a> {
    source_column: &'a str,
    target_column: &'a str,
    source_type: CellType,
    target_type: CellType,
    rows: Vec<&'a ComparisonRow>,
    summary: &'a ComparisonSummary,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a str,
    target: &'a str,
    all_matched: bool,
    sections: Vec<JsonSection<'a>>,
}

impl OutputFormatter for JsonOutput {
    fn render(&self, report: &ParityReport, writer: &mut dyn WriteColor) -> Result<()> {
        let sections = report
            .sections
            .iter()
            .map(|section| JsonSection {
                source_column: &section.pair.source,
                target_column: &section.pair.target,
                source_type: section.source_type,
                target_type: section.target_type,
                rows: visible_rows(section, self.mismatches_only).collect(),
                summary: &section.summary,
            })
            .collect();

        let output = JsonReport {
            source: &report.source,
            target: &report.target,
            all_matched: report.all_matched(),
            sections,
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &output)?;
        } else {
            serde_json::to_writer(&mut *writer, &output)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RowOrder;
    use crate::model::ColumnSample;
    use crate::reconcile::{ColumnPair, ColumnSection};
    use termcolor::NoColor;

    #[test]
    fn test_json_shape() {
        let source = ColumnSample::from_values("qty", vec![Some(1i64), Some(1), None]);
        let target = ColumnSample::from_values("quantity", vec![Some(1i64), None]);
        let report = ParityReport::new("s", "t").with_sections(vec![ColumnSection::build(
            ColumnPair::new("qty", "quantity"),
            &source,
            &target,
            RowOrder::FirstSeen,
        )]);

        let mut writer = NoColor::new(Vec::new());
        JsonOutput::compact(false).render(&report, &mut writer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&writer.into_inner()).unwrap();

        assert_eq!(value["all_matched"], false);
        let section = &value["sections"][0];
        assert_eq!(section["source_column"], "qty");
        assert_eq!(section["target_column"], "quantity");
        assert_eq!(section["source_type"], "int");
        assert_eq!(
            section["rows"][0],
            serde_json::json!({"value": 1, "source_count": 2, "target_count": 1, "match": false})
        );
        assert_eq!(section["rows"][1]["value"], serde_json::Value::Null);
        assert_eq!(section["rows"][1]["match"], true);
        assert_eq!(section["summary"]["mismatched"], 1);
    }
}
