//! Colored terminal output

use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{ColorSpec, WriteColor};

use crate::error::Result;
use crate::reconcile::{ColumnSection, ParityReport};

use super::{display_hint, visible_rows, OutputFormatter};

const HEADERS: [&str; 4] = ["value", "source_count", "target_count", "match"];

/// Terminal output with colors
pub struct TerminalOutput {
    mismatches_only: bool,
}

impl TerminalOutput {
    pub fn new(mismatches_only: bool) -> Self {
        Self { mismatches_only }
    }

    fn write_header(&self, report: &ParityReport, writer: &mut dyn WriteColor) -> Result<()> {
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(writer, " colparity: {} → {}", report.source, report.target)?;
        writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_section(&self, section: &ColumnSection, writer: &mut dyn WriteColor) -> Result<()> {
        writeln!(
            writer,
            "Column: {} ({} → {})",
            section.pair, section.source_type, section.target_type
        )?;

        let rows: Vec<_> = visible_rows(section, self.mismatches_only).collect();
        if rows.is_empty() {
            if section.rows.is_empty() {
                writeln!(writer, "  No values on either side.")?;
            } else {
                writeln!(writer, "  All value counts match.")?;
            }
        } else {
            let mut builder = Builder::default();
            builder.push_record(HEADERS.iter().map(|h| h.to_string()));
            for row in &rows {
                builder.push_record([
                    single_line(&row.value.display()),
                    row.source_count.to_string(),
                    row.target_count.to_string(),
                    row.matched.to_string(),
                ]);
            }
            let mut table = builder.build();
            table.with(Style::sharp());
            let rendered = table.to_string();

            // Lines: top border, header, separator, one per row, bottom border
            for (i, line) in rendered.lines().enumerate() {
                match i.checked_sub(3).and_then(|r| rows.get(r)) {
                    Some(row) => {
                        writer.set_color(ColorSpec::new().set_fg(Some(display_hint(row).color())))?;
                        write!(writer, "{}", line)?;
                        writer.reset()?;
                        writeln!(writer)?;
                    }
                    None => writeln!(writer, "{}", line)?,
                }
            }
        }

        let s = &section.summary;
        writeln!(
            writer,
            "Summary: {} distinct, {} matched, {} mismatched ({} source-only, {} target-only); {} → {} rows",
            s.distinct_values,
            s.matched,
            s.mismatched,
            s.source_only,
            s.target_only,
            s.source_total,
            s.target_total
        )?;
        writeln!(writer)?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new(false)
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(&self, report: &ParityReport, writer: &mut dyn WriteColor) -> Result<()> {
        self.write_header(report, writer)?;

        for section in &report.sections {
            self.write_section(section, writer)?;
        }

        if report.all_matched() {
            writeln!(writer, "All value counts match.")?;
        } else {
            writeln!(
                writer,
                "{} mismatched value(s) across {} column(s).",
                report.mismatch_count(),
                report.sections.iter().filter(|s| !s.summary.all_matched()).count()
            )?;
        }

        Ok(())
    }
}

/// Escape line breaks so each value takes exactly one table line
fn single_line(text: &str) -> String {
    text.replace('\r', "\\r").replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RowOrder;
    use crate::model::ColumnSample;
    use crate::reconcile::{ColumnPair, ColumnSection};
    use termcolor::NoColor;

    fn report() -> ParityReport {
        let source = ColumnSample::from_values("status", vec!["open", "open", "closed"]);
        let target = ColumnSample::from_values("status", vec!["open", "closed"]);
        ParityReport::new("csv:old.csv", "csv:new.csv").with_sections(vec![ColumnSection::build(
            ColumnPair::same("status"),
            &source,
            &target,
            RowOrder::FirstSeen,
        )])
    }

    fn render(output: &TerminalOutput, report: &ParityReport) -> String {
        let mut writer = NoColor::new(Vec::new());
        output.render(report, &mut writer).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_render_table_and_summary() {
        let text = render(&TerminalOutput::default(), &report());

        assert!(text.contains("colparity: csv:old.csv → csv:new.csv"));
        assert!(text.contains("Column: status (string → string)"));
        assert!(text.contains("│ open   │ 2            │ 1            │ false │"));
        assert!(text.contains("│ closed │ 1            │ 1            │ true  │"));
        assert!(text.contains("Summary: 2 distinct, 1 matched, 1 mismatched"));
        assert!(text.contains("1 mismatched value(s) across 1 column(s)."));
    }

    #[test]
    fn test_mismatches_only_hides_matching_rows() {
        let text = render(&TerminalOutput::new(true), &report());

        assert!(text.contains("│ open "));
        assert!(!text.contains("│ closed "));
        // Summary still covers the full table
        assert!(text.contains("Summary: 2 distinct"));
    }

    #[test]
    fn test_wide_characters_keep_columns_aligned() {
        let source = ColumnSample::from_values("city", vec!["東京", "a\nb"]);
        let report = ParityReport::new("s", "t").with_sections(vec![ColumnSection::build(
            ColumnPair::same("city"),
            &source,
            &source,
            RowOrder::FirstSeen,
        )]);
        let text = render(&TerminalOutput::default(), &report);

        // 東京 is four columns wide, the same as "a\\nb"
        assert!(text.contains("│ 東京  │ 1            │ 1            │ true  │"));
        assert!(text.contains("│ a\\nb  │ 1            │ 1            │ true  │"));
    }

    #[test]
    fn test_colored_rows() {
        let mut buffer = termcolor::Buffer::ansi();
        TerminalOutput::default().render(&report(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer.into_inner()).unwrap();

        // red for the mismatch, green for the match
        assert!(text.contains("\x1b[31m"));
        assert!(text.contains("\x1b[32m"));
    }
}
