//! HTML dashboard report

use termcolor::WriteColor;

use crate::error::Result;
use crate::reconcile::{ColumnSection, ParityReport};

use super::{display_hint, visible_rows, OutputFormatter};

/// Standalone HTML page with green/red row highlighting
pub struct HtmlOutput {
    mismatches_only: bool,
}

impl HtmlOutput {
    pub fn new(mismatches_only: bool) -> Self {
        Self { mismatches_only }
    }

    fn write_section(&self, writer: &mut dyn WriteColor, section: &ColumnSection) -> Result<()> {
        let s = &section.summary;

        writeln!(writer, "  <div class=\"section\">")?;
        writeln!(
            writer,
            "    <h2>{} <span class=\"types\">{} → {}</span></h2>",
            html_escape(section.pair.to_string()),
            section.source_type,
            section.target_type
        )?;
        writeln!(writer, "    <div class=\"summary\">")?;
        writeln!(writer, "      <div class=\"stat\"><span class=\"num\">{}</span><span class=\"label\">distinct</span></div>",
            s.distinct_values)?;
        writeln!(writer, "      <div class=\"stat match\"><span class=\"num\">{}</span><span class=\"label\">matched</span></div>",
            s.matched)?;
        writeln!(writer, "      <div class=\"stat mismatch\"><span class=\"num\">{}</span><span class=\"label\">mismatched</span></div>",
            s.mismatched)?;
        writeln!(writer, "      <div class=\"stat\"><span class=\"num\">{} → {}</span><span class=\"label\">rows</span></div>",
            s.source_total, s.target_total)?;
        writeln!(writer, "    </div>")?;

        writeln!(writer, "    <table>")?;
        writeln!(writer, "      <tr><th>value</th><th>source_count</th><th>target_count</th><th>match</th></tr>")?;
        for row in visible_rows(section, self.mismatches_only) {
            let class = display_hint(row).css_class();
            writeln!(
                writer,
                "      <tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td class=\"flag\">{}</td></tr>",
                class,
                html_escape(row.value.display()),
                row.source_count,
                row.target_count,
                row.matched
            )?;
        }
        writeln!(writer, "    </table>")?;
        writeln!(writer, "  </div>")?;
        Ok(())
    }
}

impl Default for HtmlOutput {
    fn default() -> Self {
        Self::new(false)
    }
}

impl OutputFormatter for HtmlOutput {
    fn render(&self, report: &ParityReport, writer: &mut dyn WriteColor) -> Result<()> {
        let title = format!(
            "{} → {}",
            html_escape(&report.source),
            html_escape(&report.target)
        );

        writeln!(writer, "<!DOCTYPE html>")?;
        writeln!(writer, "<html lang=\"en\">")?;
        writeln!(writer, "<head>")?;
        writeln!(writer, "  <meta charset=\"UTF-8\">")?;
        writeln!(writer, "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
        writeln!(writer, "  <title>Data Validation: {}</title>", title)?;
        writeln!(writer, "  <style>")?;
        writeln!(writer, "{}", CSS_STYLES)?;
        writeln!(writer, "  </style>")?;
        writeln!(writer, "</head>")?;
        writeln!(writer, "<body>")?;

        writeln!(writer, "  <div class=\"header\">")?;
        writeln!(writer, "    <h1>Data Validation Dashboard</h1>")?;
        writeln!(writer, "    <p class=\"files\">{}</p>", title)?;
        let verdict = if report.all_matched() {
            "<p class=\"verdict match\">All value counts match</p>".to_string()
        } else {
            format!(
                "<p class=\"verdict mismatch\">{} mismatched value(s)</p>",
                report.mismatch_count()
            )
        };
        writeln!(writer, "    {}", verdict)?;
        writeln!(writer, "  </div>")?;

        for section in &report.sections {
            self.write_section(writer, section)?;
        }

        writeln!(writer, "</body>")?;
        writeln!(writer, "</html>")?;

        Ok(())
    }
}

fn html_escape(s: impl AsRef<str>) -> String {
    s.as_ref()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const CSS_STYLES: &str = r#"
    :root {
      --bg: #ffffff;
      --fg: #00008b;
      --green: #008000;
      --red: #ff0000;
      --border: #c8cbe0;
    }

    * { box-sizing: border-box; margin: 0; padding: 0; }

    body {
      font-family: system-ui, sans-serif;
      background: var(--bg);
      color: var(--fg);
      padding: 2rem;
      line-height: 1.6;
    }

    .header {
      border-bottom: 2px solid var(--border);
      padding-bottom: 1rem;
      margin-bottom: 2rem;
    }

    .header h1 { font-size: 2rem; font-weight: 600; }
    .header .files { opacity: 0.8; margin-top: 0.5rem; }
    .verdict { font-weight: 600; margin-top: 0.5rem; }
    .verdict.match { color: var(--green); }
    .verdict.mismatch { color: var(--red); }

    .section { margin-bottom: 2.5rem; }

    .section h2 {
      font-size: 1.25rem;
      margin-bottom: 1rem;
      padding-bottom: 0.5rem;
      border-bottom: 1px solid var(--border);
    }

    .section h2 .types { font-size: 0.875rem; opacity: 0.6; font-weight: 400; }

    .summary { display: flex; gap: 2rem; margin-bottom: 1rem; }

    .stat {
      display: flex;
      flex-direction: column;
      padding: 0.75rem 1rem;
      border-radius: 8px;
      background: rgba(0, 0, 139, 0.04);
    }

    .stat .num { font-size: 1.5rem; font-weight: 600; }
    .stat.match .num { color: var(--green); }
    .stat.mismatch .num { color: var(--red); }

    table { width: 100%; border-collapse: collapse; }

    th, td {
      text-align: left;
      padding: 0.5rem 0.75rem;
      border: 1px solid var(--border);
    }

    th { background: rgba(0, 0, 139, 0.06); font-weight: 600; }

    tr.match td { background: #e6f2e6; }
    tr.mismatch td { background: #ffe5e5; }
    tr.match td.flag { background: var(--green); color: #ffffff; }
    tr.mismatch td.flag { background: var(--red); color: #ffffff; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RowOrder;
    use crate::model::ColumnSample;
    use crate::reconcile::ColumnPair;
    use termcolor::NoColor;

    #[test]
    fn test_rows_carry_hint_class_and_escape_values() {
        let source = ColumnSample::from_values("note", vec!["<b>", "ok"]);
        let target = ColumnSample::from_values("note", vec!["ok"]);
        let report = ParityReport::new("a", "b").with_sections(vec![ColumnSection::build(
            ColumnPair::same("note"),
            &source,
            &target,
            RowOrder::FirstSeen,
        )]);

        let mut writer = NoColor::new(Vec::new());
        HtmlOutput::default().render(&report, &mut writer).unwrap();
        let html = String::from_utf8(writer.into_inner()).unwrap();

        assert!(html.contains("<tr class=\"mismatch\"><td>&lt;b&gt;</td><td>1</td><td>0</td>"));
        assert!(html.contains("<tr class=\"match\"><td>ok</td><td>1</td><td>1</td>"));
        assert!(html.contains("1 mismatched value(s)"));
        // whole rows are tinted, not only the match cell
        assert!(html.contains("tr.match td { background:"));
        assert!(html.contains("tr.mismatch td { background:"));
    }
}
