//! Output formatting for parity reports

mod html;
mod json;
mod style;
mod terminal;
mod xlsx;

use std::io::IsTerminal;

use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::config::OutputFormat;
use crate::error::Result;
use crate::reconcile::{ColumnSection, ComparisonRow, ParityReport};

pub use html::HtmlOutput;
pub use json::JsonOutput;
pub use style::{display_hint, DisplayHint};
pub use terminal::TerminalOutput;
pub use xlsx::export_xlsx;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render a report to a writer
    fn render(&self, report: &ParityReport, writer: &mut dyn WriteColor) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat, mismatches_only: bool) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new(mismatches_only)),
            OutputFormat::Json => Box::new(JsonOutput::new(mismatches_only)),
            OutputFormat::Html => Box::new(HtmlOutput::new(mismatches_only)),
        }
    }
}

/// Rows of a section to display
fn visible_rows(
    section: &ColumnSection,
    mismatches_only: bool,
) -> impl Iterator<Item = &ComparisonRow> {
    section
        .rows
        .iter()
        .filter(move |row| !mismatches_only || !row.matched)
}

/// Render a report to stdout, colored when stdout is a terminal
pub fn render_to_stdout(
    report: &ParityReport,
    format: OutputFormat,
    mismatches_only: bool,
    color: bool,
) -> Result<()> {
    let choice = if color && std::io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let formatter = OutputFactory::create(format, mismatches_only);
    let mut stdout = StandardStream::stdout(choice);
    formatter.render(report, &mut stdout)
}
