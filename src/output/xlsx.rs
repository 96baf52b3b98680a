//! Spreadsheet export
//!
//! All sections go to one worksheet, stacked top to bottom: a title cell
//! naming the source column, a header row, the comparison rows, then a blank
//! row before the next section.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, Workbook, Worksheet, XlsxError};
use tracing::info;

use crate::error::{ParityError, Result};
use crate::model::CellValue;
use crate::reconcile::{ComparisonRow, ParityReport};

use super::display_hint;

const SHEET_NAME: &str = "Validation";
const HEADERS: [&str; 4] = ["value", "source_count", "target_count", "match"];

/// Largest integer Excel stores without losing precision
const MAX_EXACT_INT: i64 = 1 << 53;

fn xlsx_error(e: XlsxError) -> ParityError {
    ParityError::Export(e.to_string())
}

fn write_value(worksheet: &mut Worksheet, row: u32, value: &CellValue) -> Result<()> {
    match value {
        CellValue::Int(i) if (-MAX_EXACT_INT..=MAX_EXACT_INT).contains(i) => {
            worksheet.write_number(row, 0, *i as f64).map_err(xlsx_error)?;
        }
        CellValue::Float(f) if f.is_finite() => {
            worksheet.write_number(row, 0, *f).map_err(xlsx_error)?;
        }
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, 0, *b).map_err(xlsx_error)?;
        }
        other => {
            worksheet
                .write_string(row, 0, other.display())
                .map_err(xlsx_error)?;
        }
    }
    Ok(())
}

fn write_row(worksheet: &mut Worksheet, row: u32, data: &ComparisonRow) -> Result<()> {
    let fill = Format::new()
        .set_background_color(Color::RGB(display_hint(data).rgb()))
        .set_font_color(Color::White);

    write_value(worksheet, row, &data.value)?;
    worksheet
        .write_number(row, 1, data.source_count as f64)
        .map_err(xlsx_error)?;
    worksheet
        .write_number(row, 2, data.target_count as f64)
        .map_err(xlsx_error)?;
    worksheet
        .write_boolean_with_format(row, 3, data.matched, &fill)
        .map_err(xlsx_error)?;
    Ok(())
}

fn build_workbook(report: &ParityReport) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(SHEET_NAME)
        .map_err(xlsx_error)?;

    let bold = Format::new().set_bold();
    worksheet.set_column_width(0, 28).map_err(xlsx_error)?;
    for col in 1..4u16 {
        worksheet.set_column_width(col, 14).map_err(xlsx_error)?;
    }

    let mut row: u32 = 0;
    for section in &report.sections {
        worksheet
            .write_string_with_format(row, 0, &section.pair.source, &bold)
            .map_err(xlsx_error)?;
        row += 1;

        for (col, header) in HEADERS.iter().enumerate() {
            worksheet
                .write_string_with_format(row, col as u16, *header, &bold)
                .map_err(xlsx_error)?;
        }
        row += 1;

        for data in &section.rows {
            write_row(worksheet, row, data)?;
            row += 1;
        }

        // blank row between sections
        row += 1;
    }

    Ok(workbook)
}

/// Write the report as an xlsx file
pub fn export_xlsx(report: &ParityReport, path: &Path) -> Result<()> {
    let mut workbook = build_workbook(report)?;
    workbook.save(path).map_err(xlsx_error)?;
    info!(path = %path.display(), sections = report.sections.len(), "exported spreadsheet");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RowOrder;
    use crate::model::ColumnSample;
    use crate::reconcile::{ColumnPair, ColumnSection};

    fn report() -> ParityReport {
        let a = ColumnSample::from_values("id", vec![1i64, 2, 2]);
        let b = ColumnSample::from_values("id", vec![1i64, 2]);
        let c = ColumnSample::from_values("flag", vec![Some(true), None]);
        ParityReport::new("s", "t").with_sections(vec![
            ColumnSection::build(ColumnPair::same("id"), &a, &b, RowOrder::FirstSeen),
            ColumnSection::build(ColumnPair::same("flag"), &c, &c, RowOrder::FirstSeen),
        ])
    }

    #[test]
    fn test_export_writes_xlsx_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Column_Validations.xlsx");

        export_xlsx(&report(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // xlsx is a zip container
        assert_eq!(&bytes[0..4], b"PK\x03\x04");
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.xlsx");

        let err = export_xlsx(&report(), &path).unwrap_err();
        assert!(matches!(err, ParityError::Export(_)));
        assert!(!err.is_fetch());
    }
}
