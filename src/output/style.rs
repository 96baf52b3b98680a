//! Row highlighting shared by every renderer

use termcolor::Color;

use crate::reconcile::ComparisonRow;

/// How a comparison row should be highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayHint {
    /// Counts agree: green
    Match,
    /// Counts differ: red
    Mismatch,
}

/// Highlight for a row, derived only from its match flag
pub fn display_hint(row: &ComparisonRow) -> DisplayHint {
    if row.matched {
        DisplayHint::Match
    } else {
        DisplayHint::Mismatch
    }
}

impl DisplayHint {
    /// Terminal foreground color
    pub fn color(self) -> Color {
        match self {
            DisplayHint::Match => Color::Green,
            DisplayHint::Mismatch => Color::Red,
        }
    }

    /// CSS class used by the HTML report
    pub fn css_class(self) -> &'static str {
        match self {
            DisplayHint::Match => "match",
            DisplayHint::Mismatch => "mismatch",
        }
    }

    /// Cell fill for spreadsheet export, as 0xRRGGBB
    pub fn rgb(self) -> u32 {
        match self {
            DisplayHint::Match => 0x008000,
            DisplayHint::Mismatch => 0xFF0000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    #[test]
    fn test_hint_follows_match_flag() {
        let same = ComparisonRow::new(CellValue::Int(1), 2, 2);
        let diff = ComparisonRow::new(CellValue::Int(1), 2, 0);

        assert_eq!(display_hint(&same), DisplayHint::Match);
        assert_eq!(display_hint(&diff), DisplayHint::Mismatch);
        assert_eq!(display_hint(&diff).color(), Color::Red);
        assert_eq!(display_hint(&same).css_class(), "match");
    }
}
