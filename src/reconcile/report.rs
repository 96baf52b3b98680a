//! Multi-column reports

use serde::{Deserialize, Serialize};

use crate::config::RowOrder;
use crate::error::{Result, Side};
use crate::model::{CellType, ColumnSample};

use super::{reconcile, ComparisonSummary, ComparisonTable};

/// A source column and the target column it is compared with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPair {
    pub source: String,
    pub target: String,
}

impl ColumnPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Pair a column with the same-named column on the other side
    pub fn same(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            source: name.clone(),
            target: name,
        }
    }
}

impl std::fmt::Display for ColumnPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.source == self.target {
            write!(f, "{}", self.source)
        } else {
            write!(f, "{} → {}", self.source, self.target)
        }
    }
}

/// Comparison of one column pair
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSection {
    pub pair: ColumnPair,
    pub source_type: CellType,
    pub target_type: CellType,
    pub rows: ComparisonTable,
    pub summary: ComparisonSummary,
}

impl ColumnSection {
    /// Reconcile two samples; the summary always covers the full table
    pub fn build(
        pair: ColumnPair,
        source: &ColumnSample,
        target: &ColumnSample,
        order: RowOrder,
    ) -> Self {
        let mut rows = reconcile(source, target);
        rows.sort(order);
        let summary = rows.summary();
        Self {
            pair,
            source_type: source.inferred_type(),
            target_type: target.inferred_type(),
            rows,
            summary,
        }
    }
}

/// All sections of one parity run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParityReport {
    /// Label of the source table, e.g. `sales.orders`
    pub source: String,
    /// Label of the target table
    pub target: String,
    pub sections: Vec<ColumnSection>,
}

impl ParityReport {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            sections: Vec::new(),
        }
    }

    pub fn with_sections(mut self, sections: Vec<ColumnSection>) -> Self {
        self.sections = sections;
        self
    }

    /// True when every section has equal counts for every value
    pub fn all_matched(&self) -> bool {
        self.sections.iter().all(|s| s.summary.all_matched())
    }

    /// Mismatched rows across all sections
    pub fn mismatch_count(&self) -> usize {
        self.sections.iter().map(|s| s.summary.mismatched).sum()
    }
}

/// Fetch and reconcile each pair in order
///
/// The first fetch failure aborts the run; no partial sections are returned.
pub fn reconcile_pairs<S, T>(
    pairs: &[ColumnPair],
    order: RowOrder,
    mut fetch_source: S,
    mut fetch_target: T,
) -> Result<Vec<ColumnSection>>
where
    S: FnMut(&str) -> Result<ColumnSample>,
    T: FnMut(&str) -> Result<ColumnSample>,
{
    let mut sections = Vec::with_capacity(pairs.len());

    for pair in pairs {
        let source = fetch_source(&pair.source).map_err(|e| e.on_side(Side::Source))?;
        let target = fetch_target(&pair.target).map_err(|e| e.on_side(Side::Target))?;
        sections.push(ColumnSection::build(pair.clone(), &source, &target, order));
    }

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParityError;

    fn sample(column: &str, values: &[&str]) -> ColumnSample {
        ColumnSample::from_values(column, values.iter().copied())
    }

    #[test]
    fn test_sections_follow_pair_order() {
        let pairs = vec![ColumnPair::same("status"), ColumnPair::new("region", "area")];

        let sections = reconcile_pairs(
            &pairs,
            RowOrder::FirstSeen,
            |col| Ok(sample(col, &["a", "b"])),
            |col| Ok(sample(col, &["a", "b"])),
        )
        .unwrap();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].pair.source, "status");
        assert_eq!(sections[1].pair.target, "area");
        assert!(sections.iter().all(|s| s.summary.all_matched()));
        assert_eq!(sections[0].source_type, CellType::String);
    }

    #[test]
    fn test_target_failure_aborts_with_side() {
        let pairs = vec![ColumnPair::same("status")];

        let err = reconcile_pairs(
            &pairs,
            RowOrder::FirstSeen,
            |col| Ok(sample(col, &["a"])),
            |_| Err(ParityError::fetch("connection refused")),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ParityError::Fetch {
                side: Some(Side::Target),
                ..
            }
        ));
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_report_all_matched() {
        let source = sample("c", &["a", "a"]);
        let target = sample("c", &["a"]);
        let report = ParityReport::new("s.t", "t.t").with_sections(vec![
            ColumnSection::build(ColumnPair::same("c"), &source, &source, RowOrder::FirstSeen),
            ColumnSection::build(ColumnPair::same("c"), &source, &target, RowOrder::FirstSeen),
        ]);

        assert!(!report.all_matched());
        assert_eq!(report.mismatch_count(), 1);
    }
}
