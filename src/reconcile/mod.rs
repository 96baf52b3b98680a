//! Value-count reconciliation between a source and a target column

mod counts;
mod report;

use std::cmp::Reverse;

use serde::Serialize;
use tracing::debug;

use crate::config::RowOrder;
use crate::model::{CellValue, ColumnSample};

pub use counts::{value_counts, ValueCount};
pub use report::{reconcile_pairs, ColumnPair, ColumnSection, ParityReport};

/// Counts of one distinct value on both sides
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub value: CellValue,
    pub source_count: usize,
    pub target_count: usize,
    #[serde(rename = "match")]
    pub matched: bool,
}

impl ComparisonRow {
    pub fn new(value: CellValue, source_count: usize, target_count: usize) -> Self {
        Self {
            value,
            source_count,
            target_count,
            matched: source_count == target_count,
        }
    }

    /// Value exists only in the source
    pub fn is_source_only(&self) -> bool {
        self.target_count == 0 && self.source_count > 0
    }

    /// Value exists only in the target
    pub fn is_target_only(&self) -> bool {
        self.source_count == 0 && self.target_count > 0
    }
}

/// Totals over a comparison table
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub distinct_values: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub source_total: usize,
    pub target_total: usize,
    pub source_only: usize,
    pub target_only: usize,
}

impl ComparisonSummary {
    pub fn all_matched(&self) -> bool {
        self.mismatched == 0
    }
}

/// One row per distinct value found in either column
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ComparisonTable {
    rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ComparisonRow> {
        self.rows.iter()
    }

    /// Row for a value, if either side has it
    pub fn get(&self, value: &CellValue) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| &r.value == value)
    }

    /// Rows whose counts differ
    pub fn mismatches(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.rows.iter().filter(|r| !r.matched)
    }

    pub fn all_matched(&self) -> bool {
        self.rows.iter().all(|r| r.matched)
    }

    pub fn summary(&self) -> ComparisonSummary {
        let mut summary = ComparisonSummary {
            distinct_values: self.rows.len(),
            ..Default::default()
        };

        for row in &self.rows {
            if row.matched {
                summary.matched += 1;
            } else {
                summary.mismatched += 1;
            }
            if row.is_source_only() {
                summary.source_only += 1;
            }
            if row.is_target_only() {
                summary.target_only += 1;
            }
            summary.source_total += row.source_count;
            summary.target_total += row.target_count;
        }

        summary
    }

    /// Reorder rows. Sorting is stable, so `FirstSeen` keeps the build order.
    pub fn sort(&mut self, order: RowOrder) {
        match order {
            RowOrder::FirstSeen => {}
            RowOrder::Value => self.rows.sort_by(|a, b| a.value.cmp(&b.value)),
            RowOrder::SourceCountDesc => self.rows.sort_by(|a, b| {
                Reverse(a.source_count)
                    .cmp(&Reverse(b.source_count))
                    .then_with(|| a.value.cmp(&b.value))
            }),
        }
    }
}

impl<'a> IntoIterator for &'a ComparisonTable {
    type Item = &'a ComparisonRow;
    type IntoIter = std::slice::Iter<'a, ComparisonRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Compare value frequencies of two columns
///
/// Rows come in first-seen order from the source, followed by values that
/// only the target has, in their first-seen order.
pub fn reconcile(source: &ColumnSample, target: &ColumnSample) -> ComparisonTable {
    let source_counts = value_counts(source);
    let target_counts = value_counts(target);

    let mut rows = Vec::with_capacity(source_counts.len());

    for (value, source_count) in source_counts.iter() {
        rows.push(ComparisonRow::new(
            value.clone(),
            source_count,
            target_counts.get(value),
        ));
    }

    for (value, target_count) in target_counts.iter() {
        if !source_counts.contains(value) {
            rows.push(ComparisonRow::new(value.clone(), 0, target_count));
        }
    }

    let table = ComparisonTable { rows };
    debug!(
        source_column = %source.column,
        target_column = %target.column,
        distinct = table.len(),
        mismatched = table.mismatches().count(),
        "reconciled column"
    );
    table
}
