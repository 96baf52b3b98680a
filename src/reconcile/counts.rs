//! Value frequency counting

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::model::{CellValue, ColumnSample};

/// Distinct value to occurrence count, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct ValueCount {
    counts: IndexMap<CellValue, usize, FxBuildHasher>,
}

impl ValueCount {
    /// Count every value of a sample
    pub fn from_sample(sample: &ColumnSample) -> Self {
        let mut counts: IndexMap<CellValue, usize, FxBuildHasher> =
            IndexMap::with_capacity_and_hasher(sample.len().min(1024), FxBuildHasher);

        for value in sample {
            // Clone only on the first sighting of a value
            match counts.get_mut(value) {
                Some(count) => *count += 1,
                None => {
                    counts.insert(value.clone(), 1);
                }
            }
        }

        Self { counts }
    }

    /// Occurrences of a value, 0 when absent
    pub fn get(&self, value: &CellValue) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    pub fn contains(&self, value: &CellValue) -> bool {
        self.counts.contains_key(value)
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellValue, usize)> {
        self.counts.iter().map(|(v, &c)| (v, c))
    }
}

/// Convenience function to count a sample
pub fn value_counts(sample: &ColumnSample) -> ValueCount {
    ValueCount::from_sample(sample)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_in_first_seen_order() {
        let sample = ColumnSample::from_values("c", vec![3i64, 1, 3, 2, 1, 3]);
        let counts = value_counts(&sample);

        let pairs: Vec<_> = counts.iter().map(|(v, c)| (v.clone(), c)).collect();
        assert_eq!(
            pairs,
            vec![
                (CellValue::Int(3), 3),
                (CellValue::Int(1), 2),
                (CellValue::Int(2), 1),
            ]
        );
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn test_null_is_its_own_bucket() {
        let sample = ColumnSample::from_values("c", vec![None, Some("a"), None]);
        let counts = value_counts(&sample);

        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get(&CellValue::Null), 2);
        assert_eq!(counts.get(&CellValue::from("a")), 1);
        assert_eq!(counts.get(&CellValue::from("missing")), 0);
    }
}
