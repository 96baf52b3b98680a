//! Raw values pulled from one column of one table

use super::schema::CellType;
use super::value::CellValue;

/// Ordered values of a single column, nulls kept as `CellValue::Null`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSample {
    /// Column the values came from
    pub column: String,
    /// One value per record
    pub values: Vec<CellValue>,
}

impl ColumnSample {
    /// Create an empty sample for a column
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            values: Vec::new(),
        }
    }

    /// Create a sample from any values convertible to `CellValue`
    pub fn from_values<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        Self {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, value: CellValue) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CellValue> {
        self.values.iter()
    }

    /// Number of null values
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Type covering every value in the sample
    pub fn inferred_type(&self) -> CellType {
        CellType::infer(&self.values)
    }
}

impl<'a> IntoIterator for &'a ColumnSample {
    type Item = &'a CellValue;
    type IntoIter = std::slice::Iter<'a, CellValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_keeps_nulls() {
        let sample = ColumnSample::from_values("status", vec![Some("a"), None, Some("b")]);
        assert_eq!(sample.len(), 3);
        assert_eq!(sample.null_count(), 1);
        assert_eq!(sample.inferred_type(), CellType::String);
    }
}
