//! Column type inference

use serde::{Deserialize, Serialize};

use super::value::CellValue;

/// Type observed across the values of a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    #[default]
    Null,
    Bool,
    Int,
    Float,
    String,
    Date,
    DateTime,
    Mixed,
}

impl CellType {
    /// Widen the type to accommodate another type
    pub fn widen(self, other: CellType) -> CellType {
        if self == other {
            return self;
        }

        match (self, other) {
            (CellType::Null, t) | (t, CellType::Null) => t,
            (CellType::Int, CellType::Float) | (CellType::Float, CellType::Int) => CellType::Float,
            (CellType::Date, CellType::DateTime) | (CellType::DateTime, CellType::Date) => {
                CellType::DateTime
            }
            _ => CellType::Mixed,
        }
    }

    /// Narrowest type covering every value, `Null` for an all-null or empty column
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> CellType {
        values
            .into_iter()
            .fold(CellType::Null, |acc, v| acc.widen(v.cell_type()))
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CellType::Null => "null",
            CellType::Bool => "bool",
            CellType::Int => "int",
            CellType::Float => "float",
            CellType::String => "string",
            CellType::Date => "date",
            CellType::DateTime => "datetime",
            CellType::Mixed => "mixed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_widens_numbers() {
        let values = vec![CellValue::Int(1), CellValue::Null, CellValue::Float(2.5)];
        assert_eq!(CellType::infer(&values), CellType::Float);
    }

    #[test]
    fn test_infer_mixed_and_empty() {
        let values = vec![CellValue::Int(1), CellValue::from("x")];
        assert_eq!(CellType::infer(&values), CellType::Mixed);
        assert_eq!(CellType::infer(&Vec::new()), CellType::Null);
    }
}
