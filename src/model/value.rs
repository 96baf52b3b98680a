//! Scalar cell values drawn from a column

use std::borrow::Cow;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::schema::CellType;

/// A cell value with type information
///
/// Equality and hashing agree with each other so values can be used as
/// bucket keys: `Null` equals `Null`, NaN equals NaN, and an integral float
/// equals the integer of the same value.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Cow<'static, str>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

/// Exact integer value of a float, if it has one that fits in an i64
fn float_as_int(f: f64) -> Option<i64> {
    // i64::MIN is -2^63 and exactly representable; 2^63 is one past i64::MAX
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < 9_223_372_036_854_775_808.0 {
        Some(f as i64)
    } else {
        None
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            // Cross-type numeric comparison, exact only
            (CellValue::Int(a), CellValue::Float(b)) | (CellValue::Float(b), CellValue::Int(a)) => {
                float_as_int(*b) == Some(*a)
            }
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            CellValue::Null => 0u8.hash(state),
            CellValue::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            CellValue::Int(i) => {
                2u8.hash(state);
                i.hash(state);
            }
            CellValue::Float(f) => match float_as_int(*f) {
                // Must land in the same bucket as the equal Int
                Some(i) => {
                    2u8.hash(state);
                    i.hash(state);
                }
                None if f.is_nan() => {
                    3u8.hash(state);
                    f64::NAN.to_bits().hash(state);
                }
                None => {
                    3u8.hash(state);
                    f.to_bits().hash(state);
                }
            },
            CellValue::String(s) => {
                4u8.hash(state);
                s.hash(state);
            }
            CellValue::Date(d) => {
                5u8.hash(state);
                d.hash(state);
            }
            CellValue::DateTime(dt) => {
                6u8.hash(state);
                dt.hash(state);
            }
        }
    }
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// The type of this value
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Null => CellType::Null,
            CellValue::Bool(_) => CellType::Bool,
            CellValue::Int(_) => CellType::Int,
            CellValue::Float(_) => CellType::Float,
            CellValue::String(_) => CellType::String,
            CellValue::Date(_) => CellType::Date,
            CellValue::DateTime(_) => CellType::DateTime,
        }
    }

    /// Convert to a display string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed("NULL"),
            CellValue::Bool(b) => Cow::Owned(b.to_string()),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(f.to_string()),
            CellValue::String(s) => Cow::Borrowed(s.as_ref()),
            CellValue::Date(d) => Cow::Owned(d.to_string()),
            CellValue::DateTime(dt) => Cow::Owned(dt.to_string()),
        }
    }

    /// Infer a typed value from raw text
    ///
    /// Only the empty cell is `Null`. A typed value is kept only when it
    /// displays back as exactly the same text, so `00501`, `1.0`, `TRUE` and
    /// ` a` stay distinct strings instead of merging with `501`, `1`, `true`
    /// and `a`.
    pub fn parse_text(s: &str) -> CellValue {
        if s.is_empty() {
            return CellValue::Null;
        }

        let typed = if s == "true" {
            Some(CellValue::Bool(true))
        } else if s == "false" {
            Some(CellValue::Bool(false))
        } else if let Ok(i) = s.parse::<i64>() {
            Some(CellValue::Int(i))
        } else if let Ok(f) = s.parse::<f64>() {
            Some(CellValue::Float(f))
        } else if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Some(CellValue::Date(date))
        } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
            Some(CellValue::DateTime(dt))
        } else {
            None
        };

        match typed {
            Some(value) if value.display() == s => value,
            _ => CellValue::String(Cow::Owned(s.to_string())),
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Bool(_) => 1,
            CellValue::Int(_) | CellValue::Float(_) => 2,
            CellValue::Date(_) => 3,
            CellValue::DateTime(_) => 4,
            CellValue::String(_) => 5,
        }
    }
}

fn canonical_float(f: f64) -> f64 {
    if f.is_nan() {
        f64::NAN
    } else if f == 0.0 {
        0.0
    } else {
        f
    }
}

fn cmp_int_float(a: i64, b: f64) -> Ordering {
    if b.is_nan() {
        return Ordering::Less;
    }
    if let Some(bi) = float_as_int(b) {
        return a.cmp(&bi);
    }
    match (a as f64).partial_cmp(&b) {
        Some(Ordering::Equal) | None => {
            // Only reachable for integral floats outside the i64 range
            if b > 0.0 {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        Some(ord) => ord,
    }
}

impl Ord for CellValue {
    /// Nulls first, then bools, numbers, dates, datetimes, strings
    fn cmp(&self, other: &Self) -> Ordering {
        let rank = self.type_rank().cmp(&other.type_rank());
        if rank != Ordering::Equal {
            return rank;
        }

        match (self, other) {
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (CellValue::Float(a), CellValue::Float(b)) => {
                canonical_float(*a).total_cmp(&canonical_float(*b))
            }
            (CellValue::Int(a), CellValue::Float(b)) => cmp_int_float(*a, *b),
            (CellValue::Float(a), CellValue::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a.cmp(b),
            (CellValue::String(a), CellValue::String(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(Cow::Owned(s.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(Cow::Owned(s))
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}
