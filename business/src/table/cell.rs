use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use ustr::Ustr;

/// A raw field value as read from a row.
///
/// Values order as `Bool < Number < Date < Text < Null`, so a plain ascending
/// sort already puts empty cells last.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(Decimal),
    Date(NaiveDate),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Number(_) => 1,
            Self::Date(_) => 2,
            Self::Text(_) => 3,
            Self::Null => 4,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The raw string form, used for search matching. `Null` renders empty.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Decimal> for CellValue {
    fn from(n: Decimal) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::Number(Decimal::from(n))
    }
}

impl From<u64> for CellValue {
    fn from(n: u64) -> Self {
        Self::Number(Decimal::from(n))
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        Self::Number(Decimal::from(n))
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Read access to one table line.
pub trait TableRow {
    /// Stable identifier used as the selection key.
    fn row_id(&self) -> Ustr;

    /// The value stored under `key`, or [`CellValue::Null`] when the row has no such field.
    fn field(&self, key: &str) -> CellValue;
}

/// A schemaless row, for data that has no dedicated type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: Ustr,
    fields: HashMap<Ustr, CellValue>,
}

impl Record {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self {
            id: Ustr::from(id.as_ref()),
            fields: HashMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<CellValue>) -> Self {
        self.fields.insert(Ustr::from(key), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.get(&Ustr::from(key))
    }
}

impl TableRow for Record {
    fn row_id(&self) -> Ustr {
        self.id
    }

    fn field(&self, key: &str) -> CellValue {
        self.get(key).cloned().unwrap_or_default()
    }
}
