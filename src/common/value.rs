use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use hex::encode;

/// A single column value read from the source database.
///
/// Decimal, GUID and XML columns arrive as `Text`; the target converts them
/// on insert.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    DateTimeOffset(DateTime<FixedOffset>),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Bool(val) => write!(f, "{}", val),
            SqlValue::Int(val) => write!(f, "{}", val),
            SqlValue::Float(val) => write!(f, "{}", val),
            SqlValue::Text(val) => write!(f, "'{}'", val.replace('\'', "''")),
            SqlValue::Bytes(val) => write!(f, "0x{}", encode(val)),
            SqlValue::Date(val) => write!(f, "'{}'", val.format("%Y-%m-%d")),
            SqlValue::Time(val) => write!(f, "'{}'", val.format("%H:%M:%S%.f")),
            SqlValue::DateTime(val) => write!(f, "'{}'", val.format("%Y-%m-%d %H:%M:%S%.f")),
            SqlValue::DateTimeOffset(val) => {
                write!(f, "'{}'", val.format("%Y-%m-%d %H:%M:%S%.f %:z"))
            }
        }
    }
}

impl From<bool> for SqlValue {
    fn from(val: bool) -> Self {
        SqlValue::Bool(val)
    }
}

impl From<i64> for SqlValue {
    fn from(val: i64) -> Self {
        SqlValue::Int(val)
    }
}

impl From<f64> for SqlValue {
    fn from(val: f64) -> Self {
        SqlValue::Float(val)
    }
}

impl From<&str> for SqlValue {
    fn from(val: &str) -> Self {
        SqlValue::Text(val.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(val: String) -> Self {
        SqlValue::Text(val)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(val: Vec<u8>) -> Self {
        SqlValue::Bytes(val)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(val: Option<T>) -> Self {
        val.map(Into::into).unwrap_or(SqlValue::Null)
    }
}
