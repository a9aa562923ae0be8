//! Column values exchanged between records, conditions and the store.

use chrono::{DateTime, TimeZone, Utc};

use crate::errors::{RelboxError, Result};

/// A single column value.
///
/// Variants mirror the storable field types one to one so a record can hand
/// over exactly what it holds; the store narrows them to SQLite affinities.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Text(String),
    Date(DateTime<Utc>),
    Bytes(Vec<u8>),
}

impl Value {
    /// Name of the variant, used in mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Text(_) => "string",
            Value::Date(_) => "date",
            Value::Bytes(_) => "bytes",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer view of integer-affinity values. Dates become epoch millis.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Byte(v) => Some(i64::from(*v)),
            Value::Short(v) => Some(i64::from(*v)),
            Value::Int(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            Value::Date(d) => Some(d.timestamp_millis()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert into an optional field value, mapping `Null` to `None`.
    pub fn optional<T>(self) -> Result<Option<T>>
    where
        T: TryFrom<Value, Error = RelboxError>,
    {
        match self {
            Value::Null => Ok(None),
            other => T::try_from(other).map(Some),
        }
    }

    fn mismatch(&self, expected: &str) -> RelboxError {
        RelboxError::ValueMismatch {
            expected: expected.to_string(),
            found: self.type_name().to_string(),
        }
    }
}

/// Convert epoch milliseconds into a UTC timestamp.
pub fn date_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => Text,
    DateTime<Utc> => Date,
    Vec<u8> => Bytes,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

macro_rules! integer_try_from {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl TryFrom<Value> for $ty {
                type Error = RelboxError;

                fn try_from(value: Value) -> Result<Self> {
                    value
                        .as_i64()
                        .and_then(|v| <$ty>::try_from(v).ok())
                        .ok_or_else(|| value.mismatch($name))
                }
            }
        )*
    };
}

integer_try_from! {
    i8 => "byte",
    i16 => "short",
    i32 => "int",
    i64 => "long",
}

impl TryFrom<Value> for bool {
    type Error = RelboxError;

    fn try_from(value: Value) -> Result<Self> {
        value
            .as_i64()
            .map(|v| v != 0)
            .ok_or_else(|| value.mismatch("bool"))
    }
}

impl TryFrom<Value> for f64 {
    type Error = RelboxError;

    fn try_from(value: Value) -> Result<Self> {
        value.as_f64().ok_or_else(|| value.mismatch("double"))
    }
}

impl TryFrom<Value> for f32 {
    type Error = RelboxError;

    fn try_from(value: Value) -> Result<Self> {
        value
            .as_f64()
            .map(|v| v as f32)
            .ok_or_else(|| value.mismatch("float"))
    }
}

impl TryFrom<Value> for String {
    type Error = RelboxError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }
}

impl TryFrom<Value> for Vec<u8> {
    type Error = RelboxError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bytes(b) => Ok(b),
            other => Err(other.mismatch("bytes")),
        }
    }
}

impl TryFrom<Value> for DateTime<Utc> {
    type Error = RelboxError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Date(d) => Ok(d),
            other => other
                .as_i64()
                .and_then(date_from_millis)
                .ok_or_else(|| other.mismatch("date")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_widening_and_narrowing() {
        assert_eq!(i32::try_from(Value::Long(42)).unwrap(), 42);
        assert_eq!(i64::try_from(Value::Short(-3)).unwrap(), -3);
        assert!(i8::try_from(Value::Long(1_000)).is_err());
    }

    #[test]
    fn test_bool_from_integer() {
        assert!(bool::try_from(Value::Long(1)).unwrap());
        assert!(!bool::try_from(Value::Long(0)).unwrap());
    }

    #[test]
    fn test_date_round_trips_through_millis() {
        let date = date_from_millis(1_468_627_200_123).unwrap();
        let millis = Value::Date(date).as_i64().unwrap();
        assert_eq!(DateTime::<Utc>::try_from(Value::Long(millis)).unwrap(), date);
    }

    #[test]
    fn test_mismatch_reports_both_types() {
        let err = String::try_from(Value::Long(5)).unwrap_err();
        assert_eq!(
            err,
            RelboxError::ValueMismatch {
                expected: "string".to_string(),
                found: "long".to_string(),
            }
        );
    }

    #[test]
    fn test_option_maps_null() {
        let v: Option<String> = Value::Null.optional().unwrap();
        assert_eq!(v, None);
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }
}
