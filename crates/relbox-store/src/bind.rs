//! Conversion between core values and rusqlite values.
//!
//! Booleans and integers share integer storage, dates are stored as epoch
//! milliseconds. Reading back narrows by the column's declared storage kind.

use relbox_core::errors::RelboxError;
use relbox_core::value::date_from_millis;
use relbox_core::{StorageKind, Value};
use rusqlite::types::Value as SqlValue;

pub fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Byte(v) => SqlValue::Integer(i64::from(*v)),
        Value::Short(v) => SqlValue::Integer(i64::from(*v)),
        Value::Int(v) => SqlValue::Integer(i64::from(*v)),
        Value::Long(v) => SqlValue::Integer(*v),
        Value::Float(v) => SqlValue::Real(f64::from(*v)),
        Value::Double(v) => SqlValue::Real(*v),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Date(d) => SqlValue::Integer(d.timestamp_millis()),
        Value::Bytes(b) => SqlValue::Blob(b.clone()),
    }
}

pub fn to_sql_params<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<SqlValue> {
    values.into_iter().map(to_sql).collect()
}

/// Read a stored value back as the variant matching `kind`.
///
/// # Errors
///
/// Returns [`RelboxError::ValueMismatch`] when the stored value has the wrong
/// affinity or does not fit the narrower integer type.
pub fn from_sql(kind: StorageKind, raw: &SqlValue) -> Result<Value, RelboxError> {
    let mismatch = |found: &str| RelboxError::ValueMismatch {
        expected: kind.sql_type().to_lowercase(),
        found: found.to_string(),
    };

    let value = match (kind, raw) {
        (_, SqlValue::Null) => Value::Null,
        (StorageKind::Boolean, SqlValue::Integer(v)) => Value::Bool(*v != 0),
        (StorageKind::Byte, SqlValue::Integer(v)) => {
            Value::Byte(i8::try_from(*v).map_err(|_| mismatch("out-of-range integer"))?)
        }
        (StorageKind::Short, SqlValue::Integer(v)) => {
            Value::Short(i16::try_from(*v).map_err(|_| mismatch("out-of-range integer"))?)
        }
        (StorageKind::Int, SqlValue::Integer(v)) => {
            Value::Int(i32::try_from(*v).map_err(|_| mismatch("out-of-range integer"))?)
        }
        (StorageKind::Long, SqlValue::Integer(v)) => Value::Long(*v),
        (StorageKind::Date, SqlValue::Integer(v)) => {
            Value::Date(date_from_millis(*v).ok_or_else(|| mismatch("out-of-range date"))?)
        }
        (StorageKind::Float, SqlValue::Real(v)) => Value::Float(*v as f32),
        (StorageKind::Float, SqlValue::Integer(v)) => Value::Float(*v as f32),
        (StorageKind::Double, SqlValue::Real(v)) => Value::Double(*v),
        (StorageKind::Double, SqlValue::Integer(v)) => Value::Double(*v as f64),
        (StorageKind::String, SqlValue::Text(s)) => Value::Text(s.clone()),
        (StorageKind::Bytes, SqlValue::Blob(b)) => Value::Bytes(b.clone()),
        (_, other) => return Err(mismatch(affinity(other))),
    };
    Ok(value)
}

/// Integer view of a raw value, for identity and mapping columns.
pub fn as_integer(raw: &SqlValue) -> Option<i64> {
    match raw {
        SqlValue::Integer(v) => Some(*v),
        _ => None,
    }
}

fn affinity(raw: &SqlValue) -> &'static str {
    match raw {
        SqlValue::Null => "null",
        SqlValue::Integer(_) => "integer",
        SqlValue::Real(_) => "real",
        SqlValue::Text(_) => "text",
        SqlValue::Blob(_) => "blob",
    }
}
