//! Dynamic column values and coercion of client input to a column's kind.

use crate::sql::GenericType;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::fmt;

/// A single cell. `Null` is also the value of every column in a placeholder row.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    String(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert to the given kind. Strings (form input) are parsed; empty strings become
    /// `Null` for every kind except `String`.
    pub fn coerce(&self, kind: GenericType) -> Result<Value, String> {
        match (self, kind) {
            (Value::Null, _) => Ok(Value::Null),
            (_, GenericType::Unknown) => Ok(self.clone()),
            (Value::String(s), GenericType::String) => Ok(Value::String(s.clone())),
            (Value::String(s), _) if s.trim().is_empty() => Ok(Value::Null),
            (Value::String(s), GenericType::Integer) => s
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| format!("'{}' is not an integer", s)),
            (Value::String(s), GenericType::Float) => s
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| format!("'{}' is not a number", s)),
            (Value::String(s), GenericType::Boolean) => parse_bool(s),
            (Value::String(s), GenericType::Timestamp) => parse_timestamp(s),
            (Value::Integer(n), GenericType::Integer) => Ok(Value::Integer(*n)),
            (Value::Integer(n), GenericType::Float) => Ok(Value::Float(*n as f64)),
            (Value::Integer(n), GenericType::Boolean) => Ok(Value::Boolean(*n != 0)),
            (Value::Float(f), GenericType::Float) => Ok(Value::Float(*f)),
            (Value::Float(f), GenericType::Integer) if f.fract() == 0.0 => Ok(Value::Integer(*f as i64)),
            (Value::Boolean(b), GenericType::Boolean) => Ok(Value::Boolean(*b)),
            (Value::Timestamp(t), GenericType::Timestamp) => Ok(Value::Timestamp(*t)),
            (other, GenericType::String) => Ok(Value::String(other.to_string())),
            (other, kind) => Err(format!("cannot convert {} to {:?}", other, kind)),
        }
    }

    /// Check an already coerced value against the column's native type where the generic
    /// kind is wider than the column: narrow Postgres integers and uuid keys.
    pub fn check_native(&self, native_type: &str) -> Result<(), String> {
        let native = native_type.trim().to_lowercase();
        match (self, native.as_str()) {
            (Value::Integer(n), "int2" | "smallint" | "smallserial" | "serial2") if i16::try_from(*n).is_err() => {
                Err(format!("{} is out of range for {}", n, native_type))
            }
            (Value::Integer(n), "int4" | "serial" | "serial4") if i32::try_from(*n).is_err() => {
                Err(format!("{} is out of range for {}", n, native_type))
            }
            (Value::String(s), "uuid") if uuid::Uuid::parse_str(s.trim()).is_err() => {
                Err(format!("'{}' is not a uuid", s))
            }
            _ => Ok(()),
        }
    }
}

fn parse_bool(s: &str) -> Result<Value, String> {
    match s.trim().to_lowercase().as_str() {
        "true" | "t" | "on" | "yes" | "1" => Ok(Value::Boolean(true)),
        "false" | "f" | "off" | "no" | "0" => Ok(Value::Boolean(false)),
        _ => Err(format!("'{}' is not a boolean", s)),
    }
}

/// Accepts RFC 3339, `datetime-local` form values, `YYYY-MM-DD HH:MM:SS` and plain dates.
/// Values without an offset are taken as UTC.
pub fn parse_timestamp(s: &str) -> Result<Value, String> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(Value::Timestamp(t.with_timezone(&Utc)));
    }
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Value::Timestamp(t.and_utc()));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(t) = d.and_hms_opt(0, 0, 0) {
            return Ok(Value::Timestamp(t.and_utc()));
        }
    }
    Err(format!("'{}' is not a timestamp", s))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn form_strings_coerce_to_column_kinds() {
        assert_eq!(Value::from("42").coerce(GenericType::Integer), Ok(Value::Integer(42)));
        assert_eq!(Value::from("2.5").coerce(GenericType::Float), Ok(Value::Float(2.5)));
        assert_eq!(Value::from("on").coerce(GenericType::Boolean), Ok(Value::Boolean(true)));
        assert_eq!(Value::from("false").coerce(GenericType::Boolean), Ok(Value::Boolean(false)));
        assert_eq!(Value::from("Ada").coerce(GenericType::String), Ok(Value::from("Ada")));
    }

    #[test]
    fn empty_input_is_null_except_for_strings() {
        assert_eq!(Value::from("").coerce(GenericType::Integer), Ok(Value::Null));
        assert_eq!(Value::from("").coerce(GenericType::Timestamp), Ok(Value::Null));
        assert_eq!(Value::from("").coerce(GenericType::String), Ok(Value::from("")));
    }

    #[test]
    fn datetime_local_input_is_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();
        assert_eq!(
            Value::from("2024-03-01T10:30").coerce(GenericType::Timestamp),
            Ok(Value::Timestamp(expected))
        );
        assert_eq!(
            Value::from("2024-03-01T12:30:00+02:00").coerce(GenericType::Timestamp),
            Ok(Value::Timestamp(expected))
        );
    }

    #[test]
    fn bad_input_is_rejected() {
        assert!(Value::from("forty-two").coerce(GenericType::Integer).is_err());
        assert!(Value::from("maybe").coerce(GenericType::Boolean).is_err());
        assert!(Value::from("yesterday").coerce(GenericType::Timestamp).is_err());
        assert!(Value::Boolean(true).coerce(GenericType::Timestamp).is_err());
    }

    #[test]
    fn narrow_keys_are_checked_against_the_native_type() {
        assert!(Value::Integer(3_000_000_000).check_native("INT4").is_err());
        assert!(Value::Integer(3_000_000_000).check_native("INT8").is_ok());
        assert!(Value::Integer(3_000_000_000).check_native("INTEGER").is_ok());
        assert!(Value::Integer(40_000).check_native("int2").is_err());
        assert!(Value::Integer(-7).check_native("INT4").is_ok());
        assert!(Value::from("not-a-uuid").check_native("UUID").is_err());
        assert!(Value::from("67e55044-10b1-426f-9247-bb680e5fe0c8").check_native("UUID").is_ok());
        assert!(Value::from("not-a-uuid").check_native("TEXT").is_ok());
    }

    #[test]
    fn serializes_untagged() {
        assert_eq!(serde_json::to_value(Value::Null).unwrap(), serde_json::Value::Null);
        assert_eq!(serde_json::to_value(Value::Integer(7)).unwrap(), serde_json::json!(7));
        assert_eq!(serde_json::to_value(Value::from("x")).unwrap(), serde_json::json!("x"));
    }
}
