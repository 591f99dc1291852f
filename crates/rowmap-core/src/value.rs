//! Storage values and the scalar codec.
//!
//! [`Value`] mirrors the five storage classes a row can hold. Encoding a Rust
//! scalar is a plain `From` conversion; decoding goes through [`FromValue`].
//!
//! Decoding `NULL` into a non-nullable target yields the type's zero value
//! (`0`, `0.0`, `false`, `""`, empty bytes). Decoding it into `Option<T>`
//! yields `None`.

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// A single stored value, tagged with its storage class.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    /// SQL NULL.
    #[default]
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Opaque bytes.
    Blob(Vec<u8>),
}

impl Value {
    /// Name of the storage class, as the store reports it.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Integer(_) => "INTEGER",
            Value::Real(_) => "REAL",
            Value::Text(_) => "TEXT",
            Value::Blob(_) => "BLOB",
        }
    }

    /// Check if this value is NULL.
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The integer payload, if this is an integer.
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// The float payload, if this is a real.
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// The text payload, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    /// The byte payload, if this is a blob.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(v) => Some(v),
            _ => None,
        }
    }

    /// Decode this value into `T`.
    pub fn decode<T: FromValue>(&self) -> Result<T, DecodeError> {
        T::from_value(self)
    }

    fn mismatch(&self, expected: &'static str) -> DecodeError {
        DecodeError::new(expected, self.type_name())
    }

    fn unparsable(&self, expected: &'static str, text: &str) -> DecodeError {
        DecodeError::new(expected, format!("TEXT {text:?}"))
    }
}

// ============================================================================
// Encoding
// ============================================================================

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Integer(i64::from(v))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(if v { 1 } else { 0 })
    }
}

/// Widens through the shortest decimal form, so `222.18_f32` stores as
/// `222.18` rather than `222.179_992_675_781_25`.
impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Real(v.to_string().parse().unwrap_or(f64::from(v)))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
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

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Blob(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode a stored [`Value`] into a Rust type.
pub trait FromValue: Sized {
    /// Decode `value`, applying the zero-value rule for `NULL`.
    fn from_value(value: &Value) -> Result<Self, DecodeError>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Null => Ok(0),
            Value::Integer(v) => Ok(*v),
            Value::Text(s) => s.trim().parse().map_err(|_| value.unparsable("i64", s)),
            Value::Real(_) | Value::Blob(_) => Err(value.mismatch("i64")),
        }
    }
}

macro_rules! impl_from_value_narrow_integer {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self, DecodeError> {
                    let wide = i64::from_value(value).map_err(|mut e| {
                        e.expected = stringify!($ty);
                        e
                    })?;
                    <$ty>::try_from(wide).map_err(|_| {
                        DecodeError::new(stringify!($ty), format!("INTEGER {wide} (out of range)"))
                    })
                }
            }
        )*
    };
}

impl_from_value_narrow_integer!(i8, i16, i32, u8, u16, u32);

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Null => Ok(0.0),
            Value::Real(v) => Ok(*v),
            Value::Integer(v) => Ok(*v as f64),
            Value::Text(s) => s.trim().parse().map_err(|_| value.unparsable("f64", s)),
            Value::Blob(_) => Err(value.mismatch("f64")),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        f64::from_value(value)
            .map(|v| v as f32)
            .map_err(|mut e| {
                e.expected = "f32";
                e
            })
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Null => Ok(false),
            Value::Integer(v) => Ok(*v != 0),
            Value::Text(s) => {
                let trimmed = s.trim();
                if let Ok(v) = trimmed.parse::<i64>() {
                    Ok(v != 0)
                } else if trimmed.eq_ignore_ascii_case("true") {
                    Ok(true)
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Ok(false)
                } else {
                    Err(value.unparsable("bool", s))
                }
            }
            Value::Real(_) | Value::Blob(_) => Err(value.mismatch("bool")),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Null => Ok(String::new()),
            Value::Text(s) => Ok(s.clone()),
            Value::Integer(v) => Ok(v.to_string()),
            Value::Real(v) => Ok(v.to_string()),
            Value::Blob(bytes) => {
                String::from_utf8(bytes.clone()).map_err(|_| value.mismatch("String"))
            }
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Blob(bytes) => Ok(bytes.clone()),
            Value::Text(s) => Ok(s.as_bytes().to_vec()),
            Value::Integer(_) | Value::Real(_) => Err(value.mismatch("Vec<u8>")),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_round_trip() {
        assert_eq!(Value::from(841_i32).decode::<i32>(), Ok(841));
        assert_eq!(
            Value::from(76_772_878_174_i64).decode::<i64>(),
            Ok(76_772_878_174)
        );
        assert_eq!(Value::from(i32::MIN).decode::<i32>(), Ok(i32::MIN));
    }

    #[test]
    fn test_narrow_integer_out_of_range() {
        let err = Value::Integer(76_772_878_174).decode::<i32>().unwrap_err();
        assert_eq!(err.expected, "i32");
        assert!(err.found.contains("out of range"));
    }

    #[test]
    fn test_bool_encodes_as_integer() {
        assert_eq!(Value::from(true), Value::Integer(1));
        assert_eq!(Value::from(false), Value::Integer(0));
        assert_eq!(Value::Integer(1).decode::<bool>(), Ok(true));
        assert_eq!(Value::Integer(0).decode::<bool>(), Ok(false));
        assert_eq!(Value::Integer(7).decode::<bool>(), Ok(true));
    }

    #[test]
    fn test_float_narrowing() {
        let stored = Value::from(222.18_f32);
        assert_eq!(stored.decode::<f32>(), Ok(222.18_f32));

        let wide = Value::Real(745.000_000_1);
        assert_eq!(wide.decode::<f32>(), Ok(745.000_000_1_f64 as f32));
    }

    #[test]
    fn test_real_never_decodes_into_integer() {
        let err = Value::Real(1.5).decode::<i64>().unwrap_err();
        assert_eq!(err, DecodeError::new("i64", "REAL"));
    }

    #[test]
    fn test_integer_decodes_into_float() {
        assert_eq!(Value::Integer(3).decode::<f64>(), Ok(3.0));
    }

    #[test]
    fn test_text_coercions() {
        assert_eq!(Value::from(" 42 ").decode::<i32>(), Ok(42));
        assert_eq!(Value::from("2.5").decode::<f64>(), Ok(2.5));
        assert_eq!(Value::from("1").decode::<bool>(), Ok(true));
        assert!(Value::from("arrest").decode::<i64>().is_err());
        assert_eq!(Value::Integer(12).decode::<String>(), Ok("12".to_string()));
    }

    #[test]
    fn test_null_yields_zero_for_non_nullable() {
        assert_eq!(Value::Null.decode::<i32>(), Ok(0));
        assert_eq!(Value::Null.decode::<i64>(), Ok(0));
        assert_eq!(Value::Null.decode::<f64>(), Ok(0.0));
        assert_eq!(Value::Null.decode::<bool>(), Ok(false));
        assert_eq!(Value::Null.decode::<String>(), Ok(String::new()));
        assert_eq!(Value::Null.decode::<Vec<u8>>(), Ok(Vec::new()));
    }

    #[test]
    fn test_null_yields_none_for_nullable() {
        assert_eq!(Value::Null.decode::<Option<i32>>(), Ok(None));
        assert_eq!(Value::Null.decode::<Option<String>>(), Ok(None));
        assert_eq!(
            Value::from("winter").decode::<Option<String>>(),
            Ok(Some("winter".to_string()))
        );
    }

    #[test]
    fn test_option_encoding() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some(5_i32)), Value::Integer(5));
    }

    #[test]
    fn test_f32_encodes_its_decimal_form() {
        assert_eq!(Value::from(222.18_f32), Value::Real(222.18));
        assert_eq!(Value::from(-0.1_f32), Value::Real(-0.1));
        assert_eq!(Value::from(222.18_f32).decode::<f32>(), Ok(222.18_f32));
        assert_eq!(Value::from(f32::INFINITY), Value::Real(f64::INFINITY));
    }

    #[test]
    fn test_blob_content_equality() {
        let a = Value::from(vec![1_u8, 2, 3]);
        let b = Value::from(&[1_u8, 2, 3][..]);
        assert_eq!(a, b);
        assert_ne!(a, Value::from(vec![1_u8, 2]));
        assert_eq!(a.decode::<Vec<u8>>(), Ok(vec![1, 2, 3]));
    }

    #[test]
    fn test_blob_into_string_requires_utf8() {
        assert_eq!(
            Value::Blob(b"ok".to_vec()).decode::<String>(),
            Ok("ok".to_string())
        );
        assert!(Value::Blob(vec![0xff, 0xfe]).decode::<String>().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let value = Value::Text("arrest".to_string());
        let json = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
