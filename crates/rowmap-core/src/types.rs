//! Declared SQL types and the enumeration convention.

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::value::Value;

/// Declared type of a field, as seen by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    /// 8/16-bit integer.
    SmallInt,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    BigInt,
    /// 32-bit float.
    Real,
    /// 64-bit float.
    Double,
    /// Boolean stored as 0/1.
    Boolean,
    /// UTF-8 text.
    Text,
    /// Opaque bytes.
    Blob,
    /// Enumeration stored by variant name.
    Enum,
}

impl SqlType {
    /// The SQL name of this type.
    pub const fn sql_name(self) -> &'static str {
        match self {
            SqlType::SmallInt => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Real => "REAL",
            SqlType::Double => "DOUBLE",
            SqlType::Boolean => "BOOLEAN",
            SqlType::Text | SqlType::Enum => "TEXT",
            SqlType::Blob => "BLOB",
        }
    }

    /// The storage class values of this type are encoded into.
    pub const fn storage_class(self) -> &'static str {
        match self {
            SqlType::SmallInt | SqlType::Integer | SqlType::BigInt | SqlType::Boolean => {
                "INTEGER"
            }
            SqlType::Real | SqlType::Double => "REAL",
            SqlType::Text | SqlType::Enum => "TEXT",
            SqlType::Blob => "BLOB",
        }
    }
}

/// Static type information for a field type.
///
/// `#[derive(Model)]` reads these constants to fill the field descriptor table.
pub trait TypeInfo {
    /// Declared SQL type.
    const SQL_TYPE: SqlType;
    /// Whether `NULL` is representable.
    const NULLABLE: bool = false;
}

macro_rules! impl_type_info {
    ($($ty:ty => $sql:ident),* $(,)?) => {
        $(
            impl TypeInfo for $ty {
                const SQL_TYPE: SqlType = SqlType::$sql;
            }
        )*
    };
}

impl_type_info! {
    i8 => SmallInt,
    i16 => SmallInt,
    u8 => SmallInt,
    u16 => Integer,
    i32 => Integer,
    u32 => BigInt,
    i64 => BigInt,
    f32 => Real,
    f64 => Double,
    bool => Boolean,
    String => Text,
    Vec<u8> => Blob,
}

impl<T: TypeInfo> TypeInfo for Option<T> {
    const SQL_TYPE: SqlType = T::SQL_TYPE;
    const NULLABLE: bool = true;
}

/// A fieldless enum persisted by variant name.
///
/// Variants are stored as their name in a `TEXT` column and decoded by exact,
/// case-sensitive name match. Renaming a variant therefore changes the
/// persisted representation. `NULL` decodes into the first declared variant.
///
/// Implement with `#[derive(SqlEnum)]`.
pub trait SqlEnum: Sized + 'static {
    /// Variant names in declaration order.
    const VARIANTS: &'static [&'static str];

    /// The stored name of this variant.
    fn variant_name(&self) -> &'static str;

    /// Look up a variant by its stored name.
    fn from_variant_name(name: &str) -> Option<Self>;
}

/// Encode an enum variant by name.
pub fn encode_enum<E: SqlEnum>(value: &E) -> Value {
    Value::Text(value.variant_name().to_string())
}

/// Decode an enum variant from its stored name.
pub fn decode_enum<E: SqlEnum>(value: &Value) -> Result<E, DecodeError> {
    let expected = std::any::type_name::<E>();
    match value {
        Value::Null => E::VARIANTS
            .first()
            .and_then(|name| E::from_variant_name(name))
            .ok_or_else(|| DecodeError::new(expected, "NULL")),
        Value::Text(name) => E::from_variant_name(name)
            .ok_or_else(|| DecodeError::new(expected, format!("unknown variant {name:?}"))),
        other => Err(DecodeError::new(expected, other.type_name())),
    }
}
