//! Target shapes.
//!
//! A row maps into either a scalar (first column through the codec) or a
//! composite shape implementing [`Model`]. Both are reached through
//! [`FromRow`], which is what statements are generic over.

use crate::error::{DecodeError, Result};
use crate::field::FieldInfo;
use crate::mapper;
use crate::row::Row;
use crate::value::Value;

/// A composite shape with a static field descriptor table.
///
/// Usually implemented with `#[derive(Model)]`. Field positions passed to
/// [`Model::field_value`] and [`Model::set_field_value`] index into
/// [`Model::fields`]. Fields absent from a row keep the value `Default` gives
/// them.
pub trait Model: Default + Sized + 'static {
    /// Field descriptors in declaration order.
    fn fields() -> &'static [FieldInfo];

    /// Encode the field at `index`. Out-of-range positions encode as NULL.
    fn field_value(&self, index: usize) -> Value;

    /// Decode `value` into the field at `index`. Out-of-range positions are ignored.
    fn set_field_value(&mut self, index: usize, value: &Value) -> Result<(), DecodeError>;

    /// Human-readable shape name used in diagnostics.
    fn shape_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// The identity field, if the shape declares one.
    fn primary_key_field() -> Option<&'static FieldInfo> {
        Self::fields().iter().find(|f| f.primary_key)
    }

    /// Current value of the identity field.
    fn primary_key_value(&self) -> Option<Value> {
        Self::fields()
            .iter()
            .position(|f| f.primary_key)
            .map(|idx| self.field_value(idx))
    }
}

/// Anything a single row can be mapped into.
pub trait FromRow: Sized {
    /// Map one row.
    fn from_row(row: &Row) -> Result<Self>;
}

macro_rules! impl_from_row_scalar {
    ($($ty:ty),*) => {
        $(
            impl FromRow for $ty {
                fn from_row(row: &Row) -> Result<Self> {
                    mapper::map_scalar(row)
                }
            }
        )*
    };
}

impl_from_row_scalar!(
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    bool,
    String,
    Vec<u8>,
    Value
);

impl<T> FromRow for Option<T>
where
    T: crate::value::FromValue,
{
    fn from_row(row: &Row) -> Result<Self> {
        mapper::map_scalar(row)
    }
}

/// A row as-is.
impl FromRow for Row {
    fn from_row(row: &Row) -> Result<Self> {
        Ok(row.clone())
    }
}
