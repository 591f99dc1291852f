//! Row mapping in both directions.
//!
//! Rows become values through [`map_row`] (any [`FromRow`]), [`map_scalar`]
//! (first column) or [`map_model`] (column-to-field matching). Cursors become
//! lazy sequences through [`map_all`]. Instances become column lists through
//! [`to_columns`].

use std::marker::PhantomData;

use crate::connection::Cursor;
use crate::error::{Error, Result};
use crate::field::FieldIndex;
use crate::model::{FromRow, Model};
use crate::row::Row;
use crate::value::{FromValue, Value};

/// Map one row into any target shape.
pub fn map_row<T: FromRow>(row: &Row) -> Result<T> {
    T::from_row(row)
}

/// Decode the first column of a row.
pub fn map_scalar<T: FromValue>(row: &Row) -> Result<T> {
    let Some((column, value)) = row.iter().next() else {
        return Err(Error::TypeMismatch {
            column: String::new(),
            expected: std::any::type_name::<T>(),
            found: "a row without columns".to_string(),
        });
    };
    T::from_value(value).map_err(|e| Error::type_mismatch(column, e))
}

/// Populate a default-valued instance from a row.
///
/// Each column is matched against the shape's fields by case-insensitive
/// equality of the whole identifier. Unmatched columns are ignored; fields
/// without a column keep their default.
pub fn map_model<M: Model>(row: &Row) -> Result<M> {
    let index = FieldIndex::for_model::<M>();
    let mut instance = M::default();
    for (column, value) in row.iter() {
        let Some(position) = index.position(column) else {
            continue;
        };
        instance
            .set_field_value(position, value)
            .map_err(|e| Error::type_mismatch(column, e))?;
    }
    Ok(instance)
}

/// Lazy, single-pass sequence of mapped rows over a cursor.
///
/// The cursor is dropped as soon as it reports exhaustion or an error.
pub struct MappedRows<C: Cursor, T> {
    cursor: Option<C>,
    _marker: PhantomData<fn() -> T>,
}

impl<C: Cursor, T> std::fmt::Debug for MappedRows<C, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedRows")
            .field("open", &self.cursor.is_some())
            .finish()
    }
}

impl<C: Cursor, T> MappedRows<C, T> {
    /// True while the cursor is still held.
    pub fn is_open(&self) -> bool {
        self.cursor.is_some()
    }
}

impl<C: Cursor, T: FromRow> Iterator for MappedRows<C, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;
        match cursor.next_row() {
            Ok(Some(row)) => Some(T::from_row(&row)),
            Ok(None) => {
                self.cursor = None;
                None
            }
            Err(e) => {
                self.cursor = None;
                Some(Err(e))
            }
        }
    }
}

/// Map every row a cursor yields, lazily.
pub fn map_all<C: Cursor, T: FromRow>(cursor: C) -> MappedRows<C, T> {
    MappedRows {
        cursor: Some(cursor),
        _marker: PhantomData,
    }
}

/// Map the first row, or `None` if the cursor is empty.
///
/// The cursor is released before returning.
pub fn map_optional<C: Cursor, T: FromRow>(mut cursor: C) -> Result<Option<T>> {
    match cursor.next_row()? {
        Some(row) => T::from_row(&row).map(Some),
        None => Ok(None),
    }
}

/// Map the first row, failing with [`Error::EmptyResult`] if there is none.
pub fn map_first<C: Cursor, T: FromRow>(cursor: C) -> Result<T> {
    map_optional(cursor)?.ok_or_else(|| Error::EmptyResult { sql: String::new() })
}

/// Encode the chosen fields of an instance as `(column, value)` pairs.
///
/// Fields are emitted in declaration order under their canonical column
/// spelling. `include` names resolve through the shape's [`FieldIndex`], so a
/// column spelling wins over another field's Rust name.
pub fn to_columns<M: Model>(instance: &M, include: &[&str]) -> Vec<(&'static str, Value)> {
    let fields = M::fields();
    FieldIndex::for_model::<M>()
        .positions(include.iter().copied())
        .into_iter()
        .filter_map(|idx| Some((fields.get(idx)?.column_name, instance.field_value(idx))))
        .collect()
}

/// Canonical column names of the fields named by `include`, in declaration
/// order.
pub fn select_columns<M: Model>(include: &[&str]) -> Vec<&'static str> {
    let fields = M::fields();
    FieldIndex::for_model::<M>()
        .positions(include.iter().copied())
        .into_iter()
        .filter_map(|idx| fields.get(idx).map(|f| f.column_name))
        .collect()
}

/// Column names of every field except the identity field, in declaration order.
pub fn non_identity_columns<M: Model>() -> Vec<&'static str> {
    M::fields()
        .iter()
        .filter(|f| !f.primary_key)
        .map(|f| f.column_name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::RowBuffer;
    use crate::error::DecodeError;
    use crate::field::FieldInfo;
    use crate::types::SqlType;

    #[derive(Debug, Default, PartialEq)]
    struct DataTypes {
        id: i32,
        integer_column: i32,
        long_column: i64,
        string_column: Option<String>,
    }

    impl Model for DataTypes {
        fn fields() -> &'static [FieldInfo] {
            static FIELDS: &[FieldInfo] = &[
                FieldInfo::new("id", "id", SqlType::Integer).primary_key(true),
                FieldInfo::new("integer_column", "IntegerColumn", SqlType::Integer),
                FieldInfo::new("long_column", "LongColumn", SqlType::BigInt),
                FieldInfo::new("string_column", "StringColumn", SqlType::Text).nullable(true),
            ];
            FIELDS
        }

        fn field_value(&self, index: usize) -> Value {
            match index {
                0 => Value::from(self.id),
                1 => Value::from(self.integer_column),
                2 => Value::from(self.long_column),
                3 => Value::from(self.string_column.clone()),
                _ => Value::Null,
            }
        }

        fn set_field_value(&mut self, index: usize, value: &Value) -> Result<(), DecodeError> {
            match index {
                0 => self.id = FromValue::from_value(value)?,
                1 => self.integer_column = FromValue::from_value(value)?,
                2 => self.long_column = FromValue::from_value(value)?,
                3 => self.string_column = FromValue::from_value(value)?,
                _ => {}
            }
            Ok(())
        }
    }

    impl FromRow for DataTypes {
        fn from_row(row: &Row) -> Result<Self> {
            map_model(row)
        }
    }

    fn row(pairs: &[(&str, Value)]) -> Row {
        Row::from_pairs(pairs.iter().cloned())
    }

    #[test]
    fn test_map_model_matches_case_insensitively() {
        let mapped: DataTypes = map_row(&row(&[
            ("ID", Value::Integer(1)),
            ("integercolumn", Value::Integer(841)),
            ("LONGCOLUMN", Value::Integer(76_772_878_174)),
            ("StringColumn", Value::Text("arrest".to_string())),
        ]))
        .unwrap();

        assert_eq!(
            mapped,
            DataTypes {
                id: 1,
                integer_column: 841,
                long_column: 76_772_878_174,
                string_column: Some("arrest".to_string()),
            }
        );
    }

    #[test]
    fn test_map_model_ignores_unknown_and_keeps_defaults() {
        let mapped: DataTypes = map_row(&row(&[
            ("Unrelated", Value::Text("x".to_string())),
            ("IntegerColumn", Value::Integer(5)),
            ("Integer", Value::Integer(99)),
        ]))
        .unwrap();

        assert_eq!(
            mapped,
            DataTypes {
                integer_column: 5,
                ..DataTypes::default()
            }
        );
    }

    #[test]
    fn test_map_model_reports_column_on_mismatch() {
        let err = map_row::<DataTypes>(&row(&[("IntegerColumn", Value::Real(1.5))])).unwrap_err();
        match err {
            Error::TypeMismatch {
                column, expected, ..
            } => {
                assert_eq!(column, "IntegerColumn");
                assert_eq!(expected, "i32");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_map_scalar_takes_first_column() {
        let count: i64 = map_row(&row(&[
            ("COUNT(*)", Value::Integer(3)),
            ("other", Value::Text("x".to_string())),
        ]))
        .unwrap();
        assert_eq!(count, 3);

        let missing: Option<String> = map_row(&row(&[("s", Value::Null)])).unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_map_scalar_on_empty_row() {
        let err = map_scalar::<i32>(&Row::from_pairs(Vec::<(String, Value)>::new())).unwrap_err();
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn test_map_all_is_lazy_and_releases_cursor() {
        let cursor = RowBuffer::new(vec![
            row(&[("n", Value::Integer(1))]),
            row(&[("n", Value::Integer(2))]),
        ]);
        let mut rows = map_all::<_, i32>(cursor);
        assert!(rows.is_open());
        assert_eq!(rows.next().unwrap().unwrap(), 1);
        assert_eq!(rows.next().unwrap().unwrap(), 2);
        assert!(rows.next().is_none());
        assert!(!rows.is_open());
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_map_all_empty_is_not_an_error() {
        let rows: Vec<i32> = map_all(RowBuffer::default())
            .collect::<Result<_>>()
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_map_first_on_empty() {
        let err = map_first::<_, i32>(RowBuffer::default()).unwrap_err();
        assert!(err.is_empty_result());
        assert_eq!(map_optional::<_, i32>(RowBuffer::default()).unwrap(), None);
    }

    #[test]
    fn test_to_columns_uses_canonical_spelling() {
        let value = DataTypes {
            id: 4,
            integer_column: 841,
            long_column: 7,
            string_column: None,
        };
        let columns = to_columns(&value, &["STRING_COLUMN", "integercolumn"]);
        assert_eq!(
            columns,
            vec![
                ("IntegerColumn", Value::Integer(841)),
                ("StringColumn", Value::Null),
            ]
        );
    }

    #[test]
    fn test_non_identity_columns() {
        assert_eq!(
            non_identity_columns::<DataTypes>(),
            vec!["IntegerColumn", "LongColumn", "StringColumn"]
        );
        assert_eq!(
            DataTypes::default().primary_key_value(),
            Some(Value::Integer(0))
        );
    }
}
