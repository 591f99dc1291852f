//! Result rows.

use std::sync::Arc;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::value::{FromValue, Value};

/// One record returned by the store: ordered `(column, value)` pairs.
///
/// Column names are shared between all rows of one cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Create a row. Extra values beyond the column list are dropped, missing
    /// ones read as NULL.
    pub fn new(columns: Arc<[String]>, mut values: Vec<Value>) -> Self {
        values.resize(columns.len(), Value::Null);
        Self { columns, values }
    }

    /// Build a row from owned pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let (columns, values): (Vec<String>, Vec<Value>) =
            pairs.into_iter().map(|(c, v)| (c.into(), v)).unzip();
        Self {
            columns: columns.into(),
            values,
        }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Column names in order.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Value at a column position.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Value of the first column whose name matches, ignoring case.
    pub fn get_named(&self, column: &str) -> Option<&Value> {
        let wanted = column.to_lowercase();
        self.columns
            .iter()
            .position(|c| c.to_lowercase() == wanted)
            .and_then(|idx| self.values.get(idx))
    }

    /// Decode a named column into `T`.
    pub fn decode_named<T: FromValue>(&self, column: &str) -> Result<T> {
        let value = self.get_named(column).unwrap_or(&Value::Null);
        T::from_value(value).map_err(|e| Error::type_mismatch(column, e))
    }

    /// Iterate `(column, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Consume the row, keeping only the values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let pairs = Vec::<(String, Value)>::deserialize(deserializer)?;
        Ok(Row::from_pairs(pairs))
    }
}
