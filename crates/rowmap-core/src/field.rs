//! Field descriptors.
//!
//! Each composite shape carries a static table of [`FieldInfo`], built once by
//! `#[derive(Model)]`. The row mapper matches store columns against this table
//! instead of inspecting types at runtime.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::model::Model;
use crate::types::SqlType;

/// Metadata about a model field/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Rust field name
    pub name: &'static str,
    /// Canonical store spelling of the column
    pub column_name: &'static str,
    /// Declared SQL type
    pub sql_type: SqlType,
    /// Whether this field can hold NULL
    pub nullable: bool,
    /// Whether this is the identity field
    pub primary_key: bool,
}

impl FieldInfo {
    /// Create a new field info with minimal required data.
    pub const fn new(name: &'static str, column_name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            column_name,
            sql_type,
            nullable: false,
            primary_key: false,
        }
    }

    /// Set the database column name.
    pub const fn column(mut self, name: &'static str) -> Self {
        self.column_name = name;
        self
    }

    /// Set nullable flag.
    pub const fn nullable(mut self, value: bool) -> Self {
        self.nullable = value;
        self
    }

    /// Set primary key flag.
    pub const fn primary_key(mut self, value: bool) -> Self {
        self.primary_key = value;
        self
    }
}

/// Lower-cased identifier -> field position, for one shape.
///
/// Both the Rust field name and the column spelling resolve to the field.
/// Column spellings claim their keys first; a Rust name only resolves where no
/// column already claims it. Among equal keys of one kind, the field declared
/// first wins.
#[derive(Debug, Default)]
pub struct FieldIndex {
    positions: HashMap<String, usize>,
}

impl FieldIndex {
    /// Build an index over a descriptor table.
    pub fn new(fields: &[FieldInfo]) -> Self {
        let mut positions = HashMap::with_capacity(fields.len() * 2);
        for (idx, field) in fields.iter().enumerate() {
            positions.entry(field.column_name.to_lowercase()).or_insert(idx);
        }
        for (idx, field) in fields.iter().enumerate() {
            positions.entry(field.name.to_lowercase()).or_insert(idx);
        }
        Self { positions }
    }

    /// Positions of the fields named by `identifiers`, in declaration order
    /// and without repeats. Unknown identifiers are skipped.
    pub fn positions<'a>(&self, identifiers: impl IntoIterator<Item = &'a str>) -> Vec<usize> {
        let mut found: Vec<usize> = identifiers
            .into_iter()
            .filter_map(|identifier| self.position(identifier))
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Index for `M`, built on first use and shared afterwards.
    pub fn for_model<M: Model>() -> &'static FieldIndex {
        static INDEXES: OnceLock<RwLock<HashMap<TypeId, &'static FieldIndex>>> = OnceLock::new();
        let cache = INDEXES.get_or_init(|| RwLock::new(HashMap::new()));
        let key = TypeId::of::<M>();

        {
            let indexes = cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(index) = indexes.get(&key).copied() {
                return index;
            }
        }

        let mut indexes = cache.write().unwrap_or_else(PoisonError::into_inner);
        let index: &'static FieldIndex = *indexes.entry(key).or_insert_with(|| {
            tracing::trace!(shape = std::any::type_name::<M>(), "Building field index");
            Box::leak(Box::new(FieldIndex::new(M::fields())))
        });
        index
    }

    /// Position of the field matching `identifier`, ignoring case.
    pub fn position(&self, identifier: &str) -> Option<usize> {
        self.positions.get(&identifier.to_lowercase()).copied()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True if the shape has no fields.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static FIELDS: &[FieldInfo] = &[
        FieldInfo::new("id", "id", SqlType::Integer).primary_key(true),
        FieldInfo::new("integer_column", "IntegerColumn", SqlType::Integer),
        FieldInfo::new("string_column", "StringColumn", SqlType::Text).nullable(true),
    ];

    #[test]
    fn test_field_info_builders() {
        let field = FieldInfo::new("name", "name", SqlType::Text)
            .column("Name")
            .nullable(true);
        assert_eq!(field.column_name, "Name");
        assert!(field.nullable);
        assert!(!field.primary_key);
    }

    #[test]
    fn test_index_ignores_case() {
        let index = FieldIndex::new(FIELDS);
        assert_eq!(index.position("IntegerColumn"), Some(1));
        assert_eq!(index.position("integercolumn"), Some(1));
        assert_eq!(index.position("INTEGER_COLUMN"), Some(1));
        assert_eq!(index.position("Integer"), None);
    }

    #[test]
    fn test_index_resolves_name_and_column() {
        let index = FieldIndex::new(FIELDS);
        assert_eq!(index.position("ID"), Some(0));
        assert_eq!(index.position("integercolumn"), Some(1));
        assert_eq!(index.position("string_column"), Some(2));
        assert_eq!(index.position("StringCol"), None);
    }

    #[test]
    fn test_index_first_declared_wins() {
        static CLASH: &[FieldInfo] = &[
            FieldInfo::new("value", "value", SqlType::Text),
            FieldInfo::new("Value", "other", SqlType::Text),
        ];
        let index = FieldIndex::new(CLASH);
        assert_eq!(index.position("VALUE"), Some(0));
        assert_eq!(index.position("other"), Some(1));
    }

    #[test]
    fn test_index_columns_take_precedence_over_field_names() {
        static SWAPPED: &[FieldInfo] = &[
            FieldInfo::new("name", "title", SqlType::Text),
            FieldInfo::new("title", "name", SqlType::Text),
        ];
        let index = FieldIndex::new(SWAPPED);
        assert_eq!(index.position("title"), Some(0));
        assert_eq!(index.position("NAME"), Some(1));
    }

    #[test]
    fn test_positions_in_declaration_order() {
        let index = FieldIndex::new(FIELDS);
        assert_eq!(
            index.positions(["StringColumn", "nope", "ID", "string_column"]),
            [0, 2]
        );
    }
}
