//! Core types and traits for rowmap.
//!
//! `rowmap-core` is the **foundation layer** of the workspace. It defines the
//! data types and contracts every other crate builds on.
//!
//! # Role In The Architecture
//!
//! - **Contract layer**: `Model` and `FromRow` are implemented by target shapes,
//!   `Connection` and `Cursor` by storage drivers.
//! - **Data model**: `Row`, `Value`, and `SqlType` carry query inputs and outputs.
//! - **Mapping**: the `mapper` module turns rows into typed values and instances
//!   back into column lists, driven by each shape's static `FieldInfo` table.
//!
//! # Who Uses This Crate
//!
//! - `rowmap-macros` generates `Model` and `SqlEnum` implementations defined here.
//! - `rowmap-query` binds `Value`s into statements and maps rows through `FromRow`.
//! - `rowmap-sqlite` implements `Connection` and produces `Row`s.
//!
//! Most applications should use the `rowmap` facade; reach for `rowmap-core`
//! directly when writing drivers.

pub mod connection;
pub mod error;
pub mod field;
pub mod identifiers;
pub mod mapper;
pub mod model;
pub mod row;
pub mod types;
pub mod value;

pub use connection::{Connection, Cursor, ExecuteResult, NamedParam, RowBuffer};
pub use error::{DecodeError, Error, Result};
pub use field::{FieldIndex, FieldInfo};
pub use identifiers::quote_ident;
pub use mapper::{
    MappedRows, map_all, map_first, map_optional, map_row, select_columns, to_columns,
};
pub use model::{FromRow, Model};
pub use row::Row;
pub use types::{SqlEnum, SqlType, TypeInfo};
pub use value::{FromValue, Value};
