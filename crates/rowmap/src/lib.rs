//! Typed rows and objects over parameterized SQL.
//!
//! `rowmap` is the facade crate. It re-exports the pieces an application
//! needs and adds object persistence helpers on top of them.
//!
//! # Role In The Architecture
//!
//! - **Core types**: `Value`, `Row`, `Model`, `FromRow` and the error taxonomy
//!   from `rowmap-core`.
//! - **Statements**: `Command`, `InsertBuilder`, `UpdateBuilder` from
//!   `rowmap-query`.
//! - **Derives**: `#[derive(Model)]` and `#[derive(SqlEnum)]` from
//!   `rowmap-macros`. Generated code names `::rowmap_core`, so crates that
//!   derive must depend on `rowmap-core` as well.
//! - **Driver**: `SqliteConnection` and `SqliteConfig` (feature `sqlite`, on by
//!   default).
//! - **Persistence**: [`insert_value`], [`update_value`], [`replace_value`] and
//!   [`replace_columns`].
//!
//! # Example
//!
//! ```ignore
//! use rowmap::prelude::*;
//!
//! #[derive(Debug, Default, Model)]
//! struct Hero {
//!     id: i64,
//!     name: String,
//!     age: Option<i32>,
//! }
//!
//! let conn = SqliteConnection::open_in_memory()?;
//! conn.execute_batch("CREATE TABLE hero (id INTEGER PRIMARY KEY, name TEXT, age INTEGER)")?;
//!
//! let id = insert_value(&conn, "hero", &Hero { name: "Deadpond".into(), ..Hero::default() })?;
//! let hero: Hero = Command::new(&conn, "SELECT * FROM hero WHERE id = @id")
//!     .add_parameter("id", id)
//!     .fetch_first()?;
//! ```

pub mod persist;

pub use persist::{insert_value, replace_columns, replace_value, update_value};

pub use rowmap_core::{
    Connection, Cursor, DecodeError, Error, ExecuteResult, FieldIndex, FieldInfo, FromRow,
    FromValue, MappedRows, Model, NamedParam, Result, Row, RowBuffer, SqlEnum, SqlType, TypeInfo,
    Value, map_all, map_first, map_optional, map_row, quote_ident, select_columns, to_columns,
};
pub use rowmap_macros::{Model, SqlEnum};
pub use rowmap_query::{Command, InsertBuilder, Rows, UpdateBuilder};

#[cfg(feature = "sqlite")]
pub use rowmap_sqlite::{SqliteConfig, SqliteConnection};

/// Everything most applications import.
pub mod prelude {
    pub use crate::persist::{insert_value, replace_columns, replace_value, update_value};
    pub use rowmap_core::{
        Connection, Error, FromRow, FromValue, Model, Result, Row, SqlEnum, Value,
    };
    pub use rowmap_macros::{Model, SqlEnum};
    pub use rowmap_query::{Command, InsertBuilder, UpdateBuilder};

    #[cfg(feature = "sqlite")]
    pub use rowmap_sqlite::{SqliteConfig, SqliteConnection};
}
