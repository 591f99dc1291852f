//! SQLite driver for rowmap.
//!
//! Implements `rowmap_core::Connection` over rusqlite with the bundled SQLite
//! library. Queries run to completion when the cursor opens: the rows are
//! buffered and handed out one at a time, which keeps the cursor free of
//! borrows on the prepared statement.
//!
//! ```ignore
//! use rowmap_sqlite::{SqliteConfig, SqliteConnection};
//!
//! let conn = SqliteConnection::open(&SqliteConfig::file("app.db").foreign_keys(true))?;
//! conn.execute_batch("CREATE TABLE IF NOT EXISTS hero (id INTEGER PRIMARY KEY, name TEXT)")?;
//! ```

pub mod config;
pub mod connection;

pub use config::{DEFAULT_BUSY_TIMEOUT_MS, SqliteConfig};
pub use connection::SqliteConnection;
