//! SQLite connection over rusqlite.

use std::sync::Arc;

use rowmap_core::{
    Connection, Error, ExecuteResult, NamedParam, Result, Row, RowBuffer, Value,
};
use rusqlite::types::{ToSqlOutput, ValueRef};

use crate::config::SqliteConfig;

/// A blocking SQLite connection.
///
/// Parameters bind through SQLite's own named-parameter mechanism, so `@name`
/// tokens never pass through string formatting. Prepared statements are cached
/// per connection.
pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl std::fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.conn.path())
            .finish_non_exhaustive()
    }
}

impl SqliteConnection {
    /// Open a connection as described by `config`.
    #[tracing::instrument(level = "debug", skip(config), fields(path = ?config.path))]
    pub fn open(config: &SqliteConfig) -> Result<Self> {
        config.validate()?;
        let flags = config.open_flags();
        let conn = match &config.path {
            Some(path) => rusqlite::Connection::open_with_flags(path, flags).map_err(|e| {
                Error::Config(format!("cannot open {}: {e}", path.display()))
            })?,
            None => rusqlite::Connection::open_in_memory_with_flags(flags)
                .map_err(|e| Error::Config(format!("cannot open in-memory database: {e}")))?,
        };

        let pragma = if config.foreign_keys {
            "PRAGMA foreign_keys = ON;"
        } else {
            "PRAGMA foreign_keys = OFF;"
        };
        conn.execute_batch(pragma)
            .map_err(|e| Error::persistence(pragma, e))?;
        conn.busy_timeout(config.busy_timeout_duration())
            .map_err(|e| Error::persistence("PRAGMA busy_timeout", e))?;

        tracing::info!(
            memory = config.is_memory(),
            read_only = config.read_only,
            "Opened SQLite connection"
        );
        Ok(Self { conn })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::open(&SqliteConfig::memory())
    }

    /// Open (creating if needed) the database file at `path`.
    pub fn open_path(path: impl Into<std::path::PathBuf>) -> Result<Self> {
        Self::open(&SqliteConfig::file(path))
    }

    /// Run several `;`-separated statements without parameters.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        tracing::debug!(sql = sql, "Executing batch");
        self.conn
            .execute_batch(sql)
            .map_err(|e| Error::persistence(sql, e))
    }

    /// The row id of the most recent successful insert on this connection.
    pub fn last_insert_id(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    /// The underlying rusqlite connection.
    pub fn inner(&self) -> &rusqlite::Connection {
        &self.conn
    }

    fn prepare(&self, sql: &str, params: &[NamedParam<'_>]) -> Result<rusqlite::CachedStatement<'_>> {
        let mut stmt = self
            .conn
            .prepare_cached(sql)
            .map_err(|e| Error::persistence(sql, e))?;
        for param in params {
            let token = param.token();
            let index = stmt
                .parameter_index(&token)
                .map_err(|e| Error::persistence(sql, e))?;
            let Some(index) = index else {
                tracing::warn!(param = %token, sql = sql, "Statement has no such parameter");
                continue;
            };
            stmt.raw_bind_parameter(index, ToSqlOutput::Borrowed(value_ref(param.value)))
                .map_err(|e| Error::persistence(sql, e))?;
        }
        Ok(stmt)
    }
}

impl Connection for SqliteConnection {
    type Cursor<'c>
        = RowBuffer
    where
        Self: 'c;

    fn execute(&self, sql: &str, params: &[NamedParam<'_>]) -> Result<ExecuteResult> {
        let mut stmt = self.prepare(sql, params)?;
        let changed = stmt.raw_execute().map_err(|e| Error::persistence(sql, e))?;
        Ok(ExecuteResult {
            last_insert_id: self.conn.last_insert_rowid(),
            rows_affected: changed as u64,
        })
    }

    fn query<'c>(&'c self, sql: &str, params: &[NamedParam<'_>]) -> Result<Self::Cursor<'c>> {
        let mut stmt = self.prepare(sql, params)?;
        let columns: Arc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = stmt.raw_query();
        let mut buffered = Vec::new();
        while let Some(row) = rows.next().map_err(|e| Error::persistence(sql, e))? {
            let mut values = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                let value = row.get_ref(idx).map_err(|e| Error::persistence(sql, e))?;
                values.push(value_from_ref(value));
            }
            buffered.push(Row::new(Arc::clone(&columns), values));
        }
        tracing::trace!(sql = sql, rows = buffered.len(), "Buffered query rows");
        Ok(RowBuffer::new(buffered))
    }
}

fn value_ref(value: &Value) -> ValueRef<'_> {
    match value {
        Value::Null => ValueRef::Null,
        Value::Integer(v) => ValueRef::Integer(*v),
        Value::Real(v) => ValueRef::Real(*v),
        Value::Text(v) => ValueRef::Text(v.as_bytes()),
        Value::Blob(v) => ValueRef::Blob(v),
    }
}

/// TEXT that is not valid UTF-8 comes back as a blob with its bytes intact.
fn value_from_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Integer(v),
        ValueRef::Real(v) => Value::Real(v),
        ValueRef::Text(text) => match std::str::from_utf8(text) {
            Ok(text) => Value::Text(text.to_string()),
            Err(_) => Value::Blob(text.to_vec()),
        },
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}
