//! Parameterized statements.
//!
//! A [`Command`] pairs SQL text with named parameter bindings. Binding is
//! checked when the statement runs: every `@name` token in the text must have
//! a value, or the call fails with [`Error::UnboundParameter`] before the
//! connection is touched.

use std::collections::HashMap;
use std::fmt;

use rowmap_core::mapper::{MappedRows, map_all, map_optional};
use rowmap_core::{Connection, Error, ExecuteResult, FromRow, NamedParam, Result, Value};

use crate::params::parameter_names;

/// A parameterized SQL statement bound to a connection.
///
/// # Example
///
/// ```ignore
/// let heroes: Vec<Hero> = Command::new(&conn, "SELECT * FROM hero WHERE age > @age")
///     .add_parameter("age", 30)
///     .fetch()?
///     .collect::<Result<_>>()?;
/// ```
pub struct Command<'c, C: Connection> {
    conn: &'c C,
    sql: String,
    params: HashMap<String, Value>,
}

impl<'c, C: Connection> Command<'c, C> {
    /// Create a statement over `sql` with no bindings.
    pub fn new(conn: &'c C, sql: impl Into<String>) -> Self {
        Self {
            conn,
            sql: sql.into(),
            params: HashMap::new(),
        }
    }

    /// Bind `value` under `name` (without the `@`). Rebinding a name replaces
    /// the earlier value.
    pub fn add_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Bind many values at once.
    pub fn add_parameters<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// The statement text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The value bound under `name`, if any.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Resolve every token in the text to its bound value.
    ///
    /// Bindings the text never references are left out.
    fn bindings(&self) -> Result<Vec<NamedParam<'_>>> {
        let names = parameter_names(&self.sql);
        let mut bound = Vec::with_capacity(names.len());
        for name in names.iter() {
            let Some((key, value)) = self.params.get_key_value(name.as_str()) else {
                return Err(Error::UnboundParameter {
                    name: name.clone(),
                    sql: self.sql.clone(),
                });
            };
            tracing::trace!(param = %key, value = ?value, "Binding parameter");
            bound.push(NamedParam::new(key, value));
        }
        Ok(bound)
    }

    /// Run a statement that returns no rows.
    pub fn execute(&self) -> Result<ExecuteResult> {
        let params = self.bindings()?;
        tracing::debug!(sql = %self.sql, params = params.len(), "Executing statement");
        let result = self.conn.execute(&self.sql, &params)?;
        tracing::debug!(
            rows_affected = result.rows_affected,
            last_insert_id = result.last_insert_id,
            "Statement complete"
        );
        Ok(result)
    }

    /// Map every result row into `T`, lazily.
    ///
    /// Bindings are resolved now; the cursor opens on the first pull and is
    /// released when the sequence ends or is dropped.
    pub fn fetch<T: FromRow>(&self) -> Result<Rows<'_, C, T>> {
        let params = self.bindings()?;
        Ok(Rows {
            conn: self.conn,
            sql: &self.sql,
            params,
            state: RowsState::Pending,
        })
    }

    /// Map the first result row into `T`.
    ///
    /// Fails with [`Error::EmptyResult`] when the query yields no rows.
    pub fn fetch_first<T: FromRow>(&self) -> Result<T> {
        self.fetch_optional()?.ok_or_else(|| Error::EmptyResult {
            sql: self.sql.clone(),
        })
    }

    /// Map the first result row into `T`, or `None` when there is none.
    pub fn fetch_optional<T: FromRow>(&self) -> Result<Option<T>> {
        let params = self.bindings()?;
        tracing::debug!(sql = %self.sql, params = params.len(), "Opening cursor");
        let cursor = self.conn.query(&self.sql, &params)?;
        map_optional(cursor)
    }
}

impl<C: Connection> fmt::Debug for Command<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.params.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Command")
            .field("sql", &self.sql)
            .field("params", &names)
            .finish_non_exhaustive()
    }
}

enum RowsState<'c, C: Connection + 'c, T> {
    Pending,
    Open(MappedRows<C::Cursor<'c>, T>),
    Done,
}

/// Lazy, single-pass sequence of mapped rows returned by [`Command::fetch`].
pub struct Rows<'c, C: Connection, T> {
    conn: &'c C,
    sql: &'c str,
    params: Vec<NamedParam<'c>>,
    state: RowsState<'c, C, T>,
}

impl<C: Connection, T> Rows<'_, C, T> {
    /// True while a cursor is held.
    pub fn is_open(&self) -> bool {
        matches!(self.state, RowsState::Open(_))
    }

    /// The statement text.
    pub fn sql(&self) -> &str {
        self.sql
    }
}

impl<C: Connection, T: FromRow> Iterator for Rows<'_, C, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.state, RowsState::Pending) {
            tracing::debug!(sql = %self.sql, params = self.params.len(), "Opening cursor");
            match self.conn.query(self.sql, &self.params) {
                Ok(cursor) => self.state = RowsState::Open(map_all(cursor)),
                Err(e) => {
                    self.state = RowsState::Done;
                    return Some(Err(e));
                }
            }
        }

        let RowsState::Open(rows) = &mut self.state else {
            return None;
        };
        let item = rows.next();
        if !rows.is_open() {
            tracing::trace!(sql = %self.sql, "Cursor released");
            self.state = RowsState::Done;
        }
        item
    }
}

impl<C: Connection, T> fmt::Debug for Rows<'_, C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            RowsState::Pending => "pending",
            RowsState::Open(_) => "open",
            RowsState::Done => "done",
        };
        f.debug_struct("Rows")
            .field("sql", &self.sql)
            .field("state", &state)
            .finish_non_exhaustive()
    }
}
