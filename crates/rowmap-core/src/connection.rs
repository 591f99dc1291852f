//! The connection capability consumed by statements.
//!
//! rowmap never implements storage itself. A driver supplies a [`Connection`]
//! that runs SQL text with named parameters and hands back either an
//! [`ExecuteResult`] or a forward-only [`Cursor`].

use std::collections::VecDeque;

use crate::error::Result;
use crate::row::Row;
use crate::value::Value;

/// A bound parameter as handed to the connection.
///
/// `name` excludes the `@` prefix and binds by exact, case-sensitive match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedParam<'a> {
    /// Parameter name without the token prefix.
    pub name: &'a str,
    /// Encoded value.
    pub value: &'a Value,
}

impl<'a> NamedParam<'a> {
    /// Create a named parameter.
    pub const fn new(name: &'a str, value: &'a Value) -> Self {
        Self { name, value }
    }

    /// The token as it appears in SQL text.
    pub fn token(&self) -> String {
        format!("@{}", self.name)
    }
}

/// Outcome of a statement that returns no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecuteResult {
    /// Row id the store assigned to the most recent insert on this connection.
    pub last_insert_id: i64,
    /// Rows changed by this statement.
    pub rows_affected: u64,
}

/// A live, forward-only handle over a query's rows.
///
/// The cursor is released when dropped.
pub trait Cursor {
    /// Fetch the next row, or `None` when exhausted.
    fn next_row(&mut self) -> Result<Option<Row>>;
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    fn next_row(&mut self) -> Result<Option<Row>> {
        (**self).next_row()
    }
}

/// A database connection.
///
/// Calls block the current thread for their full duration.
pub trait Connection {
    /// Cursor type returned by [`Connection::query`].
    type Cursor<'c>: Cursor
    where
        Self: 'c;

    /// Run a statement that returns no rows.
    fn execute(&self, sql: &str, params: &[NamedParam<'_>]) -> Result<ExecuteResult>;

    /// Open a cursor over a query's rows.
    fn query<'c>(&'c self, sql: &str, params: &[NamedParam<'_>]) -> Result<Self::Cursor<'c>>;
}

/// A cursor over rows already pulled from the store.
#[derive(Debug, Clone, Default)]
pub struct RowBuffer {
    rows: VecDeque<Row>,
}

impl RowBuffer {
    /// Wrap buffered rows.
    pub fn new(rows: impl Into<VecDeque<Row>>) -> Self {
        Self { rows: rows.into() }
    }

    /// Rows not yet handed out.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl Cursor for RowBuffer {
    fn next_row(&mut self) -> Result<Option<Row>> {
        Ok(self.rows.pop_front())
    }
}
