//! Object persistence helpers.
//!
//! These derive INSERT, UPDATE and REPLACE statements from a shape's field
//! table, bind every column from the instance by name, and run them through a
//! [`Command`]. Table and column names are back-quoted, so keyword columns
//! persist. Rendered text is cached per shape, table and statement kind.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use rowmap_core::mapper::{non_identity_columns, select_columns, to_columns};
use rowmap_core::{Connection, Error, FieldInfo, Model, Result, quote_ident};
use rowmap_query::{Command, InsertBuilder, UpdateBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum StatementKind {
    Insert,
    Update,
    Replace,
}

type CacheKey = (TypeId, String, StatementKind);

/// Process-wide cache of rendered statement text.
struct StatementCache {
    cache: RwLock<HashMap<CacheKey, Arc<str>>>,
}

impl StatementCache {
    fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn get_or_render<M: Model>(
        &self,
        table: &str,
        kind: StatementKind,
        render: impl FnOnce() -> String,
    ) -> Arc<str> {
        let key = (TypeId::of::<M>(), table.to_string(), kind);
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(sql) = cache.get(&key) {
                tracing::trace!(shape = M::shape_name(), table = table, ?kind, "Statement cache hit");
                return Arc::clone(sql);
            }
        }

        let sql: Arc<str> = render().into();
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.entry(key).or_insert(sql))
    }
}

fn statement_cache() -> &'static StatementCache {
    static CACHE: OnceLock<StatementCache> = OnceLock::new();
    CACHE.get_or_init(StatementCache::new)
}

fn identity<M: Model>() -> Result<&'static FieldInfo> {
    M::primary_key_field().ok_or(Error::MissingIdentity {
        shape: M::shape_name(),
    })
}

/// Bind the named columns of `value` onto `command`.
fn bind_columns<'c, C: Connection, M: Model>(
    command: Command<'c, C>,
    value: &M,
    columns: &[&str],
) -> Command<'c, C> {
    command.add_parameters(to_columns(value, columns))
}

/// Insert `value` into `table`, letting the store assign its identity.
///
/// Every field except the identity field is written. Returns the identity the
/// store assigned.
#[tracing::instrument(level = "debug", skip(conn, value))]
pub fn insert_value<C: Connection, M: Model>(conn: &C, table: &str, value: &M) -> Result<i64> {
    identity::<M>()?;
    let columns = non_identity_columns::<M>();

    tracing::info!(shape = M::shape_name(), table = table, "Inserting object");

    let sql = statement_cache().get_or_render::<M>(table, StatementKind::Insert, || {
        InsertBuilder::from_table(table)
            .add_columns(columns.iter().copied())
            .quote_identifiers()
            .build_query()
    });
    let result = bind_columns(Command::new(conn, &*sql), value, &columns).execute()?;
    Ok(result.last_insert_id)
}

/// Update the row of `table` whose identity matches `value`'s.
///
/// Every field except the identity field is written. Returns the number of
/// rows changed; a shape with no other fields changes nothing.
#[tracing::instrument(level = "debug", skip(conn, value))]
pub fn update_value<C: Connection, M: Model>(conn: &C, table: &str, value: &M) -> Result<u64> {
    let key = identity::<M>()?;
    let columns = non_identity_columns::<M>();
    if columns.is_empty() {
        tracing::debug!(shape = M::shape_name(), "No columns to update");
        return Ok(0);
    }

    tracing::info!(shape = M::shape_name(), table = table, "Updating object");

    let sql = statement_cache().get_or_render::<M>(table, StatementKind::Update, || {
        UpdateBuilder::from_table(table)
            .add_setters(columns.iter().copied())
            .set_filter(format!(
                "WHERE {} = @{}",
                quote_ident(key.column_name),
                key.column_name
            ))
            .quote_identifiers()
            .build_query()
    });

    let mut bound = columns;
    bound.push(key.column_name);
    let result = bind_columns(Command::new(conn, &*sql), value, &bound).execute()?;
    Ok(result.rows_affected)
}

/// Insert `value` into `table`, replacing any row with the same identity.
///
/// Every field, identity included, is written. Returns the row id of the
/// written row.
#[tracing::instrument(level = "debug", skip(conn, value))]
pub fn replace_value<C: Connection, M: Model>(conn: &C, table: &str, value: &M) -> Result<i64> {
    identity::<M>()?;
    let columns: Vec<&str> = M::fields().iter().map(|f| f.column_name).collect();

    tracing::info!(shape = M::shape_name(), table = table, "Replacing object");

    let sql = statement_cache().get_or_render::<M>(table, StatementKind::Replace, || {
        InsertBuilder::from_table(table)
            .add_columns(columns.iter().copied())
            .with_replacement()
            .quote_identifiers()
            .build_query()
    });
    let result = bind_columns(Command::new(conn, &*sql), value, &columns).execute()?;
    Ok(result.last_insert_id)
}

/// Replace the row with `value`'s identity, writing only the identity and the
/// listed columns.
///
/// The store deletes the old row first, so every column left out reverts to
/// its schema default.
#[tracing::instrument(level = "debug", skip(conn, value))]
pub fn replace_columns<C: Connection, M: Model>(
    conn: &C,
    table: &str,
    value: &M,
    columns: &[&str],
) -> Result<i64> {
    let key = identity::<M>()?;
    let mut written = vec![key.column_name];
    written.extend(
        select_columns::<M>(columns)
            .into_iter()
            .filter(|c| *c != key.column_name),
    );

    let sql = InsertBuilder::from_table(table)
        .add_columns(written.iter().copied())
        .with_replacement()
        .quote_identifiers()
        .build_query();
    let result = bind_columns(Command::new(conn, sql), value, &written).execute()?;
    Ok(result.last_insert_id)
}
