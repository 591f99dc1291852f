//! Fluent builders for INSERT and UPDATE statement text.
//!
//! Builders only render SQL. Each column `c` is bound through the `@c`
//! parameter token, so the rendered text is meant to run through a
//! [`Command`](crate::Command) with one binding per column.
//!
//! Identifiers render as given unless `quote_identifiers()` is set, in which
//! case the table and column names are back-quoted while the `@c` tokens keep
//! the raw name.
//!
//! Rendering is a pure projection of the builder state: calling
//! `build_query()` twice gives the same text, and later changes to the builder
//! never reach text already returned.

use rowmap_core::quote_ident;

fn render_ident(name: &str, quoted: bool) -> String {
    if quoted {
        quote_ident(name)
    } else {
        name.to_string()
    }
}

/// INSERT statement builder.
///
/// # Example
///
/// ```
/// use rowmap_query::InsertBuilder;
///
/// let sql = InsertBuilder::from_table("hero")
///     .add_column("name")
///     .add_column("age")
///     .build_query();
/// assert_eq!(sql, "INSERT INTO hero (name, age) VALUES (@name, @age)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertBuilder {
    table: String,
    columns: Vec<String>,
    replace: bool,
    quoted: bool,
}

impl InsertBuilder {
    /// Start an INSERT into `table`.
    pub fn from_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            replace: false,
            quoted: false,
        }
    }

    /// Add a column. Adding a column already present changes nothing.
    pub fn add_column(mut self, column: impl Into<String>) -> Self {
        let column = column.into();
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
        self
    }

    /// Add several columns in order.
    pub fn add_columns<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        columns.into_iter().fold(self, Self::add_column)
    }

    /// Render `INSERT OR REPLACE`.
    ///
    /// The store deletes any row with the same key before inserting, so
    /// columns not listed revert to their schema defaults.
    pub fn with_replacement(mut self) -> Self {
        self.replace = true;
        self
    }

    /// Back-quote the table and column names when rendering.
    pub fn quote_identifiers(mut self) -> Self {
        self.quoted = true;
        self
    }

    /// Target table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Columns in insertion order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Render the statement text.
    ///
    /// With no columns the statement inserts a row of schema defaults.
    pub fn build_query(&self) -> String {
        let verb = if self.replace {
            "INSERT OR REPLACE INTO"
        } else {
            "INSERT INTO"
        };

        let table = render_ident(&self.table, self.quoted);
        if self.columns.is_empty() {
            return format!("{verb} {table} DEFAULT VALUES");
        }

        let columns = self
            .columns
            .iter()
            .map(|c| render_ident(c, self.quoted))
            .collect::<Vec<_>>()
            .join(", ");
        let tokens = self
            .columns
            .iter()
            .map(|c| format!("@{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{verb} {table} ({columns}) VALUES ({tokens})")
    }
}

/// UPDATE statement builder.
///
/// # Example
///
/// ```
/// use rowmap_query::UpdateBuilder;
///
/// let sql = UpdateBuilder::from_table("T")
///     .add_setter("A")
///     .add_setter("B")
///     .set_filter("WHERE X = 1")
///     .build_query();
/// assert_eq!(sql, "UPDATE T SET A = @A, B = @B WHERE X = 1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBuilder {
    table: String,
    setters: Vec<String>,
    filter: String,
    quoted: bool,
}

impl UpdateBuilder {
    /// Start an UPDATE of `table`.
    pub fn from_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            setters: Vec::new(),
            filter: String::new(),
            quoted: false,
        }
    }

    /// Add a `column = @column` setter. Adding one already present changes
    /// nothing.
    pub fn add_setter(mut self, column: impl Into<String>) -> Self {
        let column = column.into();
        if !self.setters.contains(&column) {
            self.setters.push(column);
        }
        self
    }

    /// Add several setters in order.
    pub fn add_setters<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        columns.into_iter().fold(self, Self::add_setter)
    }

    /// Set the filter clause, replacing any earlier one.
    ///
    /// The text is appended verbatim, so it carries its own `WHERE`.
    pub fn set_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Back-quote the table and setter names when rendering. The filter is
    /// still appended verbatim.
    pub fn quote_identifiers(mut self) -> Self {
        self.quoted = true;
        self
    }

    /// Target table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Setter columns in insertion order.
    pub fn setters(&self) -> &[String] {
        &self.setters
    }

    /// Current filter clause.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Render the statement text.
    pub fn build_query(&self) -> String {
        let setters = self
            .setters
            .iter()
            .map(|c| format!("{} = @{c}", render_ident(c, self.quoted)))
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("UPDATE {} SET {setters}", render_ident(&self.table, self.quoted));
        if !self.filter.is_empty() {
            sql.push(' ');
            sql.push_str(&self.filter);
        }
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_basic() {
        let sql = InsertBuilder::from_table("DataTypes")
            .add_column("IntegerColumn")
            .add_column("StringColumn")
            .build_query();
        assert_eq!(
            sql,
            "INSERT INTO DataTypes (IntegerColumn, StringColumn) VALUES (@IntegerColumn, @StringColumn)"
        );
    }

    #[test]
    fn test_insert_replacement() {
        let sql = InsertBuilder::from_table("t")
            .add_column("id")
            .add_column("name")
            .with_replacement()
            .build_query();
        assert_eq!(sql, "INSERT OR REPLACE INTO t (id, name) VALUES (@id, @name)");
    }

    #[test]
    fn test_insert_duplicate_column_is_ignored() {
        let builder = InsertBuilder::from_table("t")
            .add_column("a")
            .add_column("b")
            .add_column("a");
        assert_eq!(builder.columns(), ["a", "b"]);
        assert_eq!(builder.build_query(), "INSERT INTO t (a, b) VALUES (@a, @b)");
    }

    #[test]
    fn test_insert_without_columns() {
        assert_eq!(
            InsertBuilder::from_table("t").build_query(),
            "INSERT INTO t DEFAULT VALUES"
        );
    }

    #[test]
    fn test_update_with_filter() {
        let sql = UpdateBuilder::from_table("T")
            .add_setter("A")
            .add_setter("B")
            .set_filter("WHERE X = 1")
            .build_query();
        assert_eq!(sql, "UPDATE T SET A = @A, B = @B WHERE X = 1");
    }

    #[test]
    fn test_update_without_filter_has_no_trailing_space() {
        let sql = UpdateBuilder::from_table("T").add_setter("A").build_query();
        assert_eq!(sql, "UPDATE T SET A = @A");
    }

    #[test]
    fn test_update_rebuild_reflects_later_state() {
        let builder = UpdateBuilder::from_table("ANYTHING")
            .add_setter("9OAPmpysH4N")
            .add_setter("V30y8VlAsOv")
            .add_setter("xEtwtOtck")
            .set_filter("WHERE UBGK4K2C = 327");
        let first = builder.build_query();

        let builder = builder
            .add_setter("kAk34bARlin")
            .set_filter("WHERE MxOdSfDWAB7 IN (388)");
        let second = builder.build_query();

        assert_eq!(
            first,
            "UPDATE ANYTHING SET 9OAPmpysH4N = @9OAPmpysH4N, V30y8VlAsOv = @V30y8VlAsOv, xEtwtOtck = @xEtwtOtck WHERE UBGK4K2C = 327"
        );
        assert_eq!(
            second,
            "UPDATE ANYTHING SET 9OAPmpysH4N = @9OAPmpysH4N, V30y8VlAsOv = @V30y8VlAsOv, xEtwtOtck = @xEtwtOtck, kAk34bARlin = @kAk34bARlin WHERE MxOdSfDWAB7 IN (388)"
        );
        assert_eq!(builder.build_query(), second);
    }

    #[test]
    fn test_update_filter_overwrites_and_setters_dedupe() {
        let builder = UpdateBuilder::from_table("t")
            .add_setters(["a", "b", "a"])
            .set_filter("WHERE id = 1")
            .set_filter("WHERE id = @id");
        assert_eq!(builder.setters(), ["a", "b"]);
        assert_eq!(builder.filter(), "WHERE id = @id");
        assert_eq!(builder.build_query(), "UPDATE t SET a = @a, b = @b WHERE id = @id");
    }

    #[test]
    fn test_quoted_identifiers_keep_raw_tokens() {
        let insert = InsertBuilder::from_table("ticket")
            .add_columns(["group", "order"])
            .quote_identifiers()
            .build_query();
        assert_eq!(
            insert,
            "INSERT INTO `ticket` (`group`, `order`) VALUES (@group, @order)"
        );

        let update = UpdateBuilder::from_table("ticket")
            .add_setter("values")
            .set_filter("WHERE `id` = @id")
            .quote_identifiers()
            .build_query();
        assert_eq!(update, "UPDATE `ticket` SET `values` = @values WHERE `id` = @id");

        assert_eq!(
            InsertBuilder::from_table("ticket").quote_identifiers().build_query(),
            "INSERT INTO `ticket` DEFAULT VALUES"
        );
    }

    #[test]
    fn test_clone_forks_state() {
        let base = InsertBuilder::from_table("t").add_column("a");
        let forked = base.clone().add_column("b");
        assert_eq!(base.build_query(), "INSERT INTO t (a) VALUES (@a)");
        assert_eq!(forked.build_query(), "INSERT INTO t (a, b) VALUES (@a, @b)");
    }
}
