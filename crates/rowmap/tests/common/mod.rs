//! Shared shapes and schema for the SQLite-backed tests.

#![allow(dead_code)]

use rowmap::{Model, SqlEnum, SqliteConnection};

pub const TABLE: &str = "DataTypes";
pub const COPY_TABLE: &str = "DataTypesCopy";

#[derive(Debug, Clone, Copy, Default, PartialEq, SqlEnum)]
pub enum Rank {
    #[default]
    Recruit,
    Veteran,
    Captain,
}

#[derive(Debug, Clone, Default, PartialEq, Model)]
pub struct DataTypes {
    pub id: i32,
    #[model(column = "IntegerColumn")]
    pub integer_column: i32,
    #[model(column = "LongColumn")]
    pub long_column: i64,
    #[model(column = "FloatColumn")]
    pub float_column: f32,
    #[model(column = "DoubleColumn")]
    pub double_column: f64,
    #[model(column = "BooleanColumn")]
    pub boolean_column: bool,
    #[model(column = "StringColumn")]
    pub string_column: Option<String>,
    #[model(column = "ByteArrayColumn")]
    pub byte_array_column: Option<Vec<u8>>,
    #[model(column = "RankColumn")]
    pub rank_column: Rank,
}

fn create_table(name: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS `{name}` (
            `id` INTEGER PRIMARY KEY AUTOINCREMENT,
            `IntegerColumn` INTEGER,
            `LongColumn` BIGINT,
            `FloatColumn` REAL,
            `DoubleColumn` DOUBLE,
            `BooleanColumn` SMALLINT,
            `StringColumn` VARCHAR,
            `ByteArrayColumn` BLOB,
            `RankColumn` TEXT
        );"
    )
}

/// In-memory database with the `DataTypes` and `DataTypesCopy` tables.
pub fn database() -> SqliteConnection {
    let conn = SqliteConnection::open_in_memory().unwrap();
    conn.execute_batch(&create_table(TABLE)).unwrap();
    conn.execute_batch(&create_table(COPY_TABLE)).unwrap();
    conn
}
