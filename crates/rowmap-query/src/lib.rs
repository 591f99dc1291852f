//! Parameterized statements and SQL builders for rowmap.
//!
//! `rowmap-query` is the **statement layer**. It sits between application code
//! and a `Connection`, turning SQL text plus named bindings into typed results.
//!
//! # Role In The Architecture
//!
//! - **Commands**: [`Command`] binds `@name` tokens and maps rows through
//!   `FromRow`, either lazily ([`Command::fetch`]) or one row at a time.
//! - **Builders**: [`InsertBuilder`] and [`UpdateBuilder`] render the INSERT and
//!   UPDATE text the persistence helpers run.
//! - **Token scanning**: [`params`] finds the `@name` tokens a statement needs.

pub mod builder;
pub mod command;
pub mod params;

pub use builder::{InsertBuilder, UpdateBuilder};
pub use command::{Command, Rows};
pub use params::{PARAM_CACHE_CAPACITY, parameter_names, scan_parameters};
