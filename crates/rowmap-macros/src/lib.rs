//! Procedural macros for rowmap.
//!
//! - `#[derive(Model)]` builds a struct's static field descriptor table and the
//!   glue that encodes and decodes each field through the value codec.
//! - `#[derive(SqlEnum)]` persists a fieldless enum by variant name.
//!
//! Generated code refers to `::rowmap_core`, which the `rowmap` facade
//! re-exports.
//!
//! # Field attributes
//!
//! ```ignore
//! #[derive(Debug, Default, Model)]
//! struct DataTypes {
//!     id: i32,                          // identity by name
//!     #[model(column = "IntegerColumn")]
//!     integer_column: i32,              // canonical store spelling
//!     #[model(skip)]
//!     scratch: Vec<String>,             // never mapped
//! }
//! ```
//!
//! `#[model(primary_key)]` marks the identity field explicitly; without it the
//! field named `id` (any case) is the identity.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod enum_derive;
mod model_derive;

/// Derive `Model` and `FromRow` for a struct with named fields.
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match model_derive::parse_model(&input) {
        Ok(def) => model_derive::generate_model_impl(&def).into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Derive `SqlEnum`, the value codec and `FromRow` for a fieldless enum.
#[proc_macro_derive(SqlEnum)]
pub fn derive_sql_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match enum_derive::parse_enum(&input) {
        Ok(def) => enum_derive::generate_enum_impl(&def).into(),
        Err(err) => err.to_compile_error().into(),
    }
}
